//! The Flix type language.
//!
//! Built once per declaration by the Typer (`flix-resolve`) and consumed
//! read-only everywhere downstream. After typing, no [`Type::Var`] remains
//! in an exported declaration — callers that need to assert this call
//! [`Type::is_closed`].

use std::collections::BTreeMap;
use std::fmt;

use flix_base::Name;

/// Width of a fixed-size integer type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntWidth {
    W8,
    W16,
    W32,
    W64,
}

/// Width of a floating point type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatWidth {
    W32,
    W64,
}

/// A fresh type variable introduced during inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeVar(pub u32);

/// A Flix type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Unit,
    Bool,
    Char,
    Int(IntWidth),
    BigInt,
    Float(FloatWidth),
    Str,
    Tuple(Vec<Type>),
    /// An enum type: its fully qualified name plus tag → payload-type map.
    Enum(Name, BTreeMap<String, Type>),
    /// A function type: parameter types plus return type.
    Lambda(Vec<Type>, Box<Type>),
    /// A user type constructor applied to type arguments.
    Parametric(Name, Vec<Type>),
    /// An opaque type referenced only by fully qualified name (the `Native` construct).
    Native(Name),
    /// An unresolved inference variable.
    Var(TypeVar),
}

impl Type {
    /// `true` iff no [`Type::Var`] occurs anywhere in this type.
    pub fn is_closed(&self) -> bool {
        match self {
            Type::Var(_) => false,
            Type::Unit
            | Type::Bool
            | Type::Char
            | Type::Int(_)
            | Type::BigInt
            | Type::Float(_)
            | Type::Str
            | Type::Native(_) => true,
            Type::Tuple(ts) => ts.iter().all(Type::is_closed),
            Type::Enum(_, tags) => tags.values().all(Type::is_closed),
            Type::Lambda(params, ret) => params.iter().all(Type::is_closed) && ret.is_closed(),
            Type::Parametric(_, args) => args.iter().all(Type::is_closed),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Unit => write!(f, "Unit"),
            Type::Bool => write!(f, "Bool"),
            Type::Char => write!(f, "Char"),
            Type::Int(IntWidth::W8) => write!(f, "Int8"),
            Type::Int(IntWidth::W16) => write!(f, "Int16"),
            Type::Int(IntWidth::W32) => write!(f, "Int32"),
            Type::Int(IntWidth::W64) => write!(f, "Int64"),
            Type::BigInt => write!(f, "BigInt"),
            Type::Float(FloatWidth::W32) => write!(f, "Float32"),
            Type::Float(FloatWidth::W64) => write!(f, "Float64"),
            Type::Str => write!(f, "Str"),
            Type::Tuple(ts) => {
                write!(f, "(")?;
                for (i, t) in ts.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{t}")?;
                }
                write!(f, ")")
            }
            Type::Enum(name, _) => write!(f, "{name}"),
            Type::Lambda(params, ret) => {
                write!(f, "(")?;
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{p}")?;
                }
                write!(f, ") -> {ret}")
            }
            Type::Parametric(name, args) => {
                write!(f, "{name}")?;
                if !args.is_empty() {
                    write!(f, "[")?;
                    for (i, a) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{a}")?;
                    }
                    write!(f, "]")?;
                }
                Ok(())
            }
            Type::Native(name) => write!(f, "##{name}"),
            Type::Var(v) => write!(f, "?t{}", v.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_type_has_no_vars() {
        assert!(Type::Tuple(vec![Type::Bool, Type::Int(IntWidth::W32)]).is_closed());
        assert!(!Type::Tuple(vec![Type::Var(TypeVar(0))]).is_closed());
    }

    #[test]
    fn lambda_display_matches_surface_shape() {
        let t = Type::Lambda(vec![Type::Int(IntWidth::W32), Type::Bool], Box::new(Type::Unit));
        assert_eq!(t.to_string(), "(Int32, Bool) -> Unit");
    }

    #[test]
    fn parametric_display_includes_args() {
        let t = Type::Parametric(Name::unqualified("List"), vec![Type::Bool]);
        assert_eq!(t.to_string(), "List[Bool]");
    }
}
