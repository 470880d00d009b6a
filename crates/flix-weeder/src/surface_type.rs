//! Weeding of surface type annotations into `flix-ir`'s [`Type`].
//!
//! The Weeder does not resolve names: a bare identifier that isn't one of
//! the built-in primitive names becomes an unqualified [`Name`], left for
//! the Resolver to qualify.

use flix_base::Name;
use flix_ir::{FloatWidth, IntWidth, Type};
use flix_ir::surface::SurfaceType;

pub fn weed_type(ty: &SurfaceType) -> Type {
    match ty {
        SurfaceType::Named(path) => named_type(path, &[]),
        SurfaceType::Tuple(elems) => Type::Tuple(elems.iter().map(weed_type).collect()),
        SurfaceType::Lambda(params, ret) => {
            Type::Lambda(params.iter().map(weed_type).collect(), Box::new(weed_type(ret)))
        }
        SurfaceType::Parametric(path, args) => {
            let woven_args: Vec<Type> = args.iter().map(weed_type).collect();
            named_type(path, &woven_args)
        }
    }
}

fn named_type(path: &[String], args: &[Type]) -> Type {
    if path.len() == 1 && args.is_empty() {
        if let Some(builtin) = builtin_type(&path[0]) {
            return builtin;
        }
    }
    let name = qualified_name(path);
    if args.is_empty() {
        Type::Native(name)
    } else {
        Type::Parametric(name, args.to_vec())
    }
}

fn builtin_type(text: &str) -> Option<Type> {
    Some(match text {
        "Unit" => Type::Unit,
        "Bool" => Type::Bool,
        "Char" => Type::Char,
        "Int8" => Type::Int(IntWidth::W8),
        "Int16" => Type::Int(IntWidth::W16),
        "Int32" => Type::Int(IntWidth::W32),
        "Int64" => Type::Int(IntWidth::W64),
        "BigInt" => Type::BigInt,
        "Float32" => Type::Float(FloatWidth::W32),
        "Float64" => Type::Float(FloatWidth::W64),
        "Str" => Type::Str,
        _ => return None,
    })
}

fn qualified_name(path: &[String]) -> Name {
    let (leaf, namespace) = path.split_last().expect("non-empty path");
    Name::from_segments(namespace.to_vec(), leaf.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_builtin_primitives() {
        assert_eq!(weed_type(&SurfaceType::Named(vec!["Bool".into()])), Type::Bool);
        assert_eq!(
            weed_type(&SurfaceType::Named(vec!["Int32".into()])),
            Type::Int(IntWidth::W32)
        );
    }

    #[test]
    fn unknown_name_becomes_native() {
        let ty = weed_type(&SurfaceType::Named(vec!["Graph".into(), "Node".into()]));
        assert!(matches!(ty, Type::Native(name) if name.to_string() == "Graph.Node"));
    }

    #[test]
    fn parametric_with_args_is_preserved() {
        let ty = weed_type(&SurfaceType::Parametric(vec!["List".into()], vec![SurfaceType::Named(vec!["Bool".into()])]));
        assert!(matches!(ty, Type::Parametric(_, args) if args == vec![Type::Bool]));
    }
}
