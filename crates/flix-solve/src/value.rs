//! Runtime values produced by evaluating typed `flix-ir` expressions.

use std::collections::HashMap;

use flix_ir::{CollectionKind, Expr, FloatWidth, IntWidth, Literal, Type};

/// An evaluated runtime value. Mirrors [`flix_ir::ExprKind`]'s literal and
/// structural shapes one-for-one; a bare function or a lattice operator's
/// body evaluates to a [`Value::Closure`].
#[derive(Debug, Clone)]
pub enum Value {
    Unit,
    Bool(bool),
    Char(char),
    Int(IntWidth, i64),
    /// `BigInt` is represented with a fixed 128-bit width rather than
    /// arbitrary precision; overflow saturates instead of panicking. See
    /// `DESIGN.md` for why this bound was accepted.
    BigInt(i128),
    Float(FloatWidth, f64),
    Str(String),
    Tuple(Vec<Value>),
    Tag { tag: String, payload: Box<Value> },
    Collection(CollectionKind, Vec<Value>),
    Map(Vec<(Value, Value)>),
    Closure { params: Vec<(String, Type)>, body: Expr, env: Env },
}

pub type Env = HashMap<String, Value>;

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Unit, Value::Unit) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Int(w1, a), Value::Int(w2, b)) => w1 == w2 && a == b,
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::Float(w1, a), Value::Float(w2, b)) => w1 == w2 && a.to_bits() == b.to_bits(),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::Tag { tag: t1, payload: p1 }, Value::Tag { tag: t2, payload: p2 }) => t1 == t2 && p1 == p2,
            (Value::Collection(k1, a), Value::Collection(k2, b)) => k1 == k2 && a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            // Closures carry no useful notion of value equality.
            _ => false,
        }
    }
}

/// A canonical string encoding of a value, used as a hash-map key for
/// index buckets. Sidesteps `Eq`/`Hash` on `f64` entirely rather than
/// special-casing `NaN`.
pub fn value_key(v: &Value) -> String {
    match v {
        Value::Unit => "()".to_string(),
        Value::Bool(b) => format!("b:{b}"),
        Value::Char(c) => format!("c:{c}"),
        Value::Int(w, n) => format!("i{w:?}:{n}"),
        Value::BigInt(n) => format!("I:{n}"),
        Value::Float(w, f) => format!("f{w:?}:{}", f.to_bits()),
        Value::Str(s) => format!("s:{s}"),
        Value::Tuple(items) => format!("({})", items.iter().map(value_key).collect::<Vec<_>>().join(",")),
        Value::Tag { tag, payload } => format!("{tag}({})", value_key(payload)),
        Value::Collection(kind, items) => {
            format!("{kind:?}[{}]", items.iter().map(value_key).collect::<Vec<_>>().join(","))
        }
        Value::Map(pairs) => format!(
            "{{{}}}",
            pairs.iter().map(|(k, v)| format!("{}->{}", value_key(k), value_key(v))).collect::<Vec<_>>().join(",")
        ),
        Value::Closure { .. } => "<closure>".to_string(),
    }
}

fn saturating_parse_bigint(s: &str) -> i128 {
    s.parse().unwrap_or(if s.trim_start().starts_with('-') { i128::MIN } else { i128::MAX })
}

pub fn literal_to_value(lit: &Literal) -> Value {
    match lit {
        Literal::Unit => Value::Unit,
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Char(c) => Value::Char(*c),
        Literal::Int(w, n) => Value::Int(*w, *n),
        Literal::BigInt(s) => Value::BigInt(saturating_parse_bigint(s)),
        Literal::Float(w, f) => Value::Float(*w, *f),
        Literal::Str(s) => Value::Str(s.clone()),
    }
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}
