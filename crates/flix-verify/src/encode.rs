//! Translates a `flix-ir` expression into a closed [`VerifyExpr`] by
//! substitution (§4.6 step 1, "extracts the function body in IR").
//!
//! Rather than unify against a general symbolic-execution engine, a law
//! obligation is built by *inlining*: a function's parameters are bound to
//! the caller-supplied `VerifyExpr` arguments (typically free variables
//! standing for the universally quantified law variables) and the body is
//! walked once, substituting each `Var` reference against the current
//! binding environment. A name with no binding — a call back to the
//! function under test, or a reference to some other declaration — is
//! encoded as an uninterpreted [`VerifyExpr::Apply`], which is exactly
//! what the "uninterpreted functions" theory in §4.6 calls for.

use std::collections::{BTreeMap, HashMap};

use flix_base::Name;
use flix_ir::{BinOp, Expr, ExprKind, FloatWidth, Literal, Pattern, Type, UnOp};

use crate::ir::{VerifyExpr, VerifyOp, VerifyType};

/// Declaration-order tag → integer-index tables for every enum in scope,
/// built once from the symbol table and consulted whenever a `Tag`
/// expression or `match` arm needs translating (see module docs).
#[derive(Debug, Default, Clone)]
pub struct EnumIndex {
    tags: HashMap<Name, BTreeMap<String, i64>>,
}

impl EnumIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, enum_name: &Name, tag_order: impl IntoIterator<Item = String>) {
        let table = self.tags.entry(enum_name.clone()).or_default();
        for (i, tag) in tag_order.into_iter().enumerate() {
            table.insert(tag, i as i64);
        }
    }

    fn index_of(&self, enum_name: &Name, tag: &str) -> Option<i64> {
        self.tags.get(enum_name)?.get(tag).copied()
    }
}

/// Everything [`encode`] needs to translate one IR expression: the
/// variable bindings currently in scope and the enum tag tables.
pub struct Env<'a> {
    pub enums: &'a EnumIndex,
    pub bindings: HashMap<String, VerifyExpr>,
}

impl<'a> Env<'a> {
    pub fn new(enums: &'a EnumIndex) -> Self {
        Env { enums, bindings: HashMap::new() }
    }

    pub fn with(mut self, name: impl Into<String>, value: VerifyExpr) -> Self {
        self.bindings.insert(name.into(), value);
        self
    }

    fn bind(&mut self, name: String, value: VerifyExpr) -> Option<VerifyExpr> {
        self.bindings.insert(name, value)
    }

    fn unbind(&mut self, name: &str, previous: Option<VerifyExpr>) {
        match previous {
            Some(v) => { self.bindings.insert(name.to_string(), v); }
            None => { self.bindings.remove(name); }
        }
    }
}

/// Why a declaration's body could not be translated into the verification IR.
#[derive(Debug, Clone, PartialEq)]
pub enum EncodingError {
    Unsupported(String),
    UnknownEnum(String),
    UnknownTag(String),
}

impl std::fmt::Display for EncodingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EncodingError::Unsupported(what) => write!(f, "expression form is not supported by the verifier: {what}"),
            EncodingError::UnknownEnum(name) => write!(f, "enum '{name}' has no registered tag index"),
            EncodingError::UnknownTag(tag) => write!(f, "tag '{tag}' is not a member of its enum"),
        }
    }
}

impl std::error::Error for EncodingError {}

/// Maps a Flix surface type to the sort used to encode its values (§4.6).
pub fn verify_type_of(ty: &Type) -> VerifyType {
    match ty {
        Type::Bool => VerifyType::Bool,
        Type::Int(_) | Type::BigInt => VerifyType::Int,
        Type::Float(_) => VerifyType::Real,
        Type::Enum(..) => VerifyType::Int,
        _ => VerifyType::Object,
    }
}

fn lit(l: &Literal) -> Result<VerifyExpr, EncodingError> {
    match l {
        Literal::Unit => Ok(VerifyExpr::Int(0)),
        Literal::Bool(b) => Ok(VerifyExpr::Bool(*b)),
        Literal::Char(c) => Ok(VerifyExpr::Int(*c as i64)),
        Literal::Int(_, n) => Ok(VerifyExpr::Int(*n)),
        Literal::BigInt(s) => s
            .parse::<i64>()
            .map(VerifyExpr::Int)
            .map_err(|_| EncodingError::Unsupported(format!("BigInt literal out of native range: {s}"))),
        Literal::Float(FloatWidth::W32, f) | Literal::Float(FloatWidth::W64, f) => {
            // Real-sort encoding approximates float literals by truncating
            // to their integer part only when exact; otherwise unsupported.
            if f.fract() == 0.0 {
                Ok(VerifyExpr::Int(*f as i64))
            } else {
                Err(EncodingError::Unsupported(format!("non-integral float literal {f}")))
            }
        }
        Literal::Str(_) => Err(EncodingError::Unsupported("string literal".into())),
    }
}

fn bin_op(op: BinOp) -> VerifyOp {
    match op {
        BinOp::Add => VerifyOp::Add,
        BinOp::Sub => VerifyOp::Sub,
        BinOp::Mul => VerifyOp::Mul,
        BinOp::Div => VerifyOp::Div,
        BinOp::Mod => VerifyOp::Mod,
        BinOp::Eq => VerifyOp::Eq,
        BinOp::Neq => VerifyOp::Neq,
        BinOp::Lt => VerifyOp::Lt,
        BinOp::Leq => VerifyOp::Lte,
        BinOp::Gt => VerifyOp::Gt,
        BinOp::Geq => VerifyOp::Gte,
        BinOp::And => VerifyOp::And,
        BinOp::Or => VerifyOp::Or,
    }
}

/// Translates one pattern match against an already-encoded scrutinee into
/// a boolean test, binding any pattern variables into `env` for the
/// duration of `f`.
fn pattern_test_and_bind(
    pattern: &Pattern,
    scrutinee_ty: &Type,
    scrutinee: &VerifyExpr,
    env: &mut Env,
) -> Result<(VerifyExpr, Vec<(String, Option<VerifyExpr>)>), EncodingError> {
    match pattern {
        Pattern::Wildcard => Ok((VerifyExpr::Bool(true), Vec::new())),
        Pattern::Var(name) => {
            let prev = env.bind(name.clone(), scrutinee.clone());
            Ok((VerifyExpr::Bool(true), vec![(name.clone(), prev)]))
        }
        Pattern::Literal(l) => Ok((VerifyExpr::eq(scrutinee.clone(), lit(l)?), Vec::new())),
        Pattern::Tag { tag, payload } => {
            let enum_name = match scrutinee_ty {
                Type::Enum(name, _) => name.clone(),
                _ => return Err(EncodingError::Unsupported("tag pattern on non-enum scrutinee".into())),
            };
            let idx = env
                .enums
                .index_of(&enum_name, tag)
                .ok_or_else(|| EncodingError::UnknownTag(tag.clone()))?;
            let test = VerifyExpr::eq(scrutinee.clone(), VerifyExpr::Int(idx));
            // Payload binding is unsupported beyond Unit: the element
            // types this verifier proves laws over are plain enums.
            let (inner_test, binds) = pattern_test_and_bind(payload, &Type::Unit, scrutinee, env)?;
            Ok((VerifyExpr::and(test, inner_test), binds))
        }
        Pattern::Tuple(_) => Err(EncodingError::Unsupported("tuple pattern".into())),
    }
}

fn restore(env: &mut Env, binds: Vec<(String, Option<VerifyExpr>)>) {
    for (name, prev) in binds.into_iter().rev() {
        env.unbind(&name, prev);
    }
}

/// Inlines `expr` under the current bindings in `env`, producing a closed
/// [`VerifyExpr`]. A free `Var` (no binding, e.g. a recursive self-call or
/// a reference to some other declaration) becomes an uninterpreted
/// `Apply` of arity zero — just the name itself, case where `App` isn't
/// already handling it.
pub fn encode(expr: &Expr, env: &mut Env) -> Result<VerifyExpr, EncodingError> {
    match &*expr.kind {
        ExprKind::Literal(l) => lit(l),
        ExprKind::Var(name) => {
            let key = name.to_string();
            if let Some(bound) = env.bindings.get(&key) {
                Ok(bound.clone())
            } else {
                Ok(VerifyExpr::Apply { name: key, args: Vec::new() })
            }
        }
        ExprKind::Unary { op, operand } => {
            let v = encode(operand, env)?;
            match op {
                UnOp::Neg => Ok(VerifyExpr::binary(VerifyOp::Sub, VerifyExpr::Int(0), v)),
                UnOp::Not => Ok(VerifyExpr::not(v)),
            }
        }
        ExprKind::Binary { op, lhs, rhs } => {
            let l = encode(lhs, env)?;
            let r = encode(rhs, env)?;
            Ok(VerifyExpr::binary(bin_op(*op), l, r))
        }
        ExprKind::If { cond, then_branch, else_branch } => {
            let c = encode(cond, env)?;
            let t = encode(then_branch, env)?;
            let e = encode(else_branch, env)?;
            Ok(VerifyExpr::if_then_else(c, t, e))
        }
        ExprKind::Let { name, value, body } => {
            let v = encode(value, env)?;
            let prev = env.bind(name.clone(), v);
            let result = encode(body, env);
            env.unbind(name, prev);
            result
        }
        ExprKind::Tag { enum_name, tag, payload } => {
            if !matches!(&*payload.kind, ExprKind::Literal(Literal::Unit)) {
                return Err(EncodingError::Unsupported("tag with non-Unit payload".into()));
            }
            let idx = env
                .enums
                .index_of(enum_name, tag)
                .ok_or_else(|| EncodingError::UnknownEnum(enum_name.to_string()))?;
            Ok(VerifyExpr::Int(idx))
        }
        ExprKind::Match { scrutinee, rules } => {
            let s = encode(scrutinee, env)?;
            let mut arms = Vec::with_capacity(rules.len());
            for rule in rules {
                let (test, binds) = pattern_test_and_bind(&rule.pattern, &scrutinee.ty, &s, env)?;
                let body = encode(&rule.body, env);
                restore(env, binds);
                arms.push((test, body?));
            }
            // Fold the arms right-to-left into a chain of `ite`s; the
            // Weeder/Typer guarantee exhaustiveness, so the innermost
            // "else" is unreachable and reuses the last arm's body.
            let mut iter = arms.into_iter().rev();
            let (_, last_body) = iter.next().ok_or_else(|| EncodingError::Unsupported("empty match".into()))?;
            let mut acc = last_body;
            for (test, body) in iter {
                acc = VerifyExpr::if_then_else(test, body, acc);
            }
            Ok(acc)
        }
        ExprKind::App { func, args } => {
            let encoded_args: Result<Vec<_>, _> = args.iter().map(|a| encode(a, env)).collect();
            let encoded_args = encoded_args?;
            match &*func.kind {
                ExprKind::Var(name) => Ok(VerifyExpr::apply(name.to_string(), encoded_args)),
                _ => Err(EncodingError::Unsupported("indirect call".into())),
            }
        }
        ExprKind::Ascribe { expr, .. } => encode(expr, env),
        ExprKind::Lambda { .. }
        | ExprKind::Tuple(_)
        | ExprKind::Collection { .. }
        | ExprKind::MapLiteral(_)
        | ExprKind::Quantifier { .. }
        | ExprKind::UserError { .. } => Err(EncodingError::Unsupported(format!("{:?}", expr.kind))),
    }
}

/// Inlines a declaration's body with its formal parameters bound to
/// `args` (positionally), the standard shape for building a law's
/// property formula from e.g. `lub`'s two-parameter body.
pub fn inline_call(
    params: &[(String, Type)],
    body: &Expr,
    args: &[VerifyExpr],
    enums: &EnumIndex,
) -> Result<VerifyExpr, EncodingError> {
    let mut env = Env::new(enums);
    for ((name, _), arg) in params.iter().zip(args.iter()) {
        env.bindings.insert(name.clone(), arg.clone());
    }
    encode(body, &mut env)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flix_base::Span;
    use flix_ir::{BinOp as FBinOp, ExprKind as FExprKind, IntWidth};

    fn int_ty() -> Type {
        Type::Int(IntWidth::W32)
    }

    #[test]
    fn inlines_two_param_max_function() {
        // fn max(a, b) = if a >= b then a else b
        let cond = Expr::new(
            FExprKind::Binary {
                op: FBinOp::Geq,
                lhs: Expr::new(FExprKind::Var(Name::unqualified("a")), int_ty(), Span::new(0, 1)),
                rhs: Expr::new(FExprKind::Var(Name::unqualified("b")), int_ty(), Span::new(0, 1)),
            },
            Type::Bool,
            Span::new(0, 1),
        );
        let body = Expr::new(
            FExprKind::If {
                cond,
                then_branch: Expr::new(FExprKind::Var(Name::unqualified("a")), int_ty(), Span::new(0, 1)),
                else_branch: Expr::new(FExprKind::Var(Name::unqualified("b")), int_ty(), Span::new(0, 1)),
            },
            int_ty(),
            Span::new(0, 1),
        );
        let params = vec![("a".to_string(), int_ty()), ("b".to_string(), int_ty())];
        let enums = EnumIndex::new();
        let encoded = inline_call(&params, &body, &[VerifyExpr::var("x"), VerifyExpr::var("y")], &enums).unwrap();
        match encoded {
            VerifyExpr::If { .. } => {}
            other => panic!("expected If, got {other:?}"),
        }
    }

    #[test]
    fn tag_expression_resolves_to_declared_index() {
        let mut enums = EnumIndex::new();
        let sign = Name::unqualified("Sign");
        enums.register(&sign, ["Neg".to_string(), "Zer".to_string(), "Pos".to_string()]);
        let tag_expr = Expr::new(
            FExprKind::Tag {
                enum_name: sign.clone(),
                tag: "Pos".to_string(),
                payload: Expr::new(FExprKind::Literal(Literal::Unit), Type::Unit, Span::new(0, 1)),
            },
            Type::Enum(sign, Default::default()),
            Span::new(0, 1),
        );
        let mut env = Env::new(&enums);
        let encoded = encode(&tag_expr, &mut env).unwrap();
        assert_eq!(encoded, VerifyExpr::Int(2));
    }
}
