//! A tree-walking evaluator for typed `flix-ir` expressions (§9
//! "pattern-rich case trees"): function bodies, lattice-operator bodies,
//! and rule-body term evaluation all go through this one interpreter.

use flix_ir::{BinOp, Decl, Expr, ExprKind, Pattern, SymbolTable, Type, UnOp};

use crate::error::EvalError;
use crate::value::{literal_to_value, Env, Value};

type EvalResult<T> = Result<T, EvalError>;

/// Bare names the Weeder desugars `⊑ ⊔ ⊓ ▽ △` into, resolved here against
/// the `BoundedLattice` instance for the operand's element type — the
/// runtime counterpart of the Typer's dictionary lookup (`find_lattice_instance`
/// in `flix-resolve`), since these calls remain plain `App(Var(name), _)`
/// nodes all the way through simplification.
const LATTICE_DICT_OPS: &[&str] = &["leq", "lub", "glb", "widen", "narrow"];
const LATTICE_BOUND_OPS: &[&str] = &["bot", "top"];

fn find_bounded_lattice<'a>(table: &'a SymbolTable, ty: &Type) -> Option<&'a flix_ir::BoundedLatticeDecl> {
    let mut found = None;
    for name in table.names() {
        for decl in table.lookup(name) {
            if let Decl::BoundedLattice(bl) = decl {
                if &bl.element_type == ty {
                    if found.is_some() {
                        return None;
                    }
                    found = Some(bl);
                }
            }
        }
    }
    found
}

fn eval_lattice_op(
    op: &str,
    operand_ty: &Type,
    args: Vec<Value>,
    table: &SymbolTable,
    span: flix_base::Span,
) -> EvalResult<Value> {
    let bl = find_bounded_lattice(table, operand_ty).ok_or_else(|| EvalError::Internal {
        message: format!("no BoundedLattice instance for `{operand_ty}`"),
        span,
    })?;
    let body = match op {
        "bot" => return eval(&bl.bot, &Env::new(), table),
        "top" => return eval(&bl.top, &Env::new(), table),
        "leq" => &bl.leq,
        "lub" => &bl.lub,
        "glb" => &bl.glb,
        "widen" => bl
            .widen
            .as_ref()
            .ok_or_else(|| EvalError::Internal { message: format!("`{operand_ty}` declares no widen operator"), span })?,
        "narrow" => {
            return Err(EvalError::Internal { message: format!("`{operand_ty}` declares no narrow operator"), span })
        }
        _ => unreachable!("not a recognized lattice operator name"),
    };
    let f = eval(body, &Env::new(), table)?;
    apply(f, args, table, span)
}

pub(crate) fn apply(func: Value, args: Vec<Value>, table: &SymbolTable, span: flix_base::Span) -> EvalResult<Value> {
    match func {
        Value::Closure { params, body, env } => {
            if params.len() != args.len() {
                return Err(EvalError::Internal {
                    message: format!("arity mismatch: expected {} argument(s), found {}", params.len(), args.len()),
                    span,
                });
            }
            let mut call_env = env;
            for ((name, _ty), arg) in params.into_iter().zip(args) {
                call_env.insert(name, arg);
            }
            eval(&body, &call_env, table)
        }
        other => Err(EvalError::Internal { message: format!("cannot apply non-function value {other:?}"), span }),
    }
}

fn bind_pattern(pattern: &Pattern, value: &Value, bindings: &mut Env) -> bool {
    match (pattern, value) {
        (Pattern::Wildcard, _) => true,
        (Pattern::Var(name), v) => {
            bindings.insert(name.clone(), v.clone());
            true
        }
        (Pattern::Literal(lit), v) => &literal_to_value(lit) == v,
        (Pattern::Tuple(pats), Value::Tuple(vals)) if pats.len() == vals.len() => {
            pats.iter().zip(vals).all(|(p, v)| bind_pattern(p, v, bindings))
        }
        (Pattern::Tag { tag, payload }, Value::Tag { tag: vtag, payload: vpayload }) if tag == vtag => {
            bind_pattern(payload, vpayload, bindings)
        }
        _ => false,
    }
}

fn unop(op: UnOp, v: Value, span: flix_base::Span) -> EvalResult<Value> {
    match (op, v) {
        (UnOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        (UnOp::Neg, Value::Int(w, n)) => Ok(Value::Int(w, -n)),
        (UnOp::Neg, Value::BigInt(n)) => Ok(Value::BigInt(-n)),
        (UnOp::Neg, Value::Float(w, f)) => Ok(Value::Float(w, -f)),
        (op, v) => Err(EvalError::Internal { message: format!("cannot apply {op:?} to {v:?}"), span }),
    }
}

pub(crate) fn binop(op: BinOp, lhs: Value, rhs: Value, span: flix_base::Span) -> EvalResult<Value> {
    use BinOp::*;
    match (op, lhs, rhs) {
        (Eq, a, b) => Ok(Value::Bool(a == b)),
        (Neq, a, b) => Ok(Value::Bool(a != b)),
        (And, Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(a && b)),
        (Or, Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(a || b)),
        (Add, Value::Int(w, a), Value::Int(_, b)) => Ok(Value::Int(w, a.wrapping_add(b))),
        (Sub, Value::Int(w, a), Value::Int(_, b)) => Ok(Value::Int(w, a.wrapping_sub(b))),
        (Mul, Value::Int(w, a), Value::Int(_, b)) => Ok(Value::Int(w, a.wrapping_mul(b))),
        (Div, Value::Int(w, a), Value::Int(_, b)) => {
            if b == 0 {
                Ok(Value::Int(w, 0))
            } else {
                Ok(Value::Int(w, a.wrapping_div(b)))
            }
        }
        (Mod, Value::Int(w, a), Value::Int(_, b)) => {
            if b == 0 {
                Ok(Value::Int(w, 0))
            } else {
                Ok(Value::Int(w, a.wrapping_rem(b)))
            }
        }
        (Add, Value::BigInt(a), Value::BigInt(b)) => Ok(Value::BigInt(a.saturating_add(b))),
        (Sub, Value::BigInt(a), Value::BigInt(b)) => Ok(Value::BigInt(a.saturating_sub(b))),
        (Mul, Value::BigInt(a), Value::BigInt(b)) => Ok(Value::BigInt(a.saturating_mul(b))),
        (Div, Value::BigInt(a), Value::BigInt(b)) => Ok(Value::BigInt(if b == 0 { 0 } else { a / b })),
        (Mod, Value::BigInt(a), Value::BigInt(b)) => Ok(Value::BigInt(if b == 0 { 0 } else { a % b })),
        (Add, Value::Float(w, a), Value::Float(_, b)) => Ok(Value::Float(w, a + b)),
        (Sub, Value::Float(w, a), Value::Float(_, b)) => Ok(Value::Float(w, a - b)),
        (Mul, Value::Float(w, a), Value::Float(_, b)) => Ok(Value::Float(w, a * b)),
        (Div, Value::Float(w, a), Value::Float(_, b)) => Ok(Value::Float(w, a / b)),
        (Lt, Value::Int(_, a), Value::Int(_, b)) => Ok(Value::Bool(a < b)),
        (Leq, Value::Int(_, a), Value::Int(_, b)) => Ok(Value::Bool(a <= b)),
        (Gt, Value::Int(_, a), Value::Int(_, b)) => Ok(Value::Bool(a > b)),
        (Geq, Value::Int(_, a), Value::Int(_, b)) => Ok(Value::Bool(a >= b)),
        (Lt, Value::BigInt(a), Value::BigInt(b)) => Ok(Value::Bool(a < b)),
        (Leq, Value::BigInt(a), Value::BigInt(b)) => Ok(Value::Bool(a <= b)),
        (Gt, Value::BigInt(a), Value::BigInt(b)) => Ok(Value::Bool(a > b)),
        (Geq, Value::BigInt(a), Value::BigInt(b)) => Ok(Value::Bool(a >= b)),
        (Lt, Value::Float(_, a), Value::Float(_, b)) => Ok(Value::Bool(a < b)),
        (Leq, Value::Float(_, a), Value::Float(_, b)) => Ok(Value::Bool(a <= b)),
        (Gt, Value::Float(_, a), Value::Float(_, b)) => Ok(Value::Bool(a > b)),
        (Geq, Value::Float(_, a), Value::Float(_, b)) => Ok(Value::Bool(a >= b)),
        (Add, Value::Str(a), Value::Str(b)) => Ok(Value::Str(a + &b)),
        (op, l, r) => Err(EvalError::Internal { message: format!("cannot apply {op:?} to {l:?} and {r:?}"), span }),
    }
}

/// Evaluates `expr` under `env`, resolving any free name against `table`.
pub fn eval(expr: &Expr, env: &Env, table: &SymbolTable) -> EvalResult<Value> {
    let span = expr.span;
    match &*expr.kind {
        ExprKind::Literal(lit) => Ok(literal_to_value(lit)),
        ExprKind::Var(name) => {
            if let Some(v) = env.get(name.leaf()) {
                return Ok(v.clone());
            }
            match table.lookup(name).first() {
                Some(Decl::Function(f)) => Ok(Value::Closure { params: f.params.clone(), body: f.body.clone(), env: Env::new() }),
                Some(Decl::Value(v)) => eval(&v.body, &Env::new(), table),
                _ => Err(EvalError::Internal { message: format!("unbound name `{name}`"), span }),
            }
        }
        ExprKind::Lambda { params, body } => {
            Ok(Value::Closure { params: params.clone(), body: (**body).clone(), env: env.clone() })
        }
        ExprKind::App { func, args } => {
            if let ExprKind::Var(name) = &*func.kind {
                let leaf = name.leaf();
                if name.is_unqualified() && (LATTICE_DICT_OPS.contains(&leaf) || LATTICE_BOUND_OPS.contains(&leaf)) {
                    let operand_ty = args.first().map(|a| a.ty.clone()).unwrap_or(Type::Unit);
                    let argv = args.iter().map(|a| eval(a, env, table)).collect::<EvalResult<Vec<_>>>()?;
                    return eval_lattice_op(leaf, &operand_ty, argv, table, span);
                }
            }
            let f = eval(func, env, table)?;
            let argv = args.iter().map(|a| eval(a, env, table)).collect::<EvalResult<Vec<_>>>()?;
            apply(f, argv, table, span)
        }
        ExprKind::Unary { op, operand } => unop(*op, eval(operand, env, table)?, span),
        ExprKind::Binary { op, lhs, rhs } => {
            let l = eval(lhs, env, table)?;
            let r = eval(rhs, env, table)?;
            binop(*op, l, r, span)
        }
        ExprKind::If { cond, then_branch, else_branch } => {
            let c = eval(cond, env, table)?;
            match c.as_bool() {
                Some(true) => eval(then_branch, env, table),
                Some(false) => eval(else_branch, env, table),
                None => Err(EvalError::Internal { message: format!("if-condition is not Bool: {c:?}"), span }),
            }
        }
        ExprKind::Let { name, value, body } => {
            let v = eval(value, env, table)?;
            let mut inner = env.clone();
            inner.insert(name.clone(), v);
            eval(body, &inner, table)
        }
        ExprKind::Match { scrutinee, rules } => {
            let v = eval(scrutinee, env, table)?;
            for rule in rules {
                let mut bindings = env.clone();
                if bind_pattern(&rule.pattern, &v, &mut bindings) {
                    return eval(&rule.body, &bindings, table);
                }
            }
            Err(EvalError::Internal { message: format!("no match arm for value {v:?}"), span })
        }
        ExprKind::Tag { tag, payload, .. } => {
            let p = eval(payload, env, table)?;
            Ok(Value::Tag { tag: tag.clone(), payload: Box::new(p) })
        }
        ExprKind::Tuple(items) => Ok(Value::Tuple(items.iter().map(|e| eval(e, env, table)).collect::<EvalResult<Vec<_>>>()?)),
        ExprKind::Collection { kind, items } => {
            Ok(Value::Collection(*kind, items.iter().map(|e| eval(e, env, table)).collect::<EvalResult<Vec<_>>>()?))
        }
        ExprKind::MapLiteral(pairs) => {
            let mut out = Vec::with_capacity(pairs.len());
            for (k, v) in pairs {
                out.push((eval(k, env, table)?, eval(v, env, table)?));
            }
            Ok(Value::Map(out))
        }
        ExprKind::Quantifier { .. } => {
            Err(EvalError::Internal { message: "quantifiers are not evaluated at run time".into(), span })
        }
        ExprKind::Ascribe { expr, .. } => eval(expr, env, table),
        ExprKind::UserError { message } => Err(EvalError::User { message: message.clone(), span }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flix_base::{Name, Span};
    use flix_ir::{IntWidth, Literal};

    fn int_expr(n: i64) -> Expr {
        Expr::new(ExprKind::Literal(Literal::Int(IntWidth::W32, n)), Type::Int(IntWidth::W32), Span::new(0, 1))
    }

    #[test]
    fn literal_evaluates_to_itself() {
        let table = SymbolTable::new();
        let v = eval(&int_expr(7), &Env::new(), &table).unwrap();
        assert_eq!(v, Value::Int(IntWidth::W32, 7));
    }

    #[test]
    fn let_binds_name_for_body() {
        let table = SymbolTable::new();
        let e = Expr::new(
            ExprKind::Let {
                name: "x".into(),
                value: int_expr(3),
                body: Expr::new(ExprKind::Var(Name::unqualified("x")), Type::Int(IntWidth::W32), Span::new(0, 1)),
            },
            Type::Int(IntWidth::W32),
            Span::new(0, 1),
        );
        let v = eval(&e, &Env::new(), &table).unwrap();
        assert_eq!(v, Value::Int(IntWidth::W32, 3));
    }

    #[test]
    fn lambda_application_substitutes_arguments() {
        let table = SymbolTable::new();
        let lambda = Expr::new(
            ExprKind::Lambda {
                params: vec![("x".into(), Type::Int(IntWidth::W32))],
                body: Expr::new(
                    ExprKind::Binary {
                        op: BinOp::Add,
                        lhs: Expr::new(ExprKind::Var(Name::unqualified("x")), Type::Int(IntWidth::W32), Span::new(0, 1)),
                        rhs: int_expr(1),
                    },
                    Type::Int(IntWidth::W32),
                    Span::new(0, 1),
                ),
            },
            Type::Lambda(vec![Type::Int(IntWidth::W32)], Box::new(Type::Int(IntWidth::W32))),
            Span::new(0, 1),
        );
        let app = Expr::new(ExprKind::App { func: lambda, args: vec![int_expr(41)] }, Type::Int(IntWidth::W32), Span::new(0, 1));
        let v = eval(&app, &Env::new(), &table).unwrap();
        assert_eq!(v, Value::Int(IntWidth::W32, 42));
    }

    #[test]
    fn user_error_node_surfaces_its_message() {
        let table = SymbolTable::new();
        let e = Expr::new(ExprKind::UserError { message: "boom".into() }, Type::Unit, Span::new(0, 1));
        let err = eval(&e, &Env::new(), &table).unwrap_err();
        assert!(matches!(err, EvalError::User { message, .. } if message == "boom"));
    }
}
