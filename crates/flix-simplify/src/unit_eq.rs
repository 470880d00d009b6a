//! Unit-equality elimination (§4.3, pass 2).
//!
//! `Unit` has exactly one inhabitant and the IR's `Binary` node has no side
//! effects, so `e1 == e2` with both operands of type `Unit` always
//! evaluates to `true` regardless of what `e1`/`e2` compute.

use flix_ir::{BinOp, Expr, ExprKind, MatchRule, Type};

fn is_unit(expr: &Expr) -> bool {
    expr.ty == Type::Unit
}

/// Rewrites `Binary(Eq, e1, e2)` to the literal `true` when both operands
/// are statically `Unit`-typed.
pub fn eliminate_unit_equality(expr: Expr) -> Expr {
    let span = expr.span;
    let ty = expr.ty;
    let kind = match *expr.kind {
        ExprKind::Binary { op: BinOp::Eq, lhs, rhs } => {
            let lhs = eliminate_unit_equality(lhs);
            let rhs = eliminate_unit_equality(rhs);
            if is_unit(&lhs) && is_unit(&rhs) {
                return Expr::new(ExprKind::Literal(flix_ir::Literal::Bool(true)), Type::Bool, span);
            }
            ExprKind::Binary { op: BinOp::Eq, lhs, rhs }
        }
        ExprKind::Lambda { params, body } => {
            ExprKind::Lambda { params, body: eliminate_unit_equality(body) }
        }
        ExprKind::App { func, args } => ExprKind::App {
            func: eliminate_unit_equality(func),
            args: args.into_iter().map(eliminate_unit_equality).collect(),
        },
        ExprKind::Unary { op, operand } => {
            ExprKind::Unary { op, operand: eliminate_unit_equality(operand) }
        }
        ExprKind::Binary { op, lhs, rhs } => ExprKind::Binary {
            op,
            lhs: eliminate_unit_equality(lhs),
            rhs: eliminate_unit_equality(rhs),
        },
        ExprKind::If { cond, then_branch, else_branch } => ExprKind::If {
            cond: eliminate_unit_equality(cond),
            then_branch: eliminate_unit_equality(then_branch),
            else_branch: eliminate_unit_equality(else_branch),
        },
        ExprKind::Let { name, value, body } => ExprKind::Let {
            name,
            value: eliminate_unit_equality(value),
            body: eliminate_unit_equality(body),
        },
        ExprKind::Match { scrutinee, rules } => ExprKind::Match {
            scrutinee: eliminate_unit_equality(scrutinee),
            rules: rules
                .into_iter()
                .map(|r| MatchRule { pattern: r.pattern, body: eliminate_unit_equality(r.body) })
                .collect(),
        },
        ExprKind::Tag { enum_name, tag, payload } => {
            ExprKind::Tag { enum_name, tag, payload: eliminate_unit_equality(payload) }
        }
        ExprKind::Tuple(items) => ExprKind::Tuple(items.into_iter().map(eliminate_unit_equality).collect()),
        ExprKind::Collection { kind, items } => {
            ExprKind::Collection { kind, items: items.into_iter().map(eliminate_unit_equality).collect() }
        }
        ExprKind::MapLiteral(pairs) => ExprKind::MapLiteral(
            pairs.into_iter().map(|(k, v)| (eliminate_unit_equality(k), eliminate_unit_equality(v))).collect(),
        ),
        ExprKind::Quantifier { kind, params, body } => {
            ExprKind::Quantifier { kind, params, body: eliminate_unit_equality(body) }
        }
        ExprKind::Ascribe { expr, ty } => ExprKind::Ascribe { expr: eliminate_unit_equality(expr), ty },
        other @ (ExprKind::Literal(_) | ExprKind::Var(_) | ExprKind::UserError { .. }) => other,
    };
    Expr::new(kind, ty, span)
}
