//! Dead-code elimination (§4.3, pass 3).
//!
//! Folds `if true then a else b` to `a` and `if false then a else b` to
//! `b` once both branches have already run through earlier passes.

use flix_ir::{Expr, ExprKind, Literal, MatchRule};

pub fn eliminate_dead_code(expr: Expr) -> Expr {
    let span = expr.span;
    let ty = expr.ty;
    match *expr.kind {
        ExprKind::If { cond, then_branch, else_branch } => {
            let cond = eliminate_dead_code(cond);
            let then_branch = eliminate_dead_code(then_branch);
            let else_branch = eliminate_dead_code(else_branch);
            match &*cond.kind {
                ExprKind::Literal(Literal::Bool(true)) => then_branch,
                ExprKind::Literal(Literal::Bool(false)) => else_branch,
                _ => Expr::new(ExprKind::If { cond, then_branch, else_branch }, ty, span),
            }
        }
        ExprKind::Lambda { params, body } => {
            Expr::new(ExprKind::Lambda { params, body: eliminate_dead_code(body) }, ty, span)
        }
        ExprKind::App { func, args } => Expr::new(
            ExprKind::App {
                func: eliminate_dead_code(func),
                args: args.into_iter().map(eliminate_dead_code).collect(),
            },
            ty,
            span,
        ),
        ExprKind::Unary { op, operand } => {
            Expr::new(ExprKind::Unary { op, operand: eliminate_dead_code(operand) }, ty, span)
        }
        ExprKind::Binary { op, lhs, rhs } => Expr::new(
            ExprKind::Binary { op, lhs: eliminate_dead_code(lhs), rhs: eliminate_dead_code(rhs) },
            ty,
            span,
        ),
        ExprKind::Let { name, value, body } => Expr::new(
            ExprKind::Let { name, value: eliminate_dead_code(value), body: eliminate_dead_code(body) },
            ty,
            span,
        ),
        ExprKind::Match { scrutinee, rules } => Expr::new(
            ExprKind::Match {
                scrutinee: eliminate_dead_code(scrutinee),
                rules: rules
                    .into_iter()
                    .map(|r| MatchRule { pattern: r.pattern, body: eliminate_dead_code(r.body) })
                    .collect(),
            },
            ty,
            span,
        ),
        ExprKind::Tag { enum_name, tag, payload } => {
            Expr::new(ExprKind::Tag { enum_name, tag, payload: eliminate_dead_code(payload) }, ty, span)
        }
        ExprKind::Tuple(items) => {
            Expr::new(ExprKind::Tuple(items.into_iter().map(eliminate_dead_code).collect()), ty, span)
        }
        ExprKind::Collection { kind, items } => Expr::new(
            ExprKind::Collection { kind, items: items.into_iter().map(eliminate_dead_code).collect() },
            ty,
            span,
        ),
        ExprKind::MapLiteral(pairs) => Expr::new(
            ExprKind::MapLiteral(
                pairs.into_iter().map(|(k, v)| (eliminate_dead_code(k), eliminate_dead_code(v))).collect(),
            ),
            ty,
            span,
        ),
        ExprKind::Quantifier { kind, params, body } => {
            Expr::new(ExprKind::Quantifier { kind, params, body: eliminate_dead_code(body) }, ty, span)
        }
        ExprKind::Ascribe { expr, ty: asc_ty } => {
            Expr::new(ExprKind::Ascribe { expr: eliminate_dead_code(expr), ty: asc_ty }, ty, span)
        }
        other @ (ExprKind::Literal(_) | ExprKind::Var(_) | ExprKind::UserError { .. }) => {
            Expr::new(other, ty, span)
        }
    }
}
