//! Copy propagation (§4.3, pass 1).
//!
//! The distilled specification fixes this as an identity transform today —
//! "placeholder preserved for future" — but the pass still walks the full
//! expression tree so a later constant-propagation implementation only has
//! to change what happens at the `Let`/`Var` cases, not how the tree is
//! threaded.

use flix_ir::{Expr, ExprKind, MatchRule};

/// Copy-propagates `expr`. Currently the identity function over the tree
/// shape; reserved for substituting `let`-bound literals into their uses.
pub fn propagate_expr(expr: Expr) -> Expr {
    let span = expr.span;
    let ty = expr.ty;
    let kind = match *expr.kind {
        ExprKind::Lambda { params, body } => ExprKind::Lambda { params, body: propagate_expr(body) },
        ExprKind::App { func, args } => ExprKind::App {
            func: propagate_expr(func),
            args: args.into_iter().map(propagate_expr).collect(),
        },
        ExprKind::Unary { op, operand } => ExprKind::Unary { op, operand: propagate_expr(operand) },
        ExprKind::Binary { op, lhs, rhs } => {
            ExprKind::Binary { op, lhs: propagate_expr(lhs), rhs: propagate_expr(rhs) }
        }
        ExprKind::If { cond, then_branch, else_branch } => ExprKind::If {
            cond: propagate_expr(cond),
            then_branch: propagate_expr(then_branch),
            else_branch: propagate_expr(else_branch),
        },
        ExprKind::Let { name, value, body } => {
            ExprKind::Let { name, value: propagate_expr(value), body: propagate_expr(body) }
        }
        ExprKind::Match { scrutinee, rules } => ExprKind::Match {
            scrutinee: propagate_expr(scrutinee),
            rules: rules
                .into_iter()
                .map(|r| MatchRule { pattern: r.pattern, body: propagate_expr(r.body) })
                .collect(),
        },
        ExprKind::Tag { enum_name, tag, payload } => {
            ExprKind::Tag { enum_name, tag, payload: propagate_expr(payload) }
        }
        ExprKind::Tuple(items) => ExprKind::Tuple(items.into_iter().map(propagate_expr).collect()),
        ExprKind::Collection { kind, items } => {
            ExprKind::Collection { kind, items: items.into_iter().map(propagate_expr).collect() }
        }
        ExprKind::MapLiteral(pairs) => {
            ExprKind::MapLiteral(pairs.into_iter().map(|(k, v)| (propagate_expr(k), propagate_expr(v))).collect())
        }
        ExprKind::Quantifier { kind, params, body } => {
            ExprKind::Quantifier { kind, params, body: propagate_expr(body) }
        }
        ExprKind::Ascribe { expr, ty } => ExprKind::Ascribe { expr: propagate_expr(expr), ty },
        other @ (ExprKind::Literal(_) | ExprKind::Var(_) | ExprKind::UserError { .. }) => other,
    };
    Expr::new(kind, ty, span)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flix_base::Span;
    use flix_ir::{Literal, Type};

    #[test]
    fn identity_preserves_shape() {
        let e = Expr::new(ExprKind::Literal(Literal::Bool(true)), Type::Bool, Span::new(0, 1));
        let out = propagate_expr(e);
        assert!(matches!(*out.kind, ExprKind::Literal(Literal::Bool(true))));
    }
}
