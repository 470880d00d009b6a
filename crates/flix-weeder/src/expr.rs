//! Expression weeding: operator desugaring and structural validation.

use std::collections::HashSet;

use flix_base::{Name, Span};
use flix_ir::surface::{
    SurfaceBinOp, SurfaceCollectionKind, SurfaceExpr, SurfaceExprKind, SurfaceLatticeOp,
    SurfaceQuantifierKind, SurfaceUnOp,
};
use flix_ir::{BinOp, CollectionKind, Diagnostics, Expr, ExprKind, QuantifierKind, Type, TypeVar, UnOp};

use crate::error::WeederError;
use crate::literal::weed_literal;
use crate::pattern::weed_pattern;
use crate::surface_type::weed_type;

/// The placeholder type every freshly weeded node carries; the Typer
/// (`flix-resolve`) replaces it with the inferred type.
fn untyped() -> Type {
    Type::Var(TypeVar(0))
}

fn qualified_name(path: &[String]) -> Name {
    let (leaf, namespace) = path.split_last().expect("non-empty path");
    Name::from_segments(namespace.to_vec(), leaf.clone())
}

pub fn weed_expr(se: &SurfaceExpr, errors: &mut Diagnostics<WeederError>) -> Expr {
    let span = se.span;
    let kind = match se.kind.as_ref() {
        SurfaceExprKind::Lit(lit) => {
            ExprKind::Literal(weed_literal(lit, flix_ir::IntWidth::W32, flix_ir::FloatWidth::W64, span, errors))
        }
        SurfaceExprKind::Bot => ExprKind::App {
            func: Expr::new(ExprKind::Var(Name::unqualified("bot")), untyped(), span),
            args: Vec::new(),
        },
        SurfaceExprKind::Top => ExprKind::App {
            func: Expr::new(ExprKind::Var(Name::unqualified("top")), untyped(), span),
            args: Vec::new(),
        },
        SurfaceExprKind::Var(path) => ExprKind::Var(qualified_name(path)),
        SurfaceExprKind::Wildcard => {
            errors.push(WeederError::IllegalWildcard { span });
            ExprKind::UserError { message: "illegal wildcard".into() }
        }
        SurfaceExprKind::Lambda { params, body } => {
            let mut seen = HashSet::new();
            for p in params {
                if !seen.insert(p.clone()) {
                    errors.push(WeederError::DuplicateFormal { decl: "<lambda>".into(), name: p.clone(), span });
                }
            }
            ExprKind::Lambda {
                params: params.iter().map(|p| (p.clone(), untyped())).collect(),
                body: weed_expr(body, errors),
            }
        }
        SurfaceExprKind::App { func, args } => ExprKind::App {
            func: weed_expr(func, errors),
            args: args.iter().map(|a| weed_expr(a, errors)).collect(),
        },
        SurfaceExprKind::InfixIdent { op, lhs, rhs } => ExprKind::App {
            func: Expr::new(ExprKind::Var(Name::unqualified(op.clone())), untyped(), span),
            args: vec![weed_expr(lhs, errors), weed_expr(rhs, errors)],
        },
        SurfaceExprKind::LatticeOp { op, lhs, rhs } => ExprKind::App {
            func: Expr::new(
                ExprKind::Var(Name::unqualified(lattice_op_name(*op))),
                untyped(),
                span,
            ),
            args: vec![weed_expr(lhs, errors), weed_expr(rhs, errors)],
        },
        SurfaceExprKind::Unary { op, operand } => ExprKind::Unary {
            op: weed_unop(*op),
            operand: weed_expr(operand, errors),
        },
        SurfaceExprKind::Binary { op, lhs, rhs } => ExprKind::Binary {
            op: weed_binop(*op),
            lhs: weed_expr(lhs, errors),
            rhs: weed_expr(rhs, errors),
        },
        SurfaceExprKind::If { cond, then_branch, else_branch } => ExprKind::If {
            cond: weed_expr(cond, errors),
            then_branch: weed_expr(then_branch, errors),
            else_branch: weed_expr(else_branch, errors),
        },
        SurfaceExprKind::LetMatch { pattern, value, body } => {
            let value = weed_expr(value, errors);
            let mut bound = HashSet::new();
            let woven_pattern = weed_pattern(pattern, &mut bound, errors, span);
            let body = weed_expr(body, errors);
            match woven_pattern {
                flix_ir::Pattern::Var(name) => ExprKind::Let { name, value, body },
                other => ExprKind::Match {
                    scrutinee: value,
                    rules: vec![flix_ir::MatchRule { pattern: other, body }],
                },
            }
        }
        SurfaceExprKind::Match { scrutinee, rules } => ExprKind::Match {
            scrutinee: weed_expr(scrutinee, errors),
            rules: rules
                .iter()
                .map(|(pat, body)| {
                    let mut bound = HashSet::new();
                    flix_ir::MatchRule {
                        pattern: weed_pattern(pat, &mut bound, errors, span),
                        body: weed_expr(body, errors),
                    }
                })
                .collect(),
        },
        SurfaceExprKind::Tag { tag, payload } => {
            let payload = match payload {
                Some(p) => weed_expr(p, errors),
                None => Expr::new(ExprKind::Literal(flix_ir::Literal::Unit), Type::Unit, span),
            };
            ExprKind::Tag {
                enum_name: Name::unqualified(""),
                tag: tag.clone(),
                payload,
            }
        }
        SurfaceExprKind::Tuple(elems) => {
            let mut woven: Vec<Expr> = elems.iter().map(|e| weed_expr(e, errors)).collect();
            return match woven.len() {
                0 => Expr::new(ExprKind::Literal(flix_ir::Literal::Unit), Type::Unit, span),
                1 => woven.remove(0),
                _ => Expr::new(ExprKind::Tuple(woven), untyped(), span),
            };
        }
        SurfaceExprKind::Collection { kind, items } => ExprKind::Collection {
            kind: weed_collection_kind(*kind),
            items: items.iter().map(|e| weed_expr(e, errors)).collect(),
        },
        SurfaceExprKind::MapLiteral(pairs) => ExprKind::MapLiteral(
            pairs.iter().map(|(k, v)| (weed_expr(k, errors), weed_expr(v, errors))).collect(),
        ),
        SurfaceExprKind::Quantifier { kind, params, body } => {
            if params.is_empty() {
                match kind {
                    SurfaceQuantifierKind::Existential => errors.push(WeederError::IllegalExistential { span }),
                    SurfaceQuantifierKind::Universal => errors.push(WeederError::IllegalUniversal { span }),
                }
            }
            let mut seen = HashSet::new();
            for p in params {
                if !seen.insert(p.clone()) {
                    errors.push(WeederError::DuplicateFormal { decl: "<quantifier>".into(), name: p.clone(), span });
                }
            }
            ExprKind::Quantifier {
                kind: weed_quantifier_kind(*kind),
                params: params.iter().map(|p| (p.clone(), untyped())).collect(),
                body: weed_expr(body, errors),
            }
        }
        SurfaceExprKind::Ascribe { expr, ty } => ExprKind::Ascribe {
            expr: weed_expr(expr, errors),
            ty: weed_type(ty),
        },
        SurfaceExprKind::UserError { message } => ExprKind::UserError { message: message.clone() },
    };
    Expr::new(kind, untyped(), span)
}

fn lattice_op_name(op: SurfaceLatticeOp) -> &'static str {
    op.function_name()
}

fn weed_unop(op: SurfaceUnOp) -> UnOp {
    match op {
        SurfaceUnOp::Neg => UnOp::Neg,
        SurfaceUnOp::Not => UnOp::Not,
    }
}

fn weed_binop(op: SurfaceBinOp) -> BinOp {
    match op {
        SurfaceBinOp::Add => BinOp::Add,
        SurfaceBinOp::Sub => BinOp::Sub,
        SurfaceBinOp::Mul => BinOp::Mul,
        SurfaceBinOp::Div => BinOp::Div,
        SurfaceBinOp::Mod => BinOp::Mod,
        SurfaceBinOp::Eq => BinOp::Eq,
        SurfaceBinOp::Neq => BinOp::Neq,
        SurfaceBinOp::Lt => BinOp::Lt,
        SurfaceBinOp::Leq => BinOp::Leq,
        SurfaceBinOp::Gt => BinOp::Gt,
        SurfaceBinOp::Geq => BinOp::Geq,
        SurfaceBinOp::And => BinOp::And,
        SurfaceBinOp::Or => BinOp::Or,
    }
}

fn weed_collection_kind(kind: SurfaceCollectionKind) -> CollectionKind {
    match kind {
        SurfaceCollectionKind::Option => CollectionKind::Option,
        SurfaceCollectionKind::List => CollectionKind::List,
        SurfaceCollectionKind::Vec => CollectionKind::Vec,
        SurfaceCollectionKind::Set => CollectionKind::Set,
    }
}

fn weed_quantifier_kind(kind: SurfaceQuantifierKind) -> QuantifierKind {
    match kind {
        SurfaceQuantifierKind::Existential => QuantifierKind::Existential,
        SurfaceQuantifierKind::Universal => QuantifierKind::Universal,
    }
}
