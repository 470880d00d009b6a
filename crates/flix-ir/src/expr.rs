//! The frozen IR expression language (§3 Data Model, "IR expressions").
//!
//! Every node carries its inferred [`Type`] and source [`Span`]. The
//! extended lattice operators (`⊑ ⊔ ⊓ ▽ △`) never appear as `Expr`
//! variants: the Weeder desugars them into ordinary [`ExprKind::App`]
//! calls of the qualified function with that operator's name (§4.1).

use flix_base::{Name, Span};

use crate::types::{FloatWidth, IntWidth, Type};

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Unit,
    Bool(bool),
    Char(char),
    Int(IntWidth, i64),
    BigInt(String),
    Float(FloatWidth, f64),
    Str(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Neq,
    Lt,
    Leq,
    Gt,
    Geq,
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    Option,
    List,
    Vec,
    Set,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantifierKind {
    Existential,
    Universal,
}

/// A pattern in a `match` arm. Linear by construction after weeding: no
/// variable name may repeat within one pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    Wildcard,
    Var(String),
    Literal(Literal),
    Tuple(Vec<Pattern>),
    Tag { tag: String, payload: Box<Pattern> },
}

#[derive(Debug, Clone)]
pub struct MatchRule {
    pub pattern: Pattern,
    pub body: Expr,
}

/// An IR expression: a [`ExprKind`] tagged with its inferred type and
/// source location.
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: Box<ExprKind>,
    pub ty: Type,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, ty: Type, span: Span) -> Self {
        Expr {
            kind: Box::new(kind),
            ty,
            span,
        }
    }
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    Literal(Literal),
    Var(Name),
    Lambda {
        params: Vec<(String, Type)>,
        body: Expr,
    },
    App {
        func: Expr,
        args: Vec<Expr>,
    },
    Unary {
        op: UnOp,
        operand: Expr,
    },
    Binary {
        op: BinOp,
        lhs: Expr,
        rhs: Expr,
    },
    If {
        cond: Expr,
        then_branch: Expr,
        else_branch: Expr,
    },
    Let {
        name: String,
        value: Expr,
        body: Expr,
    },
    Match {
        scrutinee: Expr,
        rules: Vec<MatchRule>,
    },
    Tag {
        enum_name: Name,
        tag: String,
        payload: Expr,
    },
    Tuple(Vec<Expr>),
    Collection {
        kind: CollectionKind,
        items: Vec<Expr>,
    },
    MapLiteral(Vec<(Expr, Expr)>),
    Quantifier {
        kind: QuantifierKind,
        params: Vec<(String, Type)>,
        body: Expr,
    },
    Ascribe {
        expr: Expr,
        ty: Type,
    },
    UserError {
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_expr() -> Expr {
        Expr::new(ExprKind::Literal(Literal::Unit), Type::Unit, Span::new(0, 2))
    }

    #[test]
    fn pattern_tag_wraps_payload() {
        let pat = Pattern::Tag {
            tag: "Some".into(),
            payload: Box::new(Pattern::Var("x".into())),
        };
        match pat {
            Pattern::Tag { tag, payload } => {
                assert_eq!(tag, "Some");
                assert_eq!(*payload, Pattern::Var("x".into()));
            }
            _ => panic!("expected Tag"),
        }
    }

    #[test]
    fn if_then_else_is_constructible() {
        let cond = unit_expr();
        let then_branch = unit_expr();
        let else_branch = unit_expr();
        let if_expr = Expr::new(
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            },
            Type::Unit,
            Span::new(0, 10),
        );
        assert!(matches!(*if_expr.kind, ExprKind::If { .. }));
    }
}
