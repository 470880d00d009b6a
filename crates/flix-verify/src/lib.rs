#![cfg_attr(docsrs, feature(doc_cfg))]

//! # flix-verify
//!
//! SMT-backed discharge of algebraic laws over lattice and function
//! declarations (§4.6): every `BoundedLattice` instance is checked against
//! the partial-order and semilattice laws of §4.4 automatically, and every
//! `@commutative`/`@associative`/`@monotone`/`@strict`-annotated function is
//! checked against its own declared obligation. A law's body is translated
//! into a closed formula by [`encode`], then discharged by [`solver`]
//! against Z3: assert the negation, check UNSAT, and unsatisfiability means
//! the law is valid.
//!
//! This crate depends only on the frozen IR (`flix-ir`) and `flix-base`; it
//! has no knowledge of the Weeder/Resolver/Typer/Simplifier pipeline or the
//! Solver's fixpoint algorithm.

pub mod encode;
pub mod error;
pub mod ir;
pub mod law;
pub mod solver;

pub use encode::EnumIndex;
pub use error::{CounterExample, VerifyError};
pub use ir::{VerifyExpr, VerifyOp, VerifyType};
pub use law::{Obligation, ObligationError};
pub use solver::Outcome;

use flix_base::Name;
use flix_ir::{Decl, LawKind, SymbolTable};

/// The default per-obligation Z3 timeout (§6 `flix verify`), absent an
/// explicit `flix.toml`/CLI override.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// One law obligation's outcome, reported against the declaration it was checked on.
#[derive(Debug, Clone, PartialEq)]
pub struct LawReport {
    pub subject: Name,
    pub kind: LawKind,
    pub outcome: Result<Outcome, VerifyError>,
}

/// Builds the enum tag index from every `Enum` declaration in `table`, for
/// use by [`encode`] when a law's formula mentions a tagged value.
pub fn build_enum_index(table: &SymbolTable) -> EnumIndex {
    let mut enums = EnumIndex::new();
    for name in table.names() {
        for decl in table.lookup(name) {
            if let Decl::Enum(e) = decl {
                enums.register(&e.name, e.tag_names().map(str::to_string));
            }
        }
    }
    enums
}

/// Discharges every lattice-class and annotated-function law obligation
/// declared in `table`, each against a fresh Z3 instance bounded by `timeout_ms`.
pub fn verify_program(table: &SymbolTable, timeout_ms: u64) -> Vec<LawReport> {
    log::debug!("verify: timeout {timeout_ms}ms");
    let enums = build_enum_index(table);
    law::collect_obligations(table)
        .into_iter()
        .map(|obligation| {
            let subject = obligation.subject().clone();
            let kind = obligation.kind();
            let outcome = law::build_formula(&obligation, table, &enums)
                .map_err(|source| VerifyError::Obligation { subject: subject.to_string(), kind, source })
                .map(|(formula, free_vars)| solver::discharge(&formula, &free_vars, timeout_ms));
            LawReport { subject, kind, outcome }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use flix_base::Span;
    use flix_ir::{BinOp, BoundedLatticeDecl, Expr, ExprKind, IntWidth, Literal, RelationDecl, Type};

    fn int_ty() -> Type {
        Type::Int(IntWidth::W32)
    }

    fn var(name: &str, ty: Type) -> Expr {
        Expr::new(ExprKind::Var(flix_base::Name::unqualified(name)), ty, Span::new(0, 1))
    }

    fn max_lattice() -> BoundedLatticeDecl {
        let ity = int_ty();
        let lub_body = Expr::new(
            ExprKind::If {
                cond: Expr::new(
                    ExprKind::Binary { op: BinOp::Geq, lhs: var("a", ity.clone()), rhs: var("b", ity.clone()) },
                    Type::Bool,
                    Span::new(0, 1),
                ),
                then_branch: var("a", ity.clone()),
                else_branch: var("b", ity.clone()),
            },
            ity.clone(),
            Span::new(0, 1),
        );
        let lub = Expr::new(
            ExprKind::Lambda { params: vec![("a".into(), ity.clone()), ("b".into(), ity.clone())], body: lub_body },
            Type::Lambda(vec![ity.clone(), ity.clone()], Box::new(ity.clone())),
            Span::new(0, 1),
        );
        let leq_body =
            Expr::new(ExprKind::Binary { op: BinOp::Leq, lhs: var("a", ity.clone()), rhs: var("b", ity.clone()) }, Type::Bool, Span::new(0, 1));
        let leq = Expr::new(
            ExprKind::Lambda { params: vec![("a".into(), ity.clone()), ("b".into(), ity.clone())], body: leq_body },
            Type::Lambda(vec![ity.clone(), ity.clone()], Box::new(Type::Bool)),
            Span::new(0, 1),
        );
        let glb_body =
            Expr::new(ExprKind::Binary { op: BinOp::Leq, lhs: var("a", ity.clone()), rhs: var("b", ity.clone()) }, Type::Bool, Span::new(0, 1));
        let glb = Expr::new(
            ExprKind::Lambda { params: vec![("a".into(), ity.clone()), ("b".into(), ity.clone())], body: glb_body },
            Type::Lambda(vec![ity.clone(), ity.clone()], Box::new(Type::Bool)),
            Span::new(0, 1),
        );
        BoundedLatticeDecl {
            name: flix_base::Name::unqualified("MaxLattice"),
            span: Span::new(0, 1),
            element_type: ity.clone(),
            bot: Expr::new(ExprKind::Literal(Literal::Int(IntWidth::W32, i32::MIN as i64)), ity.clone(), Span::new(0, 1)),
            top: Expr::new(ExprKind::Literal(Literal::Int(IntWidth::W32, i32::MAX as i64)), ity, Span::new(0, 1)),
            leq,
            lub,
            glb,
            widen: None,
        }
    }

    #[test]
    fn max_lattice_passes_its_commutative_and_idempotent_laws() {
        let mut table = SymbolTable::new();
        table.declare(Decl::BoundedLattice(max_lattice()));
        table.declare(Decl::Relation(RelationDecl {
            name: flix_base::Name::unqualified("Unused"),
            span: Span::new(0, 1),
            attributes: vec![("x".into(), int_ty())],
            element: None,
        }));

        let reports = verify_program(&table, 5000);
        assert!(!reports.is_empty());

        let commutative_lub = reports
            .iter()
            .find(|r| r.kind == LawKind::Commutative && r.subject == flix_base::Name::unqualified("MaxLattice"))
            .expect("commutative obligation over MaxLattice's lub/glb");
        assert_eq!(commutative_lub.outcome, Ok(Outcome::Proved));

        assert!(
            reports.iter().all(|r| r.kind != LawKind::AscendingChain),
            "no BoundedLattice declares a height function, so AscendingChain is never collected as an obligation"
        );
    }
}
