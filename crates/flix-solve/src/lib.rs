#![cfg_attr(docsrs, feature(doc_cfg))]

//! # flix-solve
//!
//! The semi-naive Datalog-with-lattices solver (§4.5): seeds each table
//! with its declared facts, fires rules whose body touches a non-empty
//! delta, and inserts candidate rows under the lattice-aware rule —
//! `lub` at a Lattice-table's key, set-insert at a plain Relation —
//! until every delta is empty. `widen` is never consulted here; it is
//! exposed only to `flix-verify`'s ascending-chain proof obligations.

pub mod engine;
pub mod error;
pub mod eval;
pub mod index;
pub mod value;

pub use engine::{Engine, SolveResult, TableSnapshot};
pub use error::SolverError;
pub use value::Value;

use flix_ir::{Program, SymbolTable};

/// The default iteration cap (§6, `--iteration-cap`), used absent an
/// explicit `flix.toml`/CLI override.
pub const DEFAULT_ITERATION_CAP: usize = 1_000_000;

/// Runs `program` against the declarations in `table` to a fixpoint.
pub fn solve_program(program: &Program, table: &SymbolTable, iteration_cap: usize) -> Result<SolveResult, SolverError> {
    Engine::new(table, iteration_cap).run(program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flix_base::{Name, Span};
    use flix_ir::{Atom, BodyAtom, Decl, IntWidth, Literal, RelationDecl, Rule, Term, Type};

    fn edge_relation() -> RelationDecl {
        RelationDecl {
            name: Name::unqualified("Edge"),
            span: Span::new(0, 1),
            attributes: vec![("x".into(), Type::Int(IntWidth::W32)), ("y".into(), Type::Int(IntWidth::W32))],
            element: None,
        }
    }

    fn reach_relation() -> RelationDecl {
        RelationDecl {
            name: Name::unqualified("Reach"),
            span: Span::new(0, 1),
            attributes: vec![("x".into(), Type::Int(IntWidth::W32)), ("y".into(), Type::Int(IntWidth::W32))],
            element: None,
        }
    }

    fn fact(relation: &str, args: &[i64]) -> Rule {
        Rule {
            head: Atom::new(Name::unqualified(relation), args.iter().map(|n| Term::Lit(Literal::Int(IntWidth::W32, *n))).collect(), Span::new(0, 1)),
            body: Vec::new(),
            span: Span::new(0, 1),
        }
    }

    /// `Reach(x, y) :- Edge(x, y).`  `Reach(x, z) :- Edge(x, y), Reach(y, z).`
    fn transitive_closure_program() -> (Program, SymbolTable) {
        let mut table = SymbolTable::new();
        table.declare(Decl::Relation(edge_relation()));
        table.declare(Decl::Relation(reach_relation()));

        let mut program = Program::new();
        program.push(fact("Edge", &[1, 2]));
        program.push(fact("Edge", &[2, 3]));
        program.push(fact("Edge", &[3, 4]));

        program.push(Rule {
            head: Atom::new(Name::unqualified("Reach"), vec![Term::Var("x".into()), Term::Var("y".into())], Span::new(0, 1)),
            body: vec![BodyAtom::Relational(Atom::new(Name::unqualified("Edge"), vec![Term::Var("x".into()), Term::Var("y".into())], Span::new(0, 1)))],
            span: Span::new(0, 1),
        });
        program.push(Rule {
            head: Atom::new(Name::unqualified("Reach"), vec![Term::Var("x".into()), Term::Var("z".into())], Span::new(0, 1)),
            body: vec![
                BodyAtom::Relational(Atom::new(Name::unqualified("Edge"), vec![Term::Var("x".into()), Term::Var("y".into())], Span::new(0, 1))),
                BodyAtom::Relational(Atom::new(Name::unqualified("Reach"), vec![Term::Var("y".into()), Term::Var("z".into())], Span::new(0, 1))),
            ],
            span: Span::new(0, 1),
        });
        (program, table)
    }

    #[test]
    fn transitive_closure_reaches_fixpoint() {
        let (program, table) = transitive_closure_program();
        let result = solve_program(&program, &table, DEFAULT_ITERATION_CAP).unwrap();
        let reach = &result.tables[&Name::unqualified("Reach")];
        let pairs: std::collections::HashSet<(i64, i64)> = reach
            .rows
            .iter()
            .map(|r| match (&r[0], &r[1]) {
                (Value::Int(_, a), Value::Int(_, b)) => (*a, *b),
                _ => panic!("unexpected row shape"),
            })
            .collect();
        let expected: std::collections::HashSet<(i64, i64)> = [(1, 2), (2, 3), (3, 4), (1, 3), (2, 4), (1, 4)].into_iter().collect();
        assert_eq!(pairs, expected);
    }

    #[test]
    fn confluence_under_rule_order_permutation() {
        let (mut program, table) = transitive_closure_program();
        let baseline = solve_program(&program, &table, DEFAULT_ITERATION_CAP).unwrap();
        program.rules.reverse();
        let permuted = solve_program(&program, &table, DEFAULT_ITERATION_CAP).unwrap();

        for name in [Name::unqualified("Edge"), Name::unqualified("Reach")] {
            let mut a: Vec<String> = baseline.tables[&name].rows.iter().map(|r| r.iter().map(value::value_key).collect::<Vec<_>>().join(",")).collect();
            let mut b: Vec<String> = permuted.tables[&name].rows.iter().map(|r| r.iter().map(value::value_key).collect::<Vec<_>>().join(",")).collect();
            a.sort();
            b.sort();
            assert_eq!(a, b, "table {name} differs after rule-order permutation");
        }
    }

    #[test]
    fn non_terminating_lattice_hits_iteration_cap() {
        // An unbounded counting lattice over Int32 whose `lub` is `max`
        // and whose insertion target strictly grows every round.
        use flix_ir::{BoundedLatticeDecl, Expr, ExprKind, BinOp};

        let int_ty = Type::Int(IntWidth::W32);
        let max_body = Expr::new(
            ExprKind::If {
                cond: Expr::new(
                    ExprKind::Binary {
                        op: BinOp::Geq,
                        lhs: Expr::new(ExprKind::Var(Name::unqualified("a")), int_ty.clone(), Span::new(0, 1)),
                        rhs: Expr::new(ExprKind::Var(Name::unqualified("b")), int_ty.clone(), Span::new(0, 1)),
                    },
                    Type::Bool,
                    Span::new(0, 1),
                ),
                then_branch: Expr::new(ExprKind::Var(Name::unqualified("a")), int_ty.clone(), Span::new(0, 1)),
                else_branch: Expr::new(ExprKind::Var(Name::unqualified("b")), int_ty.clone(), Span::new(0, 1)),
            },
            int_ty.clone(),
            Span::new(0, 1),
        );
        let lub = Expr::new(
            ExprKind::Lambda { params: vec![("a".into(), int_ty.clone()), ("b".into(), int_ty.clone())], body: max_body },
            Type::Lambda(vec![int_ty.clone(), int_ty.clone()], Box::new(int_ty.clone())),
            Span::new(0, 1),
        );
        let leq_body = Expr::new(
            ExprKind::Binary {
                op: BinOp::Leq,
                lhs: Expr::new(ExprKind::Var(Name::unqualified("a")), int_ty.clone(), Span::new(0, 1)),
                rhs: Expr::new(ExprKind::Var(Name::unqualified("b")), int_ty.clone(), Span::new(0, 1)),
            },
            Type::Bool,
            Span::new(0, 1),
        );
        let leq = Expr::new(
            ExprKind::Lambda { params: vec![("a".into(), int_ty.clone()), ("b".into(), int_ty.clone())], body: leq_body },
            Type::Lambda(vec![int_ty.clone(), int_ty.clone()], Box::new(Type::Bool)),
            Span::new(0, 1),
        );
        let bot = Expr::new(ExprKind::Literal(Literal::Int(IntWidth::W32, i32::MIN as i64)), int_ty.clone(), Span::new(0, 1));
        let top = Expr::new(ExprKind::Literal(Literal::Int(IntWidth::W32, i32::MAX as i64)), int_ty.clone(), Span::new(0, 1));

        let mut table = SymbolTable::new();
        table.declare(Decl::BoundedLattice(BoundedLatticeDecl {
            name: Name::unqualified("Counter"),
            span: Span::new(0, 1),
            element_type: int_ty.clone(),
            bot,
            top,
            leq,
            lub,
            glb: Expr::new(ExprKind::Literal(Literal::Int(IntWidth::W32, 0)), int_ty.clone(), Span::new(0, 1)),
            widen: None,
        }));
        table.declare(Decl::Relation(RelationDecl {
            name: Name::unqualified("C"),
            span: Span::new(0, 1),
            attributes: vec![("k".into(), Type::Int(IntWidth::W32))],
            element: Some(("v".into(), int_ty.clone())),
        }));

        let mut program = Program::new();
        program.push(Rule {
            head: Atom::new(Name::unqualified("C"), vec![Term::Lit(Literal::Int(IntWidth::W32, 0)), Term::Lit(Literal::Int(IntWidth::W32, 1))], Span::new(0, 1)),
            body: Vec::new(),
            span: Span::new(0, 1),
        });
        // C(0, v+1) :- C(0, v).  Strictly increases every round; lub is
        // `max` so each insertion makes progress until the host integer
        // range saturates — comfortably past any reasonable iteration cap.
        program.push(Rule {
            head: Atom::new(
                Name::unqualified("C"),
                vec![Term::Lit(Literal::Int(IntWidth::W32, 0)), Term::Var("next".into())],
                Span::new(0, 1),
            ),
            body: vec![
                BodyAtom::Relational(Atom::new(Name::unqualified("C"), vec![Term::Lit(Literal::Int(IntWidth::W32, 0)), Term::Var("v".into())], Span::new(0, 1))),
                BodyAtom::Alias {
                    name: "next".into(),
                    term: Term::Binary(
                        BinOp::Add,
                        Box::new(Term::Var("v".into())),
                        Box::new(Term::Lit(Literal::Int(IntWidth::W32, 1))),
                    ),
                    span: Span::new(0, 1),
                },
            ],
            span: Span::new(0, 1),
        });

        let result = solve_program(&program, &table, 5);
        assert!(matches!(result, Err(SolverError::NonTerminating { iteration_cap: 5, .. })));
    }
}
