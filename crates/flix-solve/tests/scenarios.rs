//! End-to-end solver scenarios driven only through the public
//! `flix_solve::solve_program` entry point (§8 test scenarios, Universal
//! Property 1).

use std::collections::HashSet;

use flix_base::{Name, Span};
use flix_ir::{Atom, BinOp, BodyAtom, Decl, IntWidth, Literal, Program, RelationDecl, Rule, SymbolTable, Term, Type};
use flix_solve::{solve_program, value, DEFAULT_ITERATION_CAP};

fn int32() -> Type {
    Type::Int(IntWidth::W32)
}

fn int_lit(n: i64) -> Term {
    Term::Lit(Literal::Int(IntWidth::W32, n))
}

fn relation(name: &str, arity: usize) -> RelationDecl {
    RelationDecl {
        name: Name::unqualified(name),
        span: Span::new(0, 1),
        attributes: (0..arity).map(|i| (format!("a{i}"), int32())).collect(),
        element: None,
    }
}

fn fact(relation: &str, args: &[i64]) -> Rule {
    Rule {
        head: Atom::new(Name::unqualified(relation), args.iter().map(|n| int_lit(*n)).collect(), Span::new(0, 1)),
        body: Vec::new(),
        span: Span::new(0, 1),
    }
}

/// `Edge` facts plus the two-rule transitive-closure program used across
/// the permutation checks below, built fresh so each shuffle gets its own
/// `Program`/`SymbolTable` pair.
fn edge_and_reach_program() -> (Program, SymbolTable) {
    let mut table = SymbolTable::new();
    table.declare(Decl::Relation(relation("Edge", 2)));
    table.declare(Decl::Relation(relation("Reach", 2)));

    let mut program = Program::new();
    program.push(fact("Edge", &[1, 2]));
    program.push(fact("Edge", &[2, 3]));
    program.push(fact("Edge", &[3, 4]));
    program.push(fact("Edge", &[4, 1])); // closes a cycle so the closure is nontrivial

    program.push(Rule {
        head: Atom::new(Name::unqualified("Reach"), vec![Term::Var("x".into()), Term::Var("y".into())], Span::new(0, 1)),
        body: vec![BodyAtom::Relational(Atom::new(
            Name::unqualified("Edge"),
            vec![Term::Var("x".into()), Term::Var("y".into())],
            Span::new(0, 1),
        ))],
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

fn table_fingerprint(solved: &flix_solve::SolveResult, name: &Name) -> Vec<String> {
    let mut rows: Vec<String> = solved.tables[name]
        .rows
        .iter()
        .map(|r| r.iter().map(value::value_key).collect::<Vec<_>>().join(","))
        .collect();
    rows.sort();
    rows
}

/// Universal Property 1 (§8): the fixpoint a program reaches does not
/// depend on the order its rules are declared in. Checked over several
/// distinct permutations, not just a single reversal, since a reversal
/// alone can hide an order-dependent bug that only a 3-cycle exposes.
#[test]
fn confluence_holds_under_every_rule_order_permutation() {
    let (baseline_program, table) = edge_and_reach_program();
    let baseline = solve_program(&baseline_program, &table, DEFAULT_ITERATION_CAP).unwrap();
    let reach = Name::unqualified("Reach");
    let edge = Name::unqualified("Edge");
    let baseline_reach = table_fingerprint(&baseline, &reach);
    let baseline_edge = table_fingerprint(&baseline, &edge);

    // Every permutation of a 6-rule program (4 facts + 2 derived rules),
    // skipping the identity we already checked above.
    let permutations: Vec<Vec<usize>> = vec![
        vec![5, 4, 3, 2, 1, 0],
        vec![1, 0, 3, 2, 5, 4],
        vec![4, 5, 0, 1, 2, 3],
        vec![2, 3, 4, 5, 0, 1],
        vec![0, 2, 4, 1, 3, 5],
    ];

    for perm in &permutations {
        let (mut program, table) = edge_and_reach_program();
        let rules = std::mem::take(&mut program.rules);
        program.rules = perm.iter().map(|&i| rules[i].clone()).collect();

        let result = solve_program(&program, &table, DEFAULT_ITERATION_CAP).unwrap();
        assert_eq!(table_fingerprint(&result, &reach), baseline_reach, "Reach differs under permutation {perm:?}");
        assert_eq!(table_fingerprint(&result, &edge), baseline_edge, "Edge differs under permutation {perm:?}");
    }
}

/// S6-adjacent: a plain (non-lattice) relation that strictly grows every
/// round never reaches a fixpoint, so the iteration cap must trip rather
/// than let the engine spin forever.
#[test]
fn unbounded_relation_growth_hits_iteration_cap() {
    let mut table = SymbolTable::new();
    table.declare(Decl::Relation(relation("Count", 1)));

    let mut program = Program::new();
    program.push(fact("Count", &[0]));
    // Count(v + 1) :- Count(v).  There is no lattice here to join values
    // together, so every distinct integer the body produces becomes a new
    // row forever.
    program.push(Rule {
        head: Atom::new(Name::unqualified("Count"), vec![Term::Var("next".into())], Span::new(0, 1)),
        body: vec![
            BodyAtom::Relational(Atom::new(Name::unqualified("Count"), vec![Term::Var("v".into())], Span::new(0, 1))),
            BodyAtom::Alias {
                name: "next".into(),
                term: Term::Binary(BinOp::Add, Box::new(Term::Var("v".into())), Box::new(int_lit(1))),
                span: Span::new(0, 1),
            },
        ],
        span: Span::new(0, 1),
    });

    let result = solve_program(&program, &table, 10);
    assert!(matches!(result, Err(flix_solve::SolverError::NonTerminating { iteration_cap: 10, .. })));
}

/// A sanity check that the transitive closure over a cyclic graph reaches
/// every pair, confirming the baseline fixture used above is itself
/// well-formed before the permutation test leans on it.
#[test]
fn cyclic_graph_reaches_full_closure() {
    let (program, table) = edge_and_reach_program();
    let result = solve_program(&program, &table, DEFAULT_ITERATION_CAP).unwrap();
    let reach = &result.tables[&Name::unqualified("Reach")];
    let pairs: HashSet<(i64, i64)> = reach
        .rows
        .iter()
        .map(|r| match (&r[0], &r[1]) {
            (flix_solve::Value::Int(_, a), flix_solve::Value::Int(_, b)) => (*a, *b),
            _ => panic!("unexpected row shape"),
        })
        .collect();
    // A 4-node cycle reaches every ordered pair, including self-loops.
    let expected: HashSet<(i64, i64)> = (1..=4).flat_map(|a| (1..=4).map(move |b| (a, b))).collect();
    assert_eq!(pairs, expected);
}
