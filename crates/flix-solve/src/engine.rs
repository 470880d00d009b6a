//! The semi-naive Datalog-with-lattices engine (§4.5).

use std::collections::{HashMap, HashSet};

use flix_base::{Name, Span};
use flix_ir::{Atom, BodyAtom, BoundedLatticeDecl, Decl, Program, RelationDecl, Schema, SymbolTable, Term};
use log::{debug, trace};

use crate::error::{EvalError, SolverError};
use crate::eval::{apply, binop, eval};
use crate::index::select_index;
use crate::value::{value_key, Env, Value};

/// Whether a relational body atom is joined against the *new* rows added
/// last round (the semi-naive delta restriction) or the full fact set
/// accumulated so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Delta,
    Full,
}

struct IndexEntry {
    positions: Vec<usize>,
    buckets: HashMap<String, Vec<usize>>,
}

struct TableState<'a> {
    schema: Schema,
    bl: Option<&'a BoundedLatticeDecl>,
    rows: Vec<Vec<Value>>,
    relation_keys: HashSet<String>,
    lattice_keys: HashMap<String, usize>,
    indices: Vec<IndexEntry>,
    delta: HashSet<usize>,
}

impl<'a> TableState<'a> {
    fn new(schema: Schema, bl: Option<&'a BoundedLatticeDecl>) -> Self {
        let indices = schema
            .indices
            .iter()
            .flat_map(|idx| idx.keys.iter())
            .filter_map(|key| {
                let positions: Option<Vec<usize>> =
                    key.iter().map(|attr| schema.attribute_names().iter().position(|n| *n == attr)).collect();
                positions.map(|positions| IndexEntry { positions, buckets: HashMap::new() })
            })
            .collect();
        TableState { schema, bl, rows: Vec::new(), relation_keys: HashSet::new(), lattice_keys: HashMap::new(), indices, delta: HashSet::new() }
    }

    fn is_lattice(&self) -> bool {
        self.bl.is_some()
    }

    fn record_in_indices(&mut self, row_idx: usize) {
        let row = self.rows[row_idx].clone();
        for idx in &mut self.indices {
            let key = idx.positions.iter().map(|&p| value_key(&row[p])).collect::<Vec<_>>().join("|");
            idx.buckets.entry(key).or_default().push(row_idx);
        }
    }

    fn row_key(row: &[Value]) -> String {
        row.iter().map(value_key).collect::<Vec<_>>().join("|")
    }
}

pub struct Engine<'a> {
    table: &'a SymbolTable,
    iteration_cap: usize,
}

/// Final state of one table after `run` reaches its fixpoint.
#[derive(Debug, Clone)]
pub struct TableSnapshot {
    pub rows: Vec<Vec<Value>>,
}

#[derive(Debug, Default)]
pub struct SolveResult {
    pub tables: HashMap<Name, TableSnapshot>,
}

fn find_bounded_lattice_for<'a>(table: &'a SymbolTable, ty: &flix_ir::Type) -> Option<&'a BoundedLatticeDecl> {
    for name in table.names() {
        for decl in table.lookup(name) {
            if let Decl::BoundedLattice(bl) = decl {
                if &bl.element_type == ty {
                    return Some(bl);
                }
            }
        }
    }
    None
}

fn build_schemas(table: &SymbolTable) -> HashMap<Name, Schema> {
    let mut schemas: HashMap<Name, Schema> = HashMap::new();
    for name in table.names() {
        for decl in table.lookup(name) {
            if let Decl::Relation(r) = decl {
                schemas.insert(r.name.clone(), Schema::new(r.clone()));
            }
        }
    }
    for name in table.names() {
        for decl in table.lookup(name) {
            if let Decl::Index(idx) = decl {
                if let Some(schema) = schemas.get_mut(&idx.table) {
                    schema.indices.push(idx.clone());
                }
            }
        }
    }
    schemas
}

fn term_value(term: &Term, env: &Env, span: Span) -> Result<Value, EvalError> {
    match term {
        Term::Lit(lit) => Ok(crate::value::literal_to_value(lit)),
        Term::Var(name) => env.get(name).cloned().ok_or_else(|| EvalError::Internal { message: format!("unbound variable `{name}` in rule body"), span }),
        Term::Wildcard => Err(EvalError::Internal { message: "wildcard has no value".into(), span }),
        Term::Binary(op, lhs, rhs) => {
            let l = term_value(lhs, env, span)?;
            let r = term_value(rhs, env, span)?;
            binop(*op, l, r, span)
        }
    }
}

impl<'a> Engine<'a> {
    pub fn new(table: &'a SymbolTable, iteration_cap: usize) -> Self {
        Engine { table, iteration_cap }
    }

    fn build_tables(&self) -> HashMap<Name, TableState<'a>> {
        let mut tables = HashMap::new();
        for (name, schema) in build_schemas(self.table) {
            let bl = schema.relation.element.as_ref().and_then(|(_, ty)| find_bounded_lattice_for(self.table, ty));
            tables.insert(name, TableState::new(schema, bl));
        }
        tables
    }

    /// Runs the program to a fixpoint and returns the final fact sets.
    pub fn run(&self, program: &Program) -> Result<SolveResult, SolverError> {
        let mut tables = self.build_tables();

        for rule in &program.rules {
            if rule.is_fact() {
                let row = self.eval_head_row(&rule.head, &Env::new())?;
                if let Some(t) = tables.get_mut(&rule.head.predicate) {
                    let new_idx = self.insert_row(t, row)?;
                    if let Some(idx) = new_idx {
                        t.delta.insert(idx);
                    }
                }
            }
        }

        let mut round = 0usize;
        loop {
            let any_delta = tables.values().any(|t| !t.delta.is_empty());
            if !any_delta {
                break;
            }
            round += 1;
            if round > self.iteration_cap {
                let partial_state = summarize(&tables);
                return Err(SolverError::NonTerminating { iteration_cap: self.iteration_cap, partial_state, span: Span::default() });
            }
            debug!("semi-naive round {round}");

            let snapshot_delta: HashMap<Name, HashSet<usize>> = tables.iter().map(|(n, t)| (n.clone(), t.delta.clone())).collect();
            let mut pending: HashMap<Name, Vec<Vec<Value>>> = HashMap::new();

            for rule in &program.rules {
                if rule.is_fact() {
                    continue;
                }
                let relation_positions: Vec<usize> =
                    rule.body.iter().enumerate().filter_map(|(i, b)| matches!(b, BodyAtom::Relational(_)).then_some(i)).collect();
                let touches_delta = relation_positions.iter().any(|&i| match &rule.body[i] {
                    BodyAtom::Relational(a) => snapshot_delta.get(&a.predicate).map(|d| !d.is_empty()).unwrap_or(false),
                    _ => false,
                });
                if !touches_delta {
                    continue;
                }
                for &delta_pos in &relation_positions {
                    let eligible = match &rule.body[delta_pos] {
                        BodyAtom::Relational(a) => snapshot_delta.get(&a.predicate).map(|d| !d.is_empty()).unwrap_or(false),
                        _ => false,
                    };
                    if !eligible {
                        continue;
                    }
                    let reordered = reorder_body(&rule.body, delta_pos);
                    let envs = self.evaluate_body(&reordered, &tables, &snapshot_delta)?;
                    for env in envs {
                        let row = self.eval_head_row(&rule.head, &env)?;
                        pending.entry(rule.head.predicate.clone()).or_default().push(row);
                    }
                }
            }

            for t in tables.values_mut() {
                t.delta.clear();
            }
            for (name, rows) in pending {
                if let Some(t) = tables.get_mut(&name) {
                    for row in rows {
                        if let Some(idx) = self.insert_row(t, row)? {
                            t.delta.insert(idx);
                        }
                    }
                }
            }
        }

        Ok(SolveResult { tables: tables.into_iter().map(|(n, t)| (n, TableSnapshot { rows: t.rows })).collect() })
    }

    fn eval_head_row(&self, head: &Atom, env: &Env) -> Result<Vec<Value>, SolverError> {
        head.terms.iter().map(|t| term_value(t, env, head.span).map_err(SolverError::from)).collect()
    }

    /// Inserts `row` under the lattice-aware rule (§4.5 step 3). Returns
    /// `Some(row_index)` if the row set changed (new fact, or a strictly
    /// larger joined value), `None` if the insert made no progress.
    fn insert_row(&self, t: &mut TableState<'a>, row: Vec<Value>) -> Result<Option<usize>, SolverError> {
        if !t.is_lattice() {
            let key = TableState::row_key(&row);
            if t.relation_keys.contains(&key) {
                return Ok(None);
            }
            t.relation_keys.insert(key);
            let idx = t.rows.len();
            t.rows.push(row);
            t.record_in_indices(idx);
            return Ok(Some(idx));
        }

        let bl = t.bl.expect("lattice table always has a BoundedLattice instance once typed");
        let key_len = row.len() - 1;
        let key_str = row[..key_len].iter().map(value_key).collect::<Vec<_>>().join("|");
        let new_value = row[key_len].clone();

        if let Some(&existing_idx) = t.lattice_keys.get(&key_str) {
            let current = t.rows[existing_idx][key_len].clone();
            let joined = self.lattice_lub(bl, current.clone(), new_value, t.schema.relation.name.to_string())?;
            let no_progress = self.lattice_leq(bl, joined.clone(), current)?;
            if no_progress {
                return Ok(None);
            }
            t.rows[existing_idx][key_len] = joined;
            Ok(Some(existing_idx))
        } else {
            let bottom = eval(&bl.bot, &Env::new(), self.table).map_err(SolverError::from)?;
            let joined = self.lattice_lub(bl, bottom.clone(), new_value, t.schema.relation.name.to_string())?;
            let no_progress = self.lattice_leq(bl, joined.clone(), bottom)?;
            if no_progress {
                return Ok(None);
            }
            let idx = t.rows.len();
            let mut full_row = row[..key_len].to_vec();
            full_row.push(joined);
            t.rows.push(full_row);
            t.lattice_keys.insert(key_str, idx);
            t.record_in_indices(idx);
            Ok(Some(idx))
        }
    }

    fn lattice_lub(&self, bl: &BoundedLatticeDecl, a: Value, b: Value, table_name: String) -> Result<Value, SolverError> {
        let f = eval(&bl.lub, &Env::new(), self.table).map_err(SolverError::from)?;
        apply(f, vec![a.clone(), b.clone()], self.table, bl.span).map_err(|e| {
            if matches!(e, EvalError::Internal { .. }) {
                SolverError::LatticeJoinTypeMismatch { table: table_name, lhs_type: format!("{a:?}"), rhs_type: format!("{b:?}"), span: bl.span }
            } else {
                e.into()
            }
        })
    }

    fn lattice_leq(&self, bl: &BoundedLatticeDecl, a: Value, b: Value) -> Result<bool, SolverError> {
        let f = eval(&bl.leq, &Env::new(), self.table).map_err(SolverError::from)?;
        let v = apply(f, vec![a, b], self.table, bl.span).map_err(SolverError::from)?;
        v.as_bool().ok_or_else(|| SolverError::UserError { message: "`leq` did not return Bool".into(), span: bl.span })
    }

    fn evaluate_body(
        &self,
        body: &[BodyAtom],
        tables: &HashMap<Name, TableState<'a>>,
        snapshot_delta: &HashMap<Name, HashSet<usize>>,
    ) -> Result<Vec<Env>, SolverError> {
        let mut envs = vec![Env::new()];
        for (pos, atom) in body.iter().enumerate() {
            let mut next = Vec::new();
            for env in &envs {
                match atom {
                    BodyAtom::Relational(a) => {
                        let source = if pos == 0 { Source::Delta } else { Source::Full };
                        next.extend(self.evaluate_relational_atom(a, env, tables, snapshot_delta, source)?);
                    }
                    BodyAtom::Alias { name, term, span } => {
                        let v = term_value(term, env, *span).map_err(SolverError::from)?;
                        let mut e2 = env.clone();
                        e2.insert(name.clone(), v);
                        next.push(e2);
                    }
                    BodyAtom::Disequality { lhs, rhs, span } => {
                        let lv = term_value(lhs, env, *span).map_err(SolverError::from)?;
                        let rv = term_value(rhs, env, *span).map_err(SolverError::from)?;
                        if lv != rv {
                            next.push(env.clone());
                        }
                    }
                    BodyAtom::Loop { var, set, span } => {
                        let sv = term_value(set, env, *span).map_err(SolverError::from)?;
                        let items = match sv {
                            Value::Collection(_, items) => items,
                            Value::Map(pairs) => pairs.into_iter().map(|(k, v)| Value::Tuple(vec![k, v])).collect(),
                            other => return Err(SolverError::UserError { message: format!("loop over non-iterable value {other:?}"), span: *span }),
                        };
                        for item in items {
                            let mut e2 = env.clone();
                            e2.insert(var.clone(), item);
                            next.push(e2);
                        }
                    }
                }
            }
            envs = next;
            if envs.is_empty() {
                break;
            }
        }
        Ok(envs)
    }

    fn evaluate_relational_atom(
        &self,
        atom: &Atom,
        env: &Env,
        tables: &HashMap<Name, TableState<'a>>,
        snapshot_delta: &HashMap<Name, HashSet<usize>>,
        source: Source,
    ) -> Result<Vec<Env>, SolverError> {
        let Some(t) = tables.get(&atom.predicate) else {
            return Err(SolverError::UserError { message: format!("reference to undeclared table `{}`", atom.predicate), span: atom.span });
        };

        let mut bound_positions = Vec::new();
        let mut bound_values: HashMap<usize, Value> = HashMap::new();
        for (i, term) in atom.terms.iter().enumerate() {
            match term {
                Term::Lit(lit) => {
                    bound_positions.push(i);
                    bound_values.insert(i, crate::value::literal_to_value(lit));
                }
                Term::Var(name) => {
                    if let Some(v) = env.get(name) {
                        bound_positions.push(i);
                        bound_values.insert(i, v.clone());
                    }
                }
                Term::Wildcard => {}
                Term::Binary(..) => {
                    if let Ok(v) = term_value(term, env, atom.span) {
                        bound_positions.push(i);
                        bound_values.insert(i, v);
                    }
                }
            }
        }

        let candidates: Vec<usize> = match source {
            Source::Delta => {
                let delta = snapshot_delta.get(&atom.predicate).cloned().unwrap_or_default();
                let mut v: Vec<usize> = delta.into_iter().collect();
                v.sort_unstable();
                v
            }
            Source::Full => match select_index(&t.schema, &bound_positions) {
                Some(selected) => {
                    trace!("table {} using declared index {}", atom.predicate, selected.index_name);
                    let key = selected.positions.iter().map(|&p| value_key(&bound_values[&p])).collect::<Vec<_>>().join("|");
                    t.indices
                        .iter()
                        .find(|e| e.positions == selected.positions)
                        .and_then(|e| e.buckets.get(&key))
                        .cloned()
                        .unwrap_or_default()
                }
                None => {
                    trace!("table {} has no usable index, falling back to scan", atom.predicate);
                    (0..t.rows.len()).collect()
                }
            },
        };

        let mut out = Vec::new();
        'rows: for idx in candidates {
            let Some(row) = t.rows.get(idx) else { continue };
            let mut new_env = env.clone();
            for (i, term) in atom.terms.iter().enumerate() {
                match term {
                    Term::Lit(lit) => {
                        if crate::value::literal_to_value(lit) != row[i] {
                            continue 'rows;
                        }
                    }
                    Term::Var(name) => match env.get(name) {
                        Some(bound) if bound != &row[i] => continue 'rows,
                        Some(_) => {}
                        None => {
                            new_env.insert(name.clone(), row[i].clone());
                        }
                    },
                    Term::Wildcard => {}
                    Term::Binary(..) => {
                        let v = term_value(term, &new_env, atom.span).map_err(SolverError::from)?;
                        if v != row[i] {
                            continue 'rows;
                        }
                    }
                }
            }
            out.push(new_env);
        }
        Ok(out)
    }
}

fn reorder_body(body: &[BodyAtom], first: usize) -> Vec<BodyAtom> {
    let mut out = Vec::with_capacity(body.len());
    out.push(body[first].clone());
    out.extend(body.iter().enumerate().filter(|&(i, _)| i != first).map(|(_, b)| b.clone()));
    out
}

fn summarize(tables: &HashMap<Name, TableState<'_>>) -> String {
    tables
        .iter()
        .filter(|(_, t)| !t.delta.is_empty())
        .map(|(name, t)| format!("{name}: {} row(s) in last delta", t.delta.len()))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use flix_base::Span;
    use flix_ir::{BoundedLatticeDecl, Expr, ExprKind, IntWidth, Literal, Pattern, MatchRule, Type};

    fn sign_lattice() -> BoundedLatticeDecl {
        // Sign = {Bot, Neg, Zer, Pos, Top}; lub via a decision table on tag pairs.
        let unit = || Expr::new(ExprKind::Literal(Literal::Unit), Type::Unit, Span::new(0, 1));
        let tag = |t: &str| Expr::new(ExprKind::Tag { enum_name: Name::unqualified("Sign"), tag: t.into(), payload: unit() }, Type::Native(Name::unqualified("Sign")), Span::new(0, 1));
        let sign_ty = Type::Native(Name::unqualified("Sign"));

        let lub_body = Expr::new(
            ExprKind::Match {
                scrutinee: Expr::new(ExprKind::Tuple(vec![
                    Expr::new(ExprKind::Var(Name::unqualified("a")), sign_ty.clone(), Span::new(0, 1)),
                    Expr::new(ExprKind::Var(Name::unqualified("b")), sign_ty.clone(), Span::new(0, 1)),
                ]), Type::Tuple(vec![sign_ty.clone(), sign_ty.clone()]), Span::new(0, 1)),
                rules: vec![
                    MatchRule {
                        pattern: Pattern::Tuple(vec![Pattern::Tag { tag: "Bot".into(), payload: Box::new(Pattern::Wildcard) }, Pattern::Var("x".into())]),
                        body: Expr::new(ExprKind::Var(Name::unqualified("x")), sign_ty.clone(), Span::new(0, 1)),
                    },
                    MatchRule {
                        pattern: Pattern::Tuple(vec![Pattern::Var("x".into()), Pattern::Tag { tag: "Bot".into(), payload: Box::new(Pattern::Wildcard) }]),
                        body: Expr::new(ExprKind::Var(Name::unqualified("x")), sign_ty.clone(), Span::new(0, 1)),
                    },
                    MatchRule {
                        pattern: Pattern::Tuple(vec![Pattern::Tag { tag: "Neg".into(), payload: Box::new(Pattern::Wildcard) }, Pattern::Tag { tag: "Neg".into(), payload: Box::new(Pattern::Wildcard) }]),
                        body: tag("Neg"),
                    },
                    MatchRule {
                        pattern: Pattern::Tuple(vec![Pattern::Wildcard, Pattern::Wildcard]),
                        body: tag("Top"),
                    },
                ],
            },
            sign_ty.clone(),
            Span::new(0, 1),
        );
        let lub = Expr::new(ExprKind::Lambda { params: vec![("a".into(), sign_ty.clone()), ("b".into(), sign_ty.clone())], body: lub_body }, Type::Lambda(vec![sign_ty.clone(), sign_ty.clone()], Box::new(sign_ty.clone())), Span::new(0, 1));

        let leq_body = Expr::new(ExprKind::Binary { op: flix_ir::BinOp::Eq, lhs: Expr::new(ExprKind::Var(Name::unqualified("a")), sign_ty.clone(), Span::new(0, 1)), rhs: Expr::new(ExprKind::Var(Name::unqualified("b")), sign_ty.clone(), Span::new(0, 1)) }, Type::Bool, Span::new(0, 1));
        let leq = Expr::new(ExprKind::Lambda { params: vec![("a".into(), sign_ty.clone()), ("b".into(), sign_ty.clone())], body: leq_body }, Type::Lambda(vec![sign_ty.clone(), sign_ty.clone()], Box::new(Type::Bool)), Span::new(0, 1));

        BoundedLatticeDecl {
            name: Name::unqualified("Sign"),
            span: Span::new(0, 1),
            element_type: sign_ty.clone(),
            bot: tag("Bot"),
            top: tag("Top"),
            leq,
            lub: lub.clone(),
            glb: lub,
            widen: None,
        }
    }

    fn int_relation(name: &str) -> RelationDecl {
        RelationDecl { name: Name::unqualified(name), span: Span::new(0, 1), attributes: vec![("x".into(), Type::Int(IntWidth::W32))], element: None }
    }

    #[test]
    fn strict_sign_join_reaches_top() {
        let mut symtab = SymbolTable::new();
        symtab.declare(Decl::BoundedLattice(sign_lattice()));
        let sign_ty = Type::Native(Name::unqualified("Sign"));
        symtab.declare(Decl::Relation(RelationDecl {
            name: Name::unqualified("V"),
            span: Span::new(0, 1),
            attributes: vec![("x".into(), Type::Int(IntWidth::W32))],
            element: Some(("v".into(), sign_ty.clone())),
        }));

        // `Term::Lit` has no Tag variant, so facts carrying lattice tag
        // values can't be expressed as zero-body `Rule`s in this test;
        // exercise the engine's insert/lub path directly instead.
        let engine = Engine::new(&symtab, 1_000_000);
        let mut tables = engine.build_tables();
        let neg = Value::Tag { tag: "Neg".into(), payload: Box::new(Value::Unit) };
        let pos = Value::Tag { tag: "Pos".into(), payload: Box::new(Value::Unit) };
        let t = tables.get_mut(&Name::unqualified("V")).unwrap();
        assert!(t.is_lattice(), "V must be recognized as a lattice-table");

        let idx1 = engine.insert_row(t, vec![Value::Int(IntWidth::W32, 1), neg]).unwrap();
        assert!(idx1.is_some());
        let idx2 = engine.insert_row(t, vec![Value::Int(IntWidth::W32, 1), pos]).unwrap();
        assert!(idx2.is_some());
        assert_eq!(idx1, idx2, "second insert joins into the same row");
        let row = &t.rows[idx2.unwrap()];
        assert_eq!(row[1], Value::Tag { tag: "Top".into(), payload: Box::new(Value::Unit) });
    }

    #[test]
    fn bottom_value_insertion_on_fresh_key_is_suppressed() {
        let mut symtab = SymbolTable::new();
        symtab.declare(Decl::BoundedLattice(sign_lattice()));
        let sign_ty = Type::Native(Name::unqualified("Sign"));
        symtab.declare(Decl::Relation(RelationDecl {
            name: Name::unqualified("V"),
            span: Span::new(0, 1),
            attributes: vec![("x".into(), Type::Int(IntWidth::W32))],
            element: Some(("v".into(), sign_ty)),
        }));

        let engine = Engine::new(&symtab, 1_000_000);
        let mut tables = engine.build_tables();
        let bot = Value::Tag { tag: "Bot".into(), payload: Box::new(Value::Unit) };
        let t = tables.get_mut(&Name::unqualified("V")).unwrap();

        let idx = engine.insert_row(t, vec![Value::Int(IntWidth::W32, 1), bot]).unwrap();
        assert!(idx.is_none(), "a fresh key joining to bottom must not create a row or delta entry");
        assert!(t.rows.is_empty(), "no row should have been stored for a bottom value");
    }

    #[test]
    fn relational_insert_dedups_identical_rows() {
        let mut symtab = SymbolTable::new();
        symtab.declare(Decl::Relation(int_relation("R")));
        let engine = Engine::new(&symtab, 1_000_000);
        let mut tables = engine.build_tables();
        let t = tables.get_mut(&Name::unqualified("R")).unwrap();
        let first = engine.insert_row(t, vec![Value::Int(IntWidth::W32, 5)]).unwrap();
        let second = engine.insert_row(t, vec![Value::Int(IntWidth::W32, 5)]).unwrap();
        assert!(first.is_some());
        assert!(second.is_none());
    }
}
