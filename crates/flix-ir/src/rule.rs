//! Datalog terms, atoms, and rules (§3 "Solver state", §4.5 input shape).
//!
//! A program is a set of facts (ground heads) and rules `H :- B₁, …, Bₙ`
//! where each body atom is a relational lookup, an alias binding, a
//! disequality, or a loop over a collection-valued term.

use flix_base::{Name, Span};

use crate::expr::{BinOp, Literal};

/// A term appearing in an atom's argument position.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Var(String),
    Lit(Literal),
    /// `_`, matches anything and binds nothing.
    Wildcard,
    /// A computed term, e.g. the `v + 1` an alias binding desugars to
    /// when it grows a value rather than just renaming it.
    Binary(BinOp, Box<Term>, Box<Term>),
}

impl Term {
    pub fn is_ground(&self) -> bool {
        match self {
            Term::Lit(_) => true,
            Term::Binary(_, lhs, rhs) => lhs.is_ground() && rhs.is_ground(),
            Term::Var(_) | Term::Wildcard => false,
        }
    }

    pub fn as_var(&self) -> Option<&str> {
        match self {
            Term::Var(v) => Some(v.as_str()),
            _ => None,
        }
    }
}

/// A relational lookup `predicate(t₁, …, tₙ)`.
#[derive(Debug, Clone)]
pub struct Atom {
    pub predicate: Name,
    pub terms: Vec<Term>,
    pub span: Span,
}

impl Atom {
    pub fn new(predicate: Name, terms: Vec<Term>, span: Span) -> Self {
        Atom { predicate, terms, span }
    }

    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().filter_map(Term::as_var)
    }

    pub fn is_ground(&self) -> bool {
        self.terms.iter().all(Term::is_ground)
    }
}

/// One body atom: a relational lookup, an alias binding, a disequality,
/// or a loop over a set/list-valued term.
#[derive(Debug, Clone)]
pub enum BodyAtom {
    Relational(Atom),
    /// `x = t` — binds `x` to the value of term `t`.
    Alias { name: String, term: Term, span: Span },
    /// `x ≠ y`.
    Disequality { lhs: Term, rhs: Term, span: Span },
    /// `x ∈ s` — iterates the collection-valued term `s`, binding `x`.
    Loop { var: String, set: Term, span: Span },
}

impl BodyAtom {
    /// `true` if this atom's satisfaction depends on `relation`'s current delta,
    /// i.e. it is a [`BodyAtom::Relational`] lookup against that table.
    pub fn mentions_relation(&self, relation: &Name) -> bool {
        matches!(self, BodyAtom::Relational(atom) if &atom.predicate == relation)
    }
}

/// A rule `head :- body₁, …, bodyₙ`. An empty body denotes a ground fact.
#[derive(Debug, Clone)]
pub struct Rule {
    pub head: Atom,
    pub body: Vec<BodyAtom>,
    pub span: Span,
}

impl Rule {
    pub fn is_fact(&self) -> bool {
        self.body.is_empty()
    }

    /// All relations referenced by a relational body atom, in body order.
    pub fn body_relations(&self) -> impl Iterator<Item = &Name> {
        self.body.iter().filter_map(|b| match b {
            BodyAtom::Relational(atom) => Some(&atom.predicate),
            _ => None,
        })
    }
}

/// A full Datalog-with-lattices program: declaration order is preserved
/// because it determines diagnostic and rule-firing order (§4.5, §5).
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub rules: Vec<Rule>,
}

impl Program {
    pub fn new() -> Self {
        Program { rules: Vec::new() }
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }
}
