//! Rule weeding: alias-map collection and head-predicate validation.

use std::collections::HashMap;

use flix_base::{Name, Span};
use flix_ir::surface::{SurfaceAtom, SurfaceBodyAtom, SurfaceHead, SurfaceRule, SurfaceTerm, SurfaceTermKind};
use flix_ir::{Atom, BodyAtom, Diagnostics, Rule, Term};

use crate::error::WeederError;

fn qualified_name(path: &[String]) -> Name {
    let (leaf, namespace) = path.split_last().expect("non-empty path");
    Name::from_segments(namespace.to_vec(), leaf.clone())
}

fn weed_term(term: &SurfaceTerm, errors: &mut Diagnostics<WeederError>) -> Term {
    match &term.kind {
        SurfaceTermKind::Var(v) => Term::Var(v.clone()),
        SurfaceTermKind::Lit(lit) => {
            Term::Lit(crate::literal::weed_literal(
                lit,
                flix_ir::IntWidth::W32,
                flix_ir::FloatWidth::W64,
                term.span,
                errors,
            ))
        }
        SurfaceTermKind::Wildcard => Term::Wildcard,
    }
}

fn weed_atom(atom: &SurfaceAtom, errors: &mut Diagnostics<WeederError>) -> Atom {
    Atom::new(
        qualified_name(&atom.predicate),
        atom.terms.iter().map(|t| weed_term(t, errors)).collect(),
        atom.span,
    )
}

/// Weeds a rule's body, collecting `ident = term` aliases into a map and
/// reporting [`WeederError::DuplicateAlias`] for every repeat name
/// (accumulated, per the design decision in the duplicate-alias note).
pub fn weed_rule(surface: &SurfaceRule, errors: &mut Diagnostics<WeederError>) -> Rule {
    let mut aliases: HashMap<String, Span> = HashMap::new();
    let body: Vec<BodyAtom> = surface
        .body
        .iter()
        .map(|b| match b {
            SurfaceBodyAtom::Atom(a) => BodyAtom::Relational(weed_atom(a, errors)),
            SurfaceBodyAtom::Alias { name, term, span } => {
                if let Some(_first) = aliases.get(name) {
                    errors.push(WeederError::DuplicateAlias {
                        name: name.clone(),
                        first: *aliases.get(name).unwrap(),
                        second: *span,
                    });
                } else {
                    aliases.insert(name.clone(), *span);
                }
                BodyAtom::Alias { name: name.clone(), term: weed_term(term, errors), span: *span }
            }
            SurfaceBodyAtom::Disequality { lhs, rhs, span } => BodyAtom::Disequality {
                lhs: weed_term(lhs, errors),
                rhs: weed_term(rhs, errors),
                span: *span,
            },
            SurfaceBodyAtom::Loop { var, set, span } => {
                BodyAtom::Loop { var: var.clone(), set: weed_term(set, errors), span: *span }
            }
        })
        .collect();

    let head = match &surface.head {
        SurfaceHead::Atom(a) => weed_atom(a, errors),
        SurfaceHead::Bool(_) | SurfaceHead::Alias { .. } | SurfaceHead::Disequality { .. } => {
            errors.push(WeederError::IllegalHeadPredicate { span: surface.span });
            Atom::new(Name::unqualified("<illegal-head>"), Vec::new(), surface.span)
        }
    };

    Rule { head, body, span: surface.span }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flix_ir::surface::SurfaceTermKind;

    fn term(kind: SurfaceTermKind) -> SurfaceTerm {
        SurfaceTerm { kind, span: Span::new(0, 1) }
    }

    #[test]
    fn duplicate_alias_is_reported_once_per_repeat() {
        let rule = SurfaceRule {
            head: SurfaceHead::Atom(SurfaceAtom {
                predicate: vec!["Reach".into()],
                terms: vec![term(SurfaceTermKind::Var("x".into()))],
                span: Span::new(0, 1),
            }),
            body: vec![
                SurfaceBodyAtom::Alias { name: "x".into(), term: term(SurfaceTermKind::Var("a".into())), span: Span::new(1, 2) },
                SurfaceBodyAtom::Alias { name: "x".into(), term: term(SurfaceTermKind::Var("b".into())), span: Span::new(2, 3) },
            ],
            span: Span::new(0, 3),
        };
        let mut errors = Diagnostics::new();
        weed_rule(&rule, &mut errors);
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], WeederError::DuplicateAlias { .. }));
    }

    #[test]
    fn boolean_head_is_illegal() {
        let rule = SurfaceRule {
            head: SurfaceHead::Bool(true),
            body: Vec::new(),
            span: Span::new(0, 1),
        };
        let mut errors = Diagnostics::new();
        weed_rule(&rule, &mut errors);
        assert!(matches!(errors[0], WeederError::IllegalHeadPredicate { .. }));
    }

    #[test]
    fn atom_head_weeds_cleanly() {
        let rule = SurfaceRule {
            head: SurfaceHead::Atom(SurfaceAtom {
                predicate: vec!["Edge".into()],
                terms: vec![term(SurfaceTermKind::Var("x".into())), term(SurfaceTermKind::Var("y".into()))],
                span: Span::new(0, 1),
            }),
            body: Vec::new(),
            span: Span::new(0, 1),
        };
        let mut errors = Diagnostics::new();
        let weeded = weed_rule(&rule, &mut errors);
        assert!(errors.is_empty());
        assert!(weeded.is_fact());
    }
}
