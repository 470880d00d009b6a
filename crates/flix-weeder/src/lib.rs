#![cfg_attr(docsrs, feature(doc_cfg))]

//! # flix-weeder
//!
//! Enforces the syntactic invariants §4.1 names and desugars surface forms
//! — extended binary operators, `let`-match, tag/tuple shorthand — into
//! the minimal shape `flix-ir` expects everywhere downstream.
//!
//! Independent failures within one declaration are accumulated rather than
//! short-circuited (§4.1, §7): [`weed_program`] always returns every
//! [`WeederError`] it found, never just the first.

pub mod decl;
pub mod error;
pub mod expr;
pub mod literal;
pub mod numeric;
pub mod pattern;
pub mod rule;
pub mod surface_type;

pub use error::WeederError;

use flix_base::Name;
use flix_ir::surface::SurfaceDecl;
use flix_ir::{Decl, Diagnostics, Program};

/// The result of weeding a full surface program: every declaration (with
/// namespace-qualified names already applied) and every rule, plus any
/// errors accumulated along the way.
pub struct WeedResult {
    pub decls: Vec<Decl>,
    pub program: Program,
    pub errors: Vec<WeederError>,
}

pub fn weed_program(surface: &flix_ir::surface::SurfaceProgram) -> WeedResult {
    let mut decls = Vec::new();
    let mut program = Program::new();
    let mut errors = Diagnostics::new();

    weed_decls(&surface.decls, &[], &mut decls, &mut program, &mut errors);

    WeedResult { decls, program, errors: errors.into_vec() }
}

fn weed_decls(
    surface_decls: &[SurfaceDecl],
    namespace: &[String],
    decls: &mut Vec<Decl>,
    program: &mut Program,
    errors: &mut Diagnostics<WeederError>,
) {
    for sd in surface_decls {
        match sd {
            SurfaceDecl::Definition(d) => {
                let woven = decl::weed_definition(d, errors);
                decls.push(requalify(woven, namespace));
            }
            SurfaceDecl::Enum(d) => {
                let woven = decl::weed_enum(d, errors);
                decls.push(requalify(woven, namespace));
            }
            SurfaceDecl::Relation(d) => {
                let woven = decl::weed_relation(d, errors);
                decls.push(requalify(woven, namespace));
            }
            SurfaceDecl::Index(d) => {
                let woven = decl::weed_index(d, errors);
                decls.push(requalify(woven, namespace));
            }
            SurfaceDecl::BoundedLattice(d) => {
                let woven = decl::weed_bounded_lattice(d, errors);
                decls.push(requalify(woven, namespace));
            }
            SurfaceDecl::Rule(r) => {
                program.push(rule::weed_rule(r, errors));
            }
            SurfaceDecl::Namespace { name, decls: nested, span: _ } => {
                let mut child_namespace = namespace.to_vec();
                child_namespace.push(name.clone());
                weed_decls(nested, &child_namespace, decls, program, errors);
            }
        }
    }
}

fn requalify_name(name: &Name, prefix: &[String]) -> Name {
    let mut ns = prefix.to_vec();
    ns.extend(name.namespace().iter().cloned());
    Name::from_segments(ns, name.leaf().to_string())
}

fn requalify(decl: Decl, prefix: &[String]) -> Decl {
    if prefix.is_empty() {
        return decl;
    }
    match decl {
        Decl::Value(mut d) => {
            d.name = requalify_name(&d.name, prefix);
            Decl::Value(d)
        }
        Decl::Function(mut d) => {
            d.name = requalify_name(&d.name, prefix);
            Decl::Function(d)
        }
        Decl::Enum(mut d) => {
            d.name = requalify_name(&d.name, prefix);
            Decl::Enum(d)
        }
        Decl::Relation(mut d) => {
            d.name = requalify_name(&d.name, prefix);
            Decl::Relation(d)
        }
        Decl::Lattice(mut d) => {
            d.name = requalify_name(&d.name, prefix);
            Decl::Lattice(d)
        }
        Decl::BoundedLattice(mut d) => {
            d.name = requalify_name(&d.name, prefix);
            Decl::BoundedLattice(d)
        }
        Decl::Law(mut d) => {
            d.name = requalify_name(&d.name, prefix);
            Decl::Law(d)
        }
        Decl::Class(mut d) => {
            d.name = requalify_name(&d.name, prefix);
            Decl::Class(d)
        }
        Decl::Impl(mut d) => {
            d.name = requalify_name(&d.name, prefix);
            Decl::Impl(d)
        }
        Decl::Index(mut d) => {
            d.name = requalify_name(&d.name, prefix);
            Decl::Index(d)
        }
        Decl::Namespace(mut d) => {
            d.name = requalify_name(&d.name, prefix);
            Decl::Namespace(d)
        }
    }
}
