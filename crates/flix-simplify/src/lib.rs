#![cfg_attr(docsrs, feature(doc_cfg))]

//! # flix-simplify
//!
//! Three fixed-order, idempotent tree rewrites over typed `flix-ir`
//! expressions (§4.3): copy propagation (currently identity), unit-equality
//! elimination, then dead-code elimination. One run suffices — each pass
//! is a pure function of its input, so there is no internal fixed point to
//! chase.

pub mod dce;
pub mod propagate;
pub mod unit_eq;

use flix_ir::{BoundedLatticeDecl, Decl, FunctionDecl, ImplDecl, LatticeDecl, ValueDecl};

fn rewrite(expr: flix_ir::Expr) -> flix_ir::Expr {
    let expr = propagate::propagate_expr(expr);
    let expr = unit_eq::eliminate_unit_equality(expr);
    dce::eliminate_dead_code(expr)
}

fn simplify_decl(decl: Decl) -> Decl {
    match decl {
        Decl::Value(ValueDecl { name, span, ty, body }) => {
            Decl::Value(ValueDecl { name, span, ty, body: rewrite(body) })
        }
        Decl::Function(FunctionDecl { name, span, params, ret, annotations, body }) => {
            Decl::Function(FunctionDecl { name, span, params, ret, annotations, body: rewrite(body) })
        }
        Decl::Lattice(LatticeDecl { name, span, element_type, leq, lub, glb }) => Decl::Lattice(LatticeDecl {
            name,
            span,
            element_type,
            leq: rewrite(leq),
            lub: rewrite(lub),
            glb: rewrite(glb),
        }),
        Decl::BoundedLattice(BoundedLatticeDecl { name, span, element_type, bot, top, leq, lub, glb, widen }) => {
            Decl::BoundedLattice(BoundedLatticeDecl {
                name,
                span,
                element_type,
                bot: rewrite(bot),
                top: rewrite(top),
                leq: rewrite(leq),
                lub: rewrite(lub),
                glb: rewrite(glb),
                widen: widen.map(rewrite),
            })
        }
        Decl::Impl(ImplDecl { name, span, class, for_type, methods }) => Decl::Impl(ImplDecl {
            name,
            span,
            class,
            for_type,
            methods: methods.into_iter().map(|(n, e)| (n, rewrite(e))).collect(),
        }),
        other => other,
    }
}

/// Runs all three passes over every declaration's expression bodies, in
/// the fixed order copy-propagation, unit-equality, dead-code.
pub fn simplify_program(decls: Vec<Decl>) -> Vec<Decl> {
    log::debug!("simplify: {} declaration(s)", decls.len());
    decls.into_iter().map(simplify_decl).collect()
}
