#![cfg_attr(docsrs, feature(doc_cfg))]

//! # flix-resolve
//!
//! Namespace-aware name resolution (§4.2) followed by bidirectional type
//! inference (§4.3). Both phases accumulate their own error set; the Typer
//! still runs over whatever the Resolver produced so a single pass surfaces
//! every independent problem, but the CLI only proceeds past this phase when
//! both sets are empty (§7 phase-ordering rule).

pub mod error;
pub mod resolver;
pub mod typer;

pub use error::{ResolveError, TyperError};

use flix_ir::{Decl, Program, SymbolTable};

/// Everything downstream phases need from name resolution and typing.
pub struct ResolveResult {
    pub table: SymbolTable,
    pub decls: Vec<Decl>,
    pub program: Program,
    pub resolve_errors: Vec<ResolveError>,
    pub typer_errors: Vec<TyperError>,
}

impl ResolveResult {
    pub fn is_ok(&self) -> bool {
        self.resolve_errors.is_empty() && self.typer_errors.is_empty()
    }
}

/// Runs the Resolver then the Typer over a weeded program.
pub fn resolve_and_type(decls: Vec<Decl>, program: Program) -> ResolveResult {
    log::debug!("resolve: {} declaration(s)", decls.len());
    let (table, mut decls, program, resolve_errors) = resolver::resolve_program(decls, program);

    let typer_errors = if resolve_errors.is_empty() {
        log::debug!("type_check: {} declaration(s)", decls.len());
        typer::type_check(&table, &mut decls)
    } else {
        Vec::new()
    };

    ResolveResult { table, decls, program, resolve_errors, typer_errors }
}
