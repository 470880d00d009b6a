#![cfg_attr(docsrs, feature(doc_cfg))]

//! # flix-ir
//!
//! The post-parse tree, fully qualified names, declaration registry, types,
//! and relational schema shared by every later phase of the Flix front end
//! (§3 Data Model).
//!
//! - [`types::Type`] — the type language
//! - [`expr::Expr`]/[`expr::ExprKind`] — the frozen IR expression language
//! - [`decl::Decl`] — declaration variants held by the symbol table
//! - [`symtab::SymbolTable`] — fully qualified name → declaration set
//! - [`schema::Schema`] — a table's relation plus its declared indices
//! - [`diagnostics::Diagnostics`] — error accumulation shared by Weeder/Resolver/Typer
//!
//! This crate has no knowledge of the solver's fixpoint algorithm or the
//! verifier's SMT encoding; it is the frozen data those phases operate on.

pub mod decl;
pub mod diagnostics;
pub mod expr;
pub mod rule;
pub mod schema;
pub mod surface;
pub mod symtab;
pub mod types;

pub use decl::{
    Annotation, BoundedLatticeDecl, ClassDecl, Decl, EnumDecl, FunctionDecl, ImplDecl, IndexDecl,
    LatticeDecl, LawDecl, LawKind, NamespaceDecl, RelationDecl, ValueDecl,
};
pub use diagnostics::Diagnostics;
pub use expr::{BinOp, CollectionKind, Expr, ExprKind, Literal, MatchRule, Pattern, QuantifierKind, UnOp};
pub use rule::{Atom, BodyAtom, Program, Rule, Term};
pub use schema::Schema;
pub use symtab::SymbolTable;
pub use types::{FloatWidth, IntWidth, Type, TypeVar};
