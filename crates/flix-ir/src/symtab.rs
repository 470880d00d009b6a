//! The symbol table: fully qualified name to declaration set (§3).
//!
//! Grows only during resolution (monotone) and is read-only thereafter.
//! Multiple declarations may share a name while resolution is in progress;
//! `flix-resolve` is responsible for demanding exactly one survivor per
//! name actually referenced.

use std::collections::HashMap;

use flix_base::Name;

use crate::decl::Decl;

#[derive(Debug, Default)]
pub struct SymbolTable {
    decls: HashMap<Name, Vec<Decl>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable {
            decls: HashMap::new(),
        }
    }

    /// Adds a declaration under its own fully qualified name.
    pub fn declare(&mut self, decl: Decl) {
        self.decls.entry(decl.name().clone()).or_default().push(decl);
    }

    /// All declarations currently registered under `name`, in declaration order.
    pub fn lookup(&self, name: &Name) -> &[Decl] {
        self.decls.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn names(&self) -> impl Iterator<Item = &Name> {
        self.decls.keys()
    }
}
