//! Resolver and Typer error kinds (§7).

use std::fmt;

use flix_base::Span;

#[derive(Debug, Clone, PartialEq)]
pub enum ResolveError {
    NameNotFound { name: String, span: Span },
    AmbiguousName { name: String, candidates: usize, span: Span },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::NameNotFound { name, .. } => write!(f, "name not found: `{name}`"),
            ResolveError::AmbiguousName { name, candidates, .. } => {
                write!(f, "ambiguous name `{name}`: {candidates} candidates")
            }
        }
    }
}

impl std::error::Error for ResolveError {}

#[derive(Debug, Clone, PartialEq)]
pub enum TyperError {
    TypeMismatch { expected: String, found: String, span: Span },
    UnsupportedLatticeOperation { op: String, ty: String, span: Span },
    RecursiveType { name: String, span: Span },
}

impl fmt::Display for TyperError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TyperError::TypeMismatch { expected, found, .. } => {
                write!(f, "type mismatch: expected `{expected}`, found `{found}`")
            }
            TyperError::UnsupportedLatticeOperation { op, ty, .. } => {
                write!(f, "no lattice instance for type `{ty}` supports `{op}`")
            }
            TyperError::RecursiveType { name, .. } => write!(f, "recursive type in declaration `{name}`"),
        }
    }
}

impl std::error::Error for TyperError {}
