//! Fully qualified names.
//!
//! A name is an ordered sequence of identifier segments with a final leaf,
//! e.g. the relation `Edges` declared inside `namespace Graph` has the
//! fully qualified name `Graph.Edges`. Two names are equal iff their segment
//! sequences are equal; a bare [`Ident`] additionally carries a [`Span`] for
//! diagnostics, but position never participates in equality.
//!
//! ## Example
//!
//! ```
//! use flix_base::{Ident, Name, Span};
//!
//! let graph = Ident::new("Graph", Span::new(0, 5));
//! let edges = Ident::new("Edges", Span::new(6, 11));
//!
//! let fqn = Name::new(vec![graph], edges);
//! assert_eq!(fqn.to_string(), "Graph.Edges");
//! ```

use std::fmt;

use crate::span::Span;

/// A source identifier: text plus the position it was written at.
///
/// Equality and hashing ignore [`Span`] — two identifiers written at
/// different source locations are equal iff their text matches.
#[derive(Debug, Clone)]
pub struct Ident {
    pub text: String,
    pub span: Span,
}

impl Ident {
    /// Creates an identifier from its surface text and source span.
    pub fn new(text: impl Into<String>, span: Span) -> Self {
        Self {
            text: text.into(),
            span,
        }
    }
}

impl PartialEq for Ident {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for Ident {}

impl std::hash::Hash for Ident {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// A fully qualified name: zero or more namespace segments plus a leaf.
///
/// Two names are equal iff their segment sequences are equal, comparing
/// only identifier text (never source position).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name {
    namespace: Vec<String>,
    leaf: String,
}

impl Name {
    /// Builds a fully qualified name from namespace segments and a leaf.
    pub fn new(namespace: Vec<Ident>, leaf: Ident) -> Self {
        Self {
            namespace: namespace.into_iter().map(|i| i.text).collect(),
            leaf: leaf.text,
        }
    }

    /// Builds a fully qualified name directly from owned strings.
    ///
    /// Convenient when segments are already plain text, e.g. when
    /// constructing a name programmatically rather than from parsed idents.
    pub fn from_segments(namespace: impl IntoIterator<Item = impl Into<String>>, leaf: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into_iter().map(Into::into).collect(),
            leaf: leaf.into(),
        }
    }

    /// A name with no namespace, just a bare leaf.
    pub fn unqualified(leaf: impl Into<String>) -> Self {
        Self {
            namespace: Vec::new(),
            leaf: leaf.into(),
        }
    }

    /// The namespace segments, outermost first.
    pub fn namespace(&self) -> &[String] {
        &self.namespace
    }

    /// The final segment of the name.
    pub fn leaf(&self) -> &str {
        &self.leaf
    }

    /// Returns a new name with `prefix` prepended to the namespace.
    ///
    /// Used by the resolver to build the `current-namespace ++ name`
    /// candidate before falling back to the bare name.
    pub fn prefixed(&self, prefix: &[String]) -> Name {
        let mut namespace = prefix.to_vec();
        namespace.extend(self.namespace.iter().cloned());
        Name {
            namespace,
            leaf: self.leaf.clone(),
        }
    }

    /// `true` if this name has no namespace segments.
    pub fn is_unqualified(&self) -> bool {
        self.namespace.is_empty()
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for seg in &self.namespace {
            write!(f, "{}.", seg)?;
        }
        write!(f, "{}", self.leaf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(s: &str) -> Ident {
        Ident::new(s, Span::new(0, s.len()))
    }

    #[test]
    fn equal_names_ignore_span() {
        let a = Name::new(vec![ident("Graph")], ident("Edges"));
        let b = Name::new(
            vec![Ident::new("Graph", Span::new(40, 45))],
            Ident::new("Edges", Span::new(50, 55)),
        );
        assert_eq!(a, b);
    }

    #[test]
    fn display_joins_segments_with_dots() {
        let name = Name::new(vec![ident("Graph")], ident("Edges"));
        assert_eq!(name.to_string(), "Graph.Edges");
    }

    #[test]
    fn unqualified_has_empty_namespace() {
        let name = Name::unqualified("Edges");
        assert!(name.is_unqualified());
        assert_eq!(name.to_string(), "Edges");
    }

    #[test]
    fn prefixed_prepends_namespace_segments() {
        let name = Name::unqualified("Edges");
        let prefixed = name.prefixed(&["Graph".to_string()]);
        assert_eq!(prefixed.to_string(), "Graph.Edges");
    }

    #[test]
    fn different_leaves_are_unequal() {
        let a = Name::unqualified("Edges");
        let b = Name::unqualified("Nodes");
        assert_ne!(a, b);
    }

    #[test]
    fn idents_compare_by_text_not_span() {
        let a = Ident::new("x", Span::new(0, 1));
        let b = Ident::new("x", Span::new(10, 11));
        assert_eq!(a, b);
    }
}
