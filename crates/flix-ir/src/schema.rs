//! Relational schema: a table's declared shape plus its declared indices.

use crate::decl::{IndexDecl, RelationDecl};

/// A table's full schema: its [`RelationDecl`] plus every [`IndexDecl`]
/// declared over it, in declaration order (used by `flix-solve` for
/// selectivity tie-breaking, §4.5).
#[derive(Debug, Clone)]
pub struct Schema {
    pub relation: RelationDecl,
    pub indices: Vec<IndexDecl>,
}

impl Schema {
    pub fn new(relation: RelationDecl) -> Self {
        Schema {
            relation,
            indices: Vec::new(),
        }
    }

    /// All attribute names in declaration order, including the trailing
    /// lattice-valued element column for a Lattice-table.
    pub fn attribute_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .relation
            .attributes
            .iter()
            .map(|(n, _)| n.as_str())
            .collect();
        if let Some((name, _)) = &self.relation.element {
            names.push(name.as_str());
        }
        names
    }

    pub fn arity(&self) -> usize {
        self.relation.attributes.len() + self.relation.element.is_some() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Type;
    use flix_base::{Name, Span};

    #[test]
    fn arity_counts_lattice_element() {
        let relation = RelationDecl {
            name: Name::unqualified("V"),
            span: Span::new(0, 1),
            attributes: vec![("x".into(), Type::Str)],
            element: Some(("v".into(), Type::Str)),
        };
        let schema = Schema::new(relation);
        assert_eq!(schema.arity(), 2);
        assert_eq!(schema.attribute_names(), vec!["x", "v"]);
    }
}
