//! Declaration variants stored in the [`crate::symtab::SymbolTable`].

use flix_base::{Name, Span};

use crate::expr::Expr;
use crate::types::Type;

/// A recognized annotation name (§4.1 Weeder, Definition contract).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Annotation {
    Associative,
    Commutative,
    Monotone,
    Strict,
    Unchecked,
    Unsafe,
}

impl Annotation {
    /// Parses a surface annotation identifier, or `None` if unrecognized
    /// (the Weeder turns `None` into `IllegalAnnotation`).
    pub fn parse(text: &str) -> Option<Annotation> {
        match text {
            "associative" => Some(Annotation::Associative),
            "commutative" => Some(Annotation::Commutative),
            "monotone" => Some(Annotation::Monotone),
            "strict" => Some(Annotation::Strict),
            "unchecked" => Some(Annotation::Unchecked),
            "unsafe" => Some(Annotation::Unsafe),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValueDecl {
    pub name: Name,
    pub span: Span,
    pub ty: Type,
    pub body: Expr,
}

#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub name: Name,
    pub span: Span,
    pub params: Vec<(String, Type)>,
    pub ret: Type,
    pub annotations: Vec<Annotation>,
    pub body: Expr,
}

#[derive(Debug, Clone)]
pub struct EnumDecl {
    pub name: Name,
    pub span: Span,
    /// Tag name, in declaration order, to its payload type.
    pub tags: Vec<(String, Type)>,
}

impl EnumDecl {
    pub fn tag_names(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(|(t, _)| t.as_str())
    }
}

/// A table: a Relation (set-valued) if `element` is `None`, or a
/// Lattice-table if `element` names the lattice-valued last attribute.
#[derive(Debug, Clone)]
pub struct RelationDecl {
    pub name: Name,
    pub span: Span,
    /// Key (or, for a plain Relation, all) attributes in declaration order.
    pub attributes: Vec<(String, Type)>,
    /// The lattice-valued element column, present only for a Lattice-table.
    pub element: Option<(String, Type)>,
}

impl RelationDecl {
    pub fn is_lattice_table(&self) -> bool {
        self.element.is_some()
    }
}

/// An unbounded `Lattice[E]` instance: join and meet without declared bounds.
#[derive(Debug, Clone)]
pub struct LatticeDecl {
    pub name: Name,
    pub span: Span,
    pub element_type: Type,
    pub leq: Expr,
    pub lub: Expr,
    pub glb: Expr,
}

/// A `BoundedLattice[E]` instance, weeded from exactly five expressions in
/// order: bot, top, leq, lub, glb. `widen` is optional and, per the
/// Solver's lattice-aware insertion rule, is consulted only by the
/// Verifier's ascending-chain proof obligations.
#[derive(Debug, Clone)]
pub struct BoundedLatticeDecl {
    pub name: Name,
    pub span: Span,
    pub element_type: Type,
    pub bot: Expr,
    pub top: Expr,
    pub leq: Expr,
    pub lub: Expr,
    pub glb: Expr,
    pub widen: Option<Expr>,
}

/// An asserted algebraic law, discharged by `flix-verify`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LawKind {
    Reflexive,
    Antisymmetric,
    Transitive,
    Commutative,
    Associative,
    Idempotent,
    UpperBound,
    Absorption,
    AscendingChain,
    Monotone,
    Strict,
}

#[derive(Debug, Clone)]
pub struct LawDecl {
    pub name: Name,
    pub span: Span,
    /// The declaration (function or lattice instance) this law concerns.
    pub subject: Name,
    pub kind: LawKind,
}

#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub name: Name,
    pub span: Span,
    pub type_param: String,
    pub signatures: Vec<(String, Type)>,
}

#[derive(Debug, Clone)]
pub struct ImplDecl {
    pub name: Name,
    pub span: Span,
    pub class: Name,
    pub for_type: Type,
    pub methods: Vec<(String, Expr)>,
}

/// A declared index: a non-empty list of non-empty attribute subsequences.
#[derive(Debug, Clone)]
pub struct IndexDecl {
    pub name: Name,
    pub span: Span,
    pub table: Name,
    pub keys: Vec<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct NamespaceDecl {
    pub name: Name,
    pub span: Span,
}

/// Any declaration the symbol table may hold.
#[derive(Debug, Clone)]
pub enum Decl {
    Value(ValueDecl),
    Function(FunctionDecl),
    Enum(EnumDecl),
    Relation(RelationDecl),
    Lattice(LatticeDecl),
    BoundedLattice(BoundedLatticeDecl),
    Law(LawDecl),
    Class(ClassDecl),
    Impl(ImplDecl),
    Index(IndexDecl),
    Namespace(NamespaceDecl),
}

impl Decl {
    pub fn name(&self) -> &Name {
        match self {
            Decl::Value(d) => &d.name,
            Decl::Function(d) => &d.name,
            Decl::Enum(d) => &d.name,
            Decl::Relation(d) => &d.name,
            Decl::Lattice(d) => &d.name,
            Decl::BoundedLattice(d) => &d.name,
            Decl::Law(d) => &d.name,
            Decl::Class(d) => &d.name,
            Decl::Impl(d) => &d.name,
            Decl::Index(d) => &d.name,
            Decl::Namespace(d) => &d.name,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Decl::Value(d) => d.span,
            Decl::Function(d) => d.span,
            Decl::Enum(d) => d.span,
            Decl::Relation(d) => d.span,
            Decl::Lattice(d) => d.span,
            Decl::BoundedLattice(d) => d.span,
            Decl::Law(d) => d.span,
            Decl::Class(d) => d.span,
            Decl::Impl(d) => d.span,
            Decl::Index(d) => d.span,
            Decl::Namespace(d) => d.span,
        }
    }

    /// A short, human-readable label for the declaration's kind, used in
    /// ambiguity diagnostics.
    pub fn kind_label(&self) -> &'static str {
        match self {
            Decl::Value(_) => "value",
            Decl::Function(_) => "function",
            Decl::Enum(_) => "enum",
            Decl::Relation(d) if d.is_lattice_table() => "lattice-table",
            Decl::Relation(_) => "relation",
            Decl::Lattice(_) => "lattice",
            Decl::BoundedLattice(_) => "bounded lattice",
            Decl::Law(_) => "law",
            Decl::Class(_) => "class",
            Decl::Impl(_) => "impl",
            Decl::Index(_) => "index",
            Decl::Namespace(_) => "namespace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn annotation_parses_recognized_names() {
        assert_eq!(Annotation::parse("monotone"), Some(Annotation::Monotone));
        assert_eq!(Annotation::parse("bogus"), None);
    }

    #[test]
    fn relation_without_element_is_not_lattice_table() {
        let decl = RelationDecl {
            name: Name::unqualified("R"),
            span: Span::new(0, 1),
            attributes: vec![("a".into(), Type::Bool)],
            element: None,
        };
        assert!(!decl.is_lattice_table());
    }

    #[test]
    fn relation_with_element_is_lattice_table() {
        let decl = RelationDecl {
            name: Name::unqualified("V"),
            span: Span::new(0, 1),
            attributes: vec![("x".into(), Type::Str)],
            element: Some(("v".into(), Type::Native(Name::unqualified("Sign")))),
        };
        assert!(decl.is_lattice_table());
    }
}
