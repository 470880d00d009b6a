//! The surface (pre-weed) tree shape.
//!
//! §1 treats the parser as an external collaborator: it produces a parse
//! tree with the node shapes enumerated here, each carrying `(sp1, sp2)`
//! source positions (§6 "Parser interface (consumed)"). `flix-weeder` is
//! the only consumer of this module; every other phase operates on the
//! frozen [`crate::expr::Expr`]/[`crate::decl::Decl`] types the Weeder
//! produces.
//!
//! Every node here derives `Serialize`/`Deserialize`: `flix-cli` loads a
//! source path by deserializing the parse tree a real parser crate would
//! hand off (§6), rather than tokenizing surface text itself.

use flix_base::Span;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SurfaceLit {
    Bool(bool),
    Char(char),
    Int(String),
    Float(String),
    Str(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceUnOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceBinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Neq,
    Lt,
    Leq,
    Gt,
    Geq,
    And,
    Or,
}

/// The extended lattice operators `⊑ ⊔ ⊓ ▽ △`, desugared by the Weeder
/// into calls of the qualified function named after the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceLatticeOp {
    Leq,
    Lub,
    Glb,
    Widen,
    Narrow,
}

impl SurfaceLatticeOp {
    /// The qualified function name the Weeder rewrites this operator's call to.
    pub fn function_name(self) -> &'static str {
        match self {
            SurfaceLatticeOp::Leq => "leq",
            SurfaceLatticeOp::Lub => "lub",
            SurfaceLatticeOp::Glb => "glb",
            SurfaceLatticeOp::Widen => "widen",
            SurfaceLatticeOp::Narrow => "narrow",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceCollectionKind {
    Option,
    List,
    Vec,
    Set,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceQuantifierKind {
    Existential,
    Universal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SurfaceType {
    Named(Vec<String>),
    Tuple(Vec<SurfaceType>),
    Lambda(Vec<SurfaceType>, Box<SurfaceType>),
    Parametric(Vec<String>, Vec<SurfaceType>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SurfacePattern {
    Wildcard,
    Var(String),
    Lit(SurfaceLit),
    Tuple(Vec<SurfacePattern>),
    Tag { tag: String, payload: Option<Box<SurfacePattern>> },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceExpr {
    pub kind: Box<SurfaceExprKind>,
    pub span: Span,
}

impl SurfaceExpr {
    pub fn new(kind: SurfaceExprKind, span: Span) -> Self {
        SurfaceExpr {
            kind: Box::new(kind),
            span,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SurfaceExprKind {
    Lit(SurfaceLit),
    Bot,
    Top,
    Var(Vec<String>),
    Wildcard,
    Lambda {
        params: Vec<String>,
        body: SurfaceExpr,
    },
    App {
        func: SurfaceExpr,
        args: Vec<SurfaceExpr>,
    },
    /// An infix identifier call, e.g. `` x `combine` y ``; desugars to
    /// `App(Var([combine]), [x, y])`.
    InfixIdent {
        op: String,
        lhs: SurfaceExpr,
        rhs: SurfaceExpr,
    },
    LatticeOp {
        op: SurfaceLatticeOp,
        lhs: SurfaceExpr,
        rhs: SurfaceExpr,
    },
    Unary {
        op: SurfaceUnOp,
        operand: SurfaceExpr,
    },
    Binary {
        op: SurfaceBinOp,
        lhs: SurfaceExpr,
        rhs: SurfaceExpr,
    },
    If {
        cond: SurfaceExpr,
        then_branch: SurfaceExpr,
        else_branch: SurfaceExpr,
    },
    /// `let pattern = value; body` — a single-variable pattern desugars to
    /// an `ExprKind::Let`; any other pattern desugars to a one-arm `match`.
    LetMatch {
        pattern: SurfacePattern,
        value: SurfaceExpr,
        body: SurfaceExpr,
    },
    Match {
        scrutinee: SurfaceExpr,
        rules: Vec<(SurfacePattern, SurfaceExpr)>,
    },
    /// A tag expression; `payload: None` acquires an implicit Unit payload.
    Tag {
        tag: String,
        payload: Option<SurfaceExpr>,
    },
    Tuple(Vec<SurfaceExpr>),
    Collection {
        kind: SurfaceCollectionKind,
        items: Vec<SurfaceExpr>,
    },
    MapLiteral(Vec<(SurfaceExpr, SurfaceExpr)>),
    Quantifier {
        kind: SurfaceQuantifierKind,
        params: Vec<String>,
        body: SurfaceExpr,
    },
    Ascribe {
        expr: SurfaceExpr,
        ty: SurfaceType,
    },
    UserError {
        message: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceTerm {
    pub kind: SurfaceTermKind,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SurfaceTermKind {
    Var(String),
    Lit(SurfaceLit),
    Wildcard,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceAtom {
    pub predicate: Vec<String>,
    pub terms: Vec<SurfaceTerm>,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SurfaceBodyAtom {
    Atom(SurfaceAtom),
    /// `ident = term` — collected by the Weeder into the rule's alias map.
    Alias { name: String, term: SurfaceTerm, span: Span },
    Disequality { lhs: SurfaceTerm, rhs: SurfaceTerm, span: Span },
    Loop { var: String, set: SurfaceTerm, span: Span },
}

/// A head predicate before weeding validates it: literal booleans and
/// alias/disequality shapes are illegal here (`IllegalHeadPredicate`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SurfaceHead {
    Bool(bool),
    Atom(SurfaceAtom),
    Alias { name: String, term: SurfaceTerm },
    Disequality { lhs: SurfaceTerm, rhs: SurfaceTerm },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceRule {
    pub head: SurfaceHead,
    pub body: Vec<SurfaceBodyAtom>,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceDefinition {
    pub name: String,
    pub params: Vec<String>,
    pub annotations: Vec<String>,
    pub ret_ty: Option<SurfaceType>,
    pub body: SurfaceExpr,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceEnum {
    pub name: String,
    pub tags: Vec<(String, Option<SurfaceType>, Span)>,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceRelation {
    pub name: String,
    pub attributes: Vec<(String, SurfaceType)>,
    /// `true` for a `lat` (Lattice-table) declaration; `false` for a plain relation.
    pub is_lattice: bool,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceIndex {
    pub table: Vec<String>,
    pub keys: Vec<Vec<String>>,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceBoundedLattice {
    pub name: String,
    pub element_ty: SurfaceType,
    /// Must weed to exactly five expressions, in order: bot, top, leq, lub, glb.
    pub elements: Vec<SurfaceExpr>,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SurfaceDecl {
    Definition(SurfaceDefinition),
    Enum(SurfaceEnum),
    Relation(SurfaceRelation),
    Index(SurfaceIndex),
    BoundedLattice(SurfaceBoundedLattice),
    Rule(SurfaceRule),
    Namespace { name: String, decls: Vec<SurfaceDecl>, span: Span },
}

/// The top-level parse tree handed to the Weeder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurfaceProgram {
    pub decls: Vec<SurfaceDecl>,
}
