//! Collects verification obligations from a resolved, typed symbol table
//! and builds the closed property formula for each one (§4.6, §4.4, §8
//! Universal Property 2/3).
//!
//! Two kinds of obligation exist:
//!
//! - **Lattice-class laws**, checked automatically for every declared
//!   `BoundedLattice[E]` instance: the `PartialOrder`/`JoinSemilattice`/
//!   `MeetSemilattice`/`Lattice` laws of §4.4, built directly from the
//!   instance's `leq`/`lub`/`glb` bodies.
//! - **Annotated function laws**: a [`FunctionDecl`] carrying
//!   `@commutative`/`@associative`/`@monotone`/`@strict` (§4.1) is checked
//!   against its own body, consulting the unique `BoundedLattice`
//!   instance over its parameter type for `@monotone`/`@strict`.

use flix_base::Name;
use flix_ir::{Annotation, BoundedLatticeDecl, Decl, Expr, ExprKind, FunctionDecl, LawKind, SymbolTable, Type};

use crate::encode::{encode, inline_call, verify_type_of, EncodingError, Env};
use crate::ir::{VerifyExpr, VerifyType};

/// Which operator of a `BoundedLattice` instance a lattice-class
/// obligation is stated about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LatticeOp {
    Leq,
    Lub,
    Glb,
    /// Absorption spans both `glb` and `lub`.
    GlbLub,
}

pub enum Obligation<'a> {
    Lattice { decl: &'a BoundedLatticeDecl, op: LatticeOp, kind: LawKind },
    Function { decl: &'a FunctionDecl, kind: LawKind },
}

impl<'a> Obligation<'a> {
    pub fn subject(&self) -> &'a Name {
        match self {
            Obligation::Lattice { decl, .. } => &decl.name,
            Obligation::Function { decl, .. } => &decl.name,
        }
    }

    pub fn kind(&self) -> LawKind {
        match self {
            Obligation::Lattice { kind, .. } => *kind,
            Obligation::Function { kind, .. } => *kind,
        }
    }
}

/// Why an obligation could not be turned into a checkable formula at all
/// (distinct from the SMT-level `Inconclusive` outcome, which still ran
/// the solver; this is "there is nothing to run").
#[derive(Debug, Clone, PartialEq)]
pub enum ObligationError {
    NoLatticeInstance(String),
    ArityMismatch(&'static str, usize),
    Encoding(EncodingError),
    Unsupported(String),
}

impl std::fmt::Display for ObligationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObligationError::NoLatticeInstance(ty) => write!(f, "no BoundedLattice instance is declared for type `{ty}`"),
            ObligationError::ArityMismatch(what, n) => write!(f, "{what} requires exactly {n} parameter(s)"),
            ObligationError::Encoding(source) => write!(f, "{source}"),
            ObligationError::Unsupported(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ObligationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ObligationError::Encoding(source) => Some(source),
            _ => None,
        }
    }
}

impl From<EncodingError> for ObligationError {
    fn from(source: EncodingError) -> Self {
        ObligationError::Encoding(source)
    }
}

/// Collects every lattice-class and annotated-function obligation in `table`.
pub fn collect_obligations(table: &SymbolTable) -> Vec<Obligation<'_>> {
    use LawKind::*;
    let mut out = Vec::new();
    for name in table.names() {
        for decl in table.lookup(name) {
            match decl {
                Decl::BoundedLattice(bl) => {
                    for kind in [Reflexive, Antisymmetric, Transitive] {
                        out.push(Obligation::Lattice { decl: bl, op: LatticeOp::Leq, kind });
                    }
                    for kind in [Commutative, Associative, Idempotent, UpperBound] {
                        out.push(Obligation::Lattice { decl: bl, op: LatticeOp::Lub, kind });
                    }
                    for kind in [Commutative, Associative, Idempotent] {
                        out.push(Obligation::Lattice { decl: bl, op: LatticeOp::Glb, kind });
                    }
                    out.push(Obligation::Lattice { decl: bl, op: LatticeOp::GlbLub, kind: Absorption });
                    // No height function is part of a `BoundedLattice` declaration
                    // (§9 Open Question), so an `AscendingChain` obligation can
                    // never build a formula for any program — it would always
                    // report `Unsupported`. Not collected here; see
                    // `build_formula`'s `AscendingChain` arm for the same note.
                }
                Decl::Function(f) => {
                    for ann in &f.annotations {
                        let kind = match ann {
                            Annotation::Associative => Associative,
                            Annotation::Commutative => Commutative,
                            Annotation::Monotone => Monotone,
                            Annotation::Strict => Strict,
                            Annotation::Unchecked | Annotation::Unsafe => continue,
                        };
                        out.push(Obligation::Function { decl: f, kind });
                    }
                }
                _ => {}
            }
        }
    }
    out
}

/// Finds the unique `BoundedLattice` instance over `ty`; the same lookup
/// the Typer (`flix-resolve`) and Solver (`flix-solve`) perform to resolve
/// a bare lattice-operator call, duplicated here since `flix-verify`
/// depends only on the frozen IR (§9 "no cyclic ownership").
fn find_bounded_lattice<'a>(table: &'a SymbolTable, ty: &Type) -> Option<&'a BoundedLatticeDecl> {
    let mut found = None;
    for name in table.names() {
        for decl in table.lookup(name) {
            if let Decl::BoundedLattice(bl) = decl {
                if &bl.element_type == ty {
                    if found.is_some() {
                        return None;
                    }
                    found = Some(bl);
                }
            }
        }
    }
    found
}

fn as_lambda(e: &Expr) -> Result<(&[(String, Type)], &Expr), ObligationError> {
    match &*e.kind {
        ExprKind::Lambda { params, body } => Ok((params, body)),
        _ => Err(ObligationError::Unsupported("lattice operator body is not a lambda".into())),
    }
}

fn call(params: &[(String, Type)], body: &Expr, args: &[VerifyExpr], enums: &crate::encode::EnumIndex) -> Result<VerifyExpr, EncodingError> {
    inline_call(params, body, args, enums)
}

fn skolems(ty: &Type, names: &[&str]) -> (Vec<VerifyExpr>, Vec<(String, VerifyType)>) {
    let vt = verify_type_of(ty);
    let exprs = names.iter().map(|n| VerifyExpr::var(*n)).collect();
    let decls = names.iter().map(|n| (n.to_string(), vt)).collect();
    (exprs, decls)
}

/// Builds the closed property formula (not yet negated) plus the free
/// variables it quantifies over, for one obligation.
pub fn build_formula(
    obligation: &Obligation<'_>,
    table: &SymbolTable,
    enums: &crate::encode::EnumIndex,
) -> Result<(VerifyExpr, Vec<(String, VerifyType)>), ObligationError> {
    use LawKind::*;
    match obligation {
        Obligation::Lattice { decl, op, kind } => {
            let (leq_p, leq_b) = as_lambda(&decl.leq)?;
            let (lub_p, lub_b) = as_lambda(&decl.lub)?;
            let (glb_p, glb_b) = as_lambda(&decl.glb)?;
            let leq = |args: &[VerifyExpr]| call(leq_p, leq_b, args, enums);
            let lub = |args: &[VerifyExpr]| call(lub_p, lub_b, args, enums);
            let glb = |args: &[VerifyExpr]| call(glb_p, glb_b, args, enums);

            let (xyz, decls3) = skolems(&decl.element_type, &["x", "y", "z"]);
            let (x, y, z) = (xyz[0].clone(), xyz[1].clone(), xyz[2].clone());
            let decls2 = decls3[..2].to_vec();
            let decls1 = decls3[..1].to_vec();

            let formula = match (op, kind) {
                (LatticeOp::Leq, Reflexive) => VerifyExpr::eq(leq(&[x.clone(), x])?, VerifyExpr::bool(true)),
                (LatticeOp::Leq, Antisymmetric) => VerifyExpr::implies(
                    VerifyExpr::and(leq(&[x.clone(), y.clone()])?, leq(&[y.clone(), x.clone()])?),
                    VerifyExpr::eq(x, y),
                ),
                (LatticeOp::Leq, Transitive) => VerifyExpr::implies(
                    VerifyExpr::and(leq(&[x.clone(), y.clone()])?, leq(&[y.clone(), z.clone()])?),
                    leq(&[x, z])?,
                ),
                (LatticeOp::Lub, Commutative) => VerifyExpr::eq(lub(&[x.clone(), y.clone()])?, lub(&[y, x])?),
                (LatticeOp::Lub, Associative) => {
                    let lhs = lub(&[lub(&[x.clone(), y.clone()])?, z.clone()])?;
                    let rhs = lub(&[x, lub(&[y, z])?])?;
                    VerifyExpr::eq(lhs, rhs)
                }
                (LatticeOp::Lub, Idempotent) => VerifyExpr::eq(lub(&[x.clone(), x.clone()])?, x),
                (LatticeOp::Lub, UpperBound) => {
                    let joined = lub(&[x.clone(), y.clone()])?;
                    VerifyExpr::and(leq(&[x, joined.clone()])?, leq(&[y, joined])?)
                }
                (LatticeOp::Glb, Commutative) => VerifyExpr::eq(glb(&[x.clone(), y.clone()])?, glb(&[y, x])?),
                (LatticeOp::Glb, Associative) => {
                    let lhs = glb(&[glb(&[x.clone(), y.clone()])?, z.clone()])?;
                    let rhs = glb(&[x, glb(&[y, z])?])?;
                    VerifyExpr::eq(lhs, rhs)
                }
                (LatticeOp::Glb, Idempotent) => VerifyExpr::eq(glb(&[x.clone(), x.clone()])?, x),
                (LatticeOp::GlbLub, Absorption) => VerifyExpr::eq(glb(&[x.clone(), lub(&[x.clone(), y])?])?, x),
                (_, AscendingChain) => {
                    return Err(ObligationError::Unsupported(
                        "no height function is part of a BoundedLattice declaration; ascending-chain \
                         termination is left to the Solver's iteration cap (§9 Open Question)"
                            .into(),
                    ))
                }
                _ => return Err(ObligationError::Unsupported(format!("{kind:?} does not apply to {op:?}"))),
            };
            let var_decls = match kind {
                Reflexive | Idempotent => decls1,
                Antisymmetric | Commutative | UpperBound | Absorption => decls2,
                Transitive | Associative => decls3,
                _ => decls3,
            };
            Ok((formula, var_decls))
        }
        Obligation::Function { decl, kind } => {
            let arity = decl.params.len();
            match kind {
                Commutative => {
                    if arity != 2 {
                        return Err(ObligationError::ArityMismatch("commutative", 2));
                    }
                    let (xy, decls) = skolems(&decl.params[0].1, &["x", "y"]);
                    let forward = call(&decl.params, &decl.body, &xy, enums)?;
                    let backward = call(&decl.params, &decl.body, &[xy[1].clone(), xy[0].clone()], enums)?;
                    Ok((VerifyExpr::eq(forward, backward), decls))
                }
                Associative => {
                    if arity != 2 {
                        return Err(ObligationError::ArityMismatch("associative", 2));
                    }
                    let (xyz, decls) = skolems(&decl.params[0].1, &["x", "y", "z"]);
                    let (x, y, z) = (xyz[0].clone(), xyz[1].clone(), xyz[2].clone());
                    let inner_left = call(&decl.params, &decl.body, &[x.clone(), y.clone()], enums)?;
                    let lhs = call(&decl.params, &decl.body, &[inner_left, z.clone()], enums)?;
                    let inner_right = call(&decl.params, &decl.body, &[y, z], enums)?;
                    let rhs = call(&decl.params, &decl.body, &[x, inner_right], enums)?;
                    Ok((VerifyExpr::eq(lhs, rhs), decls))
                }
                Monotone => {
                    if arity != 1 {
                        return Err(ObligationError::ArityMismatch("monotone", 1));
                    }
                    let param_ty = &decl.params[0].1;
                    let bl = find_bounded_lattice(table, param_ty)
                        .ok_or_else(|| ObligationError::NoLatticeInstance(param_ty.to_string()))?;
                    let (leq_p, leq_b) = as_lambda(&bl.leq)?;
                    let (xy, decls) = skolems(param_ty, &["x", "y"]);
                    let (x, y) = (xy[0].clone(), xy[1].clone());
                    let fx = call(&decl.params, &decl.body, &[x.clone()], enums)?;
                    let fy = call(&decl.params, &decl.body, &[y.clone()], enums)?;
                    let premise = call(leq_p, leq_b, &[x, y], enums)?;
                    let conclusion = call(leq_p, leq_b, &[fx, fy], enums)?;
                    Ok((VerifyExpr::implies(premise, conclusion), decls))
                }
                Strict => {
                    if arity != 1 {
                        return Err(ObligationError::ArityMismatch("strict", 1));
                    }
                    let param_ty = &decl.params[0].1;
                    let bl = find_bounded_lattice(table, param_ty)
                        .ok_or_else(|| ObligationError::NoLatticeInstance(param_ty.to_string()))?;
                    let bot = {
                        let mut env = Env::new(enums);
                        encode(&bl.bot, &mut env)?
                    };
                    let f_bot = call(&decl.params, &decl.body, &[bot.clone()], enums)?;
                    Ok((VerifyExpr::eq(f_bot, bot), Vec::new()))
                }
                _ => Err(ObligationError::Unsupported(format!("{kind:?} is not a function-level annotation law"))),
            }
        }
    }
}
