#![cfg_attr(docsrs, feature(doc_cfg))]

//! # flix-lattice
//!
//! The algebraic contracts consulted uniformly across Flix's front end: by
//! the Typer (to check lattice-kinded declarations), by the Solver (to join
//! attribute values at confluence), and by the Verifier (to know which laws
//! apply to a user declaration).
//!
//! - [`PartialOrder`] — reflexive, antisymmetric, transitive `leq`
//! - [`JoinSemilattice`]/[`MeetSemilattice`]/[`Lattice`] — `lub`/`glb` with absorption
//! - [`BoundedLattice`] — `bot`/`top` plus a height function for the ascending-chain condition
//! - [`Widening`] — forces convergence where height is absent or impractical
//! - [`Lifted`] — adds a fresh bottom below an existing order
//!
//! Pointwise constructors for tuples, `Option`, subset-ordered sets
//! ([`SubsetOrdered`]), and pointwise maps ([`PointwiseMap`]) live in
//! [`combinators`].

pub mod bounded;
pub mod combinators;
pub mod lifted;
pub mod order;
pub mod semilattice;

pub use bounded::{BoundedLattice, Widening};
pub use combinators::{PointwiseMap, SubsetOrdered};
pub use lifted::Lifted;
pub use order::PartialOrder;
pub use semilattice::{JoinSemilattice, Lattice, MeetSemilattice};
