//! Bounded lattices and widening operators.

use crate::semilattice::Lattice;

/// A [`Lattice`] with a least element (`bot`), a greatest element (`top`),
/// and a non-negative height function satisfying the ascending-chain
/// condition: `x ⊑ y ∧ x ≠ y ⇒ h(x) > h(y)`.
///
/// The height function is the termination argument the Solver relies on
/// (§4.5 of the design): a rule that can only ever move a key's value up
/// the lattice must stop within `h(bot) - h(top)` plus one rounds.
pub trait BoundedLattice: Lattice + PartialEq {
    /// The least element; `bot ⊑ x` for all `x`.
    fn bot() -> Self;

    /// The greatest element; `x ⊑ top` for all `x`.
    fn top() -> Self;

    /// Non-negative height, strictly decreasing along strictly increasing chains.
    fn height(&self) -> u64;
}

/// A widening operator, used when a lattice has no (or an impractically
/// large) bounded height: `x ⊑ (x ▽ y)` and `y ⊑ (x ▽ y)`.
///
/// Per the design's open question on widening, `flix-solve`'s lattice-aware
/// insertion never calls `widen` — it is consulted only by `flix-verify`
/// when proving ascending-chain termination for a declaration that opts in.
pub trait Widening: crate::semilattice::JoinSemilattice {
    /// An upper bound of `self` and `other` that forces convergence.
    fn widen(&self, other: &Self) -> Self;
}

impl BoundedLattice for bool {
    fn bot() -> Self {
        false
    }

    fn top() -> Self {
        true
    }

    fn height(&self) -> u64 {
        if *self {
            0
        } else {
            1
        }
    }
}

impl Widening for bool {
    fn widen(&self, other: &Self) -> Self {
        crate::semilattice::JoinSemilattice::lub(self, other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::PartialOrder;

    #[test]
    fn bool_bounds_hold() {
        assert!(bool::bot().leq(&false));
        assert!(bool::bot().leq(&true));
        assert!(false.leq(&bool::top()));
        assert!(true.leq(&bool::top()));
    }

    #[test]
    fn bool_height_decreases_strictly_increasing() {
        assert!(false.height() > true.height());
    }

    #[test]
    fn bool_widen_matches_lub() {
        assert_eq!(false.widen(&true), true);
    }
}
