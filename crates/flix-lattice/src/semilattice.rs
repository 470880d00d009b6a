//! Join and meet semilattices, and their combination into a full lattice.

use crate::order::PartialOrder;

/// A join semilattice: `lub` is commutative, associative, idempotent, and
/// produces an upper bound of its two arguments under [`PartialOrder::leq`].
pub trait JoinSemilattice: PartialOrder + Sized {
    /// The least upper bound of `self` and `other`.
    fn lub(&self, other: &Self) -> Self;
}

/// A meet semilattice: the dual of [`JoinSemilattice`].
pub trait MeetSemilattice: PartialOrder + Sized {
    /// The greatest lower bound of `self` and `other`.
    fn glb(&self, other: &Self) -> Self;
}

/// Both join and meet, related by absorption:
/// `glb(x, lub(x, y)) == x` and its dual.
pub trait Lattice: JoinSemilattice + MeetSemilattice {}

impl<E> Lattice for E where E: JoinSemilattice + MeetSemilattice {}

impl JoinSemilattice for bool {
    fn lub(&self, other: &Self) -> Self {
        *self || *other
    }
}

impl MeetSemilattice for bool {
    fn glb(&self, other: &Self) -> Self {
        *self && *other
    }
}

impl JoinSemilattice for () {
    fn lub(&self, _other: &Self) -> Self {}
}

impl MeetSemilattice for () {
    fn glb(&self, _other: &Self) -> Self {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_lub_is_or() {
        assert_eq!(true.lub(&false), true);
        assert_eq!(false.lub(&false), false);
    }

    #[test]
    fn bool_glb_is_and() {
        assert_eq!(true.glb(&false), false);
        assert_eq!(true.glb(&true), true);
    }

    #[test]
    fn bool_absorption_holds() {
        for x in [true, false] {
            for y in [true, false] {
                assert_eq!(x.glb(&x.lub(&y)), x);
            }
        }
    }
}
