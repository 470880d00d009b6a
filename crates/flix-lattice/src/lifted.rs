//! `Lifted[E]` adds a fresh bottom below an existing partial order.

use crate::bounded::BoundedLattice;
use crate::order::PartialOrder;
use crate::semilattice::{JoinSemilattice, MeetSemilattice};

/// `E` with a fresh least element `Bottom` below every `Lifted::Value(e)`.
///
/// Used for types whose own order has no natural least element (e.g. a
/// `BigInt` under numeric `<=` has no bottom), or to give a fact-absence
/// sentinel distinct from any real value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Lifted<E> {
    Bottom,
    Value(E),
}

impl<E: PartialOrder> PartialOrder for Lifted<E> {
    fn leq(&self, other: &Self) -> bool {
        match (self, other) {
            (Lifted::Bottom, _) => true,
            (Lifted::Value(_), Lifted::Bottom) => false,
            (Lifted::Value(a), Lifted::Value(b)) => a.leq(b),
        }
    }
}

impl<E: JoinSemilattice + Clone> JoinSemilattice for Lifted<E> {
    fn lub(&self, other: &Self) -> Self {
        match (self, other) {
            (Lifted::Bottom, x) | (x, Lifted::Bottom) => x.clone(),
            (Lifted::Value(a), Lifted::Value(b)) => Lifted::Value(a.lub(b)),
        }
    }
}

impl<E: MeetSemilattice + Clone> MeetSemilattice for Lifted<E> {
    fn glb(&self, other: &Self) -> Self {
        match (self, other) {
            (Lifted::Bottom, _) | (_, Lifted::Bottom) => Lifted::Bottom,
            (Lifted::Value(a), Lifted::Value(b)) => Lifted::Value(a.glb(b)),
        }
    }
}

impl<E: BoundedLattice + Clone> BoundedLattice for Lifted<E> {
    fn bot() -> Self {
        Lifted::Bottom
    }

    fn top() -> Self {
        Lifted::Value(E::top())
    }

    fn height(&self) -> u64 {
        match self {
            Lifted::Bottom => E::top().height() + 1,
            Lifted::Value(e) => e.height(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bottom_is_leq_everything() {
        assert!(Lifted::<bool>::Bottom.leq(&Lifted::Bottom));
        assert!(Lifted::<bool>::Bottom.leq(&Lifted::Value(false)));
        assert!(!Lifted::Value(false).leq(&Lifted::<bool>::Bottom));
    }

    #[test]
    fn lub_with_bottom_is_identity() {
        assert_eq!(
            Lifted::<bool>::Bottom.lub(&Lifted::Value(true)),
            Lifted::Value(true)
        );
    }

    #[test]
    fn lub_of_two_values_delegates() {
        assert_eq!(
            Lifted::Value(false).lub(&Lifted::Value(true)),
            Lifted::Value(true)
        );
    }

    #[test]
    fn height_of_bottom_exceeds_top() {
        let bottom = Lifted::<bool>::Bottom;
        let top = Lifted::<bool>::top();
        assert!(bottom.height() > top.height());
    }
}
