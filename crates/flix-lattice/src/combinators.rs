//! Pointwise lattice constructors: tuples, options, subset-ordered sets,
//! and pointwise maps.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::order::PartialOrder;
use crate::semilattice::{JoinSemilattice, MeetSemilattice};

impl<A: PartialOrder, B: PartialOrder> PartialOrder for (A, B) {
    fn leq(&self, other: &Self) -> bool {
        self.0.leq(&other.0) && self.1.leq(&other.1)
    }
}

impl<A: JoinSemilattice, B: JoinSemilattice> JoinSemilattice for (A, B) {
    fn lub(&self, other: &Self) -> Self {
        (self.0.lub(&other.0), self.1.lub(&other.1))
    }
}

impl<A: MeetSemilattice, B: MeetSemilattice> MeetSemilattice for (A, B) {
    fn glb(&self, other: &Self) -> Self {
        (self.0.glb(&other.0), self.1.glb(&other.1))
    }
}

/// `None` is the bottom of the pointwise option order; `Some(a) ⊑ Some(b)`
/// iff `a ⊑ b` in the wrapped order.
impl<E: PartialOrder> PartialOrder for Option<E> {
    fn leq(&self, other: &Self) -> bool {
        match (self, other) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(a), Some(b)) => a.leq(b),
        }
    }
}

impl<E: JoinSemilattice + Clone> JoinSemilattice for Option<E> {
    fn lub(&self, other: &Self) -> Self {
        match (self, other) {
            (None, x) | (x, None) => x.clone(),
            (Some(a), Some(b)) => Some(a.lub(b)),
        }
    }
}

impl<E: MeetSemilattice + Clone> MeetSemilattice for Option<E> {
    fn glb(&self, other: &Self) -> Self {
        match (self, other) {
            (None, _) | (_, None) => None,
            (Some(a), Some(b)) => Some(a.glb(b)),
        }
    }
}

/// Sets ordered by subset; `lub` is union, `glb` is intersection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubsetOrdered<T: Eq + Hash>(pub HashSet<T>);

impl<T: Eq + Hash + Clone> PartialOrder for SubsetOrdered<T> {
    fn leq(&self, other: &Self) -> bool {
        self.0.is_subset(&other.0)
    }
}

impl<T: Eq + Hash + Clone> JoinSemilattice for SubsetOrdered<T> {
    fn lub(&self, other: &Self) -> Self {
        SubsetOrdered(self.0.union(&other.0).cloned().collect())
    }
}

impl<T: Eq + Hash + Clone> MeetSemilattice for SubsetOrdered<T> {
    fn glb(&self, other: &Self) -> Self {
        SubsetOrdered(self.0.intersection(&other.0).cloned().collect())
    }
}

/// Maps ordered pointwise on the keys of the left operand: a missing key
/// on the right makes the comparison fail, never treating absence as ⊤.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointwiseMap<K: Eq + Hash, V>(pub HashMap<K, V>);

impl<K: Eq + Hash + Clone, V: PartialOrder> PartialOrder for PointwiseMap<K, V> {
    fn leq(&self, other: &Self) -> bool {
        self.0.iter().all(|(k, v)| match other.0.get(k) {
            Some(w) => v.leq(w),
            None => false,
        })
    }
}

impl<K: Eq + Hash + Clone, V: JoinSemilattice + Clone> JoinSemilattice for PointwiseMap<K, V> {
    fn lub(&self, other: &Self) -> Self {
        let mut out = self.0.clone();
        for (k, v) in &other.0 {
            out.entry(k.clone())
                .and_modify(|existing| *existing = existing.lub(v))
                .or_insert_with(|| v.clone());
        }
        PointwiseMap(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tuple_order_is_pointwise() {
        assert!((false, true).leq(&(true, true)));
        assert!(!(true, false).leq(&(false, true)));
    }

    #[test]
    fn option_none_is_bottom() {
        assert!(None::<bool>.leq(&Some(false)));
        assert!(!Some(true).leq(&None));
    }

    #[test]
    fn option_lub_prefers_present_value() {
        assert_eq!(None::<bool>.lub(&Some(true)), Some(true));
        assert_eq!(Some(true).lub(&None), Some(true));
    }

    #[test]
    fn subset_ordered_compares_by_subset() {
        let a = SubsetOrdered(HashSet::from([1, 2]));
        let b = SubsetOrdered(HashSet::from([1, 2, 3]));
        assert!(a.leq(&b));
        assert!(!b.leq(&a));
    }

    #[test]
    fn subset_lub_is_union() {
        let a = SubsetOrdered(HashSet::from([1]));
        let b = SubsetOrdered(HashSet::from([2]));
        assert_eq!(a.lub(&b).0, HashSet::from([1, 2]));
    }

    #[test]
    fn pointwise_map_missing_right_key_fails_leq() {
        let a = PointwiseMap(HashMap::from([("x", true)]));
        let b = PointwiseMap(HashMap::<&str, bool>::new());
        assert!(!a.leq(&b));
    }

    #[test]
    fn pointwise_map_lub_unions_keys() {
        let a = PointwiseMap(HashMap::from([("x", false)]));
        let b = PointwiseMap(HashMap::from([("x", true), ("y", true)]));
        let joined = a.lub(&b);
        assert_eq!(joined.0.get("x"), Some(&true));
        assert_eq!(joined.0.get("y"), Some(&true));
    }
}
