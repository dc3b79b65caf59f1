#![cfg(feature = "persistent")]
//! Property-based tests for HashSet laws.
//!
//! The set algebra is derived from the dictionary merge, so each operation
//! is compared against `std::collections::HashSet`.

use std::collections::HashSet as StdHashSet;

use hashtrie::persistent::HashSet;
use proptest::prelude::*;

fn arbitrary_elements() -> impl Strategy<Value = Vec<i16>> {
    prop::collection::vec(-200..200_i16, 0..80)
}

fn to_std(set: &HashSet<i16>) -> StdHashSet<i16> {
    set.iter().copied().collect()
}

// =============================================================================
// Insert-Contains / Remove-Contains Laws
// =============================================================================

proptest! {
    #[test]
    fn prop_insert_contains_law(elements in arbitrary_elements(), element: i16) {
        let set: HashSet<i16> = elements.into_iter().collect();
        prop_assert!(set.insert(element).contains(&element));
    }

    #[test]
    fn prop_remove_contains_law(elements in arbitrary_elements(), element: i16) {
        let set: HashSet<i16> = elements.into_iter().collect();
        prop_assert!(!set.remove(&element).contains(&element));
    }

    #[test]
    fn prop_len_matches_distinct_elements(elements in arbitrary_elements()) {
        let model: StdHashSet<i16> = elements.iter().copied().collect();
        let set: HashSet<i16> = elements.into_iter().collect();
        prop_assert_eq!(set.len(), model.len());
        prop_assert_eq!(set.iter().count(), model.len());
    }
}

// =============================================================================
// Set Algebra Laws
// =============================================================================

proptest! {
    #[test]
    fn prop_union_matches_model(left in arbitrary_elements(), right in arbitrary_elements()) {
        let left_set: HashSet<i16> = left.iter().copied().collect();
        let right_set: HashSet<i16> = right.iter().copied().collect();
        let expected: StdHashSet<i16> = left.into_iter().chain(right).collect();
        prop_assert_eq!(to_std(&left_set.union(&right_set)), expected);
    }

    #[test]
    fn prop_intersection_matches_model(
        left in arbitrary_elements(),
        right in arbitrary_elements()
    ) {
        let left_set: HashSet<i16> = left.iter().copied().collect();
        let right_set: HashSet<i16> = right.iter().copied().collect();
        let left_model: StdHashSet<i16> = left.into_iter().collect();
        let right_model: StdHashSet<i16> = right.into_iter().collect();
        let expected: StdHashSet<i16> = left_model.intersection(&right_model).copied().collect();
        prop_assert_eq!(to_std(&left_set.intersection(&right_set)), expected);
    }

    #[test]
    fn prop_difference_matches_model(left in arbitrary_elements(), right in arbitrary_elements()) {
        let left_set: HashSet<i16> = left.iter().copied().collect();
        let right_set: HashSet<i16> = right.iter().copied().collect();
        let left_model: StdHashSet<i16> = left.into_iter().collect();
        let right_model: StdHashSet<i16> = right.into_iter().collect();
        let expected: StdHashSet<i16> = left_model.difference(&right_model).copied().collect();
        prop_assert_eq!(to_std(&left_set.difference(&right_set)), expected);
    }

    #[test]
    fn prop_symmetric_difference_matches_model(
        left in arbitrary_elements(),
        right in arbitrary_elements()
    ) {
        let left_set: HashSet<i16> = left.iter().copied().collect();
        let right_set: HashSet<i16> = right.iter().copied().collect();
        let left_model: StdHashSet<i16> = left.into_iter().collect();
        let right_model: StdHashSet<i16> = right.into_iter().collect();
        let expected: StdHashSet<i16> =
            left_model.symmetric_difference(&right_model).copied().collect();
        prop_assert_eq!(to_std(&left_set.symmetric_difference(&right_set)), expected);
    }

    #[test]
    fn prop_union_is_commutative(left in arbitrary_elements(), right in arbitrary_elements()) {
        let left_set: HashSet<i16> = left.into_iter().collect();
        let right_set: HashSet<i16> = right.into_iter().collect();
        prop_assert_eq!(left_set.union(&right_set), right_set.union(&left_set));
    }

    #[test]
    fn prop_intersection_is_subset_of_both(
        left in arbitrary_elements(),
        right in arbitrary_elements()
    ) {
        let left_set: HashSet<i16> = left.into_iter().collect();
        let right_set: HashSet<i16> = right.into_iter().collect();
        let intersection = left_set.intersection(&right_set);
        prop_assert!(intersection.is_subset(&left_set));
        prop_assert!(intersection.is_subset(&right_set));
        prop_assert!(left_set.difference(&right_set).is_disjoint(&right_set));
    }
}
