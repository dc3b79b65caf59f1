#![cfg(feature = "persistent")]
//! Property-based tests for the structural merge of HashDict.
//!
//! Every merge is checked against the same merge computed entry by entry
//! over `std::collections::HashMap`. Most properties run under two lossy
//! hashes. The shallow one only looks at the lowest two bits of the key, so
//! colliding buckets meet singletons and tries at the root. The deep one
//! only sets bits 40 and up, so the same shapes meet eight levels down and
//! merges recurse through chains of one-child tries.

use std::collections::HashMap;

use hashtrie::persistent::{ArrayDict, Entry, HashDict, MergeOptions};
use hashtrie::typeclass::{FnEqHash, HashValue, NaturalEquality};
use proptest::prelude::*;

type Lossy = FnEqHash<u16, fn(&u16, &u16) -> bool, fn(&u16) -> HashValue>;

fn same_key(left: &u16, right: &u16) -> bool {
    left == right
}

fn low_bits(key: &u16) -> HashValue {
    HashValue::from(key & 0b11)
}

/// Places the distinguishing bits at levels 8 and 12.
fn deep_prefix(key: &u16) -> HashValue {
    let key = HashValue::from(*key);
    ((key % 8) << 40) | ((key % 5) << 61)
}

#[derive(Debug, Clone, Copy)]
enum Prefix {
    Shallow,
    Deep,
}

impl Prefix {
    fn eq_hash(self) -> Lossy {
        match self {
            Self::Shallow => FnEqHash::new(same_key, low_bits),
            Self::Deep => FnEqHash::new(same_key, deep_prefix),
        }
    }
}

fn arbitrary_prefix() -> impl Strategy<Value = Prefix> {
    prop_oneof![Just(Prefix::Shallow), Just(Prefix::Deep)]
}

// =============================================================================
// Strategy for generating test data
// =============================================================================

fn arbitrary_entries() -> impl Strategy<Value = Vec<(u16, i32)>> {
    prop::collection::vec((0..96_u16, -50..50_i32), 0..60)
}

fn to_model(entries: &[(u16, i32)]) -> HashMap<u16, i32> {
    entries.iter().copied().collect()
}

fn to_std<H>(dict: &HashDict<u16, i32, H>) -> HashMap<u16, i32> {
    dict.iter().map(|(key, value)| (*key, *value)).collect()
}

/// Merges two models the way `merge_with` is documented to.
fn merge_model(
    left: &HashMap<u16, i32>,
    right: &HashMap<u16, i32>,
    both: impl Fn(i32, i32) -> Option<i32>,
    only_left: Option<&dyn Fn(i32) -> Option<i32>>,
    only_right: Option<&dyn Fn(i32) -> Option<i32>>,
) -> HashMap<u16, i32> {
    let mut result = HashMap::new();
    for (key, value) in left {
        let merged = match right.get(key) {
            Some(other) => both(*value, *other),
            None => only_left.and_then(|function| function(*value)),
        };
        if let Some(merged) = merged {
            result.insert(*key, merged);
        }
    }
    for (key, value) in right {
        if !left.contains_key(key)
            && let Some(merged) = only_right.and_then(|function| function(*value))
        {
            result.insert(*key, merged);
        }
    }
    result
}

fn keep(value: i32) -> Option<i32> {
    Some(value)
}

fn keep_positive(value: i32) -> Option<i32> {
    (value > 0).then_some(value)
}

// =============================================================================
// Merge-Left / Merge-Right Laws
// =============================================================================

proptest! {
    #[test]
    fn prop_merge_left_prefers_left(
        prefix in arbitrary_prefix(),
        left in arbitrary_entries(),
        right in arbitrary_entries()
    ) {
        let left_dict = HashDict::from_entries(prefix.eq_hash(), left.iter().copied());
        let right_dict = HashDict::from_entries(prefix.eq_hash(), right.iter().copied());
        let merged = left_dict.merge_left(&right_dict);

        prop_assert!(merged.check_invariant().is_ok());
        for (key, value) in &left_dict {
            prop_assert_eq!(merged.get(key), Some(value));
        }
        for (key, value) in &right_dict {
            if !left_dict.contains_key(key) {
                prop_assert_eq!(merged.get(key), Some(value));
            }
        }
        let expected = merge_model(
            &to_model(&left),
            &to_model(&right),
            |mine, _| Some(mine),
            Some(&keep),
            Some(&keep),
        );
        prop_assert_eq!(to_std(&merged), expected);
    }

    #[test]
    fn prop_merge_right_prefers_right(
        left in arbitrary_entries(),
        right in arbitrary_entries()
    ) {
        let left_dict: HashDict<u16, i32> = left.iter().copied().collect();
        let right_dict: HashDict<u16, i32> = right.iter().copied().collect();
        let merged = left_dict.merge_right(&right_dict);

        prop_assert!(merged.check_invariant().is_ok());
        let expected = merge_model(
            &to_model(&left),
            &to_model(&right),
            |_, theirs| Some(theirs),
            Some(&keep),
            Some(&keep),
        );
        prop_assert_eq!(to_std(&merged), expected);
    }

    #[test]
    fn prop_merge_left_and_right_agree_when_swapped(
        prefix in arbitrary_prefix(),
        left in arbitrary_entries(),
        right in arbitrary_entries()
    ) {
        let left_dict = HashDict::from_entries(prefix.eq_hash(), left);
        let right_dict = HashDict::from_entries(prefix.eq_hash(), right);

        prop_assert!(left_dict.merge_left(&right_dict) == right_dict.merge_right(&left_dict));
    }
}

// =============================================================================
// Model Law: merge_left / merge_right agree with the association list
// =============================================================================

fn to_array_dict(entries: &[(u16, i32)]) -> ArrayDict<u16, i32> {
    entries.iter().fold(ArrayDict::new(), |dict, (key, value)| {
        dict.set(*key, *value, &NaturalEquality)
    })
}

proptest! {
    #[test]
    fn prop_merges_match_array_dict(
        prefix in arbitrary_prefix(),
        left in arbitrary_entries(),
        right in arbitrary_entries()
    ) {
        let left_dict = HashDict::from_entries(prefix.eq_hash(), left.iter().copied());
        let right_dict = HashDict::from_entries(prefix.eq_hash(), right.iter().copied());
        let left_model = to_array_dict(&left);
        let right_model = to_array_dict(&right);

        let merged_left = left_dict.merge_left(&right_dict);
        let model_left = left_model.merge_left(right_model.iter(), &NaturalEquality);
        prop_assert_eq!(merged_left.len(), model_left.len());
        for Entry { key, value } in &model_left {
            prop_assert_eq!(merged_left.get(key), Some(value));
        }

        let merged_right = left_dict.merge_right(&right_dict);
        let model_right = left_model.merge_right(right_model.iter(), &NaturalEquality);
        prop_assert_eq!(merged_right.len(), model_right.len());
        for Entry { key, value } in &model_right {
            prop_assert_eq!(merged_right.get(key), Some(value));
        }
    }
}

// =============================================================================
// Merge-With Laws
// =============================================================================

proptest! {
    #[test]
    fn prop_inner_join_matches_model(
        prefix in arbitrary_prefix(),
        left in arbitrary_entries(),
        right in arbitrary_entries()
    ) {
        let left_dict = HashDict::from_entries(prefix.eq_hash(), left.iter().copied());
        let right_dict = HashDict::from_entries(prefix.eq_hash(), right.iter().copied());
        let joined = left_dict.merge_with(
            &right_dict,
            MergeOptions::new(|_, mine: &i32, theirs: &i32| keep_positive(mine - theirs)),
        );

        prop_assert!(joined.check_invariant().is_ok());
        let expected = merge_model(
            &to_model(&left),
            &to_model(&right),
            |mine, theirs| keep_positive(mine - theirs),
            None,
            None,
        );
        prop_assert_eq!(to_std(&joined), expected);
    }

    #[test]
    fn prop_one_sided_functions_filter_independently(
        prefix in arbitrary_prefix(),
        left in arbitrary_entries(),
        right in arbitrary_entries()
    ) {
        let left_dict = HashDict::from_entries(prefix.eq_hash(), left.iter().copied());
        let right_dict = HashDict::from_entries(prefix.eq_hash(), right.iter().copied());
        let options = MergeOptions::new(|_, mine: &i32, theirs: &i32| Some(mine * 1000 + theirs))
            .with_left(|_, mine: &i32| keep_positive(*mine))
            .with_right(|_, theirs: &i32| keep_positive(-*theirs));
        let merged = left_dict.merge_with(&right_dict, options);

        prop_assert!(merged.check_invariant().is_ok());
        let expected = merge_model(
            &to_model(&left),
            &to_model(&right),
            |mine, theirs| Some(mine * 1000 + theirs),
            Some(&keep_positive),
            Some(&|theirs: i32| keep_positive(-theirs)),
        );
        prop_assert_eq!(to_std(&merged), expected);
    }

    #[test]
    fn prop_difference_keeps_left_only_keys(
        prefix in arbitrary_prefix(),
        left in arbitrary_entries(),
        right in arbitrary_entries()
    ) {
        let left_dict = HashDict::from_entries(prefix.eq_hash(), left.iter().copied());
        let right_dict = HashDict::from_entries(prefix.eq_hash(), right.iter().copied());
        let difference = left_dict.merge_with(
            &right_dict,
            MergeOptions::new(|_, _: &i32, _: &i32| None).with_left(|_, mine: &i32| Some(*mine)),
        );

        prop_assert!(difference.check_invariant().is_ok());
        for (key, value) in &difference {
            prop_assert_eq!(left_dict.get(key), Some(value));
            prop_assert!(!right_dict.contains_key(key));
        }
        prop_assert_eq!(
            difference.len(),
            left_dict.keys().filter(|key| !right_dict.contains_key(*key)).count()
        );
    }

    #[test]
    fn prop_merge_with_empty_is_one_sided(
        prefix in arbitrary_prefix(),
        left in arbitrary_entries()
    ) {
        let left_dict = HashDict::from_entries(prefix.eq_hash(), left.iter().copied());
        let empty = HashDict::with_eq_hash(prefix.eq_hash());

        let doubled = left_dict.merge_with(
            &empty,
            MergeOptions::new(|_, _: &i32, _: &i32| None).with_left(|_, mine: &i32| Some(mine * 2)),
        );
        prop_assert!(doubled == left_dict.map(|_, value| value * 2));

        let dropped = empty.merge_with(
            &left_dict,
            MergeOptions::new(|_, mine: &i32, _: &i32| Some(*mine)),
        );
        prop_assert!(dropped.is_empty());
    }
}

// =============================================================================
// Merge-Entries Law: agrees with merge_with on distinct keys
// =============================================================================

proptest! {
    #[test]
    fn prop_merge_entries_matches_merge_with(
        prefix in arbitrary_prefix(),
        left in arbitrary_entries(),
        right in arbitrary_entries()
    ) {
        let left_dict = HashDict::from_entries(prefix.eq_hash(), left);
        let right_dict = HashDict::from_entries(prefix.eq_hash(), right);
        let options = || {
            MergeOptions::new(|_, mine: &i32, theirs: &i32| keep_positive(mine + theirs))
                .with_left(|_, mine: &i32| Some(*mine))
                .with_right(|_, theirs: &i32| keep_positive(*theirs))
        };

        let structural = left_dict.merge_with(&right_dict, options());
        let pairwise = left_dict.merge_entries(right_dict.clone(), options());

        prop_assert!(pairwise.check_invariant().is_ok());
        prop_assert!(structural == pairwise);
    }
}

// =============================================================================
// Filter-Map Laws
// =============================================================================

proptest! {
    #[test]
    fn prop_filter_map_matches_model(
        prefix in arbitrary_prefix(),
        entries in arbitrary_entries()
    ) {
        let dict = HashDict::from_entries(prefix.eq_hash(), entries.iter().copied());
        let transformed = dict.filter_map(|key, value| (key % 3 != 0).then_some(value * 2));

        prop_assert!(transformed.check_invariant().is_ok());
        let expected: HashMap<u16, i32> = to_model(&entries)
            .into_iter()
            .filter(|(key, _)| key % 3 != 0)
            .map(|(key, value)| (key, value * 2))
            .collect();
        prop_assert_eq!(to_std(&transformed), expected);
    }

    #[test]
    fn prop_filter_map_identity_is_equal(
        prefix in arbitrary_prefix(),
        entries in arbitrary_entries()
    ) {
        let dict = HashDict::from_entries(prefix.eq_hash(), entries);
        prop_assert!(dict.filter_map(|_, value| Some(*value)) == dict);
    }
}
