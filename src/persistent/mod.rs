//! Persistent (immutable) dictionaries and sets.
//!
//! - [`HashDict`]: hash dictionary built on a hash array mapped trie
//! - [`HashSet`]: hash set on top of `HashDict<T, ()>`
//! - [`ArrayDict`]: small association list, used for hash-collision buckets
//!
//! # Structural Sharing
//!
//! Updates never modify a value in place. They copy the path from the root
//! to the changed node and share everything else with the previous
//! version, so keeping old versions around is cheap.
//!
//! # Examples
//!
//! ## `HashDict`
//!
//! ```rust
//! use hashtrie::persistent::HashDict;
//!
//! let dict = HashDict::new()
//!     .set("one".to_string(), 1)
//!     .set("two".to_string(), 2);
//! assert_eq!(dict.get("one"), Some(&1));
//!
//! let updated = dict.set("one".to_string(), 100);
//! assert_eq!(dict.get("one"), Some(&1));       // Original unchanged
//! assert_eq!(updated.get("one"), Some(&100)); // New version
//! ```
//!
//! ## Merging
//!
//! ```rust
//! use hashtrie::persistent::{HashDict, MergeOptions};
//!
//! let left: HashDict<&str, i32> = [("a", 1), ("b", 2)].into_iter().collect();
//! let right: HashDict<&str, i32> = [("b", 3), ("c", 4)].into_iter().collect();
//!
//! // Keep keys on both sides only, subtracting the right value.
//! let diff = left.merge_with(&right, MergeOptions::new(|_, a, b| Some(a - b)));
//! assert_eq!(diff.len(), 1);
//! assert_eq!(diff.get("b"), Some(&-1));
//! ```
//!
//! ## `HashSet`
//!
//! ```rust
//! use hashtrie::persistent::HashSet;
//!
//! let set = HashSet::new().insert(1).insert(2).insert(3);
//! let other: HashSet<i32> = [2, 3, 4].into_iter().collect();
//!
//! assert_eq!(set.union(&other).len(), 4);        // {1, 2, 3, 4}
//! assert_eq!(set.intersection(&other).len(), 2); // {2, 3}
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer shared by trie nodes.
///
/// With the `arc` feature this is `std::sync::Arc`, which makes the
/// collections `Send` and `Sync`. Without it this is `std::rc::Rc`, which
/// has cheaper reference counting but keeps them on one thread.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

mod array_dict;
mod entry;
mod error;
pub mod hashdict;
pub mod hashset;

pub use array_dict::ArrayDict;
pub use entry::Entry;
pub use error::InvariantViolation;
pub use hashdict::HashDict;
pub use hashdict::MergeOptions;
pub use hashset::HashSet;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod reference_counter_tests {
    use super::ReferenceCounter;
    use rstest::rstest;

    #[rstest]
    fn test_reference_counter_shares_node() {
        let node: ReferenceCounter<Vec<u8>> = ReferenceCounter::new(vec![1, 2, 3]);
        let shared = node.clone();
        assert!(ReferenceCounter::ptr_eq(&node, &shared));
    }

    #[rstest]
    fn test_reference_counter_strong_count() {
        let node: ReferenceCounter<i32> = ReferenceCounter::new(42);
        assert_eq!(ReferenceCounter::strong_count(&node), 1);
        let shared = node.clone();
        assert_eq!(ReferenceCounter::strong_count(&node), 2);
        drop(shared);
        assert_eq!(ReferenceCounter::strong_count(&node), 1);
    }
}
