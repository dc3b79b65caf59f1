//! Small linear dictionary used for hash-collision buckets.
//!
//! [`ArrayDict`] stores entries in insertion order and finds keys by linear
//! scan. It does not store its key equality; every operation that compares
//! keys takes an [`Equality`] argument. This lets the hash trie share the
//! single [`EqHash`](crate::typeclass::EqHash) instance held by the
//! dictionary facade.
//!
//! Every operation is O(n). Buckets only hold keys whose full 64-bit hashes
//! collide, so in practice they contain two entries, which fit inline
//! without a heap allocation.
//!
//! `ArrayDict` is also a convenient reference model when testing the hash
//! trie, since its behaviour is obvious.
//!
//! # Examples
//!
//! ```rust
//! use hashtrie::persistent::ArrayDict;
//! use hashtrie::typeclass::NaturalEquality;
//!
//! let dict = ArrayDict::new()
//!     .set("x", 1, &NaturalEquality)
//!     .set("y", 2, &NaturalEquality)
//!     .set("x", 10, &NaturalEquality);
//!
//! assert_eq!(dict.get(&"x", &NaturalEquality), Some(&10));
//! // Replacing keeps the original position.
//! assert_eq!(dict.first().map(|entry| entry.key), Some("x"));
//! ```

use std::borrow::Borrow;
use std::fmt;

use smallvec::SmallVec;

use super::Entry;
use crate::typeclass::Equality;

/// Entries stored without a heap allocation.
const INLINE_CAPACITY: usize = 2;

/// An immutable association list with externally supplied key equality.
#[derive(Clone, PartialEq, Eq)]
pub struct ArrayDict<K, V> {
    entries: SmallVec<[Entry<K, V>; INLINE_CAPACITY]>,
}

impl<K, V> ArrayDict<K, V> {
    /// Creates an empty dictionary.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: SmallVec::new(),
        }
    }

    /// Creates a dictionary holding `entries` in the given order.
    ///
    /// Keys are not deduplicated; callers pass distinct keys.
    #[must_use]
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = Entry<K, V>>,
    {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Returns the number of entries.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the first entry in storage order.
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&Entry<K, V>> {
        self.entries.first()
    }

    /// Iterates over the entries in storage order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Entry<K, V>> {
        self.entries.iter()
    }

    /// Returns the entries as a slice, in storage order.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[Entry<K, V>] {
        &self.entries
    }

    /// Returns a reference to the value stored for `key`.
    pub fn get<Q, E>(&self, key: &Q, equality: &E) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        E: Equality<Q> + ?Sized,
    {
        self.position(key, equality)
            .map(|position| &self.entries[position].value)
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key<Q, E>(&self, key: &Q, equality: &E) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        E: Equality<Q> + ?Sized,
    {
        self.position(key, equality).is_some()
    }

    fn position<Q, E>(&self, key: &Q, equality: &E) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        E: Equality<Q> + ?Sized,
    {
        self.entries
            .iter()
            .position(|entry| equality.equal(key, entry.key.borrow()))
    }

    /// Transforms and filters the entries, keeping those for which
    /// `function` returns `Some`.
    pub fn filter_map<U, F>(&self, mut function: F) -> ArrayDict<K, U>
    where
        K: Clone,
        F: FnMut(&K, &V) -> Option<U>,
    {
        ArrayDict {
            entries: self
                .entries
                .iter()
                .filter_map(|entry| {
                    function(&entry.key, &entry.value)
                        .map(|value| Entry::new(entry.key.clone(), value))
                })
                .collect(),
        }
    }
}

impl<K: Clone, V: Clone> ArrayDict<K, V> {
    /// Returns a dictionary in which `key` maps to `value`.
    ///
    /// An existing key keeps its position and takes the new key and value;
    /// a new key is appended.
    #[must_use]
    pub fn set<E>(&self, key: K, value: V, equality: &E) -> Self
    where
        E: Equality<K> + ?Sized,
    {
        let mut entries = self.entries.clone();
        match self.position(&key, equality) {
            Some(position) => entries[position] = Entry::new(key, value),
            None => entries.push(Entry::new(key, value)),
        }
        Self { entries }
    }

    /// Returns a dictionary without `key`, and whether `key` was present.
    ///
    /// When the key is absent the returned dictionary is a clone of `self`.
    #[must_use]
    pub fn remove<Q, E>(&self, key: &Q, equality: &E) -> (Self, bool)
    where
        K: Borrow<Q>,
        Q: ?Sized,
        E: Equality<Q> + ?Sized,
    {
        match self.position(key, equality) {
            Some(position) => {
                let mut entries = self.entries.clone();
                entries.remove(position);
                (Self { entries }, true)
            }
            None => (self.clone(), false),
        }
    }

    /// Adds the entries of `other` whose keys are not present yet.
    ///
    /// Values already in `self` win.
    #[must_use]
    pub fn merge_left<'a, I, E>(&self, other: I, equality: &E) -> Self
    where
        I: IntoIterator<Item = &'a Entry<K, V>>,
        K: 'a,
        V: 'a,
        E: Equality<K> + ?Sized,
    {
        let mut entries = self.entries.clone();
        for entry in other {
            if !entries
                .iter()
                .any(|existing| equality.equal(&existing.key, &entry.key))
            {
                entries.push(entry.clone());
            }
        }
        Self { entries }
    }

    /// Sets every entry of `other`.
    ///
    /// Values from `other` win.
    #[must_use]
    pub fn merge_right<'a, I, E>(&self, other: I, equality: &E) -> Self
    where
        I: IntoIterator<Item = &'a Entry<K, V>>,
        K: 'a,
        V: 'a,
        E: Equality<K> + ?Sized,
    {
        other.into_iter().fold(self.clone(), |accumulator, entry| {
            accumulator.set(entry.key.clone(), entry.value.clone(), equality)
        })
    }
}

impl<K, V> Default for ArrayDict<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> FromIterator<Entry<K, V>> for ArrayDict<K, V> {
    fn from_iter<I: IntoIterator<Item = Entry<K, V>>>(iter: I) -> Self {
        Self::from_entries(iter)
    }
}

impl<'a, K, V> IntoIterator for &'a ArrayDict<K, V> {
    type Item = &'a Entry<K, V>;
    type IntoIter = std::slice::Iter<'a, Entry<K, V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for ArrayDict<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_map()
            .entries(self.entries.iter().map(Entry::as_pair))
            .finish()
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for ArrayDict<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("[")?;
        for (position, entry) in self.entries.iter().enumerate() {
            if position > 0 {
                formatter.write_str(", ")?;
            }
            write!(formatter, "{entry}")?;
        }
        formatter.write_str("]")
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typeclass::{IgnoreAsciiCase, NaturalEquality};
    use rstest::rstest;

    fn sample() -> ArrayDict<&'static str, i32> {
        ArrayDict::from_entries([Entry::new("a", 1), Entry::new("b", 2), Entry::new("c", 3)])
    }

    #[rstest]
    fn test_new_is_empty() {
        let dict: ArrayDict<i32, i32> = ArrayDict::new();
        assert!(dict.is_empty());
        assert_eq!(dict.len(), 0);
        assert!(dict.first().is_none());
    }

    #[rstest]
    #[case("a", Some(1))]
    #[case("c", Some(3))]
    #[case("z", None)]
    fn test_get(#[case] key: &'static str, #[case] expected: Option<i32>) {
        assert_eq!(sample().get(&key, &NaturalEquality).copied(), expected);
    }

    #[rstest]
    fn test_set_appends_new_key() {
        let dict = sample().set("d", 4, &NaturalEquality);
        assert_eq!(dict.len(), 4);
        let keys: Vec<_> = dict.iter().map(|entry| entry.key).collect();
        assert_eq!(keys, vec!["a", "b", "c", "d"]);
    }

    #[rstest]
    fn test_set_replaces_in_place() {
        let original = sample();
        let dict = original.set("b", 20, &NaturalEquality);
        let pairs: Vec<_> = dict.iter().map(|entry| (entry.key, entry.value)).collect();
        assert_eq!(pairs, vec![("a", 1), ("b", 20), ("c", 3)]);
        assert_eq!(original.get(&"b", &NaturalEquality), Some(&2));
    }

    #[rstest]
    fn test_set_uses_supplied_equality() {
        let dict = ArrayDict::new()
            .set("Key".to_string(), 1, &IgnoreAsciiCase)
            .set("KEY".to_string(), 2, &IgnoreAsciiCase);
        assert_eq!(dict.len(), 1);
        assert_eq!(dict.first().map(|entry| entry.key.as_str()), Some("KEY"));
    }

    #[rstest]
    fn test_remove_present_key() {
        let (dict, removed) = sample().remove(&"a", &NaturalEquality);
        assert!(removed);
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.first().map(|entry| entry.key), Some("b"));
    }

    #[rstest]
    fn test_remove_missing_key_is_unchanged() {
        let (dict, removed) = sample().remove(&"z", &NaturalEquality);
        assert!(!removed);
        assert_eq!(dict, sample());
    }

    #[rstest]
    fn test_filter_map() {
        let dict = sample().filter_map(|key, value| (*key != "b").then(|| value * 10));
        let pairs: Vec<_> = dict.iter().map(|entry| (entry.key, entry.value)).collect();
        assert_eq!(pairs, vec![("a", 10), ("c", 30)]);
    }

    #[rstest]
    fn test_merge_left_keeps_existing_values() {
        let other = ArrayDict::from_entries([Entry::new("c", 30), Entry::new("d", 40)]);
        let merged = sample().merge_left(&other, &NaturalEquality);
        assert_eq!(merged.get(&"c", &NaturalEquality), Some(&3));
        assert_eq!(merged.get(&"d", &NaturalEquality), Some(&40));
        assert_eq!(merged.len(), 4);
    }

    #[rstest]
    fn test_merge_right_prefers_incoming_values() {
        let other = ArrayDict::from_entries([Entry::new("c", 30), Entry::new("d", 40)]);
        let merged = sample().merge_right(&other, &NaturalEquality);
        assert_eq!(merged.get(&"c", &NaturalEquality), Some(&30));
        assert_eq!(merged.get(&"d", &NaturalEquality), Some(&40));
        assert_eq!(merged.len(), 4);
    }

    #[rstest]
    fn test_display_in_storage_order() {
        assert_eq!(sample().to_string(), "[a -> 1, b -> 2, c -> 3]");
    }
}
