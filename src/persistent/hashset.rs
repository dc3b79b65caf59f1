//! Persistent (immutable) hash set.
//!
//! [`HashSet`] wraps a [`HashDict<T, ()>`](HashDict) and gets its set
//! algebra from the dictionary's structural merge: `union`,
//! `intersection`, `difference` and `symmetric_difference` only differ in
//! which merge functions they enable.
//!
//! # Examples
//!
//! ```rust
//! use hashtrie::persistent::HashSet;
//!
//! let set_a: HashSet<i32> = [1, 2, 3].into_iter().collect();
//! let set_b: HashSet<i32> = [2, 3, 4].into_iter().collect();
//!
//! assert_eq!(set_a.union(&set_b).len(), 4);
//! assert_eq!(set_a.intersection(&set_b).len(), 2);
//! assert_eq!(set_a.difference(&set_b).len(), 1);
//! assert_eq!(set_a.symmetric_difference(&set_b).len(), 2);
//! ```

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::iter::FusedIterator;

use super::hashdict::{self, HashDict, MergeOptions};
use crate::typeclass::{DefaultEqHash, EqHash};

// =============================================================================
// HashSet Definition
// =============================================================================

/// A persistent (immutable) hash set.
///
/// | Operation              | Complexity |
/// |------------------------|------------|
/// | `contains`             | O(log32 N) |
/// | `insert` / `remove`    | O(log32 N) |
/// | `len`                  | O(1)       |
/// | set algebra            | O(N + M)   |
pub struct HashSet<T, H = DefaultEqHash> {
    dict: HashDict<T, (), H>,
}

impl<T> HashSet<T> {
    /// Creates an empty set using [`DefaultEqHash`].
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            dict: HashDict::new(),
        }
    }

    /// Creates a set holding one element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hashtrie::persistent::HashSet;
    ///
    /// let set = HashSet::singleton("only");
    /// assert!(set.contains("only"));
    /// assert_eq!(set.len(), 1);
    /// ```
    #[must_use]
    pub fn singleton(element: T) -> Self
    where
        T: Clone + Hash + Eq,
    {
        Self {
            dict: HashDict::singleton(element, ()),
        }
    }
}

impl<T, H> HashSet<T, H> {
    /// Creates an empty set that compares and hashes elements with `eq_hash`.
    #[inline]
    #[must_use]
    pub fn with_eq_hash(eq_hash: H) -> Self {
        Self {
            dict: HashDict::with_eq_hash(eq_hash),
        }
    }

    /// Returns the number of elements.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.dict.len()
    }

    /// Returns `true` if the set has no elements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dict.is_empty()
    }

    /// Returns the element equality and hash used by this set.
    #[inline]
    #[must_use]
    pub const fn eq_hash(&self) -> &H {
        self.dict.eq_hash()
    }

    /// Iterates over the elements in unspecified but deterministic order.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            keys: self.dict.keys(),
        }
    }

    /// Returns `true` if `element` is in the set.
    #[must_use]
    pub fn contains<Q>(&self, element: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized,
        H: EqHash<Q>,
    {
        self.dict.contains_key(element)
    }
}

impl<T, H> HashSet<T, H>
where
    T: Clone,
    H: EqHash<T> + Clone,
{
    /// Creates a set from `elements`, dropping duplicates.
    #[must_use]
    pub fn from_elements<I>(eq_hash: H, elements: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Self {
            dict: HashDict::from_entries(
                eq_hash,
                elements.into_iter().map(|element| (element, ())),
            ),
        }
    }

    /// Returns a set that also contains `element`.
    #[must_use]
    pub fn insert(&self, element: T) -> Self {
        Self {
            dict: self.dict.set(element, ()),
        }
    }

    /// Returns a set without `element`.
    #[must_use]
    pub fn remove<Q>(&self, element: &Q) -> Self
    where
        T: Borrow<Q>,
        Q: ?Sized,
        H: EqHash<Q>,
    {
        Self {
            dict: self.dict.remove(element),
        }
    }

    /// Elements in either set.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            dict: self.dict.merge_left(&other.dict),
        }
    }

    /// Elements in both sets.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        self.combine(other, MergeOptions::new(|_, _, _| Some(())))
    }

    /// Elements in this set but not in `other`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hashtrie::persistent::HashSet;
    ///
    /// let left: HashSet<char> = "abc".chars().collect();
    /// let right: HashSet<char> = "bcd".chars().collect();
    /// let difference = left.difference(&right);
    /// assert_eq!(difference.iter().collect::<Vec<_>>(), vec![&'a']);
    /// ```
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        self.combine(
            other,
            MergeOptions::new(|_, _, _| None).with_left(|_, _| Some(())),
        )
    }

    /// Elements in exactly one of the two sets.
    #[must_use]
    pub fn symmetric_difference(&self, other: &Self) -> Self {
        self.combine(
            other,
            MergeOptions::new(|_, _, _| None)
                .with_left(|_, _| Some(()))
                .with_right(|_, _| Some(())),
        )
    }

    fn combine(&self, other: &Self, options: MergeOptions<'_, T, (), (), ()>) -> Self {
        Self {
            dict: self.dict.merge_with(&other.dict, options),
        }
    }

    /// Keeps the elements satisfying `predicate`.
    #[must_use]
    pub fn filter<F>(&self, predicate: F) -> Self
    where
        F: Fn(&T) -> bool,
    {
        Self {
            dict: self.dict.filter(|element, _| predicate(element)),
        }
    }
}

impl<T, H: EqHash<T>> HashSet<T, H> {
    /// Returns `true` if every element of this set is in `other`.
    #[must_use]
    pub fn is_subset(&self, other: &Self) -> bool {
        self.len() <= other.len() && self.iter().all(|element| other.contains(element))
    }

    /// Returns `true` if every element of `other` is in this set.
    #[must_use]
    pub fn is_superset(&self, other: &Self) -> bool {
        other.is_subset(self)
    }

    /// Returns `true` if the sets have no element in common.
    #[must_use]
    pub fn is_disjoint(&self, other: &Self) -> bool {
        let (smaller, larger) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        !smaller.iter().any(|element| larger.contains(element))
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// Borrowing iterator over the elements of a [`HashSet`].
pub struct Iter<'a, T> {
    keys: hashdict::Keys<'a, T, ()>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.keys.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

/// Owning iterator over the elements of a [`HashSet`].
pub struct IntoIter<T> {
    entries: hashdict::IntoIter<T, ()>,
}

impl<T: Clone> Iterator for IntoIter<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next().map(|(element, ())| element)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<T: Clone> ExactSizeIterator for IntoIter<T> {}
impl<T: Clone> FusedIterator for IntoIter<T> {}

// =============================================================================
// Trait Implementations
// =============================================================================

impl<T, H: Clone> Clone for HashSet<T, H> {
    fn clone(&self) -> Self {
        Self {
            dict: self.dict.clone(),
        }
    }
}

impl<T, H: Default> Default for HashSet<T, H> {
    fn default() -> Self {
        Self::with_eq_hash(H::default())
    }
}

impl<T, H> FromIterator<T> for HashSet<T, H>
where
    T: Clone,
    H: EqHash<T> + Clone + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_elements(H::default(), iter)
    }
}

impl<'a, T, H> IntoIterator for &'a HashSet<T, H> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Clone, H> IntoIterator for HashSet<T, H> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            entries: self.dict.into_iter(),
        }
    }
}

impl<T, H: EqHash<T>> PartialEq for HashSet<T, H> {
    fn eq(&self, other: &Self) -> bool {
        self.dict == other.dict
    }
}

impl<T, H: EqHash<T>> Eq for HashSet<T, H> {}

impl<T: fmt::Debug, H> fmt::Debug for HashSet<T, H> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display, H> fmt::Display for HashSet<T, H> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("[")?;
        for (position, element) in self.iter().enumerate() {
            if position > 0 {
                formatter.write_str(", ")?;
            }
            write!(formatter, "{element}")?;
        }
        formatter.write_str("]")
    }
}

// =============================================================================
// Tests
// =============================================================================
