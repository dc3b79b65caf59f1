//! Persistent hash dictionary based on a hash array mapped trie (HAMT).
//!
//! [`HashDict`] maps keys to values through a 32-way trie indexed by 5-bit
//! slices of the key hash. Interior nodes store only their occupied
//! branches (a bitmap plus a dense array), so sparse nodes stay small.
//! Keys whose complete 64-bit hashes collide share a bucket.
//!
//! Every update returns a new dictionary and leaves the receiver intact.
//! The two versions share all subtrees that the update did not touch.
//!
//! Equality and hashing of keys come from an [`EqHash`] value stored in the
//! dictionary rather than from [`Eq`] and [`Hash`](std::hash::Hash) bounds.
//! [`DefaultEqHash`] covers keys implementing both.

mod iterator;
mod merge;
mod node;
mod sparse_array;

use std::borrow::Borrow;
use std::fmt;

pub use iterator::{IntoIter, Iter, Keys, Values};
pub use merge::MergeOptions;

use merge::{filter_map, merge};
use node::{NodeRef, empty, removed, updated};

use super::{InvariantViolation, ReferenceCounter};
use crate::typeclass::{DefaultEqHash, EqHash, Equality, NaturalEquality};

// =============================================================================
// HashDict Definition
// =============================================================================

/// A persistent (immutable) hash dictionary.
///
/// # Time Complexity
///
/// | Operation                  | Complexity   |
/// |----------------------------|--------------|
/// | `get` / `contains_key`     | O(log32 N)   |
/// | `set` / `remove`           | O(log32 N)   |
/// | `len` / `is_empty`         | O(1)         |
/// | `iter`                     | O(N)         |
/// | `merge_with` / `filter_map`| O(N + M)     |
///
/// Operations on colliding keys additionally scan their bucket linearly.
///
/// # Examples
///
/// ```rust
/// use hashtrie::persistent::HashDict;
///
/// let dict = HashDict::new().set("one".to_string(), 1).set("two".to_string(), 2);
/// assert_eq!(dict.get("one"), Some(&1));
///
/// // The original is preserved.
/// let updated = dict.set("one".to_string(), 100);
/// assert_eq!(dict.get("one"), Some(&1));
/// assert_eq!(updated.get("one"), Some(&100));
/// ```
pub struct HashDict<K, V, H = DefaultEqHash> {
    root: NodeRef<K, V>,
    eq_hash: H,
}

impl<K, V> HashDict<K, V> {
    /// Creates an empty dictionary using [`DefaultEqHash`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hashtrie::persistent::HashDict;
    ///
    /// let dict: HashDict<String, i32> = HashDict::new();
    /// assert!(dict.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_eq_hash(DefaultEqHash::default())
    }

    /// Creates a dictionary holding a single entry.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hashtrie::persistent::HashDict;
    ///
    /// let dict = HashDict::singleton("key", 42);
    /// assert_eq!(dict.len(), 1);
    /// assert_eq!(dict.get("key"), Some(&42));
    /// ```
    #[must_use]
    pub fn singleton(key: K, value: V) -> Self
    where
        K: Clone + std::hash::Hash + Eq,
        V: Clone,
    {
        Self::new().set(key, value)
    }
}

impl<K, V, H> HashDict<K, V, H> {
    /// Creates an empty dictionary that compares and hashes keys with
    /// `eq_hash`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hashtrie::persistent::HashDict;
    /// use hashtrie::typeclass::IdentityEqHash;
    ///
    /// let dict = HashDict::with_eq_hash(IdentityEqHash).set(7_u32, "seven");
    /// assert_eq!(dict.get(&7), Some(&"seven"));
    /// ```
    #[inline]
    #[must_use]
    pub fn with_eq_hash(eq_hash: H) -> Self {
        Self {
            root: empty(),
            eq_hash,
        }
    }

    /// Returns the number of entries. O(1).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.root.size()
    }

    /// Returns `true` if the dictionary has no entries.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Returns the key equality and hash used by this dictionary.
    #[inline]
    #[must_use]
    pub const fn eq_hash(&self) -> &H {
        &self.eq_hash
    }

    /// Returns `true` if both dictionaries share the same root node, which
    /// implies equal contents.
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        ReferenceCounter::ptr_eq(&self.root, &other.root)
    }

    /// Iterates over `(key, value)` pairs.
    ///
    /// The order is deterministic for a given dictionary but otherwise
    /// unspecified: it follows the key hashes, and within a collision bucket
    /// the insertion history.
    #[inline]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.root)
    }

    /// Iterates over the keys, in the same order as [`HashDict::iter`].
    #[inline]
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }

    /// Iterates over the values, in the same order as [`HashDict::iter`].
    #[inline]
    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.iter())
    }

    /// Returns a reference to the value stored for `key`.
    ///
    /// The key may be any borrowed form of the key type that the dictionary's
    /// [`EqHash`] also handles consistently.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hashtrie::persistent::HashDict;
    ///
    /// let dict = HashDict::new().set("hello".to_string(), 42);
    /// assert_eq!(dict.get("hello"), Some(&42));
    /// assert_eq!(dict.get("world"), None);
    /// ```
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: EqHash<Q>,
    {
        let hash = self.eq_hash.hash(key);
        self.root.get(key, hash, 0, &self.eq_hash)
    }

    /// Returns a copy of the value stored for `key`, or `default`.
    #[must_use]
    pub fn get_or<Q>(&self, key: &Q, default: V) -> V
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: EqHash<Q>,
        V: Clone,
    {
        self.get(key).cloned().unwrap_or(default)
    }

    /// Returns a copy of the value stored for `key`, or `V::default()`.
    #[must_use]
    pub fn get_or_default<Q>(&self, key: &Q) -> V
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: EqHash<Q>,
        V: Clone + Default,
    {
        self.get(key).cloned().unwrap_or_default()
    }

    /// Returns `true` if `key` is present.
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: EqHash<Q>,
    {
        self.get(key).is_some()
    }

    fn with_root<U>(&self, root: NodeRef<K, U>) -> HashDict<K, U, H>
    where
        H: Clone,
    {
        HashDict {
            root,
            eq_hash: self.eq_hash.clone(),
        }
    }
}

impl<K, V, H> HashDict<K, V, H>
where
    K: Clone,
    V: Clone,
    H: EqHash<K> + Clone,
{
    /// Creates a dictionary from `entries`; later duplicates win.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hashtrie::persistent::HashDict;
    /// use hashtrie::typeclass::IdentityEqHash;
    ///
    /// let dict = HashDict::from_entries(IdentityEqHash, [(1_i64, 'a'), (2, 'b'), (1, 'c')]);
    /// assert_eq!(dict.len(), 2);
    /// assert_eq!(dict.get(&1), Some(&'c'));
    /// ```
    #[must_use]
    pub fn from_entries<I>(eq_hash: H, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        entries
            .into_iter()
            .fold(Self::with_eq_hash(eq_hash), |dict, (key, value)| {
                dict.set(key, value)
            })
    }

    /// Returns a dictionary in which `key` maps to `value`.
    ///
    /// # Complexity
    ///
    /// O(log32 N)
    #[must_use]
    pub fn set(&self, key: K, value: V) -> Self {
        let hash = self.eq_hash.hash(&key);
        self.with_root(updated(&self.root, key, value, hash, 0, &self.eq_hash))
    }

    /// Returns a dictionary without `key`.
    ///
    /// Removing a missing key returns a dictionary sharing this one's root.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hashtrie::persistent::HashDict;
    ///
    /// let dict = HashDict::new().set("a", 1).set("b", 2);
    /// let removed = dict.remove("a");
    /// assert_eq!(removed.len(), 1);
    /// assert!(dict.remove("z").ptr_eq(&dict));
    /// ```
    #[must_use]
    pub fn remove<Q>(&self, key: &Q) -> Self
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: EqHash<Q>,
    {
        let hash = EqHash::<Q>::hash(&self.eq_hash, key);
        let (root, _) = removed(&self.root, key, hash, 0, &self.eq_hash);
        self.with_root(root)
    }

    /// Merges `other` into this dictionary as directed by `options`.
    ///
    /// Both dictionaries are expected to use the same key equality and hash;
    /// the result uses this dictionary's.
    ///
    /// # Complexity
    ///
    /// O(N + M), but subtrees present on one side only are visited only when
    /// the corresponding one-sided function is set.
    #[must_use]
    pub fn merge_with<B, C>(
        &self,
        other: &HashDict<K, B, H>,
        options: MergeOptions<'_, K, V, B, C>,
    ) -> HashDict<K, C, H>
    where
        C: Clone,
    {
        let root = options.with_functions(|functions| {
            merge(&self.root, &other.root, 0, functions, &self.eq_hash)
        });
        self.with_root(root)
    }

    /// Merges `other` into this dictionary, keeping every key and resolving
    /// keys present in both with `combine(key, mine, theirs)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hashtrie::persistent::HashDict;
    ///
    /// let left: HashDict<&str, i32> = [("a", 1), ("b", 2)].into_iter().collect();
    /// let right: HashDict<&str, i32> = [("b", 20), ("c", 30)].into_iter().collect();
    ///
    /// let merged = left.merge(&right, |_, mine, theirs| mine + theirs);
    /// assert_eq!(merged.get("a"), Some(&1));
    /// assert_eq!(merged.get("b"), Some(&22));
    /// assert_eq!(merged.get("c"), Some(&30));
    /// ```
    #[must_use]
    pub fn merge<F>(&self, other: &Self, combine: F) -> Self
    where
        F: Fn(&K, &V, &V) -> V,
    {
        self.merge_with(other, keep_all(combine))
    }

    /// Merges `other` into this dictionary; values already here win.
    #[must_use]
    pub fn merge_left(&self, other: &Self) -> Self {
        self.merge(other, |_, mine, _| mine.clone())
    }

    /// Merges `other` into this dictionary; values from `other` win.
    #[must_use]
    pub fn merge_right(&self, other: &Self) -> Self {
        self.merge(other, |_, _, theirs| theirs.clone())
    }

    /// Merges arbitrary `(key, value)` pairs into this dictionary as
    /// directed by `options`.
    ///
    /// Unlike [`HashDict::merge_with`] this cannot walk two tries in
    /// lockstep; every pair is looked up individually. When a key occurs
    /// more than once in `entries`, the last occurrence decides the result.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hashtrie::persistent::{HashDict, MergeOptions};
    ///
    /// let counts: HashDict<&str, u32> = [("apple", 1)].into_iter().collect();
    /// let merged = counts.merge_entries(
    ///     [("apple", 2), ("pear", 5)],
    ///     MergeOptions::new(|_, mine: &u32, theirs: &u32| Some(mine + theirs))
    ///         .with_right(|_, theirs: &u32| Some(*theirs)),
    /// );
    /// assert_eq!(merged.get("apple"), Some(&3));
    /// assert_eq!(merged.get("pear"), Some(&5));
    /// ```
    #[must_use]
    pub fn merge_entries<B, C, I>(
        &self,
        entries: I,
        options: MergeOptions<'_, K, V, B, C>,
    ) -> HashDict<K, C, H>
    where
        C: Clone,
        I: IntoIterator<Item = (K, B)>,
    {
        let mut result = HashDict::with_eq_hash(self.eq_hash.clone());
        let mut seen = HashDict::with_eq_hash(self.eq_hash.clone());
        for (key, value) in entries {
            let merged = match self.get(&key) {
                Some(existing) => options.both(&key, existing, &value),
                None => options.right(&key, &value),
            };
            if options.has_left() {
                seen = seen.set(key.clone(), ());
            }
            result = match merged {
                Some(merged) => result.set(key, merged),
                None => result.remove(&key),
            };
        }
        if options.has_left() {
            for (key, value) in self {
                if seen.contains_key(key) {
                    continue;
                }
                if let Some(merged) = options.left(key, value) {
                    result = result.set(key.clone(), merged);
                }
            }
        }
        result
    }

    /// Transforms every value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hashtrie::persistent::HashDict;
    ///
    /// let dict: HashDict<&str, i32> = [("a", 1), ("b", 2)].into_iter().collect();
    /// let doubled = dict.map(|_, value| value * 2);
    /// assert_eq!(doubled.get("b"), Some(&4));
    /// ```
    #[must_use]
    pub fn map<U, F>(&self, function: F) -> HashDict<K, U, H>
    where
        U: Clone,
        F: Fn(&K, &V) -> U,
    {
        self.filter_map(|key, value| Some(function(key, value)))
    }

    /// Keeps the entries satisfying `predicate`.
    #[must_use]
    pub fn filter<F>(&self, predicate: F) -> Self
    where
        F: Fn(&K, &V) -> bool,
    {
        self.filter_map(|key, value| predicate(key, value).then(|| value.clone()))
    }

    /// Transforms every value, dropping entries mapped to `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hashtrie::persistent::HashDict;
    ///
    /// let dict: HashDict<&str, &str> = [("a", "1"), ("b", "x")].into_iter().collect();
    /// let parsed = dict.filter_map(|_, value| value.parse::<i32>().ok());
    /// assert_eq!(parsed.len(), 1);
    /// assert_eq!(parsed.get("a"), Some(&1));
    /// ```
    #[must_use]
    pub fn filter_map<U, F>(&self, function: F) -> HashDict<K, U, H>
    where
        U: Clone,
        F: Fn(&K, &V) -> Option<U>,
    {
        self.with_root(filter_map(&self.root, &function))
    }
}

impl<K, V, H: EqHash<K>> HashDict<K, V, H> {
    /// Returns `true` if both dictionaries hold the same keys with values
    /// equal under `values`.
    ///
    /// The comparison ignores iteration order, which can differ between
    /// equal dictionaries when colliding keys were inserted in different
    /// orders.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hashtrie::persistent::HashDict;
    /// use hashtrie::typeclass::IgnoreAsciiCase;
    ///
    /// let left = HashDict::new().set(1, "Hello");
    /// let right = HashDict::new().set(1, "HELLO");
    /// assert!(left.equal_by(&right, &IgnoreAsciiCase));
    /// assert!(left != right);
    /// ```
    #[must_use]
    pub fn equal_by<E>(&self, other: &Self, values: &E) -> bool
    where
        E: Equality<V> + ?Sized,
    {
        if self.len() != other.len() {
            return false;
        }
        self.ptr_eq(other)
            || self.iter().all(|(key, value)| {
                other
                    .get(key)
                    .is_some_and(|other_value| values.equal(value, other_value))
            })
    }

    /// Validates the internal structure of the trie.
    ///
    /// Intended for tests and debugging; a dictionary built through the
    /// public API always passes.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    pub fn check_invariant(&self) -> Result<(), InvariantViolation> {
        self.root.check_invariant(0, 0, &self.eq_hash)
    }
}

/// Options for a merge that keeps every key.
fn keep_all<'f, K, V, F>(combine: F) -> MergeOptions<'f, K, V, V, V>
where
    V: Clone,
    F: Fn(&K, &V, &V) -> V + 'f,
{
    MergeOptions::new(move |key, mine, theirs| Some(combine(key, mine, theirs)))
        .with_left(|_, mine: &V| Some(mine.clone()))
        .with_right(|_, theirs: &V| Some(theirs.clone()))
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl<K, V, H: Clone> Clone for HashDict<K, V, H> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            eq_hash: self.eq_hash.clone(),
        }
    }
}

impl<K, V, H: Default> Default for HashDict<K, V, H> {
    #[inline]
    fn default() -> Self {
        Self::with_eq_hash(H::default())
    }
}

impl<K, V, H> FromIterator<(K, V)> for HashDict<K, V, H>
where
    K: Clone,
    V: Clone,
    H: EqHash<K> + Clone + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_entries(H::default(), iter)
    }
}

impl<'a, K, V, H> IntoIterator for &'a HashDict<K, V, H> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Clone, V: Clone, H> IntoIterator for HashDict<K, V, H> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.root)
    }
}

impl<K, V: PartialEq, H: EqHash<K>> PartialEq for HashDict<K, V, H> {
    fn eq(&self, other: &Self) -> bool {
        self.equal_by(other, &NaturalEquality)
    }
}

impl<K, V: Eq, H: EqHash<K>> Eq for HashDict<K, V, H> {}

impl<K: fmt::Debug, V: fmt::Debug, H> fmt::Debug for HashDict<K, V, H> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K: fmt::Display, V: fmt::Display, H> fmt::Display for HashDict<K, V, H> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("[")?;
        for (position, (key, value)) in self.iter().enumerate() {
            if position > 0 {
                formatter.write_str(", ")?;
            }
            write!(formatter, "{key} -> {value}")?;
        }
        formatter.write_str("]")
    }
}

#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(HashDict<String, i32>: Send, Sync);

// =============================================================================
// Tests
// =============================================================================
