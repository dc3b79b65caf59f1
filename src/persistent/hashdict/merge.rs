//! Structural merge of two tries, and single-trie `filter_map`.
//!
//! Both walks visit the two tries in lockstep and only touch subtrees that
//! actually need combining. A subtree present on one side only is passed
//! through the matching one-sided function.
//!
//! Node shape pairs form a 4 x 4 matrix over
//! `Empty < Singleton < Bucket < Trie`. Only the upper triangle is
//! implemented; a pair from the lower triangle swaps its arguments together
//! with the merge functions and recurses.

use arrayvec::ArrayVec;

use super::node::{
    BITS_PER_LEVEL, Node, NodeRef, empty, from_bucket_entries, hoist, index, make_trie, singleton,
};
use super::sparse_array::{SLOT_COUNT, SparseArray};
use crate::persistent::{ArrayDict, Entry, ReferenceCounter};
use crate::typeclass::{Equality, HashValue};

/// Combines a value on both sides.
type BothFn<'f, K, A, B, C> = dyn Fn(&K, &A, &B) -> Option<C> + 'f;

/// Transforms a value present on one side only.
type OneSideFn<'f, K, A, C> = dyn Fn(&K, &A) -> Option<C> + 'f;

// =============================================================================
// MergeOptions
// =============================================================================

/// The functions deciding how two dictionaries are merged.
///
/// Every function returns `Option<C>`; `None` drops the key from the result.
///
/// - `both` runs for keys present in both dictionaries.
/// - `left` runs for keys present only in the left dictionary. Without it
///   those keys are dropped.
/// - `right` runs for keys present only in the right dictionary. Without it
///   those keys are dropped.
///
/// # Examples
///
/// ```rust
/// use hashtrie::persistent::{HashDict, MergeOptions};
///
/// let prices: HashDict<&str, u32> = [("apple", 3), ("pear", 5)].into_iter().collect();
/// let stock: HashDict<&str, u32> = [("apple", 10), ("plum", 2)].into_iter().collect();
///
/// // Inner join: keep only fruit with both a price and a stock level.
/// let value = prices.merge_with(&stock, MergeOptions::new(|_, price, count| Some(price * count)));
/// assert_eq!(value.len(), 1);
/// assert_eq!(value.get("apple"), Some(&30));
///
/// // Left join: unknown stock counts as zero.
/// let value = prices.merge_with(
///     &stock,
///     MergeOptions::new(|_, price, count| Some(price * count)).with_left(|_, _| Some(0)),
/// );
/// assert_eq!(value.get("pear"), Some(&0));
/// assert_eq!(value.get("plum"), None);
/// ```
pub struct MergeOptions<'f, K, A, B, C> {
    both: Box<BothFn<'f, K, A, B, C>>,
    left: Option<Box<OneSideFn<'f, K, A, C>>>,
    right: Option<Box<OneSideFn<'f, K, B, C>>>,
}

impl<'f, K, A, B, C> MergeOptions<'f, K, A, B, C> {
    /// Creates options that combine shared keys with `both` and drop every
    /// one-sided key.
    #[must_use]
    pub fn new<F>(both: F) -> Self
    where
        F: Fn(&K, &A, &B) -> Option<C> + 'f,
    {
        Self {
            both: Box::new(both),
            left: None,
            right: None,
        }
    }

    /// Keeps keys found only on the left, transformed by `function`.
    #[must_use]
    pub fn with_left<F>(mut self, function: F) -> Self
    where
        F: Fn(&K, &A) -> Option<C> + 'f,
    {
        self.left = Some(Box::new(function));
        self
    }

    /// Keeps keys found only on the right, transformed by `function`.
    #[must_use]
    pub fn with_right<F>(mut self, function: F) -> Self
    where
        F: Fn(&K, &B) -> Option<C> + 'f,
    {
        self.right = Some(Box::new(function));
        self
    }

    pub(crate) fn both(&self, key: &K, left: &A, right: &B) -> Option<C> {
        (self.both)(key, left, right)
    }

    pub(crate) fn left(&self, key: &K, value: &A) -> Option<C> {
        self.left.as_ref().and_then(|function| function(key, value))
    }

    pub(crate) fn right(&self, key: &K, value: &B) -> Option<C> {
        self.right.as_ref().and_then(|function| function(key, value))
    }

    pub(crate) const fn has_left(&self) -> bool {
        self.left.is_some()
    }

    /// Runs `body` with the borrowed function table used by [`merge`].
    pub(crate) fn with_functions<R>(
        &self,
        body: impl FnOnce(MergeFunctions<'_, K, A, B, C>) -> R,
    ) -> R {
        let both = &*self.both;
        let both_swapped = |key: &K, right: &B, left: &A| both(key, left, right);
        body(MergeFunctions {
            both,
            both_swapped: &both_swapped,
            only_left: self.left.as_deref(),
            only_right: self.right.as_deref(),
        })
    }
}

// =============================================================================
// MergeFunctions
// =============================================================================

/// Borrowed merge functions, in both argument orders.
pub(crate) struct MergeFunctions<'f, K, A, B, C> {
    both: &'f BothFn<'f, K, A, B, C>,
    both_swapped: &'f BothFn<'f, K, B, A, C>,
    only_left: Option<&'f OneSideFn<'f, K, A, C>>,
    only_right: Option<&'f OneSideFn<'f, K, B, C>>,
}

impl<K, A, B, C> Clone for MergeFunctions<'_, K, A, B, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, A, B, C> Copy for MergeFunctions<'_, K, A, B, C> {}

impl<'f, K, A, B, C> MergeFunctions<'f, K, A, B, C> {
    /// The same functions for the merge of `right` with `left`.
    const fn swap(self) -> MergeFunctions<'f, K, B, A, C> {
        MergeFunctions {
            both: self.both_swapped,
            both_swapped: self.both,
            only_left: self.only_right,
            only_right: self.only_left,
        }
    }
}

// =============================================================================
// Merge
// =============================================================================

const fn rank<K, V>(node: &Node<K, V>) -> u8 {
    match node {
        Node::Empty => 0,
        Node::Singleton { .. } => 1,
        Node::Bucket { .. } => 2,
        Node::Trie { .. } => 3,
    }
}

/// Merges two nodes at `level` into a new node.
pub(crate) fn merge<K, A, B, C, E>(
    left: &NodeRef<K, A>,
    right: &NodeRef<K, B>,
    level: u32,
    functions: MergeFunctions<'_, K, A, B, C>,
    equality: &E,
) -> NodeRef<K, C>
where
    K: Clone,
    C: Clone,
    E: Equality<K> + ?Sized,
{
    if rank(left) > rank(right) {
        return merge(right, left, level, functions.swap(), equality);
    }
    match (&**left, &**right) {
        (Node::Empty, _) => transform(right, functions.only_right),
        (Node::Singleton { hash: hash_a, entry }, Node::Singleton { hash: hash_b, .. })
        | (Node::Singleton { hash: hash_a, entry }, Node::Bucket { hash: hash_b, .. }) => {
            if hash_a == hash_b {
                let right_entries = leaf_entries(right);
                merge_colliding(
                    *hash_a,
                    std::slice::from_ref(entry),
                    right_entries,
                    functions,
                    equality,
                )
            } else {
                merge_disjoint(*hash_a, left, *hash_b, right, level, functions)
            }
        }
        (
            Node::Bucket {
                hash: hash_a,
                entries: entries_a,
            },
            Node::Bucket {
                hash: hash_b,
                entries: entries_b,
            },
        ) => {
            if hash_a == hash_b {
                merge_colliding(
                    *hash_a,
                    entries_a.as_slice(),
                    entries_b.as_slice(),
                    functions,
                    equality,
                )
            } else {
                merge_disjoint(*hash_a, left, *hash_b, right, level, functions)
            }
        }
        (Node::Singleton { hash, .. } | Node::Bucket { hash, .. }, Node::Trie { children, .. }) => {
            merge_leaf_into_trie(*hash, left, children, level, functions, equality)
        }
        (Node::Trie { children: children_a, .. }, Node::Trie { children: children_b, .. }) => {
            let mut merged: ArrayVec<(usize, NodeRef<K, C>), SLOT_COUNT> = ArrayVec::new();
            for slot in 0..SLOT_COUNT {
                let child = match (children_a.get(slot), children_b.get(slot)) {
                    (Some(a), Some(b)) => merge(a, b, level + BITS_PER_LEVEL, functions, equality),
                    (Some(a), None) => transform(a, functions.only_left),
                    (None, Some(b)) => transform(b, functions.only_right),
                    (None, None) => continue,
                };
                if !child.is_empty() {
                    merged.push((slot, child));
                }
            }
            trie_from_children(SparseArray::from_sorted_entries(merged))
        }
        _ => unreachable!("merge arguments are ordered by node rank"),
    }
}

fn leaf_entries<K, V>(node: &Node<K, V>) -> &[Entry<K, V>] {
    match node {
        Node::Singleton { entry, .. } => std::slice::from_ref(entry),
        Node::Bucket { entries, .. } => entries.as_slice(),
        _ => &[],
    }
}

/// Merges two leaves whose keys all hash to `hash`.
///
/// Membership is decided against the original inputs, so a key dropped by
/// one function is never offered to another.
fn merge_colliding<K, A, B, C, E>(
    hash: HashValue,
    left: &[Entry<K, A>],
    right: &[Entry<K, B>],
    functions: MergeFunctions<'_, K, A, B, C>,
    equality: &E,
) -> NodeRef<K, C>
where
    K: Clone,
    C: Clone,
    E: Equality<K> + ?Sized,
{
    let mut merged: Vec<Entry<K, C>> = Vec::with_capacity(left.len() + right.len());
    for a in left {
        let value = match right.iter().find(|b| equality.equal(&a.key, &b.key)) {
            Some(b) => (functions.both)(&a.key, &a.value, &b.value),
            None => functions.only_left.and_then(|function| function(&a.key, &a.value)),
        };
        if let Some(value) = value {
            merged.push(Entry::new(a.key.clone(), value));
        }
    }
    if let Some(only_right) = functions.only_right {
        for b in right {
            if left.iter().any(|a| equality.equal(&a.key, &b.key)) {
                continue;
            }
            if let Some(value) = only_right(&b.key, &b.value) {
                merged.push(Entry::new(b.key.clone(), value));
            }
        }
    }
    from_bucket_entries(hash, ArrayDict::from_entries(merged))
}

/// Merges two leaves with different hashes: no key can be shared.
fn merge_disjoint<K, A, B, C>(
    hash_a: HashValue,
    left: &NodeRef<K, A>,
    hash_b: HashValue,
    right: &NodeRef<K, B>,
    level: u32,
    functions: MergeFunctions<'_, K, A, B, C>,
) -> NodeRef<K, C>
where
    K: Clone,
    C: Clone,
{
    let left = transform(left, functions.only_left);
    let right = transform(right, functions.only_right);
    match (left.is_empty(), right.is_empty()) {
        (true, _) => right,
        (_, true) => left,
        _ => make_trie(hash_a, left, hash_b, right, level),
    }
}

/// Merges a leaf with hash `hash` into a trie at `level`.
fn merge_leaf_into_trie<K, A, B, C, E>(
    hash: HashValue,
    leaf: &NodeRef<K, A>,
    children: &SparseArray<NodeRef<K, B>>,
    level: u32,
    functions: MergeFunctions<'_, K, A, B, C>,
    equality: &E,
) -> NodeRef<K, C>
where
    K: Clone,
    C: Clone,
    E: Equality<K> + ?Sized,
{
    let target = index(hash, level);
    let merged = children.filter_map(|slot, child| {
        let child = if slot == target {
            merge(leaf, child, level + BITS_PER_LEVEL, functions, equality)
        } else {
            transform(child, functions.only_right)
        };
        (!child.is_empty()).then_some(child)
    });
    if children.get(target).is_some() {
        return trie_from_children(merged);
    }
    let leaf = transform(leaf, functions.only_left);
    if leaf.is_empty() {
        trie_from_children(merged)
    } else {
        trie_from_children(merged.set(target, leaf))
    }
}

/// Builds a normalized trie from non-empty children.
///
/// No children yields `Empty`, and a lone child holding one entry is
/// hoisted in place of the trie.
fn trie_from_children<K, V>(children: SparseArray<NodeRef<K, V>>) -> NodeRef<K, V>
where
    K: Clone,
    V: Clone,
{
    match children.values() {
        [] => return empty(),
        [only] if only.size() == 1 => return hoist(only),
        _ => {}
    }
    let count = children.values().iter().map(|child| child.size()).sum();
    ReferenceCounter::new(Node::Trie { children, count })
}

// =============================================================================
// Filter-map
// =============================================================================

fn transform<K, A, C>(
    node: &NodeRef<K, A>,
    function: Option<&OneSideFn<'_, K, A, C>>,
) -> NodeRef<K, C>
where
    K: Clone,
    C: Clone,
{
    match function {
        Some(function) => filter_map(node, function),
        None => empty(),
    }
}

/// Applies `function` to every entry of `node`, dropping entries mapped to
/// `None`.
pub(crate) fn filter_map<K, A, C, F>(node: &NodeRef<K, A>, function: &F) -> NodeRef<K, C>
where
    K: Clone,
    C: Clone,
    F: Fn(&K, &A) -> Option<C> + ?Sized,
{
    match &**node {
        Node::Empty => empty(),
        Node::Singleton { hash, entry } => function(&entry.key, &entry.value)
            .map_or_else(empty, |value| singleton(*hash, entry.key.clone(), value)),
        Node::Bucket { hash, entries } => {
            from_bucket_entries(*hash, entries.filter_map(|key, value| function(key, value)))
        }
        Node::Trie { children, .. } => trie_from_children(children.filter_map(|_, child| {
            let child = filter_map(child, function);
            (!child.is_empty()).then_some(child)
        })),
    }
}

// =============================================================================
// Tests
// =============================================================================
