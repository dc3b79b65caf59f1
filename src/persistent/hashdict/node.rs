//! Hash trie nodes and the point operations on them.
//!
//! A trie is a tree of [`Node`]s shared through [`ReferenceCounter`]. Updates
//! copy the path from the root to the changed leaf and share every other
//! subtree with the previous version.
//!
//! A node at level `L` (a multiple of [`BITS_PER_LEVEL`]) dispatches on bits
//! `L..L + 5` of the key hash. Leaves hold their full hash, so a leaf can sit
//! at any depth as long as its hash agrees with the branch indices above it.

use std::borrow::Borrow;

use super::sparse_array::SparseArray;
use crate::persistent::{ArrayDict, Entry, InvariantViolation, ReferenceCounter};
use crate::typeclass::{EqHash, Equality, HashValue};

// =============================================================================
// Constants and hash helpers
// =============================================================================

/// Bits of the hash consumed per trie level.
pub(crate) const BITS_PER_LEVEL: u32 = 5;

/// Mask selecting one branch index.
const BRANCH_MASK: HashValue = 0x1F;

/// Branch index of `hash` at `level`.
///
/// Levels at or beyond the hash width yield index 0.
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub(crate) const fn index(hash: HashValue, level: u32) -> usize {
    let shifted = match hash.checked_shr(level) {
        Some(shifted) => shifted,
        None => 0,
    };
    (shifted & BRANCH_MASK) as usize
}

/// Mask selecting the hash bits already consumed above `level`.
#[inline]
const fn prefix_mask(level: u32) -> HashValue {
    if level >= HashValue::BITS {
        HashValue::MAX
    } else {
        (1 << level) - 1
    }
}

// =============================================================================
// Node definition
// =============================================================================

/// Shared pointer to a node.
pub(crate) type NodeRef<K, V> = ReferenceCounter<Node<K, V>>;

/// A hash trie node.
pub(crate) enum Node<K, V> {
    /// No entries.
    Empty,
    /// A single entry with its cached hash.
    Singleton { hash: HashValue, entry: Entry<K, V> },
    /// Two or more entries whose keys share `hash`.
    Bucket {
        hash: HashValue,
        entries: ArrayDict<K, V>,
    },
    /// An interior node. `count` is the number of entries below it.
    Trie {
        children: SparseArray<NodeRef<K, V>>,
        count: usize,
    },
}

/// Allocates an empty node.
#[inline]
pub(crate) fn empty<K, V>() -> NodeRef<K, V> {
    ReferenceCounter::new(Node::Empty)
}

/// Allocates a leaf holding one entry.
#[inline]
pub(crate) fn singleton<K, V>(hash: HashValue, key: K, value: V) -> NodeRef<K, V> {
    ReferenceCounter::new(Node::Singleton {
        hash,
        entry: Entry::new(key, value),
    })
}

/// Builds the smallest leaf holding `entries`, which all hash to `hash`.
pub(crate) fn from_bucket_entries<K: Clone, V: Clone>(
    hash: HashValue,
    entries: ArrayDict<K, V>,
) -> NodeRef<K, V> {
    match entries.len() {
        0 => empty(),
        1 => match entries.first() {
            Some(entry) => ReferenceCounter::new(Node::Singleton {
                hash,
                entry: entry.clone(),
            }),
            None => unreachable!("bucket of length 1 has a first entry"),
        },
        _ => ReferenceCounter::new(Node::Bucket { hash, entries }),
    }
}

/// Returns a singleton holding the only entry of `node`, reusing `node`
/// when it already is one.
pub(crate) fn hoist<K: Clone, V: Clone>(node: &NodeRef<K, V>) -> NodeRef<K, V> {
    debug_assert_eq!(node.size(), 1, "only single-entry nodes can be hoisted");
    match &**node {
        Node::Singleton { .. } => node.clone(),
        other => match other.first() {
            Some((hash, entry)) => ReferenceCounter::new(Node::Singleton {
                hash,
                entry: entry.clone(),
            }),
            None => unreachable!("single-entry node has a first entry"),
        },
    }
}

/// Builds a trie holding two leaves with different hashes.
///
/// # Panics
///
/// Panics if `hash_a == hash_b`; equal hashes belong in a bucket.
pub(crate) fn make_trie<K, V>(
    hash_a: HashValue,
    a: NodeRef<K, V>,
    hash_b: HashValue,
    b: NodeRef<K, V>,
    level: u32,
) -> NodeRef<K, V> {
    assert!(
        hash_a != hash_b,
        "cannot split two nodes with the same hash {hash_a:#018x} into a trie"
    );
    let count = a.size() + b.size();
    let index_a = index(hash_a, level);
    let index_b = index(hash_b, level);
    let children = if index_a == index_b {
        let child = make_trie(hash_a, a, hash_b, b, level + BITS_PER_LEVEL);
        SparseArray::from_sorted_entries([(index_a, child)])
    } else {
        SparseArray::from_entries([(index_a, a), (index_b, b)])
    };
    ReferenceCounter::new(Node::Trie { children, count })
}

// =============================================================================
// Read-only operations
// =============================================================================

impl<K, V> Node<K, V> {
    /// Number of entries in this subtree. O(1).
    #[inline]
    pub(crate) fn size(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Singleton { .. } => 1,
            Self::Bucket { entries, .. } => entries.len(),
            Self::Trie { count, .. } => *count,
        }
    }

    #[inline]
    pub(crate) const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Looks up `key`, whose hash is `hash`, in a node at `level`.
    pub(crate) fn get<Q, E>(&self, key: &Q, hash: HashValue, level: u32, equality: &E) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        E: Equality<Q> + ?Sized,
    {
        let mut node = self;
        let mut level = level;
        loop {
            match node {
                Self::Empty => return None,
                Self::Singleton {
                    hash: stored,
                    entry,
                } => {
                    return (*stored == hash && equality.equal(key, entry.key.borrow()))
                        .then_some(&entry.value);
                }
                Self::Bucket {
                    hash: stored,
                    entries,
                } => {
                    return if *stored == hash {
                        entries.get(key, equality)
                    } else {
                        None
                    };
                }
                Self::Trie { children, .. } => {
                    node = &**children.get(index(hash, level))?;
                    level += BITS_PER_LEVEL;
                }
            }
        }
    }

    /// Some entry of this subtree together with its hash.
    ///
    /// The choice is deterministic: the first entry in iteration order.
    pub(crate) fn first(&self) -> Option<(HashValue, &Entry<K, V>)> {
        match self {
            Self::Empty => None,
            Self::Singleton { hash, entry } => Some((*hash, entry)),
            Self::Bucket { hash, entries } => entries.first().map(|entry| (*hash, entry)),
            Self::Trie { children, .. } => children.first().and_then(|child| child.first()),
        }
    }

    /// Validates this subtree, which sits at `level` below the branch
    /// indices packed into `prefix`.
    pub(crate) fn check_invariant<H>(
        &self,
        level: u32,
        prefix: HashValue,
        eq_hash: &H,
    ) -> Result<(), InvariantViolation>
    where
        H: EqHash<K> + ?Sized,
    {
        match self {
            Self::Empty => Ok(()),
            Self::Singleton { hash, entry } => {
                check_hash(*hash, &entry.key, eq_hash)?;
                check_prefix(*hash, prefix, level)
            }
            Self::Bucket { hash, entries } => {
                if entries.len() < 2 {
                    return Err(InvariantViolation::UndersizedBucket {
                        size: entries.len(),
                    });
                }
                for entry in entries {
                    check_hash(*hash, &entry.key, eq_hash)?;
                }
                check_prefix(*hash, prefix, level)
            }
            Self::Trie { children, count } => {
                if children.is_empty() {
                    return Err(InvariantViolation::EmptyTrie);
                }
                let mut actual = 0;
                for (slot, child) in children.iter() {
                    let slot_bits = (slot as HashValue).checked_shl(level).unwrap_or(0);
                    child
                        .check_invariant(level + BITS_PER_LEVEL, prefix | slot_bits, eq_hash)
                        .map_err(|violation| InvariantViolation::in_child(slot, violation))?;
                    actual += child.size();
                }
                if actual == *count {
                    Ok(())
                } else {
                    Err(InvariantViolation::WrongCount {
                        cached: *count,
                        actual,
                    })
                }
            }
        }
    }
}

fn check_hash<K, H>(cached: HashValue, key: &K, eq_hash: &H) -> Result<(), InvariantViolation>
where
    H: EqHash<K> + ?Sized,
{
    let actual = eq_hash.hash(key);
    if actual == cached {
        Ok(())
    } else {
        Err(InvariantViolation::WrongHash { cached, actual })
    }
}

const fn check_prefix(
    hash: HashValue,
    prefix: HashValue,
    level: u32,
) -> Result<(), InvariantViolation> {
    if hash & prefix_mask(level) == prefix {
        Ok(())
    } else {
        Err(InvariantViolation::PrefixMismatch {
            hash,
            prefix,
            level,
        })
    }
}

// =============================================================================
// Path-copying updates
// =============================================================================

/// Returns `node` with `key` mapped to `value`.
pub(crate) fn updated<K, V, E>(
    node: &NodeRef<K, V>,
    key: K,
    value: V,
    hash: HashValue,
    level: u32,
    equality: &E,
) -> NodeRef<K, V>
where
    K: Clone,
    V: Clone,
    E: Equality<K> + ?Sized,
{
    match &**node {
        Node::Empty => singleton(hash, key, value),
        Node::Singleton {
            hash: stored,
            entry,
        } => {
            if *stored != hash {
                make_trie(*stored, node.clone(), hash, singleton(hash, key, value), level)
            } else if equality.equal(&key, &entry.key) {
                singleton(hash, key, value)
            } else {
                ReferenceCounter::new(Node::Bucket {
                    hash,
                    entries: ArrayDict::from_entries([entry.clone(), Entry::new(key, value)]),
                })
            }
        }
        Node::Bucket {
            hash: stored,
            entries,
        } => {
            if *stored == hash {
                ReferenceCounter::new(Node::Bucket {
                    hash,
                    entries: entries.set(key, value, equality),
                })
            } else {
                make_trie(*stored, node.clone(), hash, singleton(hash, key, value), level)
            }
        }
        Node::Trie { children, count } => {
            let slot = index(hash, level);
            let (child, count) = match children.get(slot) {
                Some(child) => {
                    let new_child =
                        updated(child, key, value, hash, level + BITS_PER_LEVEL, equality);
                    let count = count - child.size() + new_child.size();
                    (new_child, count)
                }
                None => (singleton(hash, key, value), count + 1),
            };
            ReferenceCounter::new(Node::Trie {
                children: children.set(slot, child),
                count,
            })
        }
    }
}

/// Returns `node` without `key`, and whether `key` was present.
///
/// When the key is absent the returned pointer is `node` itself.
pub(crate) fn removed<K, V, Q, E>(
    node: &NodeRef<K, V>,
    key: &Q,
    hash: HashValue,
    level: u32,
    equality: &E,
) -> (NodeRef<K, V>, bool)
where
    K: Clone + Borrow<Q>,
    V: Clone,
    Q: ?Sized,
    E: Equality<Q> + ?Sized,
{
    let unchanged = || (node.clone(), false);
    match &**node {
        Node::Empty => unchanged(),
        Node::Singleton {
            hash: stored,
            entry,
        } => {
            if *stored == hash && equality.equal(key, entry.key.borrow()) {
                (empty(), true)
            } else {
                unchanged()
            }
        }
        Node::Bucket {
            hash: stored,
            entries,
        } => {
            if *stored != hash {
                return unchanged();
            }
            match entries.remove(key, equality) {
                (remaining, true) => (from_bucket_entries(hash, remaining), true),
                (_, false) => unchanged(),
            }
        }
        Node::Trie { children, count } => {
            let slot = index(hash, level);
            let Some(child) = children.get(slot) else {
                return unchanged();
            };
            let (new_child, was_present) =
                removed(child, key, hash, level + BITS_PER_LEVEL, equality);
            if !was_present {
                return unchanged();
            }
            debug_assert!(*count > 0, "trie count underflow");
            if !new_child.is_empty() {
                let node = ReferenceCounter::new(Node::Trie {
                    children: children.set(slot, new_child),
                    count: count - 1,
                });
                return (node, true);
            }
            let remaining = children.remove(slot);
            let node = match remaining.size() {
                0 => empty(),
                1 if remaining.values()[0].size() == 1 => hoist(&remaining.values()[0]),
                _ => ReferenceCounter::new(Node::Trie {
                    children: remaining,
                    count: count - 1,
                }),
            };
            (node, true)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
