//! Iterators over [`HashDict`](super::HashDict).
//!
//! Traversal is depth first with an explicit stack, so it is lazy and needs
//! no recursion. Tries are visited in ascending branch order and buckets in
//! storage order. The stack never grows beyond the trie depth (at most 14
//! levels for 64-bit hashes), which fits inline.

use std::iter::FusedIterator;

use smallvec::SmallVec;

use super::node::{Node, NodeRef};
use crate::persistent::Entry;

/// Stack frames kept inline before spilling to the heap.
const STACK_INLINE: usize = 8;

enum Frame<'a, K, V> {
    Entries(std::slice::Iter<'a, Entry<K, V>>),
    Children(std::slice::Iter<'a, NodeRef<K, V>>),
}

impl<K, V> Clone for Frame<'_, K, V> {
    fn clone(&self) -> Self {
        match self {
            Self::Entries(entries) => Self::Entries(entries.clone()),
            Self::Children(children) => Self::Children(children.clone()),
        }
    }
}

// =============================================================================
// Iter
// =============================================================================

/// Borrowing iterator over the entries of a [`HashDict`](super::HashDict).
///
/// Created by [`HashDict::iter`](super::HashDict::iter).
pub struct Iter<'a, K, V> {
    stack: SmallVec<[Frame<'a, K, V>; STACK_INLINE]>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(root: &'a Node<K, V>) -> Self {
        let mut iterator = Self {
            stack: SmallVec::new(),
            remaining: root.size(),
        };
        iterator.push(root);
        iterator
    }

    fn push(&mut self, node: &'a Node<K, V>) {
        match node {
            Node::Empty => {}
            Node::Singleton { entry, .. } => {
                self.stack
                    .push(Frame::Entries(std::slice::from_ref(entry).iter()));
            }
            Node::Bucket { entries, .. } => self.stack.push(Frame::Entries(entries.iter())),
            Node::Trie { children, .. } => {
                self.stack.push(Frame::Children(children.values().iter()));
            }
        }
    }

    /// Next entry without unpacking it.
    fn next_entry(&mut self) -> Option<&'a Entry<K, V>> {
        loop {
            let child = match self.stack.last_mut()? {
                Frame::Entries(entries) => {
                    if let Some(entry) = entries.next() {
                        self.remaining -= 1;
                        return Some(entry);
                    }
                    None
                }
                Frame::Children(children) => children.next(),
            };
            match child {
                Some(child) => self.push(child),
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.next_entry().map(Entry::as_pair)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    #[inline]
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

// =============================================================================
// Keys / Values
// =============================================================================

/// Iterator over the keys of a [`HashDict`](super::HashDict).
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Keys<'a, K, V> {
    pub(crate) const fn new(inner: Iter<'a, K, V>) -> Self {
        Self { inner }
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next_entry().map(|entry| &entry.key)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}
impl<K, V> FusedIterator for Keys<'_, K, V> {}

/// Iterator over the values of a [`HashDict`](super::HashDict).
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Values<'a, K, V> {
    pub(crate) const fn new(inner: Iter<'a, K, V>) -> Self {
        Self { inner }
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next_entry().map(|entry| &entry.value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}
impl<K, V> FusedIterator for Values<'_, K, V> {}

// =============================================================================
// IntoIter
// =============================================================================

/// Owning iterator over the entries of a [`HashDict`](super::HashDict).
///
/// Nodes may be shared with other dictionaries, so entries are cloned out
/// rather than moved.
pub struct IntoIter<K, V> {
    stack: SmallVec<[(NodeRef<K, V>, usize); STACK_INLINE]>,
    remaining: usize,
}

impl<K, V> IntoIter<K, V> {
    pub(crate) fn new(root: NodeRef<K, V>) -> Self {
        let remaining = root.size();
        let mut stack = SmallVec::new();
        stack.push((root, 0));
        Self { stack, remaining }
    }
}

impl<K: Clone, V: Clone> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (node, position) = self.stack.last_mut()?;
            let descend = match &**node {
                Node::Trie { children, .. } => {
                    let child = children.values().get(*position).cloned();
                    *position += 1;
                    child
                }
                leaf => {
                    let entry = match leaf {
                        Node::Singleton { entry, .. } => (*position == 0).then_some(entry),
                        Node::Bucket { entries, .. } => entries.as_slice().get(*position),
                        _ => None,
                    };
                    if let Some(entry) = entry {
                        *position += 1;
                        self.remaining -= 1;
                        return Some((entry.key.clone(), entry.value.clone()));
                    }
                    None
                }
            };
            match descend {
                Some(child) => self.stack.push((child, 0)),
                None => {
                    self.stack.pop();
                }
            }
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K: Clone, V: Clone> ExactSizeIterator for IntoIter<K, V> {}
impl<K: Clone, V: Clone> FusedIterator for IntoIter<K, V> {}

// =============================================================================
// Tests
// =============================================================================
