//! Bitmap-indexed sparse array with at most 32 slots.
//!
//! Only occupied slots are stored, contiguously and in slot order. A 32-bit
//! bitmap records which slots are occupied; the dense position of slot `i`
//! is the number of occupied slots below `i`:
//!
//! ```text
//! bitmap   = 0b0000_0000_0000_0000_0000_0000_0010_0110   (slots 1, 2, 5)
//! values   = [v1, v2, v5]
//! position(5) = popcount(bitmap & 0b1_1111) = 2
//! ```
//!
//! All operations are persistent: `set` and `remove` return new arrays and
//! leave the receiver untouched.

use arrayvec::ArrayVec;

/// Number of slots.
pub(crate) const SLOT_COUNT: usize = 32;

/// A persistent sparse array over slots `0..32`.
#[derive(Clone, PartialEq, Eq)]
pub(crate) struct SparseArray<T> {
    bitmap: u32,
    values: Vec<T>,
}

#[inline]
fn bit(index: usize) -> u32 {
    assert!(
        index < SLOT_COUNT,
        "sparse array index {index} out of range 0..{SLOT_COUNT}"
    );
    1 << index
}

impl<T> SparseArray<T> {
    /// Creates an array with no occupied slots.
    #[inline]
    pub(crate) const fn new() -> Self {
        Self {
            bitmap: 0,
            values: Vec::new(),
        }
    }

    /// Builds an array from `(slot, value)` pairs in any order.
    ///
    /// Slots must be distinct.
    pub(crate) fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (usize, T)>,
    {
        let mut sorted: ArrayVec<(usize, T), SLOT_COUNT> = entries.into_iter().collect();
        sorted.sort_unstable_by_key(|(index, _)| *index);
        Self::from_sorted_entries(sorted)
    }

    /// Builds an array from `(slot, value)` pairs in strictly ascending slot
    /// order, without sorting.
    pub(crate) fn from_sorted_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (usize, T)>,
    {
        let entries = entries.into_iter();
        let mut bitmap = 0u32;
        let mut values = Vec::with_capacity(entries.size_hint().0);
        for (index, value) in entries {
            let mask = bit(index);
            debug_assert!(
                bitmap & !(mask - 1) == 0,
                "sparse array slots must be strictly ascending"
            );
            bitmap |= mask;
            values.push(value);
        }
        Self { bitmap, values }
    }

    #[inline]
    fn position(&self, mask: u32) -> usize {
        (self.bitmap & (mask - 1)).count_ones() as usize
    }

    /// Returns the value in slot `index`, if occupied.
    #[inline]
    pub(crate) fn get(&self, index: usize) -> Option<&T> {
        let mask = bit(index);
        if self.bitmap & mask == 0 {
            None
        } else {
            Some(&self.values[self.position(mask)])
        }
    }

    /// Returns the number of occupied slots.
    #[inline]
    pub(crate) fn size(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Occupied values in slot order.
    #[inline]
    pub(crate) fn values(&self) -> &[T] {
        &self.values
    }

    /// The value in the lowest occupied slot.
    #[inline]
    pub(crate) fn first(&self) -> Option<&T> {
        self.values.first()
    }

    /// Iterates over `(slot, value)` pairs in ascending slot order.
    #[inline]
    pub(crate) fn iter(&self) -> SparseArrayIter<'_, T> {
        SparseArrayIter {
            remaining: self.bitmap,
            values: self.values.iter(),
        }
    }

    /// Transforms occupied slots, dropping those for which `function` returns
    /// `None`. Slots keep their index.
    pub(crate) fn filter_map<U, F>(&self, mut function: F) -> SparseArray<U>
    where
        F: FnMut(usize, &T) -> Option<U>,
    {
        SparseArray::from_sorted_entries(
            self.iter()
                .filter_map(|(index, value)| function(index, value).map(|mapped| (index, mapped))),
        )
    }
}

impl<T: Clone> SparseArray<T> {
    /// Returns an array with slot `index` holding `value`.
    pub(crate) fn set(&self, index: usize, value: T) -> Self {
        let mask = bit(index);
        let position = self.position(mask);
        if self.bitmap & mask == 0 {
            let mut values = Vec::with_capacity(self.values.len() + 1);
            values.extend_from_slice(&self.values[..position]);
            values.push(value);
            values.extend_from_slice(&self.values[position..]);
            Self {
                bitmap: self.bitmap | mask,
                values,
            }
        } else {
            let mut values = self.values.clone();
            values[position] = value;
            Self {
                bitmap: self.bitmap,
                values,
            }
        }
    }

    /// Returns an array with slot `index` vacated.
    ///
    /// Vacating an empty slot yields an array with the same content.
    pub(crate) fn remove(&self, index: usize) -> Self {
        let mask = bit(index);
        if self.bitmap & mask == 0 {
            return self.clone();
        }
        let position = self.position(mask);
        let mut values = Vec::with_capacity(self.values.len() - 1);
        values.extend_from_slice(&self.values[..position]);
        values.extend_from_slice(&self.values[position + 1..]);
        Self {
            bitmap: self.bitmap & !mask,
            values,
        }
    }
}

impl<T> Default for SparseArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the occupied slots of a [`SparseArray`].
pub(crate) struct SparseArrayIter<'a, T> {
    remaining: u32,
    values: std::slice::Iter<'a, T>,
}

impl<'a, T> Iterator for SparseArrayIter<'a, T> {
    type Item = (usize, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let index = self.remaining.trailing_zeros() as usize;
        self.remaining &= self.remaining - 1;
        self.values.next().map(|value| (index, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.values.size_hint()
    }
}

impl<T> ExactSizeIterator for SparseArrayIter<'_, T> {}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn collect<T: Clone>(array: &SparseArray<T>) -> Vec<(usize, T)> {
        array
            .iter()
            .map(|(index, value)| (index, value.clone()))
            .collect()
    }

    #[rstest]
    fn test_new_is_empty() {
        let array: SparseArray<char> = SparseArray::new();
        assert!(array.is_empty());
        assert_eq!(array.size(), 0);
        assert_eq!(array.get(0), None);
        assert_eq!(array.get(31), None);
    }

    #[rstest]
    fn test_set_inserts_in_slot_order() {
        let array = SparseArray::new().set(5, 'e').set(1, 'a').set(31, 'z').set(2, 'b');

        assert_eq!(array.size(), 4);
        assert_eq!(array.values(), &['a', 'b', 'e', 'z']);
        assert_eq!(array.get(1), Some(&'a'));
        assert_eq!(array.get(5), Some(&'e'));
        assert_eq!(array.get(31), Some(&'z'));
        assert_eq!(array.get(3), None);
    }

    #[rstest]
    fn test_set_replaces_existing_slot() {
        let original = SparseArray::new().set(3, 1).set(7, 2);
        let replaced = original.set(7, 20);

        assert_eq!(replaced.size(), 2);
        assert_eq!(replaced.get(7), Some(&20));
        assert_eq!(original.get(7), Some(&2));
    }

    #[rstest]
    fn test_remove_present_slot() {
        let original = SparseArray::new().set(0, 'x').set(10, 'y').set(20, 'z');
        let removed = original.remove(10);

        assert_eq!(collect(&removed), vec![(0, 'x'), (20, 'z')]);
        assert_eq!(original.size(), 3);
    }

    #[rstest]
    fn test_remove_absent_slot_keeps_content() {
        let original = SparseArray::new().set(4, 'd');
        assert!(original.remove(9) == original);
    }

    #[rstest]
    fn test_from_entries_sorts_by_index() {
        let array = SparseArray::from_entries([(17, "q"), (3, "c"), (9, "i")]);
        assert_eq!(collect(&array), vec![(3, "c"), (9, "i"), (17, "q")]);
        assert_eq!(array.get(9), Some(&"i"));
    }

    #[rstest]
    fn test_from_sorted_entries_trusts_order() {
        let array = SparseArray::from_sorted_entries((0..32).map(|index| (index, index * 2)));
        assert_eq!(array.size(), 32);
        assert_eq!(array.get(0), Some(&0));
        assert_eq!(array.get(31), Some(&62));
    }

    #[rstest]
    fn test_iteration_is_restartable() {
        let array = SparseArray::from_entries([(30, 'b'), (2, 'a')]);
        assert_eq!(collect(&array), collect(&array));
        assert_eq!(array.iter().len(), 2);
    }

    #[rstest]
    fn test_filter_map_keeps_indices() {
        let array = SparseArray::from_entries([(1, 1), (4, 4), (6, 6), (8, 8)]);
        let filtered = array.filter_map(|_, value| (value % 4 != 0).then_some(value * 10));

        assert_eq!(collect(&filtered), vec![(1, 10), (6, 60)]);
    }

    #[rstest]
    fn test_first_returns_lowest_slot() {
        let array = SparseArray::from_entries([(12, 'l'), (7, 'g')]);
        assert_eq!(array.first(), Some(&'g'));
    }

    #[rstest]
    #[should_panic(expected = "out of range")]
    fn test_index_out_of_range_panics() {
        let array: SparseArray<u8> = SparseArray::new();
        let _ = array.set(32, 0);
    }
}
