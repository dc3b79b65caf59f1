//! Key-value pair shared by every dictionary in this module.

use std::fmt;

/// A key together with its value.
///
/// # Examples
///
/// ```rust
/// use hashtrie::persistent::Entry;
///
/// let entry = Entry::new("answer", 42);
/// assert_eq!(entry.to_string(), "answer -> 42");
///
/// let (key, value) = entry.into();
/// assert_eq!((key, value), ("answer", 42));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Entry<K, V> {
    /// The key.
    pub key: K,
    /// The value associated with `key`.
    pub value: V,
}

impl<K, V> Entry<K, V> {
    /// Creates an entry.
    #[inline]
    #[must_use]
    pub const fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    /// Borrows the entry as a `(key, value)` pair.
    #[inline]
    #[must_use]
    pub const fn as_pair(&self) -> (&K, &V) {
        (&self.key, &self.value)
    }

    /// Keeps the key and replaces the value.
    #[inline]
    #[must_use]
    pub fn with_value<U>(self, value: U) -> Entry<K, U> {
        Entry {
            key: self.key,
            value,
        }
    }
}

impl<K, V> From<(K, V)> for Entry<K, V> {
    #[inline]
    fn from((key, value): (K, V)) -> Self {
        Self::new(key, value)
    }
}

impl<K, V> From<Entry<K, V>> for (K, V) {
    #[inline]
    fn from(entry: Entry<K, V>) -> Self {
        (entry.key, entry.value)
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for Entry<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} -> {}", self.key, self.value)
    }
}
