//! Errors reported by structural validation of the hash trie.
//!
//! These errors are only produced by
//! [`HashDict::check_invariant`](super::HashDict::check_invariant). Ordinary
//! dictionary operations never fail.

use crate::typeclass::HashValue;

/// A broken structural invariant found while validating a hash trie.
///
/// Failures found below the root are wrapped in [`InvariantViolation::InChild`]
/// once per level, so the chain of `source()` calls walks the path from the
/// root down to the faulty node.
///
/// # Examples
///
/// ```rust
/// use hashtrie::persistent::InvariantViolation;
///
/// let error = InvariantViolation::InChild {
///     index: 3,
///     source: Box::new(InvariantViolation::UndersizedBucket { size: 1 }),
/// };
/// assert_eq!(
///     error.to_string(),
///     "child 3: bucket holds 1 entries, expected at least 2"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A cached hash differs from the hash of the stored key.
    WrongHash {
        /// Hash cached in the node.
        cached: HashValue,
        /// Hash recomputed from the key.
        actual: HashValue,
    },
    /// A stored hash disagrees with the branch indices leading to its node.
    PrefixMismatch {
        /// The offending hash.
        hash: HashValue,
        /// Branch indices accumulated on the way down, packed 5 bits each.
        prefix: HashValue,
        /// Depth of the node in bits.
        level: u32,
    },
    /// A collision bucket with fewer than two entries.
    UndersizedBucket {
        /// Number of entries found.
        size: usize,
    },
    /// A trie node whose cached entry count is wrong.
    WrongCount {
        /// Count cached in the node.
        cached: usize,
        /// Sum of the child sizes.
        actual: usize,
    },
    /// A trie node without children.
    EmptyTrie,
    /// A violation found in a child of a trie node.
    InChild {
        /// Branch index of the child.
        index: usize,
        /// The violation inside the child.
        source: Box<InvariantViolation>,
    },
}

impl InvariantViolation {
    /// Returns the innermost violation, skipping every [`Self::InChild`]
    /// wrapper.
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::InChild { source, .. } => source.root_cause(),
            other => other,
        }
    }

    pub(crate) fn in_child(index: usize, source: Self) -> Self {
        Self::InChild {
            index,
            source: Box::new(source),
        }
    }
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WrongHash { cached, actual } => write!(
                formatter,
                "cached hash {cached:#018x} differs from key hash {actual:#018x}"
            ),
            Self::PrefixMismatch {
                hash,
                prefix,
                level,
            } => write!(
                formatter,
                "hash {hash:#018x} does not match prefix {prefix:#x} at level {level}"
            ),
            Self::UndersizedBucket { size } => write!(
                formatter,
                "bucket holds {size} entries, expected at least 2"
            ),
            Self::WrongCount { cached, actual } => write!(
                formatter,
                "trie caches count {cached} but its children hold {actual}"
            ),
            Self::EmptyTrie => write!(formatter, "trie node has no children"),
            Self::InChild { index, source } => write!(formatter, "child {index}: {source}"),
        }
    }
}

impl std::error::Error for InvariantViolation {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InChild { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}
