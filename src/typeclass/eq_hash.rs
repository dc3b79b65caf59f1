//! Combined equality and hashing capability for dictionary keys.
//!
//! [`EqHash`] extends [`Equality`] with a 64-bit hash function. The hash
//! trie in [`crate::persistent`] is parameterized over an `EqHash` value and
//! never calls [`Hash`] or [`Eq`] on keys directly.
//!
//! The only law is consistency: `equal(a, b)` implies
//! `hash(a) == hash(b)`. Hashes need not be injective; colliding keys are
//! stored in collision buckets.
//!
//! # Provided instances
//!
//! - [`StdEqHash`]: [`Hash`] + [`Eq`] keys hashed through a [`BuildHasher`].
//!   [`DefaultEqHash`] uses `SipHash` with fixed keys, so two dictionaries
//!   built independently agree on every hash.
//! - `FxEqHash` (feature `fxhash`) and `AEqHash` (feature `ahash`): faster
//!   non-cryptographic hashers, also with fixed keys.
//! - [`IdentityEqHash`]: integers hash to their own bit pattern.
//! - [`FnEqHash`]: any pair of closures.
//!
//! # Examples
//!
//! ```rust
//! use hashtrie::typeclass::{DefaultEqHash, EqHash, Equality};
//!
//! let eq_hash = DefaultEqHash::default();
//! assert!(eq_hash.equal("key", "key"));
//! assert_eq!(eq_hash.hash("key"), eq_hash.hash("key"));
//! ```

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{BuildHasher, BuildHasherDefault, Hash};
use std::marker::PhantomData;

use super::Equality;

/// A 64-bit hash value as produced by [`EqHash::hash`].
pub type HashValue = u64;

/// Equality together with a consistent hash function.
pub trait EqHash<K: ?Sized>: Equality<K> {
    /// Hashes `key`. Keys that are [`Equality::equal`] must hash equally.
    fn hash(&self, key: &K) -> HashValue;
}

impl<K: ?Sized, H: EqHash<K> + ?Sized> EqHash<K> for &H {
    #[inline]
    fn hash(&self, key: &K) -> HashValue {
        (**self).hash(key)
    }
}

// =============================================================================
// StdEqHash
// =============================================================================

/// Equality and hashing taken from the key's [`Eq`] and [`Hash`] impls.
///
/// The hash function is built from `S`. Use a `BuildHasher` with fixed keys:
/// a randomly seeded builder would make two dictionaries disagree on where
/// a key lives, which breaks structural merging.
pub struct StdEqHash<S = BuildHasherDefault<DefaultHasher>> {
    build_hasher: S,
}

/// [`StdEqHash`] over the standard library's `SipHash` with fixed keys.
pub type DefaultEqHash = StdEqHash<BuildHasherDefault<DefaultHasher>>;

/// [`StdEqHash`] over `FxHash` from `rustc-hash`.
#[cfg(feature = "fxhash")]
pub type FxEqHash = StdEqHash<rustc_hash::FxBuildHasher>;

/// [`StdEqHash`] over `aHash` with fixed keys.
#[cfg(feature = "ahash")]
pub type AEqHash = StdEqHash<BuildHasherDefault<ahash::AHasher>>;

impl<S> StdEqHash<S> {
    /// Creates an instance hashing through `build_hasher`.
    #[inline]
    #[must_use]
    pub const fn with_build_hasher(build_hasher: S) -> Self {
        Self { build_hasher }
    }
}

impl<S: Default> Default for StdEqHash<S> {
    #[inline]
    fn default() -> Self {
        Self::with_build_hasher(S::default())
    }
}

impl<S: Clone> Clone for StdEqHash<S> {
    #[inline]
    fn clone(&self) -> Self {
        Self::with_build_hasher(self.build_hasher.clone())
    }
}

impl<S> fmt::Debug for StdEqHash<S> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("StdEqHash")
    }
}

impl<K: Eq + ?Sized, S> Equality<K> for StdEqHash<S> {
    #[inline]
    fn equal(&self, left: &K, right: &K) -> bool {
        left == right
    }
}

impl<K: Hash + Eq + ?Sized, S: BuildHasher> EqHash<K> for StdEqHash<S> {
    #[inline]
    fn hash(&self, key: &K) -> HashValue {
        self.build_hasher.hash_one(key)
    }
}

// =============================================================================
// IdentityEqHash
// =============================================================================

/// Integer keys hashed to their own (sign-extended) bit pattern.
///
/// Useful when keys are already well distributed, and in tests that need to
/// predict exactly where a key ends up in the trie.
///
/// # Examples
///
/// ```rust
/// use hashtrie::typeclass::{EqHash, IdentityEqHash};
///
/// assert_eq!(IdentityEqHash.hash(&42_i32), 42);
/// assert_eq!(IdentityEqHash.hash(&-1_i64), u64::MAX);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdentityEqHash;

macro_rules! identity_eq_hash {
    ($($integer:ty),* $(,)?) => {
        $(
            impl Equality<$integer> for IdentityEqHash {
                #[inline]
                fn equal(&self, left: &$integer, right: &$integer) -> bool {
                    left == right
                }
            }

            impl EqHash<$integer> for IdentityEqHash {
                #[inline]
                #[allow(clippy::cast_sign_loss, clippy::cast_possible_wrap, clippy::cast_lossless)]
                fn hash(&self, key: &$integer) -> HashValue {
                    *key as i64 as HashValue
                }
            }
        )*
    };
}

identity_eq_hash!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

// =============================================================================
// FnEqHash
// =============================================================================

/// Equality and hash given by two closures.
///
/// # Examples
///
/// ```rust
/// use hashtrie::typeclass::{EqHash, Equality, FnEqHash};
///
/// // Every key collides.
/// let colliding = FnEqHash::new(|left: &String, right: &String| left == right, |_: &String| 7);
/// assert_eq!(colliding.hash(&"a".to_string()), colliding.hash(&"b".to_string()));
/// assert!(!colliding.equal(&"a".to_string(), &"b".to_string()));
/// ```
pub struct FnEqHash<K: ?Sized, E, H> {
    equal: E,
    hash: H,
    marker: PhantomData<fn(&K)>,
}

impl<K: ?Sized, E, H> FnEqHash<K, E, H>
where
    E: Fn(&K, &K) -> bool,
    H: Fn(&K) -> HashValue,
{
    /// Combines an equality closure and a hash closure.
    #[inline]
    #[must_use]
    pub const fn new(equal: E, hash: H) -> Self {
        Self {
            equal,
            hash,
            marker: PhantomData,
        }
    }
}

impl<K: ?Sized, E: Clone, H: Clone> Clone for FnEqHash<K, E, H> {
    fn clone(&self) -> Self {
        Self {
            equal: self.equal.clone(),
            hash: self.hash.clone(),
            marker: PhantomData,
        }
    }
}

impl<K: ?Sized, E, H> fmt::Debug for FnEqHash<K, E, H> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("FnEqHash")
    }
}

impl<K: ?Sized, E, H> Equality<K> for FnEqHash<K, E, H>
where
    E: Fn(&K, &K) -> bool,
{
    #[inline]
    fn equal(&self, left: &K, right: &K) -> bool {
        (self.equal)(left, right)
    }
}

impl<K: ?Sized, E, H> EqHash<K> for FnEqHash<K, E, H>
where
    E: Fn(&K, &K) -> bool,
    H: Fn(&K) -> HashValue,
{
    #[inline]
    fn hash(&self, key: &K) -> HashValue {
        (self.hash)(key)
    }
}

// =============================================================================
// Tests
// =============================================================================
