//! Capability type classes consumed by the persistent collections.
//!
//! Rather than relying on [`PartialEq`] and [`Hash`](std::hash::Hash)
//! bounds, the collections in [`crate::persistent`] take these
//! capabilities as values:
//!
//! - [`Equality`]: decides whether two values are equal
//! - [`EqHash`]: an [`Equality`] paired with a consistent 64-bit hash
//!
//! # Examples
//!
//! ```rust
//! use hashtrie::typeclass::{EqHash, Equality, FnEqHash};
//!
//! // Keys compared modulo 10, hashed consistently with that equality.
//! let modulo = FnEqHash::new(
//!     |left: &u32, right: &u32| left % 10 == right % 10,
//!     |key: &u32| u64::from(key % 10),
//! );
//! assert!(modulo.equal(&13, &3));
//! assert_eq!(modulo.hash(&13), modulo.hash(&3));
//! ```

mod eq_hash;
mod equality;

pub use eq_hash::DefaultEqHash;
pub use eq_hash::EqHash;
pub use eq_hash::FnEqHash;
pub use eq_hash::HashValue;
pub use eq_hash::IdentityEqHash;
pub use eq_hash::StdEqHash;
pub use equality::Equality;
pub use equality::FnEquality;
pub use equality::IgnoreAsciiCase;
pub use equality::NaturalEquality;
pub use equality::SliceEquality;

#[cfg(feature = "ahash")]
pub use eq_hash::AEqHash;
#[cfg(feature = "fxhash")]
pub use eq_hash::FxEqHash;
