//! # hashtrie
//!
//! Persistent hash dictionaries for Rust, built on a hash array mapped trie
//! (HAMT) with structural sharing and a structural merge.
//!
//! ## Overview
//!
//! - **Capabilities**: [`Equality`](typeclass::Equality) and
//!   [`EqHash`](typeclass::EqHash) values decide how keys are compared and
//!   hashed, instead of fixed trait bounds on the key type.
//! - **Persistent collections**: [`HashDict`](persistent::HashDict),
//!   [`HashSet`](persistent::HashSet) and
//!   [`ArrayDict`](persistent::ArrayDict). Every update returns a new
//!   value that shares unchanged subtrees with the old one.
//! - **Structural merge**: two dictionaries are merged by walking both
//!   tries at once, so untouched subtrees are never revisited entry by
//!   entry.
//!
//! ## Feature Flags
//!
//! - `typeclass`: `Equality` and `EqHash` capabilities
//! - `persistent`: persistent collections
//! - `arc`: share trie nodes through `Arc` (thread-safe) instead of `Rc`
//! - `fxhash`: `FxEqHash` backed by `rustc-hash`
//! - `ahash`: `AEqHash` backed by `ahash`
//! - `full`: enable all features
//!
//! ## Example
//!
//! ```rust
//! use hashtrie::prelude::*;
//!
//! let scores: HashDict<&str, u32> = [("ada", 3), ("grace", 5)].into_iter().collect();
//! let bonus: HashDict<&str, u32> = [("grace", 1), ("alan", 2)].into_iter().collect();
//!
//! let total = scores.merge(&bonus, |_, score, extra| score + extra);
//! assert_eq!(total.get("grace"), Some(&6));
//! assert_eq!(total.len(), 3);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Note: Disabling redundant_closure_for_method_calls due to clippy 0.1.92 panic bug
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types and traits.
///
/// # Usage
///
/// ```rust
/// use hashtrie::prelude::*;
/// ```
pub mod prelude {

    #[cfg(feature = "typeclass")]
    pub use crate::typeclass::*;

    #[cfg(feature = "persistent")]
    pub use crate::persistent::*;
}

#[cfg(feature = "typeclass")]
pub mod typeclass;

#[cfg(feature = "persistent")]
pub mod persistent;
