//! Equality as a value rather than a trait bound.
//!
//! Persistent collections in this crate never assume intrinsic equality on
//! their keys. Instead they are parameterized over an [`Equality`]
//! instance that is passed along with every operation that compares keys.
//! This makes it possible to store, for example, strings compared without
//! regard to ASCII case, or keys whose notion of equality is not the one
//! provided by [`PartialEq`].
//!
//! # Examples
//!
//! ```rust
//! use hashtrie::typeclass::{Equality, IgnoreAsciiCase, NaturalEquality};
//!
//! assert!(NaturalEquality.equal(&1, &1));
//! assert!(!NaturalEquality.equal(&1, &2));
//! assert!(IgnoreAsciiCase.equal("Hello", "hELLO"));
//! ```

use std::marker::PhantomData;

/// A type class for deciding whether two values are equal.
///
/// Implementations must be an equivalence relation (reflexive, symmetric
/// and transitive).
pub trait Equality<T: ?Sized> {
    /// Returns `true` if `left` and `right` are considered equal.
    fn equal(&self, left: &T, right: &T) -> bool;
}

impl<T: ?Sized, E: Equality<T> + ?Sized> Equality<T> for &E {
    #[inline]
    fn equal(&self, left: &T, right: &T) -> bool {
        (**self).equal(left, right)
    }
}

// =============================================================================
// NaturalEquality
// =============================================================================

/// Equality given by the type's own [`PartialEq`] implementation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NaturalEquality;

impl<T: PartialEq + ?Sized> Equality<T> for NaturalEquality {
    #[inline]
    fn equal(&self, left: &T, right: &T) -> bool {
        left == right
    }
}

// =============================================================================
// FnEquality
// =============================================================================

/// Equality backed by a closure.
///
/// # Examples
///
/// ```rust
/// use hashtrie::typeclass::{Equality, FnEquality};
///
/// let same_parity = FnEquality::new(|left: &i32, right: &i32| left % 2 == right % 2);
/// assert!(same_parity.equal(&2, &4));
/// assert!(!same_parity.equal(&2, &3));
/// ```
pub struct FnEquality<T: ?Sized, F> {
    function: F,
    marker: PhantomData<fn(&T)>,
}

impl<T: ?Sized, F> FnEquality<T, F>
where
    F: Fn(&T, &T) -> bool,
{
    /// Wraps `function` as an [`Equality`].
    #[inline]
    #[must_use]
    pub const fn new(function: F) -> Self {
        Self {
            function,
            marker: PhantomData,
        }
    }
}

impl<T: ?Sized, F: Clone> Clone for FnEquality<T, F> {
    fn clone(&self) -> Self {
        Self {
            function: self.function.clone(),
            marker: PhantomData,
        }
    }
}

impl<T: ?Sized, F> std::fmt::Debug for FnEquality<T, F> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("FnEquality")
    }
}

impl<T: ?Sized, F> Equality<T> for FnEquality<T, F>
where
    F: Fn(&T, &T) -> bool,
{
    #[inline]
    fn equal(&self, left: &T, right: &T) -> bool {
        (self.function)(left, right)
    }
}

// =============================================================================
// SliceEquality
// =============================================================================

/// Element-wise equality on slices, given an equality for the elements.
///
/// Slices of different length are never equal.
///
/// # Examples
///
/// ```rust
/// use hashtrie::typeclass::{Equality, IgnoreAsciiCase, SliceEquality};
///
/// let equality = SliceEquality::new(IgnoreAsciiCase);
/// let left = ["A".to_string(), "b".to_string()];
/// let right = ["a".to_string(), "B".to_string()];
/// assert!(equality.equal(&left[..], &right[..]));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SliceEquality<E> {
    element: E,
}

impl<E> SliceEquality<E> {
    /// Lifts an element equality to slices.
    #[inline]
    #[must_use]
    pub const fn new(element: E) -> Self {
        Self { element }
    }
}

impl<T, E: Equality<T>> Equality<[T]> for SliceEquality<E> {
    fn equal(&self, left: &[T], right: &[T]) -> bool {
        left.len() == right.len()
            && left
                .iter()
                .zip(right)
                .all(|(left, right)| self.element.equal(left, right))
    }
}

impl<T, E: Equality<T>> Equality<Vec<T>> for SliceEquality<E> {
    #[inline]
    fn equal(&self, left: &Vec<T>, right: &Vec<T>) -> bool {
        Equality::<[T]>::equal(self, left.as_slice(), right.as_slice())
    }
}

// =============================================================================
// IgnoreAsciiCase
// =============================================================================

/// String equality that treats ASCII upper- and lower-case letters alike.
///
/// This is an equality only; it has no matching hash function. Pair it with
/// a hash that folds case first when using it as a dictionary key equality.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IgnoreAsciiCase;

impl Equality<str> for IgnoreAsciiCase {
    #[inline]
    fn equal(&self, left: &str, right: &str) -> bool {
        left.eq_ignore_ascii_case(right)
    }
}

impl Equality<String> for IgnoreAsciiCase {
    #[inline]
    fn equal(&self, left: &String, right: &String) -> bool {
        left.eq_ignore_ascii_case(right)
    }
}

impl Equality<&str> for IgnoreAsciiCase {
    #[inline]
    fn equal(&self, left: &&str, right: &&str) -> bool {
        left.eq_ignore_ascii_case(right)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 1, true)]
    #[case(1, 2, false)]
    #[case(-7, -7, true)]
    fn test_natural_equality(#[case] left: i32, #[case] right: i32, #[case] expected: bool) {
        assert_eq!(NaturalEquality.equal(&left, &right), expected);
    }

    #[rstest]
    fn test_natural_equality_on_unsized_str() {
        assert!(NaturalEquality.equal("abc", "abc"));
        assert!(!NaturalEquality.equal("abc", "abd"));
    }

    #[rstest]
    fn test_fn_equality_uses_closure() {
        let modulo_three = FnEquality::new(|left: &u8, right: &u8| left % 3 == right % 3);
        assert!(modulo_three.equal(&1, &4));
        assert!(!modulo_three.equal(&1, &5));
    }

    #[rstest]
    #[case(&[1, 2, 3], &[1, 2, 3], true)]
    #[case(&[1, 2, 3], &[1, 2], false)]
    #[case(&[1, 2, 3], &[1, 2, 4], false)]
    #[case(&[], &[], true)]
    fn test_slice_equality(#[case] left: &[i32], #[case] right: &[i32], #[case] expected: bool) {
        let equality = SliceEquality::new(NaturalEquality);
        assert_eq!(equality.equal(left, right), expected);
    }

    #[rstest]
    fn test_slice_equality_on_vec() {
        let equality = SliceEquality::new(IgnoreAsciiCase);
        let left = vec!["Key".to_string()];
        let right = vec!["kEY".to_string()];
        assert!(equality.equal(&left, &right));
    }

    #[rstest]
    #[case("hello", "HELLO", true)]
    #[case("hello", "hallo", false)]
    #[case("", "", true)]
    fn test_ignore_ascii_case(#[case] left: &str, #[case] right: &str, #[case] expected: bool) {
        assert_eq!(IgnoreAsciiCase.equal(left, right), expected);
    }

    #[rstest]
    fn test_reference_forwards_to_inner_equality() {
        let equality = &NaturalEquality;
        assert!(Equality::<i32>::equal(&equality, &3, &3));
    }
}
