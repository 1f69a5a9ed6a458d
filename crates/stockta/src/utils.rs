//! Small numeric helpers shared across the indicator modules.
//!
//! # Example
//!
//! ```
//! use stockta::utils::{approx_eq, ratio_or_nan, EPSILON};
//!
//! assert!(approx_eq(1.0 / 3.0, 0.333_333_333_333_333, EPSILON));
//! assert!(ratio_or_nan(1.0_f64, 0.0).is_nan());
//! ```

use crate::traits::SeriesElement;

/// Standard epsilon for high-precision floating-point comparisons.
pub const EPSILON: f64 = 1e-10;

/// Looser epsilon for results that accumulate many floating-point operations.
pub const LOOSE_EPSILON: f64 = 1e-6;

/// Approximate equality check that treats two NaNs as equal.
///
/// ```
/// use stockta::utils::{approx_eq, EPSILON};
///
/// assert!(approx_eq(1.0, 1.0 + 1e-11, EPSILON));
/// assert!(approx_eq(f64::NAN, f64::NAN, EPSILON));
/// assert!(!approx_eq(f64::NAN, 1.0, EPSILON));
/// ```
#[inline]
#[must_use]
pub fn approx_eq<T: SeriesElement>(a: T, b: T, tolerance: T) -> bool {
    if a.is_nan() && b.is_nan() {
        return true;
    }
    if a.is_nan() || b.is_nan() {
        return false;
    }
    (a - b).abs() < tolerance
}

/// Divides `num` by `den`, returning NaN when the denominator is zero or
/// either operand is undefined.
///
/// This is how every series computation resolves a zero denominator: the
/// point becomes undefined and the rest of the series is unaffected.
#[inline]
#[must_use]
pub fn ratio_or_nan<T: SeriesElement>(num: T, den: T) -> T {
    if den == T::zero() || num.is_nan() || den.is_nan() {
        T::nan()
    } else {
        num / den
    }
}

/// Allocates an output vector of `len` NaN values.
#[inline]
#[must_use]
pub fn nan_vec<T: SeriesElement>(len: usize) -> Vec<T> {
    vec![T::nan(); len]
}

/// Counts the number of leading NaN values in a slice.
///
/// ```
/// use stockta::utils::count_nan_prefix;
///
/// assert_eq!(count_nan_prefix(&[f64::NAN, f64::NAN, 1.0, f64::NAN]), 2);
/// ```
#[inline]
#[must_use]
pub fn count_nan_prefix<T: SeriesElement>(data: &[T]) -> usize {
    data.iter().take_while(|x| x.is_nan()).count()
}

/// Counts every NaN value in a slice.
#[inline]
#[must_use]
pub fn count_nans<T: SeriesElement>(data: &[T]) -> usize {
    data.iter().filter(|x| x.is_nan()).count()
}

/// Converts a NaN-encoded value into an `Option`.
#[inline]
#[must_use]
pub fn defined<T: SeriesElement>(value: T) -> Option<T> {
    if value.is_nan() {
        None
    } else {
        Some(value)
    }
}
