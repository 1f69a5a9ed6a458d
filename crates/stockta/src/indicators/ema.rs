//! Exponential Moving Average (EMA).
//!
//! # Formula
//!
//! ```text
//! α      = 2 / (span + 1)
//! EMA[0] = close[0]
//! EMA[i] = α × close[i] + (1 - α) × EMA[i-1]
//! ```
//!
//! The recursion is seeded with the first observation, so the output is
//! defined from index 0 and has no warm-up gap. Leading undefined inputs stay
//! undefined and the seed is the first defined value; an undefined input
//! after the seed re-emits the previous EMA.
//!
//! # Example
//!
//! ```
//! use stockta::indicators::ema::ema;
//!
//! let out = ema(&[10.0_f64, 11.0, 12.0], 3).unwrap();
//! assert!((out[0] - 10.0).abs() < 1e-10);
//! assert!((out[1] - 10.5).abs() < 1e-10);
//! assert!((out[2] - 11.25).abs() < 1e-10);
//! ```

use crate::error::{Error, Result};
use crate::traits::{validate_period, SeriesElement, ValidatedInput};
use crate::utils::nan_vec;

/// Returns the lookback period for EMA, which is always zero.
#[inline]
#[must_use]
pub const fn ema_lookback(_span: usize) -> usize {
    0
}

/// Returns the minimum input length for EMA.
#[inline]
#[must_use]
pub const fn ema_min_len(_span: usize) -> usize {
    1
}

/// Computes the smoothing factor `α = 2 / (span + 1)`.
///
/// # Errors
///
/// Returns `Error::InvalidPeriod` if `span` is zero.
#[inline]
pub fn compute_alpha<T: SeriesElement>(span: usize) -> Result<T> {
    validate_period(span)?;
    Ok(T::two() / (T::from_usize(span)? + T::one()))
}

/// Computes the Exponential Moving Average for the given span.
///
/// # Errors
///
/// - `Error::InvalidPeriod` if `span` is zero
/// - `Error::EmptyInput` if `data` is empty
#[must_use = "this returns a Result with the EMA values, which should be used"]
pub fn ema<T: SeriesElement>(data: &[T], span: usize) -> Result<Vec<T>> {
    let alpha = compute_alpha(span)?;
    ema_with_alpha(data, alpha)
}

/// Computes an exponential moving average with an explicit smoothing factor.
///
/// # Errors
///
/// - `Error::InvalidConfiguration` if `alpha` is not in `(0, 1]`
/// - `Error::EmptyInput` if `data` is empty
pub fn ema_with_alpha<T: SeriesElement>(data: &[T], alpha: T) -> Result<Vec<T>> {
    if !(alpha > T::zero() && alpha <= T::one()) {
        return Err(Error::invalid_config("alpha", "must be in (0, 1]"));
    }
    data.validate_not_empty()?;

    let mut output = nan_vec(data.len());
    let mut prev: Option<T> = None;
    let keep = T::one() - alpha;

    for (i, &x) in data.iter().enumerate() {
        let next = match (prev, x.is_defined()) {
            (None, false) => continue,
            (None, true) => x,
            (Some(p), true) => alpha * x + keep * p,
            (Some(p), false) => p,
        };
        output[i] = next;
        prev = Some(next);
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;
    use crate::utils::{approx_eq, EPSILON};

    #[test]
    fn test_alpha() {
        let a: f64 = compute_alpha(9).unwrap();
        assert!(approx_eq(a, 0.2, EPSILON));
        assert!(compute_alpha::<f64>(0).is_err());
    }

    #[test]
    fn test_ema_seeded_with_first_value() {
        let data = vec![2.0_f64, 4.0, 6.0, 8.0];
        let out = ema(&data, 1).unwrap();
        // span 1 => alpha 1 => identity
        for (a, b) in out.iter().zip(&data) {
            assert!(approx_eq(*a, *b, EPSILON));
        }
    }

    #[test]
    fn test_ema_recursion() {
        let data = vec![1.0_f64, 2.0, 3.0, 4.0, 5.0];
        let out = ema(&data, 3).unwrap();
        let mut expected = 1.0;
        assert!(approx_eq(out[0], expected, EPSILON));
        for i in 1..data.len() {
            expected = 0.5 * data[i] + 0.5 * expected;
            assert!(approx_eq(out[i], expected, EPSILON));
        }
    }

    #[test]
    fn test_ema_defined_everywhere() {
        let data: Vec<f64> = (0..50).map(|i| 100.0 + (i as f64).sin()).collect();
        let out = ema(&data, 26).unwrap();
        assert!(out.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn test_ema_leading_nan() {
        let out = ema(&[f64::NAN, 4.0, 8.0], 3).unwrap();
        assert!(out[0].is_nan());
        assert!(approx_eq(out[1], 4.0, EPSILON));
        assert!(approx_eq(out[2], 6.0, EPSILON));
    }

    #[test]
    fn test_ema_internal_nan_carries() {
        let out = ema(&[4.0_f64, f64::NAN, 8.0], 3).unwrap();
        assert!(approx_eq(out[1], 4.0, EPSILON));
        assert!(approx_eq(out[2], 6.0, EPSILON));
    }

    #[test]
    fn test_ema_constant_series() {
        let out = ema(&vec![7.5_f64; 20], 10).unwrap();
        assert!(out.iter().all(|&x| approx_eq(x, 7.5, EPSILON)));
    }

    #[test]
    fn test_ema_with_alpha_bounds() {
        assert!(ema_with_alpha(&[1.0_f64], 0.0).is_err());
        assert!(ema_with_alpha(&[1.0_f64], 1.5).is_err());
        assert!(ema_with_alpha::<f64>(&[], 0.5).is_err());
        assert!(ema_with_alpha(&[1.0_f64], 1.0).is_ok());
    }

    #[test]
    fn test_ema_lookback() {
        assert_eq!(ema_lookback(26), 0);
        assert_eq!(ema_min_len(26), 1);
    }
}
