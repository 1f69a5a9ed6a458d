//! Smoothing primitives shared by every indicator.
//!
//! Two smoothing policies are supported, and every indicator that smooths
//! takes one explicitly instead of hard-coding a choice:
//!
//! - [`SmoothingPolicy::Simple`]: a trailing arithmetic mean over `period`
//!   observations.
//! - [`SmoothingPolicy::Wilder`]: Wilder's recursive smoothing,
//!   `s = s + (x - s) / period`, equivalent to an EMA with `α = 1 / period`,
//!   seeded with the simple mean of the first `period` defined observations.
//!
//! # Undefined inputs
//!
//! The rolling primitives treat a NaN inside the window as poisoning that
//! window only (strict mode). Wilder smoothing skips an undefined
//! observation after it has been seeded: the state carries forward unchanged
//! and is emitted at that index, so one missing value never invalidates the
//! rest of the output.
//!
//! # Example
//!
//! ```
//! use stockta::indicators::smoothing::{rolling_mean, wilder, MinPeriods};
//!
//! let data = [1.0_f64, 2.0, 3.0, 4.0];
//!
//! let strict = rolling_mean(&data, 3, MinPeriods::Strict).unwrap();
//! assert!(strict[1].is_nan());
//! assert!((strict[2] - 2.0).abs() < 1e-10);
//!
//! let lenient = rolling_mean(&data, 3, MinPeriods::Lenient).unwrap();
//! assert!((lenient[1] - 1.5).abs() < 1e-10);
//!
//! let smoothed = wilder(&data, 2).unwrap();
//! assert!((smoothed[1] - 1.5).abs() < 1e-10);
//! assert!((smoothed[2] - 2.25).abs() < 1e-10);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::traits::{validate_period, SeriesElement, ValidatedInput};
use crate::utils::nan_vec;

/// How gains, losses, true range and directional movement are averaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmoothingPolicy {
    /// Trailing arithmetic mean over the period.
    Simple,
    /// Wilder's recursive smoothing (`α = 1 / period`).
    #[default]
    Wilder,
}

/// Whether a rolling window needs to be full before it produces a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinPeriods {
    /// Undefined until `window` observations exist.
    #[default]
    Strict,
    /// Average whatever history is available, from the first bar.
    Lenient,
}

/// Denominator used for rolling standard deviations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StdDevKind {
    /// Sample standard deviation (`n - 1` denominator).
    #[default]
    Sample,
    /// Population standard deviation (`n` denominator).
    Population,
}

/// Number of undefined leading values produced by a strict rolling window.
#[inline]
#[must_use]
pub const fn rolling_lookback(window: usize) -> usize {
    window.saturating_sub(1)
}

/// Number of undefined leading values produced by Wilder smoothing of a
/// fully defined input.
#[inline]
#[must_use]
pub const fn wilder_lookback(period: usize) -> usize {
    period.saturating_sub(1)
}

/// Trailing mean over `window` observations.
///
/// # Errors
///
/// Returns `Error::InvalidPeriod` if `window` is zero or `Error::EmptyInput`
/// if `data` is empty. Short input is not an error here: the output is
/// simply undefined where the window cannot be filled.
pub fn rolling_mean<T: SeriesElement>(
    data: &[T],
    window: usize,
    min_periods: MinPeriods,
) -> Result<Vec<T>> {
    validate_period(window)?;
    data.validate_not_empty()?;

    let mut output = nan_vec(data.len());
    let mut sum = T::zero();
    let mut defined = 0usize;

    for i in 0..data.len() {
        let x = data[i];
        if x.is_defined() {
            sum = sum + x;
            defined += 1;
        }
        if i >= window {
            let old = data[i - window];
            if old.is_defined() {
                sum = sum - old;
                defined -= 1;
            }
        }

        let in_window = (i + 1).min(window);
        let ready = match min_periods {
            MinPeriods::Strict => in_window == window && defined == window,
            MinPeriods::Lenient => defined > 0,
        };
        if ready {
            output[i] = sum / T::from_usize(defined)?;
        }
    }

    Ok(output)
}

/// Wilder's recursive smoothing over `period`.
///
/// # Errors
///
/// Returns `Error::InvalidPeriod` if `period` is zero or `Error::EmptyInput`
/// if `data` is empty.
pub fn wilder<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    validate_period(period)?;
    data.validate_not_empty()?;

    let n = T::from_usize(period)?;
    let mut output = nan_vec(data.len());
    let mut seed_sum = T::zero();
    let mut seed_count = 0usize;
    let mut state: Option<T> = None;

    for (i, &x) in data.iter().enumerate() {
        match state {
            Some(prev) => {
                let next = if x.is_defined() { prev + (x - prev) / n } else { prev };
                state = Some(next);
                output[i] = next;
            }
            None => {
                if x.is_defined() {
                    seed_sum = seed_sum + x;
                    seed_count += 1;
                    if seed_count == period {
                        let seed = seed_sum / n;
                        state = Some(seed);
                        output[i] = seed;
                    }
                }
            }
        }
    }

    Ok(output)
}

/// Smooths `data` with the given policy.
///
/// # Errors
///
/// See [`rolling_mean`] and [`wilder`].
pub fn smooth<T: SeriesElement>(
    data: &[T],
    period: usize,
    policy: SmoothingPolicy,
) -> Result<Vec<T>> {
    match policy {
        SmoothingPolicy::Simple => rolling_mean(data, period, MinPeriods::Strict),
        SmoothingPolicy::Wilder => wilder(data, period),
    }
}

/// Trailing standard deviation over `window` observations.
///
/// Each window is computed with a two-pass mean/deviation sum, so a constant
/// window yields exactly zero. A window containing an undefined value is
/// undefined, as is a sample deviation over a single observation.
///
/// # Errors
///
/// Returns `Error::InvalidPeriod` if `window` is zero or `Error::EmptyInput`
/// if `data` is empty.
pub fn rolling_std<T: SeriesElement>(
    data: &[T],
    window: usize,
    kind: StdDevKind,
) -> Result<Vec<T>> {
    validate_period(window)?;
    data.validate_not_empty()?;

    let mut output = nan_vec(data.len());
    let denominator = match kind {
        StdDevKind::Sample if window < 2 => return Ok(output),
        StdDevKind::Sample => T::from_usize(window - 1)?,
        StdDevKind::Population => T::from_usize(window)?,
    };
    let n = T::from_usize(window)?;

    for end in window..=data.len() {
        let slice = &data[end - window..end];
        if slice.iter().any(|x| !x.is_defined()) {
            continue;
        }
        let mean = slice.iter().fold(T::zero(), |acc, &x| acc + x) / n;
        let squares = slice
            .iter()
            .fold(T::zero(), |acc, &x| acc + (x - mean) * (x - mean));
        output[end - 1] = (squares / denominator).sqrt();
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;
    use crate::utils::{approx_eq, EPSILON};

    // ==================== Rolling Mean Tests ====================

    #[test]
    fn test_rolling_mean_strict() {
        let data = vec![1.0_f64, 2.0, 3.0, 4.0, 5.0];
        let out = rolling_mean(&data, 3, MinPeriods::Strict).unwrap();
        assert!(out[0].is_nan());
        assert!(out[1].is_nan());
        assert!(approx_eq(out[2], 2.0, EPSILON));
        assert!(approx_eq(out[3], 3.0, EPSILON));
        assert!(approx_eq(out[4], 4.0, EPSILON));
    }

    #[test]
    fn test_rolling_mean_lenient() {
        let data = vec![2.0_f64, 4.0, 6.0, 8.0];
        let out = rolling_mean(&data, 3, MinPeriods::Lenient).unwrap();
        assert!(approx_eq(out[0], 2.0, EPSILON));
        assert!(approx_eq(out[1], 3.0, EPSILON));
        assert!(approx_eq(out[2], 4.0, EPSILON));
        assert!(approx_eq(out[3], 6.0, EPSILON));
    }

    #[test]
    fn test_rolling_mean_nan_poisons_window_only() {
        let data = vec![1.0_f64, f64::NAN, 3.0, 4.0, 5.0, 6.0];
        let out = rolling_mean(&data, 2, MinPeriods::Strict).unwrap();
        assert!(out[1].is_nan());
        assert!(out[2].is_nan());
        assert!(approx_eq(out[3], 3.5, EPSILON));
        assert!(approx_eq(out[5], 5.5, EPSILON));
    }

    #[test]
    fn test_rolling_mean_short_input() {
        let out = rolling_mean(&[1.0_f64, 2.0], 5, MinPeriods::Strict).unwrap();
        assert!(out.iter().all(|x| x.is_nan()));
    }

    #[test]
    fn test_rolling_mean_invalid() {
        assert!(rolling_mean(&[1.0_f64], 0, MinPeriods::Strict).is_err());
        assert!(rolling_mean::<f64>(&[], 3, MinPeriods::Strict).is_err());
    }

    // ==================== Wilder Tests ====================

    #[test]
    fn test_wilder_seed_and_recursion() {
        let data = vec![2.0_f64, 4.0, 6.0, 8.0, 10.0];
        let out = wilder(&data, 3).unwrap();
        assert!(out[0].is_nan());
        assert!(out[1].is_nan());
        assert!(approx_eq(out[2], 4.0, EPSILON));
        // 4 + (8 - 4) / 3
        assert!(approx_eq(out[3], 4.0 + 4.0 / 3.0, EPSILON));
    }

    #[test]
    fn test_wilder_skips_leading_nan() {
        let data = vec![f64::NAN, 1.0, 3.0, 5.0];
        let out = wilder(&data, 2).unwrap();
        assert!(out[0].is_nan());
        assert!(out[1].is_nan());
        assert!(approx_eq(out[2], 2.0, EPSILON));
        assert!(approx_eq(out[3], 3.5, EPSILON));
    }

    #[test]
    fn test_wilder_carries_state_over_nan() {
        let data = vec![1.0_f64, 3.0, f64::NAN, 5.0];
        let out = wilder(&data, 2).unwrap();
        assert!(approx_eq(out[1], 2.0, EPSILON));
        assert!(approx_eq(out[2], 2.0, EPSILON));
        assert!(approx_eq(out[3], 3.5, EPSILON));
    }

    #[test]
    fn test_smooth_dispatch() {
        let data = vec![1.0_f64, 2.0, 3.0, 4.0];
        let simple = smooth(&data, 2, SmoothingPolicy::Simple).unwrap();
        let wild = smooth(&data, 2, SmoothingPolicy::Wilder).unwrap();
        assert!(approx_eq(simple[3], 3.5, EPSILON));
        // seed 1.5, then 2.25, then 2.25 + (4 - 2.25) / 2
        assert!(approx_eq(wild[3], 3.125, EPSILON));
    }

    // ==================== Rolling Std Tests ====================

    #[test]
    fn test_rolling_std_sample() {
        let data = vec![2.0_f64, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let out = rolling_std(&data, 8, StdDevKind::Sample).unwrap();
        // population std is 2.0, sample std is sqrt(32 / 7)
        assert!(approx_eq(out[7], (32.0_f64 / 7.0).sqrt(), EPSILON));
        let pop = rolling_std(&data, 8, StdDevKind::Population).unwrap();
        assert!(approx_eq(pop[7], 2.0, EPSILON));
    }

    #[test]
    fn test_rolling_std_constant_is_zero() {
        let data = vec![5.0_f64; 10];
        let out = rolling_std(&data, 4, StdDevKind::Sample).unwrap();
        assert!(out[..3].iter().all(|x| x.is_nan()));
        assert!(out[3..].iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_rolling_std_sample_window_one() {
        let out = rolling_std(&[1.0_f64, 2.0], 1, StdDevKind::Sample).unwrap();
        assert!(out.iter().all(|x| x.is_nan()));
    }

    #[test]
    fn test_policy_defaults() {
        assert_eq!(SmoothingPolicy::default(), SmoothingPolicy::Wilder);
        assert_eq!(MinPeriods::default(), MinPeriods::Strict);
        assert_eq!(StdDevKind::default(), StdDevKind::Sample);
    }
}
