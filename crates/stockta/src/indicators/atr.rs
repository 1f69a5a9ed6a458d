//! True Range and Average True Range (ATR).
//!
//! ```text
//! TR[0] = high[0] - low[0]
//! TR[i] = max(high[i] - low[i], |high[i] - close[i-1]|, |low[i] - close[i-1]|)
//! ATR   = smooth(TR, period, policy)
//! ```
//!
//! With either smoothing policy the first `period - 1` ATR values are
//! undefined. ATR is never negative.
//!
//! # Example
//!
//! ```
//! use stockta::indicators::atr::{atr, true_range};
//!
//! let high = [10.0_f64, 12.0, 11.0];
//! let low = [9.0_f64, 10.0, 9.5];
//! let close = [9.5_f64, 11.5, 10.0];
//!
//! let tr = true_range(&high, &low, &close).unwrap();
//! assert_eq!(tr, vec![1.0, 2.5, 2.0]);
//!
//! let out = atr(&high, &low, &close, 2).unwrap();
//! assert!((out[1] - 1.75).abs() < 1e-10);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::indicators::smoothing::{smooth, SmoothingPolicy};
use crate::traits::{
    validate_hlc_lengths, validate_indicator_input, validate_period, SeriesElement,
    ValidatedInput,
};

/// Default ATR period.
pub const DEFAULT_ATR_PERIOD: usize = 14;

/// Number of undefined leading ATR values.
#[inline]
#[must_use]
pub const fn atr_lookback(period: usize) -> usize {
    period.saturating_sub(1)
}

/// Minimum input length for ATR.
#[inline]
#[must_use]
pub const fn atr_min_len(period: usize) -> usize {
    period
}

/// Computes the True Range series.
///
/// # Errors
///
/// - `Error::LengthMismatch` if the slices differ in length
/// - `Error::EmptyInput` if they are empty
pub fn true_range<T: SeriesElement>(high: &[T], low: &[T], close: &[T]) -> Result<Vec<T>> {
    validate_hlc_lengths(high, low, close)?;
    high.validate_not_empty()?;

    let mut output = Vec::with_capacity(high.len());
    output.push(high[0] - low[0]);
    for i in 1..high.len() {
        output.push(true_range_at(high[i], low[i], close[i - 1]));
    }
    Ok(output)
}

/// True range of a single bar given the previous close.
///
/// NaN propagates: if any operand is undefined, so is the result.
#[inline]
pub(crate) fn true_range_at<T: SeriesElement>(high: T, low: T, prev_close: T) -> T {
    let hl = high - low;
    let hc = (high - prev_close).abs();
    let lc = (low - prev_close).abs();
    if hl.is_nan() || hc.is_nan() || lc.is_nan() {
        return T::nan();
    }
    hl.max(hc).max(lc)
}

/// Computes ATR with Wilder smoothing.
///
/// # Errors
///
/// - `Error::InvalidPeriod` if `period` is zero
/// - `Error::LengthMismatch` if the slices differ in length
/// - `Error::EmptyInput` / `Error::InsufficientData` for short input
#[must_use = "this returns a Result with the ATR values, which should be used"]
pub fn atr<T: SeriesElement>(high: &[T], low: &[T], close: &[T], period: usize) -> Result<Vec<T>> {
    atr_with(high, low, close, period, SmoothingPolicy::Wilder)
}

/// Computes ATR with an explicit smoothing policy.
///
/// # Errors
///
/// See [`atr`].
pub fn atr_with<T: SeriesElement>(
    high: &[T],
    low: &[T],
    close: &[T],
    period: usize,
    policy: SmoothingPolicy,
) -> Result<Vec<T>> {
    validate_period(period)?;
    validate_hlc_lengths(high, low, close)?;
    validate_indicator_input(close, atr_min_len(period), "atr")?;

    let tr = true_range(high, low, close)?;
    smooth(&tr, period, policy)
}

/// ATR configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Atr {
    period: usize,
    smoothing: SmoothingPolicy,
}

impl Default for Atr {
    fn default() -> Self {
        Self {
            period: DEFAULT_ATR_PERIOD,
            smoothing: SmoothingPolicy::Wilder,
        }
    }
}

impl Atr {
    /// Creates the default 14-bar Wilder configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the period.
    #[must_use]
    pub const fn period(mut self, period: usize) -> Self {
        self.period = period;
        self
    }

    /// Sets the smoothing policy.
    #[must_use]
    pub const fn smoothing(mut self, policy: SmoothingPolicy) -> Self {
        self.smoothing = policy;
        self
    }

    /// Returns the period.
    #[must_use]
    pub const fn get_period(&self) -> usize {
        self.period
    }

    /// Returns the minimum input length.
    #[must_use]
    pub const fn min_len(&self) -> usize {
        atr_min_len(self.period)
    }

    /// Computes ATR with this configuration.
    ///
    /// # Errors
    ///
    /// See [`atr`].
    pub fn compute<T: SeriesElement>(&self, high: &[T], low: &[T], close: &[T]) -> Result<Vec<T>> {
        atr_with(high, low, close, self.period, self.smoothing)
    }
}
