//! Relative Strength Index (RSI).
//!
//! Price changes are split into gains and losses, each averaged over
//! `period` bars with the configured [`SmoothingPolicy`]:
//!
//! ```text
//! delta[i] = close[i] - close[i-1]
//! gain[i]  = max(delta[i], 0)
//! loss[i]  = max(-delta[i], 0)
//! RS       = avg_gain / avg_loss
//! RSI      = 100 - 100 / (1 + RS)
//! ```
//!
//! - [`SmoothingPolicy::Simple`]: rolling mean of the last `period` gains/losses.
//! - [`SmoothingPolicy::Wilder`]: Wilder smoothing seeded with the simple mean
//!   of the first `period` deltas.
//!
//! Under both policies the first `period` values are undefined.
//!
//! Zero-loss handling: a window with gains and no losses is RSI = 100. A
//! window with neither gains nor losses (flat prices) is undefined, since the
//! strength ratio is 0/0.
//!
//! # Example
//!
//! ```
//! use stockta::indicators::rsi::{rsi_with, rsi_lookback};
//! use stockta::indicators::smoothing::SmoothingPolicy;
//!
//! let close = [44.0_f64, 44.5, 44.0, 45.0, 46.0, 45.5];
//! let out = rsi_with(&close, 3, SmoothingPolicy::Simple).unwrap();
//! assert_eq!(rsi_lookback(3), 3);
//! assert!(out[2].is_nan());
//! assert!((out[3] - 75.0).abs() < 1e-10);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::indicators::smoothing::{smooth, SmoothingPolicy};
use crate::traits::{validate_indicator_input, validate_period, SeriesElement};
use crate::utils::nan_vec;

/// Number of undefined leading RSI values.
#[inline]
#[must_use]
pub const fn rsi_lookback(period: usize) -> usize {
    period
}

/// Minimum input length for at least one defined RSI value.
#[inline]
#[must_use]
pub const fn rsi_min_len(period: usize) -> usize {
    period + 1
}

/// Computes RSI with Wilder smoothing.
///
/// # Errors
///
/// - `Error::InvalidPeriod` if `period` is zero
/// - `Error::EmptyInput` if `data` is empty
/// - `Error::InsufficientData` if `data` has fewer than `period + 1` values
#[must_use = "this returns a Result with the RSI values, which should be used"]
pub fn rsi<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    rsi_with(data, period, SmoothingPolicy::Wilder)
}

/// Computes RSI with an explicit smoothing policy.
///
/// # Errors
///
/// See [`rsi`].
pub fn rsi_with<T: SeriesElement>(
    data: &[T],
    period: usize,
    policy: SmoothingPolicy,
) -> Result<Vec<T>> {
    validate_period(period)?;
    validate_indicator_input(data, rsi_min_len(period), "rsi")?;

    let (gains, losses) = split_changes(data);
    let avg_gain = smooth(&gains, period, policy)?;
    let avg_loss = smooth(&losses, period, policy)?;

    let mut output = nan_vec(data.len());
    for i in rsi_lookback(period)..data.len() {
        output[i] = rsi_from_averages(avg_gain[i], avg_loss[i]);
    }
    Ok(output)
}

/// Splits a price series into per-bar gains and losses.
///
/// Index 0, and any bar adjacent to an undefined price, is undefined in both.
fn split_changes<T: SeriesElement>(data: &[T]) -> (Vec<T>, Vec<T>) {
    let mut gains = nan_vec(data.len());
    let mut losses = nan_vec(data.len());
    for i in 1..data.len() {
        let delta = data[i] - data[i - 1];
        if delta.is_defined() {
            gains[i] = delta.max(T::zero());
            losses[i] = (-delta).max(T::zero());
        }
    }
    (gains, losses)
}

#[inline]
fn rsi_from_averages<T: SeriesElement>(gain: T, loss: T) -> T {
    if gain.is_nan() || loss.is_nan() {
        return T::nan();
    }
    if loss == T::zero() {
        return if gain > T::zero() { T::hundred() } else { T::nan() };
    }
    let rs = gain / loss;
    T::hundred() - T::hundred() / (T::one() + rs)
}

/// Default RSI period.
pub const DEFAULT_RSI_PERIOD: usize = 14;

/// RSI configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rsi {
    period: usize,
    smoothing: SmoothingPolicy,
}

impl Default for Rsi {
    fn default() -> Self {
        Self {
            period: DEFAULT_RSI_PERIOD,
            smoothing: SmoothingPolicy::Wilder,
        }
    }
}

impl Rsi {
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
        rsi_min_len(self.period)
    }

    /// Computes RSI with this configuration.
    ///
    /// # Errors
    ///
    /// See [`rsi`].
    pub fn compute<T: SeriesElement>(&self, data: &[T]) -> Result<Vec<T>> {
        rsi_with(data, self.period, self.smoothing)
    }
}
