//! Rate of Change (ROC).
//!
//! ```text
//! ROC[i] = (close[i] - close[i - period]) / close[i - period] × 100
//! ```
//!
//! The first `period` values are undefined. A zero base price makes that
//! single point undefined.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::traits::{validate_indicator_input, validate_period, SeriesElement};
use crate::utils::{nan_vec, ratio_or_nan};

/// Default ROC period.
pub const DEFAULT_ROC_PERIOD: usize = 12;

/// Number of undefined leading ROC values.
#[inline]
#[must_use]
pub const fn roc_lookback(period: usize) -> usize {
    period
}

/// Minimum input length for ROC.
#[inline]
#[must_use]
pub const fn roc_min_len(period: usize) -> usize {
    period + 1
}

/// Computes the percentage rate of change over `period` bars.
///
/// # Errors
///
/// - `Error::InvalidPeriod` if `period` is zero
/// - `Error::EmptyInput` if `data` is empty
/// - `Error::InsufficientData` if `data` has fewer than `period + 1` values
///
/// # Example
///
/// ```
/// use stockta::indicators::roc::roc;
///
/// let out = roc(&[100.0_f64, 110.0, 99.0], 1).unwrap();
/// assert!(out[0].is_nan());
/// assert!((out[1] - 10.0).abs() < 1e-10);
/// assert!((out[2] + 10.0).abs() < 1e-10);
/// ```
#[must_use = "this returns a Result with the ROC values, which should be used"]
pub fn roc<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    validate_period(period)?;
    validate_indicator_input(data, roc_min_len(period), "roc")?;

    let mut output = nan_vec(data.len());
    for i in period..data.len() {
        let base = data[i - period];
        output[i] = ratio_or_nan(data[i] - base, base) * T::hundred();
    }
    Ok(output)
}

/// ROC configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Roc {
    period: usize,
}

impl Default for Roc {
    fn default() -> Self {
        Self {
            period: DEFAULT_ROC_PERIOD,
        }
    }
}

impl Roc {
    /// Creates the default 12-bar configuration.
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

    /// Returns the period.
    #[must_use]
    pub const fn get_period(&self) -> usize {
        self.period
    }

    /// Returns the minimum input length.
    #[must_use]
    pub const fn min_len(&self) -> usize {
        roc_min_len(self.period)
    }

    /// Computes ROC with this configuration.
    ///
    /// # Errors
    ///
    /// See [`roc`].
    pub fn compute<T: SeriesElement>(&self, data: &[T]) -> Result<Vec<T>> {
        roc(data, self.period)
    }
}
