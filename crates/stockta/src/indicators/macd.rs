//! Moving Average Convergence Divergence (MACD).
//!
//! ```text
//! MACD      = EMA(close, fast) - EMA(close, slow)
//! Signal    = EMA(MACD, signal)
//! Histogram = MACD - Signal
//! ```
//!
//! Every EMA is seeded with its first value, so all three lines are defined
//! from index 0. Defaults are the conventional 12 / 26 / 9.
//!
//! # Example
//!
//! ```
//! use stockta::indicators::macd::Macd;
//!
//! let close: Vec<f64> = (0..40).map(|i| 100.0 + f64::from(i)).collect();
//! let out = Macd::new().compute(&close).unwrap();
//! assert_eq!(out.macd_line.len(), 40);
//! assert!(out.signal_line[0].is_finite());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::indicators::ema::ema;
use crate::traits::{validate_period, SeriesElement, ValidatedInput};

/// Output of a MACD computation.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdOutput<T> {
    /// Fast EMA minus slow EMA.
    pub macd_line: Vec<T>,
    /// EMA of the MACD line.
    pub signal_line: Vec<T>,
    /// MACD line minus signal line.
    pub histogram: Vec<T>,
}

/// Checks the MACD periods.
///
/// # Errors
///
/// - `Error::InvalidPeriod` if any period is zero
/// - `Error::InvalidConfiguration` if `fast >= slow`
pub fn validate_macd_params(fast: usize, slow: usize, signal: usize) -> Result<()> {
    validate_period(fast)?;
    validate_period(slow)?;
    validate_period(signal)?;
    if fast >= slow {
        return Err(Error::invalid_config(
            "macd.fast_period",
            format!("fast period ({fast}) must be less than slow period ({slow})"),
        ));
    }
    Ok(())
}

/// Computes MACD, signal and histogram.
///
/// # Errors
///
/// See [`validate_macd_params`]; also `Error::EmptyInput` for empty data.
#[must_use = "this returns a Result with the MACD output, which should be used"]
pub fn macd<T: SeriesElement>(
    data: &[T],
    fast: usize,
    slow: usize,
    signal: usize,
) -> Result<MacdOutput<T>> {
    validate_macd_params(fast, slow, signal)?;
    data.validate_not_empty()?;

    let fast_ema = ema(data, fast)?;
    let slow_ema = ema(data, slow)?;
    let macd_line: Vec<T> = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(&f, &s)| f - s)
        .collect();
    let signal_line = ema(&macd_line, signal)?;
    let histogram = macd_line
        .iter()
        .zip(&signal_line)
        .map(|(&m, &s)| m - s)
        .collect();

    Ok(MacdOutput {
        macd_line,
        signal_line,
        histogram,
    })
}

/// MACD configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Default for Macd {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

impl Macd {
    /// Creates the standard 12/26/9 configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fast EMA span.
    #[must_use]
    pub const fn fast_period(mut self, period: usize) -> Self {
        self.fast_period = period;
        self
    }

    /// Sets the slow EMA span.
    #[must_use]
    pub const fn slow_period(mut self, period: usize) -> Self {
        self.slow_period = period;
        self
    }

    /// Sets the signal EMA span.
    #[must_use]
    pub const fn signal_period(mut self, period: usize) -> Self {
        self.signal_period = period;
        self
    }

    /// Returns `(fast, slow, signal)`.
    #[must_use]
    pub const fn periods(&self) -> (usize, usize, usize) {
        (self.fast_period, self.slow_period, self.signal_period)
    }

    /// Minimum input length; every line is defined from the first bar.
    #[must_use]
    pub const fn min_len(&self) -> usize {
        1
    }

    /// Checks the configured periods.
    ///
    /// # Errors
    ///
    /// See [`validate_macd_params`].
    pub fn validate(&self) -> Result<()> {
        validate_macd_params(self.fast_period, self.slow_period, self.signal_period)
    }

    /// Computes MACD with this configuration.
    ///
    /// # Errors
    ///
    /// See [`macd`].
    pub fn compute<T: SeriesElement>(&self, data: &[T]) -> Result<MacdOutput<T>> {
        macd(data, self.fast_period, self.slow_period, self.signal_period)
    }
}
