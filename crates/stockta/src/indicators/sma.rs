//! Simple Moving Average (SMA) and the short/medium/long moving-average set.
//!
//! ```text
//! SMA[i] = mean(close[i - window + 1 ..= i])
//! ```
//!
//! With [`MinPeriods::Strict`] the first `window - 1` values are undefined.
//! With [`MinPeriods::Lenient`] every index gets the mean of whatever
//! history is available (up to `window` bars).
//!
//! # Example
//!
//! ```
//! use stockta::indicators::sma::{sma, MovingAverages};
//!
//! let close = vec![1.0_f64, 2.0, 3.0, 4.0, 5.0];
//! let out = sma(&close, 3).unwrap();
//! assert!(out[1].is_nan());
//! assert!((out[4] - 4.0).abs() < 1e-10);
//!
//! let set = MovingAverages::new().short(2).medium(3).long(4).compute(&close).unwrap();
//! assert!((set.long[4] - 3.5).abs() < 1e-10);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::indicators::smoothing::{rolling_lookback, rolling_mean, MinPeriods};
use crate::traits::{validate_indicator_input, validate_period, SeriesElement, ValidatedInput};

/// Returns the number of undefined leading values of a strict SMA.
///
/// ```
/// use stockta::indicators::sma::sma_lookback;
/// assert_eq!(sma_lookback(20), 19);
/// ```
#[inline]
#[must_use]
pub const fn sma_lookback(window: usize) -> usize {
    rolling_lookback(window)
}

/// Returns the minimum input length for a strict SMA.
#[inline]
#[must_use]
pub const fn sma_min_len(window: usize) -> usize {
    window
}

/// Computes a strict Simple Moving Average.
///
/// # Errors
///
/// - `Error::InvalidPeriod` if `window` is zero
/// - `Error::EmptyInput` if `data` is empty
/// - `Error::InsufficientData` if `data` is shorter than `window`
#[must_use = "this returns a Result with the SMA values, which should be used"]
pub fn sma<T: SeriesElement>(data: &[T], window: usize) -> Result<Vec<T>> {
    sma_with(data, window, MinPeriods::Strict)
}

/// Computes a Simple Moving Average with an explicit warm-up policy.
///
/// # Errors
///
/// As [`sma`]; in lenient mode short input is accepted.
pub fn sma_with<T: SeriesElement>(
    data: &[T],
    window: usize,
    min_periods: MinPeriods,
) -> Result<Vec<T>> {
    validate_period(window)?;
    match min_periods {
        MinPeriods::Strict => validate_indicator_input(data, sma_min_len(window), "sma")?,
        MinPeriods::Lenient => data.validate_not_empty()?,
    }
    rolling_mean(data, window, min_periods)
}

/// Output of [`MovingAverages::compute`].
#[derive(Debug, Clone, PartialEq)]
pub struct MovingAverageOutput<T> {
    /// Short-window average.
    pub short: Vec<T>,
    /// Medium-window average.
    pub medium: Vec<T>,
    /// Long-window average.
    pub long: Vec<T>,
}

/// Three independently configurable moving averages over the same series.
///
/// Defaults: 50 / 100 / 200 bars, strict warm-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovingAverages {
    short: usize,
    medium: usize,
    long: usize,
    min_periods: MinPeriods,
}

impl Default for MovingAverages {
    fn default() -> Self {
        Self {
            short: 50,
            medium: 100,
            long: 200,
            min_periods: MinPeriods::Strict,
        }
    }
}

impl MovingAverages {
    /// Creates the default 50/100/200 configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the short window.
    #[must_use]
    pub const fn short(mut self, window: usize) -> Self {
        self.short = window;
        self
    }

    /// Sets the medium window.
    #[must_use]
    pub const fn medium(mut self, window: usize) -> Self {
        self.medium = window;
        self
    }

    /// Sets the long window.
    #[must_use]
    pub const fn long(mut self, window: usize) -> Self {
        self.long = window;
        self
    }

    /// Sets the warm-up policy shared by the three averages.
    #[must_use]
    pub const fn min_periods(mut self, min_periods: MinPeriods) -> Self {
        self.min_periods = min_periods;
        self
    }

    /// Returns the `(short, medium, long)` windows.
    #[must_use]
    pub const fn windows(&self) -> (usize, usize, usize) {
        (self.short, self.medium, self.long)
    }

    /// Returns the warm-up policy.
    #[must_use]
    pub const fn get_min_periods(&self) -> MinPeriods {
        self.min_periods
    }

    /// Minimum input length for all three averages.
    #[must_use]
    pub fn min_len(&self) -> usize {
        match self.min_periods {
            MinPeriods::Strict => self.short.max(self.medium).max(self.long),
            MinPeriods::Lenient => 1,
        }
    }

    /// Checks that every window is positive.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPeriod` for a zero window.
    pub fn validate(&self) -> Result<()> {
        validate_period(self.short)?;
        validate_period(self.medium)?;
        validate_period(self.long)
    }

    /// Computes the three averages.
    ///
    /// # Errors
    ///
    /// See [`sma_with`].
    pub fn compute<T: SeriesElement>(&self, data: &[T]) -> Result<MovingAverageOutput<T>> {
        Ok(MovingAverageOutput {
            short: sma_with(data, self.short, self.min_periods)?,
            medium: sma_with(data, self.medium, self.min_periods)?,
            long: sma_with(data, self.long, self.min_periods)?,
        })
    }
}
