//! Bollinger Bands and band width.
//!
//! # Formula
//!
//! ```text
//! middle = SMA(close, period)
//! std    = rolling standard deviation(close, period)
//! upper  = middle + k_up × std
//! lower  = middle - k_down × std
//! width  = (upper - lower) / middle
//! ```
//!
//! The standard deviation defaults to the sample estimator (`n - 1`
//! denominator); [`StdDevKind::Population`] is available. All four outputs
//! are undefined for the first `period - 1` bars. `width` is also undefined
//! where `middle` is zero.
//!
//! # Example
//!
//! ```
//! use stockta::indicators::bollinger::Bollinger;
//!
//! let close = vec![10.0_f64; 25];
//! let out = Bollinger::new().compute(&close).unwrap();
//! assert!(out.width[18].is_nan());
//! assert_eq!(out.width[19], 0.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::indicators::sma::sma;
use crate::indicators::smoothing::{rolling_lookback, rolling_std, StdDevKind};
use crate::traits::{validate_indicator_input, validate_period, SeriesElement};
use crate::utils::ratio_or_nan;

/// Output of a Bollinger computation.
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerOutput<T> {
    /// Upper band.
    pub upper: Vec<T>,
    /// Middle band (SMA).
    pub middle: Vec<T>,
    /// Lower band.
    pub lower: Vec<T>,
    /// Normalized band width, `(upper - lower) / middle`.
    pub width: Vec<T>,
}

/// Number of undefined leading values.
#[inline]
#[must_use]
pub const fn bollinger_lookback(period: usize) -> usize {
    rolling_lookback(period)
}

/// Minimum input length.
#[inline]
#[must_use]
pub const fn bollinger_min_len(period: usize) -> usize {
    period
}

/// Computes Bollinger Bands and width.
///
/// # Errors
///
/// - `Error::InvalidPeriod` if `period` is zero
/// - `Error::InvalidConfiguration` if a multiplier is negative or not finite
/// - `Error::EmptyInput` / `Error::InsufficientData` for short input
pub fn bollinger<T: SeriesElement>(
    data: &[T],
    period: usize,
    k_up: T,
    k_down: T,
    kind: StdDevKind,
) -> Result<BollingerOutput<T>> {
    validate_period(period)?;
    validate_multiplier("bollinger.k_up", k_up)?;
    validate_multiplier("bollinger.k_down", k_down)?;
    validate_indicator_input(data, bollinger_min_len(period), "bollinger")?;

    let middle = sma(data, period)?;
    let std = rolling_std(data, period, kind)?;

    let len = data.len();
    let mut upper = Vec::with_capacity(len);
    let mut lower = Vec::with_capacity(len);
    let mut width = Vec::with_capacity(len);
    for i in 0..len {
        let u = middle[i] + k_up * std[i];
        let l = middle[i] - k_down * std[i];
        upper.push(u);
        lower.push(l);
        width.push(ratio_or_nan(u - l, middle[i]));
    }

    Ok(BollingerOutput {
        upper,
        middle,
        lower,
        width,
    })
}

fn validate_multiplier<T: SeriesElement>(name: &'static str, k: T) -> Result<()> {
    if k.is_finite() && k >= T::zero() {
        Ok(())
    } else {
        Err(Error::invalid_config(name, "must be finite and non-negative"))
    }
}

/// Bollinger configuration with the conventional 20-bar, 2σ defaults.
///
/// ```
/// use stockta::indicators::bollinger::Bollinger;
///
/// let cfg = Bollinger::new().period(10).std_dev(2.5);
/// assert_eq!(cfg.get_period(), 10);
/// assert_eq!(cfg.multipliers(), (2.5, 2.5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bollinger {
    period: usize,
    k_up: f64,
    k_down: f64,
    std_dev_kind: StdDevKind,
}

impl Default for Bollinger {
    fn default() -> Self {
        Self {
            period: 20,
            k_up: 2.0,
            k_down: 2.0,
            std_dev_kind: StdDevKind::Sample,
        }
    }
}

impl Bollinger {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the window length.
    #[must_use]
    pub const fn period(mut self, period: usize) -> Self {
        self.period = period;
        self
    }

    /// Sets both multipliers.
    #[must_use]
    pub const fn std_dev(mut self, k: f64) -> Self {
        self.k_up = k;
        self.k_down = k;
        self
    }

    /// Sets the upper-band multiplier.
    #[must_use]
    pub const fn k_up(mut self, k: f64) -> Self {
        self.k_up = k;
        self
    }

    /// Sets the lower-band multiplier.
    #[must_use]
    pub const fn k_down(mut self, k: f64) -> Self {
        self.k_down = k;
        self
    }

    /// Sets the standard deviation estimator.
    #[must_use]
    pub const fn std_dev_kind(mut self, kind: StdDevKind) -> Self {
        self.std_dev_kind = kind;
        self
    }

    /// Returns the window length.
    #[must_use]
    pub const fn get_period(&self) -> usize {
        self.period
    }

    /// Returns `(k_up, k_down)`.
    #[must_use]
    pub const fn multipliers(&self) -> (f64, f64) {
        (self.k_up, self.k_down)
    }

    /// Returns the lookback for this configuration.
    #[must_use]
    pub const fn lookback(&self) -> usize {
        bollinger_lookback(self.period)
    }

    /// Returns the minimum input length for this configuration.
    #[must_use]
    pub const fn min_len(&self) -> usize {
        bollinger_min_len(self.period)
    }

    /// Checks the period and multipliers.
    ///
    /// # Errors
    ///
    /// See [`bollinger`].
    pub fn validate(&self) -> Result<()> {
        validate_period(self.period)?;
        validate_multiplier("bollinger.k_up", self.k_up)?;
        validate_multiplier("bollinger.k_down", self.k_down)
    }

    /// Computes the bands with this configuration.
    ///
    /// # Errors
    ///
    /// See [`bollinger`].
    pub fn compute<T: SeriesElement>(&self, data: &[T]) -> Result<BollingerOutput<T>> {
        bollinger(
            data,
            self.period,
            T::from_f64(self.k_up)?,
            T::from_f64(self.k_down)?,
            self.std_dev_kind,
        )
    }
}
