//! Linear-regression trend projection.
//!
//! An ordinary least-squares line is fitted to the close prices against the
//! bar index `0..n`. The projection carries:
//!
//! - the fitted line over the historical bars
//! - its extension `horizon` bars past the last bar
//! - an envelope of `fitted ± k × rolling_std(close, window)`
//!
//! For extrapolated bars the last defined rolling standard deviation is held
//! constant. Undefined closes are excluded from the fit.
//!
//! # Example
//!
//! ```
//! use stockta::indicators::trend::TrendConfig;
//!
//! let close = [1.0_f64, 2.0, 3.0, 4.0, 5.0];
//! let projection = TrendConfig::new().horizon(2).project(&close, None).unwrap();
//! assert!((projection.slope - 1.0).abs() < 1e-10);
//! assert!((projection.intercept - 1.0).abs() < 1e-10);
//! assert!((projection.forecast[0] - 6.0).abs() < 1e-10);
//! assert!((projection.forecast[1] - 7.0).abs() < 1e-10);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::indicators::smoothing::{rolling_std, StdDevKind};
use crate::traits::{validate_period, SeriesElement, ValidatedInput};

/// Slope and intercept of a least-squares line `y = intercept + slope × x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit<T> {
    /// Change per bar.
    pub slope: T,
    /// Value at bar 0.
    pub intercept: T,
}

impl<T: SeriesElement> LinearFit<T> {
    /// Evaluates the line at bar `x`.
    ///
    /// # Errors
    ///
    /// Returns `Error::NumericConversion` if `x` is not representable.
    pub fn at(&self, x: usize) -> Result<T> {
        Ok(self.intercept + self.slope * T::from_usize(x)?)
    }
}

/// Fits a least-squares line to `data` against its indices.
///
/// # Errors
///
/// - `Error::EmptyInput` if `data` is empty
/// - `Error::InsufficientData` if fewer than two values are defined
pub fn linear_fit<T: SeriesElement>(data: &[T]) -> Result<LinearFit<T>> {
    data.validate_not_empty()?;

    let mut n = 0usize;
    let mut sum_x = T::zero();
    let mut sum_y = T::zero();
    let mut sum_xy = T::zero();
    let mut sum_x2 = T::zero();
    for (i, &y) in data.iter().enumerate() {
        if !y.is_defined() {
            continue;
        }
        let x = T::from_usize(i)?;
        n += 1;
        sum_x = sum_x + x;
        sum_y = sum_y + y;
        sum_xy = sum_xy + x * y;
        sum_x2 = sum_x2 + x * x;
    }

    if n < 2 {
        return Err(Error::InsufficientData {
            required: 2,
            actual: n,
            indicator: "trend",
        });
    }

    let count = T::from_usize(n)?;
    #[allow(clippy::suspicious_operation_groupings)]
    let denom = count * sum_x2 - sum_x * sum_x;
    let slope = (count * sum_xy - sum_x * sum_y) / denom;
    let intercept = (sum_y - slope * sum_x) / count;
    Ok(LinearFit { slope, intercept })
}

/// Result of a trend projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendProjection {
    /// Change per bar.
    pub slope: f64,
    /// Fitted value at bar 0.
    pub intercept: f64,
    /// Fitted line over the historical bars.
    pub fitted: Vec<f64>,
    /// Upper envelope over the historical bars.
    pub upper: Vec<f64>,
    /// Lower envelope over the historical bars.
    pub lower: Vec<f64>,
    /// Extrapolated line for bars `n..n + horizon`.
    pub forecast: Vec<f64>,
    /// Upper envelope of the extrapolation.
    pub forecast_upper: Vec<f64>,
    /// Lower envelope of the extrapolation.
    pub forecast_lower: Vec<f64>,
    /// Timestamps of the extrapolated bars, when the input had timestamps.
    pub forecast_timestamps: Vec<DateTime<Utc>>,
}

/// Trend projection parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendConfig {
    horizon: usize,
    envelope_window: usize,
    envelope_k: f64,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            horizon: 30,
            envelope_window: 20,
            envelope_k: 2.0,
        }
    }
}

impl TrendConfig {
    /// Creates the default configuration: 30 bars ahead, 20-bar ±2σ envelope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how many bars past the end to extrapolate.
    #[must_use]
    pub const fn horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }

    /// Sets the rolling window of the envelope's standard deviation.
    #[must_use]
    pub const fn envelope_window(mut self, window: usize) -> Self {
        self.envelope_window = window;
        self
    }

    /// Sets the envelope multiplier.
    #[must_use]
    pub const fn envelope_k(mut self, k: f64) -> Self {
        self.envelope_k = k;
        self
    }

    /// Returns the horizon.
    #[must_use]
    pub const fn get_horizon(&self) -> usize {
        self.horizon
    }

    /// Checks the parameters.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidConfiguration` if the horizon is zero or `k` is
    ///   negative or not finite
    /// - `Error::InvalidPeriod` if the envelope window is zero
    pub fn validate(&self) -> Result<()> {
        if self.horizon == 0 {
            return Err(Error::invalid_config("trend.horizon", "must be at least 1"));
        }
        validate_period(self.envelope_window)?;
        if !(self.envelope_k.is_finite() && self.envelope_k >= 0.0) {
            return Err(Error::invalid_config(
                "trend.envelope_k",
                "must be finite and non-negative",
            ));
        }
        Ok(())
    }

    /// Projects the trend of `close`.
    ///
    /// When `timestamps` is given, forecast timestamps step forward from the
    /// last bar by the interval between the last two bars.
    ///
    /// # Errors
    ///
    /// See [`TrendConfig::validate`] and [`linear_fit`]; also
    /// `Error::LengthMismatch` if `timestamps` and `close` differ in length.
    pub fn project(
        &self,
        close: &[f64],
        timestamps: Option<&[DateTime<Utc>]>,
    ) -> Result<TrendProjection> {
        self.validate()?;
        if let Some(ts) = timestamps {
            if ts.len() != close.len() {
                return Err(Error::LengthMismatch {
                    description: format!(
                        "{} timestamps for {} closes",
                        ts.len(),
                        close.len()
                    ),
                });
            }
        }

        let fit = linear_fit(close)?;
        let n = close.len();
        let std = rolling_std(close, self.envelope_window, StdDevKind::Sample)?;
        let k = self.envelope_k;

        let fitted = (0..n).map(|i| fit.at(i)).collect::<Result<Vec<_>>>()?;
        let upper = fitted.iter().zip(&std).map(|(f, s)| f + k * s).collect();
        let lower = fitted.iter().zip(&std).map(|(f, s)| f - k * s).collect();

        let last_std = std
            .iter()
            .rev()
            .copied()
            .find(|s| s.is_finite())
            .unwrap_or(f64::NAN);
        let forecast = (n..n + self.horizon)
            .map(|i| fit.at(i))
            .collect::<Result<Vec<_>>>()?;
        let forecast_upper = forecast.iter().map(|f| f + k * last_std).collect();
        let forecast_lower = forecast.iter().map(|f| f - k * last_std).collect();

        let forecast_timestamps = timestamps
            .map(|ts| forward_timestamps(ts, self.horizon))
            .unwrap_or_default();

        Ok(TrendProjection {
            slope: fit.slope,
            intercept: fit.intercept,
            fitted,
            upper,
            lower,
            forecast,
            forecast_upper,
            forecast_lower,
            forecast_timestamps,
        })
    }
}

fn forward_timestamps(ts: &[DateTime<Utc>], horizon: usize) -> Vec<DateTime<Utc>> {
    let (Some(&last), Some(prev)) = (ts.last(), ts.len().checked_sub(2).map(|i| ts[i])) else {
        return Vec::new();
    };
    let step = last - prev;
    let mut out = Vec::with_capacity(horizon);
    let mut current = last;
    for _ in 0..horizon {
        current += step;
        out.push(current);
    }
    out
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;
    use crate::utils::{approx_eq, EPSILON};
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_linear_fit_exact_line() {
        let fit = linear_fit(&[3.0_f64, 5.0, 7.0, 9.0]).unwrap();
        assert!(approx_eq(fit.slope, 2.0, EPSILON));
        assert!(approx_eq(fit.intercept, 3.0, EPSILON));
        assert!(approx_eq(fit.at(10).unwrap(), 23.0, EPSILON));
    }

    #[test]
    fn test_linear_fit_skips_nan() {
        let fit = linear_fit(&[1.0_f64, f64::NAN, 3.0]).unwrap();
        assert!(approx_eq(fit.slope, 1.0, EPSILON));
        assert!(approx_eq(fit.intercept, 1.0, EPSILON));
    }

    #[test]
    fn test_linear_fit_insufficient() {
        assert!(matches!(
            linear_fit(&[1.0_f64]),
            Err(Error::InsufficientData {
                required: 2,
                actual: 1,
                ..
            })
        ));
        assert!(matches!(linear_fit::<f64>(&[]), Err(Error::EmptyInput)));
    }

    #[test]
    fn test_projection_forecast() {
        let p = TrendConfig::new()
            .horizon(2)
            .project(&[1.0, 2.0, 3.0, 4.0, 5.0], None)
            .unwrap();
        assert_eq!(p.fitted.len(), 5);
        assert_eq!(p.forecast.len(), 2);
        assert!(approx_eq(p.forecast[0], 6.0, EPSILON));
        assert!(approx_eq(p.forecast[1], 7.0, EPSILON));
        // window 20 never fills: envelope undefined
        assert!(p.forecast_upper.iter().all(|x| x.is_nan()));
        assert!(p.forecast_timestamps.is_empty());
    }

    #[test]
    fn test_projection_envelope_holds_last_std() {
        let close: Vec<f64> = (0..30).map(|i| 10.0 + (i % 2) as f64).collect();
        let p = TrendConfig::new()
            .horizon(3)
            .envelope_window(4)
            .project(&close, None)
            .unwrap();
        let spread = p.forecast_upper[0] - p.forecast[0];
        assert!(spread > 0.0);
        for i in 0..3 {
            assert!(approx_eq(p.forecast_upper[i] - p.forecast[i], spread, 1e-9));
            assert!(approx_eq(p.forecast[i] - p.forecast_lower[i], spread, 1e-9));
        }
        assert!(p.upper[2].is_nan());
        assert!(p.upper[3].is_finite());
    }

    #[test]
    fn test_projection_envelope_skips_trailing_nan() {
        let mut close: Vec<f64> = (0..40).map(|i| 10.0 + (i % 3) as f64).collect();
        close.push(f64::NAN);
        let p = TrendConfig::new().horizon(3).project(&close, None).unwrap();
        assert!(p.upper[40].is_nan());
        for i in 0..3 {
            assert!(p.forecast[i].is_finite());
            assert!(p.forecast_upper[i].is_finite());
            assert!(p.forecast_lower[i].is_finite());
            assert!(p.forecast_upper[i] > p.forecast[i]);
        }
    }

    #[test]
    fn test_projection_timestamps() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let ts: Vec<_> = (0..4).map(|i| start + Duration::hours(i)).collect();
        let p = TrendConfig::new()
            .horizon(2)
            .project(&[1.0, 2.0, 3.0, 4.0], Some(&ts))
            .unwrap();
        assert_eq!(
            p.forecast_timestamps,
            vec![start + Duration::hours(4), start + Duration::hours(5)]
        );
    }

    #[test]
    fn test_projection_invalid_config() {
        assert!(matches!(
            TrendConfig::new().horizon(0).project(&[1.0, 2.0], None),
            Err(Error::InvalidConfiguration { .. })
        ));
        assert!(TrendConfig::new().envelope_k(-1.0).validate().is_err());
    }
}
