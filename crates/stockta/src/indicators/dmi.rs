//! Directional Movement Index (+DI / -DI), DX and ADX.
//!
//! # Algorithm
//!
//! For each bar `i >= 1`:
//!
//! ```text
//! up   = high[i] - high[i-1]
//! down = low[i-1] - low[i]
//! ```
//!
//! Directional movement follows a [`DirectionalRule`]:
//!
//! - [`DirectionalRule::Dominant`] (default, Wilder's rule): only the larger
//!   positive move counts; equal moves count for neither side.
//! - [`DirectionalRule::Independent`]: each move is clamped at zero on its
//!   own, so both sides can be positive on an outside bar.
//!
//! `+DM`, `-DM` and the true range (bar 0 excluded) are smoothed over
//! `period` with the configured [`SmoothingPolicy`], then:
//!
//! ```text
//! +DI = 100 × s(+DM) / s(TR)
//! -DI = 100 × s(-DM) / s(TR)
//! DX  = 100 × |+DI - -DI| / (+DI + -DI)
//! ADX = Wilder(DX, period)
//! ```
//!
//! A zero denominator makes that DX point undefined. Wilder smoothing skips
//! undefined observations, so ADX stays defined once it has been seeded.
//!
//! With fully defined input the directional indicators start at index
//! `period` and ADX at index `2 × period - 1`.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::indicators::atr::true_range_at;
use crate::indicators::smoothing::{smooth, wilder, SmoothingPolicy};
use crate::traits::{
    validate_hl_lengths, validate_hlc_lengths, validate_indicator_input, validate_period,
    SeriesElement,
};
use crate::utils::{nan_vec, ratio_or_nan};

/// Default DMI/ADX period.
pub const DEFAULT_DMI_PERIOD: usize = 14;

/// How up and down moves are turned into directional movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionalRule {
    /// Only the strictly larger positive move counts.
    #[default]
    Dominant,
    /// Each move is clamped at zero independently.
    Independent,
}

/// Output of a DMI computation.
#[derive(Debug, Clone, PartialEq)]
pub struct DmiOutput<T> {
    /// Positive directional indicator.
    pub plus_di: Vec<T>,
    /// Negative directional indicator.
    pub minus_di: Vec<T>,
    /// Directional index.
    pub dx: Vec<T>,
    /// Average directional index.
    pub adx: Vec<T>,
}

/// Number of undefined leading +DI / -DI / DX values.
#[inline]
#[must_use]
pub const fn di_lookback(period: usize) -> usize {
    period
}

/// Number of undefined leading ADX values.
#[inline]
#[must_use]
pub const fn adx_lookback(period: usize) -> usize {
    (2 * period).saturating_sub(1)
}

/// Minimum input length for at least one defined ADX value.
#[inline]
#[must_use]
pub const fn adx_min_len(period: usize) -> usize {
    2 * period
}

/// Computes `(+DM, -DM)` for every bar; bar 0 is undefined.
///
/// # Errors
///
/// Returns `Error::LengthMismatch` if `high` and `low` differ in length.
pub fn directional_movement<T: SeriesElement>(
    high: &[T],
    low: &[T],
    rule: DirectionalRule,
) -> Result<(Vec<T>, Vec<T>)> {
    validate_hl_lengths(high, low)?;
    let mut plus = nan_vec(high.len());
    let mut minus = nan_vec(high.len());

    for i in 1..high.len() {
        let up = high[i] - high[i - 1];
        let down = low[i - 1] - low[i];
        if up.is_nan() || down.is_nan() {
            continue;
        }
        let (p, m) = match rule {
            DirectionalRule::Dominant => (
                if up > down && up > T::zero() { up } else { T::zero() },
                if down > up && down > T::zero() { down } else { T::zero() },
            ),
            DirectionalRule::Independent => (up.max(T::zero()), down.max(T::zero())),
        };
        plus[i] = p;
        minus[i] = m;
    }

    Ok((plus, minus))
}

/// Computes +DI, -DI, DX and ADX with Wilder smoothing and the dominant rule.
///
/// # Errors
///
/// - `Error::InvalidPeriod` if `period` is zero
/// - `Error::LengthMismatch` if the slices differ in length
/// - `Error::EmptyInput` / `Error::InsufficientData` if fewer than
///   `2 × period` bars are supplied
///
/// # Example
///
/// ```
/// use stockta::indicators::dmi::{dmi, adx_lookback};
///
/// let high: Vec<f64> = (0..40).map(|i| 10.0 + f64::from(i)).collect();
/// let low: Vec<f64> = high.iter().map(|h| h - 1.0).collect();
/// let close: Vec<f64> = high.iter().map(|h| h - 0.5).collect();
///
/// let out = dmi(&high, &low, &close, 14).unwrap();
/// assert!(out.adx[adx_lookback(14) - 1].is_nan());
/// assert!((out.adx[adx_lookback(14)] - 100.0).abs() < 1e-9);
/// ```
pub fn dmi<T: SeriesElement>(
    high: &[T],
    low: &[T],
    close: &[T],
    period: usize,
) -> Result<DmiOutput<T>> {
    Dmi::new().period(period).compute(high, low, close)
}

/// DMI/ADX configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dmi {
    period: usize,
    smoothing: SmoothingPolicy,
    rule: DirectionalRule,
}

impl Default for Dmi {
    fn default() -> Self {
        Self {
            period: DEFAULT_DMI_PERIOD,
            smoothing: SmoothingPolicy::Wilder,
            rule: DirectionalRule::Dominant,
        }
    }
}

impl Dmi {
    /// Creates the default 14-bar configuration.
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

    /// Sets the policy used to smooth directional movement and true range.
    #[must_use]
    pub const fn smoothing(mut self, policy: SmoothingPolicy) -> Self {
        self.smoothing = policy;
        self
    }

    /// Sets the directional movement rule.
    #[must_use]
    pub const fn rule(mut self, rule: DirectionalRule) -> Self {
        self.rule = rule;
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
        adx_min_len(self.period)
    }

    /// Computes the directional indicators.
    ///
    /// # Errors
    ///
    /// See [`dmi`].
    pub fn compute<T: SeriesElement>(
        &self,
        high: &[T],
        low: &[T],
        close: &[T],
    ) -> Result<DmiOutput<T>> {
        validate_period(self.period)?;
        validate_hlc_lengths(high, low, close)?;
        validate_indicator_input(close, adx_min_len(self.period), "adx")?;

        let len = close.len();
        let (plus_dm, minus_dm) = directional_movement(high, low, self.rule)?;
        let mut tr = nan_vec(len);
        for i in 1..len {
            tr[i] = true_range_at(high[i], low[i], close[i - 1]);
        }

        let s_plus = smooth(&plus_dm, self.period, self.smoothing)?;
        let s_minus = smooth(&minus_dm, self.period, self.smoothing)?;
        let s_tr = smooth(&tr, self.period, self.smoothing)?;

        let mut plus_di = nan_vec(len);
        let mut minus_di = nan_vec(len);
        let mut dx = nan_vec(len);
        for i in 0..len {
            let p = ratio_or_nan(s_plus[i], s_tr[i]) * T::hundred();
            let m = ratio_or_nan(s_minus[i], s_tr[i]) * T::hundred();
            plus_di[i] = p;
            minus_di[i] = m;
            dx[i] = ratio_or_nan((p - m).abs(), p + m) * T::hundred();
        }

        let adx = wilder(&dx, self.period)?;

        Ok(DmiOutput {
            plus_di,
            minus_di,
            dx,
            adx,
        })
    }
}
