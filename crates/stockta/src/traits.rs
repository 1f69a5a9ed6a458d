//! Core traits for stockta numeric operations.
//!
//! [`SeriesElement`] abstracts the indicator kernels over `f32` and `f64`.
//! [`ValidatedInput`] and the free validation functions implement the checks
//! every indicator performs before touching its input.
//!
//! # Example
//!
//! ```
//! use stockta::traits::{SeriesElement, validate_indicator_input};
//!
//! fn window_mean<T: SeriesElement>(data: &[T], period: usize) -> stockta::Result<T> {
//!     validate_indicator_input(data, period, "window_mean")?;
//!     let n = T::from_usize(period)?;
//!     let sum = data.iter().take(period).fold(T::zero(), |acc, &x| acc + x);
//!     Ok(sum / n)
//! }
//!
//! let mean = window_mean(&[1.0_f64, 2.0, 3.0, 4.0], 3).unwrap();
//! assert!((mean - 2.0).abs() < 1e-10);
//! ```

use num_traits::{Float, NumCast};

use crate::error::{Error, Result};

/// A numeric type usable as an element of a price or indicator series.
///
/// NaN is the "undefined" marker throughout the crate: warm-up positions,
/// zero denominators and missing observations are all NaN.
pub trait SeriesElement: Float + NumCast + Copy + Default + Send + Sync + 'static {
    /// Creates a series element from a `usize` value.
    ///
    /// # Errors
    ///
    /// Returns `Error::NumericConversion` if the value cannot be represented in this type.
    #[inline]
    fn from_usize(value: usize) -> Result<Self> {
        <Self as NumCast>::from(value).ok_or(Error::NumericConversion {
            context: "usize to series element",
        })
    }

    /// Creates a series element from an `f64` value.
    ///
    /// # Errors
    ///
    /// Returns `Error::NumericConversion` if the value cannot be represented in this type.
    #[inline]
    fn from_f64(value: f64) -> Result<Self> {
        <Self as NumCast>::from(value).ok_or(Error::NumericConversion {
            context: "f64 to series element",
        })
    }

    /// Returns the constant 2 as this type.
    #[inline]
    #[must_use]
    fn two() -> Self {
        Self::one() + Self::one()
    }

    /// Returns the constant 100 as this type.
    ///
    /// Used by every percentage-scaled output (RSI, ROC, directional indicators).
    #[inline]
    #[must_use]
    fn hundred() -> Self {
        let ten = Self::two() * Self::two() + Self::two() * Self::two() + Self::two();
        ten * ten
    }

    /// Returns `true` when the value is a usable observation (not NaN, not infinite).
    #[inline]
    #[must_use]
    fn is_defined(self) -> bool {
        self.is_finite()
    }
}

impl<T: Float + NumCast + Copy + Default + Send + Sync + 'static> SeriesElement for T {}

/// Validation helpers shared by every slice-based indicator.
pub trait ValidatedInput {
    /// The element type of the series.
    type Element: SeriesElement;

    /// Returns the length of the series.
    fn len(&self) -> usize;

    /// Returns true if the series is empty.
    #[inline]
    #[must_use]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Validates that the series has at least `min_length` elements.
    ///
    /// # Errors
    ///
    /// Returns `Error::InsufficientData` if the series is shorter than `min_length`.
    #[inline]
    fn validate_min_length(&self, min_length: usize, indicator: &'static str) -> Result<()> {
        if self.len() < min_length {
            Err(Error::InsufficientData {
                required: min_length,
                actual: self.len(),
                indicator,
            })
        } else {
            Ok(())
        }
    }

    /// Validates that the series is not empty.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptyInput` if the series is empty.
    #[inline]
    fn validate_not_empty(&self) -> Result<()> {
        if self.is_empty() {
            Err(Error::EmptyInput)
        } else {
            Ok(())
        }
    }
}

impl<T: SeriesElement> ValidatedInput for [T] {
    type Element = T;

    #[inline]
    fn len(&self) -> usize {
        <[T]>::len(self)
    }
}

impl<T: SeriesElement> ValidatedInput for Vec<T> {
    type Element = T;

    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }
}

/// Validates that a period is usable for indicator computation.
///
/// # Errors
///
/// Returns `Error::InvalidPeriod` if the period is zero.
#[inline]
pub const fn validate_period(period: usize) -> Result<()> {
    if period == 0 {
        Err(Error::InvalidPeriod {
            period,
            reason: "period must be at least 1",
        })
    } else {
        Ok(())
    }
}

/// Validates period, emptiness and minimum length in one call.
///
/// # Errors
///
/// - `Error::InvalidPeriod` if the period is zero
/// - `Error::EmptyInput` if the data is empty
/// - `Error::InsufficientData` if data length is less than `min_len`
#[inline]
pub fn validate_indicator_input<T: SeriesElement>(
    data: &[T],
    min_len: usize,
    indicator: &'static str,
) -> Result<()> {
    validate_period(min_len)?;
    data.validate_not_empty()?;
    data.validate_min_length(min_len, indicator)?;
    Ok(())
}

/// Validates that the high, low and close slices have equal lengths.
///
/// # Errors
///
/// Returns `Error::LengthMismatch` naming the first disagreeing slice.
pub fn validate_hlc_lengths<T: SeriesElement>(high: &[T], low: &[T], close: &[T]) -> Result<()> {
    validate_hl_lengths(high, low)?;
    if high.len() != close.len() {
        return Err(Error::LengthMismatch {
            description: format!(
                "high has {} elements, low has {}, close has {}",
                high.len(),
                low.len(),
                close.len()
            ),
        });
    }
    Ok(())
}

/// Validates that the high and low slices have equal lengths.
///
/// # Errors
///
/// Returns `Error::LengthMismatch` if they differ.
pub fn validate_hl_lengths<T: SeriesElement>(high: &[T], low: &[T]) -> Result<()> {
    if high.len() != low.len() {
        return Err(Error::LengthMismatch {
            description: format!("high has {} elements, low has {}", high.len(), low.len()),
        });
    }
    Ok(())
}

/// Validates that the open, high, low and close slices have equal lengths.
///
/// # Errors
///
/// Returns `Error::LengthMismatch` if any of the four slices differs in length.
pub fn validate_ohlc_lengths<T: SeriesElement>(
    open: &[T],
    high: &[T],
    low: &[T],
    close: &[T],
) -> Result<()> {
    if open.len() != high.len() {
        return Err(Error::LengthMismatch {
            description: format!(
                "open has {} elements, high has {}",
                open.len(),
                high.len()
            ),
        });
    }
    validate_hlc_lengths(high, low, close)
}
