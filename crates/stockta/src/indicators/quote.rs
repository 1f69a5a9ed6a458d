//! Price-change quotes.
//!
//! [`price_change`] summarizes the move between the last two closes, the way a
//! ticker header shows "+1.25 (0.84%)" colored by direction. [`period_return`]
//! measures the whole loaded span, first defined close to last.

use serde::Serialize;

use crate::error::{Error, Result};

/// Direction of the latest move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Last close above the previous one.
    Up,
    /// Last close below the previous one.
    Down,
    /// Unchanged.
    Flat,
}

/// Change between the last two closes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceChange {
    /// Second-to-last close.
    pub previous_close: f64,
    /// Last close.
    pub last_close: f64,
    /// `last_close - previous_close`.
    pub change: f64,
    /// `change / previous_close × 100`.
    pub percent: f64,
    /// Sign of the change.
    pub direction: Direction,
}

/// Computes the change between the last two closes.
///
/// # Errors
///
/// - `Error::InsufficientData` with fewer than two closes
/// - `Error::DivisionByZero` if the previous close is zero
/// - `Error::InvalidSeries` if either close is undefined
///
/// # Example
///
/// ```
/// use stockta::indicators::quote::{price_change, Direction};
///
/// let quote = price_change(&[100.0, 98.0, 99.0]).unwrap();
/// assert_eq!(quote.direction, Direction::Up);
/// assert!((quote.percent - 100.0 / 98.0).abs() < 1e-10);
/// ```
pub fn price_change(close: &[f64]) -> Result<PriceChange> {
    let n = close.len();
    if n < 2 {
        return Err(Error::InsufficientData {
            required: 2,
            actual: n,
            indicator: "price_change",
        });
    }
    let previous_close = close[n - 2];
    let last_close = close[n - 1];
    if !previous_close.is_finite() || !last_close.is_finite() {
        return Err(Error::InvalidSeries {
            index: n - 1,
            reason: "last two closes must be defined".to_string(),
        });
    }
    if previous_close == 0.0 {
        return Err(Error::DivisionByZero {
            context: "previous close is zero",
        });
    }

    let change = last_close - previous_close;
    Ok(PriceChange {
        previous_close,
        last_close,
        change,
        percent: change / previous_close * 100.0,
        direction: Direction::of(change),
    })
}

impl Direction {
    fn of(change: f64) -> Self {
        if change > 0.0 {
            Self::Up
        } else if change < 0.0 {
            Self::Down
        } else {
            Self::Flat
        }
    }
}

/// Return over the whole series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodReturn {
    /// First defined close.
    pub first_close: f64,
    /// Last defined close.
    pub last_close: f64,
    /// `last_close - first_close`.
    pub change: f64,
    /// `change / first_close × 100`; undefined (NaN) when the first close is zero.
    pub percent: f64,
    /// Sign of the change.
    pub direction: Direction,
}

/// Computes the return from the first defined close to the last one.
///
/// Undefined closes at either end are skipped. A single defined close gives a
/// flat zero return.
///
/// # Errors
///
/// - `Error::EmptyInput` if `close` is empty
/// - `Error::InsufficientData` if no close is defined
///
/// # Example
///
/// ```
/// use stockta::indicators::quote::{period_return, Direction};
///
/// let ret = period_return(&[80.0, 95.0, f64::NAN, 100.0]).unwrap();
/// assert_eq!(ret.direction, Direction::Up);
/// assert!((ret.percent - 25.0).abs() < 1e-10);
/// ```
pub fn period_return(close: &[f64]) -> Result<PeriodReturn> {
    if close.is_empty() {
        return Err(Error::EmptyInput);
    }
    let mut defined = close.iter().copied().filter(|c| c.is_finite());
    let Some(first_close) = defined.next() else {
        return Err(Error::InsufficientData {
            required: 1,
            actual: 0,
            indicator: "period_return",
        });
    };
    let last_close = defined.last().unwrap_or(first_close);

    let change = last_close - first_close;
    let percent = if first_close == 0.0 {
        f64::NAN
    } else {
        change / first_close * 100.0
    };
    Ok(PeriodReturn {
        first_close,
        last_close,
        change,
        percent,
        direction: Direction::of(change),
    })
}
