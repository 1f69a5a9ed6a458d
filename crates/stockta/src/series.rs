//! Time-ordered OHLCV price series.
//!
//! A [`Series`] is an immutable, validated sequence of [`Bar`]s. Indicator
//! functions read its columns through the slice accessors and produce new
//! vectors aligned index-for-index with the bars.
//!
//! Invariants enforced by [`Series::new`]:
//!
//! - timestamps are strictly increasing
//! - `high >= max(open, close)` and `low <= min(open, close)` whenever all
//!   four prices are finite
//!
//! Missing observations are allowed and encoded as NaN.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One trading interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Start of the interval.
    pub timestamp: DateTime<Utc>,
    /// Opening price.
    pub open: f64,
    /// Highest traded price.
    pub high: f64,
    /// Lowest traded price.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Traded volume.
    pub volume: f64,
}

impl Bar {
    /// Creates a bar.
    #[must_use]
    pub const fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    fn check_prices(&self) -> std::result::Result<(), &'static str> {
        let prices = [self.open, self.high, self.low, self.close];
        if prices.iter().any(|p| !p.is_finite()) {
            return Ok(());
        }
        if self.high < self.open.max(self.close) {
            return Err("high is below the open/close body");
        }
        if self.low > self.open.min(self.close) {
            return Err("low is above the open/close body");
        }
        Ok(())
    }
}

/// A validated, column-oriented OHLCV series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    timestamps: Vec<DateTime<Utc>>,
    open: Vec<f64>,
    high: Vec<f64>,
    low: Vec<f64>,
    close: Vec<f64>,
    volume: Vec<f64>,
}

impl Series {
    /// Builds a series from bars, checking the ordering and price invariants.
    ///
    /// An empty bar list produces an empty series; the engine rejects it at
    /// analysis time.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidSeries` naming the first offending bar.
    pub fn new(bars: impl IntoIterator<Item = Bar>) -> Result<Self> {
        let bars = bars.into_iter();
        let (capacity, _) = bars.size_hint();
        let mut series = Self::with_capacity(capacity);

        for (index, bar) in bars.enumerate() {
            if let Some(prev) = series.timestamps.last() {
                if bar.timestamp <= *prev {
                    return Err(Error::InvalidSeries {
                        index,
                        reason: format!(
                            "timestamp {} is not after the previous bar ({prev})",
                            bar.timestamp
                        ),
                    });
                }
            }
            bar.check_prices().map_err(|reason| Error::InvalidSeries {
                index,
                reason: reason.to_string(),
            })?;
            series.push(bar);
        }
        Ok(series)
    }

    /// Builds a series from parallel column vectors.
    ///
    /// # Errors
    ///
    /// Returns `Error::LengthMismatch` if the columns differ in length, or
    /// `Error::InvalidSeries` if a bar violates the invariants.
    pub fn from_columns(
        timestamps: Vec<DateTime<Utc>>,
        open: Vec<f64>,
        high: Vec<f64>,
        low: Vec<f64>,
        close: Vec<f64>,
        volume: Vec<f64>,
    ) -> Result<Self> {
        let n = timestamps.len();
        let lens = [open.len(), high.len(), low.len(), close.len(), volume.len()];
        if lens.iter().any(|&len| len != n) {
            return Err(Error::LengthMismatch {
                description: format!(
                    "{n} timestamps but open/high/low/close/volume have {lens:?} values"
                ),
            });
        }
        Self::new(
            (0..n).map(|i| Bar::new(timestamps[i], open[i], high[i], low[i], close[i], volume[i])),
        )
    }

    fn with_capacity(capacity: usize) -> Self {
        Self {
            timestamps: Vec::with_capacity(capacity),
            open: Vec::with_capacity(capacity),
            high: Vec::with_capacity(capacity),
            low: Vec::with_capacity(capacity),
            close: Vec::with_capacity(capacity),
            volume: Vec::with_capacity(capacity),
        }
    }

    fn push(&mut self, bar: Bar) {
        self.timestamps.push(bar.timestamp);
        self.open.push(bar.open);
        self.high.push(bar.high);
        self.low.push(bar.low);
        self.close.push(bar.close);
        self.volume.push(bar.volume);
    }

    /// Number of bars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Returns `true` if the series has no bars.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Returns the bar at `index`, if any.
    #[must_use]
    pub fn bar(&self, index: usize) -> Option<Bar> {
        (index < self.len()).then(|| {
            Bar::new(
                self.timestamps[index],
                self.open[index],
                self.high[index],
                self.low[index],
                self.close[index],
                self.volume[index],
            )
        })
    }

    /// Iterates over the bars in time order.
    pub fn bars(&self) -> impl Iterator<Item = Bar> + '_ {
        (0..self.len()).filter_map(|i| self.bar(i))
    }

    /// Bar timestamps.
    #[must_use]
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Open prices.
    #[must_use]
    pub fn open(&self) -> &[f64] {
        &self.open
    }

    /// High prices.
    #[must_use]
    pub fn high(&self) -> &[f64] {
        &self.high
    }

    /// Low prices.
    #[must_use]
    pub fn low(&self) -> &[f64] {
        &self.low
    }

    /// Close prices.
    #[must_use]
    pub fn close(&self) -> &[f64] {
        &self.close
    }

    /// Traded volume.
    #[must_use]
    pub fn volume(&self) -> &[f64] {
        &self.volume
    }
}
