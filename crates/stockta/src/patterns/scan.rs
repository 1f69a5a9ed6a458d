//! Running the detectors over a series.
//!
//! [`recognize`] produces one index-aligned column per requested pattern:
//! the signed strength where the pattern matched, NaN elsewhere. Dropping
//! rows where nothing matched is opt-in through
//! [`PatternScan::drop_unmatched_rows`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::{Pattern, PatternRegistry};
use super::shape::Candle;
use crate::error::Result;
use crate::series::Series;
use crate::traits::{validate_ohlc_lengths, ValidatedInput};

/// Detection column for one pattern.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternSeries {
    /// The pattern.
    pub pattern: Pattern,
    /// Strength per bar; NaN where the pattern did not match.
    pub values: Vec<f64>,
}

impl PatternSeries {
    /// Number of bars where the pattern matched.
    #[must_use]
    pub fn matches(&self) -> usize {
        self.values.iter().filter(|v| !v.is_nan()).count()
    }
}

/// A single detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PatternEvent {
    /// Bar index.
    pub index: usize,
    /// Bar timestamp, when known.
    pub timestamp: Option<DateTime<Utc>>,
    /// Matched pattern.
    pub pattern: Pattern,
    /// Signed strength, `100` bullish or `-100` bearish.
    pub strength: i32,
}

/// Index-aligned detections of a set of patterns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternScan {
    len: usize,
    series: Vec<PatternSeries>,
}

impl PatternScan {
    /// Number of bars scanned.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no bars were scanned.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Detection columns in request order.
    #[must_use]
    pub fn series(&self) -> &[PatternSeries] {
        &self.series
    }

    /// Column of `pattern`, if it was scanned.
    #[must_use]
    pub fn get(&self, pattern: Pattern) -> Option<&[f64]> {
        self.series
            .iter()
            .find(|s| s.pattern == pattern)
            .map(|s| s.values.as_slice())
    }

    /// Flattens the detections into events ordered by bar, then by catalog order.
    ///
    /// `timestamps` is attached when it has one entry per bar.
    #[must_use]
    pub fn events(&self, timestamps: Option<&[DateTime<Utc>]>) -> Vec<PatternEvent> {
        let timestamps = timestamps.filter(|ts| ts.len() == self.len);
        let mut events = Vec::new();
        for index in 0..self.len {
            for column in &self.series {
                let value = column.values[index];
                if value.is_nan() {
                    continue;
                }
                #[allow(clippy::cast_possible_truncation)]
                events.push(PatternEvent {
                    index,
                    timestamp: timestamps.map(|ts| ts[index]),
                    pattern: column.pattern,
                    strength: value as i32,
                });
            }
        }
        events
    }

    /// Keeps only the bars where at least one pattern matched.
    #[must_use]
    pub fn drop_unmatched_rows(&self) -> CompactPatternScan {
        let indices: Vec<usize> = (0..self.len)
            .filter(|&i| self.series.iter().any(|s| !s.values[i].is_nan()))
            .collect();
        let series = self
            .series
            .iter()
            .map(|s| PatternSeries {
                pattern: s.pattern,
                values: indices.iter().map(|&i| s.values[i]).collect(),
            })
            .collect();
        CompactPatternScan { indices, series }
    }
}

/// Detections restricted to the bars where something matched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompactPatternScan {
    /// Original bar index of each kept row.
    pub indices: Vec<usize>,
    /// Detection columns, aligned with `indices`.
    pub series: Vec<PatternSeries>,
}

/// Runs `patterns` over the OHLC columns.
///
/// # Errors
///
/// - `Error::EmptyInput` if the columns are empty
/// - `Error::LengthMismatch` if the columns differ in length
///
/// # Example
///
/// ```
/// use stockta::patterns::{recognize, Pattern, PatternRegistry};
///
/// let open = [10.0, 10.2];
/// let high = [12.0, 13.0];
/// let low = [9.0, 10.0];
/// let close = [10.5, 12.0];
///
/// let scan = recognize(
///     &PatternRegistry::standard(),
///     &[Pattern::Engulfing],
///     &open, &high, &low, &close,
/// ).unwrap();
/// let column = scan.get(Pattern::Engulfing).unwrap();
/// assert!(column[0].is_nan());
/// assert_eq!(column[1], 100.0);
/// ```
pub fn recognize(
    registry: &PatternRegistry,
    patterns: &[Pattern],
    open: &[f64],
    high: &[f64],
    low: &[f64],
    close: &[f64],
) -> Result<PatternScan> {
    open.validate_not_empty()?;
    validate_ohlc_lengths(open, high, low, close)?;

    let candles: Vec<Candle> = (0..open.len())
        .map(|i| Candle::new(open[i], high[i], low[i], close[i]))
        .collect();

    let series = patterns
        .iter()
        .map(|&pattern| {
            let detect = registry.get(pattern).detector;
            let values = candles
                .iter()
                .enumerate()
                .map(|(i, curr)| {
                    let prev = i.checked_sub(1).map(|p| &candles[p]);
                    detect(prev, curr).map_or(f64::NAN, f64::from)
                })
                .collect();
            PatternSeries { pattern, values }
        })
        .collect();

    Ok(PatternScan {
        len: candles.len(),
        series,
    })
}

/// Which patterns to scan for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternScanner {
    patterns: Vec<Pattern>,
    drop_unmatched: bool,
}

impl Default for PatternScanner {
    fn default() -> Self {
        Self {
            patterns: Pattern::ALL.to_vec(),
            drop_unmatched: false,
        }
    }
}

impl PatternScanner {
    /// Scans for every catalog pattern, keeping all rows.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the scan to `patterns`, deduplicated in the given order.
    #[must_use]
    pub fn patterns(mut self, patterns: impl IntoIterator<Item = Pattern>) -> Self {
        self.patterns.clear();
        for pattern in patterns {
            if !self.patterns.contains(&pattern) {
                self.patterns.push(pattern);
            }
        }
        self
    }

    /// Whether callers should drop rows with no detection.
    #[must_use]
    pub const fn drop_unmatched(mut self, drop: bool) -> Self {
        self.drop_unmatched = drop;
        self
    }

    /// Selected patterns.
    #[must_use]
    pub fn get_patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// Returns the row-dropping flag.
    #[must_use]
    pub const fn drops_unmatched(&self) -> bool {
        self.drop_unmatched
    }

    /// Scans a series.
    ///
    /// # Errors
    ///
    /// See [`recognize`].
    pub fn scan(&self, registry: &PatternRegistry, series: &Series) -> Result<PatternScan> {
        recognize(
            registry,
            &self.patterns,
            series.open(),
            series.high(),
            series.low(),
            series.close(),
        )
    }
}
