//! CSV parsing module for reading OHLCV bars.
//!
//! # Column Detection
//!
//! Headers are matched case-insensitively after trimming:
//! - `date`, `time`, `datetime`, `timestamp` → bar timestamp (required)
//! - `close`, `adj close`, `adjusted close`, `price` → close (required)
//! - `open`, `high`, `low` → required by range-based commands, otherwise
//!   they default to the close
//! - `volume`, `vol` → volume (defaults to 0)
//!
//! Other columns are ignored. Empty numeric cells are read as undefined (NaN).
//!
//! # Dates
//!
//! Accepted formats, all taken as UTC: RFC 3339 (`2024-01-02T15:30:00Z`),
//! `YYYY-MM-DD HH:MM:SS` and `YYYY-MM-DD`.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use csv::{ReaderBuilder, StringRecord};
use stockta::series::Series;
use tracing::{debug, info};

use crate::error::{CliError, Result};

/// Which price columns a command needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceColumns {
    /// Only closes; missing open/high/low are filled from the close.
    Close,
    /// Open, high, low and close must all be present.
    Ohlc,
}

/// Resolved header positions.
#[derive(Debug, Default)]
struct ColumnMap {
    date: Option<usize>,
    open: Option<usize>,
    high: Option<usize>,
    low: Option<usize>,
    close: Option<usize>,
    volume: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Self {
        let mut map = Self::default();
        for (idx, header) in headers.iter().enumerate() {
            let slot = match header.trim().to_lowercase().as_str() {
                "date" | "time" | "datetime" | "timestamp" => &mut map.date,
                "open" => &mut map.open,
                "high" => &mut map.high,
                "low" => &mut map.low,
                "close" | "adj close" | "adjusted close" | "price" => &mut map.close,
                "volume" | "vol" => &mut map.volume,
                _ => continue,
            };
            // first matching header wins
            slot.get_or_insert(idx);
        }
        map
    }

    fn require(&self, columns: PriceColumns) -> Result<()> {
        let missing = |name: &str| CliError::Csv {
            message: format!("no '{name}' column found"),
            line: Some(1),
        };
        if self.date.is_none() {
            return Err(missing("date"));
        }
        if self.close.is_none() {
            return Err(missing("close"));
        }
        if columns == PriceColumns::Ohlc {
            for (name, idx) in [("open", self.open), ("high", self.high), ("low", self.low)] {
                if idx.is_none() {
                    return Err(missing(name));
                }
            }
        }
        Ok(())
    }
}

/// Parse a date cell in any of the accepted formats.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn parse_value(record: &StringRecord, idx: Option<usize>, line: usize) -> Result<Option<f64>> {
    let Some(idx) = idx else {
        return Ok(None);
    };
    let cell = record.get(idx).unwrap_or("").trim();
    if cell.is_empty() {
        return Ok(Some(f64::NAN));
    }
    cell.parse::<f64>().map(Some).map_err(|_| CliError::Csv {
        message: format!("cannot parse '{cell}' as number"),
        line: Some(line),
    })
}

/// Parse an OHLCV CSV file into a validated [`Series`].
///
/// # Errors
///
/// Returns `CliError::Io` if the file cannot be opened, `CliError::Csv` or
/// `CliError::DateParse` for malformed content, and `CliError::Indicator`
/// if the bars violate the series invariants.
pub fn parse_series<P: AsRef<Path>>(path: P, columns: PriceColumns) -> Result<Series> {
    let path = path.as_ref();
    let file = File::open(path).map_err(CliError::io(path))?;
    let series = parse_series_from_reader(BufReader::new(file), columns)?;
    info!(path = %path.display(), bars = series.len(), "loaded series");
    Ok(series)
}

/// Parse OHLCV CSV data from a reader.
pub fn parse_series_from_reader<R: Read>(reader: R, columns: PriceColumns) -> Result<Series> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let map = ColumnMap::from_headers(&headers);
    map.require(columns)?;
    debug!(?map, "resolved CSV columns");

    let mut timestamps = Vec::new();
    let mut open = Vec::new();
    let mut high = Vec::new();
    let mut low = Vec::new();
    let mut close = Vec::new();
    let mut volume = Vec::new();

    for (row, result) in csv_reader.records().enumerate() {
        // header is line 1
        let line = row + 2;
        let record = result.map_err(|e| CliError::Csv {
            message: e.to_string(),
            line: Some(line),
        })?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let raw_date = map.date.and_then(|idx| record.get(idx)).unwrap_or("");
        let timestamp = parse_timestamp(raw_date).ok_or_else(|| CliError::DateParse {
            value: raw_date.to_string(),
            line,
        })?;

        let c = parse_value(&record, map.close, line)?.unwrap_or(f64::NAN);
        timestamps.push(timestamp);
        open.push(parse_value(&record, map.open, line)?.unwrap_or(c));
        high.push(parse_value(&record, map.high, line)?.unwrap_or(c));
        low.push(parse_value(&record, map.low, line)?.unwrap_or(c));
        close.push(c);
        volume.push(parse_value(&record, map.volume, line)?.unwrap_or(0.0));
    }

    Ok(Series::from_columns(timestamps, open, high, low, close, volume)?)
}
