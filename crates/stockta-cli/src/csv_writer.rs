//! Output module for writing results as CSV or JSON.
//!
//! Every series stays index-aligned with the input bars:
//!
//! - the first column is `date`, one row per bar
//! - undefined values (NaN) are written as empty cells in CSV and `null` in JSON
//!
//! Warm-up rows are kept so that the output lines up with the input file.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Timelike, Utc};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use tracing::info;

use crate::error::{CliError, Result};

/// Output destination: either stdout or a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputDest {
    /// Write to stdout.
    Stdout,
    /// Write to a file at the given path.
    File(PathBuf),
}

impl OutputDest {
    /// Destination for an optional `-o` argument.
    pub fn from_option(path: Option<&Path>) -> Self {
        path.map_or(Self::Stdout, |p| Self::File(p.to_path_buf()))
    }

    /// Name used in messages.
    pub fn label(&self) -> String {
        match self {
            Self::Stdout => "<stdout>".to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }

    /// Create a writer for this output destination.
    pub fn writer(&self) -> Result<Box<dyn Write>> {
        match self {
            Self::Stdout => Ok(Box::new(io::stdout().lock())),
            Self::File(path) => {
                let file = File::create(path).map_err(CliError::io(path))?;
                Ok(Box::new(BufWriter::new(file)))
            }
        }
    }
}

/// Formats a timestamp: midnight as `YYYY-MM-DD`, anything else as RFC 3339.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    if ts.num_seconds_from_midnight() == 0 && ts.nanosecond() == 0 {
        ts.format("%Y-%m-%d").to_string()
    } else {
        ts.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

fn format_value(value: f64) -> String {
    if value.is_finite() {
        value.to_string()
    } else {
        String::new()
    }
}

/// Named numeric columns sharing a date column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    dates: Vec<DateTime<Utc>>,
    columns: Vec<(String, Vec<f64>)>,
}

impl Table {
    /// Creates a table with the given date column and no series.
    pub fn new(dates: Vec<DateTime<Utc>>) -> Self {
        Self {
            dates,
            columns: Vec::new(),
        }
    }

    /// Appends a series; shorter series are padded with undefined cells.
    pub fn push(&mut self, name: impl Into<String>, values: Vec<f64>) {
        self.columns.push((name.into(), values));
    }

    /// Builder form of [`Table::push`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.push(name, values);
        self
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Column names in order, without `date`.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    fn cell(&self, column: usize, row: usize) -> f64 {
        self.columns[column].1.get(row).copied().unwrap_or(f64::NAN)
    }
}

struct NullableColumn<'a>(&'a Table, usize);

impl Serialize for NullableColumn<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let Self(table, column) = *self;
        let mut seq = serializer.serialize_seq(Some(table.len()))?;
        for row in 0..table.len() {
            let value = table.cell(column, row);
            seq.serialize_element(&value.is_finite().then_some(value))?;
        }
        seq.end()
    }
}

impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len() + 1))?;
        map.serialize_entry("date", &self.dates)?;
        for (column, (name, _)) in self.columns.iter().enumerate() {
            map.serialize_entry(name, &NullableColumn(self, column))?;
        }
        map.end()
    }
}

/// Write a table as CSV.
pub fn write_table(table: &Table, dest: &OutputDest) -> Result<()> {
    let mut writer = csv::Writer::from_writer(dest.writer()?);

    let mut header = vec!["date"];
    header.extend(table.names());
    writer.write_record(&header)?;

    for (row, date) in table.dates.iter().enumerate() {
        let mut record = Vec::with_capacity(table.columns.len() + 1);
        record.push(format_timestamp(date));
        record.extend((0..table.columns.len()).map(|column| format_value(table.cell(column, row))));
        writer.write_record(&record)?;
    }

    writer.flush().map_err(CliError::io(dest.label()))?;
    info!(dest = %dest.label(), rows = table.len(), columns = table.columns.len(), "wrote CSV");
    Ok(())
}

/// Write serializable rows as CSV, one record per item.
pub fn write_records<T: Serialize>(rows: &[T], dest: &OutputDest) -> Result<()> {
    let mut writer = csv::Writer::from_writer(dest.writer()?);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().map_err(CliError::io(dest.label()))?;
    info!(dest = %dest.label(), rows = rows.len(), "wrote CSV");
    Ok(())
}

/// Write any serializable value as pretty JSON.
pub fn write_json<T: Serialize + ?Sized>(value: &T, dest: &OutputDest) -> Result<()> {
    let mut writer = dest.writer()?;
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer).map_err(CliError::io(dest.label()))?;
    writer.flush().map_err(CliError::io(dest.label()))?;
    info!(dest = %dest.label(), "wrote JSON");
    Ok(())
}
