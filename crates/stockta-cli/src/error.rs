//! CLI error types for handling file I/O, parsing, and indicator errors.
//!
//! Every message says what went wrong and, where it helps, how to fix it.

use std::io;
use std::path::Path;

use thiserror::Error;

/// CLI error type encompassing all possible error conditions.
#[derive(Debug, Error)]
pub enum CliError {
    /// Reading or writing a file failed.
    #[error("I/O error with '{path}': {source}. Check that the path exists and is accessible")]
    Io {
        /// The underlying I/O error.
        #[source]
        source: io::Error,
        /// File the error refers to, or `<stdout>`.
        path: String,
    },

    /// The CSV input is malformed.
    #[error("CSV parse error{}: {message}. Ensure the file has a header row with date and price columns", line_suffix(.line))]
    Csv {
        /// Description of the problem.
        message: String,
        /// 1-based line number, header included.
        line: Option<usize>,
    },

    /// A date cell matched none of the accepted formats.
    #[error("cannot parse date '{value}' on line {line}. Use RFC 3339, 'YYYY-MM-DD HH:MM:SS' or 'YYYY-MM-DD'")]
    DateParse {
        /// The offending cell.
        value: String,
        /// 1-based line number, header included.
        line: usize,
    },

    /// The library rejected the input or parameters.
    #[error("Indicator computation error: {0}")]
    Indicator(#[from] stockta::Error),

    /// A command-line parameter is invalid.
    #[error("Invalid argument '{argument}': {reason}{}", suggestion_suffix(.suggestion))]
    InvalidArgument {
        /// Name of the argument.
        argument: String,
        /// Why it was rejected.
        reason: String,
        /// Suggested valid value.
        suggestion: Option<String>,
    },

    /// The report could not be encoded as JSON.
    #[error("cannot encode JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

fn line_suffix(line: &Option<usize>) -> String {
    line.map(|l| format!(" on line {l}")).unwrap_or_default()
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    suggestion
        .as_ref()
        .map(|s| format!(". {s}"))
        .unwrap_or_default()
}

impl CliError {
    /// Returns a closure that wraps an I/O error with `path`.
    pub fn io(path: impl AsRef<Path>) -> impl FnOnce(io::Error) -> Self {
        let path = path.as_ref().display().to_string();
        move |source| Self::Io { source, path }
    }

    /// Builds an [`CliError::InvalidArgument`].
    pub fn invalid_argument(
        argument: impl Into<String>,
        reason: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::InvalidArgument {
            argument: argument.into(),
            reason: reason.into(),
            suggestion: Some(suggestion.into()),
        }
    }
}

impl From<csv::Error> for CliError {
    fn from(err: csv::Error) -> Self {
        let line = err
            .position()
            .and_then(|p| usize::try_from(p.line()).ok());
        Self::Csv {
            message: err.to_string(),
            line,
        }
    }
}

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;
