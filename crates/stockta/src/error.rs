//! Error types for stockta.
//!
//! A single [`Error`] enum covers every failure the engine can report. Series
//! computations never fail for a single bad data point: division by zero and
//! missing observations resolve to an undefined (NaN) value at that index.
//! The variants here are reserved for conditions that make the whole call
//! meaningless, such as an empty series or a malformed configuration.

use thiserror::Error;

/// The main error type for stockta operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The input series is empty.
    #[error("empty input: no data provided")]
    EmptyInput,

    /// The input series is too short for the requested indicator.
    #[error("insufficient data for {indicator}: required {required} bars, got {actual}")]
    InsufficientData {
        /// The number of data points required.
        required: usize,
        /// The number of data points provided.
        actual: usize,
        /// Name of the indicator that rejected the input.
        indicator: &'static str,
    },

    /// A window or period parameter is invalid (typically zero).
    #[error("invalid period {period}: {reason}")]
    InvalidPeriod {
        /// The invalid period value that was provided.
        period: usize,
        /// Description of why the period is invalid.
        reason: &'static str,
    },

    /// A configuration value is out of range or inconsistent.
    #[error("invalid configuration for '{parameter}': {reason}")]
    InvalidConfiguration {
        /// Name of the offending parameter.
        parameter: String,
        /// Description of the constraint that was violated.
        reason: String,
    },

    /// A scalar computation divided by zero.
    ///
    /// Series APIs never return this; they emit an undefined point instead.
    #[error("division by zero: {context}")]
    DivisionByZero {
        /// What was being divided.
        context: &'static str,
    },

    /// Parallel input slices have different lengths.
    #[error("length mismatch: {description}")]
    LengthMismatch {
        /// Which inputs disagree and by how much.
        description: String,
    },

    /// A bar violates the series invariants.
    #[error("invalid series at bar {index}: {reason}")]
    InvalidSeries {
        /// Position of the offending bar.
        index: usize,
        /// Which invariant was violated.
        reason: String,
    },

    /// A candlestick pattern key did not match the catalog.
    #[error("unknown candlestick pattern '{name}'")]
    UnknownPattern {
        /// The key that was looked up.
        name: String,
    },

    /// Failed to convert a numeric value to the target type.
    #[error("numeric conversion failed: {context}")]
    NumericConversion {
        /// Description of the conversion that failed.
        context: &'static str,
    },

    /// The configuration document could not be parsed.
    #[error("failed to parse configuration: {message}")]
    Config {
        /// Parser diagnostic.
        message: String,
    },
}

impl Error {
    /// Shorthand for building an [`Error::InvalidConfiguration`].
    pub fn invalid_config(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Config {
            message: err.to_string(),
        }
    }
}

/// Convenience type alias for Results using the stockta Error type.
pub type Result<T> = std::result::Result<T, Error>;
