//! stockta: technical analysis for OHLCV price series
//!
//! This crate turns a validated price [`Series`](series::Series) into
//! index-aligned indicator series, candlestick pattern detections, calendar
//! gaps and a linear trend projection.
//!
//! # Features
//!
//! - **Aligned outputs**: every output has the input's length; undefined
//!   points (warm-up, division by zero, missing data) are NaN
//! - **Generics**: slice-level indicators work with both `f32` and `f64`
//! - **Configurable**: builder-style indicator configs, aggregated in a
//!   TOML-loadable [`EngineConfig`](config::EngineConfig)
//! - **Safety**: typed errors for every fatal condition
//!
//! # Quick Start
//!
//! ```
//! use stockta::prelude::*;
//!
//! let data = vec![1.0_f64, 2.0, 3.0, 4.0, 5.0];
//! let result = sma(&data, 3).unwrap();
//!
//! // First 2 values are NaN (lookback period)
//! assert!(result[0].is_nan());
//! assert!(result[1].is_nan());
//! assert!((result[2] - 2.0).abs() < 1e-10);
//! ```
//!
//! # Modules
//!
//! - [`indicators`]: moving averages, RSI, MACD, ROC, Bollinger width, ATR,
//!   DMI/ADX, trend projection, price-change quote
//! - [`patterns`]: candlestick pattern catalog and scanner
//! - [`gaps`]: calendar gap detection
//! - [`engine`] and [`config`]: config-driven analysis of a whole series
//! - [`batch`]: many series at once
//!
//! # Error Handling
//!
//! ```
//! use stockta::prelude::*;
//!
//! // Period too long for data
//! let short_data = vec![1.0_f64, 2.0];
//! assert!(sma(&short_data, 10).is_err());
//!
//! // Empty data
//! let empty: Vec<f64> = vec![];
//! assert!(sma(&empty, 5).is_err());
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::perf)]
#![warn(clippy::nursery)]
#![warn(clippy::needless_collect)]
#![warn(clippy::or_fun_call)]
#![warn(clippy::inefficient_to_string)]
#![warn(clippy::useless_conversion)]
#![allow(clippy::module_name_repetitions)]

pub mod batch;
pub mod config;
pub mod engine;
pub mod error;
pub mod gaps;
pub mod indicators;
pub mod patterns;
pub mod prelude;
pub mod series;
pub mod traits;
pub mod utils;

pub use error::{Error, Result};
pub use indicators::sma;
pub use traits::{SeriesElement, ValidatedInput};
pub use utils::{approx_eq, count_nan_prefix, count_nans, EPSILON, LOOSE_EPSILON};
