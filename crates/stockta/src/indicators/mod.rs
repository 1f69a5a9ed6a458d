//! Technical analysis indicators.
//!
//! All indicators share the following properties:
//!
//! - **Generic**: work with both `f32` and `f64` via
//!   [`SeriesElement`](crate::traits::SeriesElement)
//! - **Index-aligned**: output has the input's length; warm-up bars and
//!   undefined points are NaN
//! - **Error-safe**: typed errors for empty input, zero periods and short series
//!
//! # Indicator Categories
//!
//! ## Trend
//!
//! - [`sma()`] and [`MovingAverages`]: short/medium/long simple moving averages
//! - [`ema()`]: exponential moving average
//! - [`macd()`]: MACD line, signal and histogram
//! - [`trend`]: least-squares trend projection with an envelope
//!
//! ## Momentum
//!
//! - [`rsi()`]: Relative Strength Index
//! - [`roc()`]: Rate of Change
//!
//! ## Volatility
//!
//! - [`atr()`]: Average True Range
//! - [`bollinger()`]: Bollinger Bands and band width
//!
//! ## Directional movement
//!
//! - [`dmi()`]: +DI, -DI, DX and ADX
//!
//! # Example
//!
//! ```
//! use stockta::indicators::{ema, rsi, sma};
//!
//! let prices = vec![44.0_f64, 44.5, 43.5, 44.5, 44.0, 43.0, 42.5, 43.5, 44.5, 45.0];
//!
//! let sma_result = sma(&prices, 5).unwrap();
//! let ema_result = ema(&prices, 5).unwrap();
//! let rsi_result = rsi(&prices, 5).unwrap();
//!
//! assert!(sma_result[3].is_nan());
//! assert!(!ema_result[0].is_nan());
//! assert!(rsi_result[4].is_nan() && !rsi_result[5].is_nan());
//! ```
//!
//! # Error Handling
//!
//! Indicators return [`Result<T, Error>`](crate::error::Error) to handle:
//!
//! - Empty input data ([`EmptyInput`](crate::error::Error::EmptyInput))
//! - Invalid period values ([`InvalidPeriod`](crate::error::Error::InvalidPeriod))
//! - Insufficient data for the requested period
//!   ([`InsufficientData`](crate::error::Error::InsufficientData))

pub mod atr;
pub mod bollinger;
pub mod dmi;
pub mod ema;
pub mod macd;
pub mod quote;
pub mod roc;
pub mod rsi;
pub mod sma;
pub mod smoothing;
pub mod trend;

pub use atr::{atr, atr_lookback, atr_min_len, atr_with, true_range, Atr};
pub use bollinger::{bollinger, bollinger_lookback, bollinger_min_len, Bollinger, BollingerOutput};
pub use dmi::{
    adx_lookback, adx_min_len, di_lookback, directional_movement, dmi, DirectionalRule, Dmi,
    DmiOutput,
};
pub use ema::{compute_alpha, ema, ema_lookback, ema_min_len, ema_with_alpha};
pub use macd::{macd, validate_macd_params, Macd, MacdOutput};
pub use quote::{period_return, price_change, Direction, PeriodReturn, PriceChange};
pub use roc::{roc, roc_lookback, roc_min_len, Roc};
pub use rsi::{rsi, rsi_lookback, rsi_min_len, rsi_with, Rsi};
pub use sma::{sma, sma_lookback, sma_min_len, sma_with, MovingAverageOutput, MovingAverages};
pub use smoothing::{MinPeriods, SmoothingPolicy, StdDevKind};
pub use trend::{linear_fit, LinearFit, TrendConfig, TrendProjection};
