//! Commonly used types and traits for convenient importing.
//!
//! # Usage
//!
//! ```
//! use stockta::prelude::*;
//!
//! let prices = vec![1.0_f64, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
//!
//! let sma_result = sma(&prices, 3).unwrap();
//! let ema_result = ema(&prices, 3).unwrap();
//! let rsi_result = rsi(&prices, 5).unwrap();
//! ```
//!
//! # Contents
//!
//! - Errors: [`Error`], [`Result`]
//! - Traits: [`SeriesElement`], [`ValidatedInput`]
//! - Data: [`Bar`], [`Series`]
//! - Indicator functions with their config builders and output types
//! - Patterns: [`Pattern`], [`PatternRegistry`], [`PatternScanner`]
//! - Engine: [`Engine`], [`EngineConfig`], [`AnalysisReport`], [`analyze_batch`]

pub use crate::error::{Error, Result};
pub use crate::traits::{SeriesElement, ValidatedInput};

pub use crate::series::{Bar, Series};

pub use crate::indicators::{
    atr, bollinger, dmi, ema, macd, period_return, price_change, roc, rsi, rsi_with, sma,
    sma_with,
};
pub use crate::indicators::{
    Atr, Bollinger, BollingerOutput, DirectionalRule, Direction, Dmi, DmiOutput, Macd,
    MacdOutput, MinPeriods, MovingAverageOutput, MovingAverages, PeriodReturn, PriceChange, Roc,
    Rsi, SmoothingPolicy, StdDevKind, TrendConfig, TrendProjection,
};
pub use crate::indicators::{
    adx_lookback, adx_min_len, atr_lookback, atr_min_len, bollinger_lookback, bollinger_min_len,
    ema_lookback, ema_min_len, roc_lookback, roc_min_len, rsi_lookback, rsi_min_len, sma_lookback,
    sma_min_len,
};

pub use crate::gaps::{detect_gaps, detect_gaps_with, RangeBreak};
pub use crate::patterns::{Pattern, PatternRegistry, PatternScan, PatternScanner};

pub use crate::batch::analyze_batch;
pub use crate::config::EngineConfig;
pub use crate::engine::{AnalysisReport, Engine, IndicatorKind, IndicatorOutput};
