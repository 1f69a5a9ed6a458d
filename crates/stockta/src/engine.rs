//! Config-driven analysis of one series.
//!
//! [`Engine`] runs every enabled indicator family, the candlestick scan,
//! gap detection, the trend projection and the latest price-change quote,
//! and collects them in an [`AnalysisReport`]. Indicator families are
//! independent of each other; with the `parallel` feature they run on the
//! rayon pool.
//!
//! # Example
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//! use stockta::config::EngineConfig;
//! use stockta::engine::Engine;
//! use stockta::series::{Bar, Series};
//!
//! let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let series = Series::new((0..60_i32).map(|i| {
//!     let close = 100.0 + f64::from(i);
//!     Bar::new(start + Duration::days(i.into()), close - 0.5, close + 1.0, close - 1.0, close, 1e6)
//! }))
//! .unwrap();
//!
//! let engine = Engine::new(EngineConfig::default().lenient()).unwrap();
//! let report = engine.analyze(&series).unwrap();
//! assert_eq!(report.indicators.get("RSI").unwrap().len(), 60);
//! assert!(report.trend.is_some());
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::gaps::{detect_gaps_with, RangeBreak};
use crate::indicators::{period_return, price_change, PeriodReturn, PriceChange, TrendProjection};
use crate::patterns::{CompactPatternScan, PatternRegistry, PatternScan};
use crate::series::Series;
use crate::traits::ValidatedInput;
use crate::utils::count_nan_prefix;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// An indicator family computed by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    /// Short, medium and long simple moving averages.
    MovingAverages,
    /// Relative Strength Index.
    Rsi,
    /// MACD line, signal and histogram.
    Macd,
    /// Rate of change.
    Roc,
    /// Bollinger band width.
    BollingerWidth,
    /// Average true range.
    Atr,
    /// Directional indicators and ADX.
    Dmi,
}

impl IndicatorKind {
    /// Every family, in report order.
    pub const ALL: [Self; 7] = [
        Self::MovingAverages,
        Self::Rsi,
        Self::Macd,
        Self::Roc,
        Self::BollingerWidth,
        Self::Atr,
        Self::Dmi,
    ];

    /// Identifier used in configuration files and logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MovingAverages => "moving_averages",
            Self::Rsi => "rsi",
            Self::Macd => "macd",
            Self::Roc => "roc",
            Self::BollingerWidth => "bollinger_width",
            Self::Atr => "atr",
            Self::Dmi => "dmi",
        }
    }

    /// Names of the output series this family produces.
    #[must_use]
    pub const fn output_names(self) -> &'static [&'static str] {
        match self {
            Self::MovingAverages => &["Short MA", "Medium MA", "Long MA"],
            Self::Rsi => &["RSI"],
            Self::Macd => &["MACD", "Signal", "Histogram"],
            Self::Roc => &["ROC"],
            Self::BollingerWidth => &["BB_Width"],
            Self::Atr => &["ATR"],
            Self::Dmi => &["Plus DI", "Minus DI", "ADX"],
        }
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Named output series, in insertion order.
///
/// Serializes as a map from name to an array where undefined points are
/// `null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorOutput {
    columns: Vec<(&'static str, Vec<f64>)>,
}

impl IndicatorOutput {
    /// Creates an empty output.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    /// Appends a series, replacing any existing series of the same name.
    pub fn insert(&mut self, name: &'static str, values: Vec<f64>) {
        if let Some(slot) = self.columns.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = values;
        } else {
            self.columns.push((name, values));
        }
    }

    /// Returns the series called `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_slice())
    }

    /// Output names in order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|(n, _)| *n)
    }

    /// Iterates over `(name, values)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &[f64])> {
        self.columns.iter().map(|(n, v)| (*n, v.as_slice()))
    }

    /// Number of series.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if there are no series.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

struct NullableSeries<'a>(&'a [f64]);

impl Serialize for NullableSeries<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for value in self.0 {
            seq.serialize_element(&value.is_finite().then_some(*value))?;
        }
        seq.end()
    }
}

impl Serialize for IndicatorOutput {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, values) in &self.columns {
            map.serialize_entry(name, &NullableSeries(values))?;
        }
        map.end()
    }
}

/// Everything the engine computes for one series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// Bar timestamps; every series below is aligned with them.
    pub timestamps: Vec<DateTime<Utc>>,
    /// Indicator series by name.
    pub indicators: IndicatorOutput,
    /// Candlestick detections.
    pub patterns: PatternScan,
    /// Detections restricted to matched bars, when row dropping is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_patterns: Option<CompactPatternScan>,
    /// Calendar gaps.
    pub range_breaks: Vec<RangeBreak>,
    /// Trend projection, when enabled.
    pub trend: Option<TrendProjection>,
    /// Change between the last two closes, when defined.
    pub price_change: Option<PriceChange>,
    /// Return from the first defined close to the last, when any close is defined.
    pub period_return: Option<PeriodReturn>,
}

/// Runs a validated [`EngineConfig`] against series.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    kinds: Vec<IndicatorKind>,
    registry: PatternRegistry,
}

impl Engine {
    /// Validates `config` and builds the pattern registry.
    ///
    /// Repeated indicator families are computed once.
    ///
    /// # Errors
    ///
    /// See [`EngineConfig::validate`].
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let mut kinds = Vec::with_capacity(config.indicators.len());
        for &kind in &config.indicators {
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        Ok(Self {
            config,
            kinds,
            registry: PatternRegistry::standard(),
        })
    }

    /// The engine's configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The pattern registry shared by every scan.
    #[must_use]
    pub const fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    /// Enabled indicator families, deduplicated, in report order.
    #[must_use]
    pub fn kinds(&self) -> &[IndicatorKind] {
        &self.kinds
    }

    /// Minimum series length and the family that imposes it.
    #[must_use]
    pub fn required_len(&self) -> Option<(usize, IndicatorKind)> {
        self.kinds
            .iter()
            .map(|&kind| (self.config.min_len(kind), kind))
            .max_by_key(|&(len, _)| len)
    }

    /// Analyzes one series.
    ///
    /// # Errors
    ///
    /// - `Error::EmptyInput` if the series has no bars
    /// - `Error::InsufficientData` if it is shorter than the longest minimum
    ///   length among the enabled families
    pub fn analyze(&self, series: &Series) -> Result<AnalysisReport> {
        let n = series.len();
        series.close().validate_not_empty()?;
        if let Some((required, kind)) = self.required_len() {
            if n < required {
                return Err(Error::InsufficientData {
                    required,
                    actual: n,
                    indicator: kind.name(),
                });
            }
        }

        let families = self.compute_families(series)?;
        let mut indicators = IndicatorOutput::new();
        for (kind, columns) in families {
            for (name, values) in columns {
                let undefined = count_nan_prefix(&values);
                debug!(indicator = kind.name(), output = name, bars = n, undefined, "computed");
                if undefined == n {
                    warn!(output = name, bars = n, "output is undefined for every bar");
                }
                indicators.insert(name, values);
            }
        }

        let scanner = &self.config.patterns;
        let patterns = scanner.scan(&self.registry, series)?;
        debug!(
            patterns = patterns.series().len(),
            matches = patterns.series().iter().map(|s| s.matches()).sum::<usize>(),
            "scanned candlestick patterns"
        );
        let matched_patterns = scanner
            .drops_unmatched()
            .then(|| patterns.drop_unmatched_rows());

        let range_breaks = if self.config.gaps.enabled {
            detect_gaps_with(series.timestamps(), self.config.gaps.threshold())?
        } else {
            Vec::new()
        };

        let trend = if self.config.trend.enabled {
            let projection = self
                .config
                .trend
                .projection
                .project(series.close(), Some(series.timestamps()))?;
            debug!(
                slope = projection.slope,
                horizon = projection.forecast.len(),
                "projected trend"
            );
            Some(projection)
        } else {
            None
        };

        let price_change = if n < 2 {
            None
        } else {
            match price_change(series.close()) {
                Ok(quote) => Some(quote),
                Err(err) => {
                    warn!(error = %err, "price change undefined");
                    None
                }
            }
        };

        let period_return = match period_return(series.close()) {
            Ok(ret) => Some(ret),
            Err(err) => {
                warn!(error = %err, "period return undefined");
                None
            }
        };

        Ok(AnalysisReport {
            timestamps: series.timestamps().to_vec(),
            indicators,
            patterns,
            matched_patterns,
            range_breaks,
            trend,
            price_change,
            period_return,
        })
    }

    #[cfg(feature = "parallel")]
    fn compute_families(&self, series: &Series) -> Result<Vec<(IndicatorKind, Columns)>> {
        self.kinds
            .par_iter()
            .map(|&kind| Ok((kind, self.compute(kind, series)?)))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn compute_families(&self, series: &Series) -> Result<Vec<(IndicatorKind, Columns)>> {
        self.kinds
            .iter()
            .map(|&kind| Ok((kind, self.compute(kind, series)?)))
            .collect()
    }

    fn compute(&self, kind: IndicatorKind, series: &Series) -> Result<Columns> {
        let cfg = &self.config;
        let (high, low, close) = (series.high(), series.low(), series.close());
        let names = kind.output_names();
        let values = match kind {
            IndicatorKind::MovingAverages => {
                let out = cfg.moving_averages.compute(close)?;
                vec![out.short, out.medium, out.long]
            }
            IndicatorKind::Rsi => vec![cfg.rsi.compute(close)?],
            IndicatorKind::Macd => {
                let out = cfg.macd.compute(close)?;
                vec![out.macd_line, out.signal_line, out.histogram]
            }
            IndicatorKind::Roc => vec![cfg.roc.compute(close)?],
            IndicatorKind::BollingerWidth => vec![cfg.bollinger.compute(close)?.width],
            IndicatorKind::Atr => vec![cfg.atr.compute(high, low, close)?],
            IndicatorKind::Dmi => {
                let out = cfg.dmi.compute(high, low, close)?;
                vec![out.plus_di, out.minus_di, out.adx]
            }
        };
        Ok(names.iter().copied().zip(values).collect())
    }
}

type Columns = Vec<(&'static str, Vec<f64>)>;
