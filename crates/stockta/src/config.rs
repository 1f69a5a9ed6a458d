//! Engine configuration.
//!
//! [`EngineConfig`] aggregates the per-indicator builders and can be loaded
//! from TOML. Every section and field is optional; missing values take the
//! defaults below.
//!
//! ```toml
//! indicators = ["moving_averages", "rsi", "macd", "roc", "bollinger_width", "atr", "dmi"]
//!
//! [moving_averages]
//! short = 50
//! medium = 100
//! long = 200
//! min_periods = "strict"      # or "lenient"
//!
//! [rsi]
//! period = 14
//! smoothing = "wilder"        # or "simple"
//!
//! [macd]
//! fast_period = 12
//! slow_period = 26
//! signal_period = 9
//!
//! [roc]
//! period = 12
//!
//! [bollinger]
//! period = 20
//! k_up = 2.0
//! k_down = 2.0
//! std_dev_kind = "sample"     # or "population"
//!
//! [atr]
//! period = 14
//! smoothing = "wilder"
//!
//! [dmi]
//! period = 14
//! smoothing = "wilder"
//! rule = "dominant"           # or "independent"
//!
//! [patterns]
//! patterns = ["doji", "engulfing", "hammer", "hanging_man", "harami", "inverted_hammer", "shooting_star"]
//! drop_unmatched = false
//!
//! [trend]
//! enabled = true
//! horizon = 30
//! envelope_window = 20
//! envelope_k = 2.0
//!
//! [gaps]
//! enabled = true
//! threshold_hours = 24
//! ```

use std::path::Path;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::engine::IndicatorKind;
use crate::error::{Error, Result};
use crate::indicators::{
    Atr, Bollinger, Dmi, Macd, MinPeriods, MovingAverages, Roc, Rsi, TrendConfig,
};
use crate::patterns::PatternScanner;
use crate::traits::validate_period;

/// Trend projection section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendSettings {
    /// Whether the engine projects the trend.
    pub enabled: bool,
    /// Projection parameters.
    #[serde(flatten)]
    pub projection: TrendConfig,
}

impl Default for TrendSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            projection: TrendConfig::default(),
        }
    }
}

/// Gap detection section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GapSettings {
    /// Whether the engine reports range breaks.
    pub enabled: bool,
    /// Bars further apart than this many hours open a gap.
    pub threshold_hours: i64,
}

impl Default for GapSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold_hours: 24,
        }
    }
}

impl GapSettings {
    /// The threshold as a duration.
    #[must_use]
    pub fn threshold(&self) -> Duration {
        Duration::hours(self.threshold_hours)
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Indicator families to compute, in output order.
    pub indicators: Vec<IndicatorKind>,
    /// Short/medium/long simple moving averages.
    pub moving_averages: MovingAverages,
    /// RSI.
    pub rsi: Rsi,
    /// MACD.
    pub macd: Macd,
    /// Rate of change.
    pub roc: Roc,
    /// Bollinger band width.
    pub bollinger: Bollinger,
    /// Average true range.
    pub atr: Atr,
    /// Directional movement.
    pub dmi: Dmi,
    /// Candlestick patterns.
    pub patterns: PatternScanner,
    /// Trend projection.
    pub trend: TrendSettings,
    /// Gap detection.
    pub gaps: GapSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            indicators: IndicatorKind::ALL.to_vec(),
            moving_averages: MovingAverages::default(),
            rsi: Rsi::default(),
            macd: Macd::default(),
            roc: Roc::default(),
            bollinger: Bollinger::default(),
            atr: Atr::default(),
            dmi: Dmi::default(),
            patterns: PatternScanner::default(),
            trend: TrendSettings::default(),
            gaps: GapSettings::default(),
        }
    }
}

impl EngineConfig {
    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the document is malformed, or any error
    /// from [`EngineConfig::validate`].
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("{}: {e}", path.display()),
        })?;
        Self::from_toml_str(&source)
    }

    /// Renders the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config {
            message: e.to_string(),
        })
    }

    /// Switches every rolling window to lenient warm-up.
    #[must_use]
    pub fn lenient(mut self) -> Self {
        self.moving_averages = self.moving_averages.min_periods(MinPeriods::Lenient);
        self
    }

    /// Minimum series length needed by `kind` under this configuration.
    #[must_use]
    pub fn min_len(&self, kind: IndicatorKind) -> usize {
        match kind {
            IndicatorKind::MovingAverages => self.moving_averages.min_len(),
            IndicatorKind::Rsi => self.rsi.min_len(),
            IndicatorKind::Macd => self.macd.min_len(),
            IndicatorKind::Roc => self.roc.min_len(),
            IndicatorKind::BollingerWidth => self.bollinger.min_len(),
            IndicatorKind::Atr => self.atr.min_len(),
            IndicatorKind::Dmi => self.dmi.min_len(),
        }
    }

    /// Checks every section.
    ///
    /// Sections of disabled indicators are checked too, so a config file
    /// stays valid when an indicator is switched back on.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidPeriod` for a zero window or period
    /// - `Error::InvalidConfiguration` for inconsistent parameters
    pub fn validate(&self) -> Result<()> {
        self.moving_averages.validate()?;
        validate_period(self.rsi.get_period())?;
        self.macd.validate()?;
        validate_period(self.roc.get_period())?;
        self.bollinger.validate()?;
        validate_period(self.atr.get_period())?;
        validate_period(self.dmi.get_period())?;
        if self.trend.enabled {
            self.trend.projection.validate()?;
        }
        if self.gaps.threshold_hours <= 0 {
            return Err(Error::invalid_config("gaps.threshold_hours", "must be positive"));
        }
        Ok(())
    }
}
