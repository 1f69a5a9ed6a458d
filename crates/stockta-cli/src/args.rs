//! CLI argument parsing module.
//!
//! The CLI follows the pattern `stockta <command> <input.csv> [params] [-o out] [-f csv|json]`.
//!
//! # Examples
//!
//! ```bash
//! # Full engine run with the default configuration
//! stockta analyze prices.csv
//!
//! # Engine run from a TOML config, written as JSON
//! stockta analyze prices.csv --config engine.toml -f json -o report.json
//!
//! # Single indicators
//! stockta sma prices.csv 50
//! stockta rsi prices.csv 14 --smoothing simple
//! stockta macd prices.csv 12,26,9
//! stockta bbwidth prices.csv 20,2.0
//!
//! # Candlestick patterns, only rows with a detection
//! stockta patterns prices.csv --only CDLDOJI,CDLHAMMER --drop-unmatched
//!
//! # Linear trend projected 10 bars ahead
//! stockta trend prices.csv 10
//!
//! # Last-bar change and return over the whole file
//! stockta quote prices.csv
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use stockta::indicators::{DirectionalRule, SmoothingPolicy, StdDevKind};

use crate::error::{CliError, Result};

/// stockta: technical-analysis indicators for OHLCV price files
#[derive(Parser, Debug)]
#[command(name = "stockta")]
#[command(author, version, about = "Technical-analysis indicators for OHLCV price files")]
#[command(long_about = "stockta reads OHLCV bars from CSV, computes moving averages, RSI, \
    MACD, ATR, DMI/ADX, Bollinger width, rate of change, candlestick patterns, calendar gaps \
    and a linear trend projection, and writes CSV or JSON. Logs go to stderr; set RUST_LOG or \
    pass -v to see them.")]
pub struct Args {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Output options shared by every command.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,
}

/// Output encodings.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// A `date` column followed by one column per series; undefined cells are empty.
    #[default]
    Csv,
    /// Pretty-printed JSON; undefined values are `null`.
    Json,
}

/// Smoothing policy for RSI and ATR.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Smoothing {
    /// Rolling arithmetic mean.
    Simple,
    /// Wilder's recursive smoothing.
    #[default]
    Wilder,
}

impl From<Smoothing> for SmoothingPolicy {
    fn from(value: Smoothing) -> Self {
        match value {
            Smoothing::Simple => Self::Simple,
            Smoothing::Wilder => Self::Wilder,
        }
    }
}

/// Available commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the full engine and write every enabled indicator, pattern and projection
    Analyze {
        /// Input CSV file
        input: PathBuf,

        /// TOML engine configuration (defaults apply when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the trend projection horizon
        #[arg(long)]
        horizon: Option<usize>,

        /// Also report pattern detections restricted to matched bars
        #[arg(long)]
        drop_unmatched: bool,

        /// Emit moving averages over partial windows instead of failing on short input
        #[arg(long)]
        lenient: bool,

        #[command(flatten)]
        out: OutputArgs,
    },

    /// Simple Moving Average
    Sma {
        /// Input CSV file
        input: PathBuf,

        /// Window length
        #[arg(default_value = "20")]
        window: usize,

        /// Average over the available bars while the window fills
        #[arg(long)]
        lenient: bool,

        #[command(flatten)]
        out: OutputArgs,
    },

    /// Exponential Moving Average
    Ema {
        /// Input CSV file
        input: PathBuf,

        /// Span
        #[arg(default_value = "20")]
        span: usize,

        #[command(flatten)]
        out: OutputArgs,
    },

    /// Relative Strength Index
    Rsi {
        /// Input CSV file
        input: PathBuf,

        /// Period
        #[arg(default_value = "14")]
        period: usize,

        /// Smoothing of average gains and losses
        #[arg(long, value_enum, default_value_t = Smoothing::Wilder)]
        smoothing: Smoothing,

        #[command(flatten)]
        out: OutputArgs,
    },

    /// Moving Average Convergence Divergence
    Macd {
        /// Input CSV file
        input: PathBuf,

        /// Parameters: fast,slow,signal
        #[arg(default_value = "12,26,9")]
        params: String,

        #[command(flatten)]
        out: OutputArgs,
    },

    /// Rate of Change
    Roc {
        /// Input CSV file
        input: PathBuf,

        /// Period
        #[arg(default_value = "12")]
        period: usize,

        #[command(flatten)]
        out: OutputArgs,
    },

    /// Bollinger band width
    Bbwidth {
        /// Input CSV file
        input: PathBuf,

        /// Parameters: period,k or period,k_up,k_down
        #[arg(default_value = "20,2.0")]
        params: String,

        /// Use the population standard deviation
        #[arg(long)]
        population: bool,

        #[command(flatten)]
        out: OutputArgs,
    },

    /// Average True Range
    Atr {
        /// Input CSV file
        input: PathBuf,

        /// Period
        #[arg(default_value = "14")]
        period: usize,

        /// Smoothing of the true range
        #[arg(long, value_enum, default_value_t = Smoothing::Wilder)]
        smoothing: Smoothing,

        #[command(flatten)]
        out: OutputArgs,
    },

    /// Directional movement: +DI, -DI and ADX
    Adx {
        /// Input CSV file
        input: PathBuf,

        /// Period
        #[arg(default_value = "14")]
        period: usize,

        /// Keep both +DM and -DM when both are positive
        #[arg(long)]
        independent: bool,

        #[command(flatten)]
        out: OutputArgs,
    },

    /// Candlestick pattern detection
    Patterns {
        /// Input CSV file
        input: PathBuf,

        /// Patterns to detect, by key, name or id (defaults to all)
        #[arg(long, value_delimiter = ',')]
        only: Vec<String>,

        /// Keep only bars where at least one pattern matched
        #[arg(long)]
        drop_unmatched: bool,

        /// List the pattern catalog instead of scanning
        #[arg(long)]
        list: bool,

        #[command(flatten)]
        out: OutputArgs,
    },

    /// Calendar gaps between bars
    Gaps {
        /// Input CSV file
        input: PathBuf,

        /// Bars further apart than this many hours open a gap
        #[arg(long, default_value = "24")]
        threshold_hours: i64,

        #[command(flatten)]
        out: OutputArgs,
    },

    /// Linear-regression trend with a forecast
    Trend {
        /// Input CSV file
        input: PathBuf,

        /// Bars to project past the end of the series
        #[arg(default_value = "30")]
        horizon: usize,

        #[command(flatten)]
        out: OutputArgs,
    },

    /// Change over the last bar and return over the whole file
    Quote {
        /// Input CSV file
        input: PathBuf,

        #[command(flatten)]
        out: OutputArgs,
    },
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the input file path from the command.
    pub fn input_path(&self) -> &Path {
        match &self.command {
            Command::Analyze { input, .. }
            | Command::Sma { input, .. }
            | Command::Ema { input, .. }
            | Command::Rsi { input, .. }
            | Command::Macd { input, .. }
            | Command::Roc { input, .. }
            | Command::Bbwidth { input, .. }
            | Command::Atr { input, .. }
            | Command::Adx { input, .. }
            | Command::Patterns { input, .. }
            | Command::Gaps { input, .. }
            | Command::Trend { input, .. }
            | Command::Quote { input, .. } => input,
        }
    }

    /// Get the output options from the command.
    pub fn output(&self) -> &OutputArgs {
        match &self.command {
            Command::Analyze { out, .. }
            | Command::Sma { out, .. }
            | Command::Ema { out, .. }
            | Command::Rsi { out, .. }
            | Command::Macd { out, .. }
            | Command::Roc { out, .. }
            | Command::Bbwidth { out, .. }
            | Command::Atr { out, .. }
            | Command::Adx { out, .. }
            | Command::Patterns { out, .. }
            | Command::Gaps { out, .. }
            | Command::Trend { out, .. }
            | Command::Quote { out, .. } => out,
        }
    }
}

/// Direction rule for `adx --independent`.
#[must_use]
pub const fn directional_rule(independent: bool) -> DirectionalRule {
    if independent {
        DirectionalRule::Independent
    } else {
        DirectionalRule::Dominant
    }
}

/// Standard deviation kind for `bbwidth --population`.
#[must_use]
pub const fn std_dev_kind(population: bool) -> StdDevKind {
    if population {
        StdDevKind::Population
    } else {
        StdDevKind::Sample
    }
}

fn parse_field<F: FromStr>(part: &str, argument: &str, example: &str) -> Result<F> {
    part.trim().parse::<F>().map_err(|_| {
        CliError::invalid_argument(
            argument,
            format!("cannot parse '{}'", part.trim()),
            format!("Use a value like {example}"),
        )
    })
}

/// Parse MACD parameters from `"fast,slow,signal"`.
///
/// Period relationships are checked by the library.
pub fn parse_macd_params(params: &str) -> Result<(usize, usize, usize)> {
    let parts: Vec<&str> = params.split(',').collect();
    let [fast, slow, signal] = parts.as_slice() else {
        return Err(CliError::invalid_argument(
            "params",
            format!("MACD requires 3 parameters, got {}", parts.len()),
            "Use format: fast,slow,signal (e.g., 12,26,9)",
        ));
    };
    Ok((
        parse_field(fast, "fast_period", "12")?,
        parse_field(slow, "slow_period", "26")?,
        parse_field(signal, "signal_period", "9")?,
    ))
}

/// Parse Bollinger parameters from `"period,k"` or `"period,k_up,k_down"`.
pub fn parse_bollinger_params(params: &str) -> Result<(usize, f64, f64)> {
    let parts: Vec<&str> = params.split(',').collect();
    match parts.as_slice() {
        [period, k] => {
            let k = parse_field(k, "k", "2.0")?;
            Ok((parse_field(period, "period", "20")?, k, k))
        }
        [period, k_up, k_down] => Ok((
            parse_field(period, "period", "20")?,
            parse_field(k_up, "k_up", "2.0")?,
            parse_field(k_down, "k_down", "2.0")?,
        )),
        _ => Err(CliError::invalid_argument(
            "params",
            format!("Bollinger width requires 2 or 3 parameters, got {}", parts.len()),
            "Use format: period,k (e.g., 20,2.0) or period,k_up,k_down",
        )),
    }
}
