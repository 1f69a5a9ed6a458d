//! Command execution: load the input, call the library, write the result.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use stockta::config::EngineConfig;
use stockta::engine::{AnalysisReport, Engine};
use stockta::gaps::detect_gaps_with;
use stockta::indicators::{
    ema, period_return, price_change, roc, sma_with, Atr, Bollinger, Direction, Dmi, Macd,
    MinPeriods, PeriodReturn, PriceChange, Rsi, SmoothingPolicy, TrendConfig,
};
use stockta::patterns::{Pattern, PatternRegistry, PatternScanner};
use stockta::series::Series;
use tracing::{debug, info};

use crate::args::{
    directional_rule, parse_bollinger_params, parse_macd_params, std_dev_kind, Args, Command,
    OutputFormat,
};
use crate::csv_parser::{parse_series, PriceColumns};
use crate::csv_writer::{
    format_timestamp, write_json, write_records, write_table, OutputDest, Table,
};
use crate::error::{CliError, Result};

/// Runs the parsed command line.
///
/// # Errors
///
/// Any failure while reading input, computing, or writing output.
pub fn run(args: &Args) -> Result<()> {
    let out = args.output();
    let dest = OutputDest::from_option(out.output.as_deref());
    let format = out.format;
    debug!(command = ?args.command, "running");

    match &args.command {
        Command::Analyze {
            input,
            config,
            horizon,
            drop_unmatched,
            lenient,
            ..
        } => {
            let config = engine_config(config.as_deref(), *horizon, *drop_unmatched, *lenient)?;
            let series = parse_series(input, PriceColumns::Ohlc)?;
            let report = Engine::new(config)?.analyze(&series)?;
            log_summary(&report);
            match format {
                OutputFormat::Json => write_json(&report, &dest),
                OutputFormat::Csv => write_table(&report_table(&report), &dest),
            }
        }
        Command::Sma {
            input,
            window,
            lenient,
            ..
        } => {
            let series = parse_series(input, PriceColumns::Close)?;
            let min_periods = if *lenient {
                MinPeriods::Lenient
            } else {
                MinPeriods::Strict
            };
            let values = sma_with(series.close(), *window, min_periods)?;
            emit(table(&series).with(format!("sma_{window}"), values), format, &dest)
        }
        Command::Ema { input, span, .. } => {
            let series = parse_series(input, PriceColumns::Close)?;
            let values = ema(series.close(), *span)?;
            emit(table(&series).with(format!("ema_{span}"), values), format, &dest)
        }
        Command::Rsi {
            input,
            period,
            smoothing,
            ..
        } => {
            let series = parse_series(input, PriceColumns::Close)?;
            let values = Rsi::new()
                .period(*period)
                .smoothing(SmoothingPolicy::from(*smoothing))
                .compute(series.close())?;
            emit(table(&series).with(format!("rsi_{period}"), values), format, &dest)
        }
        Command::Macd { input, params, .. } => {
            let (fast, slow, signal) = parse_macd_params(params)?;
            let series = parse_series(input, PriceColumns::Close)?;
            let out = Macd::new()
                .fast_period(fast)
                .slow_period(slow)
                .signal_period(signal)
                .compute(series.close())?;
            let table = table(&series)
                .with("macd", out.macd_line)
                .with("signal", out.signal_line)
                .with("histogram", out.histogram);
            emit(table, format, &dest)
        }
        Command::Roc { input, period, .. } => {
            let series = parse_series(input, PriceColumns::Close)?;
            let values = roc(series.close(), *period)?;
            emit(table(&series).with(format!("roc_{period}"), values), format, &dest)
        }
        Command::Bbwidth {
            input,
            params,
            population,
            ..
        } => {
            let (period, k_up, k_down) = parse_bollinger_params(params)?;
            let series = parse_series(input, PriceColumns::Close)?;
            let out = Bollinger::new()
                .period(period)
                .k_up(k_up)
                .k_down(k_down)
                .std_dev_kind(std_dev_kind(*population))
                .compute(series.close())?;
            let table = table(&series)
                .with("upper", out.upper)
                .with("middle", out.middle)
                .with("lower", out.lower)
                .with("bb_width", out.width);
            emit(table, format, &dest)
        }
        Command::Atr {
            input,
            period,
            smoothing,
            ..
        } => {
            let series = parse_series(input, PriceColumns::Ohlc)?;
            let values = Atr::new()
                .period(*period)
                .smoothing(SmoothingPolicy::from(*smoothing))
                .compute(series.high(), series.low(), series.close())?;
            emit(table(&series).with(format!("atr_{period}"), values), format, &dest)
        }
        Command::Adx {
            input,
            period,
            independent,
            ..
        } => {
            let series = parse_series(input, PriceColumns::Ohlc)?;
            let out = Dmi::new()
                .period(*period)
                .rule(directional_rule(*independent))
                .compute(series.high(), series.low(), series.close())?;
            let table = table(&series)
                .with("plus_di", out.plus_di)
                .with("minus_di", out.minus_di)
                .with("adx", out.adx);
            emit(table, format, &dest)
        }
        Command::Patterns {
            input,
            only,
            drop_unmatched,
            list,
            ..
        } => {
            if *list {
                return write_catalog(format, &dest);
            }
            let series = parse_series(input, PriceColumns::Ohlc)?;
            patterns(&series, only, *drop_unmatched, format, &dest)
        }
        Command::Gaps {
            input,
            threshold_hours,
            ..
        } => {
            let series = parse_series(input, PriceColumns::Close)?;
            let breaks = detect_gaps_with(series.timestamps(), Duration::hours(*threshold_hours))?;
            info!(gaps = breaks.len(), "detected calendar gaps");
            match format {
                OutputFormat::Json => write_json(&breaks, &dest),
                OutputFormat::Csv => {
                    let rows: Vec<GapRow> = breaks
                        .iter()
                        .map(|b| GapRow {
                            start: format_timestamp(&b.start),
                            end: format_timestamp(&b.end),
                        })
                        .collect();
                    write_records(&rows, &dest)
                }
            }
        }
        Command::Trend { input, horizon, .. } => {
            let series = parse_series(input, PriceColumns::Close)?;
            trend(&series, *horizon, format, &dest)
        }
        Command::Quote { input, .. } => {
            let series = parse_series(input, PriceColumns::Close)?;
            quote(&series, format, &dest)
        }
    }
}

/// Loads the engine configuration and applies command-line overrides.
pub fn engine_config(
    path: Option<&Path>,
    horizon: Option<usize>,
    drop_unmatched: bool,
    lenient: bool,
) -> Result<EngineConfig> {
    let mut config = match path {
        Some(path) => {
            info!(path = %path.display(), "loading engine config");
            EngineConfig::load(path)?
        }
        None => EngineConfig::default(),
    };
    if let Some(horizon) = horizon {
        config.trend.projection = config.trend.projection.horizon(horizon);
    }
    if drop_unmatched {
        config.patterns = config.patterns.clone().drop_unmatched(true);
    }
    if lenient {
        config = config.lenient();
    }
    Ok(config)
}

fn table(series: &Series) -> Table {
    Table::new(series.timestamps().to_vec())
}

fn emit(table: Table, format: OutputFormat, dest: &OutputDest) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(&table, dest),
        OutputFormat::Csv => write_table(&table, dest),
    }
}

fn log_summary(report: &AnalysisReport) {
    if let Some(quote) = &report.price_change {
        info!(
            last = quote.last_close,
            change = quote.change,
            percent = quote.percent,
            direction = ?quote.direction,
            "price change"
        );
    }
    if let Some(ret) = &report.period_return {
        info!(
            first = ret.first_close,
            last = ret.last_close,
            percent = ret.percent,
            direction = ?ret.direction,
            "period return"
        );
    }
    if let Some(trend) = &report.trend {
        info!(slope = trend.slope, intercept = trend.intercept, "trend");
    }
    info!(gaps = report.range_breaks.len(), "calendar gaps");
}

/// Flattens a report into one CSV table: indicator columns, then pattern
/// columns by key, then the fitted trend and its envelope.
pub fn report_table(report: &AnalysisReport) -> Table {
    let mut table = Table::new(report.timestamps.clone());
    for (name, values) in report.indicators.iter() {
        table.push(name, values.to_vec());
    }
    for column in report.patterns.series() {
        table.push(column.pattern.key(), column.values.clone());
    }
    if let Some(trend) = &report.trend {
        table.push("trend", trend.fitted.clone());
        table.push("trend_upper", trend.upper.clone());
        table.push("trend_lower", trend.lower.clone());
    }
    table
}

fn patterns(
    series: &Series,
    only: &[String],
    drop_unmatched: bool,
    format: OutputFormat,
    dest: &OutputDest,
) -> Result<()> {
    let registry = PatternRegistry::standard();
    let mut scanner = PatternScanner::new().drop_unmatched(drop_unmatched);
    if !only.is_empty() {
        let selected = only
            .iter()
            .map(|name| name.parse::<Pattern>())
            .collect::<stockta::Result<Vec<_>>>()?;
        scanner = scanner.patterns(selected);
    }
    let scan = scanner.scan(&registry, series)?;
    let timestamps = series.timestamps();

    if format == OutputFormat::Json {
        let events = scan.events(Some(timestamps));
        info!(events = events.len(), "pattern detections");
        return write_json(&events, dest);
    }

    let table = if drop_unmatched {
        let compact = scan.drop_unmatched_rows();
        let dates = compact.indices.iter().map(|&i| timestamps[i]).collect();
        compact
            .series
            .into_iter()
            .fold(Table::new(dates), |t, column| t.with(column.pattern.key(), column.values))
    } else {
        scan.series()
            .iter()
            .fold(table(series), |t, column| t.with(column.pattern.key(), column.values.clone()))
    };
    write_table(&table, dest)
}

#[derive(Serialize)]
struct CatalogRow {
    key: &'static str,
    id: &'static str,
    name: &'static str,
    description: &'static str,
}

fn write_catalog(format: OutputFormat, dest: &OutputDest) -> Result<()> {
    let rows: Vec<CatalogRow> = PatternRegistry::standard()
        .iter()
        .map(|def| CatalogRow {
            key: def.pattern.key(),
            id: def.pattern.id(),
            name: def.pattern.name(),
            description: def.description,
        })
        .collect();
    match format {
        OutputFormat::Json => write_json(&rows, dest),
        OutputFormat::Csv => write_records(&rows, dest),
    }
}

#[derive(Serialize)]
struct Quote {
    price_change: PriceChange,
    period_return: PeriodReturn,
}

#[derive(Serialize)]
struct QuoteRow {
    measure: &'static str,
    reference_close: f64,
    last_close: f64,
    change: f64,
    percent: Option<f64>,
    direction: Direction,
}

fn quote(series: &Series, format: OutputFormat, dest: &OutputDest) -> Result<()> {
    let summary = Quote {
        price_change: price_change(series.close())?,
        period_return: period_return(series.close())?,
    };
    info!(
        change = summary.price_change.percent,
        period = summary.period_return.percent,
        "quote"
    );
    if format == OutputFormat::Json {
        return write_json(&summary, dest);
    }

    let Quote {
        price_change: last,
        period_return: span,
    } = summary;
    let rows = [
        QuoteRow {
            measure: "last_bar",
            reference_close: last.previous_close,
            last_close: last.last_close,
            change: last.change,
            percent: Some(last.percent),
            direction: last.direction,
        },
        QuoteRow {
            measure: "period",
            reference_close: span.first_close,
            last_close: span.last_close,
            change: span.change,
            percent: span.percent.is_finite().then_some(span.percent),
            direction: span.direction,
        },
    ];
    write_records(&rows, dest)
}

#[derive(Serialize)]
struct GapRow {
    start: String,
    end: String,
}

fn trend(series: &Series, horizon: usize, format: OutputFormat, dest: &OutputDest) -> Result<()> {
    if horizon == 0 {
        return Err(CliError::invalid_argument(
            "horizon",
            "must be at least 1",
            "Use a positive integer like 30",
        ));
    }
    let projection = TrendConfig::new()
        .horizon(horizon)
        .project(series.close(), Some(series.timestamps()))?;
    info!(
        slope = projection.slope,
        intercept = projection.intercept,
        horizon,
        "trend projection"
    );
    if format == OutputFormat::Json {
        return write_json(&projection, dest);
    }

    let dates: Vec<DateTime<Utc>> = series
        .timestamps()
        .iter()
        .chain(&projection.forecast_timestamps)
        .copied()
        .collect();
    let joined = |history: &[f64], forecast: &[f64]| -> Vec<f64> {
        history.iter().chain(forecast).copied().collect()
    };
    let table = Table::new(dates)
        .with("close", series.close().to_vec())
        .with("trend", joined(&projection.fitted, &projection.forecast))
        .with("upper", joined(&projection.upper, &projection.forecast_upper))
        .with("lower", joined(&projection.lower, &projection.forecast_lower));
    write_table(&table, dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use stockta::series::Bar;

    fn series(n: usize) -> Series {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Series::new((0..n).map(|i| {
            let c = 100.0 + (i as f64 * 0.3).sin() * 5.0;
            Bar::new(start + Duration::days(i as i64), c, c + 1.0, c - 1.0, c, 10.0)
        }))
        .unwrap()
    }

    #[test]
    fn test_engine_config_overrides() {
        let config = engine_config(None, Some(5), true, true).unwrap();
        assert_eq!(config.trend.projection.get_horizon(), 5);
        assert!(config.patterns.drops_unmatched());
        assert_eq!(config.moving_averages, EngineConfig::default().lenient().moving_averages);
    }

    #[test]
    fn test_engine_config_missing_file() {
        let err = engine_config(Some(Path::new("/nonexistent/engine.toml")), None, false, false)
            .unwrap_err();
        assert!(matches!(err, CliError::Indicator(stockta::Error::Config { .. })));
    }

    #[test]
    fn test_report_table_columns() {
        let config = engine_config(None, None, false, true).unwrap();
        let report = Engine::new(config).unwrap().analyze(&series(60)).unwrap();
        let table = report_table(&report);
        let names: Vec<&str> = table.names().collect();
        assert_eq!(table.len(), 60);
        assert_eq!(names[0], "Short MA");
        assert!(names.contains(&"CDLENGULFING"));
        assert_eq!(names.last(), Some(&"trend_lower"));
    }

    #[test]
    fn test_quote_rows() {
        let path = std::env::temp_dir().join(format!("stockta-quote-{}.csv", std::process::id()));
        let s = series(20);
        quote(&s, OutputFormat::Csv, &OutputDest::File(path.clone())).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "measure,reference_close,last_close,change,percent,direction");
        assert!(lines[1].starts_with("last_bar,"));
        assert!(lines[2].starts_with("period,"));
        let period: Vec<&str> = lines[2].split(',').collect();
        let percent: f64 = period[4].parse().unwrap();
        let expected = (s.close()[19] - s.close()[0]) / s.close()[0] * 100.0;
        assert!((percent - expected).abs() < 1e-9);
        std::fs::remove_file(&path).ok();
    }
}
