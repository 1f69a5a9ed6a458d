//! Integration tests for the public API.
//!
//! These tests exercise typical end-to-end usage: building a series,
//! configuring the engine, analyzing, and serializing the report.

#![allow(clippy::float_cmp)]
#![allow(clippy::cast_precision_loss)]

mod common;

use common::{approx_eq, daily_series, date, wave, EPSILON};
use stockta::prelude::*;

fn long_series() -> Series {
    daily_series(&wave(260))
}

// ==================== Basic Usage Tests ====================

#[test]
fn test_prelude_import_basic() {
    let prices = wave(40);
    let _sma = sma(&prices, 5).unwrap();
    let _ema = ema(&prices, 5).unwrap();
    let _rsi = rsi(&prices, 5).unwrap();
    let _roc = roc(&prices, 5).unwrap();
}

#[test]
fn test_config_builders_match_free_functions() {
    let series = long_series();
    let (h, l, c) = (series.high(), series.low(), series.close());

    let same = |a: &[f64], b: &[f64]| {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| approx_eq(*x, *y, EPSILON))
    };

    assert!(same(&Atr::new().compute(h, l, c).unwrap(), &atr(h, l, c, 14).unwrap()));
    assert!(same(&Rsi::new().compute(c).unwrap(), &rsi(c, 14).unwrap()));
    assert_eq!(Macd::new().compute(c).unwrap(), macd(c, 12, 26, 9).unwrap());
    let bands = Bollinger::new().compute(c).unwrap();
    let free = bollinger(c, 20, 2.0, 2.0, StdDevKind::Sample).unwrap();
    assert!(same(&bands.width, &free.width));
}

// ==================== Engine ====================

#[test]
fn test_engine_default_report() {
    let series = long_series();
    let engine = Engine::new(EngineConfig::default()).unwrap();
    let report = engine.analyze(&series).unwrap();

    assert_eq!(report.timestamps.len(), 260);
    assert_eq!(report.indicators.len(), 13);
    for (name, values) in report.indicators.iter() {
        assert_eq!(values.len(), 260, "{name} is misaligned");
    }

    let long_ma = report.indicators.get("Long MA").unwrap();
    assert!(long_ma[198].is_nan());
    assert!(!long_ma[199].is_nan());

    let adx = report.indicators.get("ADX").unwrap();
    assert!(adx[26].is_nan());
    assert!(!adx[27].is_nan());

    let rsi_values = report.indicators.get("RSI").unwrap();
    assert!(rsi_values[13].is_nan());
    assert!(rsi_values[14..].iter().all(|v| (0.0..=100.0).contains(v)));

    // daily bars: no gaps
    assert!(report.range_breaks.is_empty());

    let trend = report.trend.as_ref().unwrap();
    assert_eq!(trend.forecast.len(), 30);
    assert_eq!(trend.forecast_timestamps[0], date(2024, 1, 1) + chrono::Duration::days(260));

    assert!(report.price_change.is_some());
    assert_eq!(report.patterns.series().len(), Pattern::ALL.len());
}

#[test]
fn test_engine_rejects_short_series() {
    let series = daily_series(&wave(50));
    let engine = Engine::new(EngineConfig::default()).unwrap();
    match engine.analyze(&series) {
        Err(Error::InsufficientData {
            required,
            actual,
            indicator,
        }) => {
            assert_eq!(required, 200);
            assert_eq!(actual, 50);
            assert_eq!(indicator, "moving_averages");
        }
        other => panic!("expected InsufficientData, got {other:?}"),
    }
}

#[test]
fn test_engine_from_toml() {
    let config = EngineConfig::from_toml_str(
        r#"
        indicators = ["moving_averages", "dmi"]

        [moving_averages]
        short = 5
        medium = 10
        long = 20

        [dmi]
        period = 7

        [patterns]
        patterns = ["CDLDOJI"]
        drop_unmatched = true

        [trend]
        horizon = 3
        "#,
    )
    .unwrap();
    let engine = Engine::new(config).unwrap();
    let report = engine.analyze(&daily_series(&wave(30))).unwrap();

    assert_eq!(
        report.indicators.names().collect::<Vec<_>>(),
        vec!["Short MA", "Medium MA", "Long MA", "Plus DI", "Minus DI", "ADX"]
    );
    assert_eq!(report.trend.as_ref().unwrap().forecast.len(), 3);
    let compact = report.matched_patterns.as_ref().unwrap();
    assert_eq!(compact.series.len(), 1);
    assert_eq!(compact.series[0].pattern, Pattern::Doji);
    assert!(compact.series[0].values.iter().all(|v| *v == 100.0));
}

#[test]
fn test_weekday_series_reports_weekends() {
    // 2024-01-01 is a Monday; keep weekdays only
    let mut bars = Vec::new();
    let mut day = date(2024, 1, 1);
    let mut price = 100.0;
    while bars.len() < 40 {
        if chrono::Datelike::weekday(&day).number_from_monday() <= 5 {
            price += 0.5;
            bars.push(Bar::new(day, price - 0.2, price + 1.0, price - 1.0, price, 500.0));
        }
        day += chrono::Duration::days(1);
    }
    let series = Series::new(bars).unwrap();
    let mut config = EngineConfig::default().lenient();
    config.indicators = vec![IndicatorKind::Rsi];
    let report = Engine::new(config).unwrap().analyze(&series).unwrap();

    assert_eq!(report.range_breaks.len(), 7);
    for brk in &report.range_breaks {
        assert_eq!(chrono::Datelike::weekday(&brk.start), chrono::Weekday::Sat);
        assert_eq!(chrono::Datelike::weekday(&brk.end), chrono::Weekday::Mon);
    }
}

#[test]
fn test_report_serializes_to_json() {
    let engine = Engine::new(EngineConfig::default()).unwrap();
    let report = engine.analyze(&long_series()).unwrap();
    let json: serde_json::Value = serde_json::to_value(&report).unwrap();

    let rsi_json = &json["indicators"]["RSI"];
    assert!(rsi_json[0].is_null());
    assert!(rsi_json[20].is_number());
    assert!(json["timestamps"].as_array().unwrap().len() == 260);
    assert!(json["price_change"]["direction"].is_string());
    assert!(json.get("matched_patterns").is_none());
}

// ==================== Batch ====================

#[test]
fn test_analyze_batch_many_tickers() {
    let engine = Engine::new(EngineConfig::default()).unwrap();
    let tickers: Vec<Series> = (0..6_i32)
        .map(|k| {
            let close: Vec<f64> = wave(220).iter().map(|c| c + f64::from(k) * 10.0).collect();
            daily_series(&close)
        })
        .collect();
    let reports = analyze_batch(&engine, &tickers).unwrap();
    assert_eq!(reports.len(), 6);
    let first = reports[0].indicators.get("Short MA").unwrap()[100];
    let last = reports[5].indicators.get("Short MA").unwrap()[100];
    assert!((last - first - 50.0).abs() < 1e-9);
}
