//! Reference values worked out by hand.
//!
//! Each test pins an output to a literal value so that a change in
//! warm-up, seeding or rounding conventions shows up as a failure.

#![allow(clippy::float_cmp)]

mod common;

use chrono::Duration;
use common::{approx_eq, daily_series, date, verify_nan_prefix, EPSILON};
use stockta::gaps::detect_gaps;
use stockta::indicators::{
    atr, bollinger, ema, price_change, roc, rsi_with, sma, Direction, SmoothingPolicy,
    StdDevKind, TrendConfig,
};
use stockta::patterns::{recognize, Pattern, PatternRegistry};
use stockta::series::{Bar, Series};
use stockta::Error;

// ==================== Constant series ====================

#[test]
fn constant_series_conventions() {
    let n = 40;
    let close = vec![50.0; n];
    let high = vec![50.0; n];
    let low = vec![50.0; n];
    let open = vec![50.0; n];

    let atr_out = atr(&high, &low, &close, 14).unwrap();
    assert!(atr_out[13..].iter().all(|&v| v == 0.0));

    let bb = bollinger(&close, 20, 2.0, 2.0, StdDevKind::Sample).unwrap();
    assert!(verify_nan_prefix(&bb.width, 19));
    assert!(bb.width[19..].iter().all(|&v| v == 0.0));

    let roc_out = roc(&close, 12).unwrap();
    assert!(roc_out[12..].iter().all(|&v| v == 0.0));

    for policy in [SmoothingPolicy::Simple, SmoothingPolicy::Wilder] {
        let rsi_out = rsi_with(&close, 14, policy).unwrap();
        assert!(rsi_out.iter().all(|v| v.is_nan()));
    }

    let scan = recognize(
        &PatternRegistry::standard(),
        &Pattern::ALL,
        &open,
        &high,
        &low,
        &close,
    )
    .unwrap();
    for column in scan.series() {
        if column.pattern == Pattern::Doji {
            assert!(column.values.iter().all(|&v| v == 100.0));
        } else {
            assert_eq!(column.matches(), 0, "{} matched a flat bar", column.pattern);
        }
    }
}

// ==================== Moving averages ====================

#[test]
fn sma_reference() {
    let out = sma(&[2.0_f64, 4.0, 6.0, 8.0, 10.0], 3).unwrap();
    assert!(verify_nan_prefix(&out, 2));
    assert_eq!(&out[2..], &[4.0, 6.0, 8.0]);
}

#[test]
fn ema_seeded_with_first_value() {
    // alpha = 2 / (3 + 1) = 0.5
    let out = ema(&[10.0_f64, 20.0, 30.0], 3).unwrap();
    assert_eq!(out, vec![10.0, 15.0, 22.5]);
}

// ==================== RSI ====================

#[test]
fn rsi_simple_reference() {
    // deltas: +1, -0.5, +2, +1
    let close = [10.0_f64, 11.0, 10.5, 12.5, 13.5];
    let out = rsi_with(&close, 3, SmoothingPolicy::Simple).unwrap();
    assert!(verify_nan_prefix(&out, 3));
    // index 3: gains 1 + 0 + 2 = 3, losses 0.5 -> RS 6 -> 100 - 100/7
    assert!(approx_eq(out[3], 100.0 - 100.0 / 7.0, EPSILON));
    // index 4: gains 0 + 2 + 1 = 3, losses 0.5 -> same
    assert!(approx_eq(out[4], 100.0 - 100.0 / 7.0, EPSILON));
}

#[test]
fn rsi_all_gains_is_hundred() {
    let close: Vec<f64> = (0..20_i32).map(f64::from).collect();
    for policy in [SmoothingPolicy::Simple, SmoothingPolicy::Wilder] {
        let out = rsi_with(&close, 5, policy).unwrap();
        assert!(out[5..].iter().all(|&v| v == 100.0));
    }
}

// ==================== Patterns ====================

#[test]
fn engulfing_literal() {
    let scan = recognize(
        &PatternRegistry::standard(),
        &[Pattern::Engulfing],
        &[10.0, 10.2],
        &[12.0, 13.0],
        &[9.0, 10.0],
        &[10.5, 12.0],
    )
    .unwrap();
    let events = scan.events(None);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].index, 1);
    assert_eq!(events[0].pattern, Pattern::Engulfing);
    assert_eq!(events[0].strength, 100);
}

// ==================== Trend ====================

#[test]
fn regression_on_one_to_five() {
    let projection = TrendConfig::new()
        .horizon(2)
        .project(&[1.0, 2.0, 3.0, 4.0, 5.0], None)
        .unwrap();
    assert!(approx_eq(projection.slope, 1.0, EPSILON));
    assert!(approx_eq(projection.intercept, 1.0, EPSILON));
    assert!(approx_eq(projection.forecast[0], 6.0, EPSILON));
    assert!(approx_eq(projection.forecast[1], 7.0, EPSILON));
}

#[test]
fn trend_forecast_steps_by_last_interval() {
    let series = daily_series(&[1.0, 2.0, 3.0, 4.0]);
    let projection = TrendConfig::new()
        .horizon(3)
        .project(series.close(), Some(series.timestamps()))
        .unwrap();
    assert_eq!(
        projection.forecast_timestamps,
        vec![date(2024, 1, 5), date(2024, 1, 6), date(2024, 1, 7)]
    );
}

// ==================== Gaps ====================

#[test]
fn friday_to_monday_gap() {
    let friday = date(2024, 5, 3);
    let monday = date(2024, 5, 6);
    let ts = vec![friday - Duration::days(1), friday, monday, monday + Duration::days(1)];
    let breaks = detect_gaps(&ts);
    assert_eq!(breaks.len(), 1);
    assert_eq!(breaks[0].start, date(2024, 5, 4));
    assert_eq!(breaks[0].end, monday);
}

// ==================== Price change ====================

#[test]
fn price_change_reference() {
    let quote = price_change(&[100.0, 98.0, 99.0]).unwrap();
    assert_eq!(quote.previous_close, 98.0);
    assert_eq!(quote.last_close, 99.0);
    assert!(approx_eq(quote.change, 1.0, EPSILON));
    assert!(approx_eq(quote.percent, 100.0 / 98.0, EPSILON));
    assert_eq!(quote.direction, Direction::Up);

    assert!(matches!(price_change(&[5.0]), Err(Error::InsufficientData { .. })));
    assert!(matches!(price_change(&[0.0, 1.0]), Err(Error::DivisionByZero { .. })));
}

// ==================== Series invariants ====================

#[test]
fn series_rejects_out_of_order_bars() {
    let bar = |d, c: f64| Bar::new(date(2024, 1, d), c, c + 1.0, c - 1.0, c, 0.0);
    let err = Series::new(vec![bar(2, 10.0), bar(1, 11.0)]).unwrap_err();
    assert!(matches!(err, Error::InvalidSeries { index: 1, .. }));

    let bad_high = Bar::new(date(2024, 1, 3), 10.0, 9.0, 8.0, 9.5, 0.0);
    assert!(matches!(
        Series::new(vec![bar(1, 10.0), bad_high]),
        Err(Error::InvalidSeries { index: 1, .. })
    ));
}
