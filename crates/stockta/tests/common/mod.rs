//! Shared test utilities for stockta tests.

use chrono::{DateTime, Duration, TimeZone, Utc};
use stockta::series::{Bar, Series};

/// Approximate equality check; two NaN values compare equal.
#[allow(dead_code)]
pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
    if a.is_nan() && b.is_nan() {
        return true;
    }
    if a.is_nan() || b.is_nan() {
        return false;
    }
    (a - b).abs() < eps
}

/// Standard epsilon for high-precision comparisons.
#[allow(dead_code)]
pub const EPSILON: f64 = 1e-10;

/// Looser epsilon for comparisons involving accumulated floating-point operations.
#[allow(dead_code)]
pub const LOOSE_EPSILON: f64 = 1e-6;

/// Verify that the first `n` values are NaN and the rest are not.
#[allow(dead_code)]
pub fn verify_nan_prefix(data: &[f64], expected_nan_count: usize) -> bool {
    data.iter()
        .enumerate()
        .all(|(i, v)| v.is_nan() == (i < expected_nan_count))
}

/// Midnight UTC on the given day.
#[allow(dead_code)]
pub fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

/// Daily bars starting 2024-01-01 with the given closes; open is the
/// previous close and the range extends one unit around the body.
#[allow(dead_code)]
pub fn daily_series(close: &[f64]) -> Series {
    let start = date(2024, 1, 1);
    Series::new(close.iter().enumerate().map(|(i, &c)| {
        let open = if i == 0 { c } else { close[i - 1] };
        Bar::new(
            start + Duration::days(i as i64),
            open,
            open.max(c) + 1.0,
            open.min(c) - 1.0,
            c,
            1_000.0,
        )
    }))
    .unwrap()
}

/// Deterministic oscillating close prices.
#[allow(dead_code)]
pub fn wave(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 100.0 + (i as f64 * 0.17).sin() * 8.0 + (i as f64 * 0.05).cos() * 3.0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approx_eq_nan() {
        assert!(approx_eq(f64::NAN, f64::NAN, EPSILON));
        assert!(!approx_eq(f64::NAN, 1.0, EPSILON));
    }

    #[test]
    fn test_verify_nan_prefix() {
        let data = vec![f64::NAN, f64::NAN, 1.0, 2.0, 3.0];
        assert!(verify_nan_prefix(&data, 2));
        assert!(!verify_nan_prefix(&data, 3));
    }

    #[test]
    fn test_daily_series_is_valid() {
        let series = daily_series(&wave(30));
        assert_eq!(series.len(), 30);
    }
}
