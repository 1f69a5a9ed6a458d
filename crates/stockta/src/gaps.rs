//! Calendar gap detection.
//!
//! Trading series skip weekends, holidays and overnight sessions. A chart
//! that plots bars on a continuous time axis needs to know which intervals
//! to collapse; [`detect_gaps`] reports them as [`RangeBreak`]s. Gaps carry
//! no indicator semantics.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::error::{Error, Result};

/// A half-open `[start, end)` interval with no bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RangeBreak {
    /// First missing instant.
    pub start: DateTime<Utc>,
    /// Timestamp of the bar that ends the gap.
    pub end: DateTime<Utc>,
}

/// Reports every gap between adjacent bars longer than one calendar day.
///
/// For a gap between `prev` and `curr` the break spans
/// `[prev + 1 day, curr)`.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use stockta::gaps::detect_gaps;
///
/// let friday = Utc.with_ymd_and_hms(2024, 5, 3, 0, 0, 0).unwrap();
/// let monday = Utc.with_ymd_and_hms(2024, 5, 6, 0, 0, 0).unwrap();
///
/// let breaks = detect_gaps(&[friday, monday]);
/// assert_eq!(breaks.len(), 1);
/// assert_eq!(breaks[0].start, Utc.with_ymd_and_hms(2024, 5, 4, 0, 0, 0).unwrap());
/// assert_eq!(breaks[0].end, monday);
/// ```
#[must_use]
pub fn detect_gaps(timestamps: &[DateTime<Utc>]) -> Vec<RangeBreak> {
    scan(timestamps, Duration::days(1))
}

/// Reports gaps longer than `threshold`; each break starts `threshold` after
/// the earlier bar.
///
/// # Errors
///
/// Returns `Error::InvalidConfiguration` if `threshold` is not positive.
pub fn detect_gaps_with(
    timestamps: &[DateTime<Utc>],
    threshold: Duration,
) -> Result<Vec<RangeBreak>> {
    if threshold <= Duration::zero() {
        return Err(Error::invalid_config("gaps.threshold", "must be positive"));
    }
    Ok(scan(timestamps, threshold))
}

fn scan(timestamps: &[DateTime<Utc>], threshold: Duration) -> Vec<RangeBreak> {
    timestamps
        .windows(2)
        .filter(|pair| pair[1] - pair[0] > threshold)
        .map(|pair| RangeBreak {
            start: pair[0] + threshold,
            end: pair[1],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_weekday_series_breaks_on_weekends() {
        // Mon 2024-05-06 .. Fri 2024-05-17, weekdays only
        let ts: Vec<_> = (6..=17)
            .map(|d| date(2024, 5, d))
            .filter(|t| chrono::Datelike::weekday(t).number_from_monday() <= 5)
            .collect();
        let breaks = detect_gaps(&ts);
        assert_eq!(breaks.len(), 1);
        assert_eq!(breaks[0].start, date(2024, 5, 11));
        assert_eq!(breaks[0].end, date(2024, 5, 13));
    }

    #[test]
    fn test_consecutive_days_no_break() {
        let ts: Vec<_> = (1..=5).map(|d| date(2024, 1, d)).collect();
        assert!(detect_gaps(&ts).is_empty());
    }

    #[test]
    fn test_intraday_no_break() {
        let start = date(2024, 1, 2);
        let ts: Vec<_> = (0..48).map(|h| start + Duration::minutes(30 * h)).collect();
        assert!(detect_gaps(&ts).is_empty());
    }

    #[test]
    fn test_holiday_gap() {
        let ts = vec![date(2024, 12, 24), date(2024, 12, 26)];
        let breaks = detect_gaps(&ts);
        assert_eq!(breaks, vec![RangeBreak { start: date(2024, 12, 25), end: date(2024, 12, 26) }]);
    }

    #[test]
    fn test_custom_threshold() {
        let start = date(2024, 1, 2);
        let ts = vec![start, start + Duration::hours(1), start + Duration::hours(5)];
        let breaks = detect_gaps_with(&ts, Duration::hours(1)).unwrap();
        assert_eq!(breaks.len(), 1);
        assert_eq!(breaks[0].start, start + Duration::hours(2));
        assert!(detect_gaps_with(&ts, Duration::zero()).is_err());
    }

    #[test]
    fn test_short_inputs() {
        assert!(detect_gaps(&[]).is_empty());
        assert!(detect_gaps(&[date(2024, 1, 1)]).is_empty());
    }
}
