//! Candle geometry shared by the pattern detectors.
//!
//! Shadows are measured from the body edge, so they are never negative:
//! `upper = high - max(open, close)`, `lower = min(open, close) - low`.

/// Strength reported for a bullish (or neutral) detection.
pub const PATTERN_BULLISH: i32 = 100;

/// Strength reported for a bearish detection.
pub const PATTERN_BEARISH: i32 = -100;

/// Body-to-range ratio at or below which a candle is a doji.
pub const DOJI_BODY_RATIO: f64 = 0.1;

/// Minimum shadow-to-body ratio of the long shadow in hammer-type candles.
pub const LONG_SHADOW_RATIO: f64 = 2.0;

/// One OHLC candle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    /// Opening price.
    pub open: f64,
    /// High price.
    pub high: f64,
    /// Low price.
    pub low: f64,
    /// Closing price.
    pub close: f64,
}

impl Candle {
    /// Creates a candle.
    #[must_use]
    pub const fn new(open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            open,
            high,
            low,
            close,
        }
    }

    /// Absolute open-to-close distance.
    #[inline]
    #[must_use]
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// Wick above the body.
    #[inline]
    #[must_use]
    pub fn upper_shadow(&self) -> f64 {
        self.high - self.body_top()
    }

    /// Wick below the body.
    #[inline]
    #[must_use]
    pub fn lower_shadow(&self) -> f64 {
        self.body_bottom() - self.low
    }

    /// High-low range.
    #[inline]
    #[must_use]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Higher of open and close.
    #[inline]
    #[must_use]
    pub fn body_top(&self) -> f64 {
        self.open.max(self.close)
    }

    /// Lower of open and close.
    #[inline]
    #[must_use]
    pub fn body_bottom(&self) -> f64 {
        self.open.min(self.close)
    }

    /// Close above open.
    #[inline]
    #[must_use]
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Close below open.
    #[inline]
    #[must_use]
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }
}
