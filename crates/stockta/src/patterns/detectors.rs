//! Per-bar pattern detectors.
//!
//! Every detector has the [`Detector`] signature: it sees the current candle
//! and, for two-bar patterns, the previous one. It returns the signed
//! strength of a match or `None`. Two-bar detectors never match at bar 0.
//! Candles with undefined prices never match.

use super::shape::{
    Candle, DOJI_BODY_RATIO, LONG_SHADOW_RATIO, PATTERN_BEARISH, PATTERN_BULLISH,
};

/// Signature shared by every detector in the catalog.
pub type Detector = fn(prev: Option<&Candle>, curr: &Candle) -> Option<i32>;

/// Doji: body at most 10% of the range. A zero-range candle with no body is a doji.
pub fn doji(_prev: Option<&Candle>, curr: &Candle) -> Option<i32> {
    let body = curr.body();
    let range = curr.range();
    let matched = if range <= 0.0 {
        body <= 0.0
    } else {
        body <= DOJI_BODY_RATIO * range
    };
    matched.then_some(PATTERN_BULLISH)
}

/// Engulfing: the current body opens beyond the previous close and closes
/// beyond the previous open, in the direction of the current candle.
pub fn engulfing(prev: Option<&Candle>, curr: &Candle) -> Option<i32> {
    let prev = prev?;
    if curr.is_bullish() && curr.open < prev.close && curr.close > prev.open {
        Some(PATTERN_BULLISH)
    } else if curr.is_bearish() && curr.open > prev.close && curr.close < prev.open {
        Some(PATTERN_BEARISH)
    } else {
        None
    }
}

fn hammer_shape(curr: &Candle) -> bool {
    let body = curr.body();
    curr.lower_shadow() > LONG_SHADOW_RATIO * body && curr.upper_shadow() < body
}

fn inverted_hammer_shape(curr: &Candle) -> bool {
    let body = curr.body();
    curr.upper_shadow() > LONG_SHADOW_RATIO * body && curr.lower_shadow() < body
}

/// Hammer: long lower shadow, short upper shadow.
pub fn hammer(_prev: Option<&Candle>, curr: &Candle) -> Option<i32> {
    hammer_shape(curr).then_some(PATTERN_BULLISH)
}

/// Hanging man: hammer shape on a bearish candle.
pub fn hanging_man(_prev: Option<&Candle>, curr: &Candle) -> Option<i32> {
    (hammer_shape(curr) && curr.is_bearish()).then_some(PATTERN_BEARISH)
}

/// Inverted hammer: long upper shadow, short lower shadow.
pub fn inverted_hammer(_prev: Option<&Candle>, curr: &Candle) -> Option<i32> {
    inverted_hammer_shape(curr).then_some(PATTERN_BULLISH)
}

/// Shooting star: inverted hammer shape on a bearish candle.
pub fn shooting_star(_prev: Option<&Candle>, curr: &Candle) -> Option<i32> {
    (inverted_hammer_shape(curr) && curr.is_bearish()).then_some(PATTERN_BEARISH)
}

/// Harami: a smaller body of the opposite color inside the previous body.
pub fn harami(prev: Option<&Candle>, curr: &Candle) -> Option<i32> {
    let prev = prev?;
    if curr.body() >= prev.body() {
        return None;
    }
    if prev.is_bearish() && curr.is_bullish() && curr.open > prev.close && curr.close < prev.open
    {
        Some(PATTERN_BULLISH)
    } else if prev.is_bullish()
        && curr.is_bearish()
        && curr.open < prev.close
        && curr.close > prev.open
    {
        Some(PATTERN_BEARISH)
    } else {
        None
    }
}
