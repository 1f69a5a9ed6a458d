//! Candlestick pattern recognition.
//!
//! Detections are signed strengths: `100` for a bullish (or neutral)
//! pattern, `-100` for a bearish one, NaN where nothing matched.
//!
//! # Patterns
//!
//! | Pattern | Key | Bars | Strength |
//! |---------|-----|------|----------|
//! | Doji | `CDLDOJI` | 1 | +100 |
//! | Engulfing | `CDLENGULFING` | 2 | ±100 |
//! | Hammer | `CDLHAMMER` | 1 | +100 |
//! | Hanging man | `CDLHANGINGMAN` | 1 | −100 |
//! | Harami | `CDLHARAMI` | 2 | ±100 |
//! | Inverted hammer | `CDLINVERTEDHAMMER` | 1 | +100 |
//! | Shooting star | `CDLSHOOTINGSTAR` | 1 | −100 |

pub mod catalog;
pub mod detectors;
pub mod scan;
pub mod shape;

pub use catalog::{Pattern, PatternDefinition, PatternRegistry};
pub use detectors::Detector;
pub use scan::{
    recognize, CompactPatternScan, PatternEvent, PatternScan, PatternScanner, PatternSeries,
};
pub use shape::{Candle, PATTERN_BEARISH, PATTERN_BULLISH};
