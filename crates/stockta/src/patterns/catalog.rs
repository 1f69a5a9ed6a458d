//! The candlestick pattern catalog.
//!
//! [`Pattern`] enumerates the recognized patterns. [`PatternRegistry`] maps
//! each one to its [`PatternDefinition`]: lookup key, display name,
//! human-readable description and detector. The registry is built once and
//! shared by reference; it is never mutated after construction.
//!
//! Patterns can be looked up by their TA-Lib style key (`CDLENGULFING`),
//! display name (`Engulfing Pattern`) or snake-case name (`engulfing`),
//! case-insensitively. Anything else is [`Error::UnknownPattern`].
//!
//! # Example
//!
//! ```
//! use stockta::patterns::{Pattern, PatternRegistry};
//!
//! let registry = PatternRegistry::standard();
//! let def = registry.lookup("CDLHAMMER").unwrap();
//! assert_eq!(def.pattern, Pattern::Hammer);
//! assert!(registry.lookup("CDLXYZ").is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::detectors::{
    doji, engulfing, hammer, hanging_man, harami, inverted_hammer, shooting_star, Detector,
};
use crate::error::{Error, Result};

/// A recognized candlestick pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Pattern {
    /// Open and close nearly equal.
    Doji,
    /// Body engulfs the previous body.
    Engulfing,
    /// Long lower shadow, small body near the top.
    Hammer,
    /// Bearish candle with a hammer shape.
    HangingMan,
    /// Small body inside the previous body.
    Harami,
    /// Long upper shadow, small body near the bottom.
    InvertedHammer,
    /// Bearish candle with an inverted hammer shape.
    ShootingStar,
}

impl Pattern {
    /// Every pattern, in catalog order.
    pub const ALL: [Self; 7] = [
        Self::Doji,
        Self::Engulfing,
        Self::Hammer,
        Self::HangingMan,
        Self::Harami,
        Self::InvertedHammer,
        Self::ShootingStar,
    ];

    /// TA-Lib style key, e.g. `CDLDOJI`.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Doji => "CDLDOJI",
            Self::Engulfing => "CDLENGULFING",
            Self::Hammer => "CDLHAMMER",
            Self::HangingMan => "CDLHANGINGMAN",
            Self::Harami => "CDLHARAMI",
            Self::InvertedHammer => "CDLINVERTEDHAMMER",
            Self::ShootingStar => "CDLSHOOTINGSTAR",
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Doji => "Doji",
            Self::Engulfing => "Engulfing Pattern",
            Self::Hammer => "Hammer",
            Self::HangingMan => "Hanging Man",
            Self::Harami => "Harami Pattern",
            Self::InvertedHammer => "Inverted Hammer",
            Self::ShootingStar => "Shooting Star",
        }
    }

    /// Snake-case identifier used in configuration files.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Doji => "doji",
            Self::Engulfing => "engulfing",
            Self::Hammer => "hammer",
            Self::HangingMan => "hanging_man",
            Self::Harami => "harami",
            Self::InvertedHammer => "inverted_hammer",
            Self::ShootingStar => "shooting_star",
        }
    }

    /// Whether the pattern compares against the previous bar.
    #[must_use]
    pub const fn is_two_bar(self) -> bool {
        matches!(self, Self::Engulfing | Self::Harami)
    }

    const fn position(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Pattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| {
                needle.eq_ignore_ascii_case(p.key())
                    || needle.eq_ignore_ascii_case(p.name())
                    || needle.eq_ignore_ascii_case(p.id())
            })
            .ok_or_else(|| Error::UnknownPattern {
                name: needle.to_string(),
            })
    }
}

impl TryFrom<String> for Pattern {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Pattern> for String {
    fn from(pattern: Pattern) -> Self {
        pattern.id().to_string()
    }
}

/// Static metadata and detector for one pattern.
#[derive(Clone, Copy)]
pub struct PatternDefinition {
    /// The pattern this entry describes.
    pub pattern: Pattern,
    /// Human-readable explanation shown next to detections.
    pub description: &'static str,
    /// Per-bar detector.
    pub detector: Detector,
}

impl PatternDefinition {
    /// TA-Lib style key.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        self.pattern.key()
    }

    /// Display name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.pattern.name()
    }
}

impl fmt::Debug for PatternDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternDefinition")
            .field("pattern", &self.pattern)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

const STANDARD_DEFINITIONS: [PatternDefinition; 7] = [
    PatternDefinition {
        pattern: Pattern::Doji,
        description: "Open and close are almost equal: indecision between buyers and sellers, \
                      often near a turning point.",
        detector: doji,
    },
    PatternDefinition {
        pattern: Pattern::Engulfing,
        description: "The body opens beyond the previous close and closes beyond the previous \
                      open: a reversal in the direction of the engulfing candle.",
        detector: engulfing,
    },
    PatternDefinition {
        pattern: Pattern::Hammer,
        description: "Small body with a long lower shadow: sellers pushed price down but buyers \
                      recovered it, a bullish reversal after a decline.",
        detector: hammer,
    },
    PatternDefinition {
        pattern: Pattern::HangingMan,
        description: "Bearish candle with a hammer shape: selling pressure appearing after an \
                      advance, a bearish warning.",
        detector: hanging_man,
    },
    PatternDefinition {
        pattern: Pattern::Harami,
        description: "A small body of the opposite color contained in the previous body: \
                      momentum is fading and the trend may reverse.",
        detector: harami,
    },
    PatternDefinition {
        pattern: Pattern::InvertedHammer,
        description: "Small body with a long upper shadow: buyers tested higher prices, a \
                      possible bullish reversal after a decline.",
        detector: inverted_hammer,
    },
    PatternDefinition {
        pattern: Pattern::ShootingStar,
        description: "Bearish candle with a long upper shadow: rejection of higher prices, a \
                      bearish reversal after an advance.",
        detector: shooting_star,
    },
];

/// Immutable table of pattern definitions, keyed by [`Pattern`].
#[derive(Debug, Clone)]
pub struct PatternRegistry {
    definitions: [PatternDefinition; 7],
}

impl Default for PatternRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl PatternRegistry {
    /// Builds the registry of every catalog pattern.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            definitions: STANDARD_DEFINITIONS,
        }
    }

    /// Returns the definition of `pattern`.
    #[must_use]
    pub const fn get(&self, pattern: Pattern) -> &PatternDefinition {
        &self.definitions[pattern.position()]
    }

    /// Looks a pattern up by key or name.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownPattern` if nothing matches.
    pub fn lookup(&self, key: &str) -> Result<&PatternDefinition> {
        let pattern: Pattern = key.parse()?;
        Ok(self.get(pattern))
    }

    /// Iterates over the definitions in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &PatternDefinition> {
        self.definitions.iter()
    }

    /// Number of registered patterns.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_is_keyed_by_pattern() {
        let registry = PatternRegistry::standard();
        assert_eq!(registry.len(), Pattern::ALL.len());
        for pattern in Pattern::ALL {
            assert_eq!(registry.get(pattern).pattern, pattern);
            assert!(!registry.get(pattern).description.is_empty());
        }
    }

    #[test]
    fn test_lookup_by_any_name() {
        let registry = PatternRegistry::standard();
        assert_eq!(registry.lookup("CDLSHOOTINGSTAR").unwrap().pattern, Pattern::ShootingStar);
        assert_eq!(registry.lookup("cdlharami").unwrap().pattern, Pattern::Harami);
        assert_eq!(registry.lookup("Hanging Man").unwrap().pattern, Pattern::HangingMan);
        assert_eq!(registry.lookup("inverted_hammer").unwrap().pattern, Pattern::InvertedHammer);
    }

    #[test]
    fn test_unknown_pattern_is_typed_error() {
        let err = PatternRegistry::standard().lookup("CDLXYZ").unwrap_err();
        assert_eq!(
            err,
            Error::UnknownPattern {
                name: "CDLXYZ".to_string()
            }
        );
    }

    #[test]
    fn test_pattern_round_trips_through_string() {
        for pattern in Pattern::ALL {
            let s: String = pattern.into();
            assert_eq!(Pattern::try_from(s).unwrap(), pattern);
        }
    }

    #[test]
    fn test_two_bar_patterns() {
        let two_bar: Vec<_> = Pattern::ALL.into_iter().filter(|p| p.is_two_bar()).collect();
        assert_eq!(two_bar, vec![Pattern::Engulfing, Pattern::Harami]);
    }

    #[test]
    fn test_display_uses_name() {
        assert_eq!(Pattern::HangingMan.to_string(), "Hanging Man");
        assert_eq!(Pattern::Doji.key(), "CDLDOJI");
    }
}
