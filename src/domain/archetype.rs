//! Named candlestick pattern archetypes.

use std::fmt;
use std::str::FromStr;

use crate::domain::error::QuizError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Archetype {
    Doji,
    Hammer,
    ShootingStar,
    BullishEngulfing,
    BearishEngulfing,
}

impl Archetype {
    pub const ALL: [Archetype; 5] = [
        Archetype::Doji,
        Archetype::Hammer,
        Archetype::ShootingStar,
        Archetype::BullishEngulfing,
        Archetype::BearishEngulfing,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Archetype::Doji => "Doji",
            Archetype::Hammer => "Hammer",
            Archetype::ShootingStar => "Shooting Star",
            Archetype::BullishEngulfing => "Bullish Engulfing",
            Archetype::BearishEngulfing => "Bearish Engulfing",
        }
    }

    /// Key used for `[pattern_<key>]` config sections.
    pub fn config_key(&self) -> &'static str {
        match self {
            Archetype::Doji => "doji",
            Archetype::Hammer => "hammer",
            Archetype::ShootingStar => "shooting_star",
            Archetype::BullishEngulfing => "bullish_engulfing",
            Archetype::BearishEngulfing => "bearish_engulfing",
        }
    }

    pub fn candle_count(&self) -> usize {
        match self {
            Archetype::Doji | Archetype::Hammer | Archetype::ShootingStar => 1,
            Archetype::BullishEngulfing | Archetype::BearishEngulfing => 2,
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Archetype {
    type Err = QuizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| if c == '_' || c == '-' { ' ' } else { c })
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        Archetype::ALL
            .into_iter()
            .find(|a| a.name().to_lowercase() == normalized)
            .ok_or_else(|| QuizError::UnknownArchetype {
                name: s.to_string(),
            })
    }
}
