//! Quiz session state owned by the caller.
//!
//! Nothing here is shared or mutated in place: each answer produces a new
//! [`ScoreBoard`] value that the caller threads into the next round.

use std::collections::BTreeMap;

use crate::domain::archetype::Archetype;
use crate::domain::candle::{Candle, CandleSeries};
use crate::domain::classifier::{Label, classify_with_threshold};
use crate::domain::error::QuizError;
use crate::domain::walk::MIN_WALK_LENGTH;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreBoard {
    pub correct: u32,
    pub incorrect: u32,
    pub streak: u32,
    pub best_streak: u32,
    misses: BTreeMap<Archetype, u32>,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(mut self, correct: bool) -> Self {
        if correct {
            self.correct += 1;
            self.streak += 1;
            self.best_streak = self.best_streak.max(self.streak);
        } else {
            self.incorrect += 1;
            self.streak = 0;
        }
        self
    }

    pub fn record_pattern(self, archetype: Archetype, correct: bool) -> Self {
        let mut next = self.record(correct);
        if !correct {
            *next.misses.entry(archetype).or_insert(0) += 1;
        }
        next
    }

    pub fn total(&self) -> u32 {
        self.correct + self.incorrect
    }

    /// Fraction answered correctly, or `None` before the first answer.
    pub fn accuracy(&self) -> Option<f64> {
        match self.total() {
            0 => None,
            n => Some(self.correct as f64 / n as f64),
        }
    }

    pub fn misses(&self, archetype: Archetype) -> u32 {
        self.misses.get(&archetype).copied().unwrap_or(0)
    }

    /// Archetype missed most often; ties go to the earlier archetype.
    pub fn weakest_pattern(&self) -> Option<Archetype> {
        self.misses
            .iter()
            .filter(|(_, n)| **n > 0)
            .fold(None, |best: Option<(Archetype, u32)>, (a, n)| match best {
                Some((_, m)) if m >= *n => best,
                _ => Some((*a, *n)),
            })
            .map(|(a, _)| a)
    }
}

/// One "predict the next candle" round: the visible candles and the hidden
/// final candle with its ground-truth label.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRound {
    pub visible: CandleSeries,
    pub hidden: Candle,
    pub answer: Label,
}

impl PredictionRound {
    pub fn from_series(series: &CandleSeries, threshold: f64) -> Result<Self, QuizError> {
        if series.len() < MIN_WALK_LENGTH {
            return Err(QuizError::InvalidLength {
                length: series.len(),
                minimum: MIN_WALK_LENGTH,
            });
        }
        let (visible, hidden) = series.split_last().ok_or(QuizError::InvalidLength {
            length: 0,
            minimum: MIN_WALK_LENGTH,
        })?;
        Ok(Self {
            visible,
            hidden,
            answer: classify_with_threshold(&hidden, threshold),
        })
    }

    pub fn is_correct(&self, guess: Label) -> bool {
        guess == self.answer
    }
}
