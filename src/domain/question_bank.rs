//! Pattern ground truth and multiple-choice question construction.

use std::collections::BTreeMap;

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, warn};

use crate::domain::archetype::Archetype;
use crate::domain::error::QuizError;

pub const QUESTION_PROMPT: &str = "Based on this pattern, what is the most likely market behavior?";
pub const DEFAULT_FILLER: &str = "No clear signal";
pub const DISTRACTOR_COUNT: usize = 3;

const DEFAULT_DISTRACTORS: [&str; 7] = [
    "Bullish continuation likely",
    "Bearish continuation likely",
    "Sideways consolidation likely",
    "Indecision - unclear direction",
    "Momentum weakening",
    "Trend exhaustion",
    "Reversal unlikely",
];

/// Ground truth for one archetype.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternBehavior {
    pub expected: String,
    pub explanation: String,
    /// Terms of `expected` that disqualify a distractor (case-insensitive substring).
    pub keywords: Vec<String>,
}

impl PatternBehavior {
    fn new(expected: &str, explanation: &str, keywords: &[&str]) -> Self {
        Self {
            expected: expected.to_string(),
            explanation: explanation.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    fn overlaps(&self, candidate: &str) -> bool {
        let candidate = candidate.to_lowercase();
        self.keywords
            .iter()
            .any(|k| !k.is_empty() && candidate.contains(&k.to_lowercase()))
    }
}

fn default_behavior(archetype: Archetype) -> PatternBehavior {
    match archetype {
        Archetype::Doji => PatternBehavior::new(
            "Indecision - potential reversal or pause",
            "A Doji signals market uncertainty. It often appears before a reversal \
             but is not a guarantee on its own.",
            &["indecision", "reversal", "pause"],
        ),
        Archetype::Hammer => PatternBehavior::new(
            "Bullish reversal likely",
            "A Hammer forms after a decline and shows buyers stepping in strongly, \
             rejecting lower prices.",
            &["bullish", "reversal"],
        ),
        Archetype::ShootingStar => PatternBehavior::new(
            "Bearish reversal likely",
            "A Shooting Star appears after a rise and signals exhaustion: buyers pushed \
             price up but were overwhelmed.",
            &["bearish", "reversal"],
        ),
        Archetype::BullishEngulfing => PatternBehavior::new(
            "Bullish reversal likely",
            "A Bullish Engulfing candle swallows the prior bearish candle, indicating \
             strong buying pressure.",
            &["bullish", "reversal"],
        ),
        Archetype::BearishEngulfing => PatternBehavior::new(
            "Bearish reversal likely",
            "A Bearish Engulfing candle overwhelms the prior bullish candle, signaling \
             aggressive selling.",
            &["bearish", "reversal"],
        ),
    }
}

/// A four-choice quiz question. Built once per request and only read afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub archetype: Archetype,
    pub prompt: String,
    pub choices: Vec<String>,
    pub correct_answer: String,
    pub explanation: String,
}

impl Question {
    pub fn is_correct(&self, choice: &str) -> bool {
        choice == self.correct_answer
    }

    /// Choice at 1-based `number`, as shown to the player.
    pub fn choice(&self, number: usize) -> Result<&str, QuizError> {
        number
            .checked_sub(1)
            .and_then(|i| self.choices.get(i))
            .map(String::as_str)
            .ok_or_else(|| QuizError::InvalidChoice {
                choice: number.to_string(),
                available: self.choices.len(),
            })
    }

    pub fn correct_index(&self) -> Option<usize> {
        self.choices.iter().position(|c| *c == self.correct_answer)
    }
}

/// Static archetype table plus the distractor pool.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionBank {
    behaviors: BTreeMap<Archetype, PatternBehavior>,
    distractors: Vec<String>,
    filler: String,
}

impl Default for QuestionBank {
    fn default() -> Self {
        Self {
            behaviors: Archetype::ALL
                .into_iter()
                .map(|a| (a, default_behavior(a)))
                .collect(),
            distractors: DEFAULT_DISTRACTORS.iter().map(|d| d.to_string()).collect(),
            filler: DEFAULT_FILLER.to_string(),
        }
    }
}

impl QuestionBank {
    pub fn behavior(&self, archetype: Archetype) -> Option<&PatternBehavior> {
        self.behaviors.get(&archetype)
    }

    pub fn distractors(&self) -> &[String] {
        &self.distractors
    }

    pub fn filler(&self) -> &str {
        &self.filler
    }

    pub fn with_behavior(mut self, archetype: Archetype, behavior: PatternBehavior) -> Self {
        self.behaviors.insert(archetype, behavior);
        self
    }

    pub fn with_distractors(mut self, distractors: Vec<String>) -> Self {
        self.distractors = distractors;
        self
    }

    pub fn with_filler(mut self, filler: impl Into<String>) -> Self {
        self.filler = filler.into();
        self
    }

    /// Distractors allowed for `behavior`: pool entries that do not echo the
    /// correct answer, deduplicated, padded once with the filler when short.
    fn candidate_distractors(&self, behavior: &PatternBehavior) -> Vec<String> {
        let mut pool: Vec<String> = Vec::new();
        for d in &self.distractors {
            let d = d.trim();
            if d.is_empty() || d == behavior.expected || behavior.overlaps(d) {
                continue;
            }
            if !pool.iter().any(|p| p == d) {
                pool.push(d.to_string());
            }
        }
        if pool.len() < DISTRACTOR_COUNT {
            let filler = self.filler.trim();
            let usable = !filler.is_empty() && filler != behavior.expected;
            if usable && !pool.iter().any(|p| p == filler) {
                warn!(
                    available = pool.len(),
                    filler, "distractor pool short after filtering, padding with filler"
                );
                pool.push(filler.to_string());
            }
        }
        pool
    }

    pub fn build_question<R: Rng + ?Sized>(
        &self,
        archetype: Archetype,
        rng: &mut R,
    ) -> Result<Question, QuizError> {
        let behavior = self
            .behaviors
            .get(&archetype)
            .ok_or_else(|| QuizError::UnknownArchetype {
                name: archetype.name().to_string(),
            })?;

        let pool = self.candidate_distractors(behavior);
        if pool.len() < DISTRACTOR_COUNT {
            return Err(QuizError::InsufficientDistractors {
                available: pool.len(),
            });
        }

        let mut choices: Vec<String> = pool
            .choose_multiple(rng, DISTRACTOR_COUNT)
            .cloned()
            .collect();
        choices.push(behavior.expected.clone());
        choices.shuffle(rng);

        debug!(pattern = %archetype, pool = pool.len(), "built question");
        Ok(Question {
            archetype,
            prompt: QUESTION_PROMPT.to_string(),
            choices,
            correct_answer: behavior.expected.clone(),
            explanation: behavior.explanation.clone(),
        })
    }
}

/// Build a question from the built-in bank.
pub fn build_question<R: Rng + ?Sized>(
    archetype: Archetype,
    rng: &mut R,
) -> Result<Question, QuizError> {
    QuestionBank::default().build_question(archetype, rng)
}
