//! Candle classification by body-to-range ratio, plus deterministic
//! narrative explanations of a candle and of its recent context.

use std::fmt;

use crate::domain::candle::{Candle, CandleSeries};
use crate::domain::error::QuizError;

/// Body/range ratio below which a candle counts as indecision.
pub const DOJI_RATIO_THRESHOLD: f64 = 0.2;

/// Number of trailing candles [`explain_context`] looks at.
pub const CONTEXT_WINDOW: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Bullish,
    Bearish,
    Indecision,
}

impl Label {
    pub const ALL: [Label; 3] = [Label::Bullish, Label::Bearish, Label::Indecision];

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Bullish => "Bullish candle",
            Label::Bearish => "Bearish candle",
            Label::Indecision => "Doji / indecision",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn classify(candle: &Candle) -> Label {
    classify_with_threshold(candle, DOJI_RATIO_THRESHOLD)
}

/// A zero-range candle is indecision rather than a division failure.
pub fn classify_with_threshold(candle: &Candle, threshold: f64) -> Label {
    let range = candle.range();
    if range == 0.0 {
        return Label::Indecision;
    }
    let ratio = candle.body() / range;
    if ratio < threshold {
        Label::Indecision
    } else if candle.close() > candle.open() {
        Label::Bullish
    } else {
        Label::Bearish
    }
}

pub fn explain_candle(candle: &Candle) -> String {
    explain_label(classify(candle)).to_string()
}

pub fn explain_label(label: Label) -> &'static str {
    match label {
        Label::Indecision => {
            "The body is tiny compared to the range: buyers and sellers ended roughly even, \
             a sign of indecision."
        }
        Label::Bullish => {
            "Price closed well above the open: buyers kept control for most of the candle."
        }
        Label::Bearish => {
            "Price closed well below the open: sellers kept control for most of the candle."
        }
    }
}

/// Narrative for the visible candles ahead of a hidden one.
///
/// Compares the latest close with the close at the start of the trailing
/// window, then the summed lower wicks with the summed upper wicks across it.
pub fn explain_context(series: &CandleSeries) -> Result<String, QuizError> {
    if series.len() < CONTEXT_WINDOW {
        return Err(QuizError::InsufficientHistory {
            have: series.len(),
            need: CONTEXT_WINDOW,
        });
    }
    let window = series.tail(CONTEXT_WINDOW);
    let latest = window[window.len() - 1].close();
    let earlier = window[0].close();

    let momentum = if latest > earlier {
        "Closes have been rising over the last few candles, showing bullish pressure."
    } else if latest < earlier {
        "Closes have been falling over the last few candles, showing bearish pressure."
    } else {
        "Closes are flat over the last few candles, with no clear pressure either way."
    };

    let lower: f64 = window.iter().map(Candle::lower_wick).sum();
    let upper: f64 = window.iter().map(Candle::upper_wick).sum();

    let wicks = if lower > upper {
        "Longer lower wicks suggest buyers are supporting dips."
    } else if upper > lower {
        "Longer upper wicks suggest sellers are pressing on rallies."
    } else {
        "Upper and lower wicks are balanced, pointing to indecision."
    };

    Ok(format!("{momentum} {wicks}"))
}
