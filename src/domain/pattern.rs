//! Synthetic candle generation for named pattern archetypes.
//!
//! Every archetype is anchored at [`ANCHOR_PRICE`]; only the shape is
//! meaningful, not the absolute level. Each `(low, high)` bound below is an
//! inclusive uniform draw, sampled independently per use.

use rand::Rng;
use tracing::debug;

use crate::domain::archetype::Archetype;
use crate::domain::candle::{Candle, CandleSeries};
use crate::domain::error::QuizError;

pub type Bounds = (f64, f64);

pub const ANCHOR_PRICE: f64 = 100.0;

pub const DOJI_BODY: Bounds = (0.0, 0.2);
pub const DOJI_SHADOW: Bounds = (0.5, 1.5);

pub const HAMMER_BODY: Bounds = (0.5, 1.0);
pub const HAMMER_LOWER_SHADOW: Bounds = (2.0, 3.0);
pub const HAMMER_UPPER_SHADOW: Bounds = (0.2, 0.5);

pub const STAR_BODY: Bounds = (0.5, 1.0);
pub const STAR_UPPER_SHADOW: Bounds = (2.0, 3.0);
pub const STAR_LOWER_SHADOW: Bounds = (0.2, 0.5);

/// Body of the first (smaller) candle of an engulfing pair.
pub const ENGULF_FIRST_BODY: Bounds = (1.0, 2.0);
/// How far the second candle opens beyond the first candle's close.
pub const ENGULF_GAP: Bounds = (0.5, 1.0);
/// How far the second candle closes beyond the first candle's open.
pub const ENGULF_OVERSHOOT: Bounds = (1.0, 2.0);
pub const ENGULF_SHADOW: Bounds = (0.2, 0.5);

fn draw<R: Rng + ?Sized>(rng: &mut R, (low, high): Bounds) -> f64 {
    rng.gen_range(low..=high)
}

/// Produce one realization of `archetype`.
pub fn generate_pattern<R: Rng + ?Sized>(
    archetype: Archetype,
    rng: &mut R,
) -> Result<CandleSeries, QuizError> {
    let candles = match archetype {
        Archetype::Doji => vec![doji(rng)?],
        Archetype::Hammer => vec![hammer(rng)?],
        Archetype::ShootingStar => vec![shooting_star(rng)?],
        Archetype::BullishEngulfing => engulfing(rng, true)?,
        Archetype::BearishEngulfing => engulfing(rng, false)?,
    };
    debug!(pattern = %archetype, candles = candles.len(), "generated pattern");
    Ok(CandleSeries::new(candles))
}

/// Parse `name` and generate the matching archetype.
pub fn generate_pattern_named<R: Rng + ?Sized>(
    name: &str,
    rng: &mut R,
) -> Result<CandleSeries, QuizError> {
    generate_pattern(name.parse()?, rng)
}

fn doji<R: Rng + ?Sized>(rng: &mut R) -> Result<Candle, QuizError> {
    let open = ANCHOR_PRICE;
    let body = draw(rng, DOJI_BODY);
    let close = if rng.gen_bool(0.5) {
        open + body
    } else {
        open - body
    };
    let high = open + draw(rng, DOJI_SHADOW);
    let low = open - draw(rng, DOJI_SHADOW);
    Candle::new(open, high, low, close)
}

fn hammer<R: Rng + ?Sized>(rng: &mut R) -> Result<Candle, QuizError> {
    let open = ANCHOR_PRICE;
    let close = open + draw(rng, HAMMER_BODY);
    let low = open - draw(rng, HAMMER_LOWER_SHADOW);
    let high = close + draw(rng, HAMMER_UPPER_SHADOW);
    Candle::new(open, high, low, close)
}

fn shooting_star<R: Rng + ?Sized>(rng: &mut R) -> Result<Candle, QuizError> {
    let open = ANCHOR_PRICE;
    let close = open - draw(rng, STAR_BODY);
    let high = open + draw(rng, STAR_UPPER_SHADOW);
    let low = close - draw(rng, STAR_LOWER_SHADOW);
    Candle::new(open, high, low, close)
}

/// Two-candle engulfing pair. `bullish` selects a bearish-then-bullish pair;
/// otherwise the mirror image.
fn engulfing<R: Rng + ?Sized>(rng: &mut R, bullish: bool) -> Result<Vec<Candle>, QuizError> {
    let dir = if bullish { 1.0 } else { -1.0 };

    let o1 = ANCHOR_PRICE;
    let c1 = o1 - dir * draw(rng, ENGULF_FIRST_BODY);
    let first = with_shadows(rng, o1, c1)?;

    let o2 = c1 - dir * draw(rng, ENGULF_GAP);
    let c2 = o1 + dir * draw(rng, ENGULF_OVERSHOOT);
    let second = with_shadows(rng, o2, c2)?;

    Ok(vec![first, second])
}

fn with_shadows<R: Rng + ?Sized>(rng: &mut R, open: f64, close: f64) -> Result<Candle, QuizError> {
    let high = open.max(close) + draw(rng, ENGULF_SHADOW);
    let low = open.min(close) - draw(rng, ENGULF_SHADOW);
    Candle::new(open, high, low, close)
}
