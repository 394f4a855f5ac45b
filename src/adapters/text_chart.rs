//! Terminal candlestick rendering for the interactive quiz.

use crate::domain::candle::CandleSeries;

pub const DEFAULT_HEIGHT: usize = 12;

const BULL_BODY: char = '█';
const BEAR_BODY: char = '░';
const WICK: char = '│';
const PLACEHOLDER: char = '?';

/// Render `series` as `height` text rows, highest price first. Each row is
/// prefixed with its price level; each candle takes one column.
pub fn render(series: &CandleSeries, height: usize) -> String {
    render_columns(series, height, false)
}

/// Like [`render`], with a trailing `?` column standing in for a hidden candle.
pub fn render_with_placeholder(series: &CandleSeries, height: usize) -> String {
    render_columns(series, height, true)
}

fn render_columns(series: &CandleSeries, height: usize, placeholder: bool) -> String {
    let Some((low, high)) = series.price_bounds() else {
        return String::new();
    };
    let height = height.max(2);
    let span = (high - low).max(f64::EPSILON);
    let step = span / height as f64;

    let mut out = String::new();
    for row in 0..height {
        let band_top = high - step * row as f64;
        let band_bottom = band_top - step;
        out.push_str(&format!("{:>9.2} ┤", band_top));

        for c in series {
            let overlaps = |top: f64, bottom: f64| top >= band_bottom && bottom <= band_top;
            let ch = if overlaps(c.body_top(), c.body_bottom()) {
                if c.is_bullish() { BULL_BODY } else { BEAR_BODY }
            } else if overlaps(c.high(), c.low()) {
                WICK
            } else {
                ' '
            };
            out.push(' ');
            out.push(ch);
        }
        if placeholder {
            out.push(' ');
            out.push(if row == height / 2 { PLACEHOLDER } else { ' ' });
        }
        out.push('\n');
    }
    out
}
