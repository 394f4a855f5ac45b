//! Standalone SVG candlestick chart adapter implementing ExportPort.

use std::fs;
use std::path::Path;

use crate::domain::candle::CandleSeries;
use crate::domain::error::QuizError;
use crate::ports::export_port::ExportPort;

const CHART_WIDTH: f64 = 480.0;
const CHART_HEIGHT: f64 = 320.0;
const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 30.0;
const MARGIN_BOTTOM: f64 = 30.0;

const BULL_COLOR: &str = "#26a69a";
const BEAR_COLOR: &str = "#ef5350";

#[derive(Debug, Default)]
pub struct SvgChartAdapter;

impl SvgChartAdapter {
    pub fn new() -> Self {
        Self
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render `series` as an SVG document. Empty series yield an empty string.
pub fn generate_candle_svg(series: &CandleSeries, title: &str) -> String {
    let Some((min_price, max_price)) = series.price_bounds() else {
        return String::new();
    };
    let pad = ((max_price - min_price) * 0.05).max(0.01);
    let min_price = min_price - pad;
    let range = (max_price + pad) - min_price;

    let plot_width = CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_height = CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let slot = plot_width / series.len() as f64;
    let body_width = (slot * 0.6).max(1.0);

    let x_center = |i: usize| -> f64 { MARGIN_LEFT + slot * (i as f64 + 0.5) };
    let y_scale =
        |v: f64| -> f64 { MARGIN_TOP + plot_height - ((v - min_price) / range) * plot_height };

    let mut svg = String::new();
    svg.push_str(&format!(
        r##"<svg width="{}" height="{}" viewBox="0 0 {} {}" xmlns="http://www.w3.org/2000/svg">"##,
        CHART_WIDTH, CHART_HEIGHT, CHART_WIDTH, CHART_HEIGHT
    ));
    svg.push_str("\n  <rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n");
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"20\" text-anchor=\"middle\" font-size=\"14\" fill=\"#333\">{}</text>\n",
        CHART_WIDTH / 2.0,
        escape_xml(title)
    ));
    svg.push_str(&format!(
        "  <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"#ccc\" stroke-width=\"1\"/>\n",
        MARGIN_LEFT,
        MARGIN_TOP,
        MARGIN_LEFT,
        CHART_HEIGHT - MARGIN_BOTTOM
    ));
    for price in [max_price, (max_price + min_price + pad) / 2.0, min_price + pad] {
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{:.1}\" text-anchor=\"end\" font-size=\"10\" fill=\"#666\">{:.2}</text>\n",
            MARGIN_LEFT - 5.0,
            y_scale(price) + 3.0,
            price
        ));
    }

    for (i, c) in series.iter().enumerate() {
        let color = if c.is_bullish() { BULL_COLOR } else { BEAR_COLOR };
        let x = x_center(i);
        svg.push_str(&format!(
            "  <line x1=\"{x:.1}\" y1=\"{:.1}\" x2=\"{x:.1}\" y2=\"{:.1}\" stroke=\"{color}\" stroke-width=\"1\"/>\n",
            y_scale(c.high()),
            y_scale(c.low()),
        ));
        let top = y_scale(c.body_top());
        let height = (y_scale(c.body_bottom()) - top).max(1.0);
        svg.push_str(&format!(
            "  <rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"{color}\"/>\n",
            x - body_width / 2.0,
            top,
            body_width,
            height,
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

impl ExportPort for SvgChartAdapter {
    fn export(
        &self,
        series: &CandleSeries,
        title: &str,
        output_path: &Path,
    ) -> Result<(), QuizError> {
        if series.is_empty() {
            return Err(QuizError::Export {
                reason: "cannot chart an empty series".to_string(),
            });
        }
        fs::write(output_path, generate_candle_svg(series, title)).map_err(|e| {
            QuizError::Export {
                reason: format!("failed to write {}: {}", output_path.display(), e),
            }
        })
    }
}
