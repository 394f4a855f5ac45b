//! Concrete adapter implementations for ports, plus terminal rendering.

pub mod csv_adapter;
pub mod file_config_adapter;
pub mod svg_chart_adapter;
pub mod text_chart;
