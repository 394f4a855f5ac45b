#![allow(dead_code)]

use candlequiz::domain::candle::{Candle, CandleSeries};
use candlequiz::domain::error::QuizError;
use candlequiz::ports::config_port::ConfigPort;
use candlequiz::ports::export_port::ExportPort;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// In-memory `ConfigPort` keyed by `(section, key)`.
pub struct MockConfigPort {
    pub values: HashMap<(String, String), String>,
}

impl MockConfigPort {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    pub fn with(mut self, section: &str, key: &str, value: &str) -> Self {
        self.values
            .insert((section.to_string(), key.to_string()), value.to_string());
        self
    }
}

impl ConfigPort for MockConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.values
            .get(&(section.to_string(), key.to_string()))
            .cloned()
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.get_string(section, key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.get_string(section, key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }
}

/// `ExportPort` that records what it was asked to write.
pub struct RecordingExportPort {
    pub calls: RefCell<Vec<(usize, String, PathBuf)>>,
}

impl RecordingExportPort {
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl ExportPort for RecordingExportPort {
    fn export(
        &self,
        series: &CandleSeries,
        title: &str,
        output_path: &Path,
    ) -> Result<(), QuizError> {
        self.calls
            .borrow_mut()
            .push((series.len(), title.to_string(), output_path.to_path_buf()));
        Ok(())
    }
}

pub fn candle(open: f64, high: f64, low: f64, close: f64) -> Candle {
    Candle::new(open, high, low, close).unwrap()
}

pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn assert_ohlc_invariant(series: &CandleSeries) {
    for (i, c) in series.iter().enumerate() {
        assert!(
            c.low() <= c.open().min(c.close()),
            "candle {i}: low {} above body {}",
            c.low(),
            c.open().min(c.close())
        );
        assert!(
            c.high() >= c.open().max(c.close()),
            "candle {i}: high {} below body {}",
            c.high(),
            c.open().max(c.close())
        );
    }
}
