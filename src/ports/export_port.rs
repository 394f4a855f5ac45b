//! Candle series export port trait.

use std::path::Path;

use crate::domain::candle::CandleSeries;
use crate::domain::error::QuizError;

/// Port for writing a generated series somewhere the player can look at it.
pub trait ExportPort {
    fn export(&self, series: &CandleSeries, title: &str, output_path: &Path)
    -> Result<(), QuizError>;
}
