//! CSV series adapter.
//!
//! Rows are `index,open,high,low,close`, one candle per row in chronological
//! order, preceded by a header row.

use crate::domain::candle::{Candle, CandleSeries};
use crate::domain::error::QuizError;
use crate::ports::export_port::ExportPort;
use std::fs;
use std::path::Path;

pub const CSV_HEADER: [&str; 5] = ["index", "open", "high", "low", "close"];

#[derive(Debug, Default)]
pub struct CsvAdapter;

impl CsvAdapter {
    pub fn new() -> Self {
        Self
    }

    pub fn to_csv_string(series: &CandleSeries) -> Result<String, QuizError> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.write_record(CSV_HEADER).map_err(export_err)?;
        for (i, c) in series.iter().enumerate() {
            wtr.write_record([
                i.to_string(),
                format!("{:.4}", c.open()),
                format!("{:.4}", c.high()),
                format!("{:.4}", c.low()),
                format!("{:.4}", c.close()),
            ])
            .map_err(export_err)?;
        }
        let bytes = wtr.into_inner().map_err(|e| QuizError::Export {
            reason: e.to_string(),
        })?;
        String::from_utf8(bytes).map_err(|e| QuizError::Export {
            reason: e.to_string(),
        })
    }

    pub fn read_series(path: &Path) -> Result<CandleSeries, QuizError> {
        let content = fs::read_to_string(path).map_err(|e| QuizError::Export {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;
        Self::parse_series(&content)
    }

    pub fn parse_series(content: &str) -> Result<CandleSeries, QuizError> {
        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut candles = Vec::new();

        for (row, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| QuizError::Export {
                reason: format!("CSV parse error: {}", e),
            })?;
            let field = |idx: usize, name: &str| -> Result<f64, QuizError> {
                record
                    .get(idx)
                    .ok_or_else(|| QuizError::Export {
                        reason: format!("row {row}: missing {name} column"),
                    })?
                    .trim()
                    .parse()
                    .map_err(|e| QuizError::Export {
                        reason: format!("row {row}: invalid {name} value: {e}"),
                    })
            };
            let open = field(1, "open")?;
            let high = field(2, "high")?;
            let low = field(3, "low")?;
            let close = field(4, "close")?;
            candles.push(Candle::new(open, high, low, close)?);
        }

        Ok(CandleSeries::new(candles))
    }
}

fn export_err(e: csv::Error) -> QuizError {
    QuizError::Export {
        reason: format!("CSV write error: {}", e),
    }
}

impl ExportPort for CsvAdapter {
    fn export(
        &self,
        series: &CandleSeries,
        _title: &str,
        output_path: &Path,
    ) -> Result<(), QuizError> {
        let content = Self::to_csv_string(series)?;
        fs::write(output_path, content).map_err(|e| QuizError::Export {
            reason: format!("failed to write {}: {}", output_path.display(), e),
        })
    }
}
