//! CSV file data adapter.
//!
//! One file per instrument, `{code}.csv`, with a
//! `date,open,high,low,close,volume` header. Rows may appear in any order
//! in the file; fetched bars are always returned date-ascending.

use crate::domain::error::TascoreError;
use crate::domain::ohlcv::PriceBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
struct CsvBar {
    date: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: i64,
}

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, code: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", code))
    }
}

impl DataPort for CsvAdapter {
    fn fetch_bars(
        &self,
        code: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<PriceBar>, TascoreError> {
        let path = self.csv_path(code);
        let content = fs::read_to_string(&path).map_err(|e| TascoreError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.deserialize::<CsvBar>() {
            let row = result.map_err(|e| TascoreError::Data {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;
            let date =
                NaiveDate::parse_from_str(&row.date, "%Y-%m-%d").map_err(|e| TascoreError::Data {
                    reason: format!("invalid date '{}': {}", row.date, e),
                })?;

            if start.is_some_and(|s| date < s) || end.is_some_and(|e| date > e) {
                continue;
            }

            bars.push(PriceBar {
                date,
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
                volume: row.volume,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }

    fn list_codes(&self) -> Result<Vec<String>, TascoreError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| TascoreError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut codes = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| TascoreError::Data {
                reason: format!("directory entry error: {}", e),
            })?;
            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if let Some(code) = name_str.strip_suffix(".csv") {
                codes.push(code.to_string());
            }
        }

        codes.sort();
        Ok(codes)
    }
}
