#![allow(dead_code)]

use chrono::NaiveDate;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tascore::domain::error::TascoreError;
pub use tascore::domain::ohlcv::PriceBar;
use tascore::ports::data_port::DataPort;

pub fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

pub fn make_bar(day: i64, close: f64, volume: i64) -> PriceBar {
    PriceBar {
        date: start_date() + chrono::Duration::days(day),
        open: close - 0.5,
        high: close + 1.5,
        low: close - 1.5,
        close,
        volume,
    }
}

/// A drifting sine wave: enough movement for RSI and MACD to cycle through
/// their thresholds, so every strategy actually trades.
pub fn wavy_bars(n: usize) -> Vec<PriceBar> {
    (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.35).sin() * 8.0 + i as f64 * 0.05;
            let volume = 1_000 + (i as i64 % 9) * 150;
            make_bar(i as i64, close, volume)
        })
        .collect()
}

/// A steady uptrend with mild noise.
pub fn trending_bars(n: usize) -> Vec<PriceBar> {
    (0..n)
        .map(|i| {
            let close = 100.0 + i as f64 * 0.8 + ((i % 5) as f64 - 2.0) * 0.3;
            make_bar(i as i64, close, 1_000)
        })
        .collect()
}

pub fn write_csv(dir: &Path, code: &str, bars: &[PriceBar]) {
    let mut content = String::from("date,open,high,low,close,volume\n");
    for bar in bars {
        content.push_str(&format!(
            "{},{},{},{},{},{}\n",
            bar.date, bar.open, bar.high, bar.low, bar.close, bar.volume
        ));
    }
    fs::write(dir.join(format!("{code}.csv")), content).unwrap();
}

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PriceBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, code: &str, bars: Vec<PriceBar>) -> Self {
        self.data.insert(code.to_string(), bars);
        self
    }

    pub fn with_error(mut self, code: &str, reason: &str) -> Self {
        self.errors.insert(code.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(
        &self,
        code: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<PriceBar>, TascoreError> {
        if let Some(reason) = self.errors.get(code) {
            return Err(TascoreError::Data {
                reason: reason.clone(),
            });
        }
        let mut bars = self.data.get(code).cloned().unwrap_or_default();
        bars.retain(|b| {
            start.is_none_or(|s| b.date >= s) && end.is_none_or(|e| b.date <= e)
        });
        Ok(bars)
    }

    fn list_codes(&self) -> Result<Vec<String>, TascoreError> {
        let mut codes: Vec<String> = self.data.keys().cloned().collect();
        codes.sort();
        Ok(codes)
    }
}
