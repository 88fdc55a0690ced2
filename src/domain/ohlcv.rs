//! Daily price bar representation and input validation.

use crate::domain::error::TascoreError;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl PriceBar {
    /// (high + low + close) / 3
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// max(high - low, |high - prev_close|, |low - prev_close|)
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let hl = self.high - self.low;
        let hc = (self.high - prev_close).abs();
        let lc = (self.low - prev_close).abs();
        hl.max(hc).max(lc)
    }
}

/// Check the structural invariants of a daily series: strictly ascending
/// dates, non-negative volume, and a consistent high/low range on every bar.
///
/// The engine never repairs a bad bar; a violation is an input error.
pub fn validate_bars(bars: &[PriceBar]) -> Result<(), TascoreError> {
    for (i, bar) in bars.iter().enumerate() {
        if bar.volume < 0 {
            return Err(TascoreError::BadBar {
                date: bar.date,
                reason: format!("negative volume {}", bar.volume),
            });
        }
        if bar.high < bar.low {
            return Err(TascoreError::BadBar {
                date: bar.date,
                reason: format!("high {} below low {}", bar.high, bar.low),
            });
        }
        if bar.high < bar.open.max(bar.close) {
            return Err(TascoreError::BadBar {
                date: bar.date,
                reason: "high below open/close".into(),
            });
        }
        if bar.low > bar.open.min(bar.close) {
            return Err(TascoreError::BadBar {
                date: bar.date,
                reason: "low above open/close".into(),
            });
        }
        if i > 0 && bar.date <= bars[i - 1].date {
            return Err(TascoreError::BadBar {
                date: bar.date,
                reason: format!("date not after {}", bars[i - 1].date),
            });
        }
    }
    Ok(())
}
