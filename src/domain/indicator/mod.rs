//! Technical indicator set and the per-bar indicator frame.
//!
//! Each indicator module computes one family as a per-bar `Vec<Option<_>>`
//! aligned with the input (`None` while the window is warming up).
//! [`calculate_all`] assembles the columns into an [`IndicatorFrame`],
//! dropping leading rows where any required indicator is still undefined.
//! The long moving averages (60/120 sessions) are optional per row and never
//! cause truncation; short history just leaves them absent.

pub mod sma;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod bollinger;
pub mod stochastic;
pub mod cci;
pub mod atr;
pub mod obv;

use crate::domain::error::TascoreError;
use crate::domain::ohlcv::{validate_bars, PriceBar};
use chrono::NaiveDate;

pub const SMA_SHORT: usize = 5;
pub const SMA_MID: usize = 20;
pub const SMA_LONG: usize = 60;
pub const SMA_XLONG: usize = 120;
pub const RSI_PERIOD: usize = 14;
pub const BOLLINGER_PERIOD: usize = 20;
pub const BOLLINGER_MULT: f64 = 2.0;
pub const VOLUME_SMA_PERIOD: usize = 20;
pub const STOCH_PERIOD: usize = 14;
pub const STOCH_SMOOTH: usize = 3;
pub const CCI_PERIOD: usize = 20;
pub const ATR_PERIOD: usize = 14;

/// One fully warmed-up row of the indicator frame.
///
/// Required indicators are plain `f64`: a row only enters the frame once all
/// of them exist. The long moving averages stay `Option` so downstream
/// scoring can branch on their presence instead of on sentinel values.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorRow {
    pub date: NaiveDate,
    pub close: f64,
    pub volume: i64,
    pub sma_5: f64,
    pub sma_20: f64,
    pub sma_60: Option<f64>,
    pub sma_120: Option<f64>,
    pub macd: f64,
    pub macd_signal: f64,
    pub rsi: f64,
    pub bb_upper: f64,
    pub bb_mid: f64,
    pub bb_lower: f64,
    pub vol_sma_20: f64,
    pub obv: f64,
    pub stoch_k: f64,
    pub stoch_d: f64,
    pub cci: f64,
    pub atr: f64,
}

#[derive(Debug, Clone, Default)]
pub struct IndicatorFrame {
    pub rows: Vec<IndicatorRow>,
}

impl IndicatorFrame {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// The most recent row, if any history survived warm-up.
    pub fn latest(&self) -> Option<&IndicatorRow> {
        self.rows.last()
    }
}

/// Compute every indicator over the full history and keep the rows where the
/// required subset (RSI, MACD line + signal, Bollinger bands) is defined.
///
/// The MACD signal line has the longest warm-up of the required set, so the
/// surviving rows are the tail of the input; a series shorter than that
/// warm-up yields an empty frame, which downstream scoring treats as the
/// neutral case rather than an error.
pub fn calculate_all(bars: &[PriceBar]) -> Result<IndicatorFrame, TascoreError> {
    validate_bars(bars)?;

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let volumes: Vec<f64> = bars.iter().map(|b| b.volume as f64).collect();

    let sma_5 = sma::sma(&closes, SMA_SHORT);
    let sma_20 = sma::sma(&closes, SMA_MID);
    let sma_60 = sma::sma(&closes, SMA_LONG);
    let sma_120 = sma::sma(&closes, SMA_XLONG);
    let macd = macd::macd_default(&closes);
    let rsi = rsi::rsi(&closes, RSI_PERIOD);
    let bands = bollinger::bollinger(&closes, BOLLINGER_PERIOD, BOLLINGER_MULT);
    let vol_sma = sma::sma(&volumes, VOLUME_SMA_PERIOD);
    let obv = obv::obv(bars);
    let stoch = stochastic::stochastic(bars, STOCH_PERIOD, STOCH_SMOOTH);
    let cci = cci::cci(bars, CCI_PERIOD);
    let atr = atr::atr(bars, ATR_PERIOD);

    let mut rows = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        let (Some(rsi_v), Some(macd_v), Some(bb)) = (rsi[i], macd[i], bands[i]) else {
            continue;
        };
        // Everything else in the required set has a shorter warm-up than the
        // MACD signal line, so these are present on every surviving row.
        let (Some(sma_5_v), Some(sma_20_v), Some(vol_sma_v), Some(st), Some(cci_v), Some(atr_v)) =
            (sma_5[i], sma_20[i], vol_sma[i], stoch[i], cci[i], atr[i])
        else {
            continue;
        };

        rows.push(IndicatorRow {
            date: bar.date,
            close: bar.close,
            volume: bar.volume,
            sma_5: sma_5_v,
            sma_20: sma_20_v,
            sma_60: sma_60[i],
            sma_120: sma_120[i],
            macd: macd_v.line,
            macd_signal: macd_v.signal,
            rsi: rsi_v,
            bb_upper: bb.upper,
            bb_mid: bb.middle,
            bb_lower: bb.lower,
            vol_sma_20: vol_sma_v,
            obv: obv[i],
            stoch_k: st.k,
            stoch_d: st.d,
            cci: cci_v,
            atr: atr_v,
        });
    }

    Ok(IndicatorFrame { rows })
}
