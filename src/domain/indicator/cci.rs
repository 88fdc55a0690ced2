//! Commodity channel index over the typical price.
//!
//! CCI = (tp - SMA(tp)) / (0.015 × mean |tp - SMA(tp)|) over `period` bars.
//! A zero mean deviation reads as 0.
//!
//! Warmup: first (period - 1) entries are `None`.

use crate::domain::ohlcv::PriceBar;

const LAMBERT_CONSTANT: f64 = 0.015;

pub fn cci(bars: &[PriceBar], period: usize) -> Vec<Option<f64>> {
    let n = bars.len();
    if period == 0 {
        return vec![None; n];
    }

    let tp: Vec<f64> = bars.iter().map(PriceBar::typical_price).collect();

    let mut out = vec![None; n];
    for i in period - 1..n {
        let window = &tp[i + 1 - period..=i];
        let mean = window.iter().sum::<f64>() / period as f64;
        let mean_dev = window.iter().map(|v| (v - mean).abs()).sum::<f64>() / period as f64;
        out[i] = Some(if mean_dev == 0.0 {
            0.0
        } else {
            (tp[i] - mean) / (LAMBERT_CONSTANT * mean_dev)
        });
    }
    out
}
