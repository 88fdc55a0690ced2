//! Stochastic oscillator pair.
//!
//! Raw %K = (close - lowest low) / (highest high - lowest low) × 100 over
//! `period` bars; %K is the `smooth`-bar average of the raw reading, and %D
//! the `smooth`-bar average of %K. A flat window reads as neutral 50.
//!
//! Warmup: period - 1 + 2 × (smooth - 1) bars.

use crate::domain::ohlcv::PriceBar;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StochPoint {
    pub k: f64,
    pub d: f64,
}

pub fn stochastic(bars: &[PriceBar], period: usize, smooth: usize) -> Vec<Option<StochPoint>> {
    let n = bars.len();
    if period == 0 || smooth == 0 {
        return vec![None; n];
    }

    let mut raw = vec![None; n];
    for i in period - 1..n {
        let window = &bars[i + 1 - period..=i];
        let highest = window.iter().map(|b| b.high).fold(f64::MIN, f64::max);
        let lowest = window.iter().map(|b| b.low).fold(f64::MAX, f64::min);
        let range = highest - lowest;
        raw[i] = Some(if range == 0.0 {
            50.0
        } else {
            (bars[i].close - lowest) / range * 100.0
        });
    }

    let k = rolling_mean(&raw, smooth);
    let d = rolling_mean(&k, smooth);

    (0..n)
        .map(|i| match (k[i], d[i]) {
            (Some(k), Some(d)) => Some(StochPoint { k, d }),
            _ => None,
        })
        .collect()
}

/// Mean over the last `period` entries, present only when the whole window is.
fn rolling_mean(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    for i in 0..values.len() {
        if i + 1 < period {
            continue;
        }
        let window = &values[i + 1 - period..=i];
        if window.iter().all(Option::is_some) {
            out[i] = Some(window.iter().flatten().sum::<f64>() / period as f64);
        }
    }
    out
}
