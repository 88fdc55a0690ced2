//! Exponential moving average, seeded with the simple average of the first
//! `period` values.
//!
//! Smoothing factor k = 2 / (period + 1).
//! Warmup: first (period - 1) entries are `None`.

pub fn ema(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 || values.len() < period {
        return vec![None; values.len()];
    }

    let mut out = vec![None; values.len()];
    let k = 2.0 / (period as f64 + 1.0);

    let mut prev = values[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = Some(prev);

    for i in period..values.len() {
        prev = values[i] * k + prev * (1.0 - k);
        out[i] = Some(prev);
    }
    out
}
