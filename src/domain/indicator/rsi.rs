//! Relative strength index with Wilder's smoothing.
//!
//! First average gain/loss: simple mean over the first `period` changes.
//! Subsequent: avg = (prev_avg * (period - 1) + current) / period.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss); 100 when avg_loss is zero.
//!
//! Warmup: first `period` entries are `None` (needs `period` price changes).

pub fn rsi(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let n = values.len();
    if period == 0 || n < period + 1 {
        return vec![None; n];
    }

    let mut gains = Vec::with_capacity(n - 1);
    let mut losses = Vec::with_capacity(n - 1);
    for i in 1..n {
        let change = values[i] - values[i - 1];
        gains.push(change.max(0.0));
        losses.push((-change).max(0.0));
    }

    let mut out = vec![None; n];
    let mut avg_gain = gains[..period].iter().sum::<f64>() / period as f64;
    let mut avg_loss = losses[..period].iter().sum::<f64>() / period as f64;
    out[period] = Some(rsi_value(avg_gain, avg_loss));

    for i in period + 1..n {
        avg_gain = (avg_gain * (period - 1) as f64 + gains[i - 1]) / period as f64;
        avg_loss = (avg_loss * (period - 1) as f64 + losses[i - 1]) / period as f64;
        out[i] = Some(rsi_value(avg_gain, avg_loss));
    }
    out
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
