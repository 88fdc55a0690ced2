//! Average true range with Wilder's smoothing.
//!
//! TR[0] = high - low; afterwards the three-way true range against the
//! previous close. Seed: simple average of the first `period` true ranges.
//! Subsequent: atr = (prev_atr × (period - 1) + tr) / period.
//!
//! Warmup: first (period - 1) entries are `None`.

use crate::domain::ohlcv::PriceBar;

pub fn atr(bars: &[PriceBar], period: usize) -> Vec<Option<f64>> {
    let n = bars.len();
    if period == 0 || n < period {
        return vec![None; n];
    }

    let mut tr = Vec::with_capacity(n);
    for (i, bar) in bars.iter().enumerate() {
        tr.push(if i == 0 {
            bar.high - bar.low
        } else {
            bar.true_range(bars[i - 1].close)
        });
    }

    let mut out = vec![None; n];
    let mut prev = tr[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = Some(prev);

    for i in period..n {
        prev = (prev * (period - 1) as f64 + tr[i]) / period as f64;
        out[i] = Some(prev);
    }
    out
}
