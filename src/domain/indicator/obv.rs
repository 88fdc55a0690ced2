//! On-balance volume.
//!
//! OBV[0] = volume[0]; volume is added on up-closes, subtracted on
//! down-closes, unchanged on flat closes. No warmup.

use crate::domain::ohlcv::PriceBar;

pub fn obv(bars: &[PriceBar]) -> Vec<f64> {
    let mut out = Vec::with_capacity(bars.len());
    let mut running = 0.0;
    let mut prev_close = 0.0;

    for (i, bar) in bars.iter().enumerate() {
        if i == 0 {
            running = bar.volume as f64;
        } else if bar.close > prev_close {
            running += bar.volume as f64;
        } else if bar.close < prev_close {
            running -= bar.volume as f64;
        }
        prev_close = bar.close;
        out.push(running);
    }
    out
}
