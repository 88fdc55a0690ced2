//! MACD line and signal line.
//!
//! line = EMA(fast) - EMA(slow)
//! signal = EMA(signal_period) of the line, seeded once the line exists
//!
//! Default parameters: fast=12, slow=26, signal=9.
//! Warmup: max(fast, slow) - 1 + signal_period - 1 bars; a point is present
//! only once the signal line itself is warmed up.

use crate::domain::indicator::ema::ema;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdPoint {
    pub line: f64,
    pub signal: f64,
}

impl MacdPoint {
    pub fn histogram(&self) -> f64 {
        self.line - self.signal
    }

    /// True when the line sits above its signal (bullish cross in force).
    pub fn bullish(&self) -> bool {
        self.line > self.signal
    }
}

pub fn macd(
    values: &[f64],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> Vec<Option<MacdPoint>> {
    let n = values.len();
    if fast == 0 || slow == 0 || signal_period == 0 {
        return vec![None; n];
    }

    let ema_fast = ema(values, fast);
    let ema_slow = ema(values, slow);

    let line: Vec<Option<f64>> = (0..n)
        .map(|i| match (ema_fast[i], ema_slow[i]) {
            (Some(f), Some(s)) => Some(f - s),
            _ => None,
        })
        .collect();

    let line_start = fast.max(slow) - 1;
    let defined: Vec<f64> = line.iter().flatten().copied().collect();
    let signal = ema(&defined, signal_period);

    let mut out = vec![None; n];
    for (j, sig) in signal.into_iter().enumerate() {
        if let (Some(sig), Some(l)) = (sig, line[line_start + j]) {
            out[line_start + j] = Some(MacdPoint { line: l, signal: sig });
        }
    }
    out
}

pub fn macd_default(values: &[f64]) -> Vec<Option<MacdPoint>> {
    macd(values, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}
