//! Bollinger bands: SMA middle with ± multiplier × population standard
//! deviation (divides by N, not N-1).
//!
//! Warmup: first (period - 1) entries are `None`.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerPoint {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

impl BollingerPoint {
    /// Normalized position of `price` in the band: 0 at the lower band,
    /// 1 at the upper band. A zero-width band reads as neutral 0.5.
    pub fn position(&self, price: f64) -> f64 {
        let width = self.upper - self.lower;
        if width == 0.0 {
            0.5
        } else {
            (price - self.lower) / width
        }
    }
}

pub fn bollinger(values: &[f64], period: usize, mult: f64) -> Vec<Option<BollingerPoint>> {
    if period == 0 {
        return vec![None; values.len()];
    }

    let mut out = Vec::with_capacity(values.len());
    for i in 0..values.len() {
        if i + 1 < period {
            out.push(None);
            continue;
        }

        let window = &values[i + 1 - period..=i];
        let middle = window.iter().sum::<f64>() / period as f64;
        let variance = window
            .iter()
            .map(|v| {
                let diff = v - middle;
                diff * diff
            })
            .sum::<f64>()
            / period as f64;
        let stddev = variance.sqrt();

        out.push(Some(BollingerPoint {
            upper: middle + mult * stddev,
            middle,
            lower: middle - mult * stddev,
        }));
    }
    out
}
