//! Composite technical strength score.
//!
//! Three independently capped sub-scores, summed to at most 100:
//! trend 40, momentum 30, channel position + volume confirmation 30.
//! The score is always taken from the latest frame row; an empty frame
//! yields the neutral 50.

use crate::domain::indicator::{IndicatorFrame, IndicatorRow};

pub const NEUTRAL_SCORE: f64 = 50.0;

/// Volume at or above this multiple of its 20-session average earns the
/// +5 confirmation bonus.
const VOLUME_SURGE_RATIO: f64 = 1.5;

pub fn composite_score(frame: &IndicatorFrame) -> f64 {
    let Some(latest) = frame.latest() else {
        return NEUTRAL_SCORE;
    };
    trend_score(latest) + momentum_score(latest.rsi) + position_volume_score(latest)
}

/// Trend credit, capped at 40.
///
/// When the 60-session average is unavailable the MACD cross carries its
/// weight (20 instead of 15 + 5), keeping the 40-point ceiling independent
/// of history length.
fn trend_score(row: &IndicatorRow) -> f64 {
    let mut score = 0.0;
    if row.close > row.sma_20 {
        score += 10.0;
    }
    if row.sma_5 > row.sma_20 {
        score += 10.0;
    }

    let bullish = row.macd > row.macd_signal;
    match row.sma_60 {
        Some(sma_60) => {
            if bullish {
                score += 15.0;
            }
            if row.close > sma_60 {
                score += 5.0;
            }
        }
        None => {
            if bullish {
                score += 20.0;
            }
        }
    }
    score
}

/// Momentum credit from the RSI band, capped at 30.
///
/// Bands are checked highest-priority first so every reading lands in
/// exactly one band; both 45 and 65 belong to the 30-point band.
fn momentum_score(rsi: f64) -> f64 {
    if (45.0..=65.0).contains(&rsi) {
        30.0
    } else if (35.0..45.0).contains(&rsi) {
        22.0
    } else if rsi > 65.0 && rsi <= 75.0 {
        18.0
    } else if (30.0..35.0).contains(&rsi) {
        12.0
    } else if rsi > 75.0 {
        8.0
    } else {
        4.0
    }
}

/// Which channel-position table applies. A bullish MACD cross favours trend
/// continuation (mid-upper zone scores best); otherwise the table rewards
/// mean-reversion entries in the mid-lower zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ZoneTable {
    Uptrend,
    Downtrend,
}

impl ZoneTable {
    fn select(bullish: bool) -> Self {
        if bullish {
            ZoneTable::Uptrend
        } else {
            ZoneTable::Downtrend
        }
    }

    fn score(self, pos: f64) -> f64 {
        match self {
            ZoneTable::Uptrend => {
                if (0.40..=0.75).contains(&pos) {
                    25.0
                } else if pos > 0.75 && pos <= 0.90 {
                    18.0
                } else if (0.20..0.40).contains(&pos) {
                    14.0
                } else if pos > 0.90 {
                    8.0
                } else {
                    3.0
                }
            }
            ZoneTable::Downtrend => {
                if (0.20..=0.50).contains(&pos) {
                    25.0
                } else if pos > 0.50 && pos <= 0.70 {
                    18.0
                } else if (0.10..0.20).contains(&pos) {
                    12.0
                } else if pos > 0.70 && pos <= 0.90 {
                    8.0
                } else {
                    3.0
                }
            }
        }
    }
}

/// Channel position plus volume confirmation, capped at 30 (25 + 5).
fn position_volume_score(row: &IndicatorRow) -> f64 {
    let width = row.bb_upper - row.bb_lower;
    // Zero-width channel: neutral position rather than a NaN.
    let pos = if width == 0.0 {
        0.5
    } else {
        (row.close - row.bb_lower) / width
    };

    let mut score = ZoneTable::select(row.macd > row.macd_signal).score(pos);
    if row.vol_sma_20 > 0.0 && row.volume as f64 / row.vol_sma_20 >= VOLUME_SURGE_RATIO {
        score += 5.0;
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn make_row() -> IndicatorRow {
        IndicatorRow {
            date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            close: 100.0,
            volume: 1000,
            sma_5: 100.0,
            sma_20: 100.0,
            sma_60: None,
            sma_120: None,
            macd: 0.0,
            macd_signal: 0.0,
            rsi: 50.0,
            bb_upper: 110.0,
            bb_mid: 100.0,
            bb_lower: 90.0,
            vol_sma_20: 1000.0,
            obv: 0.0,
            stoch_k: 50.0,
            stoch_d: 50.0,
            cci: 0.0,
            atr: 1.0,
        }
    }

    fn frame_of(row: IndicatorRow) -> IndicatorFrame {
        IndicatorFrame { rows: vec![row] }
    }

    #[test]
    fn empty_frame_is_neutral() {
        let frame = IndicatorFrame::default();
        assert!((composite_score(&frame) - NEUTRAL_SCORE).abs() < f64::EPSILON);
    }

    #[test]
    fn trend_full_credit_with_sma_60() {
        let mut row = make_row();
        row.close = 105.0;
        row.sma_5 = 104.0;
        row.sma_20 = 100.0;
        row.sma_60 = Some(95.0);
        row.macd = 1.0;
        row.macd_signal = 0.5;
        assert!((trend_score(&row) - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn trend_full_credit_without_sma_60() {
        let mut row = make_row();
        row.close = 105.0;
        row.sma_5 = 104.0;
        row.sma_20 = 100.0;
        row.sma_60 = None;
        row.macd = 1.0;
        row.macd_signal = 0.5;
        // MACD weight rises to 20 when the 60-session average is missing.
        assert!((trend_score(&row) - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn trend_bearish_cross_earns_nothing_from_macd() {
        let mut row = make_row();
        row.close = 95.0;
        row.sma_5 = 94.0;
        row.macd = -1.0;
        row.macd_signal = 0.0;
        assert!((trend_score(&row) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn momentum_band_boundaries() {
        // Inclusive boundaries of the healthy mid-band.
        assert!((momentum_score(45.0) - 30.0).abs() < f64::EPSILON);
        assert!((momentum_score(65.0) - 30.0).abs() < f64::EPSILON);
        // Just past the mid-band the overbought-edge band takes over.
        assert!((momentum_score(65.0001) - 18.0).abs() < f64::EPSILON);
        assert!((momentum_score(44.9999) - 22.0).abs() < f64::EPSILON);
        assert!((momentum_score(35.0) - 22.0).abs() < f64::EPSILON);
        assert!((momentum_score(75.0) - 18.0).abs() < f64::EPSILON);
        assert!((momentum_score(75.0001) - 8.0).abs() < f64::EPSILON);
        assert!((momentum_score(30.0) - 12.0).abs() < f64::EPSILON);
        assert!((momentum_score(29.9999) - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn uptrend_zone_boundaries() {
        let t = ZoneTable::Uptrend;
        assert!((t.score(0.40) - 25.0).abs() < f64::EPSILON);
        assert!((t.score(0.75) - 25.0).abs() < f64::EPSILON);
        assert!((t.score(0.76) - 18.0).abs() < f64::EPSILON);
        assert!((t.score(0.90) - 18.0).abs() < f64::EPSILON);
        assert!((t.score(0.20) - 14.0).abs() < f64::EPSILON);
        assert!((t.score(0.39) - 14.0).abs() < f64::EPSILON);
        assert!((t.score(0.91) - 8.0).abs() < f64::EPSILON);
        assert!((t.score(0.19) - 3.0).abs() < f64::EPSILON);
        assert!((t.score(-0.5) - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn downtrend_zone_boundaries() {
        let t = ZoneTable::Downtrend;
        assert!((t.score(0.20) - 25.0).abs() < f64::EPSILON);
        assert!((t.score(0.50) - 25.0).abs() < f64::EPSILON);
        assert!((t.score(0.51) - 18.0).abs() < f64::EPSILON);
        assert!((t.score(0.70) - 18.0).abs() < f64::EPSILON);
        assert!((t.score(0.10) - 12.0).abs() < f64::EPSILON);
        assert!((t.score(0.19) - 12.0).abs() < f64::EPSILON);
        assert!((t.score(0.71) - 8.0).abs() < f64::EPSILON);
        assert!((t.score(0.90) - 8.0).abs() < f64::EPSILON);
        assert!((t.score(0.95) - 3.0).abs() < f64::EPSILON);
        assert!((t.score(0.05) - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn table_switches_with_macd_direction() {
        let mut row = make_row();
        // Position 0.3: 14 points under the uptrend table, 25 under downtrend.
        row.close = 96.0;
        row.volume = 0;

        row.macd = 1.0;
        row.macd_signal = 0.0;
        assert!((position_volume_score(&row) - 14.0).abs() < f64::EPSILON);

        row.macd = -1.0;
        assert!((position_volume_score(&row) - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn volume_surge_bonus() {
        let mut row = make_row();
        row.volume = 1500;
        row.vol_sma_20 = 1000.0;
        let with_surge = position_volume_score(&row);
        row.volume = 1499;
        let without = position_volume_score(&row);
        assert!((with_surge - without - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_width_channel_is_neutral() {
        let mut row = make_row();
        row.bb_upper = 100.0;
        row.bb_mid = 100.0;
        row.bb_lower = 100.0;
        row.volume = 0;
        // Neutral 0.5 lands in the uptrend 25-point zone, not a NaN.
        row.macd = 1.0;
        row.macd_signal = 0.0;
        assert!((position_volume_score(&row) - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn maximum_score_is_100() {
        let mut row = make_row();
        row.close = 105.0;
        row.sma_5 = 104.0;
        row.sma_20 = 100.0;
        row.sma_60 = Some(95.0);
        row.macd = 1.0;
        row.macd_signal = 0.5;
        row.rsi = 55.0;
        row.bb_upper = 110.0;
        row.bb_lower = 100.0; // position 0.5 → 25
        row.volume = 2000;
        row.vol_sma_20 = 1000.0;
        assert!((composite_score(&frame_of(row)) - 100.0).abs() < f64::EPSILON);
    }

    proptest! {
        #[test]
        fn composite_always_within_bounds(
            close in 1.0f64..1000.0,
            sma_5 in 1.0f64..1000.0,
            sma_20 in 1.0f64..1000.0,
            sma_60 in proptest::option::of(1.0f64..1000.0),
            macd in -50.0f64..50.0,
            macd_signal in -50.0f64..50.0,
            rsi in 0.0f64..100.0,
            bb_lower in 1.0f64..500.0,
            bb_width in 0.0f64..100.0,
            volume in 0i64..1_000_000,
            vol_sma in 0.0f64..1_000_000.0,
        ) {
            let mut row = make_row();
            row.close = close;
            row.sma_5 = sma_5;
            row.sma_20 = sma_20;
            row.sma_60 = sma_60;
            row.macd = macd;
            row.macd_signal = macd_signal;
            row.rsi = rsi;
            row.bb_lower = bb_lower;
            row.bb_mid = bb_lower + bb_width / 2.0;
            row.bb_upper = bb_lower + bb_width;
            row.volume = volume;
            row.vol_sma_20 = vol_sma;

            let score = composite_score(&frame_of(row));
            prop_assert!((0.0..=100.0).contains(&score), "score {} out of bounds", score);
        }
    }
}
