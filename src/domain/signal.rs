//! Buy/hold/sell position signal generation.
//!
//! One bit of state per instrument: held or flat. Each frame row is folded
//! through an explicit transition function; when neither the entry nor the
//! exit predicate fires, the previous state carries forward unchanged.
//! Predicates read the current row only, never a later one.

use crate::domain::indicator::{IndicatorFrame, IndicatorRow};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StrategyKind {
    /// Enter below RSI 40, exit above 60. Looser than the classical 30/70
    /// thresholds so trends are entered earlier and traded more often.
    MomentumGauge,
    /// Follow the MACD cross: enter bullish, exit bearish.
    TrendCross,
    /// Conjunctive entry (RSI < 50 and bullish cross), disjunctive exit
    /// (RSI > 60 or bearish cross). Fewer false entries, eager exits.
    Composite,
}

impl StrategyKind {
    fn entry(self, row: &IndicatorRow) -> bool {
        match self {
            StrategyKind::MomentumGauge => row.rsi < 40.0,
            StrategyKind::TrendCross => row.macd > row.macd_signal,
            StrategyKind::Composite => row.rsi < 50.0 && row.macd > row.macd_signal,
        }
    }

    fn exit(self, row: &IndicatorRow) -> bool {
        match self {
            StrategyKind::MomentumGauge => row.rsi > 60.0,
            StrategyKind::TrendCross => row.macd < row.macd_signal,
            StrategyKind::Composite => row.rsi > 60.0 || row.macd < row.macd_signal,
        }
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "momentum-gauge" => Ok(StrategyKind::MomentumGauge),
            "trend-cross" => Ok(StrategyKind::TrendCross),
            "composite" => Ok(StrategyKind::Composite),
            other => Err(format!(
                "unknown strategy '{other}' (expected momentum-gauge, trend-cross, or composite)"
            )),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StrategyKind::MomentumGauge => "momentum-gauge",
            StrategyKind::TrendCross => "trend-cross",
            StrategyKind::Composite => "composite",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Position {
    Flat,
    Held,
}

impl Position {
    /// Fraction of capital at work: 0 flat, 1 held.
    pub fn exposure(self) -> f64 {
        match self {
            Position::Flat => 0.0,
            Position::Held => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SignalPoint {
    pub date: NaiveDate,
    pub position: Position,
}

/// The two-state transition: flat enters on the entry predicate, held exits
/// on the exit predicate, anything else is sticky.
fn transition(state: Position, kind: StrategyKind, row: &IndicatorRow) -> Position {
    match state {
        Position::Flat if kind.entry(row) => Position::Held,
        Position::Held if kind.exit(row) => Position::Flat,
        state => state,
    }
}

/// Fold the frame through the strategy's state machine, starting flat.
pub fn generate_signals(frame: &IndicatorFrame, kind: StrategyKind) -> Vec<SignalPoint> {
    let mut state = Position::Flat;
    frame
        .rows
        .iter()
        .map(|row| {
            state = transition(state, kind, row);
            SignalPoint {
                date: row.date,
                position: state,
            }
        })
        .collect()
}
