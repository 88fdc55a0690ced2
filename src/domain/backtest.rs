//! Signal replay against a price series with trading frictions.
//!
//! The realized return on day t uses the position decided on day t-1 applied
//! to the close-to-close change of day t. This one-bar lag is mandatory: a
//! position cannot react to the same move that produced its signal.
//!
//! Costs are charged on trade-event days only (days where the position
//! differs from the previous day): a one-way commission, plus a transaction
//! tax per the configured [`TaxPolicy`].

use crate::domain::error::TascoreError;
use crate::domain::ohlcv::{validate_bars, PriceBar};
use crate::domain::signal::{Position, SignalPoint};
use chrono::NaiveDate;
use serde::Serialize;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// 0.015% one-way brokerage commission.
pub const DEFAULT_COMMISSION_RATE: f64 = 0.00015;
/// 0.18% transaction tax.
pub const DEFAULT_TAX_RATE: f64 = 0.0018;

/// When the transaction tax is charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TaxPolicy {
    /// On every day the position changes, entry and exit alike.
    EveryTradeEvent,
    /// Only when the position is closed (the sell side of a round trip).
    SellOnly,
}

#[derive(Debug, Clone)]
pub struct BacktestConfig {
    pub initial_capital: f64,
    pub commission_rate: f64,
    pub tax_rate: f64,
    pub tax_policy: TaxPolicy,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            initial_capital: 10_000_000.0,
            commission_rate: DEFAULT_COMMISSION_RATE,
            tax_rate: DEFAULT_TAX_RATE,
            tax_policy: TaxPolicy::EveryTradeEvent,
        }
    }
}

/// One day of the simulation trace.
#[derive(Debug, Clone, Serialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub close: f64,
    pub exposure: f64,
    pub strategy_return: f64,
    pub cum_return: f64,
    pub capital: f64,
    pub buy_hold_cum_return: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BacktestResult {
    pub total_return_pct: f64,
    pub max_drawdown_pct: f64,
    /// Positive-return days as a fraction of days with any nonzero strategy
    /// return. Zero-exposure days do not dilute the rate.
    pub win_rate_pct: f64,
    pub sharpe_ratio: f64,
    pub final_capital: f64,
    pub buy_hold_return_pct: f64,
    pub buy_hold_final_capital: f64,
    pub trade_days: usize,
    pub daily: Vec<DailyRecord>,
}

/// Replay `signals` against `bars` (paired by index, one signal per bar).
///
/// A signal series that never trades is valid input and yields a flat equity
/// curve; a price series shorter than 2 sessions cannot produce a return and
/// is rejected.
pub fn run_backtest(
    bars: &[PriceBar],
    signals: &[SignalPoint],
    config: &BacktestConfig,
) -> Result<BacktestResult, TascoreError> {
    validate_bars(bars)?;
    if bars.len() != signals.len() {
        return Err(TascoreError::SignalMismatch {
            bars: bars.len(),
            signals: signals.len(),
        });
    }
    if bars.len() < 2 {
        return Err(TascoreError::InsufficientData {
            have: bars.len(),
            need: 2,
        });
    }

    let n = bars.len();
    let mut strategy_returns = vec![0.0; n];
    let mut market_returns = vec![0.0; n];
    let mut trade_days = 0usize;

    for t in 1..n {
        let pct = bars[t].close / bars[t - 1].close - 1.0;
        market_returns[t] = pct;

        // Yesterday's position earns today's move.
        let mut r = signals[t - 1].position.exposure() * pct;

        if signals[t].position != signals[t - 1].position {
            trade_days += 1;
            r -= config.commission_rate;
            let taxed = match config.tax_policy {
                TaxPolicy::EveryTradeEvent => true,
                TaxPolicy::SellOnly => signals[t].position == Position::Flat,
            };
            if taxed {
                r -= config.tax_rate;
            }
        }
        strategy_returns[t] = r;
    }

    let mut daily = Vec::with_capacity(n);
    let mut cum = 1.0;
    let mut bh_cum = 1.0;
    let mut peak = 1.0;
    let mut max_dd = 0.0f64;

    for t in 0..n {
        if t > 0 {
            cum *= 1.0 + strategy_returns[t];
            bh_cum *= 1.0 + market_returns[t];
        }
        if cum > peak {
            peak = cum;
        }
        let dd = cum / peak - 1.0;
        if dd < max_dd {
            max_dd = dd;
        }

        daily.push(DailyRecord {
            date: bars[t].date,
            close: bars[t].close,
            exposure: signals[t].position.exposure(),
            strategy_return: strategy_returns[t],
            cum_return: cum,
            capital: cum * config.initial_capital,
            buy_hold_cum_return: bh_cum,
        });
    }

    Ok(BacktestResult {
        total_return_pct: (cum - 1.0) * 100.0,
        max_drawdown_pct: max_dd * 100.0,
        win_rate_pct: win_rate(&strategy_returns) * 100.0,
        // Day 0 has no realizable return and is excluded from the ratio.
        sharpe_ratio: sharpe(&strategy_returns[1..]),
        final_capital: cum * config.initial_capital,
        buy_hold_return_pct: (bh_cum - 1.0) * 100.0,
        buy_hold_final_capital: bh_cum * config.initial_capital,
        trade_days,
        daily,
    })
}

/// Positive-return days over days with any nonzero return; 0 with no
/// active days.
fn win_rate(returns: &[f64]) -> f64 {
    let active = returns.iter().filter(|r| **r != 0.0).count();
    if active == 0 {
        return 0.0;
    }
    let wins = returns.iter().filter(|r| **r > 0.0).count();
    wins as f64 / active as f64
}

/// Annualized Sharpe ratio at a zero risk-free rate; 0 when the return
/// series has no variance.
fn sharpe(returns: &[f64]) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }
    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let stddev = variance.sqrt();
    if stddev == 0.0 {
        0.0
    } else {
        mean / stddev * TRADING_DAYS_PER_YEAR.sqrt()
    }
}
