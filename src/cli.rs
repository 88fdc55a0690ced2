//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::ini_config_adapter::IniConfigAdapter;
use crate::domain::backtest::{
    self as backtest_engine, BacktestConfig, TaxPolicy, DEFAULT_COMMISSION_RATE, DEFAULT_TAX_RATE,
};
use crate::domain::error::TascoreError;
use crate::domain::indicator::{calculate_all, IndicatorFrame};
use crate::domain::ohlcv::PriceBar;
use crate::domain::score::composite_score;
use crate::domain::signal::{generate_signals, Position, StrategyKind};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(name = "tascore", about = "Technical scoring and signal backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute the composite technical score for an instrument
    Score {
        #[arg(short, long)]
        data: PathBuf,
        #[arg(long)]
        code: String,
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
        #[arg(long)]
        json: bool,
    },
    /// Generate the daily position series for a strategy
    Signals {
        #[arg(short, long)]
        data: PathBuf,
        #[arg(long)]
        code: String,
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
        #[arg(short, long)]
        strategy: Option<StrategyKind>,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Backtest a strategy against price history
    Backtest {
        #[arg(short, long)]
        data: PathBuf,
        #[arg(long)]
        code: String,
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
        #[arg(short, long)]
        strategy: Option<StrategyKind>,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        capital: Option<f64>,
        #[arg(long)]
        json: bool,
    },
    /// List instruments available in a data directory
    ListCodes {
        #[arg(short, long)]
        data: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Score {
            data,
            code,
            start,
            end,
            json,
        } => run_score(&data, &code, start, end, json),
        Command::Signals {
            data,
            code,
            start,
            end,
            strategy,
            config,
            json,
        } => run_signals(&data, &code, start, end, strategy, config.as_ref(), json),
        Command::Backtest {
            data,
            code,
            start,
            end,
            strategy,
            config,
            capital,
            json,
        } => run_backtest(
            &data,
            &code,
            start,
            end,
            strategy,
            config.as_ref(),
            capital,
            json,
        ),
        Command::ListCodes { data } => run_list_codes(&data),
    }
}

fn load_config(path: &PathBuf) -> Result<IniConfigAdapter, ExitCode> {
    IniConfigAdapter::from_file(path).map_err(|e| {
        let err = TascoreError::ConfigParse {
            file: path.display().to_string(),
            reason: e,
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn load_frame(
    data: &PathBuf,
    code: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(Vec<PriceBar>, IndicatorFrame), ExitCode> {
    let adapter = CsvAdapter::new(data.clone());
    let bars = adapter.fetch_bars(code, start, end).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })?;
    eprintln!("Loaded {} bars for {}", bars.len(), code);

    let frame = calculate_all(&bars).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })?;
    Ok((bars, frame))
}

/// CLI flag wins, then the config's `[backtest] strategy` key, then the
/// composite default.
fn resolve_strategy(
    flag: Option<StrategyKind>,
    config: Option<&IniConfigAdapter>,
) -> Result<StrategyKind, TascoreError> {
    if let Some(kind) = flag {
        return Ok(kind);
    }
    match config.and_then(|c| c.get_string("backtest", "strategy")) {
        Some(name) => name
            .parse()
            .map_err(|reason| TascoreError::ConfigInvalid {
                section: "backtest".into(),
                key: "strategy".into(),
                reason,
            }),
        None => Ok(StrategyKind::Composite),
    }
}

/// The `--json` flag forces machine-readable output; without it the
/// config's `[output] json` key decides.
fn resolve_json(flag: bool, config: Option<&IniConfigAdapter>) -> bool {
    flag || config.is_some_and(|c| c.get_bool("output", "json", false))
}

/// Percentages in the config file are human-scale (0.015 means 0.015%);
/// the engine works in fractions.
pub fn build_backtest_config(
    config: Option<&IniConfigAdapter>,
    capital_override: Option<f64>,
) -> Result<BacktestConfig, TascoreError> {
    let mut bt = BacktestConfig::default();

    if let Some(adapter) = config {
        bt.initial_capital =
            adapter.get_double("backtest", "initial_capital", bt.initial_capital);
        bt.commission_rate =
            adapter.get_double("backtest", "commission_pct", DEFAULT_COMMISSION_RATE * 100.0)
                / 100.0;
        bt.tax_rate =
            adapter.get_double("backtest", "tax_pct", DEFAULT_TAX_RATE * 100.0) / 100.0;

        if let Some(policy) = adapter.get_string("backtest", "tax_policy") {
            bt.tax_policy = match policy.to_lowercase().as_str() {
                "every-trade" => TaxPolicy::EveryTradeEvent,
                "sell-only" => TaxPolicy::SellOnly,
                other => {
                    return Err(TascoreError::ConfigInvalid {
                        section: "backtest".into(),
                        key: "tax_policy".into(),
                        reason: format!(
                            "unknown policy '{other}' (expected every-trade or sell-only)"
                        ),
                    });
                }
            };
        }
    }

    if let Some(capital) = capital_override {
        bt.initial_capital = capital;
    }
    if bt.initial_capital <= 0.0 {
        return Err(TascoreError::ConfigInvalid {
            section: "backtest".into(),
            key: "initial_capital".into(),
            reason: "must be positive".into(),
        });
    }
    Ok(bt)
}

#[derive(Debug, Serialize)]
struct ScoreReport<'a> {
    code: &'a str,
    as_of: Option<NaiveDate>,
    bars: usize,
    scored_rows: usize,
    score: f64,
}

fn run_score(
    data: &PathBuf,
    code: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    json: bool,
) -> ExitCode {
    let (bars, frame) = match load_frame(data, code, start, end) {
        Ok(v) => v,
        Err(code) => return code,
    };
    match frame.latest() {
        Some(row) => {
            eprintln!(
                "Latest {} close {:.2}, RSI {:.1}, MACD {:.3}/{:.3}",
                row.date, row.close, row.rsi, row.macd, row.macd_signal
            );
        }
        None => {
            eprintln!("warning: not enough history to warm up indicators, score is neutral");
        }
    }

    let score = composite_score(&frame);

    if json {
        let report = ScoreReport {
            code,
            as_of: frame.latest().map(|r| r.date),
            bars: bars.len(),
            scored_rows: frame.len(),
            score,
        };
        print_json(&report)
    } else {
        println!("{}: {:.1}", code, score);
        ExitCode::SUCCESS
    }
}

fn run_signals(
    data: &PathBuf,
    code: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    strategy_flag: Option<StrategyKind>,
    config_path: Option<&PathBuf>,
    json: bool,
) -> ExitCode {
    let config = match config_path.map(load_config).transpose() {
        Ok(c) => c,
        Err(code) => return code,
    };
    let strategy = match resolve_strategy(strategy_flag, config.as_ref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let json = resolve_json(json, config.as_ref());

    let (_bars, frame) = match load_frame(data, code, start, end) {
        Ok(v) => v,
        Err(code) => return code,
    };

    eprintln!("Generating {} signals for {}", strategy, code);
    let signals = generate_signals(&frame, strategy);

    if json {
        print_json(&signals)
    } else {
        for signal in &signals {
            let state = match signal.position {
                Position::Held => "held",
                Position::Flat => "flat",
            };
            println!("{} {}", signal.date, state);
        }
        ExitCode::SUCCESS
    }
}

fn run_backtest(
    data: &PathBuf,
    code: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    strategy_flag: Option<StrategyKind>,
    config_path: Option<&PathBuf>,
    capital: Option<f64>,
    json: bool,
) -> ExitCode {
    let config = match config_path.map(load_config).transpose() {
        Ok(c) => c,
        Err(code) => return code,
    };
    let strategy = match resolve_strategy(strategy_flag, config.as_ref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let bt_config = match build_backtest_config(config.as_ref(), capital) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let json = resolve_json(json, config.as_ref());

    let (bars, frame) = match load_frame(data, code, start, end) {
        Ok(v) => v,
        Err(code) => return code,
    };
    let signals = generate_signals(&frame, strategy);

    // The frame is the tail of the bar series (warm-up rows dropped), so the
    // simulated window is that same tail.
    let scored_bars = &bars[bars.len() - frame.len()..];

    eprintln!(
        "Running backtest: {} with {}, {} sessions",
        code,
        strategy,
        scored_bars.len()
    );

    let result = match backtest_engine::run_backtest(scored_bars, &signals, &bt_config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("\n=== Backtest Results ===");
    eprintln!("Total Return:     {:.2}%", result.total_return_pct);
    eprintln!("Buy & Hold:       {:.2}%", result.buy_hold_return_pct);
    eprintln!("Max Drawdown:     {:.2}%", result.max_drawdown_pct);
    eprintln!("Win Rate:         {:.1}%", result.win_rate_pct);
    eprintln!("Sharpe Ratio:     {:.2}", result.sharpe_ratio);
    eprintln!("Trade Days:       {}", result.trade_days);
    eprintln!("Final Capital:    {:.0}", result.final_capital);

    if json {
        print_json(&result)
    } else {
        println!(
            "{} {} return {:.2}% (buy-hold {:.2}%)",
            code, strategy, result.total_return_pct, result.buy_hold_return_pct
        );
        ExitCode::SUCCESS
    }
}

fn run_list_codes(data: &PathBuf) -> ExitCode {
    let adapter = CsvAdapter::new(data.clone());
    match adapter.list_codes() {
        Ok(codes) => {
            for code in codes {
                println!("{code}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(out) => {
            println!("{out}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize output: {e}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_flag_overrides_config() {
        let config =
            IniConfigAdapter::from_string("[backtest]\nstrategy = momentum-gauge\n").unwrap();
        let kind =
            resolve_strategy(Some(StrategyKind::TrendCross), Some(&config)).unwrap();
        assert_eq!(kind, StrategyKind::TrendCross);
    }

    #[test]
    fn strategy_falls_back_to_config_then_default() {
        let config =
            IniConfigAdapter::from_string("[backtest]\nstrategy = momentum-gauge\n").unwrap();
        assert_eq!(
            resolve_strategy(None, Some(&config)).unwrap(),
            StrategyKind::MomentumGauge
        );
        assert_eq!(resolve_strategy(None, None).unwrap(), StrategyKind::Composite);
    }

    #[test]
    fn bad_config_strategy_is_rejected() {
        let config = IniConfigAdapter::from_string("[backtest]\nstrategy = martingale\n").unwrap();
        assert!(matches!(
            resolve_strategy(None, Some(&config)),
            Err(TascoreError::ConfigInvalid { .. })
        ));
    }

    #[test]
    fn json_toggle_from_flag_or_config() {
        let config = IniConfigAdapter::from_string("[output]\njson = yes\n").unwrap();
        assert!(resolve_json(false, Some(&config)));
        assert!(resolve_json(true, None));
        assert!(!resolve_json(false, None));

        let off = IniConfigAdapter::from_string("[output]\njson = no\n").unwrap();
        assert!(!resolve_json(false, Some(&off)));
        assert!(resolve_json(true, Some(&off)));
    }

    #[test]
    fn backtest_config_defaults_without_file() {
        let bt = build_backtest_config(None, None).unwrap();
        assert_eq!(bt.initial_capital, 10_000_000.0);
        assert_eq!(bt.commission_rate, DEFAULT_COMMISSION_RATE);
        assert_eq!(bt.tax_rate, DEFAULT_TAX_RATE);
        assert_eq!(bt.tax_policy, TaxPolicy::EveryTradeEvent);
    }

    #[test]
    fn backtest_config_converts_percentages() {
        let config = IniConfigAdapter::from_string(
            "[backtest]\ninitial_capital = 5000000\ncommission_pct = 0.1\ntax_pct = 0.3\ntax_policy = sell-only\n",
        )
        .unwrap();
        let bt = build_backtest_config(Some(&config), None).unwrap();
        assert_eq!(bt.initial_capital, 5_000_000.0);
        assert!((bt.commission_rate - 0.001).abs() < 1e-12);
        assert!((bt.tax_rate - 0.003).abs() < 1e-12);
        assert_eq!(bt.tax_policy, TaxPolicy::SellOnly);
    }

    #[test]
    fn backtest_config_capital_override_wins() {
        let config =
            IniConfigAdapter::from_string("[backtest]\ninitial_capital = 5000000\n").unwrap();
        let bt = build_backtest_config(Some(&config), Some(1_000_000.0)).unwrap();
        assert_eq!(bt.initial_capital, 1_000_000.0);
    }

    #[test]
    fn backtest_config_rejects_bad_values() {
        let config =
            IniConfigAdapter::from_string("[backtest]\ntax_policy = on-tuesdays\n").unwrap();
        assert!(build_backtest_config(Some(&config), None).is_err());

        assert!(build_backtest_config(None, Some(-1.0)).is_err());
    }
}
