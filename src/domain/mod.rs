//! Core domain types and logic.

pub mod ohlcv;
pub mod indicator;
pub mod score;
pub mod signal;
pub mod backtest;
pub mod error;
