//! Core domain types and logic.

pub mod ohlcv;
pub mod position;
pub mod portfolio;
pub mod indicator;
pub mod backtest;
pub mod metrics;
pub mod strategy;
pub mod snapshot;
pub mod rounding;
pub mod config_validation;
pub mod error;
