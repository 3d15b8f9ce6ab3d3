//! Configuration loading and validation.
//!
//! Strategy values are range-checked after command-line overrides are
//! applied, so a flag and a config file key are held to the same bounds.

use crate::domain::error::EquantError;
use crate::domain::indicator::IndicatorConfig;
use crate::domain::strategy::CrossoverParams;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_LOOKBACK_DAYS: i64 = 365;
const LOOKBACK_DAYS_RANGE: (i64, i64) = (90, 1825);
const MA_SHORT_RANGE: (usize, usize) = (5, 100);
const MA_LONG_RANGE: (usize, usize) = (10, 300);

/// Read `[strategy]` into params, falling back to defaults for absent keys.
pub fn build_crossover_params(config: &dyn ConfigPort) -> Result<CrossoverParams, EquantError> {
    let defaults = CrossoverParams::default();
    Ok(CrossoverParams {
        initial_capital: config.get_double("strategy", "initial_capital", defaults.initial_capital),
        ma_short_window: window(config, "strategy", "ma_short", defaults.ma_short_window)?,
        ma_long_window: window(config, "strategy", "ma_long", defaults.ma_long_window)?,
        take_profit_pct: config.get_double("strategy", "take_profit_pct", defaults.take_profit_pct),
        stop_loss_pct: config.get_double("strategy", "stop_loss_pct", defaults.stop_loss_pct),
    })
}

/// Read `[indicators]`, falling back to defaults for absent keys.
pub fn build_indicator_config(config: &dyn ConfigPort) -> Result<IndicatorConfig, EquantError> {
    let defaults = IndicatorConfig::default();
    let indicators = IndicatorConfig {
        rsi_period: window(config, "indicators", "rsi_period", defaults.rsi_period)?,
        ma_short: window(config, "indicators", "ma_short", defaults.ma_short)?,
        ma_long: window(config, "indicators", "ma_long", defaults.ma_long)?,
    };

    for (key, value) in [
        ("rsi_period", indicators.rsi_period),
        ("ma_short", indicators.ma_short),
        ("ma_long", indicators.ma_long),
    ] {
        if value == 0 {
            return Err(invalid("indicators", key, format!("{key} must be at least 1")));
        }
    }
    Ok(indicators)
}

/// Validated `[data] lookback_days`.
pub fn lookback_days(config: &dyn ConfigPort) -> Result<i64, EquantError> {
    let days = config.get_int("data", "lookback_days", DEFAULT_LOOKBACK_DAYS);
    validate_lookback_days(days)?;
    Ok(days)
}

pub fn validate_lookback_days(days: i64) -> Result<(), EquantError> {
    let (min, max) = LOOKBACK_DAYS_RANGE;
    if !(min..=max).contains(&days) {
        return Err(invalid(
            "data",
            "lookback_days",
            format!("lookback_days must be between {min} and {max}"),
        ));
    }
    Ok(())
}

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), EquantError> {
    lookback_days(config).map(|_| ())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), EquantError> {
    let params = build_crossover_params(config)?;
    validate_strategy_params(&params)
}

pub fn validate_strategy_params(params: &CrossoverParams) -> Result<(), EquantError> {
    validate_initial_capital(params.initial_capital)?;
    validate_windows(params.ma_short_window, params.ma_long_window)?;
    validate_fraction("take_profit_pct", params.take_profit_pct)?;
    validate_fraction("stop_loss_pct", params.stop_loss_pct)?;
    Ok(())
}

fn validate_initial_capital(value: f64) -> Result<(), EquantError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(
            "strategy",
            "initial_capital",
            "initial_capital must be positive",
        ));
    }
    Ok(())
}

fn validate_windows(short: usize, long: usize) -> Result<(), EquantError> {
    let (short_min, short_max) = MA_SHORT_RANGE;
    if !(short_min..=short_max).contains(&short) {
        return Err(invalid(
            "strategy",
            "ma_short",
            format!("ma_short must be between {short_min} and {short_max}"),
        ));
    }
    let (long_min, long_max) = MA_LONG_RANGE;
    if !(long_min..=long_max).contains(&long) {
        return Err(invalid(
            "strategy",
            "ma_long",
            format!("ma_long must be between {long_min} and {long_max}"),
        ));
    }
    if short >= long {
        return Err(invalid(
            "strategy",
            "ma_short",
            "ma_short must be strictly less than ma_long",
        ));
    }
    Ok(())
}

fn validate_fraction(key: &str, value: f64) -> Result<(), EquantError> {
    if !(value > 0.0 && value < 1.0) {
        return Err(invalid(
            "strategy",
            key,
            format!("{key} must be a fraction between 0 and 1 (exclusive)"),
        ));
    }
    Ok(())
}

fn window(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: usize,
) -> Result<usize, EquantError> {
    let value = config.get_int(section, key, default as i64);
    usize::try_from(value)
        .map_err(|_| invalid(section, key, format!("{key} must be non-negative")))
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> EquantError {
    EquantError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}
