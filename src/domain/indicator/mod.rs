//! Technical indicators.
//!
//! - `sma`: ring-buffer simple moving average, shared with the simulator
//! - `ema`: recursive and bias-adjusted exponential averages
//! - `rsi`, `macd`: point-in-time momentum readings
//!
//! [`compute_indicators`] never fails. Each sub-computation returns a
//! [`Computed`] that says whether a real value was produced or the
//! documented default was substituted.

pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

use std::fmt;

use serde::Serialize;

use crate::domain::ohlcv::PriceSeries;
use crate::domain::rounding::{serialize_2dp, serialize_2dp_opt};

pub use ema::calculate_ema;
pub use sma::{rolling_means, simple_moving_average, RollingMean};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MacdSignal {
    Bullish,
    Bearish,
    Neutral,
}

impl fmt::Display for MacdSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MacdSignal::Bullish => write!(f, "bullish"),
            MacdSignal::Bearish => write!(f, "bearish"),
            MacdSignal::Neutral => write!(f, "neutral"),
        }
    }
}

/// Why an indicator fell back to its default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultReason {
    InsufficientData,
    InvalidPeriod,
    ZeroAverageLoss,
    NonFinite,
}

impl fmt::Display for DefaultReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultReason::InsufficientData => write!(f, "insufficient data"),
            DefaultReason::InvalidPeriod => write!(f, "invalid period"),
            DefaultReason::ZeroAverageLoss => write!(f, "zero average loss"),
            DefaultReason::NonFinite => write!(f, "non-finite result"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Computed<T> {
    Value(T),
    Default(T, DefaultReason),
}

impl<T> Computed<T> {
    pub fn value(self) -> T {
        match self {
            Computed::Value(v) | Computed::Default(v, _) => v,
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Computed::Default(..))
    }

    pub fn default_reason(&self) -> Option<DefaultReason> {
        match self {
            Computed::Value(_) => None,
            Computed::Default(_, reason) => Some(*reason),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorConfig {
    pub rsi_period: usize,
    pub ma_short: usize,
    pub ma_long: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        IndicatorConfig {
            rsi_period: rsi::DEFAULT_PERIOD,
            ma_short: 20,
            ma_long: 60,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndicatorResult {
    #[serde(serialize_with = "serialize_2dp")]
    pub rsi: f64,
    #[serde(rename = "macd")]
    pub macd_signal: MacdSignal,
    #[serde(serialize_with = "serialize_2dp_opt")]
    pub ma_short: Option<f64>,
    #[serde(serialize_with = "serialize_2dp_opt")]
    pub ma_long: Option<f64>,
}

impl Default for IndicatorResult {
    fn default() -> Self {
        IndicatorResult {
            rsi: rsi::NEUTRAL_RSI,
            macd_signal: MacdSignal::Neutral,
            ma_short: None,
            ma_long: None,
        }
    }
}

pub fn compute_indicators(series: &PriceSeries) -> IndicatorResult {
    compute_indicators_with(series, &IndicatorConfig::default())
}

pub fn compute_indicators_with(series: &PriceSeries, config: &IndicatorConfig) -> IndicatorResult {
    let closes = series.closes();

    let rsi = rsi::calculate_rsi(&closes, config.rsi_period);
    if let Some(reason) = rsi.default_reason() {
        tracing::warn!(bars = closes.len(), %reason, "RSI fell back to default");
    }

    let macd_signal = macd::macd_signal(&closes);
    if let Some(reason) = macd_signal.default_reason() {
        tracing::warn!(bars = closes.len(), %reason, "MACD signal fell back to neutral");
    }

    IndicatorResult {
        rsi: rsi.value(),
        macd_signal: macd_signal.value(),
        ma_short: finite(simple_moving_average(&closes, config.ma_short)),
        ma_long: finite(simple_moving_average(&closes, config.ma_long)),
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}
