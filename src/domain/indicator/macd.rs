//! MACD (Moving Average Convergence Divergence).
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of MACD Line
//! Histogram = MACD Line - Signal Line
//!
//! All three EMAs are the recursive kind seeded with the first observation,
//! so every bar has a value; the signal is only read once `MIN_BARS` closes
//! are available.

use super::ema::calculate_ema;
use super::{Computed, DefaultReason, MacdSignal};

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

/// Minimum number of closes before a signal is reported.
pub const MIN_BARS: usize = DEFAULT_SLOW;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdPoint {
    pub line: f64,
    pub signal: f64,
    pub histogram: f64,
}

pub fn calculate_macd(
    closes: &[f64],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> Vec<MacdPoint> {
    if fast == 0 || slow == 0 || signal_period == 0 {
        return Vec::new();
    }

    let ema_fast = calculate_ema(closes, fast);
    let ema_slow = calculate_ema(closes, slow);
    let line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();
    let signal = calculate_ema(&line, signal_period);

    line.iter()
        .zip(&signal)
        .map(|(&line, &signal)| MacdPoint {
            line,
            signal,
            histogram: line - signal,
        })
        .collect()
}

/// Compare the latest MACD line against its signal line.
pub fn macd_signal(closes: &[f64]) -> Computed<MacdSignal> {
    if closes.len() < MIN_BARS {
        return Computed::Default(MacdSignal::Neutral, DefaultReason::InsufficientData);
    }

    let points = calculate_macd(closes, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL);
    let Some(latest) = points.last().copied() else {
        return Computed::Default(MacdSignal::Neutral, DefaultReason::InsufficientData);
    };
    if !latest.line.is_finite() || !latest.signal.is_finite() {
        return Computed::Default(MacdSignal::Neutral, DefaultReason::NonFinite);
    }

    let signal = if latest.line > latest.signal {
        MacdSignal::Bullish
    } else if latest.line < latest.signal {
        MacdSignal::Bearish
    } else {
        MacdSignal::Neutral
    };
    Computed::Value(signal)
}
