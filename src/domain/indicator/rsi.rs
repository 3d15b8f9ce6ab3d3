//! RSI (Relative Strength Index), latest value only.
//!
//! Average gain/loss use Wilder's smoothing (a = 1/period) in bias-adjusted
//! form and need at least `period` price changes.
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//!
//! A zero average loss leaves the ratio undefined; the result is then the
//! neutral default rather than 100.

use super::ema::adjusted_ewm_last;
use super::{Computed, DefaultReason};

pub const DEFAULT_PERIOD: usize = 14;
pub const NEUTRAL_RSI: f64 = 50.0;

pub fn calculate_rsi(closes: &[f64], period: usize) -> Computed<f64> {
    if period == 0 {
        return Computed::Default(NEUTRAL_RSI, DefaultReason::InvalidPeriod);
    }
    if closes.len() < period + 1 {
        return Computed::Default(NEUTRAL_RSI, DefaultReason::InsufficientData);
    }

    let (gains, losses): (Vec<f64>, Vec<f64>) = closes
        .windows(2)
        .map(|w| {
            let change = w[1] - w[0];
            (change.max(0.0), (-change).max(0.0))
        })
        .unzip();

    let alpha = 1.0 / period as f64;
    let (Some(avg_gain), Some(avg_loss)) = (
        adjusted_ewm_last(&gains, alpha, period),
        adjusted_ewm_last(&losses, alpha, period),
    ) else {
        return Computed::Default(NEUTRAL_RSI, DefaultReason::InsufficientData);
    };

    if avg_loss == 0.0 {
        return Computed::Default(NEUTRAL_RSI, DefaultReason::ZeroAverageLoss);
    }

    let rsi = 100.0 - 100.0 / (1.0 + avg_gain / avg_loss);
    if !rsi.is_finite() {
        return Computed::Default(NEUTRAL_RSI, DefaultReason::NonFinite);
    }
    Computed::Value(rsi.clamp(0.0, 100.0))
}
