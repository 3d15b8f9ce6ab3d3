//! Position state and closed trades for a single-asset, long-only run.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

use crate::domain::rounding::serialize_2dp;

/// Holding state inside one simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Position {
    #[default]
    Flat,
    Long {
        shares: f64,
        entry_price: f64,
        entry_date: NaiveDate,
    },
}

impl Position {
    pub fn is_long(&self) -> bool {
        matches!(self, Position::Long { .. })
    }

    /// Market value at `price`; zero when flat.
    pub fn market_value(&self, price: f64) -> f64 {
        match self {
            Position::Flat => 0.0,
            Position::Long { shares, .. } => shares * price,
        }
    }

    /// Fractional return since entry, `None` when flat.
    pub fn unrealized_return(&self, price: f64) -> Option<f64> {
        match self {
            Position::Flat => None,
            Position::Long { entry_price, .. } => Some(price / entry_price - 1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    DeathCross,
    TakeProfit,
    StopLoss,
    EndOfData,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::DeathCross => write!(f, "death cross"),
            ExitReason::TakeProfit => write!(f, "take profit"),
            ExitReason::StopLoss => write!(f, "stop loss"),
            ExitReason::EndOfData => write!(f, "end of data"),
        }
    }
}

/// One completed buy/sell round trip. `pnl` is per share.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClosedTrade {
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    #[serde(serialize_with = "serialize_2dp")]
    pub entry_price: f64,
    #[serde(serialize_with = "serialize_2dp")]
    pub exit_price: f64,
    pub shares: f64,
    #[serde(serialize_with = "serialize_2dp")]
    pub pnl: f64,
    pub exit_reason: ExitReason,
}

impl ClosedTrade {
    /// Realised profit for the whole position.
    pub fn profit(&self) -> f64 {
        self.shares * self.pnl
    }
}
