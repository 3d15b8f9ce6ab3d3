//! Cash, position and equity tracking for one simulation run.

use chrono::NaiveDate;
use serde::Serialize;

use super::position::{ClosedTrade, ExitReason, Position};
use crate::domain::rounding::serialize_2dp;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquityPoint {
    pub date: NaiveDate,
    #[serde(serialize_with = "serialize_2dp")]
    pub equity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    pub cash: f64,
    pub initial_capital: f64,
    pub position: Position,
    pub closed_trades: Vec<ClosedTrade>,
    pub equity_curve: Vec<EquityPoint>,
}

impl Portfolio {
    pub fn new(initial_capital: f64) -> Self {
        Portfolio {
            cash: initial_capital,
            initial_capital,
            position: Position::Flat,
            closed_trades: Vec::new(),
            equity_curve: Vec::new(),
        }
    }

    /// Invest all cash at `price`. Does nothing unless flat.
    pub fn enter_long(&mut self, date: NaiveDate, price: f64) -> bool {
        if self.position.is_long() {
            return false;
        }
        let shares = self.cash / price;
        self.position = Position::Long {
            shares,
            entry_price: price,
            entry_date: date,
        };
        self.cash = 0.0;
        true
    }

    /// Sell the whole position at `price` and record the round trip.
    pub fn exit_long(
        &mut self,
        date: NaiveDate,
        price: f64,
        reason: ExitReason,
    ) -> Option<&ClosedTrade> {
        let Position::Long {
            shares,
            entry_price,
            entry_date,
        } = self.position
        else {
            return None;
        };

        self.cash = shares * price;
        self.position = Position::Flat;
        self.closed_trades.push(ClosedTrade {
            entry_date,
            exit_date: date,
            entry_price,
            exit_price: price,
            shares,
            pnl: price - entry_price,
            exit_reason: reason,
        });
        self.closed_trades.last()
    }

    pub fn total_equity(&self, price: f64) -> f64 {
        match self.position {
            Position::Flat => self.cash,
            Position::Long { .. } => self.cash + self.position.market_value(price),
        }
    }

    pub fn record_equity(&mut self, date: NaiveDate, equity: f64) {
        self.equity_curve.push(EquityPoint { date, equity });
    }
}
