//! Moving-average crossover simulation.
//!
//! The price series is reduced to crossover samples (bars where both rolling
//! means are defined) and scanned as adjacent (previous, current) pairs. The
//! first sample is paired with a neutral seed in which both means are equal,
//! so a short mean already above the long mean on the first bar counts as a
//! golden cross.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::error::EquantError;
use crate::domain::indicator::RollingMean;
use crate::domain::metrics::Metrics;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::portfolio::{EquityPoint, Portfolio};
use crate::domain::position::{ClosedTrade, ExitReason, Position};
use crate::domain::strategy::CrossoverParams;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestResult {
    #[serde(rename = "strategy")]
    pub strategy_label: String,
    pub metrics: Metrics,
    pub equity_curve: Vec<EquityPoint>,
    pub trades: Vec<ClosedTrade>,
}

/// One bar of the simulation window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossoverSample {
    pub date: NaiveDate,
    pub price: f64,
    pub short: f64,
    pub long: f64,
}

impl CrossoverSample {
    fn neutral_seed(&self) -> Self {
        CrossoverSample {
            short: self.long,
            ..*self
        }
    }
}

fn golden_cross(prev: &CrossoverSample, cur: &CrossoverSample) -> bool {
    prev.short <= prev.long && cur.short > cur.long
}

fn death_cross(prev: &CrossoverSample, cur: &CrossoverSample) -> bool {
    prev.short >= prev.long && cur.short < cur.long
}

/// Bars of `series` on which both rolling means are defined, in date order.
pub fn crossover_samples(
    series: &PriceSeries,
    short_window: usize,
    long_window: usize,
) -> Vec<CrossoverSample> {
    let mut short_mean = RollingMean::new(short_window);
    let mut long_mean = RollingMean::new(long_window);

    series
        .bars()
        .iter()
        .filter_map(|bar| {
            let short = short_mean.push(bar.close);
            let long = long_mean.push(bar.close);
            Some(CrossoverSample {
                date: bar.date,
                price: bar.close,
                short: short?,
                long: long?,
            })
        })
        .collect()
}

pub fn run_backtest(
    series: &PriceSeries,
    params: &CrossoverParams,
) -> Result<BacktestResult, EquantError> {
    params.validate()?;
    if series.len() < params.min_bars() {
        return Err(EquantError::InsufficientData {
            bars: series.len(),
            minimum: params.min_bars(),
        });
    }

    let samples = crossover_samples(series, params.ma_short_window, params.ma_long_window);
    let seed = samples.first().map(CrossoverSample::neutral_seed);

    let portfolio = seed
        .iter()
        .chain(samples.iter())
        .zip(samples.iter())
        .fold(Portfolio::new(params.initial_capital), |portfolio, (prev, cur)| {
            step(portfolio, prev, cur, params)
        });
    let portfolio = liquidate(portfolio, samples.last());

    let metrics = Metrics::compute(
        params.initial_capital,
        &portfolio.equity_curve,
        &portfolio.closed_trades,
    );

    tracing::info!(
        strategy = %params.label(),
        bars = series.len(),
        window = samples.len(),
        trades = metrics.num_trades,
        total_return_pct = metrics.total_return_pct,
        "backtest finished"
    );

    Ok(BacktestResult {
        strategy_label: params.label(),
        metrics,
        equity_curve: portfolio.equity_curve,
        trades: portfolio.closed_trades,
    })
}

/// Apply one bar: at most one of entry or exit, then mark equity.
fn step(
    mut portfolio: Portfolio,
    prev: &CrossoverSample,
    cur: &CrossoverSample,
    params: &CrossoverParams,
) -> Portfolio {
    match portfolio.position {
        Position::Flat => {
            if golden_cross(prev, cur)
                && cur.price > 0.0
                && portfolio.enter_long(cur.date, cur.price)
            {
                tracing::debug!(date = %cur.date, price = cur.price, "enter long on golden cross");
            }
        }
        Position::Long { .. } => {
            if let Some(reason) = exit_reason(&portfolio.position, prev, cur, params) {
                if let Some(trade) = portfolio.exit_long(cur.date, cur.price, reason) {
                    tracing::debug!(
                        date = %cur.date,
                        price = cur.price,
                        pnl = trade.pnl,
                        %reason,
                        "exit long"
                    );
                }
            }
        }
    }

    let equity = portfolio.total_equity(cur.price);
    portfolio.record_equity(cur.date, equity);
    portfolio
}

fn exit_reason(
    position: &Position,
    prev: &CrossoverSample,
    cur: &CrossoverSample,
    params: &CrossoverParams,
) -> Option<ExitReason> {
    let change = position.unrealized_return(cur.price)?;
    if death_cross(prev, cur) {
        Some(ExitReason::DeathCross)
    } else if change >= params.take_profit_pct {
        Some(ExitReason::TakeProfit)
    } else if change <= -params.stop_loss_pct {
        Some(ExitReason::StopLoss)
    } else {
        None
    }
}

/// Close any open position at the final bar. The equity curve already
/// carries the marked value for that bar.
fn liquidate(mut portfolio: Portfolio, last: Option<&CrossoverSample>) -> Portfolio {
    if let (Some(last), true) = (last, portfolio.position.is_long()) {
        if let Some(trade) = portfolio.exit_long(last.date, last.price, ExitReason::EndOfData) {
            tracing::debug!(
                date = %last.date,
                price = last.price,
                pnl = trade.pnl,
                "liquidated at end of data"
            );
        }
    }
    portfolio
}
