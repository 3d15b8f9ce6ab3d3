//! Performance metrics derived from an equity curve and its closed trades.

use serde::Serialize;

use super::portfolio::EquityPoint;
use super::position::ClosedTrade;
use crate::domain::rounding::{serialize_2dp, serialize_3dp_opt};

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    #[serde(serialize_with = "serialize_2dp")]
    pub total_return_pct: f64,
    #[serde(serialize_with = "serialize_2dp")]
    pub max_drawdown_pct: f64,
    #[serde(serialize_with = "serialize_3dp_opt")]
    pub sharpe_ratio: Option<f64>,
    pub num_trades: usize,
    #[serde(serialize_with = "serialize_2dp")]
    pub win_rate_pct: f64,
}

impl Metrics {
    /// Never fails; undefined statistics come back as `None` or zero.
    pub fn compute(
        initial_capital: f64,
        equity_curve: &[EquityPoint],
        trades: &[ClosedTrade],
    ) -> Self {
        let final_equity = equity_curve
            .last()
            .map(|p| p.equity)
            .unwrap_or(initial_capital);

        let total_return_pct = if initial_capital != 0.0 {
            (final_equity - initial_capital) / initial_capital * 100.0
        } else {
            0.0
        };

        let num_trades = trades.len();
        let wins = trades.iter().filter(|t| t.pnl > 0.0).count();
        let win_rate_pct = if num_trades > 0 {
            wins as f64 / num_trades as f64 * 100.0
        } else {
            0.0
        };

        Metrics {
            total_return_pct,
            max_drawdown_pct: compute_max_drawdown_pct(equity_curve),
            sharpe_ratio: compute_sharpe(equity_curve),
            num_trades,
            win_rate_pct,
        }
    }
}

/// Deepest decline from the running peak, as a non-positive percentage.
fn compute_max_drawdown_pct(equity_curve: &[EquityPoint]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut max_dd = 0.0_f64;

    for point in equity_curve {
        peak = peak.max(point.equity);
        if peak > 0.0 {
            let dd = (point.equity - peak) / peak * 100.0;
            if dd < max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}

/// Annualised Sharpe ratio of day-over-day returns using the sample
/// standard deviation. `None` when it cannot be defined.
fn compute_sharpe(equity_curve: &[EquityPoint]) -> Option<f64> {
    let returns: Vec<f64> = equity_curve
        .windows(2)
        .map(|w| (w[1].equity - w[0].equity) / w[0].equity)
        .collect();

    if returns.len() < 2 || returns.iter().any(|r| !r.is_finite()) {
        return None;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let stddev = variance.sqrt();

    if stddev == 0.0 || !stddev.is_finite() {
        return None;
    }
    Some(mean / stddev * TRADING_DAYS_PER_YEAR.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::position::ExitReason;
    use chrono::NaiveDate;

    fn make_equity_curve(values: &[f64]) -> Vec<EquityPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| EquityPoint {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + chrono::Duration::days(i as i64),
                equity: v,
            })
            .collect()
    }

    fn make_trade(pnl: f64) -> ClosedTrade {
        let entry_date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        ClosedTrade {
            entry_date,
            exit_date: entry_date + chrono::Duration::days(5),
            entry_price: 100.0,
            exit_price: 100.0 + pnl,
            shares: 10.0,
            pnl,
            exit_reason: ExitReason::DeathCross,
        }
    }

    #[test]
    fn metrics_empty_inputs() {
        let metrics = Metrics::compute(100_000.0, &[], &[]);
        assert_eq!(metrics.total_return_pct, 0.0);
        assert_eq!(metrics.max_drawdown_pct, 0.0);
        assert_eq!(metrics.sharpe_ratio, None);
        assert_eq!(metrics.num_trades, 0);
        assert_eq!(metrics.win_rate_pct, 0.0);
    }

    #[test]
    fn metrics_total_return_positive() {
        let curve = make_equity_curve(&[100_000.0, 110_000.0]);
        let metrics = Metrics::compute(100_000.0, &curve, &[]);
        assert!((metrics.total_return_pct - 10.0).abs() < 1e-9);
    }

    #[test]
    fn metrics_total_return_negative() {
        let curve = make_equity_curve(&[100_000.0, 90_000.0]);
        let metrics = Metrics::compute(100_000.0, &curve, &[]);
        assert!((metrics.total_return_pct + 10.0).abs() < 1e-9);
    }

    #[test]
    fn metrics_total_return_uses_initial_capital_not_first_point() {
        let curve = make_equity_curve(&[105_000.0, 110_000.0]);
        let metrics = Metrics::compute(100_000.0, &curve, &[]);
        assert!((metrics.total_return_pct - 10.0).abs() < 1e-9);
    }

    #[test]
    fn metrics_max_drawdown() {
        let curve = make_equity_curve(&[100.0, 110.0, 90.0, 95.0, 80.0, 100.0]);
        let dd = compute_max_drawdown_pct(&curve);
        assert!((dd - (80.0 - 110.0) / 110.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn metrics_max_drawdown_zero_when_rising() {
        let curve = make_equity_curve(&[100.0, 101.0, 101.0, 105.0]);
        assert_eq!(compute_max_drawdown_pct(&curve), 0.0);
    }

    #[test]
    fn metrics_sharpe_needs_two_returns() {
        let curve = make_equity_curve(&[100.0, 110.0]);
        assert_eq!(compute_sharpe(&curve), None);
    }

    #[test]
    fn metrics_sharpe_zero_stddev_is_none() {
        let curve = make_equity_curve(&[100.0, 100.0, 100.0, 100.0]);
        assert_eq!(compute_sharpe(&curve), None);
    }

    #[test]
    fn metrics_sharpe_known_value() {
        // returns: +10%, -10%, +10%
        let curve = make_equity_curve(&[100.0, 110.0, 99.0, 108.9]);
        let returns = [0.1, -0.1, 0.1];
        let mean = (0.1 - 0.1 + 0.1) / 3.0;
        let var = returns.iter().map(|r: &f64| (r - mean).powi(2)).sum::<f64>() / 2.0;
        let expected = mean / var.sqrt() * 252.0_f64.sqrt();
        let sharpe = compute_sharpe(&curve).unwrap();
        assert!((sharpe - expected).abs() < 1e-9);
    }

    #[test]
    fn metrics_sharpe_positive_for_steady_gains() {
        let values: Vec<f64> = (0..253)
            .map(|i| 100_000.0 * (1.0 + 0.001 * i as f64 + 0.0005 * (i % 3) as f64))
            .collect();
        let curve = make_equity_curve(&values);
        assert!(compute_sharpe(&curve).unwrap() > 0.0);
    }

    #[test]
    fn metrics_win_rate() {
        let trades = vec![make_trade(10.0), make_trade(-5.0), make_trade(20.0), make_trade(0.0)];
        let curve = make_equity_curve(&[100_000.0, 100_250.0]);
        let metrics = Metrics::compute(100_000.0, &curve, &trades);
        assert_eq!(metrics.num_trades, 4);
        assert!((metrics.win_rate_pct - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn metrics_serialize_rounded() {
        let metrics = Metrics {
            total_return_pct: 8.3249,
            max_drawdown_pct: -12.5012,
            sharpe_ratio: Some(1.12345),
            num_trades: 14,
            win_rate_pct: 57.142857,
        };
        let json = serde_json::to_value(&metrics).unwrap();
        assert_eq!(json["total_return_pct"], 8.32);
        assert_eq!(json["max_drawdown_pct"], -12.5);
        assert_eq!(json["sharpe_ratio"], 1.123);
        assert_eq!(json["num_trades"], 14);
        assert_eq!(json["win_rate_pct"], 57.14);
    }

    #[test]
    fn metrics_serialize_null_sharpe() {
        let metrics = Metrics::compute(100_000.0, &[], &[]);
        let json = serde_json::to_value(&metrics).unwrap();
        assert!(json["sharpe_ratio"].is_null());
    }
}
