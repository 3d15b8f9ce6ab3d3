//! End-to-end tests over the indicator engine, simulator and metrics.

mod common;

use approx::assert_relative_eq;
use common::*;
use equant::domain::backtest::run_backtest;
use equant::domain::error::EquantError;
use equant::domain::indicator::rsi::calculate_rsi;
use equant::domain::indicator::{
    compute_indicators, rolling_means, simple_moving_average, DefaultReason, MacdSignal,
};
use equant::domain::position::ExitReason;
use proptest::prelude::*;

mod indicator_engine {
    use super::*;

    #[test]
    fn short_series_falls_back_to_defaults() {
        let result = compute_indicators(&make_series(&monotonic_closes(10)));
        assert_eq!(result.rsi, 50.0);
        assert_eq!(result.macd_signal, MacdSignal::Neutral);
        assert_eq!(result.ma_short, None);
        assert_eq!(result.ma_long, None);
    }

    #[test]
    fn rsi_needs_period_plus_one_bars() {
        let closes = monotonic_closes(14);
        let rsi = calculate_rsi(&closes, 14);
        assert_eq!(rsi.value(), 50.0);
        assert_eq!(rsi.default_reason(), Some(DefaultReason::InsufficientData));
    }

    #[test]
    fn rising_series_reports_bullish_and_ordered_means() {
        let result = compute_indicators(&make_series(&monotonic_closes(90)));
        assert_eq!(result.macd_signal, MacdSignal::Bullish);
        let short = result.ma_short.unwrap();
        let long = result.ma_long.unwrap();
        assert!(short > long);
    }

    #[test]
    fn mixed_series_rsi_between_bounds() {
        let closes: Vec<f64> = (0..60)
            .map(|i| 100.0 + if i % 3 == 0 { -1.5 } else { 1.0 } * i as f64 * 0.1)
            .collect();
        let rsi = calculate_rsi(&closes, 14);
        assert!(!rsi.is_default());
        assert!(rsi.value() > 0.0 && rsi.value() < 100.0);
    }

    #[test]
    fn sma_window_boundary() {
        let values = [10.0, 20.0, 30.0, 40.0];
        assert_eq!(simple_moving_average(&values[..3], 4), None);
        assert_relative_eq!(simple_moving_average(&values, 4).unwrap(), 25.0);
    }
}

mod strategy_simulator {
    use super::*;

    #[test]
    fn monotonic_series_single_trade_no_stop_loss() {
        let series = make_series(&monotonic_closes(70));
        let result = run_backtest(&series, &make_params(5, 20, 0.15, 0.08)).unwrap();

        assert_eq!(result.metrics.num_trades, 1);
        assert_ne!(result.trades[0].exit_reason, ExitReason::StopLoss);
        assert!(result.metrics.total_return_pct > 0.0);
        assert_eq!(result.strategy_label, "MA-Crossover (5/20)");
    }

    #[test]
    fn sharp_drop_after_entry_is_one_losing_trade() {
        let mut closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        closes.extend((0..20).map(|i| 100.0 - 0.5 * i as f64));
        let result = run_backtest(&make_series(&closes), &make_params(5, 20, 0.5, 0.08)).unwrap();

        assert_eq!(result.trades.len(), 1);
        let trade = &result.trades[0];
        assert_eq!(trade.exit_reason, ExitReason::StopLoss);
        assert!(trade.pnl < 0.0);
        assert_eq!(result.metrics.win_rate_pct, 0.0);

        let exit_equity = result
            .equity_curve
            .iter()
            .find(|p| p.date == trade.exit_date)
            .unwrap()
            .equity;
        assert_relative_eq!(exit_equity, trade.shares * trade.exit_price, max_relative = 1e-12);
    }

    #[test]
    fn flat_series_never_trades() {
        let series = make_series(&vec![100.37; 80]);
        let result = run_backtest(&series, &make_params(5, 20, 0.15, 0.08)).unwrap();

        assert_eq!(result.metrics.num_trades, 0);
        assert_eq!(result.metrics.win_rate_pct, 0.0);
        assert_eq!(result.metrics.total_return_pct, 0.0);
        assert_eq!(result.metrics.max_drawdown_pct, 0.0);
        assert!(result.equity_curve.iter().all(|p| p.equity == 100_000.0));
    }

    #[test]
    fn short_not_less_than_long_rejected_before_work() {
        let result = run_backtest(&make_series(&[]), &make_params(20, 20, 0.15, 0.08));
        assert!(matches!(result, Err(EquantError::InvalidParameter { .. })));
    }

    #[test]
    fn too_few_bars_is_insufficient_data() {
        let result = run_backtest(
            &make_series(&monotonic_closes(24)),
            &make_params(5, 20, 0.15, 0.08),
        );
        match result {
            Err(EquantError::InsufficientData { bars, minimum }) => {
                assert_eq!(bars, 24);
                assert_eq!(minimum, 25);
            }
            other => panic!("expected InsufficientData, got {other:?}"),
        }
    }

    #[test]
    fn repeated_runs_are_identical() {
        let closes: Vec<f64> = (0..200)
            .map(|i| 100.0 + 20.0 * (i as f64 / 9.0).sin() + i as f64 * 0.05)
            .collect();
        let series = make_series(&closes);
        let params = make_params(5, 20, 0.1, 0.05);
        assert_eq!(
            run_backtest(&series, &params).unwrap(),
            run_backtest(&series, &params).unwrap()
        );
    }
}

fn random_walk() -> impl Strategy<Value = Vec<f64>> {
    (
        10.0f64..1000.0,
        prop::collection::vec(-0.05f64..0.05, 30..250),
    )
        .prop_map(|(base, changes)| {
            changes
                .iter()
                .scan(base, |price, change| {
                    *price *= 1.0 + change;
                    Some(*price)
                })
                .collect()
        })
}

proptest! {
    #[test]
    fn max_drawdown_never_positive(closes in random_walk()) {
        let result = run_backtest(&make_series(&closes), &make_params(5, 20, 0.15, 0.08)).unwrap();
        prop_assert!(result.metrics.max_drawdown_pct <= 0.0);
    }

    #[test]
    fn equity_is_conserved(closes in random_walk(), tp in 0.02f64..0.5, sl in 0.02f64..0.5) {
        let params = make_params(5, 20, tp, sl);
        let result = run_backtest(&make_series(&closes), &params).unwrap();

        let realized: f64 = result.trades.iter().map(|t| t.profit()).sum();
        let last = result.equity_curve.last().unwrap().equity;
        let expected = params.initial_capital + realized;
        prop_assert!((last - expected).abs() <= 1e-6 * params.initial_capital);
    }

    #[test]
    fn simulator_is_deterministic(closes in random_walk()) {
        let series = make_series(&closes);
        let params = make_params(5, 20, 0.15, 0.08);
        let first = run_backtest(&series, &params).unwrap();
        prop_assert_eq!(first, run_backtest(&series, &params).unwrap());
    }

    #[test]
    fn rsi_stays_in_range(closes in random_walk()) {
        let rsi = calculate_rsi(&closes, 14).value();
        prop_assert!((0.0..=100.0).contains(&rsi));
    }

    #[test]
    fn rolling_mean_matches_direct_window_mean(
        values in prop::collection::vec(-1e3f64..1e3, 1..120),
        window in 1usize..30,
    ) {
        let means = rolling_means(&values, window);
        prop_assert_eq!(means.len(), values.len());
        for (i, mean) in means.iter().enumerate() {
            if i + 1 < window {
                prop_assert!(mean.is_none());
            } else {
                let slice = &values[i + 1 - window..=i];
                let direct = slice.iter().sum::<f64>() / window as f64;
                prop_assert!((mean.unwrap() - direct).abs() <= 1e-9 * (1.0 + direct.abs()));
            }
        }
    }
}
