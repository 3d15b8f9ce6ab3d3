//! Moving-average crossover strategy parameters.

use crate::domain::error::EquantError;

/// Extra bars required beyond the long window before a run is attempted.
pub const MIN_EXTRA_BARS: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct CrossoverParams {
    pub initial_capital: f64,
    pub ma_short_window: usize,
    pub ma_long_window: usize,
    /// Fraction, e.g. 0.15 for 15%.
    pub take_profit_pct: f64,
    /// Fraction, e.g. 0.08 for 8%.
    pub stop_loss_pct: f64,
}

impl Default for CrossoverParams {
    fn default() -> Self {
        CrossoverParams {
            initial_capital: 100_000.0,
            ma_short_window: 20,
            ma_long_window: 60,
            take_profit_pct: 0.15,
            stop_loss_pct: 0.08,
        }
    }
}

impl CrossoverParams {
    pub fn label(&self) -> String {
        format!(
            "MA-Crossover ({}/{})",
            self.ma_short_window, self.ma_long_window
        )
    }

    /// Smallest series length a run accepts.
    pub fn min_bars(&self) -> usize {
        self.ma_long_window.saturating_add(MIN_EXTRA_BARS)
    }

    pub fn validate(&self) -> Result<(), EquantError> {
        if self.ma_short_window == 0 {
            return Err(invalid("ma_short_window", "must be at least 1"));
        }
        if self.ma_short_window >= self.ma_long_window {
            return Err(invalid(
                "ma_short_window",
                format!(
                    "must be less than ma_long_window ({} >= {})",
                    self.ma_short_window, self.ma_long_window
                ),
            ));
        }
        if !self.initial_capital.is_finite() || self.initial_capital <= 0.0 {
            return Err(invalid("initial_capital", "must be a positive number"));
        }
        if self.take_profit_pct.is_nan() {
            return Err(invalid("take_profit_pct", "must be a number"));
        }
        if self.stop_loss_pct.is_nan() {
            return Err(invalid("stop_loss_pct", "must be a number"));
        }
        Ok(())
    }
}

fn invalid(name: &str, reason: impl Into<String>) -> EquantError {
    EquantError::InvalidParameter {
        name: name.to_string(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params() {
        let p = CrossoverParams::default();
        assert_eq!(p.ma_short_window, 20);
        assert_eq!(p.ma_long_window, 60);
        assert_eq!(p.take_profit_pct, 0.15);
        assert_eq!(p.stop_loss_pct, 0.08);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn label_format() {
        assert_eq!(CrossoverParams::default().label(), "MA-Crossover (20/60)");
    }

    #[test]
    fn min_bars_is_long_plus_five() {
        assert_eq!(CrossoverParams::default().min_bars(), 65);
    }

    #[test]
    fn min_bars_saturates_for_huge_long_window() {
        let p = CrossoverParams {
            ma_short_window: 5,
            ma_long_window: usize::MAX,
            ..CrossoverParams::default()
        };
        assert_eq!(p.min_bars(), usize::MAX);
    }

    #[test]
    fn short_not_below_long_rejected() {
        let equal = CrossoverParams {
            ma_short_window: 60,
            ..CrossoverParams::default()
        };
        assert!(matches!(
            equal.validate(),
            Err(EquantError::InvalidParameter { ref name, .. }) if name == "ma_short_window"
        ));

        let inverted = CrossoverParams {
            ma_short_window: 70,
            ..CrossoverParams::default()
        };
        assert!(inverted.validate().is_err());
    }

    #[test]
    fn zero_short_window_rejected() {
        let p = CrossoverParams {
            ma_short_window: 0,
            ..CrossoverParams::default()
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn non_positive_capital_rejected() {
        for capital in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let p = CrossoverParams {
                initial_capital: capital,
                ..CrossoverParams::default()
            };
            assert!(p.validate().is_err(), "capital {capital} accepted");
        }
    }
}
