//! Deterministic synthetic market data.
//!
//! Each symbol gets its own seeded random walk, so repeated runs over the same
//! range see identical bars. Used when no data directory is configured.

use crate::domain::error::EquantError;
use crate::domain::ohlcv::{PriceBar, PriceSeries};
use crate::domain::rounding::round_to;
use crate::ports::data_port::DataPort;
use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// FNV-1a over the symbol bytes.
pub fn symbol_seed(symbol: &str) -> u64 {
    symbol.bytes().fold(FNV_OFFSET_BASIS, |hash, b| {
        (hash ^ u64::from(b)).wrapping_mul(FNV_PRIME)
    })
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SyntheticAdapter;

impl SyntheticAdapter {
    pub fn new() -> Self {
        Self
    }

    /// One bar per calendar day from `start_date` up to the day before
    /// `end_date`.
    ///
    /// Each bar opens at the previous close; prices are rounded to cents.
    pub fn generate(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Vec<PriceBar> {
        let days = (end_date - start_date).num_days().max(0);
        let mut rng = StdRng::seed_from_u64(symbol_seed(symbol));
        let mut price: f64 = rng.gen_range(100.0..1000.0);

        (0..days)
            .map(|offset| {
                let open = round_to(price, 2);
                let close = round_to(price * (1.0 + rng.gen_range(-0.03..=0.03)), 2);
                let high = round_to(close * rng.gen_range(1.001..=1.02), 2);
                let low = round_to(close * rng.gen_range(0.98..=0.999), 2);
                price = close;
                PriceBar {
                    date: start_date + Duration::days(offset),
                    open,
                    high,
                    low,
                    close,
                    volume: Some(rng.gen_range(10_000_000..80_000_000)),
                }
            })
            .collect()
    }
}

impl DataPort for SyntheticAdapter {
    fn fetch_series(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, EquantError> {
        if symbol.trim().is_empty() {
            return Err(EquantError::Data {
                reason: "symbol must not be empty".into(),
            });
        }
        let bars = self.generate(symbol, start_date, end_date);
        tracing::debug!(symbol, bars = bars.len(), "generated synthetic series");
        Ok(PriceSeries::new(bars))
    }

    /// Synthetic data has no fixed range.
    fn get_data_range(
        &self,
        _symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, EquantError> {
        Ok(None)
    }
}
