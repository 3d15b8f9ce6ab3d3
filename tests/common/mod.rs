#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use equant::domain::error::EquantError;
use equant::domain::ohlcv::{PriceBar, PriceSeries};
use equant::domain::strategy::CrossoverParams;
use equant::ports::data_port::DataPort;
use std::collections::HashMap;
use std::io::Write;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PriceBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<PriceBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }

    fn bars(&self, symbol: &str) -> Result<Vec<PriceBar>, EquantError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(EquantError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(symbol).cloned().unwrap_or_default())
    }
}

impl DataPort for MockDataPort {
    fn fetch_series(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, EquantError> {
        let bars = self
            .bars(symbol)?
            .into_iter()
            .filter(|b| b.date >= start_date && b.date <= end_date)
            .collect();
        Ok(PriceSeries::new(bars))
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, EquantError> {
        let series = PriceSeries::new(self.bars(symbol)?);
        Ok(series.date_range().map(|(s, e)| (s, e, series.len())))
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn start_date() -> NaiveDate {
    date(2024, 1, 1)
}

/// Daily bars starting 2024-01-01, one per close.
pub fn make_bars(closes: &[f64]) -> Vec<PriceBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceBar {
            volume: Some(1_000_000 + i as u64),
            ..PriceBar::from_close(start_date() + Duration::days(i as i64), close)
        })
        .collect()
}

pub fn make_series(closes: &[f64]) -> PriceSeries {
    PriceSeries::new(make_bars(closes))
}

pub fn monotonic_closes(n: usize) -> Vec<f64> {
    (0..n).map(|i| 100.0 * 1.01_f64.powi(i as i32)).collect()
}

pub fn make_params(short: usize, long: usize, take_profit: f64, stop_loss: f64) -> CrossoverParams {
    CrossoverParams {
        initial_capital: 100_000.0,
        ma_short_window: short,
        ma_long_window: long,
        take_profit_pct: take_profit,
        stop_loss_pct: stop_loss,
    }
}

pub fn write_temp_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Writes `<dir>/<symbol>.csv` from `bars`.
pub fn write_csv(dir: &std::path::Path, symbol: &str, bars: &[PriceBar]) {
    let mut content = String::from("date,open,high,low,close,volume\n");
    for b in bars {
        let volume = b.volume.map(|v| v.to_string()).unwrap_or_default();
        content.push_str(&format!(
            "{},{},{},{},{},{}\n",
            b.date, b.open, b.high, b.low, b.close, volume
        ));
    }
    std::fs::write(dir.join(format!("{symbol}.csv")), content).unwrap();
}
