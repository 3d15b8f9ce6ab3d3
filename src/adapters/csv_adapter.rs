//! CSV file data adapter.
//!
//! One file per symbol, `<base_path>/<SYMBOL>.csv`, with the header
//! `date,open,high,low,close,volume`, matched by name. A file without a
//! `date` or `close` column is an error. Rows whose close is empty or not a
//! number are skipped; empty open/high/low fall back to the close and an
//! empty volume is recorded as unknown.

use crate::domain::error::EquantError;
use crate::domain::ohlcv::{PriceBar, PriceSeries};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    fn read_bars(&self, symbol: &str) -> Result<Vec<PriceBar>, EquantError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| EquantError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let columns = Columns::from_headers(rdr.headers().map_err(|e| EquantError::Data {
            reason: format!("CSV header error: {}", e),
        })?)?;
        let mut bars = Vec::new();

        for (line, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| EquantError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(columns.date).ok_or_else(|| EquantError::Data {
                reason: "missing date column".into(),
            })?;
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|e| {
                EquantError::Data {
                    reason: format!("invalid date format: {}", e),
                }
            })?;

            let close = match record
                .get(columns.close)
                .map(str::trim)
                .and_then(|s| s.parse::<f64>().ok())
            {
                Some(close) if close.is_finite() => close,
                _ => {
                    tracing::debug!(
                        symbol,
                        row = line + 1,
                        %date,
                        "skipping row without a usable close"
                    );
                    continue;
                }
            };

            let open = optional_column::<f64>(&record, columns.open, "open")?.unwrap_or(close);
            let high = optional_column::<f64>(&record, columns.high, "high")?.unwrap_or(close);
            let low = optional_column::<f64>(&record, columns.low, "low")?.unwrap_or(close);
            let volume = optional_column::<u64>(&record, columns.volume, "volume")?;

            bars.push(PriceBar {
                date,
                open,
                high,
                low,
                close,
                volume,
            });
        }

        Ok(bars)
    }
}

/// Header positions. `date` and `close` are required.
struct Columns {
    date: usize,
    close: usize,
    open: Option<usize>,
    high: Option<usize>,
    low: Option<usize>,
    volume: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, EquantError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let required = |name: &str| {
            find(name).ok_or_else(|| EquantError::Data {
                reason: format!("missing {} column", name),
            })
        };
        Ok(Columns {
            date: required("date")?,
            close: required("close")?,
            open: find("open"),
            high: find("high"),
            low: find("low"),
            volume: find("volume"),
        })
    }
}

/// Parse an optional column: absent or empty gives `None`, garbage is an error.
fn optional_column<T>(
    record: &csv::StringRecord,
    index: Option<usize>,
    name: &str,
) -> Result<Option<T>, EquantError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match index.and_then(|i| record.get(i)).map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(|e| EquantError::Data {
            reason: format!("invalid {} value {:?}: {}", name, raw, e),
        }),
    }
}

impl DataPort for CsvAdapter {
    fn fetch_series(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, EquantError> {
        let bars = self
            .read_bars(symbol)?
            .into_iter()
            .filter(|b| b.date >= start_date && b.date <= end_date)
            .collect();
        Ok(PriceSeries::new(bars))
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, EquantError> {
        let series = PriceSeries::new(self.read_bars(symbol)?);
        Ok(series
            .date_range()
            .map(|(start, end)| (start, end, series.len())))
    }
}
