//! Latest-bar market snapshot and the analysis report built around it.

use serde::Serialize;

use crate::domain::indicator::IndicatorResult;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::rounding::{serialize_2dp, serialize_2dp_opt};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketSnapshot {
    #[serde(serialize_with = "serialize_2dp")]
    pub latest_price: f64,
    #[serde(serialize_with = "serialize_2dp_opt")]
    pub price_change_pct: Option<f64>,
    pub volume: Option<u64>,
}

impl MarketSnapshot {
    /// `None` for an empty series.
    pub fn from_series(series: &PriceSeries) -> Option<Self> {
        let bars = series.bars();
        let latest = bars.last()?;
        let price_change_pct = bars
            .len()
            .checked_sub(2)
            .map(|i| bars[i].close)
            .filter(|&prev| prev != 0.0)
            .map(|prev| (latest.close - prev) / prev * 100.0);

        Some(MarketSnapshot {
            latest_price: latest.close,
            price_change_pct,
            volume: latest.volume,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketData {
    #[serde(flatten)]
    pub snapshot: MarketSnapshot,
    pub technical_indicators: IndicatorResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub symbol: String,
    pub market_data: MarketData,
}
