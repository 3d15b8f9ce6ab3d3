//! Price bar and price series representation.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<u64>,
}

impl PriceBar {
    /// Bar with open/high/low pinned to the close.
    pub fn from_close(date: NaiveDate, close: f64) -> Self {
        PriceBar {
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume: None,
        }
    }
}

/// Date-ordered, de-duplicated sequence of bars with finite closes.
///
/// Every rolling computation in the engine depends on this ordering, so the
/// only way to build a series is through [`PriceSeries::new`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Drops bars whose close is not finite, sorts by date, and keeps the
    /// last bar seen for any repeated date.
    pub fn new(bars: Vec<PriceBar>) -> Self {
        let mut bars: Vec<PriceBar> = bars.into_iter().filter(|b| b.close.is_finite()).collect();
        bars.sort_by_key(|b| b.date);

        let mut deduped: Vec<PriceBar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match deduped.last_mut() {
                Some(last) if last.date == bar.date => *last = bar,
                _ => deduped.push(bar),
            }
        }

        PriceSeries { bars: deduped }
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.bars.first(), self.bars.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }
}
