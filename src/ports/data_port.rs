//! Market data access port trait.

use crate::domain::error::EquantError;
use crate::domain::ohlcv::PriceSeries;
use chrono::NaiveDate;

pub trait DataPort {
    /// Bars for `symbol` dated within `start_date..=end_date`, cleaned and
    /// ordered.
    fn fetch_series(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, EquantError>;

    /// First date, last date and bar count available for `symbol`, if any.
    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, EquantError>;
}
