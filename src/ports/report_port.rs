//! Report output port trait.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::EquantError;
use crate::domain::snapshot::AnalysisReport;

/// Destination for analysis and backtest reports. `output_path` of `None`
/// means standard output.
pub trait ReportPort {
    fn write_analysis(
        &self,
        report: &AnalysisReport,
        output_path: Option<&str>,
    ) -> Result<(), EquantError>;

    fn write_backtest(
        &self,
        symbol: &str,
        result: &BacktestResult,
        output_path: Option<&str>,
    ) -> Result<(), EquantError>;
}
