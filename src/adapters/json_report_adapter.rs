//! JSON report adapter implementing ReportPort.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::domain::backtest::BacktestResult;
use crate::domain::error::EquantError;
use crate::domain::snapshot::AnalysisReport;
use crate::ports::report_port::ReportPort;

#[derive(Serialize)]
struct BacktestReport<'a> {
    symbol: &'a str,
    #[serde(flatten)]
    result: &'a BacktestResult,
}

pub struct JsonReportAdapter;

impl JsonReportAdapter {
    pub fn new() -> Self {
        Self
    }

    pub fn render<T: Serialize>(value: &T) -> Result<String, EquantError> {
        serde_json::to_string_pretty(value).map_err(|e| EquantError::Report {
            reason: e.to_string(),
        })
    }

    fn emit<T: Serialize>(&self, value: &T, output_path: Option<&str>) -> Result<(), EquantError> {
        let json = Self::render(value)?;
        match output_path {
            Some(output_path) => {
                let path = Path::new(output_path);
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)?;
                }
                fs::write(path, format!("{json}\n"))?;
                tracing::info!(path = %path.display(), "report written");
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                writeln!(stdout, "{json}")?;
            }
        }
        Ok(())
    }
}

impl Default for JsonReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for JsonReportAdapter {
    fn write_analysis(
        &self,
        report: &AnalysisReport,
        output_path: Option<&str>,
    ) -> Result<(), EquantError> {
        self.emit(report, output_path)
    }

    fn write_backtest(
        &self,
        symbol: &str,
        result: &BacktestResult,
        output_path: Option<&str>,
    ) -> Result<(), EquantError> {
        self.emit(&BacktestReport { symbol, result }, output_path)
    }
}
