//! CLI definition and dispatch.

use chrono::{Duration, NaiveDate};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::adapters::synthetic_adapter::SyntheticAdapter;
use crate::domain::backtest::{run_backtest, BacktestResult};
use crate::domain::config_validation::{
    build_crossover_params, build_indicator_config, lookback_days, validate_data_config,
    validate_lookback_days, validate_strategy_config, validate_strategy_params,
};
use crate::domain::error::EquantError;
use crate::domain::indicator::compute_indicators_with;
use crate::domain::snapshot::{AnalysisReport, MarketData, MarketSnapshot};
use crate::domain::strategy::CrossoverParams;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

/// End date used for synthetic data when none is given.
pub const SYNTHETIC_END_DATE: (i32, u32, u32) = (2024, 12, 31);

#[derive(Parser, Debug)]
#[command(name = "equant", about = "Equity technical analysis and MA-crossover backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute the market snapshot and technical indicators for a symbol
    Analyze {
        #[command(flatten)]
        data: DataArgs,
    },
    /// Run the moving-average crossover backtest for a symbol
    Backtest {
        #[command(flatten)]
        data: DataArgs,
        #[command(flatten)]
        overrides: StrategyOverrides,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct DataArgs {
    #[arg(long)]
    pub symbol: String,
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Directory of <SYMBOL>.csv files; synthetic data when absent
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
    #[arg(long)]
    pub end_date: Option<NaiveDate>,
    #[arg(long)]
    pub days: Option<i64>,
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct StrategyOverrides {
    #[arg(long)]
    pub ma_short: Option<usize>,
    #[arg(long)]
    pub ma_long: Option<usize>,
    #[arg(long)]
    pub take_profit: Option<f64>,
    #[arg(long)]
    pub stop_loss: Option<f64>,
    #[arg(long)]
    pub capital: Option<f64>,
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Analyze { data } => run_analyze(&data),
        Command::Backtest { data, overrides } => run_backtest_command(&data, &overrides),
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Load the INI file at `path`, or an empty configuration when none is given.
pub fn load_config(path: Option<&Path>) -> Result<FileConfigAdapter, EquantError> {
    match path {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading config");
            FileConfigAdapter::from_file(path)
        }
        None => Ok(FileConfigAdapter::empty()),
    }
}

pub fn open_data_source(data_dir: Option<&Path>) -> Box<dyn DataPort> {
    match data_dir {
        Some(dir) => Box::new(CsvAdapter::new(dir.to_path_buf())),
        None => Box::new(SyntheticAdapter::new()),
    }
}

pub fn normalize_symbol(symbol: &str) -> Result<String, EquantError> {
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(EquantError::InvalidParameter {
            name: "symbol".into(),
            reason: "must not be empty".into(),
        });
    }
    Ok(symbol)
}

pub fn apply_overrides(params: CrossoverParams, overrides: &StrategyOverrides) -> CrossoverParams {
    CrossoverParams {
        initial_capital: overrides.capital.unwrap_or(params.initial_capital),
        ma_short_window: overrides.ma_short.unwrap_or(params.ma_short_window),
        ma_long_window: overrides.ma_long.unwrap_or(params.ma_long_window),
        take_profit_pct: overrides.take_profit.unwrap_or(params.take_profit_pct),
        stop_loss_pct: overrides.stop_loss.unwrap_or(params.stop_loss_pct),
    }
}

/// `[strategy]` values with command-line overrides applied, range-checked.
pub fn build_params(
    config: &dyn ConfigPort,
    overrides: &StrategyOverrides,
) -> Result<CrossoverParams, EquantError> {
    let params = apply_overrides(build_crossover_params(config)?, overrides);
    validate_strategy_params(&params)?;
    Ok(params)
}

/// Resolve the inclusive `(start, end)` window to fetch.
///
/// Without an explicit end date the newest available bar is used, or the
/// fixed synthetic end date for sources with no fixed range.
pub fn resolve_window(
    data: &dyn DataPort,
    config: &dyn ConfigPort,
    symbol: &str,
    end_date: Option<NaiveDate>,
    days: Option<i64>,
) -> Result<(NaiveDate, NaiveDate), EquantError> {
    let days = match days {
        Some(days) => {
            validate_lookback_days(days)?;
            days
        }
        None => lookback_days(config)?,
    };

    let end = match end_date {
        Some(end) => end,
        None => match data.get_data_range(symbol)? {
            Some((_, last, _)) => last,
            None => synthetic_end_date()?,
        },
    };

    Ok((end - Duration::days(days), end))
}

fn synthetic_end_date() -> Result<NaiveDate, EquantError> {
    let (y, m, d) = SYNTHETIC_END_DATE;
    NaiveDate::from_ymd_opt(y, m, d).ok_or_else(|| EquantError::Data {
        reason: "invalid synthetic end date".into(),
    })
}

/// Snapshot plus indicators for the bars of `symbol` in the window.
pub fn analyze_symbol(
    data: &dyn DataPort,
    config: &dyn ConfigPort,
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<AnalysisReport, EquantError> {
    let indicator_config = build_indicator_config(config)?;
    let series = data.fetch_series(symbol, start, end)?;
    let snapshot = MarketSnapshot::from_series(&series).ok_or_else(|| EquantError::Data {
        reason: format!("no price data for {symbol} between {start} and {end}"),
    })?;

    tracing::info!(symbol, bars = series.len(), "computing indicators");
    Ok(AnalysisReport {
        symbol: symbol.to_string(),
        market_data: MarketData {
            snapshot,
            technical_indicators: compute_indicators_with(&series, &indicator_config),
        },
    })
}

pub fn backtest_symbol(
    data: &dyn DataPort,
    params: &CrossoverParams,
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<BacktestResult, EquantError> {
    let series = data.fetch_series(symbol, start, end)?;
    tracing::info!(symbol, bars = series.len(), strategy = %params.label(), "running backtest");
    run_backtest(&series, params)
}

fn run_analyze(args: &DataArgs) -> Result<(), EquantError> {
    let config = load_config(args.config.as_deref())?;
    validate_data_config(&config)?;
    let symbol = normalize_symbol(&args.symbol)?;
    let data = open_data_source(args.data_dir.as_deref());

    let (start, end) = resolve_window(data.as_ref(), &config, &symbol, args.end_date, args.days)?;
    let report = analyze_symbol(data.as_ref(), &config, &symbol, start, end)?;

    JsonReportAdapter::new().write_analysis(&report, output_str(args.output.as_deref())?)
}

fn run_backtest_command(args: &DataArgs, overrides: &StrategyOverrides) -> Result<(), EquantError> {
    let config = load_config(args.config.as_deref())?;
    validate_data_config(&config)?;
    let params = build_params(&config, overrides)?;
    let symbol = normalize_symbol(&args.symbol)?;
    let data = open_data_source(args.data_dir.as_deref());

    let (start, end) = resolve_window(data.as_ref(), &config, &symbol, args.end_date, args.days)?;
    let result = backtest_symbol(data.as_ref(), &params, &symbol, start, end)?;

    print_summary(&symbol, &result);
    JsonReportAdapter::new().write_backtest(&symbol, &result, output_str(args.output.as_deref())?)
}

fn run_validate(config_path: &Path) -> Result<(), EquantError> {
    let config = load_config(Some(config_path))?;
    validate_data_config(&config)?;
    validate_strategy_config(&config)?;
    build_indicator_config(&config)?;

    let params = build_crossover_params(&config)?;
    eprintln!("Strategy: {}", params.label());
    eprintln!(
        "  take profit {:.1}%, stop loss {:.1}%, capital {:.2}",
        params.take_profit_pct * 100.0,
        params.stop_loss_pct * 100.0,
        params.initial_capital
    );
    eprintln!("Configuration is valid.");
    Ok(())
}

fn print_summary(symbol: &str, result: &BacktestResult) {
    let m = &result.metrics;
    eprintln!("=== {} | {} ===", symbol, result.strategy_label);
    eprintln!("Total Return:     {:.2}%", m.total_return_pct);
    eprintln!("Max Drawdown:     {:.2}%", m.max_drawdown_pct);
    match m.sharpe_ratio {
        Some(sharpe) => eprintln!("Sharpe Ratio:     {:.3}", sharpe),
        None => eprintln!("Sharpe Ratio:     n/a"),
    }
    eprintln!("Total Trades:     {}", m.num_trades);
    eprintln!("Win Rate:         {:.2}%", m.win_rate_pct);
}

fn output_str(path: Option<&Path>) -> Result<Option<&str>, EquantError> {
    path.map(|p| {
        p.to_str().ok_or_else(|| EquantError::Report {
            reason: format!("output path is not valid UTF-8: {}", p.display()),
        })
    })
    .transpose()
}
