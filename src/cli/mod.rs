//! CLI definitions.

pub mod commands;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "reversion")]
#[command(author, version, about = "Z-score mean-reversion backtester")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", env = "REVERSION_CONFIG")]
    pub config: PathBuf,

    /// Log level (overrides the config file)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Backtest one strategy
    Backtest(BacktestArgs),
    /// Backtest every active strategy in the config file
    RunAll(RunAllArgs),
    /// Print the per-bar signal table of one ticker as CSV
    Signals(SignalsArgs),
    /// Validate configuration
    ValidateConfig,
}

/// Strategy selection shared by `backtest` and `signals`.
#[derive(clap::Args)]
pub struct StrategyArgs {
    /// Strategy name from the config file
    #[arg(short, long, conflicts_with_all = ["symbols", "lookback", "threshold"])]
    pub strategy: Option<String>,

    /// Symbols to trade (comma-separated)
    #[arg(short = 'S', long, value_delimiter = ',')]
    pub symbols: Vec<String>,

    /// Rolling window length in bars
    #[arg(long, default_value = "20")]
    pub lookback: usize,

    /// Entry threshold in standard deviations
    #[arg(long, default_value = "2.0", allow_negative_numbers = true)]
    pub threshold: f64,

    /// Directory of CSV price files (defaults to the config's data.dir)
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Last day of the analysis window (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    pub end: Option<NaiveDate>,
}

#[derive(clap::Args)]
pub struct BacktestArgs {
    #[command(flatten)]
    pub strategy: StrategyArgs,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Save the JSON report to a file
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Save the trade log as CSV
    #[arg(long)]
    pub trades: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct RunAllArgs {
    /// Directory of CSV price files (defaults to the config's data.dir)
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Last day of the analysis window (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    pub end: Option<NaiveDate>,
}

#[derive(clap::Args)]
pub struct SignalsArgs {
    #[command(flatten)]
    pub strategy: StrategyArgs,

    /// Ticker to print (defaults to the strategy's first symbol)
    #[arg(long)]
    pub ticker: Option<String>,
}
