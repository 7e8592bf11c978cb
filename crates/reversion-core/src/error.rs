//! Error types for the backtester.

use chrono::NaiveDate;
use thiserror::Error;

/// Top-level backtester error.
#[derive(Error, Debug)]
pub enum ReversionError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Strategy error: {0}")]
    Strategy(#[from] StrategyError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Strategy-specific errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StrategyError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Strategy not found: {0}")]
    NotFound(String),
}

/// Price data errors.
///
/// Every variant is recoverable at the ticker level: the orchestrator skips
/// the ticker and keeps going.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("No data available for {symbol} between {start} and {end}")]
    NoDataAvailable {
        symbol: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("Insufficient history for {symbol}: need {required} bars, have {available}")]
    InsufficientHistory {
        symbol: String,
        required: usize,
        available: usize,
    },

    #[error("Fetch failed for {symbol}: {reason}")]
    FetchFailed { symbol: String, reason: String },

    #[error("Invalid price series: {0}")]
    InvalidSeries(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Indicator calculation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndicatorError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for backtester operations.
pub type ReversionResult<T> = Result<T, ReversionError>;
