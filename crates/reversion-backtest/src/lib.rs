//! Backtest orchestration and performance statistics.

mod engine;
mod report;
mod statistics;

pub use engine::{BacktestEngine, BacktestOutcome, SkippedTicker};
pub use report::PerformanceReport;
pub use statistics::{pair_trades, PerformanceStats, RoundTrip, TRADING_DAYS_PER_YEAR};
