//! Backtest orchestration.

use chrono::{NaiveDate, Utc};
use reversion_core::error::{DataError, StrategyError};
use reversion_core::traits::PriceFeed;
use reversion_core::types::{PriceSeries, StrategyConfig, Trade};
use reversion_strategy::{MeanReversionStrategy, TickerRun};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::report::PerformanceReport;
use crate::statistics::{pair_trades, PerformanceStats};

/// Ticker left out of a run and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedTicker {
    pub symbol: String,
    pub reason: String,
}

/// Result of a backtest run.
#[derive(Debug, Clone)]
pub enum BacktestOutcome {
    /// At least one ticker produced data
    Report(Box<PerformanceReport>),
    /// Every ticker was skipped
    NoResult { skipped: Vec<SkippedTicker> },
}

impl BacktestOutcome {
    /// Get the report if the run produced one.
    pub fn report(&self) -> Option<&PerformanceReport> {
        match self {
            BacktestOutcome::Report(report) => Some(report),
            BacktestOutcome::NoResult { .. } => None,
        }
    }

    /// Consume the outcome, keeping the report.
    pub fn into_report(self) -> Option<PerformanceReport> {
        match self {
            BacktestOutcome::Report(report) => Some(*report),
            BacktestOutcome::NoResult { .. } => None,
        }
    }
}

/// Runs the strategy over every configured ticker and pools the results.
#[derive(Debug, Clone)]
pub struct BacktestEngine {
    strategy: MeanReversionStrategy,
}

impl BacktestEngine {
    /// Create a new backtest engine.
    pub fn new(config: StrategyConfig) -> Result<Self, StrategyError> {
        Ok(Self {
            strategy: MeanReversionStrategy::new(config)?,
        })
    }

    /// Strategy configuration.
    pub fn config(&self) -> &StrategyConfig {
        self.strategy.config()
    }

    /// Run a backtest ending today (UTC).
    pub fn run<F: PriceFeed + ?Sized>(&self, feed: &F) -> Result<BacktestOutcome, StrategyError> {
        self.run_until(feed, Utc::now().date_naive())
    }

    /// Run a backtest whose analysis window ends at `end`.
    ///
    /// Tickers are processed in configuration order. A ticker whose fetch
    /// fails or that has fewer than `lookback + 1` bars is skipped; the run
    /// only fails to produce a report when every ticker is skipped. An end
    /// date too early for the lookback window is an error.
    pub fn run_until<F: PriceFeed + ?Sized>(
        &self,
        feed: &F,
        end: NaiveDate,
    ) -> Result<BacktestOutcome, StrategyError> {
        let config = self.strategy.config();
        let (start, end) = config.analysis_window(end)?;

        info!(
            strategy = %config.name,
            feed = feed.name(),
            symbols = ?config.ticker_symbols,
            %start,
            %end,
            "Starting backtest"
        );

        let mut runs = Vec::with_capacity(config.ticker_symbols.len());
        let mut skipped = Vec::new();

        for symbol in &config.ticker_symbols {
            match self.load(feed, symbol, start, end) {
                Ok(series) => runs.push(self.strategy.evaluate(&series)),
                Err(e) => {
                    warn!(symbol = %symbol, error = %e, "Skipping ticker");
                    skipped.push(SkippedTicker {
                        symbol: symbol.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        if runs.is_empty() {
            warn!(skipped = skipped.len(), "No ticker produced data");
            return Ok(BacktestOutcome::NoResult { skipped });
        }

        let report = self.build_report(&runs, start, end);
        info!(
            observations = report.observations,
            trades = report.stats.total_trades,
            cumulative_return = report.stats.cumulative_return,
            "Backtest complete"
        );

        Ok(BacktestOutcome::Report(Box::new(report)))
    }

    fn load<F: PriceFeed + ?Sized>(
        &self,
        feed: &F,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataError> {
        let series = feed.fetch(symbol, start, end)?;
        let required = self.strategy.warmup_period() + 1;
        if series.len() < required {
            return Err(DataError::InsufficientHistory {
                symbol: symbol.to_string(),
                required,
                available: series.len(),
            });
        }
        Ok(series)
    }

    /// Pool per-ticker series by concatenation in ticker order.
    fn build_report(&self, runs: &[TickerRun], start: NaiveDate, end: NaiveDate) -> PerformanceReport {
        let strategy_returns: Vec<f64> = runs
            .iter()
            .flat_map(|run| run.strategy_returns.iter().copied())
            .collect();
        let benchmark_returns: Vec<f64> = runs
            .iter()
            .flat_map(|run| run.benchmark_returns.iter().copied())
            .collect();
        let trade_log: Vec<Trade> = runs.iter().flat_map(|run| run.trades.iter().cloned()).collect();

        let stats = PerformanceStats::compute(&strategy_returns, &benchmark_returns, &trade_log);
        let round_trips = pair_trades(&trade_log);

        PerformanceReport {
            strategy: self.strategy.config().name.clone(),
            stats,
            trade_log,
            round_trips,
            backtest_start_date: start,
            backtest_end_date: end,
            symbols: runs.iter().map(|run| run.symbol.clone()).collect(),
            observations: strategy_returns.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::collections::HashMap;

    /// In-memory feed that ignores the requested range.
    struct MapFeed {
        data: HashMap<String, Vec<f64>>,
    }

    impl MapFeed {
        fn new(entries: &[(&str, Vec<f64>)]) -> Self {
            Self {
                data: entries
                    .iter()
                    .map(|(symbol, closes)| (symbol.to_string(), closes.clone()))
                    .collect(),
            }
        }
    }

    impl PriceFeed for MapFeed {
        fn fetch(&self, symbol: &str, start: NaiveDate, _end: NaiveDate) -> Result<PriceSeries, DataError> {
            let closes = self
                .data
                .get(symbol)
                .ok_or_else(|| DataError::SymbolNotFound(symbol.to_string()))?;
            PriceSeries::from_closes(symbol, start, closes)
        }

        fn name(&self) -> &str {
            "map"
        }
    }

    fn end_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 28).unwrap()
    }

    fn oscillating_prices() -> Vec<f64> {
        let mut prices: Vec<f64> = (0..20).map(|i| if i % 2 == 0 { 100.0 } else { 101.0 }).collect();
        prices.extend([96.0, 100.5, 100.0, 105.0, 104.0, 100.5, 101.0, 100.0]);
        prices
    }

    fn engine(symbols: &[&str]) -> BacktestEngine {
        let symbols = symbols.iter().map(|s| s.to_string()).collect();
        BacktestEngine::new(StrategyConfig::new(symbols, 20, 2.0)).unwrap()
    }

    #[test]
    fn test_constant_prices() {
        let feed = MapFeed::new(&[("FLAT", vec![50.0; 300])]);
        let report = engine(&["FLAT"]).run_until(&feed, end_date()).unwrap().into_report().unwrap();

        assert_eq!(report.stats.cumulative_return, 0.0);
        assert_eq!(report.stats.sharpe_ratio, 0.0);
        assert_eq!(report.stats.sortino_ratio, 0.0);
        assert_eq!(report.stats.max_drawdown, 0.0);
        assert_eq!(report.stats.total_trades, 0);
        assert_eq!(report.stats.win_rate, 0.0);
        assert_eq!(report.stats.beta, 1.0);
        assert_eq!(report.observations, 300);
    }

    #[test]
    fn test_oscillating_scenario() {
        let feed = MapFeed::new(&[("OSC", oscillating_prices())]);
        let report = engine(&["OSC"]).run_until(&feed, end_date()).unwrap().into_report().unwrap();

        assert_eq!(report.stats.total_trades, 4);
        assert_eq!(report.round_trips.len(), 2);
        assert_eq!(report.stats.winning_trades, 1);
        assert_eq!(report.stats.losing_trades, 1);
        assert_relative_eq!(report.stats.win_rate, 0.5);
        assert_relative_eq!(report.stats.cumulative_return, 0.09241214514652007, epsilon = 1e-12);
        assert_relative_eq!(report.stats.benchmark_return, 0.0, epsilon = 1e-12);
        assert_relative_eq!(report.stats.alpha, report.stats.cumulative_return, epsilon = 1e-12);
        assert_relative_eq!(report.round_trips[0].trade_return, 4.5 / 96.0, epsilon = 1e-12);
        assert_relative_eq!(report.round_trips[1].trade_return, -4.5 / 105.0, epsilon = 1e-12);
    }

    #[test]
    fn test_analysis_window() {
        let feed = MapFeed::new(&[("FLAT", vec![50.0; 30])]);
        let report = engine(&["FLAT"]).run_until(&feed, end_date()).unwrap().into_report().unwrap();

        assert_eq!(report.backtest_end_date, end_date());
        assert_eq!(report.backtest_start_date, end_date() - chrono::Duration::days(200));
    }

    #[test]
    fn test_every_ticker_skipped() {
        let feed = MapFeed::new(&[("SHORT", vec![10.0, 11.0, 12.0])]);
        let outcome = engine(&["SHORT", "MISSING"]).run_until(&feed, end_date()).unwrap();

        match outcome {
            BacktestOutcome::NoResult { skipped } => {
                let symbols: Vec<&str> = skipped.iter().map(|s| s.symbol.as_str()).collect();
                assert_eq!(symbols, vec!["SHORT", "MISSING"]);
                assert!(skipped[0].reason.contains("Insufficient history"));
            }
            BacktestOutcome::Report(_) => panic!("expected no result"),
        }
    }

    #[test]
    fn test_exact_minimum_history() {
        // lookback + 1 bars is enough
        let feed = MapFeed::new(&[("MIN", vec![50.0; 21])]);
        assert!(engine(&["MIN"]).run_until(&feed, end_date()).unwrap().report().is_some());

        let feed = MapFeed::new(&[("MIN", vec![50.0; 20])]);
        assert!(engine(&["MIN"]).run_until(&feed, end_date()).unwrap().report().is_none());
    }

    #[test]
    fn test_skipped_ticker_does_not_abort() {
        let feed = MapFeed::new(&[("OSC", oscillating_prices())]);
        let report = engine(&["MISSING", "OSC"]).run_until(&feed, end_date()).unwrap().into_report().unwrap();

        assert_eq!(report.symbols, vec!["OSC"]);
        assert_eq!(report.stats.total_trades, 4);
    }

    #[test]
    fn test_pooled_tickers_concatenate() {
        let feed = MapFeed::new(&[("A", oscillating_prices()), ("B", oscillating_prices())]);
        let report = engine(&["A", "B"]).run_until(&feed, end_date()).unwrap().into_report().unwrap();

        assert_eq!(report.observations, 2 * oscillating_prices().len());
        assert_eq!(report.stats.total_trades, 8);
        assert_eq!(report.round_trips.len(), 4);
        assert_eq!(report.trade_log[0].ticker, "A");
        assert_eq!(report.trade_log[4].ticker, "B");
        assert_relative_eq!(
            report.stats.cumulative_return,
            1.09241214514652007f64.powi(2) - 1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_repeat_runs_identical() {
        let feed = MapFeed::new(&[("OSC", oscillating_prices())]);
        let engine = engine(&["OSC"]);

        let first = engine.run_until(&feed, end_date()).unwrap().into_report().unwrap();
        let second = engine.run_until(&feed, end_date()).unwrap().into_report().unwrap();

        assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
    }

    #[test]
    fn test_oversized_lookback_refused() {
        let config = StrategyConfig::new(vec!["A".into()], 100_000_000, 2.0);
        assert!(BacktestEngine::new(config).is_err());
    }

    #[test]
    fn test_window_before_earliest_date_is_an_error() {
        let feed = MapFeed::new(&[("OSC", oscillating_prices())]);
        let end = NaiveDate::MIN + chrono::Days::new(50);

        assert!(engine(&["OSC"]).run_until(&feed, end).is_err());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = StrategyConfig::new(Vec::new(), 20, 2.0);
        assert!(BacktestEngine::new(config).is_err());
    }
}
