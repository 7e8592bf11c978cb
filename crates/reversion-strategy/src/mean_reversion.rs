//! Z-score mean-reversion strategy.
//!
//! Goes long when the close falls more than `entry_threshold` rolling
//! standard deviations below the rolling mean, short when it rises as far
//! above it, and flattens once the close is back within half that distance.

use reversion_core::error::StrategyError;
use reversion_core::types::{PositionState, PriceSeries, StrategyConfig, Trade};
use serde::Serialize;
use tracing::debug;

use crate::position::PositionTracker;
use crate::signal::{SignalFrame, SignalGenerator};
use crate::trades::TradeExtractor;

/// Everything derived from one ticker's series.
#[derive(Debug, Clone, Serialize)]
pub struct TickerRun {
    /// Ticker symbol
    pub symbol: String,
    /// Per-bar signal table
    pub signals: SignalFrame,
    /// Position at the close of each bar
    pub positions: Vec<PositionState>,
    /// Trades in date order
    pub trades: Vec<Trade>,
    /// Bar return times the previous bar's position
    pub strategy_returns: Vec<f64>,
    /// Buy-and-hold bar returns
    pub benchmark_returns: Vec<f64>,
}

impl TickerRun {
    /// Position carried past the last bar.
    pub fn final_position(&self) -> PositionState {
        self.positions.last().copied().unwrap_or_default()
    }
}

/// Runs signal generation, position tracking and trade extraction.
#[derive(Debug, Clone)]
pub struct MeanReversionStrategy {
    config: StrategyConfig,
    generator: SignalGenerator,
    extractor: TradeExtractor,
}

impl MeanReversionStrategy {
    /// Create a strategy; refuses configurations with no defined window.
    pub fn new(config: StrategyConfig) -> Result<Self, StrategyError> {
        config.ensure_runnable()?;
        let generator = SignalGenerator::from_config(&config)
            .map_err(|e| StrategyError::InvalidConfig(e.to_string()))?;
        let extractor = TradeExtractor::from_config(&config);

        Ok(Self {
            config,
            generator,
            extractor,
        })
    }

    /// Strategy configuration.
    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// Bars needed before the first signal can appear.
    pub fn warmup_period(&self) -> usize {
        self.generator.lookback()
    }

    /// Evaluate one ticker.
    pub fn evaluate(&self, series: &PriceSeries) -> TickerRun {
        let signals = self.generator.generate(series);
        let positions = PositionTracker::new().track(signals.signals());
        let trades = self.extractor.extract(series.symbol(), signals.rows(), &positions);

        let benchmark_returns = series.returns();
        // A position decided at a bar's close earns the following bar's return
        let strategy_returns = benchmark_returns
            .iter()
            .enumerate()
            .map(|(i, r)| match i {
                0 => 0.0,
                _ => r * positions[i - 1].exposure(),
            })
            .collect();

        debug!(
            symbol = series.symbol(),
            bars = series.len(),
            valid_rows = signals.valid_count(),
            trades = trades.len(),
            "Evaluated ticker"
        );

        TickerRun {
            symbol: series.symbol().to_string(),
            signals,
            positions,
            trades,
            strategy_returns,
            benchmark_returns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use reversion_core::types::TradeType;

    fn create_test_series(prices: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        PriceSeries::from_closes("TEST", start, prices).unwrap()
    }

    /// Alternating 100/101 for twenty bars, then a dip, recovery, spike and
    /// second recovery.
    fn oscillating_prices() -> Vec<f64> {
        let mut prices: Vec<f64> = (0..20).map(|i| if i % 2 == 0 { 100.0 } else { 101.0 }).collect();
        prices.extend([96.0, 100.5, 100.0, 105.0, 104.0, 100.5, 101.0, 100.0]);
        prices
    }

    fn strategy(lookback: usize, threshold: f64) -> MeanReversionStrategy {
        MeanReversionStrategy::new(StrategyConfig::new(vec!["TEST".into()], lookback, threshold)).unwrap()
    }

    #[test]
    fn test_zero_lookback_refused() {
        let config = StrategyConfig::new(vec!["TEST".into()], 0, 2.0);
        assert!(MeanReversionStrategy::new(config).is_err());
    }

    #[test]
    fn test_hand_computed_trade_sequence() {
        let run = strategy(20, 2.0).evaluate(&create_test_series(&oscillating_prices()));

        // bar 19: z = 0.97 (exit band, already flat)
        // bar 20: z = -3.81 -> BUY at 96
        // bar 21: z = 0.20 -> EXIT at 100.5
        // bar 23: z = 2.95 -> SELL at 105
        // bar 24: z = 1.93 -> hold short
        // bar 25: z = -0.09 -> EXIT at 100.5
        let summary: Vec<(TradeType, f64)> = run.trades.iter().map(|t| (t.trade_type, t.price)).collect();
        assert_eq!(
            summary,
            vec![
                (TradeType::Buy, 96.0),
                (TradeType::Exit, 100.5),
                (TradeType::Sell, 105.0),
                (TradeType::Exit, 100.5),
            ]
        );

        let day = |n: u64| NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(n);
        let dates: Vec<NaiveDate> = run.trades.iter().map(|t| t.date).collect();
        assert_eq!(dates, vec![day(20), day(21), day(23), day(25)]);

        assert_relative_eq!(run.trades[0].signal_value.unwrap(), -3.8101, epsilon = 1e-4);
        assert_relative_eq!(run.trades[2].signal_value.unwrap(), 2.9489, epsilon = 1e-4);
        assert_eq!(run.positions[24], PositionState::Short);
        assert_eq!(run.final_position(), PositionState::Flat);
    }

    #[test]
    fn test_returns_use_previous_position() {
        let run = strategy(20, 2.0).evaluate(&create_test_series(&oscillating_prices()));

        assert_eq!(run.strategy_returns.len(), run.benchmark_returns.len());
        assert_eq!(run.strategy_returns[0], 0.0);
        // Long from bar 20 earns bar 21's move 96 -> 100.5
        assert_relative_eq!(run.strategy_returns[21], 100.5 / 96.0 - 1.0, epsilon = 1e-12);
        // Entry bar itself earns nothing
        assert_eq!(run.strategy_returns[20], 0.0);
        // Short from bar 23 earns the negative of 105 -> 104
        assert_relative_eq!(run.strategy_returns[24], -(104.0 / 105.0 - 1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_constant_series_no_trades() {
        let run = strategy(20, 2.0).evaluate(&create_test_series(&[42.0; 300]));

        assert!(run.trades.is_empty());
        assert!(run.positions.iter().all(|p| p.is_flat()));
        assert!(run.strategy_returns.iter().all(|&r| r == 0.0));
    }

    #[test]
    fn test_short_series_does_not_panic() {
        let run = strategy(20, 2.0).evaluate(&create_test_series(&[10.0, 12.0, 9.0]));

        assert_eq!(run.signals.valid_count(), 0);
        assert!(run.trades.is_empty());
        assert_eq!(run.strategy_returns, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_trades_alternate_entry_and_exit() {
        let prices: Vec<f64> = (0..400)
            .map(|i| 100.0 + (i as f64 * 0.3).sin() * 8.0 + (i as f64 * 0.07).cos() * 3.0)
            .collect();
        let run = strategy(10, 1.0).evaluate(&create_test_series(&prices));

        assert!(!run.trades.is_empty());
        for (i, trade) in run.trades.iter().enumerate() {
            assert_eq!(trade.trade_type.is_entry(), i % 2 == 0, "trade {} out of order", i);
        }
    }
}
