//! Z-score signal generation.

use chrono::NaiveDate;
use reversion_core::error::IndicatorError;
use reversion_core::traits::Indicator;
use reversion_core::types::{PriceSeries, RawSignal, StrategyConfig, EXIT_THRESHOLD_RATIO};
use reversion_indicators::RollingStats;
use serde::{Deserialize, Serialize};

/// Derived statistics and instruction for one bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRow {
    pub date: NaiveDate,
    pub close: f64,
    pub rolling_mean: Option<f64>,
    pub rolling_std: Option<f64>,
    pub z_score: Option<f64>,
    pub raw_signal: RawSignal,
}

impl SignalRow {
    /// Check if the bar has a complete lookback window.
    pub fn is_valid(&self) -> bool {
        self.rolling_mean.is_some() && self.rolling_std.is_some()
    }
}

/// Signal table for one ticker, one row per bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalFrame {
    pub symbol: String,
    rows: Vec<SignalRow>,
}

impl SignalFrame {
    /// All rows, warmup bars included.
    pub fn rows(&self) -> &[SignalRow] {
        &self.rows
    }

    /// Rows with defined rolling statistics.
    pub fn valid_rows(&self) -> impl Iterator<Item = &SignalRow> {
        self.rows.iter().filter(|row| row.is_valid())
    }

    /// Number of rows with defined rolling statistics.
    pub fn valid_count(&self) -> usize {
        self.valid_rows().count()
    }

    /// Number of bars.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the frame is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Raw signals in bar order.
    pub fn signals(&self) -> impl Iterator<Item = RawSignal> + '_ {
        self.rows.iter().map(|row| row.raw_signal)
    }
}

/// Computes rolling statistics, z-scores and raw signals.
#[derive(Debug, Clone)]
pub struct SignalGenerator {
    stats: RollingStats,
    entry_threshold: f64,
    exit_threshold: f64,
}

impl SignalGenerator {
    /// Create a generator for a lookback window and entry threshold.
    ///
    /// The exit threshold is always half the entry threshold.
    pub fn new(lookback: usize, entry_threshold: f64) -> Result<Self, IndicatorError> {
        Ok(Self {
            stats: RollingStats::new(lookback)?,
            entry_threshold,
            exit_threshold: entry_threshold * EXIT_THRESHOLD_RATIO,
        })
    }

    /// Create a generator from a strategy configuration.
    pub fn from_config(config: &StrategyConfig) -> Result<Self, IndicatorError> {
        Self::new(config.lookback_days, config.entry_threshold)
    }

    /// Lookback window length.
    pub fn lookback(&self) -> usize {
        self.stats.period()
    }

    /// Classify a z-score.
    ///
    /// The exit band wins over both entries and a sell wins over a buy, which
    /// only matters for negative thresholds. Anything between the bands is
    /// `Hold`.
    pub fn classify(&self, z_score: f64) -> RawSignal {
        if z_score.abs() < self.exit_threshold {
            RawSignal::Exit
        } else if z_score > self.entry_threshold {
            RawSignal::Sell
        } else if z_score < -self.entry_threshold {
            RawSignal::Buy
        } else {
            RawSignal::Hold
        }
    }

    /// Produce one row per bar of `series`.
    pub fn generate(&self, series: &PriceSeries) -> SignalFrame {
        let closes = series.closes();
        let windows = self.stats.calculate_aligned(&closes);

        let rows = series
            .iter()
            .zip(windows)
            .map(|(point, window)| {
                let z_score = window.and_then(|w| w.z_score(point.close));
                SignalRow {
                    date: point.date,
                    close: point.close,
                    rolling_mean: window.map(|w| w.mean),
                    rolling_std: window.and_then(|w| w.std_dev),
                    z_score,
                    raw_signal: z_score.map_or(RawSignal::Hold, |z| self.classify(z)),
                }
            })
            .collect();

        SignalFrame {
            symbol: series.symbol().to_string(),
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn create_test_series(prices: &[f64]) -> PriceSeries {
        PriceSeries::from_closes("TEST", start(), prices).unwrap()
    }

    #[test]
    fn test_classification_bands() {
        let generator = SignalGenerator::new(20, 2.0).unwrap();

        assert_eq!(generator.classify(-2.5), RawSignal::Buy);
        assert_eq!(generator.classify(2.5), RawSignal::Sell);
        assert_eq!(generator.classify(0.5), RawSignal::Exit);
        assert_eq!(generator.classify(-0.99), RawSignal::Exit);
        // No man's land between the exit and entry bands
        assert_eq!(generator.classify(1.5), RawSignal::Hold);
        assert_eq!(generator.classify(-2.0), RawSignal::Hold);
        assert_eq!(generator.classify(1.0), RawSignal::Hold);
    }

    #[test]
    fn test_negative_threshold_precedence() {
        // Exit band is empty, and every z is both above T and below -T
        // somewhere; sell wins over buy.
        let generator = SignalGenerator::new(20, -1.0).unwrap();

        assert_eq!(generator.classify(0.0), RawSignal::Sell);
        assert_eq!(generator.classify(-1.5), RawSignal::Buy);
        assert_eq!(generator.classify(1.5), RawSignal::Sell);
    }

    #[test]
    fn test_constant_series_never_signals() {
        let generator = SignalGenerator::new(20, 2.0).unwrap();
        let frame = generator.generate(&create_test_series(&[50.0; 60]));

        assert_eq!(frame.len(), 60);
        assert_eq!(frame.valid_count(), 41);
        for row in frame.valid_rows() {
            assert_eq!(row.rolling_std, Some(0.0));
            assert_eq!(row.z_score, None);
            assert_eq!(row.raw_signal, RawSignal::Hold);
        }
    }

    #[test]
    fn test_series_shorter_than_lookback() {
        let generator = SignalGenerator::new(20, 2.0).unwrap();
        let frame = generator.generate(&create_test_series(&[10.0, 11.0, 12.0]));

        assert_eq!(frame.len(), 3);
        assert_eq!(frame.valid_count(), 0);
        assert!(frame.signals().all(|s| s == RawSignal::Hold));
    }

    #[test]
    fn test_warmup_rows_undefined() {
        let generator = SignalGenerator::new(5, 1.0).unwrap();
        let frame = generator.generate(&create_test_series(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]));

        for row in &frame.rows()[..4] {
            assert!(!row.is_valid());
            assert_eq!(row.z_score, None);
        }

        let row = &frame.rows()[4];
        assert_relative_eq!(row.rolling_mean.unwrap(), 3.0);
        assert_relative_eq!(row.rolling_std.unwrap(), 1.5811388300841898, epsilon = 1e-12);
        assert_relative_eq!(row.z_score.unwrap(), 2.0 / 1.5811388300841898, epsilon = 1e-12);
        // 1.26 is above the 1.0 entry threshold
        assert_eq!(row.raw_signal, RawSignal::Sell);
    }

    #[test]
    fn test_spike_below_mean_is_a_buy() {
        let mut prices: Vec<f64> = (0..20).map(|i| if i % 2 == 0 { 100.0 } else { 101.0 }).collect();
        prices.push(96.0);

        let generator = SignalGenerator::new(20, 2.0).unwrap();
        let frame = generator.generate(&create_test_series(&prices));
        let row = frame.rows().last().unwrap();

        // Window mean 100.3, sample std sqrt(24.2 / 19)
        assert_relative_eq!(row.rolling_mean.unwrap(), 100.3, epsilon = 1e-9);
        assert_relative_eq!(row.z_score.unwrap(), -4.3 / (24.2f64 / 19.0).sqrt(), epsilon = 1e-9);
        assert_eq!(row.raw_signal, RawSignal::Buy);
    }

    proptest! {
        #[test]
        fn prop_valid_rows_match_history(len in 0usize..80, lookback in 2usize..30) {
            let prices: Vec<f64> = (0..len).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0).collect();
            let generator = SignalGenerator::new(lookback, 2.0).unwrap();
            let frame = generator.generate(&create_test_series(&prices));

            prop_assert_eq!(frame.len(), len);
            prop_assert_eq!(frame.valid_count(), len.saturating_sub(lookback - 1));
        }
    }
}
