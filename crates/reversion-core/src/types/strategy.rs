//! Strategy configuration.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::StrategyError;

/// Exit band as a fraction of the entry threshold. Fixed policy.
pub const EXIT_THRESHOLD_RATIO: f64 = 0.5;
/// Calendar days of history fetched per lookback day.
pub const HISTORY_MULTIPLIER: u64 = 10;
/// Default flat commission rate applied to the fill price.
pub const DEFAULT_COMMISSION_RATE: f64 = 0.001;
/// Default units per trade.
pub const DEFAULT_LOT_SIZE: u32 = 100;

/// Maximum tickers per strategy.
pub const MAX_SYMBOLS: usize = 5;
/// Shortest accepted lookback window.
pub const MIN_LOOKBACK_DAYS: usize = 5;
/// Longest accepted lookback window.
pub const MAX_LOOKBACK_DAYS: usize = 100;
/// Largest accepted absolute entry threshold.
pub const MAX_ENTRY_THRESHOLD: f64 = 5.0;

/// Configuration for one mean-reversion strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Tickers to trade, in report order
    pub ticker_symbols: Vec<String>,
    /// Rolling window length in bars
    pub lookback_days: usize,
    /// Z-score magnitude that opens a position
    pub entry_threshold: f64,
    /// Commission as a fraction of the fill price
    #[serde(default = "default_commission_rate")]
    pub commission_rate: f64,
    /// Units per trade
    #[serde(default = "default_lot_size")]
    pub lot_size: u32,
}

fn default_commission_rate() -> f64 {
    DEFAULT_COMMISSION_RATE
}

fn default_lot_size() -> u32 {
    DEFAULT_LOT_SIZE
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            name: "mean_reversion".to_string(),
            ticker_symbols: vec![],
            lookback_days: 20,
            entry_threshold: 2.0,
            commission_rate: DEFAULT_COMMISSION_RATE,
            lot_size: DEFAULT_LOT_SIZE,
        }
    }
}

impl StrategyConfig {
    /// Create a configuration with default costs.
    pub fn new(symbols: Vec<String>, lookback_days: usize, entry_threshold: f64) -> Self {
        Self {
            ticker_symbols: symbols,
            lookback_days,
            entry_threshold,
            ..Default::default()
        }
    }

    /// Z-score magnitude under which a position is closed.
    pub fn exit_threshold(&self) -> f64 {
        self.entry_threshold * EXIT_THRESHOLD_RATIO
    }

    /// Calendar days of history fetched before the window end, `None` on
    /// overflow.
    pub fn history_days(&self) -> Option<u64> {
        u64::try_from(self.lookback_days)
            .ok()?
            .checked_mul(HISTORY_MULTIPLIER)
    }

    /// Analysis window ending at `end`.
    ///
    /// Fails when the start would fall before the earliest representable date.
    pub fn analysis_window(&self, end: NaiveDate) -> Result<(NaiveDate, NaiveDate), StrategyError> {
        let start = self
            .history_days()
            .and_then(|days| end.checked_sub_days(Days::new(days)))
            .ok_or_else(|| {
                StrategyError::InvalidConfig(format!(
                    "Lookback of {} days has no analysis window ending {}",
                    self.lookback_days, end
                ))
            })?;
        Ok((start, end))
    }

    /// Validate against the documented input ranges.
    pub fn validate(&self) -> Result<(), StrategyError> {
        if self.ticker_symbols.is_empty() {
            return Err(StrategyError::InvalidConfig(
                "At least one symbol required".into(),
            ));
        }
        if self.ticker_symbols.len() > MAX_SYMBOLS {
            return Err(StrategyError::InvalidConfig(format!(
                "At most {} symbols allowed, got {}",
                MAX_SYMBOLS,
                self.ticker_symbols.len()
            )));
        }
        if self.ticker_symbols.iter().any(|s| s.trim().is_empty()) {
            return Err(StrategyError::InvalidConfig(
                "Symbols must not be blank".into(),
            ));
        }
        if !(MIN_LOOKBACK_DAYS..=MAX_LOOKBACK_DAYS).contains(&self.lookback_days) {
            return Err(StrategyError::InvalidConfig(format!(
                "Lookback must be between {} and {} days, got {}",
                MIN_LOOKBACK_DAYS, MAX_LOOKBACK_DAYS, self.lookback_days
            )));
        }
        if !self.entry_threshold.is_finite()
            || self.entry_threshold.abs() > MAX_ENTRY_THRESHOLD
        {
            return Err(StrategyError::InvalidConfig(format!(
                "Entry threshold must be between -{0} and {0}, got {1}",
                MAX_ENTRY_THRESHOLD, self.entry_threshold
            )));
        }
        self.ensure_runnable()
    }

    /// Minimal checks the engine enforces even when the caller skipped
    /// [`validate`](Self::validate).
    pub fn ensure_runnable(&self) -> Result<(), StrategyError> {
        if self.ticker_symbols.is_empty() {
            return Err(StrategyError::InvalidConfig(
                "At least one symbol required".into(),
            ));
        }
        if self.lookback_days == 0 {
            return Err(StrategyError::InvalidConfig(
                "Lookback must be positive".into(),
            ));
        }
        let window_fits = self
            .history_days()
            .and_then(|days| NaiveDate::MAX.checked_sub_days(Days::new(days)))
            .is_some();
        if !window_fits {
            return Err(StrategyError::InvalidConfig(format!(
                "Lookback of {} days exceeds the supported date range",
                self.lookback_days
            )));
        }
        if !self.entry_threshold.is_finite() {
            return Err(StrategyError::InvalidConfig(
                "Entry threshold must be finite".into(),
            ));
        }
        if !self.commission_rate.is_finite() || self.commission_rate < 0.0 {
            return Err(StrategyError::InvalidConfig(
                "Commission rate must be a non-negative number".into(),
            ));
        }
        if self.lot_size == 0 {
            return Err(StrategyError::InvalidConfig(
                "Lot size must be positive".into(),
            ));
        }
        Ok(())
    }
}
