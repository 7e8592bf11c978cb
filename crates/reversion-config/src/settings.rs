//! Configuration structures.

use reversion_core::error::{ReversionError, ReversionResult, StrategyError};
use reversion_core::types::{StrategyConfig, DEFAULT_COMMISSION_RATE, DEFAULT_LOT_SIZE};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub backtest: BacktestSettings,
    #[serde(default)]
    pub strategies: Vec<StrategyDefinition>,
}

impl AppConfig {
    /// Look up a strategy by name and build its runnable configuration.
    pub fn strategy(&self, name: &str) -> Result<StrategyConfig, StrategyError> {
        self.strategies
            .iter()
            .find(|s| s.name == name)
            .map(|s| self.to_strategy_config(s))
            .ok_or_else(|| StrategyError::NotFound(name.to_string()))
    }

    /// Strategies flagged active, in file order.
    pub fn active_strategies(&self) -> impl Iterator<Item = &StrategyDefinition> {
        self.strategies.iter().filter(|s| s.active)
    }

    /// Combine a strategy definition with the shared cost settings.
    pub fn to_strategy_config(&self, definition: &StrategyDefinition) -> StrategyConfig {
        StrategyConfig {
            name: definition.name.clone(),
            ticker_symbols: definition.tickers.clone(),
            lookback_days: definition.lookback_days,
            entry_threshold: definition.entry_threshold,
            commission_rate: self.backtest.commission_rate,
            lot_size: self.backtest.lot_size,
        }
    }

    /// Validate every strategy and reject duplicate names.
    pub fn validate(&self) -> ReversionResult<()> {
        let mut seen = HashSet::new();
        for definition in &self.strategies {
            if !seen.insert(definition.name.as_str()) {
                return Err(ReversionError::Config(format!(
                    "Duplicate strategy name: {}",
                    definition.name
                )));
            }
            self.to_strategy_config(definition).validate().map_err(|e| {
                StrategyError::InvalidConfig(format!("{}: {}", definition.name, e))
            })?;
        }
        Ok(())
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "reversion".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    /// Check if JSON output is selected.
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// Price data location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSettings {
    /// Directory holding one CSV file per ticker
    pub dir: PathBuf,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
        }
    }
}

/// Costs shared by every strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestSettings {
    pub commission_rate: f64,
    pub lot_size: u32,
}

impl Default for BacktestSettings {
    fn default() -> Self {
        Self {
            commission_rate: DEFAULT_COMMISSION_RATE,
            lot_size: DEFAULT_LOT_SIZE,
        }
    }
}

/// A named strategy in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyDefinition {
    pub name: String,
    pub tickers: Vec<String>,
    pub lookback_days: usize,
    pub entry_threshold: f64,
    /// Inactive strategies are skipped by `run-all`
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}
