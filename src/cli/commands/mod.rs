//! CLI command implementations.

pub mod backtest;
pub mod run_all;
pub mod signals;
pub mod validate;

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use reversion_config::AppConfig;
use reversion_core::types::StrategyConfig;
use std::path::PathBuf;

use crate::cli::StrategyArgs;

/// Build a validated strategy from a named definition or ad hoc flags.
fn resolve_strategy(args: &StrategyArgs, config: &AppConfig) -> Result<StrategyConfig> {
    let strategy = match &args.strategy {
        Some(name) => config
            .strategy(name)
            .with_context(|| format!("Unknown strategy '{}'", name))?,
        None => {
            if args.symbols.is_empty() {
                bail!("Provide --strategy NAME or --symbols A,B");
            }
            StrategyConfig {
                name: "ad_hoc".to_string(),
                ticker_symbols: args.symbols.iter().map(|s| s.trim().to_uppercase()).collect(),
                lookback_days: args.lookback,
                entry_threshold: args.threshold,
                commission_rate: config.backtest.commission_rate,
                lot_size: config.backtest.lot_size,
            }
        }
    };

    strategy.validate().context("Invalid strategy configuration")?;
    Ok(strategy)
}

fn data_dir(arg: &Option<PathBuf>, config: &AppConfig) -> PathBuf {
    arg.clone().unwrap_or_else(|| config.data.dir.clone())
}

fn end_date(arg: Option<NaiveDate>) -> NaiveDate {
    arg.unwrap_or_else(|| Utc::now().date_naive())
}
