//! Run every active strategy concurrently.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use futures::future::join_all;
use reversion_backtest::{BacktestEngine, BacktestOutcome};
use reversion_config::AppConfig;
use reversion_core::types::StrategyConfig;
use reversion_data::{prefetch, CsvPriceFeed};
use std::sync::Arc;
use tracing::{error, info};

use super::{data_dir, end_date};
use crate::cli::RunAllArgs;

pub async fn run(args: RunAllArgs, config: &AppConfig) -> Result<()> {
    let dir = data_dir(&args.data, config);
    let end = end_date(args.end);
    let feed = Arc::new(
        CsvPriceFeed::new(&dir).with_context(|| format!("Cannot read price data from '{}'", dir.display()))?,
    );

    let strategies: Vec<StrategyConfig> = config
        .active_strategies()
        .map(|definition| config.to_strategy_config(definition))
        .collect();
    if strategies.is_empty() {
        println!("No active strategies in the configuration");
        return Ok(());
    }

    info!(count = strategies.len(), %end, "Running all strategies");

    // Each strategy gets its own engine and cache
    let tasks: Vec<_> = strategies
        .into_iter()
        .map(|strategy| {
            let feed = Arc::clone(&feed);
            tokio::spawn(async move {
                let name = strategy.name.clone();
                (name, run_one(strategy, feed, end).await)
            })
        })
        .collect();

    let mut successful = 0;
    let mut failed = 0;

    for joined in join_all(tasks).await {
        let (name, result) = joined.context("Strategy task panicked")?;
        match result {
            Ok(line) => {
                successful += 1;
                println!("{:<24} {}", name, line);
            }
            Err(e) => {
                failed += 1;
                error!(strategy = %name, error = %e, "Strategy failed");
                println!("{:<24} FAILED: {:#}", name, e);
            }
        }
    }

    println!();
    println!("Completed: {} successful, {} failed", successful, failed);

    if successful == 0 {
        bail!("Every strategy failed");
    }
    Ok(())
}

async fn run_one(strategy: StrategyConfig, feed: Arc<CsvPriceFeed>, end: NaiveDate) -> Result<String> {
    strategy.validate()?;
    let (start, end) = strategy.analysis_window(end)?;
    let cache = prefetch(feed, &strategy.ticker_symbols, start, end).await;

    let engine = BacktestEngine::new(strategy)?;
    let outcome = tokio::task::spawn_blocking(move || engine.run_until(&cache, end)).await??;

    match outcome {
        BacktestOutcome::Report(report) => Ok(format!(
            "return {:>8.2}%  sharpe {:>6.2}  max dd {:>7.2}%  trades {:>4}",
            report.stats.cumulative_return * 100.0,
            report.stats.sharpe_ratio,
            report.stats.max_drawdown * 100.0,
            report.stats.total_trades
        )),
        BacktestOutcome::NoResult { skipped } => {
            let symbols: Vec<&str> = skipped.iter().map(|s| s.symbol.as_str()).collect();
            bail!("no result, skipped {}", symbols.join(", "))
        }
    }
}
