//! Backtest command implementation.

use anyhow::{bail, Context, Result};
use reversion_backtest::{BacktestEngine, BacktestOutcome};
use reversion_config::AppConfig;
use reversion_data::{prefetch, CsvPriceFeed};
use std::sync::Arc;
use tracing::info;

use super::{data_dir, end_date, resolve_strategy};
use crate::cli::{BacktestArgs, OutputFormat};

pub async fn run(args: BacktestArgs, config: &AppConfig) -> Result<()> {
    let strategy = resolve_strategy(&args.strategy, config)?;
    let dir = data_dir(&args.strategy.data, config);
    let end = end_date(args.strategy.end);

    info!(strategy = %strategy.name, data = %dir.display(), "Starting backtest");

    let feed = CsvPriceFeed::new(&dir)
        .with_context(|| format!("Cannot read price data from '{}'", dir.display()))?;
    let (start, end) = strategy.analysis_window(end)?;
    let cache = prefetch(Arc::new(feed), &strategy.ticker_symbols, start, end).await;

    let engine = BacktestEngine::new(strategy)?;
    let report = match engine.run_until(&cache, end)? {
        BacktestOutcome::Report(report) => report,
        BacktestOutcome::NoResult { skipped } => {
            println!("No result: no ticker had usable data");
            for ticker in &skipped {
                println!("  {}: {}", ticker.symbol, ticker.reason);
            }
            bail!("Backtest produced no result");
        }
    };

    match args.output {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Text => println!("{}", report.summary()),
    }

    if let Some(save_path) = &args.save {
        std::fs::write(save_path, report.to_json()?)
            .with_context(|| format!("Failed to write {}", save_path.display()))?;
        info!("Results saved to {:?}", save_path);
    }

    if let Some(trades_path) = &args.trades {
        std::fs::write(trades_path, report.trades_to_csv())
            .with_context(|| format!("Failed to write {}", trades_path.display()))?;
        info!("Trade log saved to {:?}", trades_path);
    }

    Ok(())
}
