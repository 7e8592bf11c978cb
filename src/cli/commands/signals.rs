//! Signal table command implementation.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use reversion_config::AppConfig;
use reversion_core::traits::PriceFeed;
use reversion_core::types::RawSignal;
use reversion_data::CsvPriceFeed;
use reversion_strategy::MeanReversionStrategy;
use serde::Serialize;
use std::io;
use tracing::info;

use super::{data_dir, end_date, resolve_strategy};
use crate::cli::SignalsArgs;

/// One CSV line of the audit table.
#[derive(Serialize)]
struct SignalRecord {
    date: NaiveDate,
    close: f64,
    rolling_mean: Option<f64>,
    rolling_std: Option<f64>,
    z_score: Option<f64>,
    raw_signal: RawSignal,
    position: i8,
}

pub async fn run(args: SignalsArgs, config: &AppConfig) -> Result<()> {
    let strategy = resolve_strategy(&args.strategy, config)?;
    let ticker = match &args.ticker {
        Some(ticker) => ticker.trim().to_uppercase(),
        None => strategy
            .ticker_symbols
            .first()
            .cloned()
            .context("Strategy has no symbols")?,
    };

    let dir = data_dir(&args.strategy.data, config);
    let feed = CsvPriceFeed::new(&dir)
        .with_context(|| format!("Cannot read price data from '{}'", dir.display()))?;
    let (start, end) = strategy.analysis_window(end_date(args.strategy.end))?;
    let series = feed
        .fetch(&ticker, start, end)
        .with_context(|| format!("No prices for {}", ticker))?;

    let run = MeanReversionStrategy::new(strategy)?.evaluate(&series);
    info!(symbol = %ticker, bars = series.len(), trades = run.trades.len(), "Signal table ready");

    let mut writer = csv::Writer::from_writer(io::stdout().lock());
    for (row, position) in run.signals.rows().iter().zip(&run.positions) {
        writer.serialize(SignalRecord {
            date: row.date,
            close: row.close,
            rolling_mean: row.rolling_mean,
            rolling_std: row.rolling_std,
            z_score: row.z_score,
            raw_signal: row.raw_signal,
            position: position.value(),
        })?;
    }
    writer.flush()?;

    Ok(())
}
