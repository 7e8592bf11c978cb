//! Validate configuration command.

use anyhow::Result;
use reversion_config::load_config;
use std::path::Path;

pub async fn run(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    };

    if let Err(e) = config.validate() {
        println!("Strategy error: {}", e);
        return Err(e.into());
    }

    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Environment: {}", config.app.environment);
    println!("Log level: {}", config.logging.level);
    println!("Data directory: {}", config.data.dir.display());
    println!("Commission rate: {}", config.backtest.commission_rate);
    println!("Lot size: {}", config.backtest.lot_size);
    println!();
    println!("Strategies ({}):", config.strategies.len());
    for strategy in &config.strategies {
        println!(
            "  {:<20} {:<24} lookback {:>3}  threshold {:>5.2}{}",
            strategy.name,
            strategy.tickers.join(","),
            strategy.lookback_days,
            strategy.entry_threshold,
            if strategy.active { "" } else { "  (inactive)" }
        );
    }

    Ok(())
}
