//! Price data sources.

mod cache;
mod csv_source;

pub use cache::PriceCache;
pub use csv_source::{load_file, CsvPriceFeed};

use chrono::NaiveDate;
use futures::future::join_all;
use reversion_core::traits::PriceFeed;
use std::sync::Arc;
use tracing::{info, warn};

/// Fetch every symbol concurrently on the blocking pool and collect the
/// results into a fresh cache.
///
/// Failed symbols are recorded in the cache so the engine reports the
/// fetch error when it skips them.
pub async fn prefetch<F>(feed: Arc<F>, symbols: &[String], start: NaiveDate, end: NaiveDate) -> PriceCache
where
    F: PriceFeed + 'static,
{
    let tasks: Vec<_> = symbols
        .iter()
        .map(|symbol| {
            let feed = Arc::clone(&feed);
            let symbol = symbol.clone();
            tokio::task::spawn_blocking(move || {
                let result = feed.fetch(&symbol, start, end);
                (symbol, result)
            })
        })
        .collect();

    let mut cache = PriceCache::new();
    for (requested, joined) in symbols.iter().zip(join_all(tasks).await) {
        match joined {
            Ok((_, Ok(series))) => cache.insert(series),
            Ok((symbol, Err(e))) => {
                warn!(symbol = %symbol, error = %e, "Prefetch failed");
                cache.record_failure(symbol, e.to_string());
            }
            Err(e) => {
                warn!(symbol = %requested, error = %e, "Prefetch task aborted");
                cache.record_failure(requested.clone(), e.to_string());
            }
        }
    }

    info!(feed = feed.name(), loaded = cache.len(), requested = symbols.len(), "Prefetch complete");
    cache
}
