//! Per-run price cache.

use chrono::NaiveDate;
use reversion_core::error::DataError;
use reversion_core::traits::PriceFeed;
use reversion_core::types::PriceSeries;
use std::collections::HashMap;

/// In-memory series keyed by symbol, filled once and then read by the engine.
///
/// Each run builds its own cache; nothing is shared between runs.
#[derive(Debug, Default, Clone)]
pub struct PriceCache {
    series: HashMap<String, PriceSeries>,
    failures: HashMap<String, String>,
}

impl PriceCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a series under its own symbol.
    pub fn insert(&mut self, series: PriceSeries) {
        let symbol = series.symbol().to_string();
        self.failures.remove(&symbol);
        self.series.insert(symbol, series);
    }

    /// Remember why `symbol` could not be loaded.
    pub fn record_failure(&mut self, symbol: impl Into<String>, reason: impl Into<String>) {
        self.failures.insert(symbol.into(), reason.into());
    }

    /// Get a cached series.
    pub fn get(&self, symbol: &str) -> Option<&PriceSeries> {
        self.series.get(symbol)
    }

    /// Check if a series is cached.
    pub fn contains(&self, symbol: &str) -> bool {
        self.series.contains_key(symbol)
    }

    /// Number of cached series.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Check if the cache holds no series.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Drop every series and failure.
    pub fn clear(&mut self) {
        self.series.clear();
        self.failures.clear();
    }
}

impl PriceFeed for PriceCache {
    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries, DataError> {
        if let Some(reason) = self.failures.get(symbol) {
            return Err(DataError::FetchFailed {
                symbol: symbol.to_string(),
                reason: reason.clone(),
            });
        }

        let series = self
            .series
            .get(symbol)
            .ok_or_else(|| DataError::SymbolNotFound(symbol.to_string()))?
            .between(start, end);

        if series.is_empty() {
            return Err(DataError::NoDataAvailable {
                symbol: symbol.to_string(),
                start,
                end,
            });
        }
        Ok(series)
    }

    fn name(&self) -> &str {
        "cache"
    }
}
