//! Price feed trait definitions.

use crate::error::DataError;
use crate::types::PriceSeries;
use chrono::NaiveDate;

/// Source of historical daily closes.
///
/// The engine calls `fetch` once per ticker and treats it as a blocking call;
/// any timeout belongs to the implementation. Implementations must not share
/// mutable state between runs.
pub trait PriceFeed: Send + Sync {
    /// Fetch the close series for `symbol`.
    ///
    /// # Arguments
    /// * `symbol` - The ticker to fetch
    /// * `start` - First day of the range (inclusive)
    /// * `end` - Last day of the range (inclusive)
    ///
    /// # Returns
    /// A series ordered from oldest to newest
    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate)
        -> Result<PriceSeries, DataError>;

    /// Get the feed name.
    fn name(&self) -> &str;
}

impl<F: PriceFeed + ?Sized> PriceFeed for &F {
    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataError> {
        (**self).fetch(symbol, start, end)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<F: PriceFeed + ?Sized> PriceFeed for std::sync::Arc<F> {
    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataError> {
        (**self).fetch(symbol, start, end)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
