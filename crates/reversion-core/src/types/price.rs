//! Daily close price data.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// One daily close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Trading day
    pub date: NaiveDate,
    /// Closing price
    pub close: f64,
}

impl PricePoint {
    /// Create a new price point.
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Ordered daily close series for one ticker.
///
/// Dates are strictly ascending (so never duplicated) and every close is
/// finite and positive. The series is only ever derived from, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Create a validated series.
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Result<Self, DataError> {
        let symbol = symbol.into();

        for point in &points {
            if !point.close.is_finite() || point.close <= 0.0 {
                return Err(DataError::InvalidSeries(format!(
                    "{}: close {} on {} is not a positive price",
                    symbol, point.close, point.date
                )));
            }
        }

        for pair in points.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(DataError::InvalidSeries(format!(
                    "{}: dates out of order or duplicated at {}",
                    symbol, pair[1].date
                )));
            }
        }

        Ok(Self { symbol, points })
    }

    /// Build a series from consecutive calendar days starting at `start`.
    pub fn from_closes(
        symbol: impl Into<String>,
        start: NaiveDate,
        closes: &[f64],
    ) -> Result<Self, DataError> {
        let points = start
            .iter_days()
            .zip(closes)
            .map(|(date, &close)| PricePoint::new(date, close))
            .collect();
        Self::new(symbol, points)
    }

    /// Ticker symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Number of bars.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the series is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All points, oldest first.
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Get a point by index (0 = oldest).
    pub fn get(&self, index: usize) -> Option<&PricePoint> {
        self.points.get(index)
    }

    /// Extract close prices as a vector.
    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    /// Extract dates as a vector.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    /// First trading day, if any.
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    /// Last trading day, if any.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// Sub-series restricted to `start..=end`.
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> PriceSeries {
        PriceSeries {
            symbol: self.symbol.clone(),
            points: self
                .points
                .iter()
                .filter(|p| p.date >= start && p.date <= end)
                .copied()
                .collect(),
        }
    }

    /// Simple bar-over-bar returns. The first bar has no prior close and
    /// contributes 0.
    pub fn returns(&self) -> Vec<f64> {
        let mut returns = Vec::with_capacity(self.points.len());
        if self.points.is_empty() {
            return returns;
        }
        returns.push(0.0);
        for pair in self.points.windows(2) {
            returns.push(pair[1].close / pair[0].close - 1.0);
        }
        returns
    }

    /// Get an iterator over the points.
    pub fn iter(&self) -> impl Iterator<Item = &PricePoint> {
        self.points.iter()
    }
}
