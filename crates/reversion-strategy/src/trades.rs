//! Trade extraction from position changes.

use reversion_core::types::{PositionState, StrategyConfig, Trade, TradeType};

use crate::signal::SignalRow;

/// Emits a trade at every bar whose position differs from the previous bar.
#[derive(Debug, Clone)]
pub struct TradeExtractor {
    commission_rate: f64,
    lot_size: u32,
}

impl TradeExtractor {
    /// Create an extractor with a flat commission rate and fixed lot size.
    pub fn new(commission_rate: f64, lot_size: u32) -> Self {
        Self {
            commission_rate,
            lot_size,
        }
    }

    /// Create an extractor from a strategy configuration.
    pub fn from_config(config: &StrategyConfig) -> Self {
        Self::new(config.commission_rate, config.lot_size)
    }

    /// Scan `positions` (one per row) and emit trades filled at the close.
    ///
    /// The position before the first bar is FLAT.
    pub fn extract(&self, ticker: &str, rows: &[SignalRow], positions: &[PositionState]) -> Vec<Trade> {
        let mut trades = Vec::new();
        let mut previous = PositionState::Flat;

        for (row, &position) in rows.iter().zip(positions) {
            if position != previous {
                trades.push(Trade {
                    ticker: ticker.to_string(),
                    date: row.date,
                    trade_type: TradeType::entering(position),
                    price: row.close,
                    quantity: self.lot_size,
                    commission: row.close * self.commission_rate,
                    signal_value: row.z_score,
                });
            }
            previous = position;
        }

        trades
    }
}
