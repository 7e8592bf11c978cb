//! Core data types for the backtester.

mod position;
mod price;
mod signal;
mod strategy;
mod trade;

pub use position::PositionState;
pub use price::{PricePoint, PriceSeries};
pub use signal::RawSignal;
pub use strategy::{
    StrategyConfig, DEFAULT_COMMISSION_RATE, DEFAULT_LOT_SIZE, EXIT_THRESHOLD_RATIO,
    HISTORY_MULTIPLIER, MAX_ENTRY_THRESHOLD, MAX_LOOKBACK_DAYS, MAX_SYMBOLS, MIN_LOOKBACK_DAYS,
};
pub use trade::{Trade, TradeType};
