//! Simulated trade events.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::PositionState;

/// Trade event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeType {
    /// Entered a long position
    Buy,
    /// Entered a short position
    Sell,
    /// Returned to flat from either side
    Exit,
}

impl TradeType {
    /// Trade type for a transition into `position`.
    pub fn entering(position: PositionState) -> Self {
        match position {
            PositionState::Long => TradeType::Buy,
            PositionState::Short => TradeType::Sell,
            PositionState::Flat => TradeType::Exit,
        }
    }

    /// Check if the trade opens a position.
    pub fn is_entry(&self) -> bool {
        !matches!(self, TradeType::Exit)
    }
}

impl fmt::Display for TradeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeType::Buy => write!(f, "BUY"),
            TradeType::Sell => write!(f, "SELL"),
            TradeType::Exit => write!(f, "EXIT"),
        }
    }
}

/// One position change, filled at the bar's close.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Ticker symbol
    pub ticker: String,
    /// Bar on which the position changed
    pub date: NaiveDate,
    /// Trade event type
    #[serde(rename = "type")]
    pub trade_type: TradeType,
    /// Execution price (the bar's close)
    pub price: f64,
    /// Units traded
    pub quantity: u32,
    /// Flat commission charged on the price
    pub commission: f64,
    /// Z-score at the transition bar
    pub signal_value: Option<f64>,
}
