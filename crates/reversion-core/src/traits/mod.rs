//! Core traits for the backtester.

mod data_source;
mod indicator;

pub use data_source::PriceFeed;
pub use indicator::Indicator;
