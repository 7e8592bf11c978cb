//! Core types and traits for the mean-reversion backtester.
//!
//! This crate provides the foundational building blocks including:
//! - Price data types (PricePoint, PriceSeries)
//! - Position, signal and trade types
//! - Strategy configuration and its validation rules
//! - Core traits for price feeds and indicators

pub mod types;
pub mod traits;
pub mod error;

pub use error::{ReversionError, ReversionResult};
pub use types::*;
pub use traits::*;
