//! Rolling window statistics over close prices.
//!
//! Provides the trailing mean and sample standard deviation that drive the
//! z-score signal.

pub mod rolling;

pub use rolling::{RollingOutput, RollingStats};
