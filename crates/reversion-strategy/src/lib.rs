//! Mean-reversion strategy pipeline.
//!
//! Each stage is usable on its own:
//! - [`SignalGenerator`]: rolling statistics, z-score and raw signal per bar
//! - [`PositionTracker`]: finite-state machine turning signals into positions
//! - [`TradeExtractor`]: trade events at every position change
//!
//! [`MeanReversionStrategy`] runs all three over one ticker's series.

mod mean_reversion;
mod position;
mod signal;
mod trades;

pub use mean_reversion::{MeanReversionStrategy, TickerRun};
pub use position::{transition, PositionTracker};
pub use signal::{SignalFrame, SignalGenerator, SignalRow};
pub use trades::TradeExtractor;
