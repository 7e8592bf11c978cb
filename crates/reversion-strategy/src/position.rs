//! Position state machine.
//!
//! ```text
//!            BUY               EXIT
//!   FLAT ----------> LONG ----------> FLAT
//!   FLAT ----------> SHORT ---------> FLAT
//!            SELL              EXIT
//! ```
//!
//! Entries are only taken from FLAT, so LONG and SHORT never follow each
//! other directly and repeated entries while positioned are ignored. `Hold`
//! leaves the state unchanged; `Exit` flattens from any state.

use reversion_core::types::{PositionState, RawSignal};

/// Next position given the current one and a bar's raw signal.
pub fn transition(state: PositionState, signal: RawSignal) -> PositionState {
    match (state, signal) {
        (_, RawSignal::Exit) => PositionState::Flat,
        (PositionState::Flat, RawSignal::Buy) => PositionState::Long,
        (PositionState::Flat, RawSignal::Sell) => PositionState::Short,
        (current, _) => current,
    }
}

/// Folds [`transition`] over a signal sequence, starting FLAT.
#[derive(Debug, Clone, Default)]
pub struct PositionTracker {
    state: PositionState,
}

impl PositionTracker {
    /// Create a tracker in the FLAT state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current position.
    pub fn state(&self) -> PositionState {
        self.state
    }

    /// Apply one bar's signal and return the resulting position.
    pub fn step(&mut self, signal: RawSignal) -> PositionState {
        self.state = transition(self.state, signal);
        self.state
    }

    /// Position at the close of every bar.
    pub fn track(&mut self, signals: impl IntoIterator<Item = RawSignal>) -> Vec<PositionState> {
        signals.into_iter().map(|signal| self.step(signal)).collect()
    }
}
