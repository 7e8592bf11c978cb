//! Directional position state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position held at the close of a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PositionState {
    Short,
    #[default]
    Flat,
    Long,
}

impl PositionState {
    /// Signed exposure: -1 short, 0 flat, +1 long.
    #[inline]
    pub fn value(&self) -> i8 {
        match self {
            PositionState::Short => -1,
            PositionState::Flat => 0,
            PositionState::Long => 1,
        }
    }

    /// Exposure as a return multiplier.
    #[inline]
    pub fn exposure(&self) -> f64 {
        f64::from(self.value())
    }

    /// Check if this is a long position.
    pub fn is_long(&self) -> bool {
        matches!(self, PositionState::Long)
    }

    /// Check if this is a short position.
    pub fn is_short(&self) -> bool {
        matches!(self, PositionState::Short)
    }

    /// Check if no position is held.
    pub fn is_flat(&self) -> bool {
        matches!(self, PositionState::Flat)
    }
}

impl fmt::Display for PositionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionState::Short => write!(f, "SHORT"),
            PositionState::Flat => write!(f, "FLAT"),
            PositionState::Long => write!(f, "LONG"),
        }
    }
}
