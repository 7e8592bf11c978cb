//! Per-bar trading instructions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Instruction derived from one bar's z-score.
///
/// `Hold` is the "no new instruction" sentinel: it is emitted while the
/// rolling statistics are undefined, when the window is flat, and in the band
/// between the exit and entry thresholds. It is distinct from `Exit`, which
/// explicitly flattens the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum RawSignal {
    /// Price far below the mean: go long
    Buy,
    /// Price far above the mean: go short
    Sell,
    /// Price back near the mean: flatten
    Exit,
    /// No new instruction
    #[default]
    Hold,
}

impl RawSignal {
    /// Numeric form used in signal tables (+1 buy, -1 sell, 0 exit).
    /// `Hold` has no numeric value.
    pub fn value(&self) -> Option<i8> {
        match self {
            RawSignal::Buy => Some(1),
            RawSignal::Sell => Some(-1),
            RawSignal::Exit => Some(0),
            RawSignal::Hold => None,
        }
    }

    /// Check if this is a new instruction.
    pub fn is_instruction(&self) -> bool {
        !matches!(self, RawSignal::Hold)
    }
}

impl fmt::Display for RawSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawSignal::Buy => write!(f, "BUY"),
            RawSignal::Sell => write!(f, "SELL"),
            RawSignal::Exit => write!(f, "EXIT"),
            RawSignal::Hold => write!(f, "HOLD"),
        }
    }
}
