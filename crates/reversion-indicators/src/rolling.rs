//! Trailing mean and sample standard deviation.

use reversion_core::error::IndicatorError;
use reversion_core::traits::Indicator;
use serde::{Deserialize, Serialize};

/// Statistics of one complete window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RollingOutput {
    /// Arithmetic mean of the window
    pub mean: f64,
    /// Sample standard deviation (ddof = 1); `None` for single-value windows
    pub std_dev: Option<f64>,
}

impl RollingOutput {
    /// Distance of `value` from the mean in standard deviations.
    ///
    /// `None` when the deviation is undefined or the window is flat.
    pub fn z_score(&self, value: f64) -> Option<f64> {
        match self.std_dev {
            Some(std_dev) if std_dev > 0.0 => Some((value - self.mean) / std_dev),
            _ => None,
        }
    }
}

/// Rolling mean and sample standard deviation.
///
/// Each window is computed directly rather than with running sums so a flat
/// window reports a deviation of exactly zero.
#[derive(Debug, Clone)]
pub struct RollingStats {
    period: usize,
}

impl RollingStats {
    /// Create a rolling window of `period` values.
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        if period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "Period must be greater than 0".into(),
            ));
        }
        Ok(Self { period })
    }

    fn window_stats(&self, window: &[f64]) -> RollingOutput {
        let n = window.len() as f64;
        let mean = window.iter().sum::<f64>() / n;

        let std_dev = if window.len() < 2 {
            None
        } else if window.iter().all(|&x| x == window[0]) {
            Some(0.0)
        } else {
            let variance = window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
            Some(variance.sqrt())
        };

        RollingOutput { mean, std_dev }
    }
}

impl Indicator for RollingStats {
    type Output = RollingOutput;

    fn calculate(&self, data: &[f64]) -> Vec<RollingOutput> {
        if data.len() < self.period {
            return vec![];
        }

        data.windows(self.period)
            .map(|window| self.window_stats(window))
            .collect()
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "RollingStats"
    }
}
