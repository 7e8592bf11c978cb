//! Indicator trait definitions.

/// Trait for rolling-window indicators over close prices.
pub trait Indicator: Send + Sync {
    /// The output type of the indicator.
    type Output;

    /// Calculate indicator values for every complete window.
    ///
    /// # Arguments
    /// * `data` - Input data (typically closes, oldest first)
    ///
    /// # Returns
    /// One value per complete window, so `data.len() - period + 1` values,
    /// or none when there is not enough data
    fn calculate(&self, data: &[f64]) -> Vec<Self::Output>;

    /// Get the minimum data points required.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;

    /// Calculate one entry per input point, `None` during warmup.
    fn calculate_aligned(&self, data: &[f64]) -> Vec<Option<Self::Output>> {
        let values = self.calculate(data);
        let warmup = data.len() - values.len();
        std::iter::repeat_with(|| None)
            .take(warmup)
            .chain(values.into_iter().map(Some))
            .collect()
    }
}
