//! Common interface for the forecasting models.

use crate::core::{Forecast, QuarterSeries};
use crate::error::Result;

/// A model that forecasts a quarterly series over a fixed horizon.
///
/// Implementations are stateless between calls: each invocation fits the
/// model to the series it is given and returns the forecast. The trait is
/// object-safe and can be used with [`BoxedForecaster`].
pub trait Forecaster {
    /// Forecast `steps` quarters beyond the last quarter of `series`.
    fn forecast(&self, series: &QuarterSeries, steps: usize) -> Result<Forecast>;

    /// Display name of the model.
    fn name(&self) -> &str;
}

/// Type alias for boxed forecaster trait objects.
pub type BoxedForecaster = Box<dyn Forecaster + Send + Sync>;
