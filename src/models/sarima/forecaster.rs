//! Search-then-refit SARIMA forecaster.

use crate::core::{Forecast, QuarterSeries};
use crate::error::{PipelineError, Result};
use crate::models::sarima::model::{FitOptions, Sarima};
use crate::models::sarima::search::{SearchEngine, SearchResult, SearchSpace};
use crate::models::Forecaster;

/// Forecaster that searches the configuration grid by AIC and re-fits the
/// winning specification against the full series.
///
/// The search fits run with relaxed constraints and are discarded after
/// scoring; the final fit uses the default (enforced) constraints, matching
/// the tuned model a caller would fit on its own.
#[derive(Debug, Clone)]
pub struct SarimaForecaster {
    engine: SearchEngine,
    confidence_level: f64,
}

impl Default for SarimaForecaster {
    fn default() -> Self {
        Self::new(SearchSpace::default())
    }
}

impl SarimaForecaster {
    /// Forecaster over the given search space at 95% confidence.
    pub fn new(space: SearchSpace) -> Self {
        Self {
            engine: SearchEngine::new(space),
            confidence_level: 0.95,
        }
    }

    /// Set the confidence level for the prediction intervals.
    pub fn with_confidence(mut self, level: f64) -> Self {
        self.confidence_level = level;
        self
    }

    /// Forecast and also return the winning search result for display.
    pub fn forecast_with_selection(
        &self,
        series: &QuarterSeries,
        steps: usize,
    ) -> Result<(Forecast, SearchResult)> {
        if steps == 0 {
            return Err(PipelineError::Forecast(
                "forecast horizon must be positive".to_string(),
            ));
        }

        let selection = self.engine.search(series)?;

        // Final fit of the winning spec; the search fit is not reused.
        let values = series.interpolated();
        let mut model = Sarima::with_options(selection.spec, FitOptions::default());
        model.fit(&values).map_err(|error| {
            PipelineError::Forecast(format!("final fit of {} failed: {error}", selection.spec))
        })?;

        let (point, lower, upper) = model
            .predict_with_intervals(steps, self.confidence_level)
            .map_err(|error| PipelineError::Forecast(error.to_string()))?;

        let forecast = Forecast::new(series.last_quarter().next(), point, lower, upper)?;
        Ok((forecast, selection))
    }
}

impl Forecaster for SarimaForecaster {
    fn forecast(&self, series: &QuarterSeries, steps: usize) -> Result<Forecast> {
        self.forecast_with_selection(series, steps)
            .map(|(forecast, _)| forecast)
    }

    fn name(&self) -> &str {
        "SARIMA"
    }
}
