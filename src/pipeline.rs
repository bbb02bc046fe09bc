//! End-to-end forecast pipeline for a single entity.

use crate::align::{align, AlignedForecastTable};
use crate::core::{Forecast, QuarterSeries};
use crate::error::Result;
use crate::ingest::{RawTable, SeriesBuilder};
use crate::models::sarima::{SarimaForecaster, SearchResult, SearchSpace};
use crate::models::{Forecaster, Prophet};

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Forecast horizon in quarters.
    pub horizon: usize,
    /// Confidence level for both models' intervals.
    pub confidence_level: f64,
    /// SARIMA search grid.
    pub search: SearchSpace,
}

impl Default for PipelineConfig {
    /// Eight quarters (two years) ahead at 95% confidence over the default
    /// 144-candidate grid.
    fn default() -> Self {
        Self {
            horizon: 8,
            confidence_level: 0.95,
            search: SearchSpace::default(),
        }
    }
}

/// Everything one forecast request produces.
///
/// A bundle only exists when every stage succeeded, so a failed entity never
/// yields partial results.
#[derive(Debug, Clone)]
pub struct ForecastBundle {
    /// The prepared historical series.
    pub series: QuarterSeries,
    /// Winning SARIMA specification and its AIC.
    pub selection: SearchResult,
    /// SARIMA interval forecast.
    pub sarima: Forecast,
    /// Prophet interval forecast.
    pub prophet: Forecast,
    /// The combined, exportable table.
    pub combined: AlignedForecastTable,
}

/// Run the full pipeline for one entity: build the series, forecast with
/// both models, and align the results.
pub fn run(table: &RawTable, entity: &str, config: &PipelineConfig) -> Result<ForecastBundle> {
    let series = SeriesBuilder::build(table, entity)?;

    let sarima_forecaster =
        SarimaForecaster::new(config.search).with_confidence(config.confidence_level);
    let (sarima, selection) = sarima_forecaster.forecast_with_selection(&series, config.horizon)?;

    let prophet_forecaster = Prophet::new().with_confidence(config.confidence_level);
    let prophet = prophet_forecaster.forecast(&series, config.horizon)?;

    let combined = align(&sarima, &prophet)?;

    Ok(ForecastBundle {
        series,
        selection,
        sarima,
        prophet,
        combined,
    })
}
