//! # hpi-forecast
//!
//! Quarterly house-price-index forecasting for city-level series.
//!
//! The pipeline turns an arbitrary, possibly irregular observation table
//! into a clean quarterly series, searches a bounded seasonal-ARIMA grid for
//! the best AIC, forecasts with the winning model and with an independent
//! additive trend+seasonality model, and aligns both forecasts into one
//! exportable table.
//!
//! ```no_run
//! use hpi_forecast::ingest::RawTable;
//! use hpi_forecast::pipeline::{run, PipelineConfig};
//!
//! # fn main() -> hpi_forecast::Result<()> {
//! let table = RawTable::from_csv_path("cleaned_hpi.csv")?;
//! let bundle = run(&table, "Auckland", &PipelineConfig::default())?;
//! println!("{}", bundle.combined.to_csv()?);
//! # Ok(())
//! # }
//! ```

pub mod align;
pub mod core;
pub mod error;
pub mod ingest;
pub mod models;
pub mod pipeline;
pub mod utils;

pub use error::{PipelineError, Result};

pub mod prelude {
    pub use crate::align::{align, AlignedForecastTable};
    pub use crate::core::{Forecast, Quarter, QuarterSeries};
    pub use crate::error::{PipelineError, Result};
    pub use crate::ingest::{RawTable, SeriesBuilder};
    pub use crate::models::sarima::{SarimaForecaster, SearchEngine, SearchSpace};
    pub use crate::models::{Forecaster, Prophet};
    pub use crate::pipeline::{run, ForecastBundle, PipelineConfig};
}
