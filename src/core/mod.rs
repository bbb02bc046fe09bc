//! Core data structures: quarter periods, quarterly series, forecasts.

mod forecast;
mod quarter;
mod series;

pub use forecast::{Forecast, ForecastStep};
pub use quarter::Quarter;
pub use series::QuarterSeries;
