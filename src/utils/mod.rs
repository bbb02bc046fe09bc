//! Numerical utilities shared by the forecasting models.

pub mod linalg;
pub mod optimization;
pub mod stats;

pub use linalg::least_squares;
pub use optimization::{minimize, SimplexOptions, SimplexOutcome};
pub use stats::{mean, normal_quantile, std_dev, two_sided_z, variance};
