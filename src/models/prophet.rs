//! Additive trend + seasonality forecaster.
//!
//! Decomposes the series as `y(t) = g(t) + s(t)`: a linear trend over scaled
//! time plus Fourier-term seasonality at the quarterly period, estimated
//! jointly by least squares. Deliberately untuned — fixed default settings
//! contrast with the searched SARIMA path.

use crate::core::{Forecast, QuarterSeries};
use crate::error::{PipelineError, Result};
use crate::models::Forecaster;
use crate::utils::linalg::least_squares;
use crate::utils::stats::{std_dev, two_sided_z};

/// Seasonal period of the quarterly cadence.
const SEASONAL_PERIOD: usize = 4;

/// Additive trend + periodic-seasonality model with default priors.
#[derive(Debug, Clone)]
pub struct Prophet {
    fourier_order: usize,
    confidence_level: f64,
}

impl Default for Prophet {
    fn default() -> Self {
        Self::new()
    }
}

impl Prophet {
    /// Model with the default Fourier order (2) at 95% confidence.
    pub fn new() -> Self {
        Self {
            fourier_order: 2,
            confidence_level: 0.95,
        }
    }

    /// Set the confidence level for the prediction intervals.
    pub fn with_confidence(mut self, level: f64) -> Self {
        self.confidence_level = level;
        self
    }

    /// Set the number of Fourier harmonics for the seasonal component.
    pub fn with_fourier_order(mut self, order: usize) -> Self {
        self.fourier_order = order.max(1);
        self
    }

    /// Design-matrix columns over `total` grid positions: intercept, scaled
    /// time, and the Fourier harmonics. Time is scaled by the history length
    /// so future positions extrapolate beyond 1.
    fn design_columns(&self, total: usize, history_len: usize) -> Vec<Vec<f64>> {
        let scale = history_len.saturating_sub(1).max(1) as f64;
        let mut columns = Vec::with_capacity(2 + 2 * self.fourier_order);
        columns.push(vec![1.0; total]);
        columns.push((0..total).map(|i| i as f64 / scale).collect());

        for k in 1..=self.fourier_order {
            let omega = 2.0 * std::f64::consts::PI * k as f64 / SEASONAL_PERIOD as f64;
            columns.push((0..total).map(|i| (omega * i as f64).cos()).collect());
            // The sine harmonic at the Nyquist frequency is identically zero
            // on an integer grid.
            if 2 * k != SEASONAL_PERIOD {
                columns.push((0..total).map(|i| (omega * i as f64).sin()).collect());
            }
        }
        columns
    }
}

impl Forecaster for Prophet {
    /// Fit on the full history, predict over history plus `steps` extended
    /// quarters, and return only the trailing `steps` future rows.
    fn forecast(&self, series: &QuarterSeries, steps: usize) -> Result<Forecast> {
        if steps == 0 {
            return Err(PipelineError::Forecast(
                "forecast horizon must be positive".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.confidence_level) {
            return Err(PipelineError::InvalidParameter(format!(
                "confidence level must be in (0, 1), got {}",
                self.confidence_level
            )));
        }

        let y = series.interpolated();
        let n = y.len();
        let needed = 2 * SEASONAL_PERIOD;
        if n < needed {
            return Err(PipelineError::InsufficientData { needed, got: n });
        }
        if y.iter().any(|v| !v.is_finite()) {
            return Err(PipelineError::ComputationError(
                "series contains non-finite values".to_string(),
            ));
        }

        let total = n + steps;
        let columns = self.design_columns(total, n);
        let history: Vec<Vec<f64>> = columns.iter().map(|c| c[..n].to_vec()).collect();
        let beta = least_squares(&history, &y)?;

        let predicted: Vec<f64> = (0..total)
            .map(|t| {
                beta.iter()
                    .zip(&columns)
                    .map(|(b, col)| b * col[t])
                    .sum()
            })
            .collect();

        let residuals: Vec<f64> = y
            .iter()
            .zip(&predicted)
            .map(|(actual, fitted)| actual - fitted)
            .collect();
        let sigma = {
            let s = std_dev(&residuals);
            if s.is_finite() {
                s
            } else {
                0.0
            }
        };

        let z = two_sided_z(self.confidence_level);
        let lower: Vec<f64> = predicted.iter().map(|p| p - z * sigma).collect();
        let upper: Vec<f64> = predicted.iter().map(|p| p + z * sigma).collect();

        // In-sample predictions are dropped here, not exposed.
        let full = Forecast::new(series.start(), predicted, lower, upper)?;
        full.tail(steps)
    }

    fn name(&self) -> &str {
        "Prophet"
    }
}
