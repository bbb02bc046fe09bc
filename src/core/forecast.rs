//! Forecast result structure: point estimates with interval bounds per quarter.

use crate::core::quarter::Quarter;
use crate::error::{PipelineError, Result};

/// One forecast step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastStep {
    /// Forecast quarter.
    pub quarter: Quarter,
    /// Point estimate.
    pub point: f64,
    /// Lower interval bound.
    pub lower: f64,
    /// Upper interval bound.
    pub upper: f64,
}

/// An interval forecast over a contiguous quarterly horizon.
///
/// Steps start at `start` and advance one quarter at a time; the point,
/// lower and upper vectors always have equal length.
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    start: Quarter,
    point: Vec<f64>,
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl Forecast {
    /// Create a forecast from parallel point/lower/upper vectors.
    pub fn new(start: Quarter, point: Vec<f64>, lower: Vec<f64>, upper: Vec<f64>) -> Result<Self> {
        if lower.len() != point.len() {
            return Err(PipelineError::DimensionMismatch {
                expected: point.len(),
                got: lower.len(),
            });
        }
        if upper.len() != point.len() {
            return Err(PipelineError::DimensionMismatch {
                expected: point.len(),
                got: upper.len(),
            });
        }
        Ok(Self {
            start,
            point,
            lower,
            upper,
        })
    }

    /// Forecast horizon in steps.
    pub fn len(&self) -> usize {
        self.point.len()
    }

    /// Whether the horizon is empty.
    pub fn is_empty(&self) -> bool {
        self.point.is_empty()
    }

    /// First forecast quarter.
    pub fn start(&self) -> Quarter {
        self.start
    }

    /// The quarter of step `i`.
    pub fn quarter_at(&self, i: usize) -> Quarter {
        self.start.add(i as i64)
    }

    /// All forecast quarters, ascending.
    pub fn quarters(&self) -> Vec<Quarter> {
        (0..self.point.len())
            .map(|i| self.start.add(i as i64))
            .collect()
    }

    /// Point estimates.
    pub fn point(&self) -> &[f64] {
        &self.point
    }

    /// Lower interval bounds.
    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    /// Upper interval bounds.
    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// The full step at position `i`.
    pub fn step(&self, i: usize) -> Option<ForecastStep> {
        if i >= self.point.len() {
            return None;
        }
        Some(ForecastStep {
            quarter: self.start.add(i as i64),
            point: self.point[i],
            lower: self.lower[i],
            upper: self.upper[i],
        })
    }

    /// Iterate over all steps in order.
    pub fn steps(&self) -> impl Iterator<Item = ForecastStep> + '_ {
        (0..self.point.len()).map(|i| self.step(i).expect("index in range"))
    }

    /// The trailing `n` steps as a new forecast.
    ///
    /// Returns an error if fewer than `n` steps are available.
    pub fn tail(&self, n: usize) -> Result<Forecast> {
        if n > self.point.len() {
            return Err(PipelineError::DimensionMismatch {
                expected: n,
                got: self.point.len(),
            });
        }
        let skip = self.point.len() - n;
        Ok(Forecast {
            start: self.start.add(skip as i64),
            point: self.point[skip..].to_vec(),
            lower: self.lower[skip..].to_vec(),
            upper: self.upper[skip..].to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(year: i32, quarter: u8) -> Quarter {
        Quarter::new(year, quarter).unwrap()
    }

    #[test]
    fn forecast_exposes_steps_in_order() {
        let fc = Forecast::new(
            q(2024, 1),
            vec![10.0, 11.0, 12.0],
            vec![9.0, 10.0, 11.0],
            vec![11.0, 12.0, 13.0],
        )
        .unwrap();

        assert_eq!(fc.len(), 3);
        assert_eq!(fc.quarters(), vec![q(2024, 1), q(2024, 2), q(2024, 3)]);

        let step = fc.step(1).unwrap();
        assert_eq!(step.quarter, q(2024, 2));
        assert_eq!(step.point, 11.0);
        assert_eq!(step.lower, 10.0);
        assert_eq!(step.upper, 12.0);
        assert!(fc.step(3).is_none());
    }

    #[test]
    fn forecast_validates_interval_lengths() {
        let result = Forecast::new(q(2024, 1), vec![1.0, 2.0], vec![0.5], vec![1.5, 2.5]);
        assert!(matches!(
            result,
            Err(PipelineError::DimensionMismatch { expected: 2, got: 1 })
        ));
    }

    #[test]
    fn tail_keeps_the_trailing_window() {
        let fc = Forecast::new(
            q(2024, 1),
            vec![1.0, 2.0, 3.0, 4.0],
            vec![0.0, 1.0, 2.0, 3.0],
            vec![2.0, 3.0, 4.0, 5.0],
        )
        .unwrap();

        let tail = fc.tail(2).unwrap();
        assert_eq!(tail.len(), 2);
        assert_eq!(tail.start(), q(2024, 3));
        assert_eq!(tail.point(), &[3.0, 4.0]);

        assert!(fc.tail(5).is_err());
    }
}
