//! Regularly-spaced quarterly series for a single entity.

use crate::core::quarter::Quarter;
use crate::error::{PipelineError, Result};

/// A quarterly time series for one entity (city).
///
/// Values sit on a contiguous quarterly grid anchored at `start`: position
/// `i` holds the observation for quarter `start + i`. The grid therefore has
/// strictly increasing, exactly quarterly-spaced timestamps with no gaps by
/// construction; a quarter with no observation is marked `NaN`, never
/// dropped or zero-filled.
#[derive(Debug, Clone, PartialEq)]
pub struct QuarterSeries {
    entity: String,
    start: Quarter,
    values: Vec<f64>,
}

impl QuarterSeries {
    /// Create a series. `values` must be non-empty.
    pub fn new(entity: impl Into<String>, start: Quarter, values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(PipelineError::EmptyData);
        }
        Ok(Self {
            entity: entity.into(),
            start,
            values,
        })
    }

    /// The entity (city) this series belongs to.
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// First quarter of the grid.
    pub fn start(&self) -> Quarter {
        self.start
    }

    /// Last quarter of the grid.
    pub fn last_quarter(&self) -> Quarter {
        self.start.add(self.values.len() as i64 - 1)
    }

    /// Number of quarters on the grid (observed or missing).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the grid is empty. Always false for a constructed series.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values in grid order; `NaN` marks a missing quarter.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// The quarter at grid position `i`.
    pub fn quarter_at(&self, i: usize) -> Quarter {
        self.start.add(i as i64)
    }

    /// All quarters of the grid, ascending.
    pub fn quarters(&self) -> Vec<Quarter> {
        (0..self.values.len())
            .map(|i| self.start.add(i as i64))
            .collect()
    }

    /// Number of missing (NaN) quarters.
    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_nan()).count()
    }

    /// Whether any quarter on the grid is missing.
    pub fn has_missing(&self) -> bool {
        self.values.iter().any(|v| v.is_nan())
    }

    /// Values with interior gaps filled by linear interpolation.
    ///
    /// The series builder anchors the grid at observed quarters, so the
    /// first and last positions are always observed and every gap has two
    /// finite neighbours to interpolate between.
    pub fn interpolated(&self) -> Vec<f64> {
        let mut filled = self.values.clone();
        let n = filled.len();
        let mut i = 0;
        while i < n {
            if !filled[i].is_nan() {
                i += 1;
                continue;
            }
            let gap_start = i;
            while i < n && filled[i].is_nan() {
                i += 1;
            }
            let left = if gap_start > 0 {
                Some(filled[gap_start - 1])
            } else {
                None
            };
            let right = if i < n { Some(filled[i]) } else { None };
            match (left, right) {
                (Some(l), Some(r)) => {
                    let span = (i - gap_start + 1) as f64;
                    for (k, slot) in (gap_start..i).enumerate() {
                        let t = (k + 1) as f64 / span;
                        filled[slot] = l + t * (r - l);
                    }
                }
                // Edge gaps: hold the nearest observed value.
                (Some(l), None) => filled[gap_start..i].fill(l),
                (None, Some(r)) => filled[gap_start..i].fill(r),
                (None, None) => {}
            }
        }
        filled
    }
}
