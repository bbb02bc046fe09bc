//! Exhaustive AIC search over the seasonal ARIMA configuration space.

use crate::core::QuarterSeries;
use crate::error::{PipelineError, Result};
use crate::models::sarima::model::{FitOptions, Sarima, SarimaSpec};
use rayon::prelude::*;
use tracing::debug;

/// Bounds of the configuration grid. All bounds are exclusive; the seasonal
/// period is fixed for every candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSpace {
    /// Exclusive bound on the non-seasonal AR order.
    pub max_p: usize,
    /// Exclusive bound on the non-seasonal differencing order.
    pub max_d: usize,
    /// Exclusive bound on the non-seasonal MA order.
    pub max_q: usize,
    /// Exclusive bound on the seasonal AR order.
    pub max_cap_p: usize,
    /// Exclusive bound on the seasonal differencing order.
    pub max_cap_d: usize,
    /// Exclusive bound on the seasonal MA order.
    pub max_cap_q: usize,
    /// Seasonal period applied to every candidate.
    pub period: usize,
}

impl Default for SearchSpace {
    /// The quarterly HPI grid: p<3, d<2, q<3, P<2, D<2, Q<2, s=4 —
    /// 144 candidates.
    fn default() -> Self {
        Self {
            max_p: 3,
            max_d: 2,
            max_q: 3,
            max_cap_p: 2,
            max_cap_d: 2,
            max_cap_q: 2,
            period: 4,
        }
    }
}

impl SearchSpace {
    /// Enumerate every candidate in nested lexicographic order
    /// (p, d, q, P, D, Q), outer to inner.
    pub fn candidates(&self) -> Vec<SarimaSpec> {
        let mut specs =
            Vec::with_capacity(self.max_p * self.max_d * self.max_q * self.max_cap_p * self.max_cap_d * self.max_cap_q);
        for p in 0..self.max_p {
            for d in 0..self.max_d {
                for q in 0..self.max_q {
                    for cap_p in 0..self.max_cap_p {
                        for cap_d in 0..self.max_cap_d {
                            for cap_q in 0..self.max_cap_q {
                                specs.push(SarimaSpec::new(
                                    p, d, q, cap_p, cap_d, cap_q, self.period,
                                ));
                            }
                        }
                    }
                }
            }
        }
        specs
    }
}

/// Outcome of a search: the winning specification and its score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchResult {
    /// Best-scoring specification.
    pub spec: SarimaSpec,
    /// AIC of the winning fit.
    pub aic: f64,
}

/// Pick the best-scoring candidate from `(spec, score)` pairs in
/// enumeration order.
///
/// Comparison is strict `<`, so on an exact AIC tie the earlier-enumerated
/// candidate is kept. Candidates without a score are skipped. Returns `None`
/// when nothing scored.
pub fn select_best(
    scored: impl IntoIterator<Item = (SarimaSpec, Option<f64>)>,
) -> Option<SearchResult> {
    let mut best: Option<SearchResult> = None;
    for (spec, score) in scored {
        let Some(aic) = score else { continue };
        if !aic.is_finite() {
            continue;
        }
        match best {
            Some(current) if aic < current.aic => best = Some(SearchResult { spec, aic }),
            None => best = Some(SearchResult { spec, aic }),
            _ => {}
        }
    }
    best
}

/// Exhaustive search over a [`SearchSpace`], scoring candidates by AIC.
///
/// Candidate fits are independent and run on the rayon worker pool; the
/// shared series is immutable. Scores are collected back in enumeration
/// order and reduced sequentially, so the tie-break stays deterministic
/// regardless of scheduling.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    space: SearchSpace,
    options: FitOptions,
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new(SearchSpace::default())
    }
}

impl SearchEngine {
    /// Engine over the given space, with constraints relaxed for the
    /// candidate fits.
    pub fn new(space: SearchSpace) -> Self {
        Self {
            space,
            options: FitOptions::relaxed(),
        }
    }

    /// The configuration grid in use.
    pub fn space(&self) -> SearchSpace {
        self.space
    }

    /// Search the full grid for the lowest-AIC fit.
    ///
    /// Individual candidate failures (insufficient data for the order,
    /// divergent estimation) are logged and skipped; the search only fails
    /// when no candidate at all could be scored.
    pub fn search(&self, series: &QuarterSeries) -> Result<SearchResult> {
        let values = series.interpolated();
        let candidates = self.space.candidates();

        let scores: Vec<Option<f64>> = candidates
            .par_iter()
            .map(|spec| match self.score_candidate(*spec, &values) {
                Ok(aic) => Some(aic),
                Err(error) => {
                    debug!(spec = %spec, error = %error, "candidate skipped");
                    None
                }
            })
            .collect();

        select_best(candidates.into_iter().zip(scores)).ok_or(PipelineError::SearchFailed)
    }

    /// Fit one candidate and return its AIC.
    fn score_candidate(&self, spec: SarimaSpec, values: &[f64]) -> Result<f64> {
        let mut model = Sarima::with_options(spec, self.options);
        model.fit(values)?;
        model
            .aic()
            .filter(|aic| aic.is_finite())
            .ok_or_else(|| {
                PipelineError::ComputationError(format!("no finite AIC for {spec}"))
            })
    }
}
