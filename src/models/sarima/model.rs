//! Seasonal ARIMA model estimated by conditional sum of squares.

use crate::error::{PipelineError, Result};
use crate::models::sarima::diff::{
    difference, integrate, seasonal_difference, seasonal_integrate,
};
use crate::utils::optimization::{minimize, SimplexOptions};
use crate::utils::stats::two_sided_z;
use std::fmt;

/// A candidate model configuration: non-seasonal order (p, d, q) and
/// seasonal order (P, D, Q) at period `s`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SarimaSpec {
    /// Non-seasonal AR order.
    pub p: usize,
    /// Non-seasonal differencing order.
    pub d: usize,
    /// Non-seasonal MA order.
    pub q: usize,
    /// Seasonal AR order.
    pub cap_p: usize,
    /// Seasonal differencing order.
    pub cap_d: usize,
    /// Seasonal MA order.
    pub cap_q: usize,
    /// Seasonal period.
    pub s: usize,
}

impl SarimaSpec {
    /// Create a specification.
    pub fn new(p: usize, d: usize, q: usize, cap_p: usize, cap_d: usize, cap_q: usize, s: usize) -> Self {
        Self {
            p,
            d,
            q,
            cap_p,
            cap_d,
            cap_q,
            s,
        }
    }

    /// Number of estimated parameters (AR + MA + seasonal AR + seasonal MA
    /// + intercept).
    pub fn num_params(&self) -> usize {
        self.p + self.q + self.cap_p + self.cap_q + 1
    }

    /// First index of the differenced series with a full set of lags.
    fn recursion_start(&self) -> usize {
        (self.p + self.cap_p * self.s).max(self.q + self.cap_q * self.s)
    }

    /// Minimum series length required to fit this specification.
    pub fn min_observations(&self) -> usize {
        self.d + self.cap_d * self.s + self.recursion_start() + 4
    }
}

impl fmt::Display for SarimaSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SARIMA({},{},{})({},{},{})[{}]",
            self.p, self.d, self.q, self.cap_p, self.cap_d, self.cap_q, self.s
        )
    }
}

/// Per-fit estimation flags.
///
/// Relaxing the constraints widens the coefficient bounds so that
/// configurations near the unit circle are still scored instead of being
/// rejected numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitOptions {
    /// Bound AR coefficients inside the stationarity region.
    pub enforce_stationarity: bool,
    /// Bound MA coefficients inside the invertibility region.
    pub enforce_invertibility: bool,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            enforce_stationarity: true,
            enforce_invertibility: true,
        }
    }
}

impl FitOptions {
    /// Both constraints relaxed, as used during the model search.
    pub fn relaxed() -> Self {
        Self {
            enforce_stationarity: false,
            enforce_invertibility: false,
        }
    }

    fn ar_bound(&self) -> f64 {
        if self.enforce_stationarity {
            0.99
        } else {
            2.0
        }
    }

    fn ma_bound(&self) -> f64 {
        if self.enforce_invertibility {
            0.99
        } else {
            2.0
        }
    }
}

/// Coefficients of a fitted SARIMA recursion.
#[derive(Debug, Clone, Default)]
struct Coefficients {
    mu: f64,
    ar: Vec<f64>,
    ma: Vec<f64>,
    seasonal_ar: Vec<f64>,
    seasonal_ma: Vec<f64>,
}

impl Coefficients {
    fn from_flat(params: &[f64], spec: &SarimaSpec) -> Self {
        let mut cursor = params.iter().copied();
        let mu = cursor.next().unwrap_or(0.0);
        let ar: Vec<f64> = cursor.by_ref().take(spec.p).collect();
        let ma: Vec<f64> = cursor.by_ref().take(spec.q).collect();
        let seasonal_ar: Vec<f64> = cursor.by_ref().take(spec.cap_p).collect();
        let seasonal_ma: Vec<f64> = cursor.collect();
        Self {
            mu,
            ar,
            ma,
            seasonal_ar,
            seasonal_ma,
        }
    }
}

/// One-step prediction of the differenced series at index `t`, given the
/// multiplicative seasonal ARMA recursion.
fn one_step(w: &[f64], shocks: &[f64], t: usize, coef: &Coefficients, s: usize) -> f64 {
    let mut pred = coef.mu;

    for (i, &phi) in coef.ar.iter().enumerate() {
        pred += phi * (w[t - 1 - i] - coef.mu);
    }
    for (j, &sphi) in coef.seasonal_ar.iter().enumerate() {
        pred += sphi * (w[t - (j + 1) * s] - coef.mu);
    }
    // Interaction terms of the multiplicative AR polynomials.
    for (i, &phi) in coef.ar.iter().enumerate() {
        for (j, &sphi) in coef.seasonal_ar.iter().enumerate() {
            pred -= phi * sphi * (w[t - 1 - i - (j + 1) * s] - coef.mu);
        }
    }

    for (i, &theta) in coef.ma.iter().enumerate() {
        pred += theta * shocks[t - 1 - i];
    }
    for (j, &stheta) in coef.seasonal_ma.iter().enumerate() {
        pred += stheta * shocks[t - (j + 1) * s];
    }
    for (i, &theta) in coef.ma.iter().enumerate() {
        for (j, &stheta) in coef.seasonal_ma.iter().enumerate() {
            pred += theta * stheta * shocks[t - 1 - i - (j + 1) * s];
        }
    }

    pred
}

/// Conditional sum of squares of the recursion over the differenced series.
fn conditional_sum_of_squares(w: &[f64], coef: &Coefficients, spec: &SarimaSpec) -> f64 {
    let start = spec.recursion_start();
    let n = w.len();
    if n <= start {
        return f64::MAX;
    }

    let mut shocks = vec![0.0; n];
    let mut css = 0.0;
    for t in start..n {
        let pred = one_step(w, &shocks, t, coef, spec.s);
        let error = w[t] - pred;
        shocks[t] = error;
        css += error * error;
    }
    if css.is_finite() {
        css
    } else {
        f64::MAX
    }
}

/// Seasonal ARIMA forecasting model.
///
/// The series is seasonally differenced `D` times at period `s`, then
/// regularly differenced `d` times; the remaining SARMA recursion is
/// estimated by minimizing the conditional sum of squares.
#[derive(Debug, Clone)]
pub struct Sarima {
    spec: SarimaSpec,
    options: FitOptions,
    coef: Coefficients,
    /// Original series, kept for integration.
    original: Option<Vec<f64>>,
    /// Series after seasonal differencing only.
    seasonal_diffed: Option<Vec<f64>>,
    /// Fully differenced series the recursion runs on.
    differenced: Option<Vec<f64>>,
    /// Recursion shocks (residuals on the differenced scale).
    shocks: Option<Vec<f64>>,
    residual_variance: Option<f64>,
    aic: Option<f64>,
}

impl Sarima {
    /// Create a model with default (enforced) constraints.
    pub fn new(spec: SarimaSpec) -> Self {
        Self::with_options(spec, FitOptions::default())
    }

    /// Create a model with explicit estimation flags.
    pub fn with_options(spec: SarimaSpec, options: FitOptions) -> Self {
        Self {
            spec,
            options,
            coef: Coefficients::default(),
            original: None,
            seasonal_diffed: None,
            differenced: None,
            shocks: None,
            residual_variance: None,
            aic: None,
        }
    }

    /// The model specification.
    pub fn spec(&self) -> SarimaSpec {
        self.spec
    }

    /// Akaike information criterion of the fit, if fitted.
    pub fn aic(&self) -> Option<f64> {
        self.aic
    }

    /// Residual variance on the differenced scale, if fitted.
    pub fn residual_variance(&self) -> Option<f64> {
        self.residual_variance
    }

    /// Fit the model to a fully-observed series.
    pub fn fit(&mut self, values: &[f64]) -> Result<()> {
        if values.is_empty() {
            return Err(PipelineError::EmptyData);
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(PipelineError::ComputationError(
                "series contains non-finite values".to_string(),
            ));
        }
        let needed = self.spec.min_observations();
        if values.len() < needed {
            return Err(PipelineError::InsufficientData {
                needed,
                got: values.len(),
            });
        }

        let seasonal_diffed = seasonal_difference(values, self.spec.cap_d, self.spec.s);
        let w = difference(&seasonal_diffed, self.spec.d);
        let start = self.spec.recursion_start();
        if w.len() <= start + 1 {
            return Err(PipelineError::InsufficientData {
                needed: start + 2,
                got: w.len(),
            });
        }

        self.coef = self.estimate(&w)?;

        // Recompute shocks at the optimum and derive the fit criteria.
        let n = w.len();
        let mut shocks = vec![0.0; n];
        let mut css = 0.0;
        for t in start..n {
            let pred = one_step(&w, &shocks, t, &self.coef, self.spec.s);
            let error = w[t] - pred;
            shocks[t] = error;
            css += error * error;
        }
        if !css.is_finite() {
            return Err(PipelineError::ComputationError(
                "parameter estimation diverged".to_string(),
            ));
        }

        let n_eff = (n - start) as f64;
        // Floor keeps the log-likelihood finite for near-perfect fits.
        let variance = (css / n_eff).max(1e-12);
        let k = self.spec.num_params() as f64;
        let log_likelihood =
            -0.5 * n_eff * (1.0 + variance.ln() + (2.0 * std::f64::consts::PI).ln());

        self.residual_variance = Some(variance);
        self.aic = Some(-2.0 * log_likelihood + 2.0 * k);
        self.original = Some(values.to_vec());
        self.seasonal_diffed = Some(seasonal_diffed);
        self.differenced = Some(w);
        self.shocks = Some(shocks);

        Ok(())
    }

    /// Estimate the recursion coefficients on the differenced series.
    fn estimate(&self, w: &[f64]) -> Result<Coefficients> {
        let spec = self.spec;
        let w_mean = w.iter().sum::<f64>() / w.len() as f64;

        let n_coef = spec.p + spec.q + spec.cap_p + spec.cap_q;
        if n_coef == 0 {
            // Mean-only model.
            return Ok(Coefficients {
                mu: w_mean,
                ..Coefficients::default()
            });
        }

        let mut initial = vec![0.0; n_coef + 1];
        initial[0] = w_mean;
        for (i, value) in initial.iter_mut().enumerate().skip(1) {
            *value = 0.1 / i as f64;
        }

        let mut bounds = vec![(f64::NEG_INFINITY, f64::INFINITY)];
        for _ in 0..spec.p {
            bounds.push((-self.options.ar_bound(), self.options.ar_bound()));
        }
        for _ in 0..spec.q {
            bounds.push((-self.options.ma_bound(), self.options.ma_bound()));
        }
        for _ in 0..spec.cap_p {
            bounds.push((-self.options.ar_bound(), self.options.ar_bound()));
        }
        for _ in 0..spec.cap_q {
            bounds.push((-self.options.ma_bound(), self.options.ma_bound()));
        }

        let outcome = minimize(
            |params| {
                let coef = Coefficients::from_flat(params, &spec);
                conditional_sum_of_squares(w, &coef, &spec)
            },
            &initial,
            Some(&bounds),
            &SimplexOptions::default(),
        );

        if !outcome.value.is_finite() || outcome.value == f64::MAX {
            return Err(PipelineError::ComputationError(format!(
                "conditional sum of squares did not evaluate for {}",
                spec
            )));
        }

        Ok(Coefficients::from_flat(&outcome.point, &spec))
    }

    /// Point forecasts for the given horizon, on the original scale.
    pub fn predict(&self, horizon: usize) -> Result<Vec<f64>> {
        let original = self.original.as_ref().ok_or(PipelineError::FitRequired)?;
        let seasonal_diffed = self
            .seasonal_diffed
            .as_ref()
            .ok_or(PipelineError::FitRequired)?;
        let w = self.differenced.as_ref().ok_or(PipelineError::FitRequired)?;
        let shocks = self.shocks.as_ref().ok_or(PipelineError::FitRequired)?;

        if horizon == 0 {
            return Ok(vec![]);
        }

        // Extend the differenced series forward; future shocks are zero.
        let mut extended = w.clone();
        let mut extended_shocks = shocks.clone();
        for _ in 0..horizon {
            let t = extended.len();
            let pred = one_step(&extended, &extended_shocks, t, &self.coef, self.spec.s);
            extended.push(pred);
            extended_shocks.push(0.0);
        }
        let future_diff = &extended[w.len()..];

        // Undo regular differencing, then seasonal differencing.
        let future_seasonal = integrate(future_diff, seasonal_diffed, self.spec.d);
        let predictions =
            seasonal_integrate(&future_seasonal, original, self.spec.cap_d, self.spec.s);

        Ok(predictions)
    }

    /// Point forecasts plus a symmetric interval at the given confidence
    /// level. Returns `(point, lower, upper)`.
    pub fn predict_with_intervals(
        &self,
        horizon: usize,
        level: f64,
    ) -> Result<(Vec<f64>, Vec<f64>, Vec<f64>)> {
        if !(0.0..1.0).contains(&level) {
            return Err(PipelineError::InvalidParameter(format!(
                "confidence level must be in (0, 1), got {level}"
            )));
        }
        let point = self.predict(horizon)?;
        let variance = self.residual_variance.ok_or(PipelineError::FitRequired)?;

        let z = two_sided_z(level);
        let mut lower = Vec::with_capacity(horizon);
        let mut upper = Vec::with_capacity(horizon);
        for (h, value) in point.iter().enumerate() {
            // Forecast-error variance grows linearly with the horizon.
            let se = (variance * (h + 1) as f64).sqrt();
            lower.push(value - z * se);
            upper.push(value + z * se);
        }

        Ok((point, lower, upper))
    }
}
