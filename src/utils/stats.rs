//! Statistical helpers shared by the models.

use statrs::distribution::{ContinuousCDF, Normal};

/// Mean of a slice. NaN for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance (n-1 denominator). NaN for fewer than two values.
pub fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64
}

/// Sample standard deviation.
pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// Quantile of the standard normal distribution.
pub fn normal_quantile(p: f64) -> f64 {
    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }
    let normal = Normal::new(0.0, 1.0).unwrap();
    normal.inverse_cdf(p)
}

/// Two-sided z multiplier for a confidence level, e.g. 0.95 -> ~1.96.
pub fn two_sided_z(level: f64) -> f64 {
    normal_quantile((1.0 + level) / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn mean_and_variance_basics() {
        let values = [2.0, 4.0, 6.0, 8.0];
        assert_relative_eq!(mean(&values), 5.0, epsilon = 1e-12);
        assert_relative_eq!(variance(&values), 20.0 / 3.0, epsilon = 1e-12);
        assert!(mean(&[]).is_nan());
        assert!(variance(&[1.0]).is_nan());
    }

    #[test]
    fn normal_quantile_known_values() {
        assert_relative_eq!(normal_quantile(0.975), 1.959964, epsilon = 1e-4);
        assert_relative_eq!(normal_quantile(0.5), 0.0, epsilon = 1e-9);
        assert_relative_eq!(normal_quantile(0.025), -1.959964, epsilon = 1e-4);
        assert_eq!(normal_quantile(0.0), f64::NEG_INFINITY);
        assert_eq!(normal_quantile(1.0), f64::INFINITY);
    }

    #[test]
    fn two_sided_z_for_common_levels() {
        assert_relative_eq!(two_sided_z(0.95), 1.959964, epsilon = 1e-4);
        assert_relative_eq!(two_sided_z(0.80), 1.281552, epsilon = 1e-4);
    }
}
