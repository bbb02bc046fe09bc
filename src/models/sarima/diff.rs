//! Differencing and integration for the seasonal ARIMA model.

/// Apply regular differencing `d` times.
pub fn difference(series: &[f64], d: usize) -> Vec<f64> {
    let mut result = series.to_vec();
    for _ in 0..d {
        if result.len() <= 1 {
            break;
        }
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    result
}

/// Apply seasonal differencing `d` times at the given period.
pub fn seasonal_difference(series: &[f64], d: usize, period: usize) -> Vec<f64> {
    if period == 0 {
        return series.to_vec();
    }
    let mut result = series.to_vec();
    for _ in 0..d {
        if result.len() <= period {
            break;
        }
        result = result
            .iter()
            .skip(period)
            .zip(result.iter())
            .map(|(curr, prev)| curr - prev)
            .collect();
    }
    result
}

/// Reverse regular differencing for a block of future values.
///
/// `original` is the series before the `d` rounds of differencing; its tail
/// seeds the cumulative sums.
pub fn integrate(forecast_diff: &[f64], original: &[f64], d: usize) -> Vec<f64> {
    if d == 0 || forecast_diff.is_empty() {
        return forecast_diff.to_vec();
    }

    let mut result = forecast_diff.to_vec();
    for level in (0..d).rev() {
        let base = difference(original, level);
        let mut cumsum = *base.last().unwrap_or(&0.0);
        for value in result.iter_mut() {
            cumsum += *value;
            *value = cumsum;
        }
    }
    result
}

/// Reverse seasonal differencing for a block of future values.
///
/// Each future value is the differenced forecast plus the value one period
/// earlier, walking forward through the extended series.
pub fn seasonal_integrate(
    forecast_diff: &[f64],
    original: &[f64],
    d: usize,
    period: usize,
) -> Vec<f64> {
    if d == 0 || period == 0 || forecast_diff.is_empty() {
        return forecast_diff.to_vec();
    }

    let mut result = forecast_diff.to_vec();
    for level in (0..d).rev() {
        let base = seasonal_difference(original, level, period);
        if base.len() < period {
            return result;
        }
        let mut extended = base;
        for &value in &result {
            let prior = extended[extended.len() - period];
            extended.push(value + prior);
        }
        result = extended.split_off(extended.len() - forecast_diff.len());
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn difference_removes_linear_trend() {
        let series = vec![1.0, 3.0, 6.0, 10.0, 15.0];
        assert_eq!(difference(&series, 1), vec![2.0, 3.0, 4.0, 5.0]);
        assert_eq!(difference(&series, 2), vec![1.0, 1.0, 1.0]);
        assert_eq!(difference(&series, 0), series);
    }

    #[test]
    fn seasonal_difference_removes_year_over_year_shift() {
        // Quarterly values that grow by 10 each year.
        let series = vec![
            100.0, 120.0, 80.0, 90.0, //
            110.0, 130.0, 90.0, 100.0,
        ];
        assert_eq!(
            seasonal_difference(&series, 1, 4),
            vec![10.0, 10.0, 10.0, 10.0]
        );
    }

    #[test]
    fn integrate_continues_from_series_tail() {
        let original = vec![10.0, 12.0, 15.0, 19.0, 24.0];
        let integrated = integrate(&[6.0, 7.0], &original, 1);
        assert_relative_eq!(integrated[0], 30.0, epsilon = 1e-12);
        assert_relative_eq!(integrated[1], 37.0, epsilon = 1e-12);
    }

    #[test]
    fn integrate_inverts_difference() {
        let original: Vec<f64> = (0..12).map(|i| (i * i) as f64 * 0.5 + 3.0).collect();
        // Differencing the extended series and integrating the future part
        // must reproduce the future values.
        let future = [75.0, 88.0, 102.5];
        let mut extended = original.clone();
        extended.extend(future);
        for d in 1..=2 {
            let diffed = difference(&extended, d);
            let future_diff = &diffed[diffed.len() - future.len()..];
            let rebuilt = integrate(future_diff, &original, d);
            for (a, b) in rebuilt.iter().zip(future) {
                assert_relative_eq!(a, &b, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn seasonal_integrate_inverts_seasonal_difference() {
        let original: Vec<f64> = (0..16)
            .map(|i| 50.0 + 2.0 * i as f64 + [5.0, -3.0, 1.0, -2.0][i % 4])
            .collect();
        let future = [90.0, 84.0, 89.0, 87.0];
        let mut extended = original.clone();
        extended.extend(future);

        let diffed = seasonal_difference(&extended, 1, 4);
        let future_diff = &diffed[diffed.len() - future.len()..];
        let rebuilt = seasonal_integrate(future_diff, &original, 1, 4);
        for (a, b) in rebuilt.iter().zip(future) {
            assert_relative_eq!(a, &b, epsilon = 1e-9);
        }
    }

    #[test]
    fn zero_order_round_trips_are_identity() {
        let series = vec![1.0, 2.0, 3.0];
        assert_eq!(seasonal_difference(&series, 0, 4), series);
        assert_eq!(integrate(&series, &[9.0], 0), series);
        assert_eq!(seasonal_integrate(&series, &[9.0], 0, 4), series);
    }
}
