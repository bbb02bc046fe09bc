//! Reconciling the two model forecasts into one exportable table.

use crate::core::{Forecast, Quarter};
use crate::error::{PipelineError, Result};

/// One row of the combined output: both models' point estimates for a
/// quarter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignedRow {
    /// Forecast quarter.
    pub quarter: Quarter,
    /// SARIMA point estimate.
    pub sarima: f64,
    /// Prophet point estimate.
    pub prophet: f64,
}

/// The combined forecast table, one row per forecast step, ascending by
/// quarter. This is the artifact the export/presentation layer consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedForecastTable {
    rows: Vec<AlignedRow>,
}

impl AlignedForecastTable {
    /// Rows in ascending quarter order.
    pub fn rows(&self) -> &[AlignedRow] {
        &self.rows
    }

    /// Number of rows (the forecast horizon).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render the export contract: `Date,SARIMA_Forecast,Prophet_Forecast`,
    /// one row per step, dates as end-of-quarter ISO dates.
    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(["Date", "SARIMA_Forecast", "Prophet_Forecast"])
            .map_err(|e| PipelineError::InputError(e.to_string()))?;
        for row in &self.rows {
            writer
                .write_record([
                    row.quarter.end_date().to_string(),
                    row.sarima.to_string(),
                    row.prophet.to_string(),
                ])
                .map_err(|e| PipelineError::InputError(e.to_string()))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| PipelineError::InputError(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| PipelineError::InputError(e.to_string()))
    }
}

/// Combine the two forecasts on the SARIMA forecast's index.
///
/// The SARIMA horizon is authoritative; the trailing window of the Prophet
/// forecast is taken against it. A Prophet forecast with fewer rows, or one
/// whose trailing quarters do not line up with the SARIMA calendar, cannot
/// be aligned.
pub fn align(sarima: &Forecast, prophet: &Forecast) -> Result<AlignedForecastTable> {
    if prophet.len() < sarima.len() {
        return Err(PipelineError::Alignment(format!(
            "prophet forecast has {} rows, need at least {}",
            prophet.len(),
            sarima.len()
        )));
    }

    let trailing = prophet.tail(sarima.len())?;
    if trailing.start() != sarima.start() {
        return Err(PipelineError::Alignment(format!(
            "forecast calendars diverge: sarima starts {}, prophet tail starts {}",
            sarima.start(),
            trailing.start()
        )));
    }

    let rows = sarima
        .steps()
        .zip(trailing.steps())
        .map(|(s, p)| AlignedRow {
            quarter: s.quarter,
            sarima: s.point,
            prophet: p.point,
        })
        .collect();

    Ok(AlignedForecastTable { rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(year: i32, quarter: u8) -> Quarter {
        Quarter::new(year, quarter).unwrap()
    }

    fn forecast(start: Quarter, points: Vec<f64>) -> Forecast {
        let lower: Vec<f64> = points.iter().map(|p| p - 1.0).collect();
        let upper: Vec<f64> = points.iter().map(|p| p + 1.0).collect();
        Forecast::new(start, points, lower, upper).unwrap()
    }

    #[test]
    fn aligns_on_the_trailing_prophet_window() {
        // SARIMA: 8 future steps. Prophet: 12 steps whose tail covers the
        // same window.
        let sarima = forecast(q(2024, 1), (0..8).map(|i| 100.0 + i as f64).collect());
        let prophet = forecast(q(2023, 1), (0..12).map(|i| 200.0 + i as f64).collect());

        let table = align(&sarima, &prophet).unwrap();
        assert_eq!(table.len(), 8);
        assert_eq!(table.rows()[0].quarter, q(2024, 1));
        assert_eq!(table.rows()[0].sarima, 100.0);
        // Last 8 of the 12 prophet rows: values 204..211.
        assert_eq!(table.rows()[0].prophet, 204.0);
        assert_eq!(table.rows()[7].prophet, 211.0);
    }

    #[test]
    fn equal_length_forecasts_align_one_to_one() {
        let sarima = forecast(q(2024, 1), vec![1.0, 2.0, 3.0]);
        let prophet = forecast(q(2024, 1), vec![4.0, 5.0, 6.0]);
        let table = align(&sarima, &prophet).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.rows()[2].sarima, 3.0);
        assert_eq!(table.rows()[2].prophet, 6.0);
    }

    #[test]
    fn shorter_prophet_forecast_cannot_align() {
        let sarima = forecast(q(2024, 1), (0..8).map(|i| i as f64).collect());
        let prophet = forecast(q(2024, 1), (0..5).map(|i| i as f64).collect());
        assert!(matches!(
            align(&sarima, &prophet),
            Err(PipelineError::Alignment(_))
        ));
    }

    #[test]
    fn mismatched_calendars_cannot_align() {
        let sarima = forecast(q(2024, 1), vec![1.0, 2.0, 3.0]);
        // Same length but shifted one quarter.
        let prophet = forecast(q(2024, 2), vec![4.0, 5.0, 6.0]);
        assert!(matches!(
            align(&sarima, &prophet),
            Err(PipelineError::Alignment(_))
        ));
    }

    #[test]
    fn csv_export_matches_the_output_contract() {
        let sarima = forecast(q(2024, 1), vec![100.5, 101.25]);
        let prophet = forecast(q(2024, 1), vec![99.0, 100.0]);
        let table = align(&sarima, &prophet).unwrap();

        let csv = table.to_csv().unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("Date,SARIMA_Forecast,Prophet_Forecast"));
        assert_eq!(lines.next(), Some("2024-03-31,100.5,99"));
        assert_eq!(lines.next(), Some("2024-06-30,101.25,100"));
        assert_eq!(lines.next(), None);
    }
}
