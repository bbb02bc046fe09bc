//! Series extraction: raw table rows to a clean quarterly series.

use crate::core::{Quarter, QuarterSeries};
use crate::error::{PipelineError, Result};
use crate::ingest::table::RawTable;
use std::collections::BTreeMap;

/// Builds one entity's quarterly series from a raw table.
///
/// Rows are filtered to the entity, bucketed by calendar quarter,
/// mean-aggregated within each quarter, and laid out on the contiguous grid
/// spanning the observed range. Quarters with no observation stay `NaN` so
/// each model can apply its own missing-data policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeriesBuilder;

impl SeriesBuilder {
    /// Build the series for `entity`. Pure transform; the table is not
    /// modified.
    pub fn build(table: &RawTable, entity: &str) -> Result<QuarterSeries> {
        // (sum, count) of finite observations per quarter. The mean is
        // order-independent; NaN observations never enter the sum.
        let mut buckets: BTreeMap<Quarter, (f64, usize)> = BTreeMap::new();
        let mut matched = false;

        for row in table.rows().iter().filter(|r| r.entity == entity) {
            matched = true;
            let quarter = Quarter::from_date(row.date);
            let bucket = buckets.entry(quarter).or_insert((0.0, 0));
            if row.value.is_finite() {
                bucket.0 += row.value;
                bucket.1 += 1;
            }
        }

        if !matched {
            return Err(PipelineError::EntityNotFound(entity.to_string()));
        }

        let start = *buckets.keys().next().expect("matched rows imply a bucket");
        let end = *buckets.keys().next_back().expect("matched rows imply a bucket");
        let len = end.steps_since(start) + 1;

        let values: Vec<f64> = (0..len)
            .map(|offset| {
                match buckets.get(&start.add(offset)) {
                    Some((sum, count)) if *count > 0 => sum / *count as f64,
                    _ => f64::NAN,
                }
            })
            .collect();

        QuarterSeries::new(entity, start, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn q(year: i32, quarter: u8) -> Quarter {
        Quarter::new(year, quarter).unwrap()
    }

    #[test]
    fn builds_contiguous_quarterly_grid() {
        let mut table = RawTable::new();
        table.push("Auckland", date(2022, 3, 31), 100.0);
        table.push("Auckland", date(2022, 6, 30), 102.0);
        table.push("Auckland", date(2022, 9, 30), 104.0);
        // Rows for another city must not leak in.
        table.push("Hamilton", date(2022, 3, 31), 55.0);

        let series = SeriesBuilder::build(&table, "Auckland").unwrap();
        assert_eq!(series.entity(), "Auckland");
        assert_eq!(series.start(), q(2022, 1));
        assert_eq!(series.len(), 3);
        assert_eq!(series.values(), &[100.0, 102.0, 104.0]);
    }

    #[test]
    fn unknown_entity_is_an_error() {
        let mut table = RawTable::new();
        table.push("Auckland", date(2022, 3, 31), 100.0);
        assert_eq!(
            SeriesBuilder::build(&table, "Gotham").unwrap_err(),
            PipelineError::EntityNotFound("Gotham".to_string())
        );
    }

    #[test]
    fn duplicate_quarters_average_deterministically() {
        let mut table = RawTable::new();
        table.push("X", date(2022, 1, 10), 100.0);
        table.push("X", date(2022, 2, 20), 110.0);
        table.push("X", date(2022, 3, 31), 120.0);

        let series = SeriesBuilder::build(&table, "X").unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.values(), &[110.0]);
    }

    #[test]
    fn duplicate_mean_ignores_nan_observations() {
        let mut table = RawTable::new();
        table.push("X", date(2022, 1, 10), 100.0);
        table.push("X", date(2022, 2, 20), f64::NAN);
        table.push("X", date(2022, 3, 31), 120.0);

        let series = SeriesBuilder::build(&table, "X").unwrap();
        assert_eq!(series.values(), &[110.0]);
    }

    #[test]
    fn gaps_are_explicit_missing_values() {
        let mut table = RawTable::new();
        table.push("X", date(2022, 3, 31), 10.0);
        table.push("X", date(2023, 3, 31), 14.0);

        let series = SeriesBuilder::build(&table, "X").unwrap();
        assert_eq!(series.len(), 5);
        assert_eq!(series.start(), q(2022, 1));
        assert_eq!(series.last_quarter(), q(2023, 1));
        assert_eq!(series.values()[0], 10.0);
        assert!(series.values()[1].is_nan());
        assert!(series.values()[2].is_nan());
        assert!(series.values()[3].is_nan());
        assert_eq!(series.values()[4], 14.0);
        assert_eq!(series.missing_count(), 3);
    }

    #[test]
    fn quarter_with_only_nan_observations_stays_missing() {
        let mut table = RawTable::new();
        table.push("X", date(2022, 3, 31), 10.0);
        table.push("X", date(2022, 6, 30), f64::NAN);
        table.push("X", date(2022, 9, 30), 12.0);

        let series = SeriesBuilder::build(&table, "X").unwrap();
        assert_eq!(series.len(), 3);
        assert!(series.values()[1].is_nan());
    }

    #[test]
    fn grid_is_strictly_increasing_with_no_gaps() {
        let mut table = RawTable::new();
        // Out-of-order insertion must not matter.
        table.push("X", date(2023, 12, 31), 9.0);
        table.push("X", date(2022, 3, 31), 1.0);
        table.push("X", date(2023, 3, 31), 5.0);

        let series = SeriesBuilder::build(&table, "X").unwrap();
        let quarters = series.quarters();
        assert_eq!(quarters.len(), 8);
        for pair in quarters.windows(2) {
            assert_eq!(pair[1].steps_since(pair[0]), 1);
        }
        assert_eq!(series.values()[0], 1.0);
        assert_eq!(series.values()[4], 5.0);
        assert_eq!(series.values()[7], 9.0);
    }
}
