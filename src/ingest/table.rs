//! Raw tabular input and CSV ingestion.

use crate::core::Quarter;
use crate::error::{PipelineError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use std::io::Read;
use std::path::Path;

/// One observation row: entity key, observation date, value.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// Entity (city) key.
    pub entity: String,
    /// Observation date.
    pub date: NaiveDate,
    /// Observed value; `NaN` for a present-but-missing cell.
    pub value: f64,
}

/// In-memory observation table, the input to the series builder.
///
/// Rows carry only the three columns the pipeline consumes; any extra
/// columns in the source are dropped at ingestion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    rows: Vec<RawRow>,
}

impl RawTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Table from pre-built rows.
    pub fn from_rows(rows: Vec<RawRow>) -> Self {
        Self { rows }
    }

    /// Append a row.
    pub fn push(&mut self, entity: impl Into<String>, date: NaiveDate, value: f64) {
        self.rows.push(RawRow {
            entity: entity.into(),
            date,
            value,
        });
    }

    /// All rows in insertion order.
    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct entity keys in order of first appearance.
    pub fn entities(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for row in &self.rows {
            if !seen.iter().any(|e| e == &row.entity) {
                seen.push(row.entity.clone());
            }
        }
        seen
    }

    /// Read a table from a CSV file.
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())
            .map_err(|e| PipelineError::InputError(e.to_string()))?;
        Self::from_csv_reader(file)
    }

    /// Read a table from CSV data.
    ///
    /// Headers are matched case-insensitively: the entity key comes from
    /// `city`, the value from `hpi`, and the date from `date`, falling back
    /// to `quarter`. Any other columns are ignored. A value cell that is
    /// empty, `na` or `nan` becomes `NaN` and the row is kept.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| PipelineError::InputError(e.to_string()))?;
        let normalized: Vec<String> = headers
            .iter()
            .map(|h| h.trim().to_ascii_lowercase())
            .collect();
        let column = |name: &str| normalized.iter().position(|h| h == name);

        let entity_idx = column("city")
            .ok_or_else(|| PipelineError::MissingColumn("city".to_string()))?;
        let value_idx = column("hpi")
            .ok_or_else(|| PipelineError::MissingColumn("hpi".to_string()))?;
        let date_idx = column("date")
            .or_else(|| column("quarter"))
            .ok_or_else(|| PipelineError::MissingColumn("date or quarter".to_string()))?;

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record.map_err(|e| PipelineError::InputError(e.to_string()))?;
            let line = record
                .position()
                .map(|p| p.line().to_string())
                .unwrap_or_else(|| "?".to_string());

            let entity = record.get(entity_idx).unwrap_or("").to_string();
            let date_cell = record.get(date_idx).unwrap_or("");
            let date = parse_timestamp(date_cell).map_err(|e| {
                PipelineError::TimestampError(format!("line {line}: {e}"))
            })?;
            let value = parse_value(record.get(value_idx).unwrap_or("")).map_err(|e| {
                PipelineError::InputError(format!("line {line}: {e}"))
            })?;

            rows.push(RawRow {
                entity,
                date,
                value,
            });
        }

        Ok(Self { rows })
    }
}

/// Parse a date cell: ISO or slash dates, datetime stamps, or a quarter
/// label resolved to its quarter-end date.
fn parse_timestamp(cell: &str) -> Result<NaiveDate> {
    let cell = cell.trim();
    for format in ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(cell, format) {
            return Ok(date);
        }
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(cell, "%Y-%m-%d %H:%M:%S") {
        return Ok(datetime.date());
    }
    if let Ok(quarter) = cell.parse::<Quarter>() {
        return Ok(quarter.end_date());
    }
    Err(PipelineError::TimestampError(format!(
        "unparseable date '{cell}'"
    )))
}

/// Parse a value cell; empty and NA markers become `NaN`.
fn parse_value(cell: &str) -> Result<f64> {
    let cell = cell.trim();
    if cell.is_empty() || cell.eq_ignore_ascii_case("na") || cell.eq_ignore_ascii_case("nan") {
        return Ok(f64::NAN);
    }
    cell.parse::<f64>()
        .map_err(|_| PipelineError::InputError(format!("unparseable value '{cell}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn reads_csv_with_normalized_headers() {
        let data = "\
City,Date,HPI,Region
Auckland,2023-03-31,104.2,North
Auckland,2023-06-30,105.0,North
Hamilton,2023-03-31,98.7,Waikato
";
        let table = RawTable::from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.entities(), vec!["Auckland", "Hamilton"]);
        assert_eq!(table.rows()[0].date, date(2023, 3, 31));
        assert_eq!(table.rows()[0].value, 104.2);
    }

    #[test]
    fn header_matching_is_case_insensitive() {
        let data = "CITY,DATE,hpi\nX,2023-01-15,50.0\n";
        let table = RawTable::from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn quarter_column_is_accepted_when_date_is_absent() {
        let data = "city,quarter,hpi\nX,2023Q1,50.0\nX,2023-Q2,51.0\n";
        let table = RawTable::from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(table.rows()[0].date, date(2023, 3, 31));
        assert_eq!(table.rows()[1].date, date(2023, 6, 30));
    }

    #[test]
    fn missing_date_like_column_is_fatal() {
        let data = "city,hpi\nX,50.0\n";
        let result = RawTable::from_csv_reader(data.as_bytes());
        assert_eq!(
            result.unwrap_err(),
            PipelineError::MissingColumn("date or quarter".to_string())
        );
    }

    #[test]
    fn missing_entity_or_value_column_is_fatal() {
        let data = "date,hpi\n2023-01-01,50.0\n";
        assert_eq!(
            RawTable::from_csv_reader(data.as_bytes()).unwrap_err(),
            PipelineError::MissingColumn("city".to_string())
        );

        let data = "city,date\nX,2023-01-01\n";
        assert_eq!(
            RawTable::from_csv_reader(data.as_bytes()).unwrap_err(),
            PipelineError::MissingColumn("hpi".to_string())
        );
    }

    #[test]
    fn na_value_cells_become_nan_rows() {
        let data = "city,date,hpi\nX,2023-01-01,\nX,2023-04-01,NA\nX,2023-07-01,42.0\n";
        let table = RawTable::from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(table.len(), 3);
        assert!(table.rows()[0].value.is_nan());
        assert!(table.rows()[1].value.is_nan());
        assert_eq!(table.rows()[2].value, 42.0);
    }

    #[test]
    fn bad_date_cell_reports_the_line() {
        let data = "city,date,hpi\nX,yesterday,50.0\n";
        let err = RawTable::from_csv_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, PipelineError::TimestampError(_)));
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn datetime_stamps_are_accepted() {
        let data = "city,date,hpi\nX,2023-03-31 00:00:00,50.0\n";
        let table = RawTable::from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(table.rows()[0].date, date(2023, 3, 31));
    }

    #[test]
    fn rows_can_be_built_programmatically() {
        let mut table = RawTable::new();
        assert!(table.is_empty());
        table.push("X", date(2023, 1, 1), 1.0);
        table.push("Y", date(2023, 1, 1), 2.0);
        assert_eq!(table.len(), 2);
        assert_eq!(table.entities(), vec!["X", "Y"]);
    }
}
