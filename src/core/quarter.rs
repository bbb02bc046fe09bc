//! Calendar-quarter period type used as the series index.

use crate::error::{PipelineError, Result};
use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::str::FromStr;

/// A calendar quarter, e.g. `2024Q3`.
///
/// Quarters form the fixed cadence of every series and forecast in this
/// crate. They order chronologically and support integer arithmetic, so a
/// gap-free quarterly grid is just a start quarter plus an offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quarter {
    year: i32,
    quarter: u8,
}

impl Quarter {
    /// Create a quarter. `quarter` must be 1..=4.
    pub fn new(year: i32, quarter: u8) -> Result<Self> {
        if !(1..=4).contains(&quarter) {
            return Err(PipelineError::InvalidParameter(format!(
                "quarter must be 1..=4, got {quarter}"
            )));
        }
        Ok(Self { year, quarter })
    }

    /// The quarter containing the given date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            quarter: ((date.month0() / 3) + 1) as u8,
        }
    }

    /// Year component.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Quarter component (1..=4).
    pub fn quarter(&self) -> u8 {
        self.quarter
    }

    /// Last calendar day of the quarter (Mar 31, Jun 30, Sep 30, Dec 31).
    pub fn end_date(&self) -> NaiveDate {
        let (month, day) = match self.quarter {
            1 => (3, 31),
            2 => (6, 30),
            3 => (9, 30),
            _ => (12, 31),
        };
        // Month/day pairs above are always valid.
        NaiveDate::from_ymd_opt(self.year, month, day).expect("valid quarter-end date")
    }

    /// Position on the global quarter axis (year * 4 + quarter index).
    fn ordinal(&self) -> i64 {
        self.year as i64 * 4 + (self.quarter as i64 - 1)
    }

    /// The quarter `n` steps after this one (`n` may be negative).
    pub fn add(&self, n: i64) -> Self {
        let ord = self.ordinal() + n;
        Self {
            year: ord.div_euclid(4) as i32,
            quarter: (ord.rem_euclid(4) + 1) as u8,
        }
    }

    /// The immediately following quarter.
    pub fn next(&self) -> Self {
        self.add(1)
    }

    /// Number of quarterly steps from `earlier` to `self`.
    pub fn steps_since(&self, earlier: Quarter) -> i64 {
        self.ordinal() - earlier.ordinal()
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Q{}", self.year, self.quarter)
    }
}

impl FromStr for Quarter {
    type Err = PipelineError;

    /// Parse `2024Q3` or `2024-Q3`.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let normalized = trimmed.replace("-Q", "Q").replace("-q", "Q");
        let (year_part, quarter_part) = normalized
            .split_once(['Q', 'q'])
            .ok_or_else(|| PipelineError::TimestampError(format!("not a quarter: '{trimmed}'")))?;
        let year: i32 = year_part
            .trim()
            .parse()
            .map_err(|_| PipelineError::TimestampError(format!("bad quarter year: '{trimmed}'")))?;
        let quarter: u8 = quarter_part.trim().parse().map_err(|_| {
            PipelineError::TimestampError(format!("bad quarter number: '{trimmed}'"))
        })?;
        Quarter::new(year, quarter)
            .map_err(|_| PipelineError::TimestampError(format!("bad quarter number: '{trimmed}'")))
    }
}
