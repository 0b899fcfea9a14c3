use chrono::{Datelike, Duration, NaiveDate};

use crate::error::{ReportError, ReportResult};
use crate::types::Value;

/// Inclusive date range a report covers.
///
/// Queries bind it as a half-open range, `>= from AND < to + 1 day`, so timestamps anywhere on
/// the last day are included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportPeriod {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl ReportPeriod {
    pub fn new(from: NaiveDate, to: NaiveDate) -> ReportResult<Self> {
        if from > to {
            return Err(ReportError::config(format!(
                "report period starts after it ends ({from} > {to})"
            )));
        }
        Ok(Self { from, to })
    }

    /// The calendar month before the one containing `today`.
    pub fn previous_month(today: NaiveDate) -> Self {
        let first_of_month = today - Duration::days(i64::from(today.day0()));
        let to = first_of_month - Duration::days(1);
        let from = to - Duration::days(i64::from(to.day0()));
        Self { from, to }
    }

    /// Resolve optional CLI bounds; a missing bound comes from the previous month.
    pub fn resolve(
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        today: NaiveDate,
    ) -> ReportResult<Self> {
        let default = Self::previous_month(today);
        Self::new(from.unwrap_or(default.from), to.unwrap_or(default.to))
    }

    /// First day after the period.
    pub fn end_exclusive(&self) -> NaiveDate {
        self.to.succ_opt().unwrap_or(self.to)
    }

    /// Positional parameters: period start (inclusive) and [`Self::end_exclusive`].
    pub fn params(&self) -> Vec<Value> {
        vec![Value::Date(self.from), Value::Date(self.end_exclusive())]
    }
}
