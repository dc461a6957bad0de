use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::backend::messages::DateRange;
use crate::report::error::{invalid_period, AnalyticsResult};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A closed date range over which metrics are aggregated.
///
/// Construction rejects ranges whose start date falls after the end date; a single-day
/// period (`start == end`) is valid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Period {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl Period {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> AnalyticsResult<Self> {
        if start_date > end_date {
            return Err(invalid_period(format!(
                "Start date `{}` cannot be after end date `{}`.",
                start_date.format(DATE_FORMAT),
                end_date.format(DATE_FORMAT)
            )));
        }
        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// Period covering exactly one calendar day.
    pub fn single_day(date: NaiveDate) -> Self {
        Self {
            start_date: date,
            end_date: date,
        }
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// Structured date-range message used by the typed backend.
    pub fn date_range(&self) -> DateRange {
        DateRange {
            start_date: self.start_date.format(DATE_FORMAT).to_string(),
            end_date: self.end_date.format(DATE_FORMAT).to_string(),
            name: None,
        }
    }

    /// Plain `{startDate, endDate}` map used by the JSON backend.
    pub fn to_json(&self) -> Value {
        json!({
            "startDate": self.start_date.format(DATE_FORMAT).to_string(),
            "endDate": self.end_date.format(DATE_FORMAT).to_string(),
        })
    }
}
