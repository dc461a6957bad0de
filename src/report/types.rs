use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Backend-computed summary requested alongside the report rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetricAggregation {
    Unspecified,
    Total,
    Count,
    Minimum,
    Maximum,
}

impl MetricAggregation {
    /// Wire code of the aggregation (`TOTAL=1`, `COUNT=4`, `MINIMUM=5`, `MAXIMUM=6`).
    pub fn code(self) -> i32 {
        match self {
            MetricAggregation::Unspecified => 0,
            MetricAggregation::Total => 1,
            MetricAggregation::Count => 4,
            MetricAggregation::Minimum => 5,
            MetricAggregation::Maximum => 6,
        }
    }

    /// Maps an aggregation name to its variant; unknown names become `Unspecified`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "TOTAL" => MetricAggregation::Total,
            "COUNT" => MetricAggregation::Count,
            "MINIMUM" => MetricAggregation::Minimum,
            "MAXIMUM" => MetricAggregation::Maximum,
            _ => MetricAggregation::Unspecified,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MetricAggregation::Unspecified => "METRIC_AGGREGATION_UNSPECIFIED",
            MetricAggregation::Total => "TOTAL",
            MetricAggregation::Count => "COUNT",
            MetricAggregation::Minimum => "MINIMUM",
            MetricAggregation::Maximum => "MAXIMUM",
        }
    }
}

impl fmt::Display for MetricAggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A response cell after casting.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TypedValue {
    Date(NaiveDate),
    Integer(i64),
    String(String),
}

impl TypedValue {
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            TypedValue::Date(date) => Some(*date),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            TypedValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedValue::String(value) => Some(value),
            _ => None,
        }
    }
}

/// One normalized row: dimension fields first, then metric fields, in request order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RowRecord {
    fields: Vec<(String, TypedValue)>,
}

impl RowRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name`, replacing the value in place when the field already exists.
    pub fn insert(&mut self, name: impl Into<String>, value: TypedValue) {
        let name = name.into();
        match self.fields.iter_mut().find(|(field, _)| *field == name) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&TypedValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypedValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl Serialize for RowRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Per-report metadata as reported by the backend.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReportMetadata {
    #[default]
    None,
    #[serde(rename_all = "camelCase")]
    Structured {
        currency_code: String,
        time_zone: String,
        subject_to_thresholding: bool,
    },
    /// Metadata object of the JSON backend, passed through untouched.
    Opaque(Value),
}

/// Metric name to requested aggregation values, read verbatim from the response.
pub type AggregationRecord = BTreeMap<String, BTreeMap<MetricAggregation, String>>;

/// Backend-independent result of one report.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedResult {
    /// Rows grouped by period index; every requested period has an entry.
    pub rows: BTreeMap<usize, Vec<RowRecord>>,
    pub row_count: usize,
    pub total_row_count: i64,
    pub metadata: ReportMetadata,
    pub metric_aggregations: Vec<AggregationRecord>,
}

impl NormalizedResult {
    pub fn rows_for(&self, period_index: usize) -> &[RowRecord] {
        self.rows
            .get(&period_index)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every row across periods, in period order.
    pub fn all_rows(&self) -> impl Iterator<Item = &RowRecord> {
        self.rows.values().flatten()
    }
}
