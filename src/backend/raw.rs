use serde_json::Value;

use crate::backend::messages::{Row, RunReportResponse};
use crate::report::error::{integrity_error, AnalyticsError, AnalyticsResult};
use crate::report::types::ReportMetadata;

/// One response row as positional slots: dimension values, then metric values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawRow {
    pub dimension_values: Vec<String>,
    pub metric_values: Vec<String>,
}

impl RawRow {
    pub fn new<D, M, S, T>(dimension_values: D, metric_values: M) -> Self
    where
        D: IntoIterator<Item = S>,
        M: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            dimension_values: dimension_values.into_iter().map(Into::into).collect(),
            metric_values: metric_values.into_iter().map(Into::into).collect(),
        }
    }
}

/// Backend-independent view of one report response.
///
/// Both backends project their wire representation into this shape so that a single
/// normalization pass serves either of them. Slots carry no field names; they line up
/// with the requested dimensions and metrics by position.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawReport {
    pub rows: Vec<RawRow>,
    /// Server-side total ignoring the limit/offset window.
    pub row_count: i64,
    pub totals: Vec<Vec<String>>,
    pub minimums: Vec<Vec<String>>,
    pub maximums: Vec<Vec<String>>,
    pub metadata: ReportMetadata,
}

impl TryFrom<RunReportResponse> for RawReport {
    type Error = AnalyticsError;

    /// Fails on a slot without a `value`, the same way [`RawReport::from_json`] does.
    fn try_from(response: RunReportResponse) -> AnalyticsResult<Self> {
        let metadata = match response.metadata {
            Some(metadata) => ReportMetadata::Structured {
                currency_code: metadata.currency_code,
                time_zone: metadata.time_zone,
                subject_to_thresholding: metadata.subject_to_thresholding,
            },
            None => ReportMetadata::None,
        };

        Ok(Self {
            rows: response
                .rows
                .into_iter()
                .enumerate()
                .map(|(index, row)| row_slots(row, index))
                .collect::<AnalyticsResult<Vec<_>>>()?,
            row_count: response.row_count,
            totals: section_slots(response.totals, "totals")?,
            minimums: section_slots(response.minimums, "minimums")?,
            maximums: section_slots(response.maximums, "maximums")?,
            metadata,
        })
    }
}

fn row_slots(row: Row, index: usize) -> AnalyticsResult<RawRow> {
    Ok(RawRow {
        dimension_values: typed_slots(
            row.dimension_values.into_iter().map(|v| v.value),
            &format!("rows[{index}].dimensionValues"),
        )?,
        metric_values: typed_slots(
            row.metric_values.into_iter().map(|v| v.value),
            &format!("rows[{index}].metricValues"),
        )?,
    })
}

fn section_slots(rows: Vec<Row>, name: &str) -> AnalyticsResult<Vec<Vec<String>>> {
    rows.into_iter()
        .enumerate()
        .map(|(index, row)| {
            typed_slots(
                row.metric_values.into_iter().map(|v| v.value),
                &format!("{name}[{index}].metricValues"),
            )
        })
        .collect()
}

fn typed_slots(
    values: impl Iterator<Item = Option<String>>,
    context: &str,
) -> AnalyticsResult<Vec<String>> {
    values
        .enumerate()
        .map(|(slot, value)| value.ok_or_else(|| missing_value(context, slot)))
        .collect()
}

fn missing_value(context: &str, slot: usize) -> AnalyticsError {
    integrity_error(format!("{context}[{slot}] has no string `value`"))
}

impl RawReport {
    /// Projects a decoded JSON report object.
    ///
    /// Absent `rows`, `rowCount` or aggregate sections mean an empty report; anything
    /// present but malformed is rejected rather than skipped.
    pub fn from_json(report: &Value) -> AnalyticsResult<Self> {
        let object = report
            .as_object()
            .ok_or_else(|| integrity_error("report response is not a JSON object"))?;

        let rows = match object.get("rows") {
            None | Some(Value::Null) => Vec::new(),
            Some(rows) => json_array(rows, "rows")?
                .iter()
                .enumerate()
                .map(|(index, row)| json_row(row, index))
                .collect::<AnalyticsResult<Vec<_>>>()?,
        };

        let row_count = match object.get("rowCount") {
            None | Some(Value::Null) => 0,
            Some(Value::Number(number)) => number
                .as_i64()
                .ok_or_else(|| integrity_error(format!("invalid rowCount `{number}`")))?,
            // int64 fields may be rendered as strings
            Some(Value::String(text)) => text
                .parse::<i64>()
                .map_err(|err| integrity_error(format!("invalid rowCount `{text}`: {err}")))?,
            Some(other) => return Err(integrity_error(format!("invalid rowCount `{other}`"))),
        };

        Ok(Self {
            rows,
            row_count,
            totals: json_section(object.get("totals"), "totals")?,
            minimums: json_section(object.get("minimums"), "minimums")?,
            maximums: json_section(object.get("maximums"), "maximums")?,
            metadata: match object.get("metadata") {
                None | Some(Value::Null) => ReportMetadata::None,
                Some(metadata) => ReportMetadata::Opaque(metadata.clone()),
            },
        })
    }
}

fn json_array<'a>(value: &'a Value, context: &str) -> AnalyticsResult<&'a Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| integrity_error(format!("`{context}` is not an array")))
}

fn json_row(row: &Value, index: usize) -> AnalyticsResult<RawRow> {
    Ok(RawRow {
        dimension_values: json_slots(row.get("dimensionValues"), &format!("rows[{index}].dimensionValues"))?,
        metric_values: json_slots(row.get("metricValues"), &format!("rows[{index}].metricValues"))?,
    })
}

fn json_slots(values: Option<&Value>, context: &str) -> AnalyticsResult<Vec<String>> {
    let values = match values {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(values) => json_array(values, context)?,
    };
    values
        .iter()
        .enumerate()
        .map(|(slot, value)| match value.get("value") {
            Some(Value::String(text)) => Ok(text.clone()),
            _ => Err(missing_value(context, slot)),
        })
        .collect()
}

fn json_section(section: Option<&Value>, name: &str) -> AnalyticsResult<Vec<Vec<String>>> {
    let rows = match section {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(rows) => json_array(rows, name)?,
    };
    rows.iter()
        .enumerate()
        .map(|(index, row)| json_slots(row.get("metricValues"), &format!("{name}[{index}].metricValues")))
        .collect()
}
