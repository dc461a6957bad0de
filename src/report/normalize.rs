use std::collections::BTreeMap;

use crate::backend::raw::{RawReport, RawRow};
use crate::report::error::{integrity_error, AnalyticsResult};
use crate::report::formatter::cast_value;
use crate::report::spec::ReportSpec;
use crate::report::types::{AggregationRecord, MetricAggregation, NormalizedResult, RowRecord};

/// Reshapes a projected report into the normalized result for `spec`.
///
/// Slots are matched to `spec.dimensions()` / `spec.metrics()` by position and the counts
/// must agree exactly. With more than one period the backend appends a date-range slot to
/// every row; its trailing digit selects the period bucket and it is dropped from the
/// record.
pub fn normalize(raw: &RawReport, spec: &ReportSpec) -> AnalyticsResult<NormalizedResult> {
    let mut rows: BTreeMap<usize, Vec<RowRecord>> =
        (0..spec.periods().len()).map(|index| (index, Vec::new())).collect();

    for (index, raw_row) in raw.rows.iter().enumerate() {
        let (period_index, record) = normalize_row(raw_row, spec)
            .map_err(|err| integrity_error(format!("row {index}: {}", err.message())))?;
        rows.get_mut(&period_index)
            .ok_or_else(|| {
                integrity_error(format!(
                    "row {index}: period index {period_index} is outside the {} requested period(s)",
                    spec.periods().len()
                ))
            })?
            .push(record);
    }

    let metric_aggregations = if !spec.metric_aggregations().is_empty() && raw.row_count > 0 {
        vec![reconstruct_aggregations(raw, spec)?]
    } else {
        Vec::new()
    };

    log::debug!(
        "normalized report for properties/{}: {} row(s) of {} total",
        spec.property_id(),
        raw.rows.len(),
        raw.row_count
    );

    Ok(NormalizedResult {
        rows,
        row_count: raw.rows.len(),
        total_row_count: raw.row_count,
        metadata: raw.metadata.clone(),
        metric_aggregations,
    })
}

fn normalize_row(row: &RawRow, spec: &ReportSpec) -> AnalyticsResult<(usize, RowRecord)> {
    let (dimension_slots, period_index) = if spec.has_multiple_periods() {
        let (marker, slots) = row.dimension_values.split_last().ok_or_else(|| {
            integrity_error("row is missing the date range slot")
        })?;
        (slots, period_marker(marker)?)
    } else {
        (row.dimension_values.as_slice(), 0)
    };

    let mut record = RowRecord::new();
    zip_slots(spec.dimensions(), dimension_slots, "dimension", &mut record)?;
    zip_slots(spec.metrics(), &row.metric_values, "metric", &mut record)?;
    Ok((period_index, record))
}

fn zip_slots(
    names: &[String],
    slots: &[String],
    kind: &str,
    record: &mut RowRecord,
) -> AnalyticsResult<()> {
    if names.len() != slots.len() {
        return Err(integrity_error(format!(
            "expected {} {kind} slot(s), response has {}",
            names.len(),
            slots.len()
        )));
    }
    for (name, slot) in names.iter().zip(slots) {
        record.insert(name.clone(), cast_value(name, slot)?);
    }
    Ok(())
}

/// Period index encoded by the trailing digit of a synthetic `date_range_N` slot.
fn period_marker(marker: &str) -> AnalyticsResult<usize> {
    marker
        .chars()
        .last()
        .and_then(|digit| digit.to_digit(10))
        .map(|digit| digit as usize)
        .ok_or_else(|| integrity_error(format!("invalid date range slot `{marker}`")))
}

fn reconstruct_aggregations(
    raw: &RawReport,
    spec: &ReportSpec,
) -> AnalyticsResult<AggregationRecord> {
    let mut record = AggregationRecord::new();

    for (metric_index, metric) in spec.metrics().iter().enumerate() {
        let values = record.entry(metric.clone()).or_default();
        for &aggregation in spec.metric_aggregations() {
            let section = match aggregation {
                MetricAggregation::Total => &raw.totals,
                MetricAggregation::Minimum => &raw.minimums,
                MetricAggregation::Maximum => &raw.maximums,
                MetricAggregation::Count | MetricAggregation::Unspecified => {
                    log::warn!(
                        "no response section carries {aggregation} aggregations; skipping it for `{metric}`"
                    );
                    continue;
                }
            };
            let value = section
                .first()
                .and_then(|slots| slots.get(metric_index))
                .ok_or_else(|| {
                    integrity_error(format!(
                        "{aggregation} aggregation for `{metric}` (slot {metric_index}) is missing from the response"
                    ))
                })?;
            values.insert(aggregation, value.clone());
        }
    }

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::error::AnalyticsErrorCode;
    use crate::report::period::Period;
    use crate::report::types::{ReportMetadata, TypedValue};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn one_period() -> Vec<Period> {
        vec![Period::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap()]
    }

    fn two_periods() -> Vec<Period> {
        vec![
            Period::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap(),
            Period::new(date(2023, 1, 1), date(2023, 1, 31)).unwrap(),
        ]
    }

    fn slots(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn single_period_rows_land_in_bucket_zero() {
        let spec = ReportSpec::builder("123456789", ["activeUsers"], one_period())
            .dimensions(["country"])
            .build();
        let raw = RawReport {
            rows: vec![
                RawRow::new(["Italy"], ["10"]),
                RawRow::new(["France"], ["7"]),
                RawRow::new(["Spain"], ["3"]),
            ],
            row_count: 3,
            ..Default::default()
        };

        let result = normalize(&raw, &spec).unwrap();
        assert_eq!(result.rows.keys().copied().collect::<Vec<_>>(), [0]);
        assert_eq!(result.rows_for(0).len(), 3);
        assert_eq!(result.row_count, 3);
        assert_eq!(result.total_row_count, 3);

        let first = &result.rows_for(0)[0];
        assert_eq!(first.names().collect::<Vec<_>>(), ["country", "activeUsers"]);
        assert_eq!(first.get("country"), Some(&TypedValue::String("Italy".into())));
        assert_eq!(first.get("activeUsers"), Some(&TypedValue::Integer(10)));
    }

    #[test]
    fn multi_period_rows_are_routed_by_synthetic_slot() {
        let spec = ReportSpec::builder("123456789", ["newUsers"], two_periods())
            .dimensions(["date"])
            .build();
        let raw = RawReport {
            rows: vec![
                RawRow::new(["20240102", "date_range_0"], ["5"]),
                RawRow::new(["20230102", "date_range_1"], ["4"]),
                RawRow::new(["20240103", "date_range_0"], ["6"]),
            ],
            row_count: 3,
            ..Default::default()
        };

        let result = normalize(&raw, &spec).unwrap();
        assert_eq!(result.rows_for(0).len(), 2);
        assert_eq!(result.rows_for(1).len(), 1);
        assert_eq!(result.row_count, 3);
        assert_eq!(
            result.rows_for(1)[0].get("date"),
            Some(&TypedValue::Date(date(2023, 1, 2)))
        );
        for record in result.all_rows() {
            assert_eq!(record.names().collect::<Vec<_>>(), ["date", "newUsers"]);
        }
    }

    #[test]
    fn every_period_gets_a_bucket_even_without_rows() {
        let spec = ReportSpec::builder("123456789", ["sessions"], two_periods()).build();
        let result = normalize(&RawReport::default(), &spec).unwrap();
        assert_eq!(result.rows.len(), 2);
        assert!(result.all_rows().next().is_none());
    }

    #[test]
    fn period_marker_out_of_range_is_an_error() {
        let spec = ReportSpec::builder("123456789", ["sessions"], two_periods()).build();
        let raw = RawReport {
            rows: vec![RawRow::new(["date_range_2"], ["1"])],
            row_count: 1,
            ..Default::default()
        };
        let err = normalize(&raw, &spec).unwrap_err();
        assert_eq!(err.code, AnalyticsErrorCode::Integrity);
    }

    #[test]
    fn missing_slots_fail_instead_of_truncating() {
        let spec = ReportSpec::builder("123456789", ["sessions", "activeUsers"], one_period())
            .dimensions(["country", "city"])
            .build();

        let short_dimensions = RawReport {
            rows: vec![RawRow::new(["Italy"], ["1", "2"])],
            row_count: 1,
            ..Default::default()
        };
        let err = normalize(&short_dimensions, &spec).unwrap_err();
        assert_eq!(err.code, AnalyticsErrorCode::Integrity);
        assert!(err.message().contains("expected 2 dimension slot(s), response has 1"));

        let short_metrics = RawReport {
            rows: vec![RawRow::new(["Italy", "Rome"], ["1"])],
            row_count: 1,
            ..Default::default()
        };
        let err = normalize(&short_metrics, &spec).unwrap_err();
        assert!(err.message().contains("metric slot(s)"));
    }

    #[test]
    fn extra_slots_are_rejected() {
        let spec = ReportSpec::builder("123456789", ["sessions"], one_period()).build();
        let raw = RawReport {
            rows: vec![RawRow::new(["unexpected"], ["1"])],
            row_count: 1,
            ..Default::default()
        };
        assert!(normalize(&raw, &spec).is_err());
    }

    #[test]
    fn aggregations_are_read_by_metric_position() {
        let spec = ReportSpec::builder("123456789", ["sessions", "activeUsers"], one_period())
            .metric_aggregations([
                MetricAggregation::Total,
                MetricAggregation::Minimum,
                MetricAggregation::Maximum,
            ])
            .build();
        let raw = RawReport {
            rows: vec![RawRow::new(Vec::<String>::new(), ["12", "9"])],
            row_count: 1,
            totals: vec![slots(&["12", "9"])],
            minimums: vec![slots(&["1", "2"])],
            maximums: vec![slots(&["8", "7"])],
            metadata: ReportMetadata::None,
        };

        let result = normalize(&raw, &spec).unwrap();
        assert_eq!(result.metric_aggregations.len(), 1);
        let record = &result.metric_aggregations[0];
        assert_eq!(record["sessions"][&MetricAggregation::Total], "12");
        assert_eq!(record["sessions"][&MetricAggregation::Minimum], "1");
        assert_eq!(record["activeUsers"][&MetricAggregation::Maximum], "7");
    }

    #[test]
    fn aggregations_skipped_when_total_row_count_is_zero() {
        let spec = ReportSpec::builder("123456789", ["sessions"], one_period())
            .metric_aggregations([MetricAggregation::Total])
            .build();
        let result = normalize(&RawReport::default(), &spec).unwrap();
        assert!(result.metric_aggregations.is_empty());
    }

    #[test]
    fn count_aggregation_has_no_read_path() {
        let spec = ReportSpec::builder("123456789", ["sessions"], one_period())
            .metric_aggregations([MetricAggregation::Count, MetricAggregation::Total])
            .build();
        let raw = RawReport {
            rows: vec![RawRow::new(Vec::<String>::new(), ["4"])],
            row_count: 1,
            totals: vec![slots(&["4"])],
            ..Default::default()
        };

        let result = normalize(&raw, &spec).unwrap();
        let sessions = &result.metric_aggregations[0]["sessions"];
        assert_eq!(sessions.len(), 1);
        assert!(sessions.contains_key(&MetricAggregation::Total));
    }

    #[test]
    fn missing_aggregate_section_is_an_error() {
        let spec = ReportSpec::builder("123456789", ["sessions"], one_period())
            .metric_aggregations([MetricAggregation::Maximum])
            .build();
        let raw = RawReport {
            rows: vec![RawRow::new(Vec::<String>::new(), ["4"])],
            row_count: 1,
            ..Default::default()
        };
        let err = normalize(&raw, &spec).unwrap_err();
        assert_eq!(err.code, AnalyticsErrorCode::Integrity);
        assert!(err.message().contains("MAXIMUM aggregation for `sessions`"));
    }

    #[test]
    fn metadata_is_copied_to_the_result() {
        let spec = ReportSpec::builder("123456789", ["sessions"], one_period()).build();
        let metadata = ReportMetadata::Structured {
            currency_code: "EUR".into(),
            time_zone: "Europe/Rome".into(),
            subject_to_thresholding: true,
        };
        let raw = RawReport {
            rows: vec![RawRow::new(Vec::<String>::new(), ["4"])],
            row_count: 1,
            metadata: metadata.clone(),
            ..Default::default()
        };

        let result = normalize(&raw, &spec).unwrap();
        assert_eq!(result.metadata, metadata);
    }
}
