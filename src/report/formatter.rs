use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::backend::messages::{BatchRunReportsRequest, Dimension, Metric, RunReportRequest};
use crate::backend::BackendKind;
use crate::report::error::{integrity_error, AnalyticsResult};
use crate::report::constants::INTEGER_FIELDS;
use crate::report::spec::{property_resource, ReportSpec};
use crate::report::types::TypedValue;

const RESPONSE_DATE_FORMAT: &str = "%Y%m%d";

/// Request body in the shape expected by a given backend.
#[derive(Clone, Debug, PartialEq)]
pub enum RequestPayload {
    Structured(RunReportRequest),
    Json(Value),
}

/// Shapes `spec` for `kind`. Both shapes carry the same report semantics.
pub fn to_backend_request(spec: &ReportSpec, kind: BackendKind) -> RequestPayload {
    match kind {
        BackendKind::Structured => RequestPayload::Structured(to_structured_request(spec)),
        BackendKind::Json => RequestPayload::Json(to_json_request(spec)),
    }
}

pub fn to_structured_request(spec: &ReportSpec) -> RunReportRequest {
    RunReportRequest {
        property: spec.property_resource(),
        dimensions: spec
            .dimensions()
            .iter()
            .map(|name| Dimension { name: name.clone() })
            .collect(),
        metrics: spec
            .metrics()
            .iter()
            .map(|name| Metric { name: name.clone() })
            .collect(),
        date_ranges: spec.periods().iter().map(|period| period.date_range()).collect(),
        offset: spec.offset(),
        limit: spec.limit(),
        metric_aggregations: aggregation_codes(spec),
        order_bys: spec.order_by().iter().map(|order| order.to_message()).collect(),
        keep_empty_rows: spec.keep_empty_rows(),
    }
}

/// Plain map shape. The property travels in the endpoint path, not in the body.
pub fn to_json_request(spec: &ReportSpec) -> Value {
    json!({
        "metrics": spec.metrics().iter().map(|name| json!({"name": name})).collect::<Vec<_>>(),
        "dimensions": spec.dimensions().iter().map(|name| json!({"name": name})).collect::<Vec<_>>(),
        "dateRanges": spec.periods().iter().map(|period| period.to_json()).collect::<Vec<_>>(),
        "limit": spec.limit(),
        "offset": spec.offset(),
        "metricAggregations": aggregation_codes(spec),
        "orderBys": spec.order_by().iter().map(|order| order.to_json()).collect::<Vec<_>>(),
        "keepEmptyRows": spec.keep_empty_rows(),
    })
}

pub fn to_structured_batch_request(
    property_id: &str,
    reports: &[ReportSpec],
) -> BatchRunReportsRequest {
    BatchRunReportsRequest {
        property: property_resource(property_id),
        requests: reports.iter().map(to_structured_request).collect(),
    }
}

pub fn to_json_batch_request(property_id: &str, reports: &[ReportSpec]) -> Value {
    json!({
        "property": property_resource(property_id),
        "requests": reports.iter().map(to_json_request).collect::<Vec<_>>(),
    })
}

fn aggregation_codes(spec: &ReportSpec) -> Vec<i32> {
    spec.metric_aggregations()
        .iter()
        .map(|aggregation| aggregation.code())
        .collect()
}

/// Casts a raw response cell according to its field name.
///
/// `date` becomes a calendar date, the known user/view counters become integers and every
/// other field stays a string, even when it looks numeric.
pub fn cast_value(field: &str, raw: &str) -> AnalyticsResult<TypedValue> {
    if field == "date" {
        return NaiveDate::parse_from_str(raw, RESPONSE_DATE_FORMAT)
            .map(TypedValue::Date)
            .map_err(|err| integrity_error(format!("invalid `date` value `{raw}`: {err}")));
    }
    if INTEGER_FIELDS.contains(&field) {
        return raw
            .trim()
            .parse::<i64>()
            .map(TypedValue::Integer)
            .map_err(|err| integrity_error(format!("invalid `{field}` value `{raw}`: {err}")));
    }
    Ok(TypedValue::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::error::AnalyticsErrorCode;
    use crate::report::order_by::OrderBy;
    use crate::report::period::Period;
    use crate::report::types::MetricAggregation;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn spec() -> ReportSpec {
        ReportSpec::builder(
            "123456789",
            ["activeUsers", "sessions"],
            vec![
                Period::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap(),
                Period::new(date(2023, 1, 1), date(2023, 1, 31)).unwrap(),
            ],
        )
        .dimensions(["country"])
        .limit(25)
        .offset(5)
        .order_by(OrderBy::metric("sessions", true))
        .metric_aggregations([
            MetricAggregation::Total,
            MetricAggregation::Count,
            MetricAggregation::Minimum,
            MetricAggregation::Maximum,
        ])
        .keep_empty_rows(true)
        .build()
    }

    #[test]
    fn structured_request_carries_property_resource_and_codes() {
        let request = to_structured_request(&spec());
        assert_eq!(request.property, "properties/123456789");
        assert_eq!(request.metrics[1].name, "sessions");
        assert_eq!(request.dimensions[0].name, "country");
        assert_eq!(request.date_ranges.len(), 2);
        assert_eq!(request.date_ranges[1].start_date, "2023-01-01");
        assert_eq!(request.metric_aggregations, [1, 4, 5, 6]);
        assert_eq!(request.limit, 25);
        assert_eq!(request.offset, 5);
        assert!(request.keep_empty_rows);
    }

    #[test]
    fn json_request_mirrors_structured_semantics() {
        let payload = to_json_request(&spec());
        assert_eq!(
            payload,
            json!({
                "metrics": [{"name": "activeUsers"}, {"name": "sessions"}],
                "dimensions": [{"name": "country"}],
                "dateRanges": [
                    {"startDate": "2024-01-01", "endDate": "2024-01-31"},
                    {"startDate": "2023-01-01", "endDate": "2023-01-31"}
                ],
                "limit": 25,
                "offset": 5,
                "metricAggregations": [1, 4, 5, 6],
                "orderBys": [{"metric": {"metricName": "sessions"}, "desc": true}],
                "keepEmptyRows": true
            })
        );
        assert!(payload.get("property").is_none());
    }

    #[test]
    fn structured_message_serializes_to_json_shape() {
        let structured = serde_json::to_value(to_structured_request(&spec())).unwrap();
        let plain = to_json_request(&spec());
        for key in [
            "metrics",
            "dimensions",
            "dateRanges",
            "limit",
            "offset",
            "metricAggregations",
            "orderBys",
            "keepEmptyRows",
        ] {
            assert_eq!(structured[key], plain[key], "mismatch on `{key}`");
        }
        assert_eq!(structured["property"], "properties/123456789");
    }

    #[test]
    fn dispatches_on_backend_kind() {
        assert!(matches!(
            to_backend_request(&spec(), BackendKind::Structured),
            RequestPayload::Structured(_)
        ));
        assert!(matches!(
            to_backend_request(&spec(), BackendKind::Json),
            RequestPayload::Json(_)
        ));
    }

    #[test]
    fn batch_requests_wrap_every_report() {
        let reports = [spec(), spec()];
        let structured = to_structured_batch_request("123456789", &reports);
        assert_eq!(structured.property, "properties/123456789");
        assert_eq!(structured.requests.len(), 2);

        let plain = to_json_batch_request("123456789", &reports);
        assert_eq!(plain["property"], "properties/123456789");
        assert_eq!(plain["requests"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn casts_known_fields() {
        assert_eq!(
            cast_value("date", "20240115").unwrap(),
            TypedValue::Date(date(2024, 1, 15))
        );
        assert_eq!(cast_value("newUsers", "42").unwrap(), TypedValue::Integer(42));
        assert_eq!(
            cast_value("source", "google").unwrap(),
            TypedValue::String("google".into())
        );
    }

    #[test]
    fn numeric_looking_unknown_fields_stay_strings() {
        assert_eq!(
            cast_value("sessions", "17").unwrap(),
            TypedValue::String("17".into())
        );
    }

    #[test]
    fn malformed_cells_fail_loudly() {
        let err = cast_value("date", "2024-01-15").unwrap_err();
        assert_eq!(err.code, AnalyticsErrorCode::Integrity);
        let err = cast_value("totalUsers", "n/a").unwrap_err();
        assert_eq!(err.code, AnalyticsErrorCode::Integrity);
    }
}
