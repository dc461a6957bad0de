use crate::report::error::{AnalyticsResult, BatchValidationErrors, ValidationErrors};
use crate::report::constants::{
    is_custom_field, is_known_dimension, is_known_metric, CUSTOM_EVENT_PREFIX, PROPERTY_ID_LENGTH,
};
use crate::report::spec::{ensure_batch_size, ReportSpec};

/// Checks every field of `spec` and returns all failures, or `None` when the spec is valid.
pub fn validate_report_spec(spec: &ReportSpec) -> Option<ValidationErrors> {
    validate_with_property(spec.property_id(), spec)
}

/// Validates each report of a batch against the batch property id.
///
/// A batch larger than five reports is rejected outright, before any report is inspected.
/// Per-report failures are keyed by report index.
pub fn validate_batch_spec(
    property_id: &str,
    reports: &[ReportSpec],
) -> AnalyticsResult<Option<BatchValidationErrors>> {
    ensure_batch_size(reports.len())?;

    let batch_errors: BatchValidationErrors = reports
        .iter()
        .enumerate()
        .filter_map(|(index, report)| {
            validate_with_property(property_id, report).map(|errors| (index, errors))
        })
        .collect();

    Ok((!batch_errors.is_empty()).then_some(batch_errors))
}

fn validate_with_property(property_id: &str, spec: &ReportSpec) -> Option<ValidationErrors> {
    let mut errors = ValidationErrors::new();

    check_property(property_id, &mut errors);
    check_metrics(spec.metrics(), &mut errors);
    check_dimensions(spec.dimensions(), &mut errors);

    if spec.periods().is_empty() {
        errors.add("periods", "The periods field is required.");
    }
    if spec.limit() < 1 {
        errors.add("limit", "The limit must be at least 1.");
    }
    if spec.offset() < 0 {
        errors.add("offset", "The offset must be at least 0.");
    }

    (!errors.is_empty()).then_some(errors)
}

fn check_property(property_id: &str, errors: &mut ValidationErrors) {
    if property_id.is_empty() {
        errors.add("property", "The property field is required.");
    } else if property_id.chars().count() != PROPERTY_ID_LENGTH {
        errors.add(
            "property",
            format!("The property must be {PROPERTY_ID_LENGTH} characters."),
        );
    }
}

fn check_metrics(metrics: &[String], errors: &mut ValidationErrors) {
    if metrics.is_empty() {
        errors.add("metrics", "The metrics field is required.");
        return;
    }
    for metric in metrics {
        if !is_known_metric(metric) && !is_custom_field(metric) {
            errors.add(
                "metrics",
                format!(
                    "The metrics entry `{metric}` must be a valid metric or start with \"{CUSTOM_EVENT_PREFIX}\"."
                ),
            );
        }
    }
}

fn check_dimensions(dimensions: &[String], errors: &mut ValidationErrors) {
    for dimension in dimensions {
        if !is_known_dimension(dimension) && !is_custom_field(dimension) {
            errors.add(
                "dimensions",
                format!(
                    "The dimensions entry `{dimension}` must be a valid dimension or start with \"{CUSTOM_EVENT_PREFIX}\"."
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::error::AnalyticsErrorCode;
    use crate::report::period::Period;
    use chrono::NaiveDate;

    fn period() -> Period {
        Period::single_day(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
    }

    #[test]
    fn valid_spec_has_no_errors() {
        let spec = ReportSpec::builder("123456789", ["activeUsers", "sessions"], vec![period()])
            .dimensions(["date", "country"])
            .build();
        assert!(validate_report_spec(&spec).is_none());
    }

    #[test]
    fn collects_every_failing_field() {
        let spec = ReportSpec::builder("1234", ["notAMetric"], vec![period()])
            .dimensions(["notADimension"])
            .limit(0)
            .offset(-1)
            .build();

        let errors = validate_report_spec(&spec).unwrap();
        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            ["dimensions", "limit", "metrics", "offset", "property"]
        );
        assert_eq!(
            errors.get("property").unwrap(),
            ["The property must be 9 characters."]
        );
    }

    #[test]
    fn reports_each_unknown_metric() {
        let spec = ReportSpec::builder("123456789", ["bogus", "sessions", "alsoBogus"], vec![period()])
            .build();
        let errors = validate_report_spec(&spec).unwrap();
        assert_eq!(errors.get("metrics").unwrap().len(), 2);
    }

    #[test]
    fn empty_property_and_metrics_are_required() {
        let spec = ReportSpec::builder("", Vec::<String>::new(), Vec::new()).build();
        let errors = validate_report_spec(&spec).unwrap();
        assert_eq!(errors.get("property").unwrap(), ["The property field is required."]);
        assert_eq!(errors.get("metrics").unwrap(), ["The metrics field is required."]);
        assert!(errors.has("periods"));
    }

    #[test]
    fn custom_event_fields_bypass_vocabularies() {
        let spec = ReportSpec::builder("123456789", ["customEvent:revenue_eur"], vec![period()])
            .dimensions(["customEvent:plan_tier"])
            .build();
        assert!(validate_report_spec(&spec).is_none());
    }

    #[test]
    fn batch_errors_are_keyed_by_report_index() {
        let good = ReportSpec::builder("123456789", ["sessions"], vec![period()]).build();
        let bad = ReportSpec::builder("123456789", ["sessions"], vec![period()])
            .limit(0)
            .build();

        let errors = validate_batch_spec("123456789", &[good.clone(), bad, good])
            .unwrap()
            .unwrap();
        assert_eq!(errors.keys().copied().collect::<Vec<_>>(), [1]);
        assert!(errors[&1].has("limit"));
    }

    #[test]
    fn batch_uses_batch_property_id() {
        let report = ReportSpec::builder("123456789", ["sessions"], vec![period()]).build();
        let errors = validate_batch_spec("12", &[report]).unwrap().unwrap();
        assert!(errors[&0].has("property"));
    }

    #[test]
    fn oversized_batch_fails_before_report_validation() {
        let invalid = ReportSpec::builder("bad", ["bogus"], vec![period()]).build();
        let err = validate_batch_spec("123456789", &vec![invalid; 6]).unwrap_err();
        assert_eq!(err.code, AnalyticsErrorCode::InvalidArgument);
        assert!(err.batch_validation_errors().is_none());
    }
}
