//! Synchronous wrappers over the async reporting API.
//!
//! Calls are driven on a process-wide multi-thread tokio runtime that is built on first
//! use. Do not call these from inside an async context; use the async methods there.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use tokio::runtime::Runtime;

use crate::backend::AnalyticsBackend;
use crate::report::error::AnalyticsResult;
use crate::report::{BatchReport, NormalizedResult, Report};

static RT: Lazy<Runtime> = Lazy::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all() // timer, I/O
        .build()
        .expect("Tokio runtime")
});

fn block_on<F: std::future::Future>(fut: F) -> F::Output {
    RT.block_on(fut)
}

pub fn run_report(
    report: &Report,
    backend: &dyn AnalyticsBackend,
) -> AnalyticsResult<NormalizedResult> {
    block_on(report.run_report(backend))
}

pub fn run_batch_reports(
    batch: &BatchReport,
    backend: &dyn AnalyticsBackend,
) -> AnalyticsResult<BTreeMap<usize, NormalizedResult>> {
    block_on(batch.run_batch_reports(backend))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendConfig, JsonAnalyticsClient};
    use crate::report::error::AnalyticsErrorCode;
    use crate::report::{MetricAggregation, Period, ReportSpec, TypedValue};
    use crate::test_support::try_start_mock_server;
    use chrono::NaiveDate;
    use httpmock::prelude::*;
    use serde_json::json;

    fn periods() -> Vec<Period> {
        vec![
            Period::new(
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            )
            .unwrap(),
            Period::new(
                NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2023, 1, 31).unwrap(),
            )
            .unwrap(),
        ]
    }

    #[test]
    fn run_report_blocks_until_normalized() {
        let Some(server) = try_start_mock_server() else {
            eprintln!("Skipping run_report_blocks_until_normalized: unable to start mock server");
            return;
        };
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1beta/properties/123456789:runReport");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "rows": [
                        {"dimensionValues": [{"value": "20240105"}, {"value": "date_range_0"}],
                         "metricValues": [{"value": "11"}]},
                        {"dimensionValues": [{"value": "20230105"}, {"value": "date_range_1"}],
                         "metricValues": [{"value": "8"}]}
                    ],
                    "totals": [{"metricValues": [{"value": "19"}]}],
                    "rowCount": 2
                }));
        });

        let backend = JsonAnalyticsClient::with_access_token(
            BackendConfig::with_base_url(&server.base_url()).unwrap(),
            "ya29.token",
        )
        .unwrap();
        let report = Report::new(
            ReportSpec::builder("123456789", ["activeUsers"], periods())
                .dimensions(["date"])
                .metric_aggregations([MetricAggregation::Total])
                .build(),
        )
        .unwrap();

        let result = run_report(&report, &backend).unwrap();
        mock.assert();
        assert_eq!(result.rows_for(0).len(), 1);
        assert_eq!(
            result.rows_for(1)[0].get("date"),
            Some(&TypedValue::Date(NaiveDate::from_ymd_opt(2023, 1, 5).unwrap()))
        );
        assert_eq!(
            result.metric_aggregations[0]["activeUsers"][&MetricAggregation::Total],
            "19"
        );
    }

    #[test]
    fn run_batch_reports_surfaces_request_failures() {
        let Some(server) = try_start_mock_server() else {
            eprintln!(
                "Skipping run_batch_reports_surfaces_request_failures: unable to start mock server"
            );
            return;
        };
        let _mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1beta/properties/123456789:batchRunReports");
            then.status(403)
                .header("content-type", "application/json")
                .json_body(json!({
                    "error": {
                        "code": 403,
                        "message": "User does not have sufficient permissions for this property.",
                        "status": "PERMISSION_DENIED"
                    }
                }));
        });

        let backend = JsonAnalyticsClient::with_access_token(
            BackendConfig::with_base_url(&server.base_url()).unwrap(),
            "ya29.token",
        )
        .unwrap();
        let batch = BatchReport::new(
            "123456789",
            vec![ReportSpec::builder("123456789", ["sessions"], periods()).build()],
        )
        .unwrap();

        let err = run_batch_reports(&batch, &backend).unwrap_err();
        assert_eq!(err.code, AnalyticsErrorCode::RequestFailed);
        assert!(err.message().contains("PERMISSION_DENIED"));
    }
}
