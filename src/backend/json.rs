use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::backend::config::BackendConfig;
use crate::backend::http::HttpTransport;
use crate::backend::raw::RawReport;
use crate::backend::token::{AccessTokenProvider, StaticAccessToken};
use crate::backend::{AnalyticsBackend, BackendKind, BATCH_RUN_REPORTS, RUN_REPORT};
use crate::report::error::{integrity_error, AnalyticsResult};
use crate::report::formatter::{to_json_batch_request, to_json_request};
use crate::report::spec::ReportSpec;

/// Backend posting plain JSON maps and reading the decoded response untyped.
#[derive(Clone)]
pub struct JsonAnalyticsClient {
    transport: HttpTransport,
}

impl JsonAnalyticsClient {
    pub fn new(
        config: BackendConfig,
        tokens: Arc<dyn AccessTokenProvider>,
    ) -> AnalyticsResult<Self> {
        Ok(Self {
            transport: HttpTransport::new(config, tokens)?,
        })
    }

    /// Builds a client around an already-issued bearer token. Fails when the token is blank.
    pub fn with_access_token(
        config: BackendConfig,
        access_token: impl Into<String>,
    ) -> AnalyticsResult<Self> {
        Self::new(config, Arc::new(StaticAccessToken::new(access_token)?))
    }

    pub fn config(&self) -> &BackendConfig {
        self.transport.config()
    }
}

#[async_trait]
impl AnalyticsBackend for JsonAnalyticsClient {
    fn kind(&self) -> BackendKind {
        BackendKind::Json
    }

    async fn run_report(&self, spec: &ReportSpec) -> AnalyticsResult<RawReport> {
        let body = to_json_request(spec);
        let response: Value = self
            .transport
            .post_json(spec.property_id(), RUN_REPORT, &body, "Run Report")
            .await?;
        RawReport::from_json(&response)
    }

    async fn run_batch_reports(
        &self,
        property_id: &str,
        reports: &[ReportSpec],
    ) -> AnalyticsResult<Vec<RawReport>> {
        let body = to_json_batch_request(property_id, reports);
        let response: Value = self
            .transport
            .post_json(property_id, BATCH_RUN_REPORTS, &body, "Batch Run Reports")
            .await?;

        match response.get("reports") {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(reports)) => reports.iter().map(RawReport::from_json).collect(),
            Some(_) => Err(integrity_error("`reports` is not an array")),
        }
    }
}
