use std::sync::Arc;

use async_trait::async_trait;

use crate::backend::config::BackendConfig;
use crate::backend::http::HttpTransport;
use crate::backend::messages::{BatchRunReportsResponse, RunReportResponse};
use crate::backend::raw::RawReport;
use crate::backend::token::AccessTokenProvider;
use crate::backend::{AnalyticsBackend, BackendKind, BATCH_RUN_REPORTS, RUN_REPORT};
use crate::report::error::AnalyticsResult;
use crate::report::formatter::{to_structured_batch_request, to_structured_request};
use crate::report::spec::ReportSpec;

/// Backend speaking the typed `v1beta` messages.
#[derive(Clone)]
pub struct StructuredAnalyticsClient {
    transport: HttpTransport,
}

impl StructuredAnalyticsClient {
    pub fn new(
        config: BackendConfig,
        tokens: Arc<dyn AccessTokenProvider>,
    ) -> AnalyticsResult<Self> {
        Ok(Self {
            transport: HttpTransport::new(config, tokens)?,
        })
    }

    pub fn config(&self) -> &BackendConfig {
        self.transport.config()
    }
}

#[async_trait]
impl AnalyticsBackend for StructuredAnalyticsClient {
    fn kind(&self) -> BackendKind {
        BackendKind::Structured
    }

    async fn run_report(&self, spec: &ReportSpec) -> AnalyticsResult<RawReport> {
        let request = to_structured_request(spec);
        let response: RunReportResponse = self
            .transport
            .post_json(spec.property_id(), RUN_REPORT, &request, "Run Report")
            .await?;
        RawReport::try_from(response)
    }

    async fn run_batch_reports(
        &self,
        property_id: &str,
        reports: &[ReportSpec],
    ) -> AnalyticsResult<Vec<RawReport>> {
        let request = to_structured_batch_request(property_id, reports);
        let response: BatchRunReportsResponse = self
            .transport
            .post_json(property_id, BATCH_RUN_REPORTS, &request, "Batch Run Reports")
            .await?;
        response
            .reports
            .into_iter()
            .map(RawReport::try_from)
            .collect()
    }
}
