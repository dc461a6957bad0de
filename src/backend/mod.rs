//! Transport backends for the Analytics Data API.
//!
//! Two interchangeable clients are provided: [`StructuredAnalyticsClient`] exchanges the
//! typed messages in [`messages`], while [`JsonAnalyticsClient`] exchanges plain JSON
//! maps. Both project their responses into a [`RawReport`] so report normalization does
//! not depend on which one produced the data.

pub mod config;
pub mod messages;
pub mod raw;

mod http;
mod json;
mod structured;
mod token;

use async_trait::async_trait;

use crate::report::error::AnalyticsResult;
use crate::report::spec::ReportSpec;

pub use config::{AnalyticsSettings, BackendConfig, SCOPE_ANALYZE, SCOPE_READ};
pub use json::JsonAnalyticsClient;
pub use raw::{RawReport, RawRow};
pub use structured::StructuredAnalyticsClient;
pub use token::{AccessTokenProvider, StaticAccessToken};

pub(crate) const RUN_REPORT: &str = "runReport";
pub(crate) const BATCH_RUN_REPORTS: &str = "batchRunReports";

/// Request/response shape a backend speaks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BackendKind {
    Structured,
    Json,
}

/// A client able to execute reports against a property.
#[async_trait]
pub trait AnalyticsBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    async fn run_report(&self, spec: &ReportSpec) -> AnalyticsResult<RawReport>;

    /// Runs `reports` in a single round trip. Responses come back in request order.
    async fn run_batch_reports(
        &self,
        property_id: &str,
        reports: &[ReportSpec],
    ) -> AnalyticsResult<Vec<RawReport>>;
}
