#![doc = include_str!("RUSTDOC.md")]

pub mod backend;
pub mod blocking;
pub mod report;

#[cfg(test)]
pub mod test_support;

pub use backend::{
    AccessTokenProvider, AnalyticsBackend, BackendConfig, BackendKind, JsonAnalyticsClient,
    StaticAccessToken, StructuredAnalyticsClient,
};
pub use report::error::{AnalyticsError, AnalyticsErrorCode, AnalyticsResult};
pub use report::{
    BatchReport, MetricAggregation, NormalizedResult, OrderBy, Period, Report, ReportSpec,
};
