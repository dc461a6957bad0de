//! Report definitions, validation, request shaping and response normalization.
//!
//! A [`ReportSpec`] is wrapped in a [`Report`] (or several in a [`BatchReport`]) once it
//! passes validation, then executed against any [`AnalyticsBackend`](crate::backend::AnalyticsBackend).
//! Whichever backend answers, the result is a [`NormalizedResult`] with rows bucketed per
//! requested period.

pub mod constants;
pub mod error;
pub mod formatter;
pub mod normalize;
pub mod order_by;
pub mod period;
pub mod spec;
pub mod types;
pub mod validator;

mod api;

pub use api::{BatchReport, Report};
pub use error::{
    AnalyticsError, AnalyticsErrorCode, AnalyticsResult, BatchValidationErrors, ValidationErrors,
};
pub use formatter::{cast_value, to_backend_request, RequestPayload};
pub use normalize::normalize;
pub use order_by::OrderBy;
pub use period::Period;
pub use spec::{BatchSpec, ReportSpec, ReportSpecBuilder, DEFAULT_LIMIT, DEFAULT_OFFSET};
pub use types::{
    AggregationRecord, MetricAggregation, NormalizedResult, ReportMetadata, RowRecord, TypedValue,
};
pub use validator::{validate_batch_spec, validate_report_spec};
