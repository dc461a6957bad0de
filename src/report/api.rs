use std::collections::BTreeMap;

use crate::backend::{AnalyticsBackend, BackendKind};
use crate::report::error::{
    batch_validation_failed, integrity_error, validation_failed, AnalyticsResult,
};
use crate::report::formatter::{to_backend_request, RequestPayload};
use crate::report::normalize::normalize;
use crate::report::spec::{BatchSpec, ReportSpec};
use crate::report::types::NormalizedResult;
use crate::report::validator::{validate_batch_spec, validate_report_spec};

/// A validated report, ready to run against any backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    spec: ReportSpec,
}

impl Report {
    /// Validates `spec`. Every failing field is reported at once in the error details.
    pub fn new(spec: ReportSpec) -> AnalyticsResult<Self> {
        if let Some(errors) = validate_report_spec(&spec) {
            return Err(validation_failed(errors));
        }
        Ok(Self { spec })
    }

    pub fn spec(&self) -> &ReportSpec {
        &self.spec
    }

    /// The request body a backend of `kind` would send for this report.
    pub fn request_payload(&self, kind: BackendKind) -> RequestPayload {
        to_backend_request(&self.spec, kind)
    }

    pub async fn run_report(
        &self,
        backend: &dyn AnalyticsBackend,
    ) -> AnalyticsResult<NormalizedResult> {
        log::debug!(
            "running report for {} via {:?} backend",
            self.spec.property_resource(),
            backend.kind()
        );
        let raw = backend.run_report(&self.spec).await?;
        normalize(&raw, &self.spec)
    }
}

/// Up to five validated reports executed in one round trip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchReport {
    batch: BatchSpec,
}

impl BatchReport {
    /// Validates every report against `property_id`.
    ///
    /// An empty batch is rejected with an `Uninitialized` error and more than five reports
    /// with `InvalidArgument`; per-report failures are collected under their batch index.
    pub fn new(property_id: impl Into<String>, reports: Vec<ReportSpec>) -> AnalyticsResult<Self> {
        let property_id = property_id.into();
        if let Some(errors) = validate_batch_spec(&property_id, &reports)? {
            return Err(batch_validation_failed(errors));
        }
        Ok(Self {
            batch: BatchSpec::new(property_id, reports)?,
        })
    }

    pub fn batch(&self) -> &BatchSpec {
        &self.batch
    }

    /// Normalizes response `i` against report `i`.
    pub async fn run_batch_reports(
        &self,
        backend: &dyn AnalyticsBackend,
    ) -> AnalyticsResult<BTreeMap<usize, NormalizedResult>> {
        let reports = self.batch.reports();
        log::debug!(
            "running batch of {} report(s) for properties/{} via {:?} backend",
            reports.len(),
            self.batch.property_id(),
            backend.kind()
        );

        let responses = backend
            .run_batch_reports(self.batch.property_id(), reports)
            .await?;
        if responses.len() != reports.len() {
            return Err(integrity_error(format!(
                "batch response holds {} report(s) but {} were requested",
                responses.len(),
                reports.len()
            )));
        }

        responses
            .iter()
            .zip(reports)
            .enumerate()
            .map(|(index, (raw, spec))| Ok((index, normalize(raw, spec)?)))
            .collect()
    }
}
