use crate::report::error::{invalid_argument, uninitialized, AnalyticsResult};
use crate::report::constants::MAX_BATCH_REPORTS;
use crate::report::order_by::OrderBy;
use crate::report::period::Period;
use crate::report::types::MetricAggregation;

pub const DEFAULT_LIMIT: i64 = 10;
pub const DEFAULT_OFFSET: i64 = 0;

/// Parameters of one report request.
///
/// A spec is inert data; it is checked by [`validate_report_spec`](crate::report::validate_report_spec)
/// when wrapped in a [`Report`](crate::report::Report).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportSpec {
    property_id: String,
    metrics: Vec<String>,
    dimensions: Vec<String>,
    periods: Vec<Period>,
    limit: i64,
    offset: i64,
    order_by: Vec<OrderBy>,
    metric_aggregations: Vec<MetricAggregation>,
    keep_empty_rows: bool,
}

impl ReportSpec {
    pub fn builder<M, S>(
        property_id: impl Into<String>,
        metrics: M,
        periods: Vec<Period>,
    ) -> ReportSpecBuilder
    where
        M: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ReportSpecBuilder {
            spec: ReportSpec {
                property_id: property_id.into(),
                metrics: metrics.into_iter().map(Into::into).collect(),
                dimensions: Vec::new(),
                periods,
                limit: DEFAULT_LIMIT,
                offset: DEFAULT_OFFSET,
                order_by: Vec::new(),
                metric_aggregations: Vec::new(),
                keep_empty_rows: false,
            },
        }
    }

    pub fn property_id(&self) -> &str {
        &self.property_id
    }

    pub fn metrics(&self) -> &[String] {
        &self.metrics
    }

    pub fn dimensions(&self) -> &[String] {
        &self.dimensions
    }

    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn order_by(&self) -> &[OrderBy] {
        &self.order_by
    }

    pub fn metric_aggregations(&self) -> &[MetricAggregation] {
        &self.metric_aggregations
    }

    pub fn keep_empty_rows(&self) -> bool {
        self.keep_empty_rows
    }

    /// Whether the backend appends a synthetic date-range slot to every row.
    pub fn has_multiple_periods(&self) -> bool {
        self.periods.len() > 1
    }

    /// `properties/{id}` resource name.
    pub fn property_resource(&self) -> String {
        property_resource(&self.property_id)
    }
}

pub(crate) fn property_resource(property_id: &str) -> String {
    format!("properties/{property_id}")
}

#[derive(Clone, Debug)]
pub struct ReportSpecBuilder {
    spec: ReportSpec,
}

impl ReportSpecBuilder {
    pub fn dimensions<D, S>(mut self, dimensions: D) -> Self
    where
        D: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.spec.dimensions = dimensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.spec.limit = limit;
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.spec.offset = offset;
        self
    }

    pub fn order_by(mut self, order_by: OrderBy) -> Self {
        self.spec.order_by.push(order_by);
        self
    }

    pub fn metric_aggregations<A>(mut self, aggregations: A) -> Self
    where
        A: IntoIterator<Item = MetricAggregation>,
    {
        self.spec.metric_aggregations = aggregations.into_iter().collect();
        self
    }

    pub fn keep_empty_rows(mut self, keep_empty_rows: bool) -> Self {
        self.spec.keep_empty_rows = keep_empty_rows;
        self
    }

    pub fn build(self) -> ReportSpec {
        self.spec
    }
}

/// Up to five report specs sent in one `batchRunReports` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchSpec {
    property_id: String,
    reports: Vec<ReportSpec>,
}

impl BatchSpec {
    /// Fails when the batch is empty or holds more than five reports.
    pub fn new(property_id: impl Into<String>, reports: Vec<ReportSpec>) -> AnalyticsResult<Self> {
        ensure_batch_size(reports.len())?;
        Ok(Self {
            property_id: property_id.into(),
            reports,
        })
    }

    pub fn property_id(&self) -> &str {
        &self.property_id
    }

    pub fn reports(&self) -> &[ReportSpec] {
        &self.reports
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}

pub(crate) fn ensure_batch_size(count: usize) -> AnalyticsResult<()> {
    if count > MAX_BATCH_REPORTS {
        return Err(invalid_argument(format!(
            "A batch can contain a maximum of {MAX_BATCH_REPORTS} reports."
        )));
    }
    if count == 0 {
        return Err(uninitialized("No reports have been added to the batch."));
    }
    Ok(())
}
