use serde_json::{json, Value};

use crate::backend::messages::{DimensionOrderBy, MetricOrderBy, OrderByMessage};

/// Ordering applied to report rows, either by a dimension or by a metric.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OrderBy {
    Dimension { name: String, descending: bool },
    Metric { name: String, descending: bool },
}

impl OrderBy {
    pub fn dimension(name: impl Into<String>, descending: bool) -> Self {
        OrderBy::Dimension {
            name: name.into(),
            descending,
        }
    }

    pub fn metric(name: impl Into<String>, descending: bool) -> Self {
        OrderBy::Metric {
            name: name.into(),
            descending,
        }
    }

    pub fn field_name(&self) -> &str {
        match self {
            OrderBy::Dimension { name, .. } | OrderBy::Metric { name, .. } => name,
        }
    }

    pub fn is_descending(&self) -> bool {
        match self {
            OrderBy::Dimension { descending, .. } | OrderBy::Metric { descending, .. } => {
                *descending
            }
        }
    }

    pub(crate) fn to_message(&self) -> OrderByMessage {
        match self {
            OrderBy::Dimension { name, descending } => OrderByMessage {
                dimension: Some(DimensionOrderBy {
                    dimension_name: name.clone(),
                }),
                metric: None,
                desc: *descending,
            },
            OrderBy::Metric { name, descending } => OrderByMessage {
                dimension: None,
                metric: Some(MetricOrderBy {
                    metric_name: name.clone(),
                }),
                desc: *descending,
            },
        }
    }

    pub(crate) fn to_json(&self) -> Value {
        match self {
            OrderBy::Dimension { name, descending } => json!({
                "dimension": {"dimensionName": name},
                "desc": descending,
            }),
            OrderBy::Metric { name, descending } => json!({
                "metric": {"metricName": name},
                "desc": descending,
            }),
        }
    }
}
