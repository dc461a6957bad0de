use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Validation failures collected for a single report, keyed by field name.
///
/// Every failing check contributes one message; a field may carry several.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    messages: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.messages
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn has(&self, field: &str) -> bool {
        self.messages.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.messages.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.messages.keys().map(String::as_str)
    }

    /// Flattens every message, field order first.
    pub fn all(&self) -> Vec<&str> {
        self.messages
            .values()
            .flat_map(|messages| messages.iter().map(String::as_str))
            .collect()
    }
}

/// Per-report validation failures of a batch, keyed by report index.
pub type BatchValidationErrors = BTreeMap<usize, ValidationErrors>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnalyticsErrorCode {
    InvalidArgument,
    InvalidPeriod,
    Validation,
    Uninitialized,
    Integrity,
    RequestFailed,
    Network,
    Internal,
}

impl AnalyticsErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalyticsErrorCode::InvalidArgument => "analytics-data/invalid-argument",
            AnalyticsErrorCode::InvalidPeriod => "analytics-data/invalid-period",
            AnalyticsErrorCode::Validation => "analytics-data/validation-failed",
            AnalyticsErrorCode::Uninitialized => "analytics-data/uninitialized",
            AnalyticsErrorCode::Integrity => "analytics-data/integrity",
            AnalyticsErrorCode::RequestFailed => "analytics-data/request-failed",
            AnalyticsErrorCode::Network => "analytics-data/network",
            AnalyticsErrorCode::Internal => "analytics-data/internal",
        }
    }
}

/// Structured payload attached to validation failures.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorDetails {
    Report(ValidationErrors),
    Batch(BatchValidationErrors),
}

#[derive(Clone, Debug)]
pub struct AnalyticsError {
    pub code: AnalyticsErrorCode,
    message: String,
    details: Option<ErrorDetails>,
}

impl AnalyticsError {
    pub fn new(code: AnalyticsErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> Option<&ErrorDetails> {
        self.details.as_ref()
    }

    /// Returns the collected field errors when this is a single-report validation failure.
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match &self.details {
            Some(ErrorDetails::Report(errors)) => Some(errors),
            _ => None,
        }
    }

    /// Returns the per-report field errors when this is a batch validation failure.
    pub fn batch_validation_errors(&self) -> Option<&BatchValidationErrors> {
        match &self.details {
            Some(ErrorDetails::Batch(errors)) => Some(errors),
            _ => None,
        }
    }
}

impl Display for AnalyticsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code_str())
    }
}

impl std::error::Error for AnalyticsError {}

pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

pub fn invalid_argument(message: impl Into<String>) -> AnalyticsError {
    AnalyticsError::new(AnalyticsErrorCode::InvalidArgument, message)
}

pub fn invalid_period(message: impl Into<String>) -> AnalyticsError {
    AnalyticsError::new(AnalyticsErrorCode::InvalidPeriod, message)
}

pub fn uninitialized(message: impl Into<String>) -> AnalyticsError {
    AnalyticsError::new(AnalyticsErrorCode::Uninitialized, message)
}

pub fn integrity_error(message: impl Into<String>) -> AnalyticsError {
    AnalyticsError::new(AnalyticsErrorCode::Integrity, message)
}

pub fn request_failed(message: impl Into<String>) -> AnalyticsError {
    AnalyticsError::new(AnalyticsErrorCode::RequestFailed, message)
}

pub fn network_error(message: impl Into<String>) -> AnalyticsError {
    AnalyticsError::new(AnalyticsErrorCode::Network, message)
}

pub fn internal_error(message: impl Into<String>) -> AnalyticsError {
    AnalyticsError::new(AnalyticsErrorCode::Internal, message)
}

pub fn validation_failed(errors: ValidationErrors) -> AnalyticsError {
    let message = format!("Validation failed: {}", errors.all().join(" "));
    AnalyticsError {
        code: AnalyticsErrorCode::Validation,
        message,
        details: Some(ErrorDetails::Report(errors)),
    }
}

pub fn batch_validation_failed(errors: BatchValidationErrors) -> AnalyticsError {
    let summary = errors
        .iter()
        .map(|(index, report)| format!("Report #{index}: {}", report.all().join(" ")))
        .collect::<Vec<_>>()
        .join(" ");
    AnalyticsError {
        code: AnalyticsErrorCode::Validation,
        message: format!("Validation failed: {summary}"),
        details: Some(ErrorDetails::Batch(errors)),
    }
}
