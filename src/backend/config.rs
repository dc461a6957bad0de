use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::report::error::{internal_error, invalid_argument, AnalyticsResult};

/// Default production host of the Analytics Data API.
pub const DEFAULT_ANALYTICS_DATA_API_URL: &str = "https://analyticsdata.googleapis.com";
/// API surface every request targets.
pub const API_VERSION: &str = "v1beta";
/// Overrides the API host, e.g. to point at a local mock.
pub const ANALYTICS_DATA_API_URL_ENV: &str = "GOOGLE_ANALYTICS_DATA_API_URL";
/// Default per-request timeout (60 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

pub const SERVICE_ACCOUNT_CREDENTIALS_ENV: &str = "ANALYTICS_SERVICE_ACCOUNT_CREDENTIALS_JSON";
pub const ACCESS_TOKEN_ENV: &str = "GOOGLE_ANALYTICS_ACCESS_TOKEN";

/// OAuth scope granting full Analytics access.
pub const SCOPE_ANALYZE: &str = "https://www.googleapis.com/auth/analytics";
/// OAuth scope sufficient for running reports.
pub const SCOPE_READ: &str = "https://www.googleapis.com/auth/analytics.readonly";
pub const DEFAULT_SERVICE_ACCOUNT_CREDENTIALS_PATH: &str =
    "storage/app/analytics/service-account-credentials.json";

/// Connection settings shared by both backends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackendConfig {
    base_url: Url,
    timeout: Duration,
}

impl BackendConfig {
    /// Production settings, honouring the `GOOGLE_ANALYTICS_DATA_API_URL` override.
    pub fn from_env() -> AnalyticsResult<Self> {
        let base_url = std::env::var(ANALYTICS_DATA_API_URL_ENV)
            .unwrap_or_else(|_| DEFAULT_ANALYTICS_DATA_API_URL.to_string());
        Self::with_base_url(&base_url)
    }

    pub fn with_base_url(base_url: &str) -> AnalyticsResult<Self> {
        let base_url = Url::parse(base_url).map_err(|err| {
            invalid_argument(format!(
                "Invalid Analytics Data API endpoint '{base_url}': {err}"
            ))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(invalid_argument(format!(
                "Analytics Data API endpoint '{base_url}' cannot be a base URL"
            )));
        }
        Ok(Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// `{base}/v1beta/properties/{property_id}:{method}`
    pub fn endpoint(&self, property_id: &str, method: &str) -> AnalyticsResult<Url> {
        let mut url = self.base_url.clone();
        let action = format!("{property_id}:{method}");
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| internal_error("Analytics Data API endpoint is not base"))?;
            segments
                .pop_if_empty()
                .extend([API_VERSION, "properties", action.as_str()]);
        }
        Ok(url)
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_ANALYTICS_DATA_API_URL)
                .expect("default Analytics Data API URL is valid"),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Credential settings handed to backend construction.
///
/// The credentials path is carried for callers that mint their own tokens; the crate
/// itself only consumes `access_token`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalyticsSettings {
    pub service_account_credentials_json: PathBuf,
    pub access_token: Option<String>,
}

impl AnalyticsSettings {
    pub fn from_env() -> Self {
        let service_account_credentials_json = std::env::var(SERVICE_ACCOUNT_CREDENTIALS_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SERVICE_ACCOUNT_CREDENTIALS_PATH));
        let access_token = std::env::var(ACCESS_TOKEN_ENV)
            .ok()
            .filter(|token| !token.trim().is_empty());
        Self {
            service_account_credentials_json,
            access_token,
        }
    }
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            service_account_credentials_json: PathBuf::from(DEFAULT_SERVICE_ACCOUNT_CREDENTIALS_PATH),
            access_token: None,
        }
    }
}
