use async_trait::async_trait;

use crate::backend::config::AnalyticsSettings;
use crate::report::error::{invalid_argument, AnalyticsError, AnalyticsResult};

/// Supplies OAuth bearer tokens for outgoing requests.
///
/// Token minting and refresh belong to the implementor; the backends only ask for the
/// current token once per request.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    async fn access_token(&self) -> AnalyticsResult<Option<String>>;
}

/// A fixed, already-issued access token.
#[derive(Clone)]
pub struct StaticAccessToken {
    token: String,
}

impl StaticAccessToken {
    pub fn new(token: impl Into<String>) -> AnalyticsResult<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(missing_access_token());
        }
        Ok(Self { token })
    }

    /// Uses the access token configured in `settings`.
    pub fn from_settings(settings: &AnalyticsSettings) -> AnalyticsResult<Self> {
        match &settings.access_token {
            Some(token) => Self::new(token.clone()),
            None => Err(missing_access_token()),
        }
    }
}

impl std::fmt::Debug for StaticAccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticAccessToken")
            .field("token", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl AccessTokenProvider for StaticAccessToken {
    async fn access_token(&self) -> AnalyticsResult<Option<String>> {
        Ok(Some(self.token.clone()))
    }
}

pub(crate) fn missing_access_token() -> AnalyticsError {
    invalid_argument(
        "Access token is null. Make sure to authenticate and obtain a valid access token.",
    )
}
