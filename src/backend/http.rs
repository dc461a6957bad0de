use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::backend::config::BackendConfig;
use crate::backend::messages::ErrorResponse;
use crate::backend::token::{missing_access_token, AccessTokenProvider};
use crate::report::error::{
    internal_error, invalid_argument, network_error, request_failed as request_failed_err,
    AnalyticsError, AnalyticsResult,
};

const API_CLIENT_HEADER: &str = "x-goog-api-client";

/// Authenticated JSON-over-HTTPS plumbing shared by both backends.
#[derive(Clone)]
pub(crate) struct HttpTransport {
    http: Client,
    config: BackendConfig,
    tokens: Arc<dyn AccessTokenProvider>,
}

impl HttpTransport {
    pub(crate) fn new(
        config: BackendConfig,
        tokens: Arc<dyn AccessTokenProvider>,
    ) -> AnalyticsResult<Self> {
        let http = Client::builder()
            .user_agent(format!("analytics-data-rs-sdk/{}", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout())
            .build()
            .map_err(|err| internal_error(format!("Failed to build HTTP client: {err}")))?;
        Ok(Self {
            http,
            config,
            tokens,
        })
    }

    pub(crate) fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// POSTs `body` to `{property}:{method}` and decodes the JSON response as `R`.
    pub(crate) async fn post_json<B, R>(
        &self,
        property_id: &str,
        method: &str,
        body: &B,
        request_name: &str,
    ) -> AnalyticsResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.config.endpoint(property_id, method)?;
        let headers = self.headers().await?;

        log::debug!("{request_name} request to {url}");
        let response = self
            .http
            .post(url.clone())
            .headers(headers)
            .json(body)
            .send()
            .await
            .map_err(|err| map_reqwest_error(request_name, &url, err))?;

        if response.status().is_success() {
            return response
                .json::<R>()
                .await
                .map_err(|err| internal_error(format!("Invalid {request_name} response: {err}")));
        }

        let err = request_failed(request_name, response).await;
        log::warn!("{request_name} request to {url} failed: {err}");
        Err(err)
    }

    async fn headers(&self) -> AnalyticsResult<HeaderMap> {
        let token = self
            .tokens
            .access_token()
            .await?
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(missing_access_token)?;

        let mut headers = HeaderMap::with_capacity(4);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).map_err(|err| {
                invalid_argument(format!("Invalid access token header value: {err}"))
            })?,
        );
        headers.insert(
            HeaderName::from_static(API_CLIENT_HEADER),
            HeaderValue::from_static(concat!("gl-rust analytics-data/", env!("CARGO_PKG_VERSION"))),
        );
        Ok(headers)
    }
}

fn map_reqwest_error(request_name: &str, url: &Url, err: reqwest::Error) -> AnalyticsError {
    if err.is_timeout() {
        return network_error(format!("{request_name} request to {url} timed out: {err}"));
    }
    if err.is_connect() {
        return network_error(format!("Failed to connect to {url}: {err}"));
    }
    if err.is_builder() || err.is_request() {
        return invalid_argument(format!("Malformed {request_name} request: {err}"));
    }
    network_error(format!("Network error during {request_name}: {err}"))
}

async fn request_failed(request_name: &str, response: Response) -> AnalyticsError {
    let status = response.status();
    let bytes = match response.bytes().await {
        Ok(bytes) => bytes,
        Err(err) => {
            return request_failed_err(format!(
                "{request_name} request failed with status {status} and unreadable body: {err}"
            ));
        }
    };

    match serde_json::from_slice::<ErrorResponse>(&bytes) {
        Ok(body) => request_failed_err(format!(
            "{request_name} request failed with error \"{} {}: {}\"",
            body.error.code, body.error.status, body.error.message
        )),
        Err(_) => {
            let snippet = String::from_utf8_lossy(&bytes);
            request_failed_err(format!(
                "{request_name} request failed with status {status}; body: {snippet}"
            ))
        }
    }
}
