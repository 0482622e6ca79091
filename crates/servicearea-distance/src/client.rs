//! HTTP client for a distance-matrix style provider.
//!
//! Sends one `GET` per lookup and classifies every failure into
//! [`DistanceError`]. The API key is sent as a query parameter and is never
//! logged; transport errors are stripped of their URL before they are
//! reported.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use servicearea_core::{
    require_inputs, AppConfig, DistanceError, DistanceProvider, DistanceResult,
    DEFAULT_DISTANCE_API_URL,
};

use crate::error::ClientBuildError;
use crate::retry::retry_with_backoff;
use crate::types::MatrixResponse;

const DEFAULT_RETRY_BACKOFF_MS: u64 = 500;

/// Client for the distance-matrix API.
///
/// Use [`DistanceMatrixClient::new`] for the public endpoint or
/// [`DistanceMatrixClient::with_base_url`] to point at a proxy or a mock
/// server in tests.
#[derive(Debug, Clone)]
pub struct DistanceMatrixClient {
    client: Client,
    base_url: Url,
    max_retries: u32,
    retry_backoff_ms: u64,
}

impl DistanceMatrixClient {
    /// Creates a client pointed at the public distance-matrix endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ClientBuildError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64) -> Result<Self, ClientBuildError> {
        Self::with_base_url(DEFAULT_DISTANCE_API_URL, timeout_secs)
    }

    /// Creates a client with a custom endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns [`ClientBuildError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`ClientBuildError::InvalidBaseUrl`] if `base_url` does
    /// not parse.
    pub fn with_base_url(base_url: &str, timeout_secs: u64) -> Result<Self, ClientBuildError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .user_agent("servicearea/0.1 (distance-pricing)")
            .build()?;

        let base_url = Url::parse(base_url).map_err(|e| ClientBuildError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            max_retries: 0,
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
        })
    }

    /// Builds a client from the process configuration.
    ///
    /// # Errors
    ///
    /// See [`DistanceMatrixClient::with_base_url`].
    pub fn from_app_config(config: &AppConfig) -> Result<Self, ClientBuildError> {
        Ok(
            Self::with_base_url(&config.distance_api_url, config.distance_timeout_secs)?
                .with_retry(config.distance_max_retries, config.distance_retry_backoff_ms),
        )
    }

    /// Enables bounded retries for [`DistanceError::ProviderUnavailable`].
    #[must_use]
    pub fn with_retry(mut self, max_retries: u32, backoff_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.retry_backoff_ms = backoff_ms;
        self
    }

    /// Builds the request URL with percent-encoded query parameters.
    fn build_url(&self, origin: &str, destination: &str, api_key: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("origins", origin)
            .append_pair("destinations", destination)
            .append_pair("units", "metric")
            .append_pair("key", api_key);
        url
    }

    /// Sends one request and classifies the outcome.
    async fn request_once(&self, url: &Url) -> Result<DistanceResult, DistanceError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(DistanceError::ProviderUnavailable(format!(
                "distance provider returned HTTP {status}"
            )));
        }

        let body = response.text().await.map_err(transport_error)?;
        let parsed: MatrixResponse = serde_json::from_str(&body).map_err(|e| {
            DistanceError::ProviderUnavailable(format!("distance response is not valid JSON: {e}"))
        })?;

        parsed.into_result()
    }
}

#[async_trait]
impl DistanceProvider for DistanceMatrixClient {
    async fn compute(
        &self,
        origin: &str,
        destination: &str,
        api_key: &str,
    ) -> Result<DistanceResult, DistanceError> {
        require_inputs(origin, destination, api_key)?;

        let url = self.build_url(origin.trim(), destination.trim(), api_key.trim());
        let url = &url;
        let result =
            retry_with_backoff(self.max_retries, self.retry_backoff_ms, || self.request_once(url))
                .await?;

        tracing::debug!(
            distance_km = %result.distance_km,
            duration = %result.duration_text,
            "distance lookup succeeded"
        );
        Ok(result)
    }
}

fn transport_error(err: reqwest::Error) -> DistanceError {
    let kind = if err.is_timeout() {
        "timed out"
    } else if err.is_connect() {
        "connection failed"
    } else {
        "request failed"
    };
    DistanceError::ProviderUnavailable(format!(
        "distance provider {kind}: {}",
        err.without_url()
    ))
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
