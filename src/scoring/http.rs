//! HTTP implementation of `ScoringClient`.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use super::error::{error_message_from_body, ServiceError};
use super::{AnalyzeRequest, AnalyzeResponse, ScoringClient, SuggestResponse};

const ANALYZE_PATH: &str = "/api/tasks/analyze/";
const SUGGEST_PATH: &str = "/api/tasks/suggest/";

const ANALYZE_FAILED: &str = "Analysis failed";
const SUGGEST_FAILED: &str = "Failed to get suggestions";

/// Scoring service reached over HTTP.
#[derive(Clone)]
pub struct HttpScoringClient {
    base_url: String,
    client: Client,
}

impl HttpScoringClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Use a preconfigured `reqwest::Client` (timeouts, proxies, ...).
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url, client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turn a response into the expected body or a `ServiceError`.
    async fn read_response<T: DeserializeOwned>(
        response: Response,
        generic_failure: &str,
    ) -> Result<T, ServiceError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ServiceError::transport(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            let message =
                error_message_from_body(&body).unwrap_or_else(|| generic_failure.to_string());
            tracing::warn!("Scoring service returned {}: {}", status, message);
            return Err(ServiceError::status(status.as_u16(), message));
        }

        serde_json::from_str(&body).map_err(|e| {
            ServiceError::decode(format!("Failed to parse scoring service response: {}", e))
        })
    }

    fn transport_error(e: reqwest::Error) -> ServiceError {
        if e.is_connect() {
            ServiceError::transport(format!("Connection failed: {}", e))
        } else if e.is_timeout() {
            ServiceError::transport(format!("Request timeout: {}", e))
        } else {
            ServiceError::transport(format!("Request failed: {}", e))
        }
    }
}

#[async_trait]
impl ScoringClient for HttpScoringClient {
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalyzeResponse, ServiceError> {
        tracing::debug!(
            "POST {} ({} tasks, strategy={})",
            ANALYZE_PATH,
            request.tasks.len(),
            request.strategy
        );
        let response = self
            .client
            .post(self.url(ANALYZE_PATH))
            .json(request)
            .send()
            .await
            .map_err(Self::transport_error)?;

        Self::read_response(response, ANALYZE_FAILED).await
    }

    async fn suggest(&self) -> Result<SuggestResponse, ServiceError> {
        tracing::debug!("GET {}", SUGGEST_PATH);
        let response = self
            .client
            .get(self.url(SUGGEST_PATH))
            .send()
            .await
            .map_err(Self::transport_error)?;

        Self::read_response(response, SUGGEST_FAILED).await
    }
}
