use crate::domain::{BackendConfig, api_url, normalize_base_url};
use crate::error::ApiError;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

mod agents;
mod cases;
mod clients;
mod dashboard;
mod kyc;
mod risk;

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Typed client for the compliance analysis backend.
///
/// Every call is a single request/response exchange; there are no retries.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    timeout_secs: u64,
}

impl ApiClient {
    pub fn new(backend: &BackendConfig) -> Result<Self, ApiError> {
        // Validates the URL up front so every endpoint can assume it is well formed.
        api_url(&backend.url, "/").map_err(|e| ApiError::Config(e.to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(backend.insecure_tls)
            .timeout(Duration::from_secs(backend.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: normalize_base_url(&backend.url),
            timeout_secs: backend.timeout_secs,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.execute(Method::GET, endpoint, None::<&()>, None::<&()>)
            .await
    }

    async fn get_filtered<Q: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &Q,
    ) -> Result<T, ApiError> {
        self.execute(Method::GET, endpoint, Some(query), None::<&()>)
            .await
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.execute(method, endpoint, None::<&()>, Some(body))
            .await
    }

    async fn execute<Q: Serialize + ?Sized, B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        query: Option<&Q>,
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let url = api_url(&self.base_url, endpoint).map_err(|e| ApiError::Config(e.to_string()))?;
        let verb = method.as_str().to_string();
        tracing::debug!("{verb} {url}");

        let mut request = self.client.request(method, url.as_str());
        if let Some(query) = query {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|source| {
            if source.is_timeout() {
                ApiError::Timeout(self.timeout_secs)
            } else {
                ApiError::Transport {
                    method: verb.clone(),
                    url: url.clone(),
                    source,
                }
            }
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|source| ApiError::Transport {
            method: verb.clone(),
            url: url.clone(),
            source,
        })?;
        tracing::debug!("{verb} {url} -> {status}");

        if !status.is_success() {
            return Err(ApiError::Status {
                status,
                message: error_message(status, &body),
            });
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Decode {
            url,
            reason: e.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Extracts the backend's `detail` message, falling back to `HTTP <code>`.
pub fn error_message(status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("detail").cloned());

    match detail {
        Some(serde_json::Value::String(text)) if !text.is_empty() => text,
        Some(serde_json::Value::String(_) | serde_json::Value::Null) | None => {
            format!("HTTP {}", status.as_u16())
        }
        Some(other) => other.to_string(),
    }
}
