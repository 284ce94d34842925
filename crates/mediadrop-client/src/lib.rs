//! Shared HTTP client for Mediadrop upload endpoints.
//!
//! Provides a minimal client with configurable auth (Bearer token, X-API-Key or
//! none), a multipart POST helper, and the `UploadTransport` adapter the upload
//! state machine talks to.

pub mod progress;
pub mod transport;

use std::time::Duration;

use mediadrop_core::{AppError, AppResult, AuthScheme, ClientConfig, TransportError};
use reqwest::Client;
use serde::de::DeserializeOwned;

/// Authentication strategy for the API.
#[derive(Clone, Debug)]
pub enum Auth {
    /// `Authorization: Bearer {token}`
    Bearer(String),
    /// `X-API-Key: {key}`
    XApiKey(String),
    None,
}

/// HTTP client for upload endpoints with configurable auth.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    auth: Auth,
}

impl ApiClient {
    pub fn new(base_url: String, auth: Auth, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    pub fn from_config(config: &ClientConfig) -> AppResult<Self> {
        let auth = match (&config.api_key, config.auth_scheme) {
            (Some(key), AuthScheme::ApiKey) => Auth::XApiKey(key.clone()),
            (Some(token), AuthScheme::Bearer) => Auth::Bearer(token.clone()),
            (None, _) => Auth::None,
        };

        Self::new(
            config.api_url.clone(),
            auth,
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Create client from `MEDIADROP_*` environment variables.
    pub fn from_env() -> AppResult<Self> {
        Self::from_config(&ClientConfig::from_env()?)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URLs are used as given; paths are joined to the base URL.
    pub fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            Auth::Bearer(token) => request.header("Authorization", format!("Bearer {}", token)),
            Auth::XApiKey(key) => request.header("X-API-Key", key.as_str()),
            Auth::None => request,
        }
    }

    /// POST multipart form and deserialize the JSON response.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, TransportError> {
        let url = self.build_url(path);
        let request = self.client.post(&url).multipart(form);
        let request = self.apply_auth(request);

        let response = request
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        serde_json::from_slice(&body).map_err(|e| TransportError::MalformedResponse(e.to_string()))
    }

    /// Raw client for custom requests. Caller must apply auth via build_url and headers.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

pub use progress::{ProgressCallback, ProgressTracker};
pub use transport::{HttpTransport, UploadTransport};
