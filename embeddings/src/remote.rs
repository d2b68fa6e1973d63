//! Hugging Face Inference API provider.
//!
//! Posts the input to `{base_url}/models/{model}` and pools whatever shape the
//! feature-extraction pipeline returns into a single vector.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::EmbeddingConfig;
use crate::error::{EmbeddingError, Result};
use crate::pooling::pool_response;
use crate::provider::EmbeddingProvider;
use crate::{DEFAULT_MODEL, DEFAULT_REMOTE_BASE_URL, DEFAULT_REMOTE_TIMEOUT_SECS, Embedding};

/// Remote embedding provider backed by the Hugging Face Inference API.
pub struct RemoteProvider {
    /// API token, sent as a bearer credential.
    token: Option<String>,

    /// API base URL.
    base_url: String,

    /// Model identifier on the hub.
    model: String,

    /// HTTP client.
    client: reqwest::Client,
}

impl RemoteProvider {
    /// Create a provider for the default model with default settings.
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(DEFAULT_REMOTE_TIMEOUT_SECS))
    }

    /// Create a provider whose requests give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EmbeddingError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            token: None,
            base_url: DEFAULT_REMOTE_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            client,
        })
    }

    /// Create a provider from configuration.
    pub fn from_config(config: &EmbeddingConfig) -> Result<Self> {
        let mut provider =
            Self::with_timeout(Duration::from_secs(config.remote_timeout_secs))?
                .with_base_url(&config.remote_base_url)
                .with_model(&config.model);

        match config.token() {
            Some(token) => provider = provider.with_token(token),
            None => warn!("remote embeddings enabled without HF_TOKEN; requests will fail"),
        }

        Ok(provider)
    }

    /// Set the API token. Blank tokens are ignored.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        let token = token.trim();
        self.token = (!token.is_empty()).then(|| token.to_string());
        self
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Full URL of the model's inference endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}/models/{}", self.base_url, self.model)
    }
}

#[async_trait]
impl EmbeddingProvider for RemoteProvider {
    fn name(&self) -> &str {
        "remote"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn is_remote(&self) -> bool {
        true
    }

    fn is_loaded(&self) -> bool {
        false
    }

    async fn embed(&self, input: &str) -> Result<Embedding> {
        let token = self.token.as_ref().ok_or(EmbeddingError::MissingToken)?;
        let endpoint = self.endpoint();

        debug!("Requesting remote embedding from {endpoint}");

        // A one-element batch keeps endpoints that only accept lists happy.
        let body = serde_json::json!({ "inputs": [input] });

        let response = self
            .client
            .post(&endpoint)
            .header("Authorization", format!("Bearer {token}"))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            warn!("Inference API returned {status} for model {}", self.model);
            return Err(EmbeddingError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let payload: serde_json::Value = response.json().await?;
        let embedding = pool_response(payload)?;

        debug!("Remote embedding has {} dimensions", embedding.len());

        Ok(embedding)
    }
}
