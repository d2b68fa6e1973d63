//! Configuration for embedding providers.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::local::LocalProvider;
use crate::provider::EmbeddingProvider;
use crate::remote::RemoteProvider;
use crate::{
    DEFAULT_MAX_SEQ_LEN, DEFAULT_MODEL, DEFAULT_REMOTE_BASE_URL, DEFAULT_REMOTE_TIMEOUT_SECS,
};

/// Configuration for the embedding provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Model identifier on the Hugging Face hub.
    pub model: String,

    /// Text prepended to every input (e.g. `"query: "` for E5 models).
    pub prefix: String,

    /// Proxy to the inference API instead of running the model locally.
    pub use_remote: bool,

    /// Inference API token.
    pub hf_token: Option<String>,

    /// Maximum token length for the local model.
    pub max_seq_len: usize,

    /// Inference API base URL.
    pub remote_base_url: String,

    /// Timeout for inference API calls, in seconds.
    pub remote_timeout_secs: u64,

    /// Where the local backend caches downloaded model files.
    pub cache_dir: Option<PathBuf>,
}

impl EmbeddingConfig {
    /// Create a configuration for the given model with default values.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    /// Set the input prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into().trim().to_string();
        self
    }

    /// Switch to the remote inference API with the given token.
    pub fn with_remote(mut self, token: Option<String>) -> Self {
        self.use_remote = true;
        self.hf_token = token;
        self
    }

    /// Set the maximum token length for the local model.
    pub fn with_max_seq_len(mut self, max_seq_len: usize) -> Self {
        self.max_seq_len = max_seq_len;
        self
    }

    /// The API token, if one is set and not blank.
    pub fn token(&self) -> Option<&str> {
        self.hf_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            prefix: String::new(),
            use_remote: false,
            hf_token: None,
            max_seq_len: DEFAULT_MAX_SEQ_LEN,
            remote_base_url: DEFAULT_REMOTE_BASE_URL.to_string(),
            remote_timeout_secs: DEFAULT_REMOTE_TIMEOUT_SECS,
            cache_dir: None,
        }
    }
}

/// Create the provider selected by `config`.
///
/// Local providers are returned unloaded; the model is fetched on first use.
pub fn build_provider(config: &EmbeddingConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    if config.use_remote {
        info!("Using remote inference API for model {}", config.model);
        Ok(Arc::new(RemoteProvider::from_config(config)?))
    } else {
        info!("Using local model {} (loaded on first request)", config.model);
        Ok(Arc::new(LocalProvider::from_config(config)))
    }
}
