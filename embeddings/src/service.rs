//! The embedding operation exposed by the server.
//!
//! Wraps a provider with input preparation: surrounding whitespace is
//! removed, empty input is rejected, and the configured prefix is prepended.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Embedding;
use crate::config::EmbeddingConfig;
use crate::error::{EmbeddingError, Result};
use crate::provider::EmbeddingProvider;

/// Result of embedding one text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedOutput {
    /// The generated embedding.
    pub embedding: Embedding,

    /// Dimension of the embedding.
    pub dimension: usize,
}

/// Snapshot of the provider state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub model: String,
    pub loaded: bool,
    pub remote: bool,
}

/// Embedding service shared by all request handlers.
pub struct EmbeddingService {
    provider: Arc<dyn EmbeddingProvider>,
    prefix: String,
}

impl EmbeddingService {
    /// Create a service around `provider` with no input prefix.
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            provider,
            prefix: String::new(),
        }
    }

    /// Build the configured provider and wrap it.
    pub fn from_config(config: &EmbeddingConfig) -> Result<Self> {
        let provider = crate::config::build_provider(config)?;
        Ok(Self::new(provider).with_prefix(&config.prefix))
    }

    /// Set the prefix prepended to every input. Surrounding whitespace is dropped.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into().trim().to_string();
        self
    }

    /// The underlying provider.
    pub fn provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.provider
    }

    /// Embed `text` after trimming it and applying the prefix.
    pub async fn embed(&self, text: &str) -> Result<EmbedOutput> {
        let text = text.trim();
        if text.is_empty() {
            return Err(EmbeddingError::EmptyText);
        }

        let input = format!("{}{text}", self.prefix);
        debug!(
            "Embedding {} chars with {} provider",
            input.chars().count(),
            self.provider.name()
        );

        let embedding = self.provider.embed(&input).await?;
        let dimension = embedding.len();

        Ok(EmbedOutput {
            embedding,
            dimension,
        })
    }

    /// Current model and load state.
    pub fn health(&self) -> HealthStatus {
        let remote = self.provider.is_remote();
        HealthStatus {
            model: self.provider.model().to_string(),
            loaded: !remote && self.provider.is_loaded(),
            remote,
        }
    }
}
