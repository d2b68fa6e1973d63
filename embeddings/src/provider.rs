//! Embedding providers.
//!
//! A provider turns one prepared input string into a single dense vector.
//! Input validation and prefixing happen in [`crate::EmbeddingService`].

use async_trait::async_trait;

use crate::Embedding;
use crate::error::Result;

/// Trait for embedding providers.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Get the name of this provider.
    fn name(&self) -> &str;

    /// Model identifier this provider embeds with.
    fn model(&self) -> &str;

    /// Whether inference happens on a remote API.
    fn is_remote(&self) -> bool;

    /// Whether model weights are resident in this process.
    ///
    /// Remote providers never hold a model, so they always report `false`.
    fn is_loaded(&self) -> bool;

    /// Generate an embedding for the given input.
    async fn embed(&self, input: &str) -> Result<Embedding>;
}
