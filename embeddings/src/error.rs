//! Error types for the embeddings system.

use thiserror::Error;

/// Result type alias for embedding operations.
pub type Result<T> = std::result::Result<T, EmbeddingError>;

/// Errors that can occur in the embeddings system.
#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// Input was empty once surrounding whitespace was removed.
    #[error("empty text")]
    EmptyText,

    /// Remote mode is enabled but no API token is configured.
    #[error("HF_TOKEN is required when EMBED_USE_REMOTE=1")]
    MissingToken,

    /// The inference API answered with an error status.
    #[error("inference API error ({status}): {body}")]
    Upstream { status: u16, body: String },

    /// Invalid response from provider.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// No local model matches the configured name.
    #[error("unsupported local model: {0}")]
    UnsupportedModel(String),

    /// The local model could not be loaded.
    #[error("unable to load model {model}: {message}")]
    ModelLoad { model: String, message: String },

    /// Local inference failed.
    #[error("inference failed: {0}")]
    Inference(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// HTTP error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}
