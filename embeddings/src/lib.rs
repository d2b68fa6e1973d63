//! # Embeddings
//!
//! Sentence embeddings for the embed-api service, computed either by a
//! pretrained model running in-process or by the Hugging Face Inference API.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Embeddings                                   │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  EmbeddingConfig ──► build_provider ──► EmbeddingService        │
//! │                            │                  │                 │
//! │                            ▼                  ▼                 │
//! │                LocalProvider / RemoteProvider  prefix + trim    │
//! │                                  │                              │
//! │                                  ▼                              │
//! │                            pool_response                        │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod local;
pub mod pooling;
pub mod provider;
pub mod remote;
pub mod service;

pub use config::{EmbeddingConfig, build_provider};
pub use error::{EmbeddingError, Result};
pub use local::{Encoder, Loader, LocalProvider};
pub use pooling::pool_response;
pub use provider::EmbeddingProvider;
pub use remote::RemoteProvider;
pub use service::{EmbedOutput, EmbeddingService, HealthStatus};

/// A dense vector embedding.
pub type Embedding = Vec<f32>;

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "sentence-transformers/paraphrase-multilingual-MiniLM-L12-v2";

/// Maximum token length applied to the local model when none is configured.
pub const DEFAULT_MAX_SEQ_LEN: usize = 256;

/// Base URL of the Hugging Face Inference API.
pub const DEFAULT_REMOTE_BASE_URL: &str = "https://api-inference.huggingface.co";

/// Timeout for remote inference calls.
pub const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 120;
