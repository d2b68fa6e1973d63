//! Local embedding provider using fastembed.
//!
//! Runs a sentence-transformer model in-process on CPU through the ONNX
//! runtime. The model is fetched and loaded on the first embedding request,
//! so startup stays fast and health checks work before any download.

use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::config::EmbeddingConfig;
use crate::error::{EmbeddingError, Result};
use crate::provider::EmbeddingProvider;
use crate::{DEFAULT_MAX_SEQ_LEN, DEFAULT_MODEL, Embedding};

/// Inference engine a [`LocalProvider`] runs once its model is loaded.
pub trait Encoder: Send + 'static {
    /// Embed a single input.
    fn encode(&self, input: String) -> Result<Embedding>;
}

impl Encoder for TextEmbedding {
    fn encode(&self, input: String) -> Result<Embedding> {
        self.embed(vec![input], None)
            .map_err(|e| EmbeddingError::Inference(e.to_string()))?
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::Inference("no embedding generated".to_string()))
    }
}

/// Loads an engine from `(model, max_seq_len, cache_dir)`.
pub type Loader<E> = fn(&str, usize, Option<PathBuf>) -> Result<E>;

/// Local embedding provider.
pub struct LocalProvider<E = TextEmbedding> {
    /// Model identifier as configured.
    model: String,

    /// Maximum token length; longer inputs are truncated.
    max_seq_len: usize,

    /// Model file cache directory (fastembed's default when unset).
    cache_dir: Option<PathBuf>,

    /// Runs on a blocking thread to produce the engine.
    loader: Loader<E>,

    /// Loaded model, filled on first use.
    engine: OnceCell<Arc<Mutex<E>>>,
}

impl<E> fmt::Debug for LocalProvider<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalProvider")
            .field("model", &self.model)
            .field("max_seq_len", &self.max_seq_len)
            .field("cache_dir", &self.cache_dir)
            .field("loaded", &self.engine.initialized())
            .finish()
    }
}

impl LocalProvider {
    /// Create a provider for the default model.
    pub fn new() -> Self {
        Self::with_loader(load_model)
    }

    /// Create a provider from configuration.
    pub fn from_config(config: &EmbeddingConfig) -> Self {
        let mut provider = Self::new()
            .with_model(&config.model)
            .with_max_seq_len(config.max_seq_len);
        provider.cache_dir = config.cache_dir.clone();
        provider
    }
}

impl Default for LocalProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Encoder> LocalProvider<E> {
    /// Create a provider for the default model that loads its engine with `loader`.
    pub fn with_loader(loader: Loader<E>) -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_seq_len: DEFAULT_MAX_SEQ_LEN,
            cache_dir: None,
            loader,
            engine: OnceCell::new(),
        }
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the maximum token length.
    pub fn with_max_seq_len(mut self, max_seq_len: usize) -> Self {
        self.max_seq_len = max_seq_len;
        self
    }

    /// Set the model cache directory.
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    /// Return the loaded model, loading it if this is the first call.
    ///
    /// Concurrent callers wait on a single load. A failed load leaves the
    /// cell empty so the next request tries again.
    async fn engine(&self) -> Result<Arc<Mutex<E>>> {
        self.engine
            .get_or_try_init(|| async {
                let loader = self.loader;
                let model = self.model.clone();
                let max_seq_len = self.max_seq_len;
                let cache_dir = self.cache_dir.clone();

                let loaded =
                    tokio::task::spawn_blocking(move || loader(&model, max_seq_len, cache_dir))
                        .await;
                match loaded {
                    Ok(loaded) => loaded.map(|engine| Arc::new(Mutex::new(engine))),
                    Err(e) => Err(EmbeddingError::ModelLoad {
                        model: self.model.clone(),
                        message: e.to_string(),
                    }),
                }
            })
            .await
            .cloned()
    }
}

#[async_trait]
impl<E: Encoder> EmbeddingProvider for LocalProvider<E> {
    fn name(&self) -> &str {
        "local"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn is_remote(&self) -> bool {
        false
    }

    fn is_loaded(&self) -> bool {
        self.engine.initialized()
    }

    async fn embed(&self, input: &str) -> Result<Embedding> {
        let engine = self.engine().await?;
        let input = input.to_string();

        let embedding = tokio::task::spawn_blocking(move || {
            let engine = engine
                .lock()
                .map_err(|_| EmbeddingError::Inference("model lock poisoned".to_string()))?;
            engine.encode(input)
        })
        .await
        .map_err(|e| EmbeddingError::Inference(e.to_string()))??;

        debug!("Local embedding has {} dimensions", embedding.len());

        Ok(embedding)
    }
}

/// Resolve a Hugging Face model id to a model fastembed can run.
///
/// Exact model codes win. Otherwise the repository name is compared without
/// its organisation, since fastembed serves ONNX exports published under a
/// different owner (e.g. `Xenova/…` for `sentence-transformers/…`).
pub fn resolve_model(name: &str) -> Result<EmbeddingModel> {
    let supported = TextEmbedding::list_supported_models();

    if let Some(info) = supported
        .iter()
        .find(|info| info.model_code.eq_ignore_ascii_case(name))
    {
        return Ok(info.model.clone());
    }

    let wanted = repo_name(name);
    supported
        .into_iter()
        .find(|info| repo_name(&info.model_code).eq_ignore_ascii_case(wanted))
        .map(|info| info.model)
        .ok_or_else(|| EmbeddingError::UnsupportedModel(name.to_string()))
}

fn repo_name(model_id: &str) -> &str {
    model_id
        .rsplit_once('/')
        .map_or(model_id, |(_, repo)| repo)
}

fn load_model(
    name: &str,
    max_seq_len: usize,
    cache_dir: Option<PathBuf>,
) -> Result<TextEmbedding> {
    let model = resolve_model(name)?;

    info!("Loading local embedding model {name} ({model:?}), max {max_seq_len} tokens");

    let mut options = InitOptions::new(model)
        .with_max_length(max_seq_len)
        .with_show_download_progress(false);
    if let Some(dir) = cache_dir {
        options = options.with_cache_dir(dir);
    }

    let engine = TextEmbedding::try_new(options).map_err(|e| EmbeddingError::ModelLoad {
        model: name.to_string(),
        message: e.to_string(),
    })?;

    info!("Local embedding model {name} ready");

    Ok(engine)
}
