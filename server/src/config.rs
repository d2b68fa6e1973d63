//! Command-line and environment configuration.

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use embed_api_embeddings::{
    DEFAULT_MAX_SEQ_LEN, DEFAULT_MODEL, DEFAULT_REMOTE_BASE_URL, DEFAULT_REMOTE_TIMEOUT_SECS,
    EmbeddingConfig,
};

/// Serve sentence embeddings over HTTP.
#[derive(Debug, Clone, Parser)]
#[command(name = "embed-api", version)]
pub struct ServerArgs {
    /// Address to listen on.
    #[arg(long, env = "EMBED_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, env = "EMBED_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Hugging Face model id.
    #[arg(long, env = "EMBED_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Text prepended to every input.
    #[arg(long, env = "EMBED_PREFIX", default_value = "")]
    pub prefix: String,

    /// Proxy to the inference API; enabled only by the value `1`.
    #[arg(
        long,
        env = "EMBED_USE_REMOTE",
        action = ArgAction::Set,
        default_value = "0",
        num_args = 0..=1,
        default_missing_value = "1",
        value_parser = parse_switch
    )]
    pub use_remote: bool,

    /// Inference API token.
    #[arg(long, env = "HF_TOKEN", hide_env_values = true)]
    pub hf_token: Option<String>,

    /// Maximum token length for the local model; unparsable values mean 256.
    #[arg(
        long,
        env = "EMBED_MAX_SEQ_LEN",
        default_value_t = DEFAULT_MAX_SEQ_LEN,
        value_parser = parse_max_seq_len
    )]
    pub max_seq_len: usize,

    /// Inference API base URL.
    #[arg(long, env = "EMBED_REMOTE_BASE_URL", default_value = DEFAULT_REMOTE_BASE_URL)]
    pub remote_base_url: String,

    /// Inference API timeout in seconds.
    #[arg(long, env = "EMBED_REMOTE_TIMEOUT_SECS", default_value_t = DEFAULT_REMOTE_TIMEOUT_SECS)]
    pub remote_timeout_secs: u64,

    /// Local model cache directory.
    #[arg(long, env = "EMBED_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,
}

impl ServerArgs {
    /// `host:port` to bind.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Embedding settings carried by these arguments.
    pub fn embedding_config(&self) -> EmbeddingConfig {
        let hf_token = self
            .hf_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string);

        EmbeddingConfig {
            model: self.model.clone(),
            prefix: self.prefix.trim().to_string(),
            use_remote: self.use_remote,
            hf_token,
            max_seq_len: self.max_seq_len,
            remote_base_url: self.remote_base_url.clone(),
            remote_timeout_secs: self.remote_timeout_secs,
            cache_dir: self.cache_dir.clone(),
        }
    }
}

fn parse_switch(value: &str) -> Result<bool, String> {
    Ok(value.trim() == "1")
}

fn parse_max_seq_len(value: &str) -> Result<usize, String> {
    Ok(value.trim().parse().unwrap_or(DEFAULT_MAX_SEQ_LEN))
}
