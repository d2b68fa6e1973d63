//! HTTP API Request Handlers

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use embed_api_embeddings::EmbeddingService;
use tracing::debug;

use super::error::ApiError;
use super::types::{EmbedRequest, EmbedResponse, HealthResponse};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<EmbeddingService>,
}

impl AppState {
    pub fn new(service: EmbeddingService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let health = state.service.health();
    Json(HealthResponse {
        status: "ok".to_string(),
        model: health.model,
        loaded: health.loaded,
        remote: health.remote,
    })
}

/// Embedding endpoint
///
/// The body is read as JSON whatever its `Content-Type`, so clients that omit
/// the header are still served.
pub async fn embed(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<EmbedResponse>, ApiError> {
    let request: EmbedRequest = serde_json::from_slice(&body)?;
    debug!("HTTP embed request: {} chars", request.text.chars().count());

    let output = state.service.embed(&request.text).await?;

    Ok(Json(EmbedResponse {
        embedding: output.embedding,
        dim: output.dimension,
    }))
}
