//! Mapping of embedding failures onto HTTP answers.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use embed_api_embeddings::EmbeddingError;
use tracing::{error, warn};

use super::types::ErrorResponse;

/// Error returned by HTTP handlers.
#[derive(Debug)]
pub enum ApiError {
    /// The request body could not be read as an `EmbedRequest`.
    InvalidBody(serde_json::Error),
    /// The embedding operation failed.
    Embedding(EmbeddingError),
}

impl ApiError {
    /// Status code and client-facing message.
    pub fn status_and_detail(&self) -> (StatusCode, String) {
        match self {
            ApiError::InvalidBody(err) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("invalid request body: {err}"),
            ),
            ApiError::Embedding(err) => match err {
                EmbeddingError::EmptyText => (StatusCode::BAD_REQUEST, err.to_string()),
                EmbeddingError::MissingToken => {
                    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
                }
                EmbeddingError::Upstream { status, body } => (
                    StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                    format!("inference API error: {body}"),
                ),
                other => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("embedding failed: {other}"),
                ),
            },
        }
    }
}

impl From<EmbeddingError> for ApiError {
    fn from(err: EmbeddingError) -> Self {
        ApiError::Embedding(err)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::InvalidBody(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = self.status_and_detail();

        if status.is_server_error() {
            error!("Request failed ({status}): {detail}");
        } else {
            warn!("Request rejected ({status}): {detail}");
        }

        (status, Json(ErrorResponse::new(detail))).into_response()
    }
}
