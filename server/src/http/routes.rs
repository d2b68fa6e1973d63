//! HTTP API Route Definitions

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use super::handlers::{self, AppState};

/// Create the API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/embed", post(handlers::embed))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
