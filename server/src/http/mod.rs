//! HTTP API
//!
//! Two endpoints: `GET /health` and `POST /embed`.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod types;

pub use error::ApiError;
pub use handlers::AppState;
pub use routes::create_router;
