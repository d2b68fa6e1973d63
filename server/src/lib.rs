//! # embed-api server
//!
//! HTTP front end for [`embed_api_embeddings`]: configuration from flags and
//! environment, the axum router, and the serve loop.

pub mod config;
pub mod http;
pub mod server;

pub use config::ServerArgs;
pub use http::{AppState, create_router};
pub use server::{serve, serve_with_listener};
