//! HTTP server startup and shutdown.

use std::future::Future;

use anyhow::{Context, Result};
use embed_api_embeddings::EmbeddingService;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::ServerArgs;
use crate::http::{AppState, create_router};

/// Build the embedding service from `args` and serve until Ctrl-C.
pub async fn serve(args: ServerArgs) -> Result<()> {
    let config = args.embedding_config();
    let service =
        EmbeddingService::from_config(&config).context("Failed to configure embedding provider")?;

    let addr = args.listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind HTTP server to {addr}"))?;

    info!(
        "Embedding API listening on http://{addr} | model={} remote={}",
        config.model, config.use_remote
    );

    serve_with_listener(listener, service, shutdown_signal()).await
}

/// Serve `service` on an already bound listener until `shutdown` resolves.
pub async fn serve_with_listener(
    listener: TcpListener,
    service: EmbeddingService,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let app = create_router(AppState::new(service));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server error")?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("HTTP server shutting down"),
        // Without a signal handler the server runs until killed.
        Err(err) => {
            warn!("Failed to listen for Ctrl-C: {err}");
            std::future::pending::<()>().await;
        }
    }
}
