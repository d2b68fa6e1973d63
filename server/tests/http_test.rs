//! End-to-end tests for the HTTP API.
//!
//! Each test serves the real router on an ephemeral port and talks to it
//! with an HTTP client.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use embed_api_embeddings::{
    Embedding, EmbeddingConfig, EmbeddingError, EmbeddingProvider, EmbeddingService,
};
use embed_api_server::serve_with_listener;
use embed_api_server::http::types::{EmbedResponse, ErrorResponse, HealthResponse};
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Provider that echoes the input length, loading lazily like a local model.
#[derive(Default)]
struct StubProvider {
    loaded: AtomicBool,
}

#[async_trait]
impl EmbeddingProvider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    fn model(&self) -> &str {
        "test/stub-model"
    }

    fn is_remote(&self) -> bool {
        false
    }

    fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::SeqCst)
    }

    async fn embed(&self, input: &str) -> embed_api_embeddings::Result<Embedding> {
        if input.contains("explode") {
            return Err(EmbeddingError::Inference("model crashed".to_string()));
        }
        self.loaded.store(true, Ordering::SeqCst);
        Ok(vec![input.chars().count() as f32, 0.5, -0.5, 1.0])
    }
}

struct TestServer {
    addr: SocketAddr,
    client: reqwest::Client,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    async fn start(service: EmbeddingService) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            serve_with_listener(listener, service, async {
                let _ = rx.await;
            })
            .await
            .unwrap();
        });

        Self {
            addr,
            client: reqwest::Client::new(),
            shutdown: Some(tx),
        }
    }

    fn url(&self, route: &str) -> String {
        format!("http://{}{route}", self.addr)
    }

    async fn embed(&self, body: serde_json::Value) -> reqwest::Response {
        self.client
            .post(self.url("/embed"))
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    async fn health(&self) -> HealthResponse {
        self.client
            .get(self.url("/health"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

fn stub_service() -> EmbeddingService {
    EmbeddingService::new(Arc::new(StubProvider::default()))
}

#[tokio::test]
async fn test_health_before_and_after_first_embed() {
    let server = TestServer::start(stub_service()).await;

    assert_eq!(
        server.health().await,
        HealthResponse {
            status: "ok".to_string(),
            model: "test/stub-model".to_string(),
            loaded: false,
            remote: false,
        }
    );

    let response = server.embed(json!({ "text": "hello" })).await;
    assert_eq!(response.status(), 200);

    assert!(server.health().await.loaded);
}

#[tokio::test]
async fn test_embed_returns_vector_and_dimension() {
    let server = TestServer::start(stub_service().with_prefix("passage: ")).await;

    let response = server.embed(json!({ "text": "  hello  " })).await;
    assert_eq!(response.status(), 200);

    let body: EmbedResponse = response.json().await.unwrap();
    // The trimmed prefix gives "passage:hello", 13 chars long.
    assert_eq!(body.embedding, vec![13.0, 0.5, -0.5, 1.0]);
    assert_eq!(body.dim, body.embedding.len());
}

#[tokio::test]
async fn test_blank_text_is_rejected() {
    let server = TestServer::start(stub_service()).await;

    let response = server.embed(json!({ "text": " \n\t " })).await;
    assert_eq!(response.status(), 400);

    let body: ErrorResponse = response.json().await.unwrap();
    assert_eq!(body.detail, "empty text");
}

#[tokio::test]
async fn test_missing_text_field_is_unprocessable() {
    let server = TestServer::start(stub_service()).await;

    let response = server.embed(json!({ "txt": "hello" })).await;
    assert_eq!(response.status(), 422);

    let body: ErrorResponse = response.json().await.unwrap();
    assert!(!body.detail.is_empty());
}

#[tokio::test]
async fn test_body_without_content_type_is_accepted() {
    let server = TestServer::start(stub_service()).await;

    let response = server
        .client
        .post(server.url("/embed"))
        .body(r#"{"text": "hello"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: EmbedResponse = response.json().await.unwrap();
    assert_eq!(body.embedding, vec![5.0, 0.5, -0.5, 1.0]);
}

#[tokio::test]
async fn test_malformed_json_is_unprocessable() {
    let server = TestServer::start(stub_service()).await;

    let response = server
        .client
        .post(server.url("/embed"))
        .header("content-type", "application/json")
        .body("{\"text\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 422);
}

#[tokio::test]
async fn test_provider_failure_is_server_error() {
    let server = TestServer::start(stub_service()).await;

    let response = server.embed(json!({ "text": "please explode" })).await;
    assert_eq!(response.status(), 500);

    let body: ErrorResponse = response.json().await.unwrap();
    assert_eq!(body.detail, "embedding failed: inference failed: model crashed");
}

#[tokio::test]
async fn test_remote_mode_proxies_to_inference_api() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/org/remote-model"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([[[1.0, 0.0], [3.0, 2.0]]])),
        )
        .expect(1)
        .mount(&upstream)
        .await;

    let mut config = EmbeddingConfig::new("org/remote-model").with_remote(Some("hf_t".into()));
    config.remote_base_url = upstream.uri();
    let server = TestServer::start(EmbeddingService::from_config(&config).unwrap()).await;

    let health = server.health().await;
    assert!(health.remote);
    assert!(!health.loaded);
    assert_eq!(health.model, "org/remote-model");

    let response = server.embed(json!({ "text": "bonjour" })).await;
    assert_eq!(response.status(), 200);

    let body: EmbedResponse = response.json().await.unwrap();
    assert_eq!(body.embedding, vec![2.0, 1.0]);
    assert_eq!(body.dim, 2);
}

#[tokio::test]
async fn test_remote_error_status_is_forwarded() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Model is currently loading"))
        .mount(&upstream)
        .await;

    let mut config = EmbeddingConfig::new("org/remote-model").with_remote(Some("hf_t".into()));
    config.remote_base_url = upstream.uri();
    let server = TestServer::start(EmbeddingService::from_config(&config).unwrap()).await;

    let response = server.embed(json!({ "text": "bonjour" })).await;
    assert_eq!(response.status(), 503);

    let body: ErrorResponse = response.json().await.unwrap();
    assert_eq!(body.detail, "inference API error: Model is currently loading");
}

#[tokio::test]
async fn test_remote_without_token_is_server_error() {
    let config = EmbeddingConfig::new("org/remote-model").with_remote(None);
    let server = TestServer::start(EmbeddingService::from_config(&config).unwrap()).await;

    let response = server.embed(json!({ "text": "bonjour" })).await;
    assert_eq!(response.status(), 500);

    let body: ErrorResponse = response.json().await.unwrap();
    assert!(body.detail.contains("HF_TOKEN"));
}
