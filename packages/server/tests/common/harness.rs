//! In-process test harness: the real router over mock oracles.
//!
//! Requests go through `tower::ServiceExt::oneshot`, so no socket is bound.

use std::path::Path;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use doc_rag::{
    testing::{MockEmbedder, MockGenerator},
    Embedder, Generator, Supervisor,
};
use serde_json::Value;
use server_core::{
    kernel::{BaseElementExtractor, ServerDeps},
    server::{build_app, AppState},
};
use tower::ServiceExt;

use super::fixtures::{handbook, StubExtractor, FAKE_PDF};

pub const DEFAULT_MAX_UPLOAD: usize = 20 * 1024 * 1024;
const BOUNDARY: &str = "----doc-rag-test-boundary";

pub struct TestHarness {
    pub app: Router,
    pub state: AppState,
    pub generator: MockGenerator,
}

impl TestHarness {
    /// Harness whose uploads always yield the handbook fixture.
    pub fn new(generator: MockGenerator) -> Self {
        Self::with_extractor(generator, StubExtractor::returning(handbook()))
    }

    pub fn with_extractor(
        generator: MockGenerator,
        extractor: impl BaseElementExtractor + 'static,
    ) -> Self {
        Self::build(generator, Arc::new(extractor), DEFAULT_MAX_UPLOAD, None)
    }

    pub fn build(
        generator: MockGenerator,
        extractor: Arc<dyn BaseElementExtractor>,
        max_upload_bytes: usize,
        artifacts_dir: Option<&Path>,
    ) -> Self {
        let generator_oracle: Arc<dyn Generator> = Arc::new(generator.clone());
        let embedder: Arc<dyn Embedder> = Arc::new(MockEmbedder::new());
        let deps = ServerDeps::new(Supervisor::new(generator_oracle, embedder), extractor);

        let mut state = AppState::new(deps, max_upload_bytes);
        if let Some(dir) = artifacts_dir {
            state = state.with_artifacts_dir(dir);
        }

        Self {
            app: build_app(state.clone()),
            state,
            generator,
        }
    }

    pub async fn get(&self, path: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::GET)
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn post_json(&self, path: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(path)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Multipart upload with one part named `field`.
    pub async fn upload(
        &self,
        path: &str,
        field: &str,
        filename: &str,
        content: &[u8],
    ) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(path)
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(multipart_body(field, filename, content)))
            .unwrap();
        self.send(request).await
    }

    /// Upload the fixture PDF and assert it was accepted.
    pub async fn upload_handbook(&self) {
        let (status, body) = self
            .upload("/api/v1/upload", "file", "handbook.pdf", FAKE_PDF)
            .await;
        assert_eq!(status, StatusCode::OK, "upload failed: {}", body);
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }
}

fn multipart_body(field: &str, filename: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/pdf\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}
