//! Application setup and server configuration.

use std::any::Any;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Extension},
    http::{header::CONTENT_TYPE, Method},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use doc_rag::DocumentSlot;
use tokio::sync::Mutex;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::kernel::ServerDeps;
use crate::server::error::ApiError;
use crate::server::routes::{
    chat_legacy_handler, chat_v1_handler, health_handler, service_info_handler, upload_handler,
};

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: ServerDeps,
    /// The single active document; uploads replace it
    pub slot: Arc<DocumentSlot>,
    pub max_upload_bytes: usize,
    /// Write ingestion artifacts here when set
    pub artifacts_dir: Option<PathBuf>,
    /// Held from extraction through activation so uploads land in arrival order
    pub upload_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(deps: ServerDeps, max_upload_bytes: usize) -> Self {
        Self {
            deps,
            slot: Arc::new(DocumentSlot::new()),
            max_upload_bytes,
            artifacts_dir: None,
            upload_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn with_artifacts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifacts_dir = Some(dir.into());
        self
    }
}

/// Build the Axum application router
pub fn build_app(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes + MULTIPART_OVERHEAD;

    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/", get(service_info_handler))
        .route("/health", get(health_handler))
        .route("/api/v1/chat", post(chat_v1_handler))
        .route("/chat", post(chat_legacy_handler))
        .route("/api/v1/upload", post(upload_handler))
        .route("/upload", post(upload_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(Extension(state))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn handle_panic(_payload: Box<dyn Any + Send + 'static>) -> Response {
    error!("Request handler panicked");
    ApiError::Internal.into_response()
}
