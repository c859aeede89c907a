use axum::{extract::Extension, Json};
use serde::Serialize;

use crate::server::app::AppState;
use crate::server::error::{success, Envelope};

pub const SERVICE_NAME: &str = "corporate-rag-backend";
pub const API_VERSION: &str = "v1";

#[derive(Serialize)]
pub struct ServiceInfo {
    service: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    document: Option<DocumentHealth>,
}

#[derive(Serialize)]
pub struct DocumentHealth {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    chunks: usize,
    indexed: usize,
    tables: usize,
    activated_at: String,
}

/// Service identification at the root path
pub async fn service_info_handler() -> Json<Envelope<ServiceInfo>> {
    success(ServiceInfo {
        service: SERVICE_NAME,
        version: API_VERSION,
    })
}

/// Health check endpoint
///
/// Always 200 while the process is serving; `document` is null until a
/// PDF has been uploaded and indexed.
pub async fn health_handler(
    Extension(state): Extension<AppState>,
) -> Json<Envelope<HealthResponse>> {
    let document = state.slot.current().await.map(|doc| DocumentHealth {
        name: doc.name().map(str::to_string),
        chunks: doc.chunks().len(),
        indexed: doc.corpus().len(),
        tables: doc.tables().len(),
        activated_at: doc.activated_at().to_rfc3339(),
    });

    success(HealthResponse {
        status: "ok",
        document,
    })
}
