//! PDF upload and ingestion.
//!
//! A successful upload replaces the active document. Queries keep running
//! against the previous document until the new one is fully indexed.
//! Uploads are ingested one at a time, so the last upload to arrive is the
//! one left active.

use std::time::Instant;

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Extension, Multipart,
    },
    http::StatusCode,
    Json,
};
use doc_rag::ArtifactDir;
use serde::Serialize;
use tracing::{info, warn};

use crate::server::app::AppState;
use crate::server::error::{success, ApiError, Envelope};

const FILE_FIELD: &str = "file";
const PDF_MAGIC: &[u8] = b"%PDF";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub status: &'static str,
    pub filename: String,
    pub message: &'static str,
}

/// `POST /api/v1/upload` and `POST /upload`
pub async fn upload_handler(
    Extension(state): Extension<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Envelope<UploadResponse>>, ApiError> {
    let mut multipart = multipart.map_err(|e| {
        warn!(error = %e, "Upload is not a multipart request");
        ApiError::NoFile
    })?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| field_error(e, state.max_upload_bytes))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().map(base_name).unwrap_or_default();
        if filename.is_empty() {
            return Err(ApiError::NoFilename);
        }
        if !filename.to_lowercase().ends_with(".pdf") {
            return Err(ApiError::InvalidFile);
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| field_error(e, state.max_upload_bytes))?;
        upload = Some((filename, bytes));
        break;
    }

    let (filename, bytes) = upload.ok_or(ApiError::NoFile)?;

    if bytes.len() > state.max_upload_bytes {
        return Err(ApiError::FileTooLarge {
            max_bytes: state.max_upload_bytes,
        });
    }
    if !bytes.starts_with(PDF_MAGIC) {
        return Err(ApiError::InvalidFile);
    }

    let _ingesting = state.upload_lock.lock().await;

    let start = Instant::now();
    let size = bytes.len();

    let elements = state
        .deps
        .extractor
        .extract(bytes.to_vec())
        .await
        .map_err(|e| upload_failed(&filename, e.to_string()))?;

    let supervisor = &state.deps.supervisor;
    let ingested = match &state.artifacts_dir {
        Some(dir) => {
            supervisor
                .ingest_with_artifacts(&elements, &ArtifactDir::new(dir.clone()))
                .await
        }
        None => supervisor.ingest(&elements).await,
    };
    let document = ingested.map_err(|e| upload_failed(&filename, e.to_string()))?;

    supervisor
        .activate(&state.slot, document.with_name(&filename))
        .await;

    info!(
        filename = %filename,
        bytes = size,
        elements = elements.len(),
        duration_ms = start.elapsed().as_millis() as u64,
        "PDF uploaded and indexed"
    );

    Ok(success(UploadResponse {
        status: "success",
        filename,
        message: "PDF uploaded and indexed.",
    }))
}

fn field_error(err: MultipartError, max_bytes: usize) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::FileTooLarge { max_bytes };
    }
    warn!(error = %err, "Malformed multipart upload");
    ApiError::NoFile
}

fn upload_failed(filename: &str, message: String) -> ApiError {
    warn!(filename = %filename, error = %message, "Upload failed");
    ApiError::UploadFailed(message)
}

/// Last path component of a client-supplied filename.
fn base_name(raw: &str) -> String {
    raw.rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}
