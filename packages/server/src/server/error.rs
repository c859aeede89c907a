//! Response envelope and request-level errors.
//!
//! Every endpoint answers `{"success": true, "data": ...}` or
//! `{"success": false, "error": {"code": ..., "message": ...}}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

const MIB: usize = 1024 * 1024;

/// JSON envelope shared by all endpoints
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// Wrap `data` in a success envelope.
pub fn success<T: Serialize>(data: T) -> Json<Envelope<T>> {
    Json(Envelope::ok(data))
}

/// Request failures surfaced to API clients
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Query cannot be empty")]
    EmptyQuery,

    #[error("Please upload a PDF first.")]
    DocumentNotReady,

    #[error("No file part in request")]
    NoFile,

    #[error("No file selected")]
    NoFilename,

    #[error("Only PDF files allowed")]
    InvalidFile,

    #[error("File too large (max {}MB).", .max_bytes / MIB)]
    FileTooLarge { max_bytes: usize },

    #[error("{0}")]
    UploadFailed(String),

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyQuery => "EMPTY_QUERY",
            Self::DocumentNotReady => "DOCUMENT_NOT_READY",
            Self::NoFile => "NO_FILE",
            Self::NoFilename => "NO_FILENAME",
            Self::InvalidFile => "INVALID_FILE",
            Self::FileTooLarge { .. } => "FILE_TOO_LARGE",
            Self::UploadFailed(_) => "UPLOAD_FAILED",
            Self::Internal => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::EmptyQuery | Self::NoFile | Self::NoFilename | Self::InvalidFile => {
                StatusCode::BAD_REQUEST
            }
            Self::DocumentNotReady => StatusCode::CONFLICT,
            Self::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UploadFailed(_) | Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body: Envelope<()> = Envelope {
            success: false,
            data: None,
            error: Some(ErrorBody {
                code: self.code(),
                message: self.to_string(),
            }),
        };
        (self.status(), Json(body)).into_response()
    }
}
