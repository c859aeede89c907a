//! Chat endpoints.
//!
//! The body is parsed by hand so that malformed JSON, a missing `query` or
//! a non-string `query` all read as an empty query.

use axum::{body::Bytes, extract::Extension, Json};
use doc_rag::AgentResponse;
use serde::Deserialize;
use tracing::{debug, error};

use crate::server::app::AppState;
use crate::server::error::{success, ApiError, Envelope};

#[derive(Debug, Deserialize)]
struct ChatRequest {
    #[serde(default)]
    query: String,
}

/// How a route answers when no document has been uploaded yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NotReady {
    /// 200 with the "upload first" information answer
    Answer,
    /// 409 DOCUMENT_NOT_READY
    Conflict,
}

/// `POST /api/v1/chat`
pub async fn chat_v1_handler(
    Extension(state): Extension<AppState>,
    body: Bytes,
) -> Result<Json<Envelope<AgentResponse>>, ApiError> {
    chat(&state, &body, NotReady::Answer).await
}

/// `POST /chat`, kept for older clients
pub async fn chat_legacy_handler(
    Extension(state): Extension<AppState>,
    body: Bytes,
) -> Result<Json<Envelope<AgentResponse>>, ApiError> {
    chat(&state, &body, NotReady::Conflict).await
}

async fn chat(
    state: &AppState,
    body: &[u8],
    not_ready: NotReady,
) -> Result<Json<Envelope<AgentResponse>>, ApiError> {
    let query = read_query(body).ok_or(ApiError::EmptyQuery)?;

    if !state.slot.is_ready().await {
        debug!("Query received before any document was uploaded");
        return match not_ready {
            NotReady::Answer => Ok(success(AgentResponse::no_document())),
            NotReady::Conflict => Err(ApiError::DocumentNotReady),
        };
    }

    let response = state
        .deps
        .supervisor
        .handle(&state.slot, &query)
        .await
        .map_err(|e| {
            error!(error = %e, "Query handling failed");
            ApiError::Internal
        })?;

    Ok(success(response))
}

/// Trimmed, non-empty `query` from a JSON body.
fn read_query(body: &[u8]) -> Option<String> {
    let request: ChatRequest = serde_json::from_slice(body).ok()?;
    let query = request.query.trim();
    (!query.is_empty()).then(|| query.to_string())
}
