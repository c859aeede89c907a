//! Typed errors for the document RAG library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling. Only ingestion, configuration
//! and invariant failures surface as errors; query-time oracle failures are
//! recovered inside the supervisor.

use thiserror::Error;

/// Errors that can occur during ingestion and retrieval.
#[derive(Debug, Error)]
pub enum RagError {
    /// Ingestion produced no indexable chunks
    #[error("no text chunks extracted from document; the parser or router produced no text")]
    NoContentExtracted,

    /// Embedding width differs from the index width
    #[error("embedding dimension mismatch: index expects {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Vector and metadata arrays diverged
    #[error("corrupt index: {vectors} vectors but {metadata} metadata entries")]
    CorruptIndex { vectors: usize, metadata: usize },

    /// Generation oracle unavailable or failed
    #[error("generation error: {0}")]
    Generation(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Embedding oracle unavailable or failed
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Reading or writing a pipeline artifact failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),
}

/// Reasons a structured ticket could not be read from oracle output.
#[derive(Debug, Error)]
pub enum TicketParseError {
    /// Output was empty after trimming
    #[error("empty output")]
    Empty,

    /// Output was not valid JSON
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Output was valid JSON but not an object
    #[error("expected a JSON object")]
    NotAnObject,
}

/// Result type alias for RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;
