//! Error types for OpenAI client.

use thiserror::Error;

/// Result type for OpenAI client operations.
pub type Result<T> = std::result::Result<T, OpenAIError>;

/// OpenAI client errors.
#[derive(Debug, Error)]
pub enum OpenAIError {
    /// Configuration error (missing API key, invalid settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection failed, body read failed)
    #[error("Network error: {0}")]
    Network(String),

    /// Request exceeded the per-call timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// HTTP 429 from the provider
    #[error("Rate limited by provider")]
    RateLimited,

    /// API error (non-2xx response other than 429)
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Parse error (invalid JSON, unexpected response format)
    #[error("Parse error: {0}")]
    Parse(String),

    /// The provider answered 2xx but with no usable text
    #[error("Empty completion")]
    EmptyCompletion,

    /// A retryable failure persisted through every attempt
    #[error("Request failed after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<OpenAIError>,
    },
}

impl OpenAIError {
    /// Whether another attempt of the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout(_) | Self::RateLimited | Self::EmptyCompletion => true,
            Self::Api { status, .. } => *status >= 500,
            Self::Config(_) | Self::Parse(_) | Self::RetriesExhausted { .. } => false,
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}
