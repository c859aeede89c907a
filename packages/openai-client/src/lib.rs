//! OpenAI-compatible REST API client
//!
//! A minimal client for chat completions and embeddings against any
//! OpenAI-compatible endpoint (OpenAI, the Hugging Face router, local
//! gateways). Every call runs under a [`RetryPolicy`] with a per-request
//! timeout.
//!
//! # Example
//!
//! ```rust,ignore
//! use openai_client::{ChatRequest, OpenAIClient, Sampling};
//!
//! let client = OpenAIClient::new(api_key)
//!     .with_base_url("https://router.huggingface.co/v1");
//!
//! let response = client
//!     .chat_completion(
//!         ChatRequest::prompt("mistralai/Mistral-7B-Instruct-v0.3", "Hello!")
//!             .sampling(Sampling::grounded()),
//!     )
//!     .await?;
//!
//! let vectors = client
//!     .create_embeddings(&["first passage", "second passage"], "BAAI/bge-base-en-v1.5")
//!     .await?;
//! ```

pub mod error;
pub mod retry;
pub mod types;

pub use error::{OpenAIError, Result};
pub use retry::{RetryPolicy, Sleeper, TokioSleeper};
pub use types::*;

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

/// OpenAI-compatible API client.
#[derive(Clone)]
pub struct OpenAIClient {
    http_client: Client,
    api_key: String,
    base_url: String,
    retry: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl OpenAIClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".to_string(),
            retry: RetryPolicy::default(),
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Set a custom base URL (for the Hugging Face router, proxies, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Apply a per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OpenAIError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(self)
    }

    /// Replace the retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Replace the sleeper used between retries.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Get the API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the retry policy.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Chat completion.
    ///
    /// Retries rate limits, timeouts, 5xx responses and empty completions
    /// according to the configured [`RetryPolicy`].
    pub async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse> {
        let start = Instant::now();
        let this = self;
        let request = &request;

        let response = self
            .retry
            .run(self.sleeper.as_ref(), move || this.chat_completion_once(request))
            .await?;

        debug!(
            model = %request.model,
            duration_ms = start.elapsed().as_millis() as u64,
            response_len = response.content.len(),
            "Chat completion"
        );

        Ok(response)
    }

    async fn chat_completion_once(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Chat completion request failed");
                OpenAIError::from_reqwest(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, body));
        }

        let envelope: types::CompletionEnvelope = response
            .json()
            .await
            .map_err(|e| OpenAIError::Parse(e.to_string()))?;

        let (content, usage) = envelope
            .into_content()
            .ok_or(OpenAIError::EmptyCompletion)?;

        Ok(ChatResponse { content, usage })
    }

    /// Create embeddings for a batch of texts.
    ///
    /// Vectors come back in input order regardless of the order the
    /// provider lists them in.
    pub async fn create_embeddings(&self, texts: &[&str], model: &str) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let this = self;
        self.retry
            .run(self.sleeper.as_ref(), move || this.create_embeddings_once(texts, model))
            .await
    }

    async fn create_embeddings_once(&self, texts: &[&str], model: &str) -> Result<Vec<Vec<f32>>> {
        let request = types::EmbeddingRequest {
            model,
            input: texts,
        };

        let response = self
            .http_client
            .post(format!("{}/embeddings", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Embedding request failed");
                OpenAIError::from_reqwest(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, body));
        }

        let mut parsed: types::EmbeddingEnvelope = response
            .json()
            .await
            .map_err(|e| OpenAIError::Parse(e.to_string()))?;

        if parsed.data.len() != texts.len() {
            return Err(OpenAIError::Parse(format!(
                "provider returned {} embeddings for {} inputs",
                parsed.data.len(),
                texts.len()
            )));
        }

        parsed.data.sort_by_key(|d| d.index);
        Ok(parsed.data.into_iter().map(|d| d.embedding).collect())
    }
}

/// Map a non-success status to the matching error.
fn status_error(status: StatusCode, body: String) -> OpenAIError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        warn!("Provider rate limit hit");
        return OpenAIError::RateLimited;
    }

    warn!(status = %status, error = %body, "Provider API error");
    OpenAIError::Api {
        status: status.as_u16(),
        message: body,
    }
}
