//! Oracle implementations over an OpenAI-compatible endpoint.
//!
//! # Example
//!
//! ```rust,ignore
//! use doc_rag::ai::{OpenAIEmbedder, OpenAIGenerator};
//! use doc_rag::security::AICredentials;
//!
//! let generation = AICredentials::new(hf_token, "mistralai/Mistral-7B-Instruct-v0.3")
//!     .with_base_url("https://router.huggingface.co/v1");
//! let generator = OpenAIGenerator::from_credentials(&generation);
//! ```

use async_trait::async_trait;
use openai_client::{ChatRequest, OpenAIClient, Sampling};

use crate::error::{RagError, Result};
use crate::security::AICredentials;
use crate::traits::ai::{Embedder, Generator};

fn client_for(credentials: &AICredentials) -> OpenAIClient {
    let client = OpenAIClient::new(credentials.api_key.expose());
    match &credentials.base_url {
        Some(url) => client.with_base_url(url.clone()),
        None => client,
    }
}

/// Text generation through chat completions.
///
/// Sends the prompt as a single user message with low-temperature sampling
/// so grounded answers stay close to the evidence.
#[derive(Clone)]
pub struct OpenAIGenerator {
    client: OpenAIClient,
    model: String,
    sampling: Sampling,
}

impl OpenAIGenerator {
    pub fn new(client: OpenAIClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            sampling: Sampling::grounded(),
        }
    }

    pub fn from_credentials(credentials: &AICredentials) -> Self {
        Self::new(client_for(credentials), credentials.model.clone())
    }

    /// Replace the underlying client (timeouts, retry policy).
    pub fn with_client(mut self, client: OpenAIClient) -> Self {
        self.client = client;
        self
    }

    pub fn with_sampling(mut self, temperature: f32, top_p: f32) -> Self {
        self.sampling.temperature = Some(temperature);
        self.sampling.top_p = Some(top_p);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.sampling.max_tokens = Some(max_tokens);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Generator for OpenAIGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest::prompt(&self.model, prompt).sampling(self.sampling);

        let response = self
            .client
            .chat_completion(request)
            .await
            .map_err(|e| RagError::Generation(Box::new(e)))?;

        Ok(response.content)
    }
}

/// Embeddings through the `/embeddings` endpoint, sent in batches.
#[derive(Clone)]
pub struct OpenAIEmbedder {
    client: OpenAIClient,
    model: String,
    batch_size: usize,
}

impl OpenAIEmbedder {
    pub fn new(client: OpenAIClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            batch_size: 32,
        }
    }

    pub fn from_credentials(credentials: &AICredentials) -> Self {
        Self::new(client_for(credentials), credentials.model.clone())
    }

    pub fn with_client(mut self, client: OpenAIClient) -> Self {
        self.client = client;
        self
    }

    /// Texts per request (at least one).
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());

        for batch in texts.chunks(self.batch_size) {
            let embedded = self
                .client
                .create_embeddings(batch, &self.model)
                .await
                .map_err(|e| RagError::Embedding(e.to_string()))?;
            vectors.extend(embedded);
        }

        Ok(vectors)
    }
}
