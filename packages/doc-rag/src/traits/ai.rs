//! Oracle traits for text generation and embeddings.
//!
//! Implementations wrap specific providers (an OpenAI-compatible endpoint,
//! a local model) and own their own retry behavior. Callers treat an `Err`
//! as "oracle unavailable" and apply their own fallback.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

/// Prompt in, text out.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Complete a single free-text prompt.
    ///
    /// Returns the raw completion. An `Err` means retries were exhausted
    /// or the provider rejected the request.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Text in, vector out.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate embeddings for multiple texts, in input order.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Generate embedding for a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| crate::error::RagError::Embedding("embedder returned no vector".into()))
    }
}

#[async_trait]
impl<T: Generator + ?Sized> Generator for Arc<T> {
    async fn generate(&self, prompt: &str) -> Result<String> {
        (**self).generate(prompt).await
    }
}

#[async_trait]
impl<T: Embedder + ?Sized> Embedder for Arc<T> {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        (**self).embed_batch(texts).await
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        (**self).embed(text).await
    }
}
