//! Reranker trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::retrieval::{RankedResult, RetrievalCandidate};

/// Second relevance pass over similarity candidates.
///
/// Implementations must return a subset of `candidates` (never new
/// entries), at most `top_k` long, and keep the incoming order among equal
/// scores.
#[async_trait]
pub trait Reranker: Send + Sync {
    async fn rerank(
        &self,
        query: &str,
        candidates: Vec<RetrievalCandidate>,
        top_k: usize,
    ) -> Result<Vec<RankedResult>>;
}
