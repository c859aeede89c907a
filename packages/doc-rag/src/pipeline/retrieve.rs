//! Retriever: embed the query and search the corpus.

use tracing::debug;

use crate::error::{RagError, Result};
use crate::pipeline::index::CorpusIndex;
use crate::traits::ai::Embedder;
use crate::traits::index::l2_normalize;
use crate::types::retrieval::RetrievalCandidate;

/// Vector-similarity retrieval over one corpus.
///
/// The embedder must be the one the corpus was built with; a width
/// mismatch is reported as [`RagError::DimensionMismatch`].
pub struct Retriever<'a, E: Embedder + ?Sized> {
    embedder: &'a E,
    corpus: &'a CorpusIndex,
}

impl<'a, E: Embedder + ?Sized> Retriever<'a, E> {
    pub fn new(embedder: &'a E, corpus: &'a CorpusIndex) -> Self {
        Self { embedder, corpus }
    }

    /// Up to `top_k` candidates, highest similarity first.
    pub async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<RetrievalCandidate>> {
        if top_k == 0 || self.corpus.is_empty() {
            return Ok(Vec::new());
        }

        let mut vector = self.embedder.embed(query).await?;
        if vector.len() != self.corpus.dimension() {
            return Err(RagError::DimensionMismatch {
                expected: self.corpus.dimension(),
                actual: vector.len(),
            });
        }
        l2_normalize(&mut vector);

        let candidates = self.corpus.search(&vector, top_k)?;
        debug!(
            top_k,
            returned = candidates.len(),
            best = candidates.first().map(|c| c.similarity_score),
            "Retrieved candidates"
        );

        Ok(candidates)
    }
}
