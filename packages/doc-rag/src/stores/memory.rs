//! In-memory exact inner-product index.

use std::cmp::Ordering;

use crate::error::{RagError, Result};
use crate::traits::index::{inner_product, SimilarityIndex};

/// Flat inner-product index.
///
/// Scores every stored vector per query. With unit-length vectors the
/// score is cosine similarity. Suited to single-document corpora of a few
/// thousand chunks; lost on restart.
#[derive(Debug, Clone)]
pub struct MemoryIndex {
    dimension: usize,
    vectors: Vec<Vec<f32>>,
}

impl MemoryIndex {
    /// Create an empty index for vectors of the given width.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            vectors: Vec::new(),
        }
    }
}

impl SimilarityIndex for MemoryIndex {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn len(&self) -> usize {
        self.vectors.len()
    }

    fn add(&mut self, vectors: Vec<Vec<f32>>) -> Result<()> {
        if let Some(bad) = vectors.iter().find(|v| v.len() != self.dimension) {
            return Err(RagError::DimensionMismatch {
                expected: self.dimension,
                actual: bad.len(),
            });
        }
        self.vectors.extend(vectors);
        Ok(())
    }

    fn search(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>> {
        if query.len() != self.dimension {
            return Err(RagError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(position, vector)| (position, inner_product(query, vector)))
            .collect();

        // stable: equal scores keep insertion order
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scored.truncate(k);

        Ok(scored)
    }
}
