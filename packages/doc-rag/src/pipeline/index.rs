//! Corpus indexer: embed chunks and build the similarity index.
//!
//! The index holds vectors by position; [`CorpusIndex`] keeps the display
//! metadata in a parallel array and refuses to exist if the two ever
//! disagree in length.

use tracing::{debug, info};

use crate::error::{RagError, Result};
use crate::stores::MemoryIndex;
use crate::traits::ai::Embedder;
use crate::traits::index::{l2_normalize, SimilarityIndex};
use crate::types::chunk::Chunk;
use crate::types::retrieval::{ChunkMetadata, RetrievalCandidate};

/// One embedded chunk, ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedVector {
    pub chunk_id: String,
    pub vector: Vec<f32>,
    pub metadata: ChunkMetadata,
}

/// Similarity index plus positionally aligned chunk metadata. Read-only once built.
pub struct CorpusIndex {
    index: Box<dyn SimilarityIndex>,
    metadata: Vec<ChunkMetadata>,
}

impl std::fmt::Debug for CorpusIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CorpusIndex")
            .field("dimension", &self.index.dimension())
            .field("vectors", &self.index.len())
            .field("metadata", &self.metadata.len())
            .finish()
    }
}

impl CorpusIndex {
    /// Wrap an existing index and its metadata.
    pub fn new(index: Box<dyn SimilarityIndex>, metadata: Vec<ChunkMetadata>) -> Result<Self> {
        if index.len() != metadata.len() {
            return Err(RagError::CorruptIndex {
                vectors: index.len(),
                metadata: metadata.len(),
            });
        }
        Ok(Self { index, metadata })
    }

    /// Build an in-memory index from embedded chunks.
    ///
    /// Every vector must have the width of the first one.
    pub fn from_vectors(entries: Vec<IndexedVector>) -> Result<Self> {
        let dimension = entries.first().map(|e| e.vector.len()).unwrap_or(0);
        let (vectors, metadata): (Vec<_>, Vec<_>) =
            entries.into_iter().map(|e| (e.vector, e.metadata)).unzip();

        let mut index = MemoryIndex::new(dimension);
        index.add(vectors)?;
        Self::new(Box::new(index), metadata)
    }

    pub fn dimension(&self) -> usize {
        self.index.dimension()
    }

    pub fn len(&self) -> usize {
        self.metadata.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metadata.is_empty()
    }

    pub fn metadata(&self) -> &[ChunkMetadata] {
        &self.metadata
    }

    /// Top `k` chunks for an already-normalized query vector.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<RetrievalCandidate>> {
        if k == 0 || self.is_empty() {
            return Ok(Vec::new());
        }

        self.index
            .search(query, k)?
            .into_iter()
            .map(|(position, score)| {
                let metadata = self.metadata.get(position).ok_or(RagError::CorruptIndex {
                    vectors: self.index.len(),
                    metadata: self.metadata.len(),
                })?;
                Ok(RetrievalCandidate {
                    metadata: metadata.clone(),
                    similarity_score: score,
                })
            })
            .collect()
    }
}

/// Embeds chunks and builds a [`CorpusIndex`].
pub struct CorpusIndexer<'a, E: Embedder + ?Sized> {
    embedder: &'a E,
}

impl<'a, E: Embedder + ?Sized> CorpusIndexer<'a, E> {
    pub fn new(embedder: &'a E) -> Self {
        Self { embedder }
    }

    /// Embed every non-blank chunk and index the unit-length vectors.
    ///
    /// Fails with [`RagError::NoContentExtracted`] when nothing is left to
    /// index rather than building an empty index.
    pub async fn build(&self, chunks: &[Chunk]) -> Result<CorpusIndex> {
        let entries = self.embed_chunks(chunks).await?;
        let corpus = CorpusIndex::from_vectors(entries)?;

        info!(
            chunks = corpus.len(),
            dimension = corpus.dimension(),
            "Built corpus index"
        );

        Ok(corpus)
    }

    /// Embed chunks without building the index.
    pub async fn embed_chunks(&self, chunks: &[Chunk]) -> Result<Vec<IndexedVector>> {
        let metadata: Vec<ChunkMetadata> = chunks
            .iter()
            .filter(|c| !c.text.trim().is_empty())
            .map(ChunkMetadata::from_chunk)
            .collect();

        if metadata.is_empty() {
            return Err(RagError::NoContentExtracted);
        }

        let texts: Vec<&str> = metadata.iter().map(|m| m.rendered_text.as_str()).collect();
        debug!(texts = texts.len(), "Embedding chunks");
        let vectors = self.embedder.embed_batch(&texts).await?;

        if vectors.len() != metadata.len() {
            return Err(RagError::Embedding(format!(
                "embedder returned {} vectors for {} chunks",
                vectors.len(),
                metadata.len()
            )));
        }

        let dimension = vectors[0].len();
        if dimension == 0 {
            return Err(RagError::Embedding("embedder returned empty vectors".into()));
        }

        vectors
            .into_iter()
            .zip(metadata)
            .map(|(mut vector, metadata)| {
                if vector.len() != dimension {
                    return Err(RagError::DimensionMismatch {
                        expected: dimension,
                        actual: vector.len(),
                    });
                }
                l2_normalize(&mut vector);
                Ok(IndexedVector {
                    chunk_id: metadata.chunk_id.clone(),
                    vector,
                    metadata,
                })
            })
            .collect()
    }
}
