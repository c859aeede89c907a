//! Per-query retrieval types.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::chunk::{page_label, Chunk, ImageRef};

/// Display metadata kept alongside each indexed vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub chunk_id: String,
    pub section: String,
    pub pages: Vec<u32>,
    #[serde(default)]
    pub tables: Vec<String>,
    #[serde(default)]
    pub images: Vec<ImageRef>,
    #[serde(alias = "chunk_text")]
    pub rendered_text: String,
}

impl ChunkMetadata {
    pub fn from_chunk(chunk: &Chunk) -> Self {
        Self {
            chunk_id: chunk.chunk_id.clone(),
            section: chunk.section.clone(),
            pages: chunk.pages.clone(),
            tables: chunk.tables.clone(),
            images: chunk.images.clone(),
            rendered_text: chunk.rendered_text(),
        }
    }

    pub fn page_label(&self) -> String {
        page_label(&self.pages)
    }
}

/// A similarity hit from the retriever.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievalCandidate {
    pub metadata: ChunkMetadata,
    pub similarity_score: f32,
}

/// A candidate after reranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    pub metadata: ChunkMetadata,
    pub similarity_score: f32,
    pub relevance_score: f32,
}

/// Evidence handed to the prompt builder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextPayload {
    /// Selected results, best first
    pub context: Vec<RankedResult>,

    /// Union of table ids across `context`
    pub table_ids_referenced: BTreeSet<String>,

    /// Rendered evidence with inline page citations
    pub evidence: String,
}
