//! Configuration for the query pipeline.

use serde::{Deserialize, Serialize};

/// Tunables for retrieval, reranking and context assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Candidates pulled from the similarity index per query.
    ///
    /// Default: 25.
    pub retrieval_top_k: usize,

    /// Candidates kept after reranking.
    ///
    /// Default: 7.
    pub rerank_top_k: usize,

    /// Ranked results merged into the prompt evidence.
    ///
    /// Default: 2 (bounds prompt size).
    pub context_chunks: usize,

    /// Section label for text that appears before the first title.
    pub default_section: String,

    /// Drop reranked candidates scoring below this. `None` keeps all.
    #[serde(default)]
    pub rerank_min_score: Option<f32>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            retrieval_top_k: 25,
            rerank_top_k: 7,
            context_chunks: 2,
            default_section: "Document".to_string(),
            rerank_min_score: None,
        }
    }
}

impl AgentConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set retrieval depth.
    pub fn with_retrieval_top_k(mut self, top_k: usize) -> Self {
        self.retrieval_top_k = top_k;
        self
    }

    /// Set rerank depth.
    pub fn with_rerank_top_k(mut self, top_k: usize) -> Self {
        self.rerank_top_k = top_k;
        self
    }

    /// Set how many ranked results reach the prompt.
    pub fn with_context_chunks(mut self, count: usize) -> Self {
        self.context_chunks = count;
        self
    }

    /// Set the implicit section label.
    pub fn with_default_section(mut self, label: impl Into<String>) -> Self {
        self.default_section = label.into();
        self
    }

    /// Set the rerank score floor.
    pub fn with_rerank_min_score(mut self, min_score: f32) -> Self {
        self.rerank_min_score = Some(min_score);
        self
    }
}
