//! Lexical reranking of retrieval candidates.
//!
//! Scores each candidate with BM25 over the candidate set itself, so exact
//! term matches (codes, figures, names) that embeddings blur can move a
//! chunk up. Similarity scores are carried through untouched.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use async_trait::async_trait;
use tracing::debug;

use crate::error::Result;
use crate::traits::reranker::Reranker;
use crate::types::retrieval::{RankedResult, RetrievalCandidate};

/// Words that carry no retrieval signal.
const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "can", "do", "does", "for", "from", "how",
    "i", "in", "is", "it", "me", "my", "of", "on", "or", "our", "the", "this", "to", "was",
    "we", "what", "when", "where", "which", "who", "why", "with", "you", "your",
];

/// BM25 reranker over the candidate texts.
#[derive(Debug, Clone)]
pub struct LexicalReranker {
    /// Term-frequency saturation
    pub k1: f32,

    /// Length normalization strength
    pub b: f32,
}

impl Default for LexicalReranker {
    fn default() -> Self {
        Self {
            k1: 1.2,
            b: 0.75,
        }
    }
}

impl LexicalReranker {
    pub fn new() -> Self {
        Self::default()
    }

    /// BM25 score of every candidate, in input order.
    pub fn score(&self, query: &str, candidates: &[RetrievalCandidate]) -> Vec<f32> {
        // Sorted so every candidate sums its terms in the same order.
        let query_terms: BTreeSet<String> = tokenize(query).into_iter().collect();
        if query_terms.is_empty() || candidates.is_empty() {
            return vec![0.0; candidates.len()];
        }

        let docs: Vec<Vec<String>> = candidates
            .iter()
            .map(|c| tokenize(&c.metadata.rendered_text))
            .collect();

        let n = docs.len() as f32;
        let avg_len = (docs.iter().map(Vec::len).sum::<usize>() as f32 / n).max(1.0);

        let idf: Vec<(&str, f32)> = query_terms
            .iter()
            .map(|term| {
                let df = docs.iter().filter(|doc| doc.contains(term)).count() as f32;
                (term.as_str(), (1.0 + (n - df + 0.5) / (df + 0.5)).ln())
            })
            .collect();

        docs.iter()
            .map(|doc| {
                let len_norm = 1.0 - self.b + self.b * doc.len() as f32 / avg_len;
                idf.iter()
                    .map(|(term, idf)| {
                        let tf = doc.iter().filter(|t| t == term).count() as f32;
                        if tf == 0.0 {
                            0.0
                        } else {
                            idf * tf * (self.k1 + 1.0) / (tf + self.k1 * len_norm)
                        }
                    })
                    .sum()
            })
            .collect()
    }
}

#[async_trait]
impl Reranker for LexicalReranker {
    async fn rerank(
        &self,
        query: &str,
        candidates: Vec<RetrievalCandidate>,
        top_k: usize,
    ) -> Result<Vec<RankedResult>> {
        let total = candidates.len();
        let scores = self.score(query, &candidates);

        let mut ranked: Vec<RankedResult> = candidates
            .into_iter()
            .zip(scores)
            .map(|(candidate, relevance_score)| RankedResult {
                metadata: candidate.metadata,
                similarity_score: candidate.similarity_score,
                relevance_score,
            })
            .collect();

        // Stable: equal scores keep retrieval order.
        ranked.sort_by(|a, b| {
            b.relevance_score
                .partial_cmp(&a.relevance_score)
                .unwrap_or(Ordering::Equal)
        });
        ranked.truncate(top_k);

        debug!(candidates = total, kept = ranked.len(), top_k, "Reranked candidates");
        Ok(ranked)
    }
}

/// Lowercased alphanumeric tokens, minus stopwords.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .filter(|t| !STOPWORDS.contains(&t.as_str()))
        .collect()
}
