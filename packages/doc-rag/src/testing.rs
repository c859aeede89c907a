//! Testing utilities including mock implementations.
//!
//! These let applications exercise the whole pipeline without a model
//! provider or network access.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{RagError, Result};
use crate::pipeline::rerank::tokenize;
use crate::traits::ai::{Embedder, Generator};

/// Scripted outcome for a prompt.
#[derive(Debug, Clone)]
enum MockOutcome {
    Respond(String),
    Fail,
}

/// A mock generator for testing.
///
/// Rules match on a substring of the prompt and are checked in the order
/// they were added; the first hit wins. Unmatched prompts get the default
/// response (empty unless set). Clones share state, so a clone kept by the
/// test sees every call made through the original.
#[derive(Clone, Default)]
pub struct MockGenerator {
    rules: Arc<RwLock<Vec<(String, MockOutcome)>>>,
    default: Arc<RwLock<Option<MockOutcome>>>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond with `response` to prompts containing `pattern`.
    pub fn with_response(self, pattern: impl Into<String>, response: impl Into<String>) -> Self {
        self.rules
            .write()
            .unwrap()
            .push((pattern.into(), MockOutcome::Respond(response.into())));
        self
    }

    /// Fail prompts containing `pattern`.
    pub fn with_failure(self, pattern: impl Into<String>) -> Self {
        self.rules
            .write()
            .unwrap()
            .push((pattern.into(), MockOutcome::Fail));
        self
    }

    /// Response for prompts no rule matches.
    pub fn with_default_response(self, response: impl Into<String>) -> Self {
        *self.default.write().unwrap() = Some(MockOutcome::Respond(response.into()));
        self
    }

    /// Fail every prompt no rule matches.
    pub fn failing(self) -> Self {
        *self.default.write().unwrap() = Some(MockOutcome::Fail);
        self
    }

    /// Prompts received so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    /// Clear call history.
    pub fn clear_calls(&self) {
        self.calls.write().unwrap().clear();
    }

    fn outcome_for(&self, prompt: &str) -> MockOutcome {
        self.rules
            .read()
            .unwrap()
            .iter()
            .find(|(pattern, _)| prompt.contains(pattern.as_str()))
            .map(|(_, outcome)| outcome.clone())
            .or_else(|| self.default.read().unwrap().clone())
            .unwrap_or_else(|| MockOutcome::Respond(String::new()))
    }
}

#[async_trait]
impl Generator for MockGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.calls.write().unwrap().push(prompt.to_string());

        match self.outcome_for(prompt) {
            MockOutcome::Respond(response) => Ok(response),
            MockOutcome::Fail => Err(RagError::Generation("mock generator failure".into())),
        }
    }
}

/// A mock embedder for testing.
///
/// Produces hashed bag-of-words vectors: each token adds weight to a
/// bucket chosen by its SHA-256, so texts sharing words land close together
/// and the output is identical across runs.
#[derive(Clone)]
pub struct MockEmbedder {
    dimension: usize,
    overrides: Arc<RwLock<HashMap<String, Vec<f32>>>>,
    fail: bool,
    calls: Arc<RwLock<usize>>,
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self {
            dimension: 256,
            overrides: Arc::default(),
            fail: false,
            calls: Arc::default(),
        }
    }
}

impl MockEmbedder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dimension(dimension: usize) -> Self {
        Self {
            dimension,
            ..Self::default()
        }
    }

    /// Use a fixed vector for one exact text.
    pub fn with_embedding(self, text: impl Into<String>, embedding: Vec<f32>) -> Self {
        self.overrides
            .write()
            .unwrap()
            .insert(text.into(), embedding);
        self
    }

    /// Fail every request.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of `embed_batch` calls so far.
    pub fn calls(&self) -> usize {
        *self.calls.read().unwrap()
    }

    fn hashed_embedding(&self, text: &str) -> Vec<f32> {
        use sha2::{Digest, Sha256};

        let mut vector = vec![0.0; self.dimension];
        if self.dimension == 0 {
            return vector;
        }

        for token in tokenize(text) {
            let hash = Sha256::digest(token.as_bytes());
            let bucket = u64::from_le_bytes([
                hash[0], hash[1], hash[2], hash[3], hash[4], hash[5], hash[6], hash[7],
            ]) as usize
                % self.dimension;
            vector[bucket] += 1.0;
        }
        vector
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        *self.calls.write().unwrap() += 1;

        if self.fail {
            return Err(RagError::Embedding("mock embedder failure".into()));
        }

        let overrides = self.overrides.read().unwrap();
        Ok(texts
            .iter()
            .map(|text| {
                overrides
                    .get(*text)
                    .cloned()
                    .unwrap_or_else(|| self.hashed_embedding(text))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_generator_rules_match_in_order() {
        let generator = MockGenerator::new()
            .with_response("alpha", "first")
            .with_response("alpha beta", "second")
            .with_default_response("fallback");

        assert_eq!(generator.generate("alpha beta").await.unwrap(), "first");
        assert_eq!(generator.generate("gamma").await.unwrap(), "fallback");
        assert_eq!(generator.calls(), vec!["alpha beta".to_string(), "gamma".to_string()]);
    }

    #[tokio::test]
    async fn test_generator_failures() {
        let generator = MockGenerator::new().with_failure("boom");
        assert!(generator.generate("boom now").await.is_err());
        assert_eq!(generator.generate("quiet").await.unwrap(), "");

        assert!(MockGenerator::new().failing().generate("x").await.is_err());
    }

    #[tokio::test]
    async fn test_embedder_is_deterministic() {
        let embedder = MockEmbedder::with_dimension(64);
        let a = embedder.embed("annual leave policy").await.unwrap();
        let b = embedder.embed("annual leave policy").await.unwrap();

        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_eq!(a.iter().sum::<f32>(), 3.0);
        assert_eq!(embedder.calls(), 2);
    }

    #[tokio::test]
    async fn test_embedder_overrides_and_failure() {
        let embedder = MockEmbedder::with_dimension(2).with_embedding("x", vec![0.5, 0.5]);
        assert_eq!(embedder.embed("x").await.unwrap(), vec![0.5, 0.5]);

        assert!(MockEmbedder::new().failing().embed("x").await.is_err());
    }
}
