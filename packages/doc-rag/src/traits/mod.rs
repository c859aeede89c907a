//! Core trait abstractions for the RAG library.
//!
//! These traits are the seams to the external oracles (generation,
//! embedding, similarity search) and to the relevance signal used for
//! reranking.

pub mod ai;
pub mod index;
pub mod reranker;
