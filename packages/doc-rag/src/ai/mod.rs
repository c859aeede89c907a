//! Generator and embedder implementations backed by real providers.

#[cfg(feature = "openai")]
mod openai;

#[cfg(feature = "openai")]
pub use openai::{OpenAIEmbedder, OpenAIGenerator};
