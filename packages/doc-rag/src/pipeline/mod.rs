//! Ingestion and query pipeline stages.
//!
//! Ingestion: [`route`] → [`tables`] → [`chunk`] → [`index`].
//! Query: [`retrieve`] → [`rerank`] → [`context`] → [`prompts`], with
//! [`intent`] and [`ticket`] on the action path.

pub mod chunk;
pub mod context;
pub mod index;
pub mod intent;
pub mod prompts;
pub mod rerank;
pub mod retrieve;
pub mod route;
pub mod tables;
pub mod ticket;

pub use chunk::ChunkBuilder;
pub use context::{build_context, CONTEXT_SEPARATOR};
pub use index::{CorpusIndex, CorpusIndexer, IndexedVector};
pub use intent::classify_intent;
pub use prompts::{is_refusal, REFUSAL_SENTINEL};
pub use rerank::LexicalReranker;
pub use retrieve::Retriever;
pub use route::{route_elements, RoutedElements};
pub use tables::{process_tables, ProcessedTables};
pub use ticket::parse_ticket;
