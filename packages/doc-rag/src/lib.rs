//! Document Question-Answering Library
//!
//! Answers natural-language questions against a single uploaded document,
//! or turns action requests into service tickets.
//!
//! # Design Philosophy
//!
//! - Provenance survives every stage: chunks carry their pages, evidence
//!   carries `[Source: Page N]` citations
//! - Grounded or nothing: missing evidence yields the refusal sentinel
//! - Live queries never fail on oracle trouble; they degrade to a valid
//!   response
//! - Library handles mechanics, app handles transport
//!
//! # Usage
//!
//! ```rust,ignore
//! use doc_rag::{DocumentSlot, Supervisor};
//! use doc_rag::testing::{MockEmbedder, MockGenerator};
//!
//! let supervisor = Supervisor::new(MockGenerator::new(), MockEmbedder::new());
//! let slot = DocumentSlot::new();
//!
//! let document = supervisor.ingest(&elements).await?;
//! supervisor.activate(&slot, document).await;
//!
//! let response = supervisor.handle(&slot, "What is the travel policy?").await?;
//! ```
//!
//! # Modules
//!
//! - [`types`] - Elements, chunks, tables and responses
//! - [`traits`] - Oracle, index and reranker abstractions
//! - [`pipeline`] - Ingestion and query stages
//! - [`stores`] - Similarity index implementations
//! - [`session`] - The active-document slot
//! - [`artifacts`] - JSON artifacts between ingestion stages
//! - [`security`] - Credential handling
//! - [`testing`] - Mock implementations for testing

#[cfg(feature = "openai")]
pub mod ai;
pub mod artifacts;
pub mod error;
pub mod pipeline;
pub mod security;
pub mod session;
pub mod stores;
pub mod supervisor;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{RagError, Result, TicketParseError};
pub use session::{ActiveDocument, DocumentSlot};
pub use supervisor::Supervisor;
pub use traits::{
    ai::{Embedder, Generator},
    index::SimilarityIndex,
    reranker::Reranker,
};
pub use types::{
    chunk::{Chunk, ImageRef},
    config::AgentConfig,
    element::{ElementContent, ElementKind, ParsedElement},
    response::{AgentResponse, Department, Intent, ParsedTicket, Priority, NO_DOCUMENT_MESSAGE},
    retrieval::{ChunkMetadata, ContextPayload, RankedResult, RetrievalCandidate},
    table::{TableIndexEntry, TableRecord, TableType},
};

// Re-export pipeline components
pub use pipeline::{
    build_context, classify_intent, is_refusal, parse_ticket, process_tables, route_elements,
    ChunkBuilder, CorpusIndex, CorpusIndexer, IndexedVector, LexicalReranker, Retriever,
    REFUSAL_SENTINEL,
};

pub use artifacts::ArtifactDir;
pub use security::{AICredentials, SecretString};
pub use stores::MemoryIndex;

#[cfg(feature = "openai")]
pub use ai::{OpenAIEmbedder, OpenAIGenerator};
