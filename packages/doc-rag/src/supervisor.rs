//! The agent supervisor - main entry point for the library.
//!
//! Routes each query by intent:
//!
//! - **ACTION** → ticket extraction prompt → [`parse_ticket`], falling back
//!   to a default ticket when the generator fails or emits bad JSON.
//! - **INFORMATION** → retrieve → rerank → context → grounded prompt →
//!   answer, or the refusal sentinel when evidence is missing.
//!
//! Oracle and parsing failures never escape [`Supervisor::handle`]; only
//! broken invariants (a corrupt index, an embedder of the wrong width) do.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::artifacts::ArtifactDir;
use crate::error::{RagError, Result};
use crate::pipeline::chunk::ChunkBuilder;
use crate::pipeline::context::build_context;
use crate::pipeline::index::CorpusIndexer;
use crate::pipeline::intent::classify_intent;
use crate::pipeline::prompts::{format_action_prompt, format_information_prompt, is_refusal};
use crate::pipeline::rerank::LexicalReranker;
use crate::pipeline::retrieve::Retriever;
use crate::pipeline::route::route_elements;
use crate::pipeline::tables::process_tables;
use crate::pipeline::ticket::parse_ticket;
use crate::session::{ActiveDocument, DocumentSlot};
use crate::traits::{ai::Embedder, ai::Generator, reranker::Reranker};
use crate::types::{
    config::AgentConfig,
    element::ParsedElement,
    response::{AgentResponse, Intent, ParsedTicket},
    retrieval::{RankedResult, RetrievalCandidate},
};

/// Orchestrates ingestion and query handling.
///
/// # Example
///
/// ```rust,ignore
/// let supervisor = Supervisor::new(generator, embedder);
/// let slot = DocumentSlot::new();
///
/// let document = supervisor.ingest(&elements).await?;
/// supervisor.activate(&slot, document).await;
///
/// let response = supervisor.handle(&slot, "How many leave days do I get?").await?;
/// ```
pub struct Supervisor<G: Generator, E: Embedder, R: Reranker = LexicalReranker> {
    generator: G,
    embedder: E,
    reranker: R,
    config: AgentConfig,
}

impl<G: Generator, E: Embedder> Supervisor<G, E, LexicalReranker> {
    /// Create a supervisor with the lexical reranker and default config.
    pub fn new(generator: G, embedder: E) -> Self {
        Self {
            generator,
            embedder,
            reranker: LexicalReranker::default(),
            config: AgentConfig::default(),
        }
    }
}

impl<G: Generator, E: Embedder, R: Reranker> Supervisor<G, E, R> {
    /// Swap in a different reranker.
    pub fn with_reranker<R2: Reranker>(self, reranker: R2) -> Supervisor<G, E, R2> {
        Supervisor {
            generator: self.generator,
            embedder: self.embedder,
            reranker,
            config: self.config,
        }
    }

    pub fn with_config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    // =========================================================================
    // Ingestion
    // =========================================================================

    /// Turn parsed elements into a queryable document.
    ///
    /// Runs router → table processor → chunk builder → indexer. Fails with
    /// [`RagError::NoContentExtracted`] when the document has no text.
    pub async fn ingest(&self, elements: &[ParsedElement]) -> Result<ActiveDocument> {
        self.ingest_inner(elements, None).await
    }

    /// Like [`ingest`](Self::ingest), also writing each stage's output to `artifacts`.
    pub async fn ingest_with_artifacts(
        &self,
        elements: &[ParsedElement],
        artifacts: &ArtifactDir,
    ) -> Result<ActiveDocument> {
        self.ingest_inner(elements, Some(artifacts)).await
    }

    async fn ingest_inner(
        &self,
        elements: &[ParsedElement],
        artifacts: Option<&ArtifactDir>,
    ) -> Result<ActiveDocument> {
        let start = Instant::now();

        let routed = route_elements(elements);
        let tables = process_tables(&routed.tables);
        let chunks = ChunkBuilder::new()
            .with_default_section(self.config.default_section.clone())
            .build(&routed.text, &tables.index, &routed.images);

        if let Some(artifacts) = artifacts {
            artifacts.write_all(elements, &routed, &tables, &chunks)?;
        }

        let corpus = CorpusIndexer::new(&self.embedder).build(&chunks).await?;

        info!(
            elements = elements.len(),
            chunks = chunks.len(),
            indexed = corpus.len(),
            tables = tables.raw.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Ingested document"
        );

        Ok(ActiveDocument::new(corpus, chunks, tables.raw))
    }

    /// Make `document` the one every following query runs against.
    pub async fn activate(&self, slot: &DocumentSlot, document: ActiveDocument) {
        slot.activate(document).await;
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Answer one query against the active document.
    pub async fn handle(&self, slot: &DocumentSlot, query: &str) -> Result<AgentResponse> {
        let Some(document) = slot.current().await else {
            debug!("Query received with no active document");
            return Ok(AgentResponse::no_document());
        };

        match classify_intent(&self.generator, query).await {
            Intent::Action => Ok(self.handle_action(query).await),
            Intent::Information => self.handle_information(&document, query).await,
        }
    }

    async fn handle_action(&self, query: &str) -> AgentResponse {
        let ticket = match self.generator.generate(&format_action_prompt(query)).await {
            Ok(raw) => parse_ticket(&raw, query).unwrap_or_else(|e| {
                warn!(error = %e, "Unreadable ticket output, using default ticket");
                ParsedTicket::fallback(query)
            }),
            Err(e) => {
                warn!(error = %e, "Ticket extraction failed, using default ticket");
                ParsedTicket::fallback(query)
            }
        };

        info!(
            department = ?ticket.department,
            priority = ?ticket.priority,
            "Created ticket"
        );
        AgentResponse::ticket(ticket)
    }

    async fn handle_information(
        &self,
        document: &ActiveDocument,
        query: &str,
    ) -> Result<AgentResponse> {
        let retriever = Retriever::new(&self.embedder, document.corpus());
        let candidates = match retriever.retrieve(query, self.config.retrieval_top_k).await {
            Ok(candidates) => candidates,
            Err(RagError::Embedding(e)) => {
                warn!(error = %e, "Query embedding failed, refusing");
                return Ok(AgentResponse::refusal());
            }
            Err(e) => return Err(e),
        };

        let ranked = self.rerank(query, candidates).await;
        if ranked.is_empty() {
            info!("No evidence after reranking, refusing");
            return Ok(AgentResponse::refusal());
        }

        let payload = build_context(&ranked, self.config.context_chunks);
        let tables = document.load_tables(&payload.table_ids_referenced);
        let prompt = format_information_prompt(query, &payload.evidence, &tables);

        debug!(
            candidates = ranked.len(),
            context_chunks = payload.context.len(),
            tables = tables.len(),
            prompt_len = prompt.len(),
            "Built grounded prompt"
        );

        let answer = match self.generator.generate(&prompt).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!(error = %e, "Answer generation failed, refusing");
                return Ok(AgentResponse::refusal());
            }
        };

        if answer.trim().is_empty() || is_refusal(&answer) {
            info!("Generator found no answer in evidence");
            return Ok(AgentResponse::refusal());
        }

        Ok(AgentResponse::information(answer))
    }

    /// Rerank and apply the configured score floor.
    ///
    /// A reranker error falls back to retrieval order.
    async fn rerank(&self, query: &str, candidates: Vec<RetrievalCandidate>) -> Vec<RankedResult> {
        let top_k = self.config.rerank_top_k;
        let ranked = match self.reranker.rerank(query, candidates.clone(), top_k).await {
            Ok(ranked) => ranked,
            Err(e) => {
                warn!(error = %e, "Reranking failed, keeping retrieval order");
                candidates
                    .into_iter()
                    .take(top_k)
                    .map(|c| RankedResult {
                        relevance_score: c.similarity_score,
                        similarity_score: c.similarity_score,
                        metadata: c.metadata,
                    })
                    .collect()
            }
        };

        match self.config.rerank_min_score {
            Some(min) => ranked.into_iter().filter(|r| r.relevance_score >= min).collect(),
            None => ranked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockEmbedder, MockGenerator};
    use crate::types::response::{Department, Priority};

    fn elements() -> Vec<ParsedElement> {
        vec![
            ParsedElement::title("el_000001", 1, Some(4), "Annual Leave"),
            ParsedElement::narrative(
                "el_000002",
                2,
                Some(4),
                "Full-time employees receive 20 days of annual leave per year.",
            ),
            ParsedElement::table(
                "el_000003",
                3,
                Some(4),
                Some("<table><tr><td>Grade A</td><td>25</td></tr></table>".into()),
                None,
            ),
            ParsedElement::title("el_000004", 4, Some(9), "Travel"),
            ParsedElement::narrative("el_000005", 5, Some(9), "Flights over six hours may be booked in business class."),
        ]
    }

    async fn ready(generator: MockGenerator) -> (Supervisor<MockGenerator, MockEmbedder>, DocumentSlot) {
        let supervisor = Supervisor::new(generator, MockEmbedder::new());
        let slot = DocumentSlot::new();
        let document = supervisor.ingest(&elements()).await.unwrap();
        supervisor.activate(&slot, document).await;
        (supervisor, slot)
    }

    #[tokio::test]
    async fn test_ingest_builds_document() {
        let supervisor = Supervisor::new(MockGenerator::new(), MockEmbedder::new());
        let document = supervisor.ingest(&elements()).await.unwrap();

        assert_eq!(document.corpus().len(), 2);
        assert_eq!(document.chunks()[0].tables, vec!["el_000003".to_string()]);
        assert_eq!(document.tables().len(), 1);
    }

    #[tokio::test]
    async fn test_ingest_without_text_fails() {
        let supervisor = Supervisor::new(MockGenerator::new(), MockEmbedder::new());
        let elements = vec![ParsedElement::table("el_000001", 1, Some(1), None, Some("a b".into()))];

        let err = supervisor.ingest(&elements).await.unwrap_err();
        assert!(matches!(err, RagError::NoContentExtracted));
    }

    #[tokio::test]
    async fn test_information_prompt_carries_citation_and_tables() {
        let generator = MockGenerator::new()
            .with_response("Classify the user request", "INFORMATION")
            .with_response("enterprise document assistant", "Employees receive 20 days. (Source: Page 4)");
        let (supervisor, slot) = ready(generator.clone()).await;

        let response = supervisor.handle(&slot, "How many days of annual leave?").await.unwrap();

        assert_eq!(response.answer(), Some("Employees receive 20 days. (Source: Page 4)"));
        let prompts = generator.calls();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[1].contains("[Source: Page 4]\nAnnual Leave"));
        assert!(prompts[1].contains("TABLE DATA (AUTHORITATIVE):"));
        assert!(prompts[1].contains("Grade A"));
    }

    #[tokio::test]
    async fn test_refusal_sentinel_maps_to_refusal() {
        let generator = MockGenerator::new()
            .with_response("Classify the user request", "INFORMATION")
            .with_response("enterprise document assistant", "\"Information not found in the document.\"");
        let (supervisor, slot) = ready(generator).await;

        let response = supervisor.handle(&slot, "Who is the CEO?").await.unwrap();
        assert_eq!(response, AgentResponse::refusal());
    }

    #[tokio::test]
    async fn test_generation_failure_maps_to_refusal() {
        let generator = MockGenerator::new()
            .with_response("Classify the user request", "INFORMATION")
            .with_failure("enterprise document assistant");
        let (supervisor, slot) = ready(generator).await;

        let response = supervisor.handle(&slot, "How many days?").await.unwrap();
        assert_eq!(response, AgentResponse::refusal());
    }

    #[tokio::test]
    async fn test_action_with_valid_ticket() {
        let generator = MockGenerator::new()
            .with_response("Classify the user request", "ACTION")
            .with_response(
                "Service Desk automation",
                r#"{"department": "HR", "issue_summary": "Payslip missing for March", "priority": "Low"}"#,
            );
        let (supervisor, slot) = ready(generator).await;

        let response = supervisor.handle(&slot, "My March payslip is missing").await.unwrap();

        assert_eq!(
            response,
            AgentResponse::ticket(ParsedTicket {
                department: Department::Hr,
                issue_summary: "Payslip missing for March".into(),
                priority: Priority::Low,
            })
        );
    }

    #[tokio::test]
    async fn test_action_generation_failure_yields_default_ticket() {
        let generator = MockGenerator::new()
            .with_response("Classify the user request", "ACTION")
            .with_failure("Service Desk automation");
        let (supervisor, slot) = ready(generator).await;

        let query = "Laptop will not boot";
        let response = supervisor.handle(&slot, query).await.unwrap();

        assert_eq!(response, AgentResponse::ticket(ParsedTicket::fallback(query)));
    }

    #[tokio::test]
    async fn test_score_floor_can_force_refusal() {
        let generator = MockGenerator::new().with_default_response("INFORMATION");
        let supervisor = Supervisor::new(generator.clone(), MockEmbedder::new())
            .with_config(AgentConfig::default().with_rerank_min_score(1000.0));
        let slot = DocumentSlot::new();
        let document = supervisor.ingest(&elements()).await.unwrap();
        supervisor.activate(&slot, document).await;

        let response = supervisor.handle(&slot, "annual leave").await.unwrap();

        assert_eq!(response, AgentResponse::refusal());
        assert_eq!(generator.calls().len(), 1);
    }
}
