// Infrastructure traits for the server's external collaborators
//
// Upload handling depends on these rather than on concrete parsers so
// route tests can run without real PDFs.

use anyhow::Result;
use async_trait::async_trait;
use doc_rag::ParsedElement;

// =============================================================================
// Document Parsing Trait (Infrastructure)
// =============================================================================

#[async_trait]
pub trait BaseElementExtractor: Send + Sync {
    /// Turn the raw bytes of an uploaded document into layout elements in
    /// reading order.
    async fn extract(&self, bytes: Vec<u8>) -> Result<Vec<ParsedElement>>;
}
