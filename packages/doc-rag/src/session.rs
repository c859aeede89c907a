//! The active-document slot.
//!
//! Exactly one document is queryable at a time. Uploads build a complete
//! [`ActiveDocument`] off to the side and swap it in with a single write;
//! queries clone the `Arc` under a read lock and work on that snapshot, so
//! a reader never sees a half-replaced index.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::info;

use crate::pipeline::index::CorpusIndex;
use crate::types::chunk::Chunk;
use crate::types::table::TableRecord;

/// Everything a query needs from one ingested document.
#[derive(Debug)]
pub struct ActiveDocument {
    name: Option<String>,
    corpus: CorpusIndex,
    chunks: Vec<Chunk>,
    tables: Vec<TableRecord>,
    activated_at: DateTime<Utc>,
}

impl ActiveDocument {
    pub fn new(corpus: CorpusIndex, chunks: Vec<Chunk>, tables: Vec<TableRecord>) -> Self {
        Self {
            name: None,
            corpus,
            chunks,
            tables,
            activated_at: Utc::now(),
        }
    }

    /// Attach a display name, usually the uploaded filename.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn corpus(&self) -> &CorpusIndex {
        &self.corpus
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn tables(&self) -> &[TableRecord] {
        &self.tables
    }

    pub fn activated_at(&self) -> DateTime<Utc> {
        self.activated_at
    }

    /// Content of the referenced tables, in raw-store order.
    ///
    /// Structured tables yield their markup, others their raw text. Ids
    /// with no stored table and tables with no content are skipped.
    pub fn load_tables(&self, ids: &BTreeSet<String>) -> Vec<String> {
        self.tables
            .iter()
            .filter(|t| ids.contains(&t.id))
            .filter_map(|t| t.content().map(String::from))
            .collect()
    }
}

/// Single-writer, multi-reader holder of the current document.
#[derive(Debug, Default)]
pub struct DocumentSlot {
    current: RwLock<Option<Arc<ActiveDocument>>>,
}

impl DocumentSlot {
    /// An empty slot (no document loaded).
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the active document, if any.
    pub async fn current(&self) -> Option<Arc<ActiveDocument>> {
        self.current.read().await.clone()
    }

    pub async fn is_ready(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// Replace the active document. Returns the one it displaced.
    pub async fn activate(&self, document: ActiveDocument) -> Option<Arc<ActiveDocument>> {
        let document = Arc::new(document);
        info!(
            name = document.name().unwrap_or("<unnamed>"),
            chunks = document.corpus().len(),
            tables = document.tables().len(),
            "Activating document"
        );
        self.current.write().await.replace(document)
    }

    /// Drop the active document.
    pub async fn clear(&self) -> Option<Arc<ActiveDocument>> {
        self.current.write().await.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::index::IndexedVector;
    use crate::types::retrieval::ChunkMetadata;
    use crate::types::table::TableType;

    fn document(name: &str) -> ActiveDocument {
        let chunk = Chunk {
            chunk_id: "chunk_001".into(),
            section: "S".into(),
            pages: vec![1],
            text: "body".into(),
            tables: vec!["t1".into()],
            images: vec![],
        };
        let corpus = CorpusIndex::from_vectors(vec![IndexedVector {
            chunk_id: chunk.chunk_id.clone(),
            vector: vec![1.0, 0.0],
            metadata: ChunkMetadata::from_chunk(&chunk),
        }])
        .unwrap();

        let tables = vec![
            TableRecord {
                id: "t2".into(),
                page: Some(1),
                table_type: TableType::Unstructured,
                table_html: None,
                raw_text: Some("raw two".into()),
            },
            TableRecord {
                id: "t1".into(),
                page: Some(1),
                table_type: TableType::Structured,
                table_html: Some("<table>one</table>".into()),
                raw_text: Some("raw one".into()),
            },
        ];

        ActiveDocument::new(corpus, vec![chunk], tables).with_name(name)
    }

    #[test]
    fn test_load_tables_follows_store_order() {
        let doc = document("policy.pdf");
        let ids: BTreeSet<String> = ["t1", "t2", "missing"].iter().map(|s| s.to_string()).collect();

        assert_eq!(
            doc.load_tables(&ids),
            vec!["raw two".to_string(), "<table>one</table>".to_string()]
        );
        assert!(doc.load_tables(&BTreeSet::new()).is_empty());
    }

    #[tokio::test]
    async fn test_slot_lifecycle() {
        let slot = DocumentSlot::new();
        assert!(!slot.is_ready().await);
        assert!(slot.current().await.is_none());

        assert!(slot.activate(document("first.pdf")).await.is_none());
        let snapshot = slot.current().await.unwrap();
        assert_eq!(snapshot.name(), Some("first.pdf"));

        let previous = slot.activate(document("second.pdf")).await.unwrap();
        assert_eq!(previous.name(), Some("first.pdf"));
        assert_eq!(snapshot.name(), Some("first.pdf"));
        assert_eq!(slot.current().await.unwrap().name(), Some("second.pdf"));

        assert!(slot.clear().await.is_some());
        assert!(!slot.is_ready().await);
    }
}
