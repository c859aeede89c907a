//! Chunk builder: group routed text into section-scoped chunks.
//!
//! Elements are walked in reading order. A title closes the open chunk and
//! starts a new section; body text accumulates under the current section.
//! Body text that appears before any title opens an implicit section so a
//! document whose headings were missed by the extractor is still indexed.
//!
//! Tables and images attach to a chunk when their page is one of the
//! chunk's pages. Output is fully deterministic: the same input always
//! yields the same chunks with the same ids.

use std::collections::BTreeSet;

use tracing::debug;

use crate::types::chunk::{Chunk, ImageRef};
use crate::types::element::{ElementKind, ParsedElement};
use crate::types::table::TableIndexEntry;

/// Builds [`Chunk`]s from routed text elements.
#[derive(Debug, Clone)]
pub struct ChunkBuilder {
    default_section: String,
}

impl Default for ChunkBuilder {
    fn default() -> Self {
        Self {
            default_section: "Document".to_string(),
        }
    }
}

/// Text and pages gathered since the last flush.
#[derive(Default)]
struct SectionBuffer {
    section: Option<String>,
    lines: Vec<String>,
    pages: BTreeSet<u32>,
}

impl ChunkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Label for text that precedes the first title.
    pub fn with_default_section(mut self, label: impl Into<String>) -> Self {
        self.default_section = label.into();
        self
    }

    /// Build chunks from text elements and the table/image side-tables.
    pub fn build(
        &self,
        text_elements: &[ParsedElement],
        tables: &[TableIndexEntry],
        images: &[ImageRef],
    ) -> Vec<Chunk> {
        let mut ordered: Vec<&ParsedElement> = text_elements.iter().collect();
        ordered.sort_by_key(|e| e.order);

        let mut chunks = Vec::new();
        let mut buffer = SectionBuffer::default();

        for element in ordered {
            let Some(text) = element.text() else {
                continue;
            };

            match element.kind() {
                ElementKind::Title => {
                    self.flush(&mut buffer, tables, images, &mut chunks);
                    buffer.section = Some(text.to_string());
                }
                ElementKind::NarrativeText => {
                    if buffer.section.is_none() {
                        buffer.section = Some(self.default_section.clone());
                    }
                    buffer.lines.push(text.to_string());
                    if let Some(page) = element.page {
                        buffer.pages.insert(page);
                    }
                }
                ElementKind::Table | ElementKind::Image | ElementKind::Unknown => {}
            }
        }
        self.flush(&mut buffer, tables, images, &mut chunks);

        debug!(
            chunks = chunks.len(),
            with_tables = chunks.iter().filter(|c| !c.tables.is_empty()).count(),
            "Built chunks"
        );

        chunks
    }

    /// Emit the buffered text as a chunk, if there is any. The section
    /// label stays open for following text.
    fn flush(
        &self,
        buffer: &mut SectionBuffer,
        tables: &[TableIndexEntry],
        images: &[ImageRef],
        chunks: &mut Vec<Chunk>,
    ) {
        let lines = std::mem::take(&mut buffer.lines);
        let pages = std::mem::take(&mut buffer.pages);

        let text = lines.join("\n");
        let text = text.trim();
        let Some(section) = buffer.section.as_ref() else {
            return;
        };
        if text.is_empty() {
            return;
        }

        let on_page = |page: Option<u32>| page.is_some_and(|p| pages.contains(&p));

        let mut table_ids: Vec<String> = Vec::new();
        for table in tables.iter().filter(|t| on_page(t.page)) {
            if !table_ids.contains(&table.id) {
                table_ids.push(table.id.clone());
            }
        }

        let attached_images = images
            .iter()
            .filter(|img| on_page(img.page))
            .cloned()
            .collect();

        chunks.push(Chunk {
            chunk_id: format!("chunk_{:03}", chunks.len() + 1),
            section: section.clone(),
            pages: pages.into_iter().collect(),
            text: text.to_string(),
            tables: table_ids,
            images: attached_images,
        });
    }
}
