//! Context builder: merge the best ranked chunks into cited evidence.

use std::collections::BTreeSet;

use crate::types::retrieval::{ContextPayload, RankedResult};

/// Separator between evidence blocks.
pub const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// Select the first `max_chunks` results and render them with page citations.
///
/// Each block reads `[Source: Page <pages>]` followed by the chunk text,
/// so provenance survives even if the generator ignores everything else.
pub fn build_context(ranked: &[RankedResult], max_chunks: usize) -> ContextPayload {
    let context: Vec<RankedResult> = ranked.iter().take(max_chunks).cloned().collect();

    let table_ids_referenced: BTreeSet<String> = context
        .iter()
        .flat_map(|r| r.metadata.tables.iter().cloned())
        .collect();

    let evidence = context
        .iter()
        .map(|r| {
            format!(
                "[Source: Page {}]\n{}",
                r.metadata.page_label(),
                r.metadata.rendered_text
            )
        })
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR);

    ContextPayload {
        context,
        table_ids_referenced,
        evidence,
    }
}
