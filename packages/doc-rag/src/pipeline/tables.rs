//! Table processor: raw table store plus page index.

use tracing::debug;

use crate::types::element::{ElementContent, ParsedElement};
use crate::types::table::{TableIndexEntry, TableRecord, TableType};

/// Output of [`process_tables`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessedTables {
    /// Full table content, looked up by id at query time
    pub raw: Vec<TableRecord>,

    /// Table id to page, consumed by the chunk builder
    pub index: Vec<TableIndexEntry>,
}

/// Classify table elements and build the raw store and page index.
///
/// A table with non-blank markup is structured; otherwise it falls back to
/// its raw text. Table ids are the originating element ids. Non-table
/// elements are ignored.
pub fn process_tables(elements: &[ParsedElement]) -> ProcessedTables {
    let mut processed = ProcessedTables::default();

    for element in elements {
        let ElementContent::Table {
            table_html,
            raw_text,
        } = &element.content
        else {
            continue;
        };

        let table_html = non_blank(table_html);
        let raw_text = non_blank(raw_text);
        let table_type = if table_html.is_some() {
            TableType::Structured
        } else {
            TableType::Unstructured
        };

        let record = TableRecord {
            id: element.id.clone(),
            page: element.page,
            table_type,
            table_html,
            raw_text,
        };

        processed.index.push(record.index_entry());
        processed.raw.push(record);
    }

    let structured = processed
        .raw
        .iter()
        .filter(|t| t.table_type == TableType::Structured)
        .count();
    debug!(
        tables = processed.raw.len(),
        structured,
        unstructured = processed.raw.len() - structured,
        "Processed tables"
    );

    processed
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}
