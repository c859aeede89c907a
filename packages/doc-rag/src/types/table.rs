//! Table records owned by the table processor.

use serde::{Deserialize, Serialize};

/// Whether a table kept its markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableType {
    /// Has an HTML representation
    Structured,
    /// Raw text fallback only
    Unstructured,
}

/// Full table content, looked up by id when a prompt needs it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRecord {
    pub id: String,

    #[serde(default)]
    pub page: Option<u32>,

    pub table_type: TableType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_html: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
}

impl TableRecord {
    /// Content to show the generator: markup for structured tables, raw text otherwise.
    pub fn content(&self) -> Option<&str> {
        match self.table_type {
            TableType::Structured => self.table_html.as_deref().or(self.raw_text.as_deref()),
            TableType::Unstructured => self.raw_text.as_deref(),
        }
    }

    /// Lightweight page lookup entry for this table.
    pub fn index_entry(&self) -> TableIndexEntry {
        TableIndexEntry {
            id: self.id.clone(),
            page: self.page,
        }
    }
}

/// Table id → page, consumed by the chunk builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableIndexEntry {
    pub id: String,

    #[serde(default)]
    pub page: Option<u32>,
}
