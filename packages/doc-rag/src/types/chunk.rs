//! Section-scoped chunks with page provenance.

use serde::{Deserialize, Serialize};

/// Image reference attached to a chunk. Only page and caption travel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    #[serde(default)]
    pub page: Option<u32>,

    #[serde(default)]
    pub caption: Option<String>,
}

/// A unit of retrievable text.
///
/// `pages` is ascending and unique; `text` is never blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub chunk_id: String,
    pub section: String,
    pub pages: Vec<u32>,
    pub text: String,
    #[serde(default)]
    pub tables: Vec<String>,
    #[serde(default)]
    pub images: Vec<ImageRef>,
}

impl Chunk {
    /// The string that gets embedded: section label, newline, body.
    pub fn rendered_text(&self) -> String {
        format!("{}\n{}", self.section, self.text.trim())
            .trim()
            .to_string()
    }
}

/// Comma-separated page list, or `Unknown` when there are none.
pub fn page_label(pages: &[u32]) -> String {
    if pages.is_empty() {
        return "Unknown".to_string();
    }
    pages
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
