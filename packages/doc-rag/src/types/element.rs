//! Parsed document elements - the contract with the layout extractor.
//!
//! The extractor emits one flat JSON object per element with a `type`
//! discriminator. Element vocabularies differ between extraction tools, so
//! common aliases (`ListItem`, `Header`, `Figure`, ...) are folded into the
//! five kinds the pipeline understands.

use serde::{Deserialize, Serialize};

/// One element produced by the layout extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedElement {
    /// Stable element id (e.g. `el_000042`)
    pub id: String,

    /// Position in the original reading order
    pub order: u32,

    /// 1-based page number, when the extractor knows it
    #[serde(default)]
    pub page: Option<u32>,

    /// Kind-specific payload, tagged by `type`
    #[serde(flatten)]
    pub content: ElementContent,

    /// Extractor-specific metadata carried through untouched
    #[serde(default, alias = "metadata", skip_serializing_if = "Option::is_none")]
    pub raw_payload: Option<serde_json::Value>,
}

/// Kind-specific element payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ElementContent {
    Title {
        #[serde(default)]
        text: Option<String>,
    },

    #[serde(
        alias = "Text",
        alias = "ListItem",
        alias = "Header",
        alias = "Footer",
        alias = "CompositeElement"
    )]
    NarrativeText {
        #[serde(default)]
        text: Option<String>,
    },

    Table {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        table_html: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        raw_text: Option<String>,
    },

    #[serde(alias = "Figure")]
    Image {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },

    Unknown {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
}

/// Payload-free discriminator, handy for routing and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Title,
    NarrativeText,
    Table,
    Image,
    Unknown,
}

impl ParsedElement {
    fn new(id: impl Into<String>, order: u32, page: Option<u32>, content: ElementContent) -> Self {
        Self {
            id: id.into(),
            order,
            page,
            content,
            raw_payload: None,
        }
    }

    /// Create a title element.
    pub fn title(id: impl Into<String>, order: u32, page: Option<u32>, text: impl Into<String>) -> Self {
        Self::new(id, order, page, ElementContent::Title { text: Some(text.into()) })
    }

    /// Create a body-text element.
    pub fn narrative(
        id: impl Into<String>,
        order: u32,
        page: Option<u32>,
        text: impl Into<String>,
    ) -> Self {
        Self::new(
            id,
            order,
            page,
            ElementContent::NarrativeText { text: Some(text.into()) },
        )
    }

    /// Create a table element.
    pub fn table(
        id: impl Into<String>,
        order: u32,
        page: Option<u32>,
        table_html: Option<String>,
        raw_text: Option<String>,
    ) -> Self {
        Self::new(id, order, page, ElementContent::Table { table_html, raw_text })
    }

    /// Create an image element.
    pub fn image(id: impl Into<String>, order: u32, page: Option<u32>, caption: Option<String>) -> Self {
        Self::new(id, order, page, ElementContent::Image { caption })
    }

    /// Attach extractor metadata.
    pub fn with_raw_payload(mut self, payload: serde_json::Value) -> Self {
        self.raw_payload = Some(payload);
        self
    }

    pub fn kind(&self) -> ElementKind {
        match &self.content {
            ElementContent::Title { .. } => ElementKind::Title,
            ElementContent::NarrativeText { .. } => ElementKind::NarrativeText,
            ElementContent::Table { .. } => ElementKind::Table,
            ElementContent::Image { .. } => ElementKind::Image,
            ElementContent::Unknown { .. } => ElementKind::Unknown,
        }
    }

    /// Trimmed text for textual kinds; `None` when absent or blank.
    pub fn text(&self) -> Option<&str> {
        let raw = match &self.content {
            ElementContent::Title { text }
            | ElementContent::NarrativeText { text }
            | ElementContent::Unknown { text } => text.as_deref(),
            ElementContent::Table { .. } | ElementContent::Image { .. } => None,
        };
        raw.map(str::trim).filter(|t| !t.is_empty())
    }
}
