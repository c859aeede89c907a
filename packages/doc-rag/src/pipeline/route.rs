//! Element router: split parsed elements into text, table and image streams.

use tracing::debug;

use crate::types::chunk::ImageRef;
use crate::types::element::{ElementContent, ParsedElement};

/// Parsed elements grouped by the stage that consumes them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoutedElements {
    /// Titles and body text, in reading order
    pub text: Vec<ParsedElement>,

    /// Table elements, in reading order
    pub tables: Vec<ParsedElement>,

    /// Image references, in reading order
    pub images: Vec<ImageRef>,
}

/// Route elements by kind.
///
/// Input is stably sorted by `order` first. Textual elements without
/// non-blank text and `Unknown` elements are dropped.
pub fn route_elements(elements: &[ParsedElement]) -> RoutedElements {
    let mut ordered: Vec<&ParsedElement> = elements.iter().collect();
    ordered.sort_by_key(|e| e.order);

    let mut routed = RoutedElements::default();
    let mut dropped = 0usize;

    for element in ordered {
        match &element.content {
            ElementContent::Title { .. } | ElementContent::NarrativeText { .. } => {
                if element.text().is_some() {
                    routed.text.push(element.clone());
                } else {
                    dropped += 1;
                }
            }
            ElementContent::Table { .. } => routed.tables.push(element.clone()),
            ElementContent::Image { caption } => routed.images.push(ImageRef {
                page: element.page,
                caption: caption
                    .as_deref()
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(String::from),
            }),
            ElementContent::Unknown { .. } => dropped += 1,
        }
    }

    debug!(
        text = routed.text.len(),
        tables = routed.tables.len(),
        images = routed.images.len(),
        dropped,
        "Routed parsed elements"
    );

    routed
}
