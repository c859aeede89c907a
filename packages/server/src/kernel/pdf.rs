//! PDF text extraction into layout elements.
//!
//! `pdf-extract` yields plain text per page, so element kinds are inferred
//! from block shape: short capitalized lines become titles, blocks whose
//! lines are split into columns by wide gaps become unstructured tables,
//! everything else is narrative text.

use std::io::Write;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use doc_rag::ParsedElement;
use serde_json::json;
use tracing::{info, warn};

use crate::kernel::BaseElementExtractor;

const MAX_TITLE_CHARS: usize = 80;
const MAX_TITLE_WORDS: usize = 12;
const MIN_COLUMN_GAP: usize = 3;

/// Extracts elements from PDF bytes with `pdf-extract`.
#[derive(Debug, Clone, Default)]
pub struct PdfElementExtractor;

impl PdfElementExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl BaseElementExtractor for PdfElementExtractor {
    async fn extract(&self, bytes: Vec<u8>) -> Result<Vec<ParsedElement>> {
        let pages = tokio::task::spawn_blocking(move || extract_pages(&bytes))
            .await
            .context("PDF extraction task failed")??;

        let elements = elements_from_pages(&pages);
        info!(
            pages = pages.len(),
            elements = elements.len(),
            "Extracted PDF elements"
        );
        Ok(elements)
    }
}

fn extract_pages(bytes: &[u8]) -> Result<Vec<String>> {
    let mut file = tempfile::Builder::new()
        .suffix(".pdf")
        .tempfile()
        .context("failed to create temp file for upload")?;
    file.write_all(bytes)
        .context("failed to write upload to temp file")?;

    let path = file.path().to_path_buf();

    // pdf-extract panics on some malformed inputs
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        pdf_extract::extract_text_by_pages(&path)
    }));

    match result {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => Err(anyhow!("failed to extract text from PDF: {}", e)),
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            warn!(error = %message, "pdf-extract panicked");
            Err(anyhow!("PDF could not be parsed: {}", message))
        }
    }
}

/// Split page texts into elements. Pages are 1-based; ids and order
/// follow reading order across the whole document.
pub fn elements_from_pages(pages: &[String]) -> Vec<ParsedElement> {
    let mut elements = Vec::new();

    for (index, text) in pages.iter().enumerate() {
        let page = Some(index as u32 + 1);

        for block in blocks(text) {
            let order = elements.len() as u32 + 1;
            let id = format!("el_{:06}", order);

            let element = if is_table_block(&block) {
                ParsedElement::table(id, order, page, None, Some(block.join("\n")))
            } else if block.len() == 1 && looks_like_title(block[0]) {
                ParsedElement::title(id, order, page, block[0])
            } else {
                ParsedElement::narrative(id, order, page, block.join(" "))
            };

            elements.push(element.with_raw_payload(json!({ "source": "pdf-extract" })));
        }
    }

    elements
}

/// Blank-line separated runs of non-empty lines.
fn blocks(text: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

/// Character positions where a column starts after a tab or a run of at
/// least `MIN_COLUMN_GAP` spaces.
fn column_starts(line: &str) -> Vec<usize> {
    let mut starts = Vec::new();
    let mut spaces = 0;
    let mut tabbed = false;

    for (position, c) in line.chars().enumerate() {
        match c {
            ' ' => spaces += 1,
            '\t' => tabbed = true,
            _ => {
                if tabbed || spaces >= MIN_COLUMN_GAP {
                    starts.push(position);
                }
                spaces = 0;
                tabbed = false;
            }
        }
    }

    starts
}

/// Most lines carry column gaps and at least two of them agree on where a
/// column starts. Tab-separated rows count as aligned.
fn is_table_block(lines: &[&str]) -> bool {
    let rows: Vec<Vec<usize>> = lines
        .iter()
        .map(|line| column_starts(line))
        .filter(|starts| !starts.is_empty())
        .collect();
    if rows.len() < 2 || rows.len() * 2 < lines.len() {
        return false;
    }

    let tabbed = lines.iter().filter(|line| line.contains('\t')).count();
    if tabbed >= 2 {
        return true;
    }

    rows.iter().enumerate().any(|(i, starts)| {
        starts
            .iter()
            .any(|position| rows[i + 1..].iter().any(|other| other.contains(position)))
    })
}

fn looks_like_title(line: &str) -> bool {
    if line.chars().count() > MAX_TITLE_CHARS {
        return false;
    }
    if line.ends_with(['.', ',', ';', ':', '?', '!']) {
        return false;
    }

    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() || words.len() > MAX_TITLE_WORDS {
        return false;
    }

    let starts_well = line
        .chars()
        .next()
        .is_some_and(|c| c.is_uppercase() || c.is_ascii_digit());
    if !starts_well {
        return false;
    }

    let alphabetic: Vec<&str> = words
        .iter()
        .copied()
        .filter(|w| w.chars().next().is_some_and(char::is_alphabetic))
        .collect();
    if alphabetic.is_empty() {
        return false;
    }

    let capitalized = alphabetic
        .iter()
        .filter(|w| w.chars().next().is_some_and(char::is_uppercase))
        .count();
    capitalized * 5 >= alphabetic.len() * 3
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_rag::ElementKind;

    fn pages(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_blocks_become_titles_text_and_tables() {
        let elements = elements_from_pages(&pages(&[
            "REMOTE ACCESS\n\nEmployees must connect through the VPN.\nAccess is logged.\n\nRole        Limit\nManager     $200\nStaff       $100\n",
        ]));

        assert_eq!(elements.len(), 3);
        assert_eq!(elements[0].kind(), ElementKind::Title);
        assert_eq!(elements[0].text(), Some("REMOTE ACCESS"));
        assert_eq!(elements[1].kind(), ElementKind::NarrativeText);
        assert_eq!(
            elements[1].text(),
            Some("Employees must connect through the VPN. Access is logged.")
        );
        assert_eq!(elements[2].kind(), ElementKind::Table);
    }

    #[test]
    fn test_pages_ids_and_order() {
        let elements = elements_from_pages(&pages(&[
            "Travel Expense Limits",
            "",
            "Meals are reimbursed up to the daily cap.",
        ]));

        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].id, "el_000001");
        assert_eq!(elements[0].page, Some(1));
        assert_eq!(elements[1].id, "el_000002");
        assert_eq!(elements[1].order, 2);
        assert_eq!(elements[1].page, Some(3));
    }

    #[test]
    fn test_sentences_are_not_titles() {
        assert!(looks_like_title("Travel Expense Limits"));
        assert!(looks_like_title("3.2 Leave Policy"));
        assert!(!looks_like_title("Employees must connect"));
        assert!(!looks_like_title("Annual leave is 25 days."));
        assert!(!looks_like_title("lowercase heading"));
    }

    #[test]
    fn test_single_gapped_line_is_not_a_table() {
        assert!(!is_table_block(&["Name   Value"]));
        assert!(is_table_block(&["Name   Value", "a      1"]));
        assert!(!is_table_block(&["Name   Value", "a      1", "plain", "plain", "plain"]));
    }

    #[test]
    fn test_justified_prose_is_not_a_table() {
        let elements = elements_from_pages(&pages(&[
            "The policy  applies to all  staff.\nManagers must  approve leave  requests.",
        ]));
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].kind(), ElementKind::NarrativeText);

        // Wide gaps that never line up are still prose
        assert!(!is_table_block(&[
            "The policy   applies to all   staff.",
            "Managers must   approve leave   requests.",
        ]));
        assert!(is_table_block(&["Code\tDays", "AL\t25"]));
    }

    #[tokio::test]
    async fn test_garbage_bytes_are_rejected() {
        let result = PdfElementExtractor::new()
            .extract(b"%PDF-1.4 not really a pdf".to_vec())
            .await;
        assert!(result.is_err());
    }
}
