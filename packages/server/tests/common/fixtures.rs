//! Parsed-document fixtures and a scripted element extractor.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use doc_rag::ParsedElement;
use server_core::kernel::BaseElementExtractor;

pub const INTENT_MARKER: &str = "Classify the user request";
pub const ACTION_MARKER: &str = "Service Desk automation";
pub const ANSWER_MARKER: &str = "enterprise document assistant";

/// Smallest byte string that passes the upload magic check.
pub const FAKE_PDF: &[u8] = b"%PDF-1.4\n% test fixture\n";

/// A two-section policy handbook.
pub fn handbook() -> Vec<ParsedElement> {
    vec![
        ParsedElement::title("el_000001", 1, Some(3), "Leave Policy"),
        ParsedElement::narrative(
            "el_000002",
            2,
            Some(3),
            "Employees receive 25 days of annual leave per year.",
        ),
        ParsedElement::title("el_000003", 3, Some(12), "Remote Access"),
        ParsedElement::narrative(
            "el_000004",
            4,
            Some(12),
            "Remote staff connect through the corporate VPN.",
        ),
    ]
}

/// Extractor that ignores the bytes and returns a fixed outcome.
pub struct StubExtractor {
    outcome: std::result::Result<Vec<ParsedElement>, String>,
}

impl StubExtractor {
    pub fn returning(elements: Vec<ParsedElement>) -> Self {
        Self {
            outcome: Ok(elements),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(message.into()),
        }
    }
}

#[async_trait]
impl BaseElementExtractor for StubExtractor {
    async fn extract(&self, _bytes: Vec<u8>) -> Result<Vec<ParsedElement>> {
        self.outcome.clone().map_err(|message| anyhow!(message))
    }
}

/// Extractor whose first call stalls before returning the handbook.
pub struct SlowFirstExtractor {
    delay: Duration,
    calls: AtomicUsize,
}

impl SlowFirstExtractor {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl BaseElementExtractor for SlowFirstExtractor {
    async fn extract(&self, _bytes: Vec<u8>) -> Result<Vec<ParsedElement>> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            tokio::time::sleep(self.delay).await;
        }
        Ok(handbook())
    }
}
