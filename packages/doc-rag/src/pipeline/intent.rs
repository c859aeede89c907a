//! Intent classifier.

use tracing::{debug, warn};

use crate::pipeline::prompts::format_intent_prompt;
use crate::traits::ai::Generator;
use crate::types::response::Intent;

/// Label a query as ACTION or INFORMATION.
///
/// Never fails. Generator errors and any output other than the two exact
/// labels resolve to [`Intent::Information`], which can still refuse,
/// rather than opening a ticket by accident.
pub async fn classify_intent<G: Generator + ?Sized>(generator: &G, query: &str) -> Intent {
    let raw = match generator.generate(&format_intent_prompt(query)).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %e, "Intent classification failed, defaulting to INFORMATION");
            return Intent::Information;
        }
    };

    match Intent::from_label(&raw) {
        Some(intent) => {
            debug!(?intent, "Classified query intent");
            intent
        }
        None => {
            warn!(output = %raw.trim(), "Unrecognized intent label, defaulting to INFORMATION");
            Intent::Information
        }
    }
}
