//! Agent outcomes: intents, tickets and the response union.

use serde::{Deserialize, Serialize};

use crate::pipeline::prompts::REFUSAL_SENTINEL;

/// Answer returned when a query arrives before any document is active.
pub const NO_DOCUMENT_MESSAGE: &str = "Please upload a PDF first.";

/// What the user wants done with their query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Intent {
    /// Create a service ticket
    Action,
    /// Answer from the document
    Information,
}

impl Intent {
    /// Parse a normalized label (trimmed, case-insensitive). Anything else is `None`.
    pub fn from_label(raw: &str) -> Option<Self> {
        match raw.trim().to_uppercase().as_str() {
            "ACTION" => Some(Self::Action),
            "INFORMATION" => Some(Self::Information),
            _ => None,
        }
    }
}

/// Department a ticket is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Department {
    #[serde(rename = "IT")]
    It,
    #[serde(rename = "HR")]
    Hr,
    Finance,
    Unknown,
}

impl Department {
    /// Case-insensitive label lookup; unrecognized labels map to `Unknown`.
    pub fn from_label(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "it" => Self::It,
            "hr" => Self::Hr,
            "finance" => Self::Finance,
            _ => Self::Unknown,
        }
    }
}

/// Ticket urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn from_label(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// Structured fields extracted from an action request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedTicket {
    pub department: Department,
    pub issue_summary: String,
    pub priority: Priority,
}

impl ParsedTicket {
    /// Ticket used when the generator output cannot be read.
    pub fn fallback(query: &str) -> Self {
        Self {
            department: Department::It,
            issue_summary: query.to_string(),
            priority: Priority::Medium,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketAction {
    CreateTicket,
}

/// The single outcome of every supervisor query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AgentResponse {
    Action {
        action: TicketAction,
        department: Department,
        description: String,
        priority: Priority,
    },
    Information {
        answer: String,
    },
}

impl AgentResponse {
    pub fn information(answer: impl Into<String>) -> Self {
        Self::Information {
            answer: answer.into(),
        }
    }

    /// The fixed answer for missing evidence.
    pub fn refusal() -> Self {
        Self::information(REFUSAL_SENTINEL)
    }

    pub fn no_document() -> Self {
        Self::information(NO_DOCUMENT_MESSAGE)
    }

    pub fn ticket(ticket: ParsedTicket) -> Self {
        Self::Action {
            action: TicketAction::CreateTicket,
            department: ticket.department,
            description: ticket.issue_summary,
            priority: ticket.priority,
        }
    }

    /// Answer text for information responses.
    pub fn answer(&self) -> Option<&str> {
        match self {
            Self::Information { answer } => Some(answer),
            Self::Action { .. } => None,
        }
    }
}
