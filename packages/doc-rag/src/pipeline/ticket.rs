//! Ticket extraction from generator output.

use serde::Deserialize;

use crate::error::TicketParseError;
use crate::types::response::{Department, ParsedTicket, Priority};

/// Ticket fields as the generator may emit them: any subset, any casing.
#[derive(Debug, Deserialize)]
struct RawTicket {
    #[serde(default)]
    department: Option<String>,
    #[serde(default)]
    issue_summary: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    priority: Option<String>,
}

impl RawTicket {
    /// First non-blank of `issue_summary`, `description`, `summary`.
    fn summary_text(&self) -> Option<&str> {
        [&self.issue_summary, &self.description, &self.summary]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .map(str::trim)
            .find(|s| !s.is_empty())
    }
}

/// Parse generator output into a ticket.
///
/// Accepts a bare JSON object or one wrapped in a markdown code fence.
/// Missing fields fall back to `IT`, the original `query`, and `Medium`.
/// Unknown departments become `Unknown`; unknown priorities become `Medium`.
pub fn parse_ticket(raw: &str, query: &str) -> Result<ParsedTicket, TicketParseError> {
    let body = strip_code_fence(raw.trim());
    if body.is_empty() {
        return Err(TicketParseError::Empty);
    }

    let value: serde_json::Value = serde_json::from_str(body)?;
    if !value.is_object() {
        return Err(TicketParseError::NotAnObject);
    }
    let parsed: RawTicket = serde_json::from_value(value)?;
    let fallback = ParsedTicket::fallback(query);

    Ok(ParsedTicket {
        department: parsed
            .department
            .as_deref()
            .map(Department::from_label)
            .unwrap_or(fallback.department),
        issue_summary: parsed
            .summary_text()
            .map(str::to_string)
            .unwrap_or(fallback.issue_summary),
        priority: parsed
            .priority
            .as_deref()
            .and_then(Priority::from_label)
            .unwrap_or(fallback.priority),
    })
}

/// Remove a surrounding ```` ``` ```` or ```` ```json ```` fence, if any.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    // Drop the info string on the opening line.
    match rest.find('\n') {
        Some(newline) if !rest[..newline].trim_start().starts_with('{') => rest[newline + 1..].trim(),
        _ => rest.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUERY: &str = "My VPN is not connecting, I can't work";

    #[test]
    fn test_summary_and_description_together() {
        let ticket = parse_ticket(
            r#"{"department":"HR","issue_summary":"Payslip","description":"Payslip missing","priority":"High"}"#,
            QUERY,
        )
        .unwrap();

        assert_eq!(ticket.department, Department::Hr);
        assert_eq!(ticket.issue_summary, "Payslip");
        assert_eq!(ticket.priority, Priority::High);
    }

    #[test]
    fn test_blank_summary_falls_through_to_description() {
        let ticket = parse_ticket(
            r#"{"department":"Finance","issue_summary":"  ","description":"Expense claim stuck"}"#,
            QUERY,
        )
        .unwrap();

        assert_eq!(ticket.issue_summary, "Expense claim stuck");
        assert_eq!(ticket.priority, Priority::Medium);
    }

    #[test]
    fn test_parses_complete_ticket() {
        let ticket = parse_ticket(
            r#"{"department": "IT", "issue_summary": "VPN connection failure", "priority": "High"}"#,
            QUERY,
        )
        .unwrap();

        assert_eq!(
            ticket,
            ParsedTicket {
                department: Department::It,
                issue_summary: "VPN connection failure".into(),
                priority: Priority::High,
            }
        );
    }

    #[test]
    fn test_unwraps_code_fence() {
        let raw = "```json\n{\"department\": \"HR\", \"issue_summary\": \"Payslip missing\", \"priority\": \"low\"}\n```";
        let ticket = parse_ticket(raw, QUERY).unwrap();

        assert_eq!(ticket.department, Department::Hr);
        assert_eq!(ticket.priority, Priority::Low);

        let raw = "```{\"department\": \"Finance\"}```";
        assert_eq!(parse_ticket(raw, QUERY).unwrap().department, Department::Finance);
    }

    #[test]
    fn test_missing_and_unknown_fields_take_defaults() {
        let ticket = parse_ticket(r#"{"department": "Legal", "priority": "urgent"}"#, QUERY).unwrap();

        assert_eq!(ticket.department, Department::Unknown);
        assert_eq!(ticket.issue_summary, QUERY);
        assert_eq!(ticket.priority, Priority::Medium);

        let ticket = parse_ticket("{}", QUERY).unwrap();
        assert_eq!(ticket, ParsedTicket::fallback(QUERY));
    }

    #[test]
    fn test_invalid_output_is_an_error() {
        assert!(matches!(parse_ticket("", QUERY), Err(TicketParseError::Empty)));
        assert!(matches!(
            parse_ticket("Sure! Here is your ticket.", QUERY),
            Err(TicketParseError::InvalidJson(_))
        ));
        assert!(matches!(
            parse_ticket(r#"["IT", "VPN", "High"]"#, QUERY),
            Err(TicketParseError::NotAnObject)
        ));
    }
}
