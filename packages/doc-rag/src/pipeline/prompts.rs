//! Prompt templates for the query pipeline.
//!
//! Templates use `{placeholder}` markers filled with `str::replace`, so the
//! raw text stays readable and greppable.

/// Fixed answer for questions the evidence cannot support.
pub const REFUSAL_SENTINEL: &str = "Information not found in the document.";

/// Prompt for labelling a query as ACTION or INFORMATION.
pub const INTENT_PROMPT: &str = r#"You are an enterprise IT assistant.

Classify the user request into exactly ONE category:
- ACTION (creating a ticket, fixing an issue, requesting help)
- INFORMATION (asking a question)

User input:
"{query}"

Return ONLY the category name."#;

/// Prompt for extracting ticket fields from an action request.
pub const ACTION_PROMPT: &str = r#"You are an IT Service Desk automation engine.

Extract structured information from the user request.

FIELDS:
- department: IT / HR / Finance / Unknown
- issue_summary: short, professional description
- priority: Low / Medium / High

RULES:
- VPN, login, laptop, network, system access -> IT
- Work-blocking issues -> High priority
- Infer conservatively
- Return ONLY valid JSON: {"department": "...", "issue_summary": "...", "priority": "..."}
- No explanations

USER REQUEST:
"{query}""#;

/// Prompt for answering strictly from retrieved evidence.
pub const INFORMATION_PROMPT: &str = r#"You are an enterprise document assistant.

TASK:
Answer strictly from the evidence provided.
Do NOT infer.
Do NOT calculate.

If the answer is NOT explicitly present, respond exactly with:
"{refusal}"

QUESTION:
{question}

EVIDENCE:
TEXT:
{evidence}
{tables}
OUTPUT RULES:
- If found:
  - Answer in 1-2 sentences
  - Quote values exactly
  - End with the page number explicitly shown in the text, e.g.:
    (Source: Page 107)"#;

/// Format the intent classification prompt.
pub fn format_intent_prompt(query: &str) -> String {
    fill_template(INTENT_PROMPT, &[("query", query)])
}

/// Format the ticket extraction prompt.
pub fn format_action_prompt(query: &str) -> String {
    fill_template(ACTION_PROMPT, &[("query", query)])
}

/// Format the grounded answer prompt.
///
/// Table content is numbered from 1 and marked authoritative. With no
/// tables the block is omitted entirely.
pub fn format_information_prompt(question: &str, evidence: &str, tables: &[String]) -> String {
    let tables_text = if tables.is_empty() {
        String::new()
    } else {
        let body = tables
            .iter()
            .enumerate()
            .map(|(i, table)| format!("\nTable {}:\n{}\n", i + 1, table))
            .collect::<String>();
        format!("\nTABLE DATA (AUTHORITATIVE):\n{}", body)
    };

    fill_template(
        INFORMATION_PROMPT,
        &[
            ("refusal", REFUSAL_SENTINEL),
            ("question", question),
            ("evidence", evidence),
            ("tables", &tables_text),
        ],
    )
}

/// Substitute `{name}` placeholders in a single left-to-right pass.
///
/// Inserted values are never rescanned, so braces in questions or document
/// text come through verbatim. Unknown `{...}` runs are kept as-is.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];

        let hit = values.iter().find(|(name, _)| {
            tail[1..]
                .strip_prefix(*name)
                .is_some_and(|after| after.starts_with('}'))
        });

        match hit {
            Some((name, value)) => {
                out.push_str(value);
                rest = &tail[name.len() + 2..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Whether generator output is the refusal sentinel.
///
/// Compares after trimming whitespace and one layer of wrapping quotes,
/// ignoring case. Paraphrased refusals do not match.
pub fn is_refusal(answer: &str) -> bool {
    let trimmed = answer.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed)
        .trim();

    unquoted.eq_ignore_ascii_case(REFUSAL_SENTINEL)
}
