//! Wire types for the OpenAI-compatible endpoints this client calls.

use serde::{Deserialize, Serialize};

// =============================================================================
// Chat Completion
// =============================================================================

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One turn of a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }
}

/// Decoding controls. Unset fields are left to the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Sampling {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl Sampling {
    /// Near-deterministic decoding for answers that must stay on the evidence.
    pub fn grounded() -> Self {
        Self {
            temperature: Some(0.1),
            top_p: Some(0.9),
            max_tokens: Some(256),
        }
    }
}

/// Body of `POST /chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(flatten)]
    pub sampling: Sampling,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            sampling: Sampling::default(),
        }
    }

    /// Single user turn carrying the whole prompt.
    pub fn prompt(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self::new(model).message(Message::user(prompt))
    }

    pub fn message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    pub fn sampling(mut self, sampling: Sampling) -> Self {
        self.sampling = sampling;
        self
    }
}

/// A completion reduced to what callers use.
#[derive(Debug, Clone)]
pub struct ChatResponse {
    /// Trimmed and never empty
    pub content: String,
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompletionEnvelope {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompletionChoice {
    pub message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompletionMessage {
    // Some providers send null content on filtered or tool-call turns
    #[serde(default)]
    pub content: Option<String>,
}

impl CompletionEnvelope {
    /// First choice's text, trimmed; `None` when missing or blank.
    pub(crate) fn into_content(self) -> Option<(String, Option<Usage>)> {
        let usage = self.usage;
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .map(|c| (c, usage))
    }
}

// =============================================================================
// Embeddings
// =============================================================================

/// Body of `POST /embeddings`. `input` is always sent as an array.
#[derive(Debug, Serialize)]
pub(crate) struct EmbeddingRequest<'a> {
    pub model: &'a str,
    pub input: &'a [&'a str],
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmbeddingEnvelope {
    pub data: Vec<EmbeddingRow>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmbeddingRow {
    pub embedding: Vec<f32>,
    #[serde(default)]
    pub index: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sampling_flattens_and_skips_unset_fields() {
        let request = ChatRequest::prompt("m", "hi");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "m");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hi");
        assert!(json.get("temperature").is_none());
        assert!(json.get("sampling").is_none());

        let json = serde_json::to_value(request.sampling(Sampling::grounded())).unwrap();
        assert_eq!(json["max_tokens"], 256);
        assert!(json["top_p"].as_f64().unwrap() > 0.89);
    }

    #[test]
    fn test_roles_serialize_lowercase() {
        let json = serde_json::to_value(Message::new(Role::System, "Be brief.")).unwrap();
        assert_eq!(json["role"], "system");
        assert_eq!(serde_json::to_value(Role::User).unwrap(), "user");
    }

    #[test]
    fn test_null_or_blank_content_reads_as_none() {
        let envelope: CompletionEnvelope =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert!(envelope.into_content().is_none());

        let envelope: CompletionEnvelope =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"  \n"}}]}"#).unwrap();
        assert!(envelope.into_content().is_none());

        let envelope: CompletionEnvelope = serde_json::from_str(
            r#"{"choices":[{"message":{"content":" INFORMATION "}}],
                "usage":{"prompt_tokens":5,"completion_tokens":1,"total_tokens":6}}"#,
        )
        .unwrap();
        let (content, usage) = envelope.into_content().unwrap();
        assert_eq!(content, "INFORMATION");
        assert_eq!(usage.unwrap().total_tokens, 6);
    }
}
