use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use doc_rag::{AICredentials, AgentConfig};
use dotenvy::dotenv;

/// Default OpenAI-compatible endpoint (Hugging Face inference router)
pub const DEFAULT_BASE_URL: &str = "https://router.huggingface.co/v1";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub generation: AICredentials,
    pub embedding: AICredentials,
    pub request_timeout: Duration,
    pub max_retries: u32,
    pub max_upload_bytes: usize,
    pub retrieval_top_k: usize,
    pub rerank_top_k: usize,
    /// When set, every upload writes its ingestion artifacts here
    pub artifacts_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let generation = AICredentials::from_env(
            &["GENERATION_API_KEY", "HF_TOKEN"],
            "GENERATION_MODEL",
            "GENERATION_BASE_URL",
        )
        .context("generation credentials must be set (GENERATION_API_KEY or HF_TOKEN, GENERATION_MODEL)")?;
        let generation = with_default_base_url(generation, DEFAULT_BASE_URL);

        let embedding = AICredentials::from_env(
            &["EMBEDDING_API_KEY", "GENERATION_API_KEY", "HF_TOKEN"],
            "EMBEDDING_MODEL",
            "EMBEDDING_BASE_URL",
        )
        .context("embedding credentials must be set (EMBEDDING_MODEL and an API key)")?;
        let embedding = match &generation.base_url {
            Some(url) => with_default_base_url(embedding, url),
            None => embedding,
        };

        let defaults = AgentConfig::default();

        Ok(Self {
            port: parse_var("PORT", 7860)?,
            generation,
            embedding,
            request_timeout: Duration::from_secs(parse_var("REQUEST_TIMEOUT_SECS", 180)?),
            max_retries: parse_var("MAX_RETRIES", 3)?,
            max_upload_bytes: parse_var("MAX_UPLOAD_BYTES", 20 * 1024 * 1024)?,
            retrieval_top_k: parse_var("RETRIEVAL_TOP_K", defaults.retrieval_top_k)?,
            rerank_top_k: parse_var("RERANK_TOP_K", defaults.rerank_top_k)?,
            artifacts_dir: env::var("ARTIFACTS_DIR")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        })
    }

    /// Query pipeline settings derived from this config
    pub fn agent_config(&self) -> AgentConfig {
        AgentConfig::default()
            .with_retrieval_top_k(self.retrieval_top_k)
            .with_rerank_top_k(self.rerank_top_k)
    }
}

fn with_default_base_url(credentials: AICredentials, url: &str) -> AICredentials {
    if credentials.base_url.is_some() {
        credentials
    } else {
        credentials.with_base_url(url)
    }
}

/// Parse an optional variable, falling back to `default` when unset
fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid number", name)),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_var_default_and_override() {
        assert_eq!(parse_var::<u16>("SERVER_TEST_UNSET_PORT", 7860).unwrap(), 7860);

        env::set_var("SERVER_TEST_SET_PORT", " 8080 ");
        assert_eq!(parse_var::<u16>("SERVER_TEST_SET_PORT", 7860).unwrap(), 8080);

        env::set_var("SERVER_TEST_BAD_PORT", "eighty");
        assert!(parse_var::<u16>("SERVER_TEST_BAD_PORT", 7860).is_err());
    }

    #[test]
    fn test_default_base_url_only_fills_gaps() {
        let creds = with_default_base_url(AICredentials::new("k", "m"), DEFAULT_BASE_URL);
        assert_eq!(creds.base_url.as_deref(), Some(DEFAULT_BASE_URL));

        let creds = with_default_base_url(
            AICredentials::new("k", "m").with_base_url("http://localhost:8000/v1"),
            DEFAULT_BASE_URL,
        );
        assert_eq!(creds.base_url.as_deref(), Some("http://localhost:8000/v1"));
    }
}
