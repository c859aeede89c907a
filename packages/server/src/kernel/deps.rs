//! Server dependencies (using traits for testability)
//!
//! Both oracles sit behind `Arc<dyn ...>` so tests can swap the
//! OpenAI-backed implementations for the mocks in `doc_rag::testing`.

use std::sync::Arc;

use anyhow::{Context, Result};
use doc_rag::{Embedder, Generator, OpenAIEmbedder, OpenAIGenerator, Supervisor};
use openai_client::{OpenAIClient, RetryPolicy};

use crate::config::Config;
use crate::kernel::{BaseElementExtractor, PdfElementExtractor};

/// Supervisor wired with type-erased oracles.
pub type AppSupervisor = Supervisor<Arc<dyn Generator>, Arc<dyn Embedder>>;

/// Dependencies shared by every request handler
#[derive(Clone)]
pub struct ServerDeps {
    pub supervisor: Arc<AppSupervisor>,
    pub extractor: Arc<dyn BaseElementExtractor>,
}

impl ServerDeps {
    pub fn new(supervisor: AppSupervisor, extractor: Arc<dyn BaseElementExtractor>) -> Self {
        Self {
            supervisor: Arc::new(supervisor),
            extractor,
        }
    }

    /// Production wiring: OpenAI-compatible oracles and the PDF extractor.
    pub fn from_config(config: &Config) -> Result<Self> {
        let retry = RetryPolicy::default().with_max_attempts(config.max_retries);

        let generation_client = client_for(
            config.generation.api_key.expose(),
            config.generation.base_url.as_deref(),
            config,
            retry.clone(),
        )
        .context("failed to build generation client")?;
        let embedding_client = client_for(
            config.embedding.api_key.expose(),
            config.embedding.base_url.as_deref(),
            config,
            retry,
        )
        .context("failed to build embedding client")?;

        let generator: Arc<dyn Generator> = Arc::new(OpenAIGenerator::new(
            generation_client,
            &config.generation.model,
        ));
        let embedder: Arc<dyn Embedder> = Arc::new(OpenAIEmbedder::new(
            embedding_client,
            &config.embedding.model,
        ));

        let supervisor = Supervisor::new(generator, embedder).with_config(config.agent_config());

        Ok(Self::new(supervisor, Arc::new(PdfElementExtractor::new())))
    }
}

fn client_for(
    api_key: &str,
    base_url: Option<&str>,
    config: &Config,
    retry: RetryPolicy,
) -> Result<OpenAIClient> {
    let mut client = OpenAIClient::new(api_key).with_retry_policy(retry);
    if let Some(url) = base_url {
        client = client.with_base_url(url);
    }
    Ok(client.with_timeout(config.request_timeout)?)
}
