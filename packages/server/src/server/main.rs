// Main entry point for the document QA server

use anyhow::{Context, Result};
use server_core::{
    kernel::ServerDeps,
    server::{build_app, AppState},
    Config,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,doc_rag=debug,server_core=debug,server=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting document QA server");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        generation_model = %config.generation.model,
        embedding_model = %config.embedding.model,
        "Configuration loaded"
    );

    let deps = ServerDeps::from_config(&config).context("Failed to build oracles")?;

    let mut state = AppState::new(deps, config.max_upload_bytes);
    if let Some(dir) = &config.artifacts_dir {
        tracing::info!(dir = %dir.display(), "Writing ingestion artifacts");
        state = state.with_artifacts_dir(dir);
    }

    // Build application
    let app = build_app(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
