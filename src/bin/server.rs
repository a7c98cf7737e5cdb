//! Drug RAG server binary
//!
//! Run with: cargo run --bin drug-rag-server

use drug_rag::{config::RagConfig, server::RagServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "drug_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Missing credentials or index files are fatal here, never at request time
    let config = RagConfig::from_env()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Embedding model: {}", config.openai.embedding_model);
    tracing::info!("  - Decompose model: {}", config.openai.decompose_model);
    tracing::info!("  - Answer model: {}", config.openai.answer_model);
    tracing::info!("  - Index file: {}", config.store.index_path.display());
    tracing::info!("  - Metadata file: {}", config.store.metadata_path.display());

    let server = RagServer::new(config)?;

    tracing::info!("Endpoints:");
    tracing::info!("  POST /query   - Ask a drug-information question");
    tracing::info!("  GET  /healthz - Health check");
    tracing::info!("  GET  /readyz  - Readiness check");

    server.start().await?;

    Ok(())
}
