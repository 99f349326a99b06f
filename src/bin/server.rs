//! RAG server binary
//!
//! Run with: cargo run --bin textrag-server
//! Set TEXTRAG_CONFIG to a TOML file to override the defaults.

use textrag::{config::RagConfig, server::RagServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "textrag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match std::env::var("TEXTRAG_CONFIG") {
        Ok(path) => {
            tracing::info!("Loading configuration from {}", path);
            RagConfig::load(&path)?
        }
        Err(_) => RagConfig::default(),
    };
    config.validate()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Embedding model: {}", config.llm.embed_model);
    tracing::info!("  - Embedding dimensions: {}", config.embeddings.dimensions);
    tracing::info!("  - LLM model: {}", config.llm.generate_model);
    tracing::info!("  - Chunk size: {}", config.chunking.chunk_size);
    tracing::info!("  - Storage: {}", config.index.storage_path.display());

    // Check Ollama; the pipeline degrades gracefully without it, so this is
    // advisory only.
    tracing::info!("Checking Ollama at {}...", config.llm.base_url);
    let client = reqwest::Client::new();
    match client
        .get(format!("{}/api/tags", config.llm.base_url))
        .send()
        .await
    {
        Ok(resp) if resp.status().is_success() => {
            tracing::info!("Ollama is running");
        }
        _ => {
            tracing::warn!("Ollama not available at {}", config.llm.base_url);
            tracing::warn!("Queries will be answered from retrieved text only.");
            tracing::warn!("To enable generation:");
            tracing::warn!("  1. Start: ollama serve");
            tracing::warn!(
                "  2. Pull models: ollama pull {} && ollama pull {}",
                config.llm.embed_model,
                config.llm.generate_model
            );
        }
    }

    // Create and start server
    let server = RagServer::new(config)?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  POST   /api/documents       - Ingest a document");
    println!("  POST   /api/documents/batch - Ingest multiple documents");
    println!("  POST   /api/query           - Ask a question");
    println!("  GET    /api/stats           - Counts and index info");
    println!("  DELETE /api/documents       - Clear the knowledge base");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
