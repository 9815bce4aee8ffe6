//! RAG server binary
//!
//! Run with: cargo run -p docfeed-rag --bin docfeed-rag-server

use docfeed_rag::{config::RagConfig, server::RagServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docfeed_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load .env if present, then build configuration from the environment
    dotenvy::dotenv().ok();
    let config = RagConfig::from_env()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Embedding model: {}", config.embedding.model);
    tracing::info!("  - Embedding dimensions: {}", config.embedding.dimensions);
    tracing::info!("  - Generation model: {}", config.generation.model);
    tracing::info!("  - Converter service: {}", config.converter.url);
    tracing::info!("  - Retrieval top-k: {}", config.retrieval.top_k);

    let server = RagServer::new(config)?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  POST /upload_documents - Upload a document");
    println!("  POST /query            - Ask a question (streamed answer)");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
