//! Application state for the RAG server
//!
//! Provider clients are constructed once at startup and injected into
//! request handlers through this state; there is no global client.

use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::Result;
use crate::ingestion::IngestPipeline;
use crate::providers::{
    DoclingConverter, DocumentConverter, EmbeddingProvider, GeminiClient, GenerativeProvider,
    MistralEmbedder, SupabaseStore, VectorStoreProvider,
};
use crate::retrieval::QueryAnswerer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: RagConfig,
    pipeline: IngestPipeline,
    answerer: QueryAnswerer,
}

impl AppState {
    /// Create application state with the production providers
    pub fn new(config: RagConfig) -> Result<Self> {
        tracing::info!("Initializing application state");

        let converter: Arc<dyn DocumentConverter> =
            Arc::new(DoclingConverter::new(&config.converter)?);
        let generative: Arc<dyn GenerativeProvider> =
            Arc::new(GeminiClient::new(&config.generation)?);
        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(MistralEmbedder::new(&config.embedding)?);
        let vector_store: Arc<dyn VectorStoreProvider> =
            Arc::new(SupabaseStore::new(&config.vector_store)?);

        Self::with_providers(config, converter, generative, embedder, vector_store)
    }

    /// Create application state with explicit provider handles
    pub fn with_providers(
        config: RagConfig,
        converter: Arc<dyn DocumentConverter>,
        generative: Arc<dyn GenerativeProvider>,
        embedder: Arc<dyn EmbeddingProvider>,
        vector_store: Arc<dyn VectorStoreProvider>,
    ) -> Result<Self> {
        let pipeline = IngestPipeline::new(
            converter,
            generative.clone(),
            embedder.clone(),
            vector_store.clone(),
        );
        let answerer = QueryAnswerer::new(
            embedder,
            vector_store,
            generative,
            config.retrieval.top_k,
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pipeline,
                answerer,
            }),
        })
    }

    /// Get configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Get the ingestion pipeline
    pub fn pipeline(&self) -> &IngestPipeline {
        &self.inner.pipeline
    }

    /// Get the query answerer
    pub fn answerer(&self) -> &QueryAnswerer {
        &self.inner.answerer
    }
}
