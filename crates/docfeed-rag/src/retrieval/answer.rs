//! Query/answer orchestrator
//!
//! Embeds the query, retrieves the best-matching chunks, and streams a
//! grounded answer. An empty result set never reaches the model: the
//! fixed fallback sentence is streamed directly.

use std::sync::Arc;

use futures_util::StreamExt;

use crate::error::Result;
use crate::generation::{PromptBuilder, FALLBACK_SENTENCE};
use crate::providers::generative::FragmentStream;
use crate::providers::{EmbeddingProvider, GenerativeProvider, VectorStoreProvider};

/// Answers queries from retrieved context
pub struct QueryAnswerer {
    embedder: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStoreProvider>,
    generative: Arc<dyn GenerativeProvider>,
    top_k: usize,
}

impl QueryAnswerer {
    /// Assemble the answerer from provider handles
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        vector_store: Arc<dyn VectorStoreProvider>,
        generative: Arc<dyn GenerativeProvider>,
        top_k: usize,
    ) -> Self {
        Self {
            embedder,
            vector_store,
            generative,
            top_k: top_k.max(1),
        }
    }

    /// Answer a query as a stream of text fragments.
    ///
    /// Fragments are forwarded in arrival order; dropping the stream
    /// stops the upstream generation pull.
    pub async fn answer(&self, query: &str) -> Result<FragmentStream> {
        tracing::info!("Query: \"{}\"", query);

        let query_embedding = self.embedder.embed(query).await?;
        let matches = self
            .vector_store
            .search(&query_embedding, self.top_k)
            .await?;

        if matches.is_empty() {
            tracing::info!("No stored chunks matched; streaming fallback sentence");
            let fallback =
                futures_util::stream::iter(vec![Ok(FALLBACK_SENTENCE.to_string())]).boxed();
            return Ok(fallback);
        }

        tracing::debug!(
            matches = matches.len(),
            best_similarity = ?matches[0].similarity,
            "Retrieved context"
        );

        let context = matches
            .iter()
            .map(|m| m.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let prompt = PromptBuilder::answering(&context, query);
        self.generative.stream(&prompt).await
    }
}
