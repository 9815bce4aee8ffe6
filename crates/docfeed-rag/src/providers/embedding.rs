//! Embedding provider trait

use async_trait::async_trait;

use crate::error::Result;

/// Trait for generating text embeddings
///
/// Implementations:
/// - `MistralEmbedder`: Mistral embeddings API (mistral-embed, 1024 dims)
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding for a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Get embedding dimensionality
    fn dimensions(&self) -> usize;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
