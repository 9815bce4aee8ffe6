//! Vector store trait

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::Result;

/// One row returned by a similarity search, best match first
#[derive(Debug, Clone, Deserialize)]
pub struct MatchedChunk {
    /// The stored chunk text
    pub text: String,
    /// Similarity score reported by the store, when available
    #[serde(default, alias = "distance")]
    pub similarity: Option<f32>,
}

/// Trait for persisting chunks and answering nearest-neighbor queries
///
/// Implementations:
/// - `SupabaseStore`: Supabase/PostgREST table + server-side match function
#[async_trait]
pub trait VectorStoreProvider: Send + Sync {
    /// Insert one chunk with its embedding as a new row
    async fn insert(&self, text: &str, embedding: &[f32]) -> Result<()>;

    /// Search for the chunks nearest to the query embedding
    async fn search(&self, query_embedding: &[f32], count: usize) -> Result<Vec<MatchedChunk>>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
