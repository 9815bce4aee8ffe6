//! LLM-driven semantic chunking
//!
//! Retrieval happens at chunk granularity, so chunk boundaries must
//! respect sentence and section units. The model emits all chunks as one
//! string under a strict delimiter contract, parsed here.

use std::collections::HashSet;
use std::sync::Arc;

use sha2::{Digest, Sha256};
use unicode_segmentation::UnicodeSegmentation;

use crate::error::Result;
use crate::generation::PromptBuilder;
use crate::providers::GenerativeProvider;

/// Delimiter terminating every chunk except the last in the model output
pub const CHUNK_DELIMITER: &str = "]*,";

/// Splits normalized text into ≈100-word chunks via one generative call
pub struct SemanticChunker {
    generative: Arc<dyn GenerativeProvider>,
}

impl SemanticChunker {
    /// Create a chunker over the given generative provider
    pub fn new(generative: Arc<dyn GenerativeProvider>) -> Self {
        Self { generative }
    }

    /// Chunk normalized text. Returns chunks in document order.
    pub async fn chunk(&self, text: &str) -> Result<Vec<String>> {
        let prompt = PromptBuilder::chunking(text);
        let generated = self.generative.invoke(&prompt).await?;

        let chunks = split_chunks(&generated);

        if tracing::enabled!(tracing::Level::DEBUG) {
            for (i, chunk) in chunks.iter().enumerate() {
                tracing::debug!(
                    chunk = i,
                    words = chunk.unicode_words().count(),
                    "Parsed chunk"
                );
            }
        }
        tracing::info!("Chunked text into {} chunks", chunks.len());

        Ok(chunks)
    }
}

/// Parse the model output into chunks.
///
/// Splits on the exact delimiter, keeping each segment byte-for-byte as
/// emitted. Whitespace-only segments are discarded. Duplicate segments
/// are dropped by content hash, first occurrence wins; the model is
/// instructed not to repeat chunks but that is not trusted. An output
/// with zero delimiters is a single chunk.
pub fn split_chunks(generated: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut chunks = Vec::new();

    for segment in generated.split(CHUNK_DELIMITER) {
        if segment.trim().is_empty() {
            continue;
        }

        let digest = hex::encode(Sha256::digest(segment.as_bytes()));
        if seen.insert(digest) {
            chunks.push(segment.to_string());
        } else {
            tracing::warn!("Dropping duplicate chunk emitted by the model");
        }
    }

    chunks
}
