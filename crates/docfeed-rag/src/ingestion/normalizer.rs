//! Markup normalization ahead of embedding
//!
//! Converted documents arrive as markdown; markdown syntax is noise to
//! an embeddings model. One generative call strips the markup while
//! keeping every piece of textual content, URLs and code included.

use std::sync::Arc;

use crate::error::Result;
use crate::generation::PromptBuilder;
use crate::providers::GenerativeProvider;

/// Strips markup noise from converted text via the generative model
pub struct TextNormalizer {
    generative: Arc<dyn GenerativeProvider>,
}

impl TextNormalizer {
    /// Create a normalizer over the given generative provider
    pub fn new(generative: Arc<dyn GenerativeProvider>) -> Self {
        Self { generative }
    }

    /// Normalize converted document text to plain text
    pub async fn normalize(&self, text: &str) -> Result<String> {
        let prompt = PromptBuilder::normalization(text);
        let plain = self.generative.invoke(&prompt).await?;
        tracing::debug!(
            input_len = text.len(),
            output_len = plain.len(),
            "Normalized document text"
        );
        Ok(plain)
    }
}
