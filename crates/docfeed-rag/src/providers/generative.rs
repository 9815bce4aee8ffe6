//! Generative model trait

use async_trait::async_trait;
use futures_util::stream::BoxStream;

use crate::error::Result;
use crate::generation::Prompt;

/// A stream of answer fragments in production order
pub type FragmentStream = BoxStream<'static, Result<String>>;

/// Trait for the generative model behind normalization, chunking, and
/// answering
///
/// Implementations:
/// - `GeminiClient`: Google Generative Language API
#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    /// Run one blocking generation and return the full text
    async fn invoke(&self, prompt: &Prompt) -> Result<String>;

    /// Run one streaming generation, yielding fragments as they arrive
    async fn stream(&self, prompt: &Prompt) -> Result<FragmentStream>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
