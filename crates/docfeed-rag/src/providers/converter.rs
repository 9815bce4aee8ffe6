//! Document converter trait

use async_trait::async_trait;

use crate::error::Result;

/// Trait for converting a binary document into text
///
/// Implementations:
/// - `DoclingConverter`: docling-serve compatible HTTP conversion service
#[async_trait]
pub trait DocumentConverter: Send + Sync {
    /// Convert a document to markdown/plain text
    async fn convert(&self, filename: &str, data: &[u8]) -> Result<String>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
