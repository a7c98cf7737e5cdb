//! Embedding provider trait

use async_trait::async_trait;

use crate::error::Result;

/// Trait for converting text into a fixed-dimension vector.
///
/// Implementations retry transient failures internally; an error from `embed`
/// means the retry budget is exhausted and the caller must treat embeddings
/// as unavailable.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding for a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
