//! Text generation provider trait

use async_trait::async_trait;

use crate::error::Result;

/// Trait for single-turn text generation.
///
/// Deterministic at temperature 0. No streaming, no multi-turn state;
/// retries happen inside the implementation.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Complete a prompt and return the trimmed response text
    async fn complete(&self, prompt: &str, model: &str, temperature: f32) -> Result<String>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
