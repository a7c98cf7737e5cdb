//! Provider abstractions for embeddings and text generation
//!
//! Trait seams keep the pipeline testable against mock backends while the
//! production build talks to the OpenAI API.

pub mod embedding;
pub mod generation;
pub mod openai;
pub mod retry;

pub use embedding::EmbeddingProvider;
pub use generation::GenerationProvider;
pub use openai::OpenAiClient;
pub use retry::RetryPolicy;
