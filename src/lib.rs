//! drug-rag: retrieval-augmented question answering for drug information
//!
//! This crate serves grounded answers to natural-language drug questions.
//! A user query is decomposed into independent sub-questions, each sub-question
//! is answered from passages retrieved out of a precomputed vector index, and
//! the per-subquery answers are fused into one final answer. The index and its
//! row-aligned metadata table are loaded once at startup and are read-only for
//! the lifetime of the process.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod providers;
pub mod server;
pub mod store;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use pipeline::Pipeline;
pub use store::VectorStore;
pub use types::{
    chunk::{ChunkRecord, RetrievedChunk},
    query::QueryRequest,
    response::{PipelineResult, QueryResponse, SubQueryAnswer},
};
