//! Request, response, and chunk types

pub mod chunk;
pub mod query;
pub mod response;

pub use chunk::{ChunkRecord, RetrievedChunk};
pub use query::QueryRequest;
pub use response::{PipelineResult, QueryResponse, SubQueryAnswer};
