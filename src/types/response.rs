//! Pipeline output and API response types

use serde::{Deserialize, Serialize};

use crate::types::chunk::RetrievedChunk;

/// Answer to one sub-question, with the passages it was grounded in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubQueryAnswer {
    /// The sub-question produced by decomposition
    pub sub_query: String,
    /// The generated (or sentinel) answer
    pub answer: String,
    /// Retrieved passages, nearest first
    pub chunks: Vec<RetrievedChunk>,
}

/// Full pipeline output: the fused answer plus the per-subquery trace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    /// The final fused answer
    pub final_answer: String,
    /// One entry per sub-question, in decomposition order
    pub trace: Vec<SubQueryAnswer>,
}

/// API response for `POST /query`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    /// The original user query, echoed back
    pub query: String,
    /// The final fused answer
    pub final_answer: String,
}
