//! Query request types

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Query request for the RAG pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The user's question
    pub query: String,

    /// Number of chunks to retrieve per sub-question (default: 3)
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Maximum number of sub-questions to decompose into (default: 5)
    #[serde(default = "default_max_subqueries")]
    pub max_subqueries: usize,
}

fn default_top_k() -> usize {
    3
}

fn default_max_subqueries() -> usize {
    5
}

impl Default for QueryRequest {
    fn default() -> Self {
        Self {
            query: String::new(),
            top_k: 3,
            max_subqueries: 5,
        }
    }
}

impl QueryRequest {
    /// Create a new query with default parameters
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Set the number of chunks retrieved per sub-question
    pub fn with_top_k(mut self, k: usize) -> Self {
        self.top_k = k;
        self
    }

    /// Set the maximum number of sub-questions
    pub fn with_max_subqueries(mut self, n: usize) -> Self {
        self.max_subqueries = n;
        self
    }

    /// Validate the request before pipeline invocation.
    ///
    /// Rejected requests never reach the pipeline.
    pub fn validate(&self) -> Result<()> {
        if self.query.trim().is_empty() {
            return Err(Error::invalid_request("`query` must be a non-empty string"));
        }
        if self.top_k < 1 {
            return Err(Error::invalid_request("`top_k` must be at least 1"));
        }
        if self.max_subqueries < 1 {
            return Err(Error::invalid_request("`max_subqueries` must be at least 1"));
        }
        Ok(())
    }
}
