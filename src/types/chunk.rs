//! Stored and retrieved passage types

use serde::{Deserialize, Serialize};

/// One row of the chunk metadata table, aligned with the vector index.
///
/// Created at index-build time (out of scope here) and read-only at query
/// time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// Human-readable drug name
    pub drug_name: String,
    /// DrugBank identifier (e.g. "DB01050")
    pub drugbank_id: String,
    /// Position of this chunk within the drug's source text
    pub chunk_index: u32,
    /// The passage text
    pub chunk_text: String,
}

/// A chunk plus its distance from a specific query vector.
///
/// Ephemeral; built per retrieval call and discarded after prompt
/// construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub drug_name: String,
    pub drugbank_id: String,
    pub chunk_index: u32,
    pub text: String,
    /// Squared Euclidean distance; smaller is closer
    pub distance: f32,
}

impl RetrievedChunk {
    /// Project a metadata row into a retrieval result
    pub fn from_record(record: &ChunkRecord, distance: f32) -> Self {
        Self {
            drug_name: record.drug_name.clone(),
            drugbank_id: record.drugbank_id.clone(),
            chunk_index: record.chunk_index,
            text: record.chunk_text.clone(),
            distance,
        }
    }
}
