//! Row-aligned chunk metadata table
//!
//! CSV with headers `drug_name, drugbank_id, chunk_index, chunk_text`; row N
//! describes vector N in the index.

use std::path::Path;

use crate::error::{Error, Result};
use crate::types::chunk::ChunkRecord;

/// In-memory metadata table, keyed by row index
pub struct MetadataTable {
    records: Vec<ChunkRecord>,
}

impl MetadataTable {
    /// Load the metadata CSV from disk
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::vector_store(format!(
                "metadata file not found: {}",
                path.display()
            )));
        }

        let mut reader = csv::Reader::from_path(path)?;
        let mut records = Vec::new();
        for record in reader.deserialize() {
            let record: ChunkRecord = record?;
            records.push(record);
        }

        tracing::info!("Loaded {} chunk metadata rows", records.len());
        Ok(Self { records })
    }

    /// Build from already-parsed records (used by tests and fixtures)
    pub fn from_records(records: Vec<ChunkRecord>) -> Self {
        Self { records }
    }

    /// Look up a row, `None` when out of range
    pub fn get(&self, row: usize) -> Option<&ChunkRecord> {
        self.records.get(row)
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
