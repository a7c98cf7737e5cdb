//! Read-only vector store: flat index plus row-aligned metadata table

pub mod flat_index;
pub mod metadata;

use std::path::Path;

use crate::error::Result;
use crate::types::chunk::ChunkRecord;

pub use flat_index::FlatIndex;
pub use metadata::MetadataTable;

/// Nearest-neighbor store over precomputed chunk embeddings.
///
/// Wraps the flat index and its metadata table, both loaded once at startup
/// and immutable afterwards. Concurrent requests may share it freely.
pub struct VectorStore {
    index: FlatIndex,
    metadata: MetadataTable,
}

impl VectorStore {
    /// Open the index and metadata files, failing fast if either is missing
    /// or malformed.
    pub fn open(index_path: &Path, metadata_path: &Path) -> Result<Self> {
        tracing::info!("Loading vector index from {}", index_path.display());
        let index = FlatIndex::open(index_path)?;

        tracing::info!("Loading chunk metadata from {}", metadata_path.display());
        let metadata = MetadataTable::open(metadata_path)?;

        if index.len() != metadata.len() {
            tracing::warn!(
                "Index has {} rows but metadata table has {}; out-of-range rows will be dropped",
                index.len(),
                metadata.len()
            );
        }

        Ok(Self { index, metadata })
    }

    /// Build from already-loaded parts
    pub fn new(index: FlatIndex, metadata: MetadataTable) -> Self {
        Self { index, metadata }
    }

    /// Nearest-neighbor search, ascending distance.
    ///
    /// Rows with no metadata counterpart are silently dropped rather than
    /// surfaced as errors; index/metadata drift must not fail a query.
    pub fn search(&self, vector: &[f32], k: usize) -> Result<Vec<(usize, f32)>> {
        let hits = self.index.search(vector, k)?;
        Ok(hits
            .into_iter()
            .filter(|(row, _)| *row < self.metadata.len())
            .collect())
    }

    /// Look up the metadata row behind a search hit
    pub fn chunk(&self, row: usize) -> Option<&ChunkRecord> {
        self.metadata.get(row)
    }

    /// Embedding dimension of the index
    pub fn dimensions(&self) -> usize {
        self.index.dimensions()
    }

    /// Number of indexed vectors
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the index holds no vectors
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
