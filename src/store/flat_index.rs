//! Flat (exact) nearest-neighbor index over precomputed embeddings
//!
//! On-disk layout, little-endian:
//! `"DVEC" | u32 dimension | u32 row count | rows * dimension * f32`.
//! The file is produced by the offline index build, which is out of scope
//! here; this module only reads it.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

const MAGIC: &[u8; 4] = b"DVEC";
const HEADER_LEN: usize = 12;

/// Exact L2 nearest-neighbor index, fully resident in memory.
///
/// Search is a linear scan with squared Euclidean distances. At the corpus
/// sizes this service runs against (tens of thousands of chunks) a scan is
/// faster than maintaining an approximate structure, and it returns exact
/// results.
#[derive(Debug)]
pub struct FlatIndex {
    dimensions: usize,
    /// Row-major vector data, `len * dimensions` values
    data: Vec<f32>,
}

impl FlatIndex {
    /// Load an index file from disk
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::vector_store(format!(
                "index file not found: {}",
                path.display()
            )));
        }
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Parse the on-disk representation
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(Error::vector_store("index file truncated before header"));
        }
        if &bytes[0..4] != MAGIC {
            return Err(Error::vector_store("index file has wrong magic bytes"));
        }

        let dimensions = u32::from_le_bytes(bytes[4..8].try_into().unwrap()) as usize;
        let rows = u32::from_le_bytes(bytes[8..12].try_into().unwrap()) as usize;

        if dimensions == 0 {
            return Err(Error::vector_store("index dimension must be non-zero"));
        }

        let expected = HEADER_LEN + rows * dimensions * 4;
        if bytes.len() != expected {
            return Err(Error::vector_store(format!(
                "index file length {} does not match header ({} rows x {} dims)",
                bytes.len(),
                rows,
                dimensions
            )));
        }

        let mut data = Vec::with_capacity(rows * dimensions);
        for chunk in bytes[HEADER_LEN..].chunks_exact(4) {
            data.push(f32::from_le_bytes(chunk.try_into().unwrap()));
        }

        Ok(Self { dimensions, data })
    }

    /// Build an in-memory index from vectors (used by tests and fixtures)
    pub fn from_vectors(vectors: &[Vec<f32>]) -> Result<Self> {
        let dimensions = vectors
            .first()
            .map(|v| v.len())
            .ok_or_else(|| Error::vector_store("cannot build an index from zero vectors"))?;

        let mut data = Vec::with_capacity(vectors.len() * dimensions);
        for vector in vectors {
            if vector.len() != dimensions {
                return Err(Error::vector_store(format!(
                    "vector has {} dims, index expects {}",
                    vector.len(),
                    dimensions
                )));
            }
            data.extend_from_slice(vector);
        }

        Ok(Self { dimensions, data })
    }

    /// Serialize to the on-disk representation
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(HEADER_LEN + self.data.len() * 4);
        bytes.extend_from_slice(MAGIC);
        bytes.extend_from_slice(&(self.dimensions as u32).to_le_bytes());
        bytes.extend_from_slice(&(self.len() as u32).to_le_bytes());
        for value in &self.data {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        bytes
    }

    /// Search for the `k` nearest rows, ascending squared L2 distance
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>> {
        if query.len() != self.dimensions {
            return Err(Error::vector_store(format!(
                "query vector has {} dims, index expects {}",
                query.len(),
                self.dimensions
            )));
        }

        let mut hits: Vec<(usize, f32)> = self
            .data
            .chunks_exact(self.dimensions)
            .enumerate()
            .map(|(row, vector)| {
                let distance = vector
                    .iter()
                    .zip(query)
                    .map(|(a, b)| {
                        let d = a - b;
                        d * d
                    })
                    .sum();
                (row, distance)
            })
            .collect();

        hits.sort_unstable_by(|a, b| a.1.total_cmp(&b.1));
        hits.truncate(k);
        Ok(hits)
    }

    /// Embedding dimension
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Number of indexed vectors
    pub fn len(&self) -> usize {
        self.data.len() / self.dimensions
    }

    /// Whether the index holds no vectors
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_roundtrip_through_file() {
        let index = FlatIndex::from_vectors(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&index.to_bytes()).unwrap();
        file.flush().unwrap();

        let loaded = FlatIndex::open(file.path()).unwrap();
        assert_eq!(loaded.dimensions(), 3);
        assert_eq!(loaded.len(), 2);

        let hits = loaded.search(&[4.0, 5.0, 6.0], 1).unwrap();
        assert_eq!(hits[0].0, 1);
        assert_eq!(hits[0].1, 0.0);
    }

    #[test]
    fn test_rejects_bad_files() {
        assert!(FlatIndex::from_bytes(b"DV").is_err());
        assert!(FlatIndex::from_bytes(b"NOPE\x02\x00\x00\x00\x00\x00\x00\x00").is_err());

        // Header says 1 row x 2 dims but no data follows
        let mut truncated = Vec::new();
        truncated.extend_from_slice(b"DVEC");
        truncated.extend_from_slice(&2u32.to_le_bytes());
        truncated.extend_from_slice(&1u32.to_le_bytes());
        assert!(FlatIndex::from_bytes(&truncated).is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = FlatIndex::open(Path::new("/nonexistent/index.dvec")).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_k_larger_than_row_count() {
        let index = FlatIndex::from_vectors(&[vec![0.0], vec![1.0]]).unwrap();
        let hits = index.search(&[0.4], 10).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].0, 0);
    }

    #[test]
    fn test_dimension_mismatch() {
        let index = FlatIndex::from_vectors(&[vec![0.0, 1.0]]).unwrap();
        assert!(index.search(&[0.0], 1).is_err());
    }
}
