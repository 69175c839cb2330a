//! Vec columns and their chunks

use serde::{Deserialize, Serialize};

use super::Keyed;
use crate::key::Key;

/// A logical column, backed by chunk sub-objects.
///
/// Chunk keys are derived from the Vec key, so they never need to be
/// looked up to be recognized as chunks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VecColumn {
    key: Key,
    chunks: Vec<Key>,
}

impl VecColumn {
    /// Create a Vec with `num_chunks` chunk keys.
    #[must_use]
    pub fn new(key: impl Into<Key>, num_chunks: u32) -> Self {
        let key = key.into();
        let chunks = (0..num_chunks).map(|i| Key::chunk_of(&key, i)).collect();
        Self { key, chunks }
    }

    /// Chunk keys in chunk order.
    #[must_use]
    pub fn chunk_keys(&self) -> &[Key] {
        &self.chunks
    }

    /// Number of chunks.
    #[must_use]
    pub fn num_chunks(&self) -> usize {
        self.chunks.len()
    }
}

impl Keyed for VecColumn {
    fn key(&self) -> &Key {
        &self.key
    }

    fn owned_keys(&self) -> Vec<Key> {
        self.chunks.clone()
    }
}

/// A block of column data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    key: Key,
    values: Vec<f64>,
}

impl Chunk {
    /// Create a chunk holding `values`.
    #[must_use]
    pub fn new(key: Key, values: Vec<f64>) -> Self {
        Self { key, values }
    }

    /// Chunk payload.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

impl Keyed for Chunk {
    fn key(&self) -> &Key {
        &self.key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_chunk_keys_are_chunks() {
        let vec = VecColumn::new("v", 3);
        assert_eq!(vec.num_chunks(), 3);
        assert!(vec.chunk_keys().iter().all(Key::is_chunk_key));
        assert!(!vec.key().is_chunk_key());
        assert_eq!(vec.owned_keys().len(), 3);
    }

    #[test]
    fn test_chunk_owns_nothing() {
        let chunk = Chunk::new(Key::chunk_of(&Key::new("v"), 0), vec![1.0, 2.0]);
        assert!(chunk.owned_keys().is_empty());
        assert_eq!(chunk.values(), [1.0, 2.0]);
    }
}
