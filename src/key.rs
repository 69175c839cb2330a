//! Cluster-wide keys
//!
//! A [`Key`] is an opaque identifier that carries just enough metadata to
//! tell a chunk sub-object key apart from a user-visible key without
//! touching the store.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque, globally unique key for a stored value.
///
/// Two keys are equal when both the name and the chunk index match. Chunk
/// keys share their parent Vec's name and carry the chunk index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Key {
    name: String,
    chunk: Option<u32>,
}

impl Key {
    /// Create a user-visible key.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            chunk: None,
        }
    }

    /// Create the key of chunk `index` of the Vec addressed by `vec_key`.
    #[must_use]
    pub fn chunk_of(vec_key: &Self, index: u32) -> Self {
        Self {
            name: vec_key.name.clone(),
            chunk: Some(index),
        }
    }

    /// Get the key name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Chunk index, if this is a chunk key.
    #[must_use]
    pub const fn chunk_index(&self) -> Option<u32> {
        self.chunk
    }

    /// Check if this key addresses a chunk sub-object.
    #[must_use]
    pub const fn is_chunk_key(&self) -> bool {
        self.chunk.is_some()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.chunk {
            Some(index) => write!(f, "{}#chunk{index}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_key_is_not_chunk() {
        let key = Key::new("frame.hex");
        assert!(!key.is_chunk_key());
        assert_eq!(key.chunk_index(), None);
        assert_eq!(key.to_string(), "frame.hex");
    }

    #[test]
    fn test_chunk_key_differs_from_parent() {
        let vec_key = Key::new("vec-1");
        let chunk = Key::chunk_of(&vec_key, 3);

        assert!(chunk.is_chunk_key());
        assert_eq!(chunk.name(), "vec-1");
        assert_eq!(chunk.chunk_index(), Some(3));
        assert_ne!(chunk, vec_key);
        assert_ne!(chunk, Key::chunk_of(&vec_key, 4));
        assert_eq!(chunk.to_string(), "vec-1#chunk3");
    }

    #[test]
    fn test_key_serde_preserves_chunk_flag() {
        let chunk = Key::chunk_of(&Key::new("v"), 0);
        let json = serde_json::to_string(&chunk).unwrap();
        let back: Key = serde_json::from_str(&json).unwrap();
        assert_eq!(back, chunk);
        assert!(back.is_chunk_key());
    }
}
