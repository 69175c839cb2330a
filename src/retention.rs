//! Retention sets
//!
//! A [`RetentionSet`] is the set of keys a sweep must preserve. It is built
//! once by the root expander, frozen into an immutable payload for the
//! node sweeps and rebuilt on each node as a hash set for O(1) membership.

use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::key::Key;

/// Keys pinned by a retain call.
///
/// Chunk keys are never admitted: chunks are pinned through their parent
/// Vec.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetentionSet {
    keys: FxHashSet<Key>,
}

impl RetentionSet {
    /// Create an empty retention set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin `key`.
    ///
    /// Returns `false` if the key was already pinned or is a chunk key.
    pub fn insert(&mut self, key: Key) -> bool {
        if key.is_chunk_key() {
            return false;
        }
        self.keys.insert(key)
    }

    /// Check if `key` is pinned.
    #[must_use]
    pub fn contains(&self, key: &Key) -> bool {
        self.keys.contains(key)
    }

    /// Number of pinned keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Check if nothing is pinned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Iterate over pinned keys in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Key> {
        self.keys.iter()
    }

    /// Freeze into the immutable array shipped to node sweeps.
    ///
    /// Keys are sorted so equal sets produce equal payloads.
    #[must_use]
    pub fn to_payload(&self) -> Arc<[Key]> {
        let mut keys: Vec<Key> = self.keys.iter().cloned().collect();
        keys.sort_unstable();
        keys.into()
    }

    /// Rebuild a membership set from a shipped payload.
    #[must_use]
    pub fn from_payload(keys: &[Key]) -> Self {
        keys.iter().cloned().collect()
    }
}

impl FromIterator<Key> for RetentionSet {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl Extend<Key> for RetentionSet {
    fn extend<I: IntoIterator<Item = Key>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_keys_are_rejected() {
        let mut set = RetentionSet::new();
        let vec_key = Key::new("v1");

        assert!(set.insert(vec_key.clone()));
        assert!(!set.insert(Key::chunk_of(&vec_key, 0)));
        assert!(!set.insert(vec_key.clone()));

        assert_eq!(set.len(), 1);
        assert!(set.contains(&vec_key));
        assert!(!set.contains(&Key::chunk_of(&vec_key, 0)));
    }

    #[test]
    fn test_payload_is_sorted_and_rebuildable() {
        let set: RetentionSet = ["b", "c", "a"].into_iter().map(Key::new).collect();
        let payload = set.to_payload();

        assert_eq!(&*payload, [Key::new("a"), Key::new("b"), Key::new("c")]);
        assert_eq!(RetentionSet::from_payload(&payload), set);
    }

    #[test]
    fn test_empty_set() {
        let set = RetentionSet::new();
        assert!(set.is_empty());
        assert!(set.to_payload().is_empty());
        assert_eq!(set.iter().count(), 0);
    }
}
