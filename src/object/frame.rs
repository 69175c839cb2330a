//! Frame - tabular dataset made of Vec columns

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{remove, Keyed};
use crate::futures::Futures;
use crate::key::Key;
use crate::kv::KvStore;
use crate::retention::RetentionSet;

/// Frame represents a tabular dataset.
///
/// Columns are stored as separate Vecs; the frame only holds their keys
/// in column order. Vecs may be shared between frames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    key: Key,
    vecs: Vec<Key>,
}

impl Frame {
    /// Create a frame over `vecs`, in column order.
    #[must_use]
    pub fn new(key: impl Into<Key>, vecs: Vec<Key>) -> Self {
        Self {
            key: key.into(),
            vecs,
        }
    }

    /// Vec keys in column order.
    #[must_use]
    pub fn keys(&self) -> &[Key] {
        &self.vecs
    }

    /// Delete this frame and every Vec it owns that `retained` does not pin.
    ///
    /// Deletions are registered with `futures`; pinned Vecs are left in place
    /// so frames sharing them keep working. Returns the number of Vecs
    /// scheduled for deletion.
    pub fn retain<S>(&self, store: &Arc<S>, futures: &mut Futures, retained: &RetentionSet) -> usize
    where
        S: KvStore + 'static,
    {
        let mut scheduled = 0;
        for vec in &self.vecs {
            if retained.contains(vec) {
                continue;
            }
            remove(Arc::clone(store), vec.clone(), futures, true);
            scheduled += 1;
        }
        remove(Arc::clone(store), self.key.clone(), futures, false);
        scheduled
    }
}

impl Keyed for Frame {
    fn key(&self) -> &Key {
        &self.key
    }

    fn owned_keys(&self) -> Vec<Key> {
        self.vecs.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryKvStore;
    use crate::object::VecColumn;

    #[test]
    fn test_frame_keys_keep_column_order() {
        let frame = Frame::new("f", vec![Key::new("b"), Key::new("a")]);
        assert_eq!(frame.keys(), [Key::new("b"), Key::new("a")]);
        assert_eq!(frame.owned_keys(), vec![Key::new("b"), Key::new("a")]);
    }

    #[tokio::test]
    async fn test_frame_retain_spares_pinned_vec() {
        let store = Arc::new(MemoryKvStore::new());
        for name in ["shared", "only"] {
            let vec = VecColumn::new(name, 0);
            store.put(vec.key().clone(), vec.into()).await.unwrap();
        }
        let frame = Frame::new("f2", vec![Key::new("shared"), Key::new("only")]);
        store.put(Key::new("f2"), frame.clone().into()).await.unwrap();

        let retained: RetentionSet = [Key::new("f1"), Key::new("shared")].into_iter().collect();
        let mut futures = Futures::new();
        let scheduled = frame.retain(&store, &mut futures, &retained);
        futures.block_for_pending().await.unwrap();

        assert_eq!(scheduled, 1);
        assert!(store.contains(&Key::new("shared")).await.unwrap());
        assert!(!store.contains(&Key::new("only")).await.unwrap());
        assert!(!store.contains(&Key::new("f2")).await.unwrap());
    }
}
