//! Stored domain objects (Phase 1: frames and models)
//!
//! ## Ownership Overview
//!
//! ```text
//! Frame (1) ──< VecColumn (N) ──< Chunk (N)
//!   ^
//!   · train / valid (referenced, not owned)
//!   ·
//! Model (1) ──< ModelMetrics (N)
//!           └──< Model (N) [cross-validation children]
//! ```
//!
//! A cascading [`remove`] deletes an object and everything it owns. A
//! Frame additionally supports [`Frame::retain`], which spares Vecs that
//! are pinned by a [`RetentionSet`](crate::retention::RetentionSet).

mod frame;
mod metrics;
mod model;
mod vec;

pub use frame::Frame;
pub use metrics::{ModelMetrics, ModelMetricsBuilder};
pub use model::{Model, ModelBuilder, ModelOutput, ModelParameters};
pub use vec::{Chunk, VecColumn};

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::futures::Futures;
use crate::key::Key;
use crate::kv::KvStore;
use crate::value::Value;
use crate::Result;

/// An object addressed by its own key.
pub trait Keyed {
    /// Key this object is stored under.
    fn key(&self) -> &Key;

    /// Keys owned by this object, deleted along with it by a cascading remove.
    fn owned_keys(&self) -> Vec<Key> {
        Vec::new()
    }
}

type RemoveFuture = Pin<Box<dyn Future<Output = Result<()>> + Send>>;

/// Remove `key` from `store`, registering the deletion with `futures`.
///
/// With `cascade`, everything the removed value owns is removed too,
/// transitively. The registered future completes only once the whole
/// owned subtree is gone. Removing an absent key is a no-op.
pub fn remove<S>(store: Arc<S>, key: Key, futures: &mut Futures, cascade: bool)
where
    S: KvStore + 'static,
{
    futures.add(remove_tree(store, key, cascade));
}

/// Remove everything `value` owns, transitively, registering the deletions
/// with `futures`. The key `value` was stored under is left to the caller.
pub fn remove_owned<S>(store: &Arc<S>, value: &Value, futures: &mut Futures)
where
    S: KvStore + 'static,
{
    for child in value.owned_keys() {
        futures.add(remove_tree(Arc::clone(store), child, true));
    }
}

fn remove_tree<S>(store: Arc<S>, key: Key, cascade: bool) -> RemoveFuture
where
    S: KvStore + 'static,
{
    Box::pin(async move {
        let Some(value) = store.remove(&key).await? else {
            return Ok(());
        };
        if !cascade {
            return Ok(());
        }

        let mut children = Futures::new();
        remove_owned(&store, &value, &mut children);
        children.block_for_pending().await
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryKvStore;
    use crate::value::Value;

    async fn store_with_vec(store: &MemoryKvStore, name: &str, chunks: u32) -> VecColumn {
        let vec = VecColumn::new(name, chunks);
        for chunk in vec.chunk_keys() {
            store
                .put(chunk.clone(), Chunk::new(chunk.clone(), vec![0.0; 4]).into())
                .await
                .unwrap();
        }
        store.put(vec.key().clone(), vec.clone().into()).await.unwrap();
        vec
    }

    #[tokio::test]
    async fn test_cascading_remove_reaches_chunks() {
        let store = Arc::new(MemoryKvStore::new());
        let v1 = store_with_vec(&store, "v1", 3).await;
        let frame = Frame::new("f1", vec![v1.key().clone()]);
        store.put(Key::new("f1"), frame.into()).await.unwrap();
        assert_eq!(store.len(), 5);

        let mut futures = Futures::new();
        remove(Arc::clone(&store), Key::new("f1"), &mut futures, true);
        futures.block_for_pending().await.unwrap();

        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_non_cascading_remove_keeps_children() {
        let store = Arc::new(MemoryKvStore::new());
        let v1 = store_with_vec(&store, "v1", 2).await;
        store
            .put(Key::new("f1"), Frame::new("f1", vec![v1.key().clone()]).into())
            .await
            .unwrap();

        let mut futures = Futures::new();
        remove(Arc::clone(&store), Key::new("f1"), &mut futures, false);
        futures.block_for_pending().await.unwrap();

        assert!(!store.contains(&Key::new("f1")).await.unwrap());
        assert!(store.contains(&Key::new("v1")).await.unwrap());
        assert_eq!(store.len(), 3);
    }

    #[tokio::test]
    async fn test_model_remove_spares_training_frame() {
        let store = Arc::new(MemoryKvStore::new());
        store
            .put(Key::new("train"), Frame::new("train", vec![]).into())
            .await
            .unwrap();
        store
            .put(
                Key::new("mm1"),
                ModelMetrics::new("mm1", "m1").into(),
            )
            .await
            .unwrap();
        let model = Model::builder("m1", "glm")
            .train("train")
            .metric("mm1")
            .build();
        store.put(Key::new("m1"), model.into()).await.unwrap();

        let mut futures = Futures::new();
        remove(Arc::clone(&store), Key::new("m1"), &mut futures, true);
        futures.block_for_pending().await.unwrap();

        assert!(!store.contains(&Key::new("m1")).await.unwrap());
        assert!(!store.contains(&Key::new("mm1")).await.unwrap());
        assert!(matches!(
            store.get(&Key::new("train")).await.unwrap(),
            Some(Value::Frame(_))
        ));
    }

    #[tokio::test]
    async fn test_remove_missing_key_is_noop() {
        let store = Arc::new(MemoryKvStore::new());
        let mut futures = Futures::new();
        remove(Arc::clone(&store), Key::new("ghost"), &mut futures, true);
        futures.block_for_pending().await.unwrap();
        assert!(store.is_empty());
    }
}
