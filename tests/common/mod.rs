//! Shared fixtures for integration tests

#![allow(dead_code)]

use trueno_dkv::cluster::{LocalCluster, NodeId};
use trueno_dkv::{Chunk, Frame, Key, Keyed, Model, ModelMetrics, Value, VecColumn};

/// Chunks per Vec created by `put_vec`
pub const CHUNKS_PER_VEC: u32 = 2;

/// Store a Vec and its chunks on `node`.
pub async fn put_vec(cluster: &LocalCluster, node: &NodeId, name: &str) -> Key {
    let vec = VecColumn::new(name, CHUNKS_PER_VEC);
    for chunk in vec.chunk_keys() {
        cluster
            .kv()
            .put_on(node, chunk.clone(), Chunk::new(chunk.clone(), vec![0.5; 8]).into())
            .await
            .unwrap();
    }
    let key = vec.key().clone();
    cluster.kv().put_on(node, key.clone(), vec.into()).await.unwrap();
    key
}

/// Store a frame over already stored Vecs on `node`.
pub async fn put_frame(cluster: &LocalCluster, node: &NodeId, name: &str, vecs: &[&str]) -> Key {
    let frame = Frame::new(name, vecs.iter().map(|v| Key::new(*v)).collect());
    let key = frame.key().clone();
    cluster.kv().put_on(node, key.clone(), frame.into()).await.unwrap();
    key
}

/// Store a frame together with fresh Vecs, all on `node`.
pub async fn put_frame_with_vecs(
    cluster: &LocalCluster,
    node: &NodeId,
    name: &str,
    vecs: &[&str],
) -> Key {
    for vec in vecs {
        put_vec(cluster, node, vec).await;
    }
    put_frame(cluster, node, name, vecs).await
}

/// Store metrics for `model` on `node`.
pub async fn put_metrics(cluster: &LocalCluster, node: &NodeId, name: &str, model: &str) -> Key {
    let metrics = ModelMetrics::builder(name, model).value("rmse", 0.25).build();
    let key = metrics.key().clone();
    cluster.kv().put_on(node, key.clone(), metrics.into()).await.unwrap();
    key
}

/// Store `model` on `node`.
pub async fn put_model(cluster: &LocalCluster, node: &NodeId, model: Model) -> Key {
    let key = model.key().clone();
    cluster.kv().put_on(node, key.clone(), model.into()).await.unwrap();
    key
}

/// Store an opaque blob on `node`.
pub async fn put_blob(cluster: &LocalCluster, node: &NodeId, name: &str) -> Key {
    let key = Key::new(name);
    cluster
        .kv()
        .put_on(node, key.clone(), Value::from(b"raw bytes".to_vec()))
        .await
        .unwrap();
    key
}

/// Sorted keys for `names`.
pub fn keys(names: &[&str]) -> Vec<Key> {
    let mut keys: Vec<Key> = names.iter().map(|n| Key::new(*n)).collect();
    keys.sort();
    keys
}

/// Sorted non-chunk keys stored anywhere in the cluster.
pub fn user_keys(cluster: &LocalCluster) -> Vec<Key> {
    cluster
        .all_keys()
        .into_iter()
        .filter(|k| !k.is_chunk_key())
        .collect()
}

/// Sorted non-chunk keys stored on `node`.
pub fn local_user_keys(cluster: &LocalCluster, node: &NodeId) -> Vec<Key> {
    cluster
        .local_keys(node)
        .into_iter()
        .filter(|k| !k.is_chunk_key())
        .collect()
}

/// Number of chunk keys whose parent Vec is `vec`.
pub fn chunks_of(cluster: &LocalCluster, vec: &str) -> usize {
    cluster
        .all_keys()
        .iter()
        .filter(|k| k.is_chunk_key() && k.name() == vec)
        .count()
}
