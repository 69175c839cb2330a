//! Cluster Retain Demo
//!
//! Run with: `cargo run --example retain_cluster`
//! Set `RUST_LOG=trueno_dkv=debug` to watch each node's sweep.
//!
//! This example seeds a three-node cluster with frames, Vecs and models,
//! previews a retain with a dry run, then runs it for real.

use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trueno_dkv::cluster::{LocalCluster, NodeId, NodeOutcome};
use trueno_dkv::{Chunk, Frame, Key, Keyed, Model, ModelMetrics, RetainConfig, Retainer, VecColumn};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    println!("=== Trueno-DKV Cluster Retain Demo ===\n");

    let cluster = Arc::new(LocalCluster::with_nodes(3));
    seed(&cluster).await?;
    print_layout(&cluster);

    let roots = [Key::new("churn_model")];

    println!("\n1. Dry run");
    println!("   -------");
    let dry = RetainConfig::builder().dry_run(true).build();
    let preview = Retainer::with_config(cluster.clone(), dry).retain(&roots).await?;
    for key in preview.planned() {
        println!("   would remove {key}");
    }

    println!("\n2. Retain {{churn_model}}");
    println!("   ---------------------");
    let report = Retainer::new(cluster.clone()).retain(&roots).await?;
    for outcome in &report.nodes {
        match outcome {
            NodeOutcome::Completed(sweep) => println!(
                "   {}: scanned {}, removed {} models, {} frames, {} vecs",
                sweep.node, sweep.scanned, sweep.models_removed, sweep.frames_removed, sweep.vecs_removed
            ),
            NodeOutcome::Failed { node, error } => println!("   {node}: FAILED ({error})"),
        }
    }

    println!();
    print_layout(&cluster);
    println!("\nDemo completed successfully!");
    Ok(())
}

async fn put_vec(cluster: &LocalCluster, node: &NodeId, name: &str) -> Result<Key> {
    let vec = VecColumn::new(name, 3);
    for chunk in vec.chunk_keys() {
        let values = (0..16).map(f64::from).collect();
        cluster
            .kv()
            .put_on(node, chunk.clone(), Chunk::new(chunk.clone(), values).into())
            .await?;
    }
    let key = vec.key().clone();
    cluster.kv().put_on(node, key.clone(), vec.into()).await?;
    Ok(key)
}

async fn seed(cluster: &LocalCluster) -> Result<()> {
    let (n0, n1, n2) = (NodeId::new("node-0"), NodeId::new("node-1"), NodeId::new("node-2"));

    let age = put_vec(cluster, &n0, "age").await?;
    let tenure = put_vec(cluster, &n1, "tenure").await?;
    let spend = put_vec(cluster, &n2, "spend").await?;
    let scratch = put_vec(cluster, &n2, "scratch").await?;

    let train = Frame::new("train", vec![age.clone(), tenure.clone()]);
    let valid = Frame::new("valid", vec![age, spend]);
    let tmp = Frame::new("tmp", vec![tenure, scratch]);
    cluster.kv().put_on(&n0, Key::new("train"), train.into()).await?;
    cluster.kv().put_on(&n1, Key::new("valid"), valid.into()).await?;
    cluster.kv().put_on(&n2, Key::new("tmp"), tmp.into()).await?;

    let metrics = ModelMetrics::builder("churn_metrics", "churn_model")
        .frame("valid")
        .value("auc", 0.91)
        .build();
    cluster.kv().put_on(&n1, Key::new("churn_metrics"), metrics.into()).await?;

    let model = Model::builder("churn_model", "gbm")
        .train("train")
        .valid("valid")
        .metric("churn_metrics")
        .build();
    cluster.kv().put_on(&n0, Key::new("churn_model"), model.into()).await?;

    let stale = Model::builder("stale_model", "glm").train("tmp").build();
    cluster.kv().put_on(&n2, Key::new("stale_model"), stale.into()).await?;
    Ok(())
}

fn print_layout(cluster: &LocalCluster) {
    println!("Cluster layout:");
    for node in cluster.kv().nodes() {
        let keys: Vec<String> = cluster
            .local_keys(&node)
            .iter()
            .filter(|key| !key.is_chunk_key())
            .map(ToString::to_string)
            .collect();
        println!("   {node}: [{}]", keys.join(", "));
    }
}
