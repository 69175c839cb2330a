//! Tests for top-level retain API and configuration

use std::sync::Arc;

use trueno_dkv::cluster::LocalCluster;
use trueno_dkv::kv::KvStore;
use trueno_dkv::{ExpansionMode, Frame, Key, RetainConfig, Retainer};

#[test]
fn test_retain_config_builder() {
    // Test RetainConfig::builder() starts from defaults
    let config = RetainConfig::builder().build();
    assert_eq!(config, RetainConfig::default());
}

#[test]
fn test_retain_config_defaults() {
    let config = RetainConfig::default();
    assert_eq!(config.expansion, ExpansionMode::Bounded);
    assert!(!config.dry_run);
}

#[test]
fn test_retain_config_builder_chain() {
    // Test method chaining
    let config = RetainConfig::builder()
        .expansion(ExpansionMode::Recursive)
        .dry_run(true)
        .build();

    assert_eq!(config.expansion, ExpansionMode::Recursive);
    assert!(config.dry_run);
}

#[test]
fn test_retain_config_from_json() {
    let config = RetainConfig::from_json(r#"{"expansion":"recursive","dryRun":true}"#).unwrap();
    assert_eq!(config.expansion, ExpansionMode::Recursive);
    assert!(config.dry_run);
}

#[test]
fn test_retain_config_from_json_missing_fields() {
    let config = RetainConfig::from_json(r#"{"dryRun":true}"#).unwrap();
    assert_eq!(config.expansion, ExpansionMode::Bounded);
    assert!(config.dry_run);

    let config = RetainConfig::from_json("{}").unwrap();
    assert_eq!(config, RetainConfig::default());
}

#[test]
fn test_retain_config_from_json_rejects_unknown_mode() {
    let result = RetainConfig::from_json(r#"{"expansion":"everything"}"#);
    assert!(result.is_err());
    assert!(format!("{}", result.unwrap_err()).contains("retain config"));
}

#[test]
fn test_retain_config_json_roundtrip() {
    let config = RetainConfig::builder().expansion(ExpansionMode::Recursive).build();
    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("\"recursive\""));
    assert_eq!(RetainConfig::from_json(&json).unwrap(), config);
}

#[test]
fn test_expansion_mode_is_copy() {
    let mode = ExpansionMode::Recursive;
    let _copied = mode;
    assert_eq!(mode, ExpansionMode::Recursive);
}

#[tokio::test]
async fn test_retainer_carries_config() {
    let cluster = Arc::new(LocalCluster::with_nodes(1));
    let config = RetainConfig::builder().dry_run(true).build();

    let retainer = Retainer::with_config(cluster, config);

    assert_eq!(retainer.config(), &config);
}

#[tokio::test]
async fn test_retain_free_function() {
    let cluster = Arc::new(LocalCluster::with_nodes(2));
    let kv = cluster.kv();
    kv.put(Key::new("keep"), Frame::new("keep", vec![]).into())
        .await
        .unwrap();
    kv.put(Key::new("drop"), Frame::new("drop", vec![]).into())
        .await
        .unwrap();

    let report = trueno_dkv::retain(cluster.clone(), &[Key::new("keep")])
        .await
        .unwrap();

    assert!(report.all_succeeded());
    assert_eq!(report.retained, 1);
    assert_eq!(report.frames_removed(), 1);
    assert_eq!(cluster.all_keys(), vec![Key::new("keep")]);
}
