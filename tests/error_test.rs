//! Tests for error types

use trueno_dkv::cluster::NodeId;
use trueno_dkv::{Error, Key, ValueKind};

#[test]
fn test_invalid_retention_kind_error() {
    let error = Error::InvalidRetentionKind {
        key: Key::new("x"),
        kind: ValueKind::Blob,
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("Invalid retention kind"));
    assert!(error_str.contains("key x"));
    assert!(error_str.contains("kind code 40"));
    assert!(error_str.contains("Only frame and model keys can be retained"));
}

#[test]
fn test_invalid_retention_kind_for_vec() {
    let error = Error::InvalidRetentionKind {
        key: Key::new("v1"),
        kind: ValueKind::Vec,
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("kind code 30"));
    assert!(error_str.contains("vec"));
}

#[test]
fn test_node_unavailable_error() {
    let error = Error::NodeUnavailable(NodeId::new("node-2"));
    let error_str = format!("{error}");
    assert!(error_str.contains("Node node-2"));
    assert!(error_str.contains("not available"));
}

#[test]
fn test_node_task_failed_error() {
    let error = Error::NodeTaskFailed {
        node: NodeId::new("node-0"),
        reason: "connection reset".to_string(),
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("Node task failed on node-0"));
    assert!(error_str.contains("connection reset"));
}

#[test]
fn test_payload_error_from_serde() {
    let parse = serde_json::from_str::<Vec<Key>>("not json").unwrap_err();
    let error: Error = parse.into();
    assert!(matches!(error, Error::Payload(_)));
    assert!(format!("{error}").contains("Payload error"));
}

#[test]
fn test_invalid_input_error() {
    let error = Error::InvalidInput("no nodes attached".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Invalid input"));
    assert!(error_str.contains("no nodes attached"));
}

#[test]
fn test_other_error() {
    let error = Error::Other("custom error".to_string());
    assert_eq!(format!("{error}"), "custom error");
}
