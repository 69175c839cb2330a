//! Error types for Trueno-DKV
//!
//! Toyota Way: Clear error messages with actionable guidance (Respect for People)

use thiserror::Error;

use crate::cluster::NodeId;
use crate::key::Key;
use crate::value::ValueKind;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Trueno-DKV error types
#[derive(Error, Debug)]
pub enum Error {
    /// A retention root resolved to something other than a frame or a model
    #[error(
        "Invalid retention kind: key {key} has kind code {} ({kind})\nOnly frame and model keys can be retained",
        kind.code()
    )]
    InvalidRetentionKind {
        /// Offending root key
        key: Key,
        /// Kind observed in the store
        kind: ValueKind,
    },

    /// Work unit addressed to a node with no local state
    #[error("Node {0} is not available")]
    NodeUnavailable(NodeId),

    /// Work unit failed on a node
    #[error("Node task failed on {node}: {reason}")]
    NodeTaskFailed {
        /// Node the work unit ran on
        node: NodeId,
        /// Failure description
        reason: String,
    },

    /// Work-unit payload could not be encoded or decoded
    #[error("Payload error: {0}")]
    Payload(#[from] serde_json::Error),

    /// Invalid input parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
