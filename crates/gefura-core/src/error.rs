//! Error types for gefura-core.

use thiserror::Error;

/// Error type for network and gefura operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A node referenced by the caller is not present in the network.
    #[error("Node not found in network: {0}")]
    InvalidNode(String),

    /// The group assignment is not a disjoint, complete partition of the
    /// network's node set.
    #[error("Invalid group partition: {0}")]
    InvalidGroups(String),

    /// A missing, non-positive, or non-finite edge weight in weighted mode.
    #[error("Invalid edge weight: {0}")]
    InvalidWeight(String),
}

/// Result type for gefura operations.
pub type Result<T> = std::result::Result<T, Error>;
