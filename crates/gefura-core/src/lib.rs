// Allow minor clippy style warnings at crate level
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::uninlined_format_args)]

//! Gefura (group brokerage) centrality.
//!
//! Gefura measures how much a node mediates shortest-path traffic between
//! members of *different* groups -- a group-aware generalization of
//! betweenness centrality. Given a network whose nodes are partitioned into
//! disjoint groups, the crate computes:
//!
//! - [`algo::gefura::global_gefura`] -- brokerage between any two groups
//! - [`algo::gefura::local_gefura`] -- brokerage between a node's own group
//!   and the rest
//!
//! Directed and undirected, weighted and unweighted, connected and
//! disconnected networks are all supported.
//!
//! # Types
//!
//! - [`Network`] - nodes and optionally weighted edges over petgraph
//! - [`Grouping`] - a validated disjoint partition of the node set
//! - [`NodeId`] / [`GroupId`] - string-backed identifiers
//!
//! # Example
//!
//! ```rust
//! use gefura_core::{Grouping, Network};
//! use gefura_core::algo::gefura::{global_gefura, GefuraConfig};
//!
//! // Two teams joined through bob.
//! let mut net = Network::undirected();
//! net.add_edge("alice", "bob", None);
//! net.add_edge("bob", "carol", None);
//!
//! let groups = Grouping::from_sets(vec![
//!     vec!["alice", "bob"],
//!     vec!["carol"],
//! ]).unwrap();
//!
//! let scores = global_gefura(&net, &groups, GefuraConfig::default()).unwrap();
//! assert!(scores["bob"] > scores["alice"]);
//! ```

pub mod algo;
mod error;
mod groups;
mod network;
mod node;

pub use error::{Error, Result};
pub use groups::Grouping;
pub use network::{Link, Network, NetworkStats};
pub use node::{GroupId, NodeId};

// Re-export petgraph for advanced graph operations
pub use petgraph;
