//! Algorithms for group-brokerage analysis.

/// Single-source shortest-path trees with path counting (Brandes forward pass).
pub mod shortest_paths;

/// Global and local gefura measures.
pub mod gefura;

pub use gefura::{global_gefura, local_gefura, Direction, GefuraConfig};
pub use shortest_paths::{shortest_path_tree, ShortestPathTree, DEFAULT_TIE_TOLERANCE};
