use crate::NodeId;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Edge payload: an optional positive weight.
///
/// `None` means no weight was recorded for the edge. That is fine in
/// unweighted mode (every edge counts as one hop) and an
/// [`Error::InvalidWeight`](crate::Error::InvalidWeight) in weighted mode --
/// weights are never silently defaulted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// Edge weight, if any. Must be positive and finite to be usable in
    /// weighted shortest-path computations.
    pub weight: Option<f64>,
}

impl Link {
    /// An edge without a recorded weight.
    pub fn unweighted() -> Self {
        Self { weight: None }
    }

    /// An edge with an explicit weight.
    pub fn weighted(weight: f64) -> Self {
        Self {
            weight: Some(weight),
        }
    }
}

/// A network of nodes and (optionally weighted) edges.
///
/// Uses petgraph's directed graph internally for efficient traversal and
/// maintains an index for O(1) node lookup by ID. Whether the network is
/// *semantically* directed is fixed at construction: an undirected network
/// stores one arc per edge and traverses it in both directions.
///
/// Parallel edges are not supported; re-adding an existing edge updates its
/// weight in place.
///
/// # Example
///
/// ```rust
/// use gefura_core::Network;
///
/// let mut net = Network::undirected();
/// net.add_edge("alice", "bob", None);
/// net.add_edge("bob", "carol", Some(2.0));
///
/// assert_eq!(net.node_count(), 3);
/// assert_eq!(net.edge_count(), 2);
/// assert!(!net.is_directed());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    /// The underlying graph. One arc per edge, even for undirected networks.
    graph: DiGraph<NodeId, Link>,

    /// Map from node ID to node index.
    node_index: HashMap<NodeId, NodeIndex>,

    /// Whether edges are one-way.
    directed: bool,
}

impl Default for Network {
    fn default() -> Self {
        Self::undirected()
    }
}

impl Network {
    /// Create an empty undirected network.
    pub fn undirected() -> Self {
        Self::with_directedness(false)
    }

    /// Create an empty directed network.
    pub fn directed() -> Self {
        Self::with_directedness(true)
    }

    fn with_directedness(directed: bool) -> Self {
        Self {
            graph: DiGraph::new(),
            node_index: HashMap::new(),
            directed,
        }
    }

    /// Whether edges are one-way.
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Add a node, returning its index. Re-adding an existing node is a no-op.
    ///
    /// Useful for isolated nodes; `add_edge` registers its endpoints itself.
    pub fn add_node(&mut self, id: impl Into<NodeId>) -> NodeIndex {
        let id = id.into();
        if let Some(&idx) = self.node_index.get(&id) {
            return idx;
        }
        let idx = self.graph.add_node(id.clone());
        self.node_index.insert(id, idx);
        idx
    }

    /// Add an edge, creating the endpoint nodes if necessary.
    ///
    /// If the edge already exists (in either orientation for undirected
    /// networks), its weight is updated in place.
    pub fn add_edge(&mut self, from: impl Into<NodeId>, to: impl Into<NodeId>, weight: Option<f64>) {
        let from_idx = self.add_node(from);
        let to_idx = self.add_node(to);

        let existing = self.graph.find_edge(from_idx, to_idx).or_else(|| {
            if self.directed {
                None
            } else {
                self.graph.find_edge(to_idx, from_idx)
            }
        });

        match existing {
            Some(edge) => self.graph[edge] = Link { weight },
            None => {
                self.graph.add_edge(from_idx, to_idx, Link { weight });
            }
        }
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Check whether a node is present.
    pub fn contains(&self, id: &NodeId) -> bool {
        self.node_index.contains_key(id)
    }

    /// Iterate over all node IDs.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeId> {
        self.graph.node_weights()
    }

    /// Get node index for a node ID.
    pub fn get_node_index(&self, id: &NodeId) -> Option<NodeIndex> {
        self.node_index.get(id).copied()
    }

    /// Get neighbor IDs of a node. O(d).
    ///
    /// For directed networks these are the successors (outgoing edges); for
    /// undirected networks, all adjacent nodes.
    pub fn neighbor_ids(&self, id: impl Into<NodeId>) -> Vec<&NodeId> {
        let id = id.into();
        let Some(&idx) = self.node_index.get(&id) else {
            return vec![];
        };
        if self.directed {
            self.graph
                .neighbors_directed(idx, Direction::Outgoing)
                .map(|n| &self.graph[n])
                .collect()
        } else {
            self.graph
                .neighbors_undirected(idx)
                .map(|n| &self.graph[n])
                .collect()
        }
    }

    /// Degree of a node (out-degree for directed networks). O(d).
    pub fn degree(&self, id: impl Into<NodeId>) -> usize {
        let id = id.into();
        match self.node_index.get(&id) {
            Some(&idx) if self.directed => {
                self.graph.neighbors_directed(idx, Direction::Outgoing).count()
            }
            Some(&idx) => self.graph.neighbors_undirected(idx).count(),
            None => 0,
        }
    }

    /// Get the underlying petgraph for advanced operations.
    pub fn as_petgraph(&self) -> &DiGraph<NodeId, Link> {
        &self.graph
    }
}

/// Statistics about a network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkStats {
    /// Number of nodes.
    pub node_count: usize,
    /// Number of edges.
    pub edge_count: usize,
    /// Whether edges are one-way.
    pub directed: bool,
    /// Average degree (edge endpoints per node).
    pub avg_degree: f64,
}

impl Network {
    /// Compute statistics about the network.
    pub fn stats(&self) -> NetworkStats {
        let node_count = self.node_count();
        let edge_count = self.edge_count();
        let endpoints = if self.directed { 1.0 } else { 2.0 };

        let avg_degree = if node_count > 0 {
            endpoints * edge_count as f64 / node_count as f64
        } else {
            0.0
        };

        NetworkStats {
            node_count,
            edge_count,
            directed: self.directed,
            avg_degree,
        }
    }
}
