//! Single-source shortest-path trees with path counting.
//!
//! This is the forward half of Brandes' betweenness scheme: one traversal per
//! source produces distances, shortest-path counts (sigma), the predecessor
//! sets of every node, and a settle order usable for dependency
//! back-propagation. Unweighted networks use BFS; weighted networks use a
//! Dijkstra labeling with lazy heap deletion.
//!
//! # Weighted tie detection
//!
//! With floating-point edge weights, two distinct shortest paths rarely have
//! bit-identical lengths. Tentative distances within
//! [`DEFAULT_TIE_TOLERANCE`] of the best known distance are treated as ties:
//! the relaxing node joins the predecessor set and its sigma is accumulated,
//! mirroring the exact equality of the BFS case. The tolerance is part of the
//! contract and can be overridden per call through
//! [`GefuraConfig::tolerance`](crate::algo::gefura::GefuraConfig::tolerance).
//!
//! # References
//!
//! - Brandes (2001). "A faster algorithm for betweenness centrality"

use crate::{Error, Network, NodeId, Result};
use petgraph::visit::EdgeRef;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};

/// Absolute tolerance under which two weighted path lengths count as equal.
pub const DEFAULT_TIE_TOLERANCE: f64 = 1e-9;

/// Shortest-path data for one source node.
///
/// All vectors are indexed by `NodeIndex::index()` of the source network.
#[derive(Debug, Clone)]
pub struct ShortestPathTree {
    /// Distance from the source; `f64::INFINITY` for unreached nodes. Hop
    /// counts in unweighted mode.
    pub dist: Vec<f64>,
    /// Number of distinct shortest paths from the source; 1 for the source.
    pub sigma: Vec<f64>,
    /// For each node, the nodes immediately preceding it on at least one
    /// shortest path.
    pub preds: Vec<Vec<usize>>,
    /// Reached nodes in non-decreasing distance order. Walking this in
    /// reverse gives the dependency back-propagation order.
    pub order: Vec<usize>,
}

impl ShortestPathTree {
    /// Whether the node at `index` was reached from the source.
    pub fn is_reached(&self, index: usize) -> bool {
        self.dist[index].is_finite()
    }
}

/// Compute the shortest-path tree from a single source.
///
/// Fails with [`Error::InvalidNode`] if the source is not in the network, and
/// in weighted mode with [`Error::InvalidWeight`] if any edge has a missing,
/// non-positive, or non-finite weight. Weight validation happens before the
/// traversal starts, so no partial result is ever observable.
///
/// # Example
///
/// ```
/// use gefura_core::Network;
/// use gefura_core::algo::shortest_paths::shortest_path_tree;
///
/// let mut net = Network::undirected();
/// net.add_edge("a", "b", None);
/// net.add_edge("b", "c", None);
/// net.add_edge("a", "d", None);
/// net.add_edge("d", "c", None);
///
/// let tree = shortest_path_tree(&net, &"a".into(), false).unwrap();
/// let c = net.get_node_index(&"c".into()).unwrap().index();
/// // Two shortest paths a-b-c and a-d-c.
/// assert_eq!(tree.sigma[c], 2.0);
/// assert_eq!(tree.dist[c], 2.0);
/// ```
pub fn shortest_path_tree(
    network: &Network,
    source: &NodeId,
    weighted: bool,
) -> Result<ShortestPathTree> {
    let source_idx = network
        .get_node_index(source)
        .ok_or_else(|| Error::InvalidNode(format!("source node {source} is not in the network")))?;
    let adj = compile_adjacency(network, weighted, false)?;
    Ok(if weighted {
        dijkstra_tree(&adj, source_idx.index(), DEFAULT_TIE_TOLERANCE)
    } else {
        bfs_tree(&adj, source_idx.index())
    })
}

/// Compile the network into successor lists with resolved weights.
///
/// All weight validation happens here, so the traversals themselves are
/// infallible and the compiled lists can be shared across sources (and
/// across threads). Undirected networks get both directions materialized;
/// `reversed` flips arc direction on directed networks (used for the local
/// measure's `in` direction).
pub(crate) fn compile_adjacency(
    network: &Network,
    weighted: bool,
    reversed: bool,
) -> Result<Vec<Vec<(usize, f64)>>> {
    let graph = network.as_petgraph();
    let mut adj: Vec<Vec<(usize, f64)>> = vec![Vec::new(); graph.node_count()];

    for edge in graph.edge_references() {
        let (a, b) = (edge.source().index(), edge.target().index());
        let weight = if weighted {
            match edge.weight().weight {
                Some(w) if w > 0.0 && w.is_finite() => w,
                Some(w) => {
                    return Err(Error::InvalidWeight(format!(
                        "edge {} -> {} has non-positive weight {w}",
                        graph[edge.source()],
                        graph[edge.target()]
                    )))
                }
                None => {
                    return Err(Error::InvalidWeight(format!(
                        "edge {} -> {} has no weight",
                        graph[edge.source()],
                        graph[edge.target()]
                    )))
                }
            }
        } else {
            1.0
        };

        if network.is_directed() {
            if reversed {
                adj[b].push((a, weight));
            } else {
                adj[a].push((b, weight));
            }
        } else {
            adj[a].push((b, weight));
            adj[b].push((a, weight));
        }
    }

    Ok(adj)
}

/// BFS shortest-path tree: distance = hop count, ties accumulate sigma.
pub(crate) fn bfs_tree(adj: &[Vec<(usize, f64)>], source: usize) -> ShortestPathTree {
    let n = adj.len();
    let mut dist = vec![f64::INFINITY; n];
    let mut sigma = vec![0.0_f64; n];
    let mut preds: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut order = Vec::with_capacity(n);

    dist[source] = 0.0;
    sigma[source] = 1.0;

    let mut queue = VecDeque::new();
    queue.push_back(source);

    while let Some(v) = queue.pop_front() {
        order.push(v);
        let next = dist[v] + 1.0;

        for &(w, _) in &adj[v] {
            // First time seeing w?
            if dist[w].is_infinite() {
                dist[w] = next;
                queue.push_back(w);
            }

            // Is this a shortest path to w?
            if dist[w] == next {
                sigma[w] += sigma[v];
                preds[w].push(v);
            }
        }
    }

    ShortestPathTree {
        dist,
        sigma,
        preds,
        order,
    }
}

/// Dijkstra shortest-path tree with tolerance-based tie detection.
///
/// The heap is keyed by `f64::to_bits(dist)`: for non-negative finite
/// distances, IEEE-754 bit patterns order the same way the values do. Stale
/// heap entries are skipped via the `done` marking (lazy deletion). A
/// strictly shorter tentative distance resets the predecessor set and sigma;
/// a distance within `tolerance` of the best known one appends the
/// predecessor and accumulates sigma.
pub(crate) fn dijkstra_tree(
    adj: &[Vec<(usize, f64)>],
    source: usize,
    tolerance: f64,
) -> ShortestPathTree {
    let n = adj.len();
    let mut dist = vec![f64::INFINITY; n];
    let mut sigma = vec![0.0_f64; n];
    let mut preds: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut order = Vec::with_capacity(n);
    let mut done = vec![false; n];

    dist[source] = 0.0;
    sigma[source] = 1.0;

    let mut heap = BinaryHeap::new();
    heap.push(Reverse((0.0_f64.to_bits(), source)));

    while let Some(Reverse((_, u))) = heap.pop() {
        if done[u] {
            continue;
        }
        done[u] = true;
        order.push(u);

        for &(v, weight) in &adj[u] {
            if done[v] {
                continue;
            }
            let tentative = dist[u] + weight;

            if tentative < dist[v] - tolerance {
                dist[v] = tentative;
                sigma[v] = sigma[u];
                preds[v].clear();
                preds[v].push(u);
                heap.push(Reverse((tentative.to_bits(), v)));
            } else if (tentative - dist[v]).abs() <= tolerance {
                sigma[v] += sigma[u];
                preds[v].push(u);
            }
        }
    }

    ShortestPathTree {
        dist,
        sigma,
        preds,
        order,
    }
}
