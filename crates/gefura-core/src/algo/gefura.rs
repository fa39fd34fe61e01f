//! Gefura centrality: brokerage between node groups.
//!
//! # Intuition
//!
//! Betweenness asks "how often does this node sit on shortest paths between
//! any two others?". Gefura (old Greek "bridge") asks the group-aware
//! question: how often does it sit on shortest paths between nodes of
//! *different* groups? High gefura = a bridge between communities,
//! departments, countries.
//!
//! # Definition
//!
//! Given a partition of the nodes into disjoint groups:
//!
//! ```text
//! Γ(a)   = Σ_{g,h: group(g) ≠ group(h), g≠a≠h} σ_gh(a) / σ_gh       (global)
//! Γ_A(a) = Σ_{g ∈ A, h ∉ A, g≠a≠h}             σ_gh(a) / σ_gh       (local, A = group(a))
//! ```
//!
//! Where σ_gh is the number of shortest g-h paths and σ_gh(a) the number of
//! those passing through `a`. Endpoints never score.
//!
//! # Algorithm
//!
//! One Brandes-style accumulation per source: a shortest-path tree (BFS, or
//! Dijkstra for weighted networks) followed by dependency back-propagation
//! from the farthest node inward. The group filter enters in exactly two
//! places, which is why global and local share one accumulation core:
//!
//! 1. the *seed*: a target `w` only receives initial credit when
//!    `group(w) ≠ group(source)`;
//! 2. the *bank*: the accumulated dependency of `w` only counts toward its
//!    score when the measure admits the (source, w) combination -- always for
//!    global, only `group(w) = group(source)` for local.
//!
//! Complexity is O(VE) unweighted and O(V(E + V log V)) weighted, like plain
//! betweenness. Per-source runs are independent, so [`GefuraConfig::parallel`]
//! can fan them out across a rayon pool; each worker returns a private score
//! increment and the increments are summed in a reduce step.
//!
//! # Normalization
//!
//! The normalizer is per-node: the number of cross-group ordered pairs the
//! focal node could possibly broker, which excludes the node itself from its
//! own group's count. For global, with group sizes |G_k|:
//!
//! ```text
//! M(a) = base × Σ_{k<l} |G_k \ {a}| · |G_l \ {a}|
//! ```
//!
//! with base 2 for undirected networks (each pair traversed from both ends)
//! and for the normalized directed measure (ordered group pairs). For local:
//!
//! ```text
//! M_A(a) = (|A| - 1) × (n - |A|)          A = group(a)
//! ```
//!
//! A zero normalizer (e.g. singleton groups) yields score 0, not an error.
//!
//! # References
//!
//! - Brandes (2001). "A faster algorithm for betweenness centrality"
//! - Freeman (1977). "A set of measures of centrality based on betweenness"
//! - Gould & Fernandez (1989). "Structures of mediation: a formal approach
//!   to brokerage in transaction networks"

use crate::algo::shortest_paths::{
    bfs_tree, compile_adjacency, dijkstra_tree, DEFAULT_TIE_TOLERANCE,
};
use crate::{Grouping, Network, Result};
use rayon::prelude::*;
use std::collections::HashMap;

/// Which paths the local measure counts on a *directed* network.
///
/// Ignored for undirected networks and for the global measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Paths from the focal node's own group to the rest.
    Out,
    /// Paths from the rest to the focal node's own group.
    In,
    /// Both: the sum of `In` and `Out` (their average when normalized).
    All,
}

/// Configuration for the gefura measures.
#[derive(Debug, Clone, Copy)]
pub struct GefuraConfig {
    /// Use edge weights for shortest paths. Every edge must then carry a
    /// positive finite weight.
    pub weighted: bool,
    /// Divide scores by the per-node pair-count normalizer.
    pub normalized: bool,
    /// Path direction for the local measure on directed networks.
    pub direction: Direction,
    /// Tie tolerance for weighted shortest-path lengths.
    pub tolerance: f64,
    /// Fan per-source accumulations out across a rayon pool. Off by default
    /// so float summation order, and hence last-bit results, stay
    /// reproducible.
    pub parallel: bool,
}

impl Default for GefuraConfig {
    fn default() -> Self {
        Self {
            weighted: false,
            normalized: false,
            direction: Direction::Out,
            tolerance: DEFAULT_TIE_TOLERANCE,
            parallel: false,
        }
    }
}

/// Compute global gefura: brokerage of shortest paths between any two
/// different groups.
///
/// Fails eagerly, before any traversal, if the grouping does not exactly
/// cover the network's node set or if weighted mode finds a missing or
/// non-positive edge weight. An empty network yields an empty map.
///
/// # Example
///
/// ```
/// use gefura_core::{Grouping, Network};
/// use gefura_core::algo::gefura::{global_gefura, GefuraConfig};
///
/// // Path 0 - 1 - 2 - 3 - 4
/// let mut net = Network::undirected();
/// for pair in ["0", "1", "2", "3", "4"].windows(2) {
///     net.add_edge(pair[0], pair[1], None);
/// }
/// let groups = Grouping::from_sets(vec![vec!["0", "2"], vec!["1"], vec!["3", "4"]]).unwrap();
///
/// let config = GefuraConfig { normalized: true, ..Default::default() };
/// let scores = global_gefura(&net, &groups, config).unwrap();
/// assert!((scores["2"] - 0.8).abs() < 1e-12);
/// ```
pub fn global_gefura(
    network: &Network,
    grouping: &Grouping,
    config: GefuraConfig,
) -> Result<HashMap<String, f64>> {
    let (gid, sizes) = group_table(network, grouping)?;
    let adj = compile_adjacency(network, config.weighted, false)?;
    let mut gamma = accumulate(&adj, &gid, config, false);
    rescale_global(&mut gamma, network.is_directed(), &gid, &sizes, config.normalized);
    Ok(to_score_map(network, gamma))
}

/// Compute local gefura: brokerage of shortest paths between the focal
/// node's own group and the rest of the network.
///
/// For a node, local is a restricted sum of the same non-negative per-pair
/// terms as global, so raw local never exceeds raw global. On directed
/// networks [`GefuraConfig::direction`] selects the path direction; the `In`
/// variant runs the same accumulation on the reversed network.
pub fn local_gefura(
    network: &Network,
    grouping: &Grouping,
    config: GefuraConfig,
) -> Result<HashMap<String, f64>> {
    let (gid, sizes) = group_table(network, grouping)?;
    let n_nodes = network.node_count() as f64;

    let run = |reversed: bool| -> Result<Vec<f64>> {
        let adj = compile_adjacency(network, config.weighted, reversed)?;
        let mut gamma = accumulate(&adj, &gid, config, true);
        rescale_local(&mut gamma, n_nodes, &gid, &sizes, config.normalized);
        Ok(gamma)
    };

    let gamma = if !network.is_directed() || config.direction == Direction::Out {
        run(false)?
    } else if config.direction == Direction::In {
        run(true)?
    } else {
        let gamma_in = run(true)?;
        let gamma_out = run(false)?;
        // Normalized 'all' averages the two directions; raw sums them.
        let norm = if config.normalized { 2.0 } else { 1.0 };
        gamma_in
            .iter()
            .zip(&gamma_out)
            .map(|(i, o)| (i + o) / norm)
            .collect()
    };

    Ok(to_score_map(network, gamma))
}

/// Resolve group labels to dense indices and per-group sizes.
///
/// Validates the partition against the network first, so a failed measure
/// call never produces partial results.
fn group_table(network: &Network, grouping: &Grouping) -> Result<(Vec<usize>, Vec<f64>)> {
    grouping.validate_against(network)?;

    let graph = network.as_petgraph();
    let mut label_index = HashMap::new();
    let mut sizes = Vec::new();
    let mut gid = Vec::with_capacity(graph.node_count());

    for idx in graph.node_indices() {
        // validate_against guarantees coverage
        let group = grouping.group_of(&graph[idx]).ok_or_else(|| {
            crate::Error::InvalidGroups(format!(
                "network node {} is not covered by any group",
                graph[idx]
            ))
        })?;
        let g = *label_index.entry(group.clone()).or_insert_with(|| {
            sizes.push(0.0);
            sizes.len() - 1
        });
        sizes[g] += 1.0;
        gid.push(g);
    }

    Ok((gid, sizes))
}

/// Sum per-source dependency increments over every source node.
fn accumulate(adj: &[Vec<(usize, f64)>], gid: &[usize], config: GefuraConfig, local: bool) -> Vec<f64> {
    let n = adj.len();
    let run = |source: usize| source_increment(adj, gid, source, config, local);

    if config.parallel {
        (0..n)
            .into_par_iter()
            .map(run)
            .reduce(
                || vec![0.0; n],
                |mut acc, inc| {
                    for (a, b) in acc.iter_mut().zip(inc) {
                        *a += b;
                    }
                    acc
                },
            )
    } else {
        let mut gamma = vec![0.0; n];
        for source in 0..n {
            for (a, b) in gamma.iter_mut().zip(run(source)) {
                *a += b;
            }
        }
        gamma
    }
}

/// One source's score increment: shortest-path tree plus group-filtered
/// dependency back-propagation.
fn source_increment(
    adj: &[Vec<(usize, f64)>],
    gid: &[usize],
    source: usize,
    config: GefuraConfig,
    local: bool,
) -> Vec<f64> {
    let tree = if config.weighted {
        dijkstra_tree(adj, source, config.tolerance)
    } else {
        bfs_tree(adj, source)
    };

    let n = adj.len();
    let mut delta = vec![0.0_f64; n];
    let mut increment = vec![0.0_f64; n];
    let source_group = gid[source];

    // Farthest node first; only reached nodes appear in the order.
    for &w in tree.order.iter().rev() {
        // Seed credit: w is a qualifying target iff it sits in another group.
        let seed = if gid[w] == source_group { 0.0 } else { 1.0 };
        let coeff = (seed + delta[w]) / tree.sigma[w];
        for &v in &tree.preds[w] {
            delta[v] += tree.sigma[v] * coeff;
        }
        // Bank w's dependency. delta[w] excludes w's own seed, so endpoints
        // never score. The local measure only credits brokers from sources
        // in their own group.
        if w != source && (!local || gid[w] == source_group) {
            increment[w] += delta[w];
        }
    }

    increment
}

/// Apply base factor and (optionally) the per-node pair-count normalizer.
fn rescale_global(
    gamma: &mut [f64],
    directed: bool,
    gid: &[usize],
    sizes: &[f64],
    normalized: bool,
) {
    // Undirected traversal visits each unordered pair from both endpoints;
    // the normalized directed denominator counts ordered group pairs.
    let base = if directed && !normalized { 1.0 } else { 2.0 };

    if normalized {
        let total: f64 = sizes.iter().sum();
        let total_sq: f64 = sizes.iter().map(|s| s * s).sum();
        for (a, score) in gamma.iter_mut().enumerate() {
            // Excluding the focal node shrinks its own group by one; the
            // pair sum over the remaining sizes is O(1) from the two totals.
            let own = sizes[gid[a]] - 1.0;
            let rest = total - sizes[gid[a]];
            let rest_sq = total_sq - sizes[gid[a]] * sizes[gid[a]];
            let pair_sum = (rest * rest - rest_sq) / 2.0 + own * rest;
            let m = base * pair_sum;
            *score = if m > 0.0 { *score / m } else { 0.0 };
        }
    } else {
        for score in gamma.iter_mut() {
            *score /= base;
        }
    }
}

/// Normalize local scores by `(|A| - 1) × (n - |A|)` for the node's group A.
fn rescale_local(gamma: &mut [f64], n_nodes: f64, gid: &[usize], sizes: &[f64], normalized: bool) {
    if !normalized {
        return;
    }
    for (a, score) in gamma.iter_mut().enumerate() {
        let own = sizes[gid[a]];
        let m = (own - 1.0) * (n_nodes - own);
        *score = if m > 0.0 { *score / m } else { 0.0 };
    }
}

/// Map index-keyed scores back to node IDs.
fn to_score_map(network: &Network, gamma: Vec<f64>) -> HashMap<String, f64> {
    let graph = network.as_petgraph();
    graph
        .node_indices()
        .map(|idx| (graph[idx].0.clone(), gamma[idx.index()]))
        .collect()
}
