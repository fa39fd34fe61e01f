//! Property-based tests for the gefura measures.
//!
//! These compare the Brandes-style accumulation against a naive all-pairs
//! reference on small random networks and check the invariants that must
//! hold for any network and grouping:
//! - all scores are non-negative
//! - raw local never exceeds raw global
//! - unweighted mode equals weighted mode with unit weights
//! - normalization round-trips through the per-node pair count

use gefura_core::algo::gefura::{global_gefura, local_gefura, GefuraConfig};
use gefura_core::{Grouping, Network};
use proptest::prelude::*;
use std::collections::{HashMap, VecDeque};

/// A random undirected test network: node count, edge list, and a group
/// index per node.
#[derive(Debug, Clone)]
struct TestNet {
    n: usize,
    edges: Vec<(usize, usize)>,
    membership: Vec<usize>,
}

fn arb_test_net() -> impl Strategy<Value = TestNet> {
    (2usize..8).prop_flat_map(|n| {
        (
            proptest::collection::vec((0..n, 0..n), 0..20),
            proptest::collection::vec(0usize..3, n),
        )
            .prop_map(move |(edges, membership)| TestNet {
                n,
                edges,
                membership,
            })
    })
}

fn node_name(i: usize) -> String {
    format!("n{i}")
}

fn build(test_net: &TestNet, weight: Option<f64>) -> (Network, Grouping) {
    let mut net = Network::undirected();
    for i in 0..test_net.n {
        net.add_node(node_name(i));
    }
    for &(a, b) in &test_net.edges {
        if a != b {
            net.add_edge(node_name(a), node_name(b), weight);
        }
    }
    let grouping = Grouping::from_membership(
        test_net
            .membership
            .iter()
            .enumerate()
            .map(|(i, g)| (node_name(i), format!("g{g}"))),
    )
    .expect("membership mapping is trivially disjoint");
    (net, grouping)
}

/// BFS distances and shortest-path counts from one source, over an
/// adjacency-set representation. Deliberately independent of the library's
/// traversal code.
fn bfs_reference(adj: &[Vec<usize>], source: usize) -> (Vec<f64>, Vec<f64>) {
    let n = adj.len();
    let mut dist = vec![f64::INFINITY; n];
    let mut sigma = vec![0.0; n];
    dist[source] = 0.0;
    sigma[source] = 1.0;
    let mut queue = VecDeque::from([source]);
    while let Some(v) = queue.pop_front() {
        for &w in &adj[v] {
            if dist[w].is_infinite() {
                dist[w] = dist[v] + 1.0;
                queue.push_back(w);
            }
            if dist[w] == dist[v] + 1.0 {
                sigma[w] += sigma[v];
            }
        }
    }
    (dist, sigma)
}

/// Naive gefura: enumerate every cross-group ordered pair and split the
/// path-fraction credit via the sigma product identity
/// `sigma_st(a) = sigma_sa * sigma_at` when `d(s,a) + d(a,t) = d(s,t)`.
fn naive_gefura(test_net: &TestNet, local: bool) -> Vec<f64> {
    let n = test_net.n;
    let mut adj = vec![Vec::new(); n];
    for &(a, b) in &test_net.edges {
        if a != b && !adj[a].contains(&b) {
            adj[a].push(b);
            adj[b].push(a);
        }
    }

    let per_source: Vec<_> = (0..n).map(|s| bfs_reference(&adj, s)).collect();
    let mut gamma = vec![0.0; n];

    for s in 0..n {
        for t in 0..n {
            if s == t || test_net.membership[s] == test_net.membership[t] {
                continue;
            }
            let (dist_s, sigma_s) = &per_source[s];
            if !dist_s[t].is_finite() {
                continue;
            }
            for a in 0..n {
                if a == s || a == t {
                    continue;
                }
                if local && test_net.membership[a] != test_net.membership[s] {
                    continue;
                }
                let (dist_a, sigma_a) = &per_source[a];
                if dist_s[a] + dist_a[t] == dist_s[t] {
                    gamma[a] += sigma_s[a] * sigma_a[t] / sigma_s[t];
                }
            }
        }
    }

    if !local {
        // Undirected: each unordered pair was visited from both endpoints.
        for g in &mut gamma {
            *g /= 2.0;
        }
    }
    gamma
}

/// Per-node global normalizer, computed the slow combinatorial way as a
/// cross-check of the library's O(1) formula.
fn naive_pair_count(test_net: &TestNet, a: usize) -> f64 {
    let groups: Vec<usize> = {
        let mut g = test_net.membership.clone();
        g.sort_unstable();
        g.dedup();
        g
    };
    let size_without =
        |g: usize| -> f64 {
            test_net
                .membership
                .iter()
                .enumerate()
                .filter(|&(i, &m)| m == g && i != a)
                .count() as f64
        };
    let mut total = 0.0;
    for (i, &k) in groups.iter().enumerate() {
        for &l in &groups[i + 1..] {
            total += size_without(k) * size_without(l);
        }
    }
    total
}

fn scores_by_index(scores: &HashMap<String, f64>, n: usize) -> Vec<f64> {
    (0..n).map(|i| scores[&node_name(i)]).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn all_scores_non_negative(test_net in arb_test_net()) {
        let (net, grouping) = build(&test_net, None);
        for normalized in [false, true] {
            let config = GefuraConfig { normalized, ..Default::default() };
            for scores in [
                global_gefura(&net, &grouping, config).unwrap(),
                local_gefura(&net, &grouping, config).unwrap(),
            ] {
                for (node, score) in &scores {
                    prop_assert!(*score >= 0.0, "negative score {score} for {node}");
                }
            }
        }
    }

    #[test]
    fn raw_local_never_exceeds_raw_global(test_net in arb_test_net()) {
        let (net, grouping) = build(&test_net, None);
        let global = global_gefura(&net, &grouping, GefuraConfig::default()).unwrap();
        let local = local_gefura(&net, &grouping, GefuraConfig::default()).unwrap();

        for (node, local_score) in &local {
            prop_assert!(
                *local_score <= global[node] + 1e-9,
                "local {local_score} > global {} for {node}",
                global[node]
            );
        }
    }

    #[test]
    fn unweighted_equals_unit_weighted(test_net in arb_test_net()) {
        let (plain, grouping) = build(&test_net, None);
        let (unit, _) = build(&test_net, Some(1.0));

        let unweighted = global_gefura(&plain, &grouping, GefuraConfig::default()).unwrap();
        let weighted = global_gefura(
            &unit,
            &grouping,
            GefuraConfig { weighted: true, ..Default::default() },
        )
        .unwrap();

        for (node, score) in &unweighted {
            prop_assert!(
                (score - weighted[node]).abs() < 1e-9,
                "node {node}: unweighted {score} vs unit-weighted {}",
                weighted[node]
            );
        }
    }

    #[test]
    fn normalization_round_trips(test_net in arb_test_net()) {
        let (net, grouping) = build(&test_net, None);
        let raw = global_gefura(&net, &grouping, GefuraConfig::default()).unwrap();
        let normalized = global_gefura(
            &net,
            &grouping,
            GefuraConfig { normalized: true, ..Default::default() },
        )
        .unwrap();

        for i in 0..test_net.n {
            let m = naive_pair_count(&test_net, i);
            let name = node_name(i);
            let recovered = normalized[&name] * m;
            prop_assert!(
                (recovered - raw[&name]).abs() < 1e-9,
                "node {name}: normalized {} * M {m} = {recovered}, raw {}",
                normalized[&name],
                raw[&name]
            );
        }
    }

    #[test]
    fn matches_naive_reference_global(test_net in arb_test_net()) {
        let (net, grouping) = build(&test_net, None);
        let scores = global_gefura(&net, &grouping, GefuraConfig::default()).unwrap();
        let got = scores_by_index(&scores, test_net.n);
        let want = naive_gefura(&test_net, false);

        for i in 0..test_net.n {
            prop_assert!(
                (got[i] - want[i]).abs() < 1e-9,
                "node {i}: brandes {} vs naive {}",
                got[i],
                want[i]
            );
        }
    }

    #[test]
    fn matches_naive_reference_local(test_net in arb_test_net()) {
        let (net, grouping) = build(&test_net, None);
        let scores = local_gefura(&net, &grouping, GefuraConfig::default()).unwrap();
        let got = scores_by_index(&scores, test_net.n);
        let want = naive_gefura(&test_net, true);

        for i in 0..test_net.n {
            prop_assert!(
                (got[i] - want[i]).abs() < 1e-9,
                "node {i}: brandes {} vs naive {}",
                got[i],
                want[i]
            );
        }
    }

    #[test]
    fn parallel_matches_sequential(test_net in arb_test_net()) {
        let (net, grouping) = build(&test_net, None);
        let sequential = global_gefura(&net, &grouping, GefuraConfig::default()).unwrap();
        let parallel = global_gefura(
            &net,
            &grouping,
            GefuraConfig { parallel: true, ..Default::default() },
        )
        .unwrap();

        for (node, score) in &sequential {
            prop_assert!(
                (score - parallel[node]).abs() < 1e-9,
                "node {node}: sequential {score} vs parallel {}",
                parallel[node]
            );
        }
    }
}
