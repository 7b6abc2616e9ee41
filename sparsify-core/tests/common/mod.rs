#![allow(dead_code, reason = "each integration test binary uses a subset of the helpers")]

use std::collections::BTreeMap;

use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;
use sparsify_core::Edge;
use sparsify_test_support::ci::property_test_profile::ProptestRunProfile;

pub fn suite_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// Multigraphs on `1..=max_nodes` nodes; parallel edges in either
/// orientation are allowed, self-loops are not.
pub fn multigraph_strategy(max_nodes: usize) -> impl Strategy<Value = (usize, Vec<Edge>)> {
    (1..=max_nodes).prop_flat_map(|node_count| {
        let pairs = prop::collection::vec((1..=node_count, 1..=node_count), 0..=2 * node_count);
        (Just(node_count), pairs).prop_map(|(node_count, pairs)| {
            let edges = pairs
                .into_iter()
                .filter(|(left, right)| left != right)
                .map(|(left, right)| Edge::new(left, right))
                .collect();
            (node_count, edges)
        })
    })
}

pub fn path(node_count: usize) -> Vec<Edge> {
    (1..node_count).map(|node| Edge::new(node, node + 1)).collect()
}

pub fn oracle_components(node_count: usize, edges: &[Edge]) -> Vec<Vec<usize>> {
    let mut parent: Vec<usize> = (0..=node_count).collect();
    for edge in edges {
        let left = root(&mut parent, edge.source());
        let right = root(&mut parent, edge.target());
        parent[left.max(right)] = left.min(right);
    }
    let mut blocks: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for node in 1..=node_count {
        let owner = root(&mut parent, node);
        blocks.entry(owner).or_default().push(node);
    }
    blocks.into_values().collect()
}

fn root(parent: &mut [usize], node: usize) -> usize {
    let mut current = node;
    while parent[current] != current {
        parent[current] = parent[parent[current]];
        current = parent[current];
    }
    current
}
