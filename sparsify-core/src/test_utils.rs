//! Shared test utilities for `sparsify-core`.

use std::collections::BTreeMap;

use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;
use rand::{Rng, SeedableRng, rngs::SmallRng};
use sparsify_test_support::ci::property_test_profile::ProptestRunProfile;

use crate::incidence::Edge;

/// Builds a standard proptest configuration from the shared CI profile.
///
/// This keeps property suites aligned on the same `SPARSIFY_PBT_CASES` and
/// `SPARSIFY_PBT_FORK` interpretation.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// Generates simple graphs (no self-loops, no parallel edges) with
/// `1..=max_nodes` nodes and a density drawn per case, so both connected and
/// fragmented graphs appear.
pub(crate) fn simple_graph_strategy(
    max_nodes: usize,
) -> impl Strategy<Value = (usize, Vec<Edge>)> {
    (1..=max_nodes, any::<u64>()).prop_map(|(node_count, seed)| {
        let mut rng = SmallRng::seed_from_u64(seed);
        random_simple_graph(node_count, &mut rng)
    })
}

/// Draws a simple graph on `node_count` nodes with a random edge probability.
pub(crate) fn random_simple_graph(node_count: usize, rng: &mut SmallRng) -> (usize, Vec<Edge>) {
    let probability: f64 = rng.gen_range(0.0..=0.35);
    let mut edges = Vec::new();
    for left in 1..=node_count {
        for right in (left + 1)..=node_count {
            if rng.gen_bool(probability) {
                // Randomise orientation so canonicalisation is exercised.
                if rng.gen_bool(0.5) {
                    edges.push(Edge::new(left, right));
                } else {
                    edges.push(Edge::new(right, left));
                }
            }
        }
    }
    (node_count, edges)
}

/// Sequential union-find oracle returning the true connected components,
/// each sorted and ordered by smallest member.
pub(crate) fn oracle_components(node_count: usize, edges: &[Edge]) -> Vec<Vec<usize>> {
    let mut parent: Vec<usize> = (0..=node_count).collect();
    for edge in edges {
        let left = find_root(&mut parent, edge.source());
        let right = find_root(&mut parent, edge.target());
        if left != right {
            parent[right.max(left)] = left.min(right);
        }
    }

    let mut blocks: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for node in 1..=node_count {
        let root = find_root(&mut parent, node);
        blocks.entry(root).or_default().push(node);
    }
    let mut components: Vec<Vec<usize>> = blocks.into_values().collect();
    components.sort_unstable_by_key(|block| block.first().copied());
    components
}

fn find_root(parent: &mut [usize], node: usize) -> usize {
    let mut current = node;
    while parent[current] != current {
        parent[current] = parent[parent[current]];
        current = parent[current];
    }
    current
}
