//! Synthetic graph source for benchmarking.
//!
//! Provides [`SyntheticGraph`], an [`EdgeSource`] whose nodes are dealt
//! round-robin into a fixed number of planted components. Each component is
//! wired by a random Hamiltonian path plus extra random intra-component edges,
//! so the expected partition is known up front. Generation is seeded for
//! reproducibility across benchmark runs.

use rand::{Rng, SeedableRng, rngs::SmallRng, seq::SliceRandom};
use sparsify_core::{Edge, EdgeSource};

/// Errors that may occur during synthetic graph generation.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum SyntheticError {
    /// The requested node count was zero.
    #[error("node count must be greater than zero")]
    ZeroNodes,
    /// The requested component count was zero.
    #[error("component count must be greater than zero")]
    ZeroComponents,
    /// More components than nodes were requested.
    #[error("cannot plant {components} components on {node_count} nodes")]
    TooManyComponents {
        /// Requested component count.
        components: usize,
        /// Requested node count.
        node_count: usize,
    },
}

/// Configuration for synthetic graph generation.
#[derive(Clone, Debug)]
pub struct SyntheticGraphConfig {
    /// Number of nodes to generate.
    pub node_count: usize,
    /// Number of planted connected components.
    pub components: usize,
    /// Random intra-component edges added per node on top of the spanning path.
    pub extra_edges_per_node: usize,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

/// A seeded graph with a planted component structure.
///
/// # Examples
///
/// ```
/// use sparsify_benches::source::{SyntheticGraph, SyntheticGraphConfig};
/// use sparsify_core::EdgeSource;
///
/// let config = SyntheticGraphConfig {
///     node_count: 10,
///     components: 2,
///     extra_edges_per_node: 1,
///     seed: 42,
/// };
/// let graph = SyntheticGraph::generate(&config).expect("valid config");
/// assert_eq!(graph.node_count(), 10);
/// assert_eq!(graph.components(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct SyntheticGraph {
    node_count: usize,
    components: usize,
    edges: Vec<Edge>,
}

impl SyntheticGraph {
    /// Generates the graph eagerly from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SyntheticError::ZeroNodes`], [`SyntheticError::ZeroComponents`]
    /// or [`SyntheticError::TooManyComponents`] for unusable configurations.
    pub fn generate(config: &SyntheticGraphConfig) -> Result<Self, SyntheticError> {
        if config.node_count == 0 {
            return Err(SyntheticError::ZeroNodes);
        }
        if config.components == 0 {
            return Err(SyntheticError::ZeroComponents);
        }
        if config.components > config.node_count {
            return Err(SyntheticError::TooManyComponents {
                components: config.components,
                node_count: config.node_count,
            });
        }

        let mut rng = SmallRng::seed_from_u64(config.seed);
        let mut groups: Vec<Vec<usize>> = vec![Vec::new(); config.components];
        let mut slot = 0;
        for node in 1..=config.node_count {
            if let Some(group) = groups.get_mut(slot) {
                group.push(node);
            }
            slot += 1;
            if slot == config.components {
                slot = 0;
            }
        }

        let mut edges = Vec::new();
        for group in &mut groups {
            group.shuffle(&mut rng);
            edges.extend(
                group
                    .windows(2)
                    .filter_map(|pair| match pair {
                        [left, right] => Some(Edge::new(*left, *right)),
                        _ => None,
                    }),
            );
            wire_extra_edges(group, config.extra_edges_per_node, &mut rng, &mut edges);
        }
        edges.shuffle(&mut rng);

        Ok(Self {
            node_count: config.node_count,
            components: config.components,
            edges,
        })
    }

    /// Returns the number of planted components.
    #[must_use]
    pub const fn components(&self) -> usize {
        self.components
    }
}

fn wire_extra_edges(group: &[usize], per_node: usize, rng: &mut SmallRng, edges: &mut Vec<Edge>) {
    let size = group.len();
    if size < 2 {
        return;
    }
    for _ in 0..size.saturating_mul(per_node) {
        let left = rng.gen_range(0..size);
        let mut right = rng.gen_range(0..size - 1);
        if right >= left {
            right += 1;
        }
        if let (Some(&source), Some(&target)) = (group.get(left), group.get(right)) {
            edges.push(Edge::new(source, target));
        }
    }
}

impl EdgeSource for SyntheticGraph {
    #[expect(
        clippy::unnecessary_literal_bound,
        reason = "EdgeSource constrains the return type to &str"
    )]
    fn name(&self) -> &str {
        "synthetic"
    }

    fn node_count(&self) -> usize {
        self.node_count
    }

    fn edges(&self) -> &[Edge] {
        &self.edges
    }
}
