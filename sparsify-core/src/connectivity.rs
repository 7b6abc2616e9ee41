//! Connectivity orchestration.
//!
//! Provides the [`Connectivity`] entry point, the backend selection for
//! in-round sampling, and the [`find_connected_components`] shorthand.

use std::num::NonZeroUsize;

use tracing::{info, instrument, warn};

use crate::{
    Result,
    builder::{ConnectivityBuilder, ExecutionStrategy, SamplingStrategy},
    error::SparsifyError,
    forest::{RoundPlan, grow_forest},
    incidence::{Edge, IncidenceVectors},
    result::Components,
    sampler::{ExactSampler, SketchSampler},
    sketch::{ceil_log2, default_sketch_rows},
    source::EdgeSource,
};

/// Returns the default round budget for `node_count` nodes:
/// `max(1, ceil(log2 n))`.
///
/// # Examples
/// ```
/// use sparsify_core::default_round_budget;
///
/// assert_eq!(default_round_budget(1), 1);
/// assert_eq!(default_round_budget(4), 2);
/// assert_eq!(default_round_budget(5), 3);
/// ```
#[must_use]
pub const fn default_round_budget(node_count: usize) -> usize {
    let rounds = ceil_log2(node_count);
    if rounds == 0 { 1 } else { rounds }
}

/// Entry point for computing connected components.
///
/// # Examples
/// ```
/// use sparsify_core::{ConnectivityBuilder, Edge, EdgeList};
///
/// let graph = EdgeList::new("two pairs", 4, vec![Edge::new(1, 2), Edge::new(3, 4)]);
/// let components = ConnectivityBuilder::new()
///     .with_seed(3)
///     .build()?
///     .run(&graph)?;
/// assert_eq!(components.blocks(), &[vec![1, 2], vec![3, 4]]);
/// # Ok::<(), sparsify_core::SparsifyError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Connectivity {
    sampling_strategy: SamplingStrategy,
    execution_strategy: ExecutionStrategy,
    seed: u64,
    round_budget: Option<NonZeroUsize>,
    sketch_rows: Option<NonZeroUsize>,
}

impl Connectivity {
    pub(crate) const fn new(
        sampling_strategy: SamplingStrategy,
        execution_strategy: ExecutionStrategy,
        seed: u64,
        round_budget: Option<NonZeroUsize>,
        sketch_rows: Option<NonZeroUsize>,
    ) -> Self {
        Self {
            sampling_strategy,
            execution_strategy,
            seed,
            round_budget,
            sketch_rows,
        }
    }

    /// Returns the sampling strategy.
    #[must_use]
    #[rustfmt::skip]
    pub const fn sampling_strategy(&self) -> SamplingStrategy { self.sampling_strategy }

    /// Returns the execution strategy.
    #[must_use]
    #[rustfmt::skip]
    pub const fn execution_strategy(&self) -> ExecutionStrategy { self.execution_strategy }

    /// Returns the base seed.
    #[must_use]
    #[rustfmt::skip]
    pub const fn seed(&self) -> u64 { self.seed }

    /// Returns the explicit round budget, if one was configured.
    #[must_use]
    #[rustfmt::skip]
    pub const fn round_budget(&self) -> Option<NonZeroUsize> { self.round_budget }

    /// Returns the explicit sketch height, if one was configured.
    #[must_use]
    #[rustfmt::skip]
    pub const fn sketch_rows(&self) -> Option<NonZeroUsize> { self.sketch_rows }

    /// Returns the round budget applied to a graph with `node_count` nodes.
    #[must_use]
    pub fn effective_round_budget(&self, node_count: usize) -> usize {
        self.round_budget
            .map_or_else(|| default_round_budget(node_count), NonZeroUsize::get)
    }

    /// Returns the sketch height applied to a graph with `node_count` nodes.
    #[must_use]
    pub fn effective_sketch_rows(&self, node_count: usize) -> usize {
        self.sketch_rows
            .map_or_else(|| default_sketch_rows(node_count), NonZeroUsize::get)
    }

    /// Computes the connected components of `source`.
    ///
    /// # Errors
    /// Returns [`SparsifyError::EmptyGraph`] when the graph has no nodes,
    /// [`SparsifyError::NodeOutOfRange`] or [`SparsifyError::SelfLoop`] for
    /// invalid edges, [`SparsifyError::PairSpaceOverflow`] when the pair space
    /// does not fit in 64 bits, and [`SparsifyError::BackendUnavailable`] when
    /// parallel execution is requested without the `parallel` feature.
    pub fn run<S: EdgeSource>(&self, source: &S) -> Result<Components> {
        self.run_edges(source.name(), source.node_count(), source.edges())
    }

    #[instrument(
        name = "core.run",
        err,
        skip(self, graph, node_count, edges),
        fields(
            graph = %graph,
            nodes = node_count,
            edges = edges.len(),
            strategy = ?self.sampling_strategy,
            execution = ?self.execution_strategy,
            round_budget = self.effective_round_budget(node_count),
        ),
    )]
    pub(crate) fn run_edges(
        &self,
        graph: &str,
        node_count: usize,
        edges: &[Edge],
    ) -> Result<Components> {
        if node_count == 0 {
            warn!(graph, "graph has no nodes, returning error");
            return Err(SparsifyError::EmptyGraph);
        }
        let parallel = self.resolve_parallel()?;
        let vectors = IncidenceVectors::build(node_count, edges)?;
        let plan = RoundPlan {
            round_budget: self.effective_round_budget(node_count),
            base_seed: self.seed,
            parallel,
        };

        let components = match self.sampling_strategy {
            SamplingStrategy::Exact => {
                grow_forest(vectors.codec(), plan, |_| Ok(ExactSampler::new(&vectors)))?
            }
            SamplingStrategy::Sketch => {
                let rows = self.effective_sketch_rows(node_count);
                grow_forest(vectors.codec(), plan, |round_seed| {
                    SketchSampler::new(&vectors, rows, round_seed)
                })?
            }
        };

        info!(
            components = components.component_count(),
            rounds = components.round_count(),
            converged = components.converged(),
            "connectivity run completed"
        );
        Ok(components)
    }

    #[cfg(feature = "parallel")]
    const fn resolve_parallel(&self) -> Result<bool> {
        match self.execution_strategy {
            ExecutionStrategy::Auto | ExecutionStrategy::Parallel => Ok(true),
            ExecutionStrategy::Sequential => Ok(false),
        }
    }

    #[cfg(not(feature = "parallel"))]
    const fn resolve_parallel(&self) -> Result<bool> {
        match self.execution_strategy {
            ExecutionStrategy::Auto | ExecutionStrategy::Sequential => Ok(false),
            ExecutionStrategy::Parallel => Err(SparsifyError::BackendUnavailable {
                requested: ExecutionStrategy::Parallel,
            }),
        }
    }
}

/// Computes connected components with the exact sampler and the default
/// seed.
///
/// # Errors
/// Returns [`SparsifyError::InvalidRoundBudget`] for `Some(0)` and the
/// validation errors of [`Connectivity::run`].
///
/// # Examples
/// ```
/// use sparsify_core::{Edge, find_connected_components};
///
/// let path = [Edge::new(1, 2), Edge::new(2, 3), Edge::new(3, 4)];
/// let components = find_connected_components(4, &path, None)?;
/// assert_eq!(components.blocks(), &[vec![1, 2, 3, 4]]);
/// # Ok::<(), sparsify_core::SparsifyError>(())
/// ```
pub fn find_connected_components(
    node_count: usize,
    edges: &[Edge],
    round_budget: Option<usize>,
) -> Result<Components> {
    let builder = round_budget.map_or_else(ConnectivityBuilder::new, |rounds| {
        ConnectivityBuilder::new().with_round_budget(rounds)
    });
    builder.build()?.run_edges("edges", node_count, edges)
}
