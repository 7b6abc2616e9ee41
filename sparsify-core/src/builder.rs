//! Builder utilities for configuring connectivity runs.
//!
//! Exposes the sampling and execution strategy selection surface and the
//! validation applied before constructing [`Connectivity`] instances.

use std::num::NonZeroUsize;

use crate::{Result, connectivity::Connectivity, error::SparsifyError, rng::DEFAULT_SEED};

/// Selects how each supernode's outgoing edge is sampled.
///
/// # Examples
/// ```
/// use sparsify_core::SamplingStrategy;
///
/// assert_eq!(SamplingStrategy::default(), SamplingStrategy::Exact);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SamplingStrategy {
    /// Sum member incidence vectors and pick a uniform nonzero coordinate.
    #[default]
    Exact,
    /// Sum member L0 sketches and recover a surviving coordinate.
    Sketch,
}

/// Indicates how sampling within a round is scheduled.
///
/// `Auto` fans out across the Rayon pool when the `parallel` feature is
/// compiled in and runs sequentially otherwise. Results never depend on the
/// choice.
///
/// # Examples
/// ```
/// use sparsify_core::ExecutionStrategy;
///
/// let strategy = ExecutionStrategy::Auto;
/// assert!(matches!(strategy, ExecutionStrategy::Auto));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ExecutionStrategy {
    /// Let the library pick.
    #[default]
    Auto,
    /// Sample supernodes one after another on the calling thread.
    Sequential,
    /// Sample supernodes on the Rayon pool.
    Parallel,
}

/// Configures and constructs [`Connectivity`] instances.
///
/// # Examples
/// ```
/// use sparsify_core::{ConnectivityBuilder, SamplingStrategy};
///
/// let connectivity = ConnectivityBuilder::new()
///     .with_sampling_strategy(SamplingStrategy::Sketch)
///     .with_seed(7)
///     .with_round_budget(12)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(connectivity.sampling_strategy(), SamplingStrategy::Sketch);
/// assert_eq!(connectivity.round_budget().map(|budget| budget.get()), Some(12));
/// ```
#[derive(Debug, Clone)]
pub struct ConnectivityBuilder {
    sampling_strategy: SamplingStrategy,
    execution_strategy: ExecutionStrategy,
    seed: u64,
    round_budget: Option<usize>,
    sketch_rows: Option<usize>,
}

impl Default for ConnectivityBuilder {
    fn default() -> Self {
        Self {
            sampling_strategy: SamplingStrategy::Exact,
            execution_strategy: ExecutionStrategy::Auto,
            seed: DEFAULT_SEED,
            round_budget: None,
            sketch_rows: None,
        }
    }
}

impl ConnectivityBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use sparsify_core::{ConnectivityBuilder, ExecutionStrategy, SamplingStrategy};
    ///
    /// let builder = ConnectivityBuilder::new();
    /// assert_eq!(builder.sampling_strategy(), SamplingStrategy::Exact);
    /// assert_eq!(builder.execution_strategy(), ExecutionStrategy::Auto);
    /// assert_eq!(builder.round_budget(), None);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sampling strategy.
    #[must_use]
    pub const fn with_sampling_strategy(mut self, strategy: SamplingStrategy) -> Self {
        self.sampling_strategy = strategy;
        self
    }

    /// Returns the configured sampling strategy.
    #[must_use]
    pub const fn sampling_strategy(&self) -> SamplingStrategy {
        self.sampling_strategy
    }

    /// Sets the execution strategy.
    ///
    /// # Examples
    /// ```
    /// use sparsify_core::{ConnectivityBuilder, ExecutionStrategy};
    ///
    /// let builder =
    ///     ConnectivityBuilder::new().with_execution_strategy(ExecutionStrategy::Sequential);
    /// assert_eq!(builder.execution_strategy(), ExecutionStrategy::Sequential);
    /// ```
    #[must_use]
    pub const fn with_execution_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.execution_strategy = strategy;
        self
    }

    /// Returns the configured execution strategy.
    #[must_use]
    pub const fn execution_strategy(&self) -> ExecutionStrategy {
        self.execution_strategy
    }

    /// Sets the base seed every round seed is derived from.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Returns the configured base seed.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Caps the number of rounds. Defaults to `max(1, ceil(log2 n))`.
    #[must_use]
    pub const fn with_round_budget(mut self, rounds: usize) -> Self {
        self.round_budget = Some(rounds);
        self
    }

    /// Returns the explicit round budget, if any.
    #[must_use]
    pub const fn round_budget(&self) -> Option<usize> {
        self.round_budget
    }

    /// Overrides the sketch height. Defaults to `ceil(log2 n) + 2`.
    #[must_use]
    pub const fn with_sketch_rows(mut self, rows: usize) -> Self {
        self.sketch_rows = Some(rows);
        self
    }

    /// Returns the explicit sketch height, if any.
    #[must_use]
    pub const fn sketch_rows(&self) -> Option<usize> {
        self.sketch_rows
    }

    /// Validates the configuration and constructs a [`Connectivity`] instance.
    ///
    /// # Errors
    /// Returns [`SparsifyError::InvalidRoundBudget`] for a zero round budget
    /// and [`SparsifyError::InvalidSketchRows`] for zero sketch rows.
    ///
    /// # Examples
    /// ```
    /// use sparsify_core::{ConnectivityBuilder, SparsifyError};
    ///
    /// let err = ConnectivityBuilder::new().with_round_budget(0).build().unwrap_err();
    /// assert_eq!(err, SparsifyError::InvalidRoundBudget { got: 0 });
    /// ```
    pub fn build(self) -> Result<Connectivity> {
        let round_budget = self
            .round_budget
            .map(|got| NonZeroUsize::new(got).ok_or(SparsifyError::InvalidRoundBudget { got }))
            .transpose()?;
        let sketch_rows = self
            .sketch_rows
            .map(|got| NonZeroUsize::new(got).ok_or(SparsifyError::InvalidSketchRows { got }))
            .transpose()?;

        Ok(Connectivity::new(
            self.sampling_strategy,
            self.execution_strategy,
            self.seed,
            round_budget,
            sketch_rows,
        ))
    }
}
