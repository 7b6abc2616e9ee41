//! Result types for connectivity runs.
//!
//! [`Components`] carries the final partition together with the spanning
//! forest edges that justified each merge and one [`RoundReport`] per
//! executed round.

use crate::incidence::Edge;

/// Counters describing one sampling-and-merge round.
///
/// # Examples
/// ```
/// use sparsify_core::{Edge, find_connected_components};
///
/// let components = find_connected_components(2, &[Edge::new(1, 2)], None)?;
/// let first = &components.rounds()[0];
/// assert_eq!(first.round(), 0);
/// assert_eq!(first.supernodes_before(), 2);
/// assert_eq!(first.supernodes_after(), 1);
/// # Ok::<(), sparsify_core::SparsifyError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundReport {
    round: usize,
    supernodes_before: usize,
    sampled: usize,
    exhausted: usize,
    unresolved: usize,
    merges: usize,
    supernodes_after: usize,
}

impl RoundReport {
    pub(crate) const fn new(
        round: usize,
        supernodes_before: usize,
        sampled: usize,
        exhausted: usize,
        unresolved: usize,
        merges: usize,
        supernodes_after: usize,
    ) -> Self {
        Self {
            round,
            supernodes_before,
            sampled,
            exhausted,
            unresolved,
            merges,
            supernodes_after,
        }
    }

    /// Zero-based round number.
    #[must_use]
    #[rustfmt::skip]
    pub const fn round(&self) -> usize { self.round }

    /// Supernodes alive when the round started.
    #[must_use]
    #[rustfmt::skip]
    pub const fn supernodes_before(&self) -> usize { self.supernodes_before }

    /// Distinct coordinates sampled during the round.
    #[must_use]
    #[rustfmt::skip]
    pub const fn sampled(&self) -> usize { self.sampled }

    /// Supernodes with no cut edge left.
    #[must_use]
    #[rustfmt::skip]
    pub const fn exhausted(&self) -> usize { self.exhausted }

    /// Supernodes whose sampler failed to isolate a cut edge.
    #[must_use]
    #[rustfmt::skip]
    pub const fn unresolved(&self) -> usize { self.unresolved }

    /// Unions performed during the merge phase.
    #[must_use]
    #[rustfmt::skip]
    pub const fn merges(&self) -> usize { self.merges }

    /// Supernodes alive after the merge phase.
    #[must_use]
    #[rustfmt::skip]
    pub const fn supernodes_after(&self) -> usize { self.supernodes_after }
}

/// Partition of `1..=n` produced by a connectivity run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Components {
    blocks: Vec<Vec<usize>>,
    assignments: Vec<usize>,
    forest: Vec<Edge>,
    rounds: Vec<RoundReport>,
    converged: bool,
}

impl Components {
    pub(crate) fn new(
        blocks: Vec<Vec<usize>>,
        forest: Vec<Edge>,
        rounds: Vec<RoundReport>,
        converged: bool,
    ) -> Self {
        let node_count = blocks.iter().map(Vec::len).sum();
        let mut assignments = vec![0; node_count];
        for (component, block) in blocks.iter().enumerate() {
            for &node in block {
                if let Some(slot) = node.checked_sub(1).and_then(|slot| assignments.get_mut(slot)) {
                    *slot = component;
                }
            }
        }
        Self {
            blocks,
            assignments,
            forest,
            rounds,
            converged,
        }
    }

    /// Returns the blocks, each sorted, ordered by smallest member.
    #[must_use]
    #[rustfmt::skip]
    pub fn blocks(&self) -> &[Vec<usize>] { &self.blocks }

    /// Returns the number of blocks.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.blocks.len()
    }

    /// Returns the index into [`Self::blocks`] of the block holding `node`.
    #[must_use]
    pub fn component_of(&self, node: usize) -> Option<usize> {
        node.checked_sub(1)
            .and_then(|slot| self.assignments.get(slot))
            .copied()
    }

    /// Returns the sampled edges that caused each merge, in merge order.
    ///
    /// They form a spanning forest of the blocks that were merged.
    #[must_use]
    #[rustfmt::skip]
    pub fn forest_edges(&self) -> &[Edge] { &self.forest }

    /// Returns one report per executed round.
    #[must_use]
    #[rustfmt::skip]
    pub fn rounds(&self) -> &[RoundReport] { &self.rounds }

    /// Returns the number of executed rounds.
    #[must_use]
    pub fn round_count(&self) -> usize {
        self.rounds.len()
    }

    /// Returns `true` when the run stopped because every supernode was
    /// exhausted. A run that ran out of rounds, or stopped on a round where
    /// some sampler failed, has not converged.
    #[must_use]
    #[rustfmt::skip]
    pub const fn converged(&self) -> bool { self.converged }

    /// Consumes the result, returning the blocks.
    #[must_use]
    pub fn into_blocks(self) -> Vec<Vec<usize>> {
        self.blocks
    }
}
