//! Nested uniform-hash edge subsampling.
//!
//! Level `i` keeps an edge when its hash bit is set at every level
//! `1..=i`, so `G_1 ⊇ G_2 ⊇ ...` and each level keeps about half of the
//! previous one. Bits are a pure function of the edge's canonical endpoints,
//! its position in the input, the level and the seed.

use tracing::instrument;

use crate::{
    Result,
    error::SparsifyError,
    incidence::Edge,
    rng::mix_seed,
    sketch::ceil_log2,
};

/// Returns the default number of levels for `node_count` nodes:
/// `max(1, 2 * ceil(log2 n))`.
///
/// # Examples
/// ```
/// use sparsify_core::default_levels;
///
/// assert_eq!(default_levels(1), 1);
/// assert_eq!(default_levels(1_000), 20);
/// ```
#[must_use]
pub const fn default_levels(node_count: usize) -> usize {
    let levels = 2 * ceil_log2(node_count);
    if levels == 0 { 1 } else { levels }
}

/// Membership of every edge in the nested subgraphs `G_1..=G_levels`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedSubsample {
    levels: usize,
    depths: Vec<usize>,
}

impl NestedSubsample {
    /// Returns the number of levels.
    #[must_use]
    #[rustfmt::skip]
    pub const fn levels(&self) -> usize { self.levels }

    /// Returns the number of input edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.depths.len()
    }

    /// Returns the deepest level containing the edge at `position`; `0` means
    /// the edge is not in `G_1`.
    #[must_use]
    pub fn depth(&self, position: usize) -> Option<usize> {
        self.depths.get(position).copied()
    }

    /// Returns the positions of the edges in `G_level`, ascending.
    ///
    /// Levels outside `1..=levels` are empty.
    #[must_use]
    pub fn level(&self, level: usize) -> Vec<usize> {
        if level == 0 || level > self.levels {
            return Vec::new();
        }
        self.depths
            .iter()
            .enumerate()
            .filter(|(_, depth)| **depth >= level)
            .map(|(position, _)| position)
            .collect()
    }

    /// Returns `|G_i|` for `i` in `1..=levels`.
    #[must_use]
    pub fn level_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.levels];
        for &depth in &self.depths {
            for size in sizes.iter_mut().take(depth) {
                *size += 1;
            }
        }
        sizes
    }
}

/// Assigns every edge to the nested subgraphs `G_1..=G_levels`.
///
/// # Errors
/// Returns [`SparsifyError::InvalidSubsampleLevels`] when `levels` is zero.
///
/// # Examples
/// ```
/// use sparsify_core::{Edge, nested_subsample};
///
/// let edges: Vec<Edge> = (1..200).map(|node| Edge::new(node, node + 1)).collect();
/// let subsample = nested_subsample(&edges, 6, 42)?;
/// let sizes = subsample.level_sizes();
/// assert!(sizes.windows(2).all(|pair| pair[0] >= pair[1]));
/// # Ok::<(), sparsify_core::SparsifyError>(())
/// ```
#[instrument(
    name = "core.subsample",
    err,
    skip(edges),
    fields(edges = edges.len()),
)]
pub fn nested_subsample(edges: &[Edge], levels: usize, seed: u64) -> Result<NestedSubsample> {
    if levels == 0 {
        return Err(SparsifyError::InvalidSubsampleLevels { got: levels });
    }
    let depths = edges
        .iter()
        .enumerate()
        .map(|(position, edge)| edge_depth(edge, position, levels, seed))
        .collect();
    Ok(NestedSubsample { levels, depths })
}

fn edge_depth(edge: &Edge, position: usize, levels: usize, seed: u64) -> usize {
    let (low, high) = edge.canonical();
    let endpoints = mix_seed(mix_seed(seed, low as u64), high as u64);
    let identity = mix_seed(endpoints, position as u64);
    (1..=levels)
        .take_while(|&level| mix_seed(identity, level as u64) & 1 == 1)
        .count()
}
