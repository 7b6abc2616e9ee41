//! Oriented incidence vectors over the pair-index space.
//!
//! Node `v` owns one sparse vector. An edge `{a, b}` with `a < b` writes `+1`
//! at `index(a, b)` in vector `a` and `-1` in vector `b`, so summing the
//! vectors of any node set cancels internal edges and leaves exactly the cut
//! edges of that set.

use std::{
    collections::BTreeMap,
    ops::{Add, AddAssign},
};

use tracing::instrument;

use crate::{
    Result,
    error::SparsifyError,
    pair_index::{PairCodec, PairIndex},
};

/// An undirected edge between two node ids.
///
/// # Examples
/// ```
/// use sparsify_core::Edge;
///
/// let edge = Edge::new(4, 2);
/// assert_eq!(edge.canonical(), (2, 4));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    source: usize,
    target: usize,
}

impl Edge {
    /// Creates an edge between `source` and `target`.
    #[must_use]
    pub const fn new(source: usize, target: usize) -> Self {
        Self { source, target }
    }

    /// Returns the endpoint the edge was created with first.
    #[must_use]
    #[rustfmt::skip]
    pub const fn source(&self) -> usize { self.source }

    /// Returns the endpoint the edge was created with second.
    #[must_use]
    #[rustfmt::skip]
    pub const fn target(&self) -> usize { self.target }

    /// Returns the endpoints ordered as `(min, max)`.
    #[must_use]
    pub const fn canonical(&self) -> (usize, usize) {
        if self.source <= self.target {
            (self.source, self.target)
        } else {
            (self.target, self.source)
        }
    }
}

/// Signed sparse vector over [`PairIndex`] coordinates.
///
/// Only nonzero entries are stored, in ascending coordinate order. Adding two
/// vectors drops every coordinate that cancels to zero.
///
/// # Examples
/// ```
/// use sparsify_core::{PairIndex, SparseVector};
///
/// let mut left = SparseVector::new();
/// left.add_entry(PairIndex::new(3), 1);
/// let mut right = SparseVector::new();
/// right.add_entry(PairIndex::new(3), -1);
/// right.add_entry(PairIndex::new(7), -1);
///
/// let sum = left + &right;
/// assert_eq!(sum.nnz(), 1);
/// assert_eq!(sum.get(PairIndex::new(7)), -1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SparseVector {
    entries: BTreeMap<PairIndex, i64>,
}

impl SparseVector {
    /// Creates an empty vector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `delta` to the coordinate `index`, removing it if it reaches zero.
    pub fn add_entry(&mut self, index: PairIndex, delta: i64) {
        if delta == 0 {
            return;
        }
        let value = self.entries.entry(index).or_insert(0);
        *value += delta;
        if *value == 0 {
            self.entries.remove(&index);
        }
    }

    /// Returns the value at `index` (zero when absent).
    #[must_use]
    pub fn get(&self, index: PairIndex) -> i64 {
        self.entries.get(&index).copied().unwrap_or(0)
    }

    /// Returns the number of nonzero coordinates.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when every coordinate is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates the nonzero coordinates in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (PairIndex, i64)> + '_ {
        self.entries.iter().map(|(index, value)| (*index, *value))
    }

    /// Returns the `position`-th nonzero coordinate in ascending order.
    #[must_use]
    pub fn nth_nonzero(&self, position: usize) -> Option<(PairIndex, i64)> {
        self.iter().nth(position)
    }
}

impl AddAssign<&SparseVector> for SparseVector {
    fn add_assign(&mut self, other: &SparseVector) {
        for (index, value) in other.iter() {
            self.add_entry(index, value);
        }
    }
}

impl Add<&SparseVector> for SparseVector {
    type Output = SparseVector;

    fn add(mut self, other: &SparseVector) -> SparseVector {
        self += other;
        self
    }
}

/// One incidence vector per node, indexed by node id `1..=n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncidenceVectors {
    codec: PairCodec,
    vectors: Vec<SparseVector>,
}

impl IncidenceVectors {
    /// Builds the oriented incidence vectors of a graph.
    ///
    /// Parallel edges accumulate into a signed multiplicity.
    ///
    /// # Errors
    /// Returns [`SparsifyError::EmptyGraph`] when `node_count` is zero,
    /// [`SparsifyError::NodeOutOfRange`] when an edge references a node
    /// outside `1..=node_count`, and [`SparsifyError::SelfLoop`] when an
    /// edge joins a node to itself.
    ///
    /// # Examples
    /// ```
    /// use sparsify_core::{Edge, IncidenceVectors};
    ///
    /// let vectors = IncidenceVectors::build(3, &[Edge::new(1, 2), Edge::new(2, 3)])?;
    /// let cut = vectors.sum(&[1, 2])?;
    /// assert_eq!(cut.nnz(), 1);
    /// # Ok::<(), sparsify_core::SparsifyError>(())
    /// ```
    #[instrument(
        name = "core.incidence",
        err,
        skip(edges),
        fields(nodes = node_count, edges = edges.len()),
    )]
    pub fn build(node_count: usize, edges: &[Edge]) -> Result<Self> {
        let codec = PairCodec::new(node_count)?;
        let mut vectors = vec![SparseVector::new(); node_count];
        for edge in edges {
            let (low, high) = edge.canonical();
            let index = codec.encode(low, high)?;
            vectors[low - 1].add_entry(index, 1);
            vectors[high - 1].add_entry(index, -1);
        }
        Ok(Self { codec, vectors })
    }

    /// Returns the codec shared by every vector.
    #[must_use]
    pub const fn codec(&self) -> &PairCodec {
        &self.codec
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.vectors.len()
    }

    /// Returns the vector of `node`, if it exists.
    #[must_use]
    pub fn vector(&self, node: usize) -> Option<&SparseVector> {
        node.checked_sub(1).and_then(|slot| self.vectors.get(slot))
    }

    /// Iterates `(node, vector)` pairs in node order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &SparseVector)> + '_ {
        self.vectors
            .iter()
            .enumerate()
            .map(|(slot, vector)| (slot + 1, vector))
    }

    /// Sums the vectors of `members`, exposing exactly the cut edges of the set.
    ///
    /// # Errors
    /// Returns [`SparsifyError::NodeOutOfRange`] when a member is not a node
    /// of the graph.
    pub fn sum(&self, members: &[usize]) -> Result<SparseVector> {
        let mut total = SparseVector::new();
        for &node in members {
            let vector = self.vector(node).ok_or(SparsifyError::NodeOutOfRange {
                node,
                node_count: self.node_count(),
            })?;
            total += vector;
        }
        Ok(total)
    }
}

/// Builds one incidence vector per node of the graph.
///
/// # Errors
/// See [`IncidenceVectors::build`].
pub fn build_incidence_vectors(node_count: usize, edges: &[Edge]) -> Result<IncidenceVectors> {
    IncidenceVectors::build(node_count, edges)
}

#[cfg(test)]
mod tests;
