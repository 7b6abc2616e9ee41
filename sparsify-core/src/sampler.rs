//! Edge-sampling strategies used by the merge rounds.
//!
//! Both strategies answer the same question: given the members of a
//! supernode, return one edge leaving it, or report that none remains.

use rand::{Rng, SeedableRng, rngs::SmallRng};
use tracing::warn;

use crate::{
    Result,
    error::SparsifyError,
    incidence::IncidenceVectors,
    pair_index::PairIndex,
    sketch::{HashMatrix, L0Sketcher, Sketch, SketchSample},
};

/// Result of sampling one supernode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sample {
    /// A coordinate of the supernode's cut vector.
    Edge(PairIndex),
    /// The supernode has no cut edge left.
    Exhausted,
    /// The sampler failed to isolate a cut edge although one remains.
    Unresolved,
}

/// Samples an edge leaving a supernode.
///
/// `stream` is the supernode's private random stream for the current round.
/// Implementations must be pure functions of their inputs so that rounds give
/// the same answer whether supernodes are sampled sequentially or in
/// parallel.
pub trait EdgeSampler: Sync {
    /// Samples one cut edge of the node set `members`.
    ///
    /// # Errors
    /// Returns [`SparsifyError::NodeOutOfRange`] when a member is not a node
    /// of the graph.
    fn sample(&self, members: &[usize], stream: u64) -> Result<Sample>;
}

/// Samples uniformly from the exact sum of the members' incidence vectors.
#[derive(Debug, Clone, Copy)]
pub struct ExactSampler<'a> {
    vectors: &'a IncidenceVectors,
}

impl<'a> ExactSampler<'a> {
    /// Creates a sampler over `vectors`.
    #[must_use]
    pub const fn new(vectors: &'a IncidenceVectors) -> Self {
        Self { vectors }
    }
}

impl EdgeSampler for ExactSampler<'_> {
    fn sample(&self, members: &[usize], stream: u64) -> Result<Sample> {
        let cut = self.vectors.sum(members)?;
        if cut.is_zero() {
            return Ok(Sample::Exhausted);
        }
        let mut rng = SmallRng::seed_from_u64(stream);
        let position = rng.gen_range(0..cut.nnz());
        let (index, _) = cut
            .nth_nonzero(position)
            .ok_or(SparsifyError::InvariantViolation {
                invariant: "sampled position lies within the cut support",
                node: members.first().copied().unwrap_or_default(),
            })?;
        Ok(Sample::Edge(index))
    }
}

/// Samples from the sum of the members' L0 sketches.
///
/// Every node is sketched once when the sampler is built, so a sampler
/// serves exactly one round. Rows that disagree fall back to the exact
/// sampler for that supernode.
#[derive(Debug, Clone)]
pub struct SketchSampler<'a> {
    exact: ExactSampler<'a>,
    sketcher: L0Sketcher,
    node_sketches: Vec<Sketch>,
}

impl<'a> SketchSampler<'a> {
    /// Sketches every node of `vectors` with a hash matrix of `rows` rows
    /// derived from `round_seed`.
    ///
    /// # Errors
    /// Returns [`SparsifyError::InvalidSketchRows`] when `rows` is zero.
    pub fn new(vectors: &'a IncidenceVectors, rows: usize, round_seed: u64) -> Result<Self> {
        let matrix = HashMatrix::new(vectors.codec().pair_count(), rows, round_seed)?;
        let sketcher = L0Sketcher::new(matrix);
        let node_sketches = vectors
            .iter()
            .map(|(_, vector)| sketcher.sketch(vector))
            .collect();
        Ok(Self {
            exact: ExactSampler::new(vectors),
            sketcher,
            node_sketches,
        })
    }

    /// Returns the sketcher shared by every node of the round.
    #[must_use]
    pub const fn sketcher(&self) -> &L0Sketcher {
        &self.sketcher
    }

    /// Returns the precomputed sketch of `node`.
    #[must_use]
    pub fn node_sketch(&self, node: usize) -> Option<&Sketch> {
        node.checked_sub(1)
            .and_then(|slot| self.node_sketches.get(slot))
    }

    fn supernode_sketch(&self, members: &[usize]) -> Result<Sketch> {
        let mut total = Sketch::zero(self.sketcher.matrix().rows());
        for &node in members {
            let sketch = self
                .node_sketch(node)
                .ok_or(SparsifyError::NodeOutOfRange {
                    node,
                    node_count: self.node_sketches.len(),
                })?;
            total += sketch;
        }
        Ok(total)
    }
}

impl EdgeSampler for SketchSampler<'_> {
    fn sample(&self, members: &[usize], stream: u64) -> Result<Sample> {
        let sketch = self.supernode_sketch(members)?;
        match self.sketcher.sample(&sketch) {
            SketchSample::Recovered { index, .. } => Ok(Sample::Edge(index)),
            SketchSample::Empty => Ok(Sample::Exhausted),
            SketchSample::Unresolved => Ok(Sample::Unresolved),
            SketchSample::Inconsistent { sparse, dense } => {
                warn!(
                    sparse = sparse.get(),
                    dense = dense.get(),
                    members = members.len(),
                    "sketch rows disagree; sampling supernode exactly"
                );
                record_inconsistency();
                self.exact.sample(members, stream)
            }
        }
    }
}

#[cfg(feature = "metrics")]
fn record_inconsistency() {
    metrics::counter!("sparsify_sketch_inconsistencies_total").increment(1);
}

#[cfg(not(feature = "metrics"))]
fn record_inconsistency() {}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::{fixture, rstest};
    use sparsify_test_support::tracing::RecordingLayer;
    use tracing::Level;

    use crate::incidence::{Edge, build_incidence_vectors};
    use crate::sketch::SketchRow;

    #[fixture]
    fn two_pairs() -> IncidenceVectors {
        build_incidence_vectors(4, &[Edge::new(1, 2), Edge::new(3, 4)])
            .expect("two disjoint edges are valid")
    }

    #[rstest]
    fn exact_sampler_returns_the_only_cut_edge(two_pairs: IncidenceVectors) {
        let sampler = ExactSampler::new(&two_pairs);
        let expected = two_pairs.codec().encode(1, 2).expect("valid pair");
        for stream in 0..16 {
            assert_eq!(sampler.sample(&[1], stream), Ok(Sample::Edge(expected)));
        }
    }

    #[rstest]
    fn exact_sampler_reports_closed_supernodes(two_pairs: IncidenceVectors) {
        let sampler = ExactSampler::new(&two_pairs);
        assert_eq!(sampler.sample(&[1, 2], 7), Ok(Sample::Exhausted));
        assert_eq!(sampler.sample(&[], 7), Ok(Sample::Exhausted));
    }

    #[rstest]
    fn sketch_sampler_agrees_on_single_cut_edges(two_pairs: IncidenceVectors) {
        let expected = two_pairs.codec().encode(3, 4).expect("valid pair");
        for seed in 0..16 {
            let sampler = SketchSampler::new(&two_pairs, 4, seed).expect("rows are non-zero");
            assert_eq!(sampler.sample(&[4], seed), Ok(Sample::Edge(expected)));
            assert_eq!(sampler.sample(&[3, 4], seed), Ok(Sample::Exhausted));
        }
    }

    #[rstest]
    fn sketch_sampler_reports_unresolved_supernodes() {
        let star = build_incidence_vectors(
            5,
            &[Edge::new(1, 2), Edge::new(1, 3), Edge::new(1, 4), Edge::new(1, 5)],
        )
        .expect("star is valid");
        // A single dense row cannot isolate one of four spokes.
        let sampler = SketchSampler::new(&star, 1, 9).expect("rows are non-zero");
        assert_eq!(sampler.sample(&[1], 9), Ok(Sample::Unresolved));
        assert_eq!(sampler.sample(&[1, 2, 3, 4, 5], 9), Ok(Sample::Exhausted));
    }

    #[test]
    fn disagreeing_sketch_falls_back_to_exact_sampling() {
        let vectors = build_incidence_vectors(12, &[Edge::new(1, 2)]).expect("valid edge");
        let expected = vectors.codec().encode(1, 2).expect("valid pair");
        let mut sampler = SketchSampler::new(&vectors, 3, 5).expect("rows are non-zero");

        let matrix = *sampler.sketcher().matrix();
        let deep = (0..matrix.columns())
            .map(PairIndex::new)
            .find(|&column| matrix.retains(1, column))
            .expect("some column survives row 1");
        let shallow = (0..matrix.columns())
            .map(PairIndex::new)
            .find(|&column| column != deep)
            .expect("another column exists");
        let mut dense_row = SketchRow::default();
        dense_row.accumulate(shallow, 1, matrix.fingerprint(shallow));
        let mut sparse_row = SketchRow::default();
        sparse_row.accumulate(deep, 1, matrix.fingerprint(deep));
        sampler.node_sketches[0] =
            Sketch::from_rows(vec![dense_row, sparse_row, SketchRow::default()]);

        let (sample, layer) = RecordingLayer::capture(|| sampler.sample(&[1], 3));
        assert_eq!(sample, Ok(Sample::Edge(expected)));

        let warnings = layer.events_at(Level::WARN);
        assert_eq!(warnings.len(), 1);
        let warning = &warnings[0];
        assert_eq!(
            warning.fields.get("message").map(String::as_str),
            Some("sketch rows disagree; sampling supernode exactly")
        );
        assert_eq!(
            warning.fields.get("sparse"),
            Some(&deep.get().to_string())
        );
        assert_eq!(
            warning.fields.get("dense"),
            Some(&shallow.get().to_string())
        );
    }

    #[rstest]
    fn samplers_reject_unknown_members(two_pairs: IncidenceVectors) {
        let expected = Err(SparsifyError::NodeOutOfRange {
            node: 9,
            node_count: 4,
        });
        assert_eq!(ExactSampler::new(&two_pairs).sample(&[9], 0), expected);
        let sketch = SketchSampler::new(&two_pairs, 3, 0).expect("rows are non-zero");
        assert_eq!(sketch.sample(&[9], 0), expected);
    }

    #[test]
    fn exact_sampler_reaches_every_cut_edge() {
        let star = build_incidence_vectors(
            5,
            &[Edge::new(1, 2), Edge::new(1, 3), Edge::new(1, 4), Edge::new(1, 5)],
        )
        .expect("star is valid");
        let sampler = ExactSampler::new(&star);
        let mut seen = std::collections::BTreeSet::new();
        for stream in 0..256 {
            if let Ok(Sample::Edge(index)) = sampler.sample(&[1], stream) {
                seen.insert(index);
            }
        }
        assert_eq!(seen.len(), 4, "uniform choice should cover every spoke");
    }

    #[test]
    fn sketch_sampler_rejects_zero_rows() {
        let vectors = build_incidence_vectors(2, &[Edge::new(1, 2)]).expect("valid edge");
        assert!(matches!(
            SketchSampler::new(&vectors, 0, 1),
            Err(SparsifyError::InvalidSketchRows { got: 0 })
        ));
    }
}
