//! Dense ranking of unordered node pairs.
//!
//! Every unordered pair `{i, j}` with `1 <= i < j <= n` maps to a unique rank
//! in `[0, C(n, 2))`, enumerated lexicographically by `(i, j)`. The block of
//! pairs whose smaller endpoint is `i` starts at
//! `offset(i) = (i - 1) * n - (i - 1) * i / 2`; block offsets increase
//! monotonically, so decoding is a binary search over blocks. All arithmetic
//! is integral and widened to `u128`, so indices stay exact for any `n` whose
//! pair space fits in 64 bits.

use crate::{Result, error::SparsifyError};

/// Rank of an unordered node pair in the lexicographic pair enumeration.
///
/// # Examples
/// ```
/// use sparsify_core::PairIndex;
///
/// let index = PairIndex::new(9);
/// assert_eq!(index.get(), 9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairIndex(u64);

impl PairIndex {
    /// Wraps a raw pair rank.
    #[rustfmt::skip]
    #[must_use]
    pub const fn new(index: u64) -> Self { Self(index) }

    /// Returns the raw pair rank.
    #[rustfmt::skip]
    #[must_use]
    pub const fn get(self) -> u64 { self.0 }
}

/// Bijection between unordered node pairs and [`PairIndex`] values for a
/// fixed node count.
///
/// # Examples
/// ```
/// use sparsify_core::PairCodec;
///
/// let codec = PairCodec::new(5)?;
/// assert_eq!(codec.pair_count(), 10);
/// assert_eq!(codec.encode(1, 2)?.get(), 0);
/// assert_eq!(codec.encode(5, 4)?.get(), 9);
/// assert_eq!(codec.decode(codec.encode(2, 4)?)?, (2, 4));
/// # Ok::<(), sparsify_core::SparsifyError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairCodec {
    node_count: usize,
    pair_count: u64,
}

impl PairCodec {
    /// Creates a codec for nodes `1..=node_count`.
    ///
    /// # Errors
    /// Returns [`SparsifyError::EmptyGraph`] when `node_count` is zero and
    /// [`SparsifyError::PairSpaceOverflow`] when `C(node_count, 2)` exceeds
    /// `u64::MAX`.
    pub fn new(node_count: usize) -> Result<Self> {
        if node_count == 0 {
            return Err(SparsifyError::EmptyGraph);
        }
        let n = node_count as u128;
        let pairs = n * (n - 1) / 2;
        let pair_count =
            u64::try_from(pairs).map_err(|_| SparsifyError::PairSpaceOverflow { node_count })?;
        Ok(Self {
            node_count,
            pair_count,
        })
    }

    /// Returns the number of nodes covered by the codec.
    #[must_use]
    pub const fn node_count(&self) -> usize {
        self.node_count
    }

    /// Returns `C(n, 2)`, the dimension of the pair space.
    #[must_use]
    pub const fn pair_count(&self) -> u64 {
        self.pair_count
    }

    /// Encodes the unordered pair `{left, right}`.
    ///
    /// # Errors
    /// Returns [`SparsifyError::NodeOutOfRange`] when either endpoint lies
    /// outside `1..=n` and [`SparsifyError::SelfLoop`] when both endpoints
    /// are equal.
    pub fn encode(&self, left: usize, right: usize) -> Result<PairIndex> {
        self.check_node(left)?;
        self.check_node(right)?;
        if left == right {
            return Err(SparsifyError::SelfLoop { node: left });
        }
        let (low, high) = if left < right {
            (left, right)
        } else {
            (right, left)
        };
        let rank = self.block_offset(low) + (high - low - 1) as u128;
        // `rank < pair_count <= u64::MAX`, so the narrowing is lossless.
        Ok(PairIndex(rank as u64))
    }

    /// Decodes `index` back into `(i, j)` with `i < j`.
    ///
    /// # Errors
    /// Returns [`SparsifyError::PairIndexOutOfRange`] when
    /// `index >= C(n, 2)`.
    pub fn decode(&self, index: PairIndex) -> Result<(usize, usize)> {
        let raw = index.get();
        if raw >= self.pair_count {
            return Err(SparsifyError::PairIndexOutOfRange {
                index: raw,
                pair_count: self.pair_count,
            });
        }
        let target = u128::from(raw);

        // Largest smaller endpoint whose block starts at or before `target`.
        let mut low = 1_usize;
        let mut high = self.node_count - 1;
        while low < high {
            let mid = low + (high - low).div_ceil(2);
            if self.block_offset(mid) <= target {
                low = mid;
            } else {
                high = mid - 1;
            }
        }

        let remainder = target - self.block_offset(low);
        // `remainder < n - low`, so it fits in `usize`.
        let high_endpoint = low + 1 + remainder as usize;
        Ok((low, high_endpoint))
    }

    fn block_offset(&self, smaller: usize) -> u128 {
        let n = self.node_count as u128;
        let preceding = (smaller - 1) as u128;
        preceding * n - preceding * (preceding + 1) / 2
    }

    fn check_node(&self, node: usize) -> Result<()> {
        if node == 0 || node > self.node_count {
            return Err(SparsifyError::NodeOutOfRange {
                node,
                node_count: self.node_count,
            });
        }
        Ok(())
    }
}

/// Encodes `{left, right}` for a graph with `node_count` nodes.
///
/// # Errors
/// Propagates the validation failures of [`PairCodec::new`] and
/// [`PairCodec::encode`].
///
/// # Examples
/// ```
/// use sparsify_core::encode_pair;
///
/// assert_eq!(encode_pair(1, 2, 5)?.get(), 0);
/// assert_eq!(encode_pair(4, 5, 5)?.get(), 9);
/// # Ok::<(), sparsify_core::SparsifyError>(())
/// ```
pub fn encode_pair(left: usize, right: usize, node_count: usize) -> Result<PairIndex> {
    PairCodec::new(node_count)?.encode(left, right)
}

/// Decodes `index` for a graph with `node_count` nodes.
///
/// # Errors
/// Propagates the validation failures of [`PairCodec::new`] and
/// [`PairCodec::decode`].
///
/// # Examples
/// ```
/// use sparsify_core::{PairIndex, decode_pair};
///
/// assert_eq!(decode_pair(PairIndex::new(9), 5)?, (4, 5));
/// # Ok::<(), sparsify_core::SparsifyError>(())
/// ```
pub fn decode_pair(index: PairIndex, node_count: usize) -> Result<(usize, usize)> {
    PairCodec::new(node_count)?.decode(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;
    use rstest::rstest;

    use crate::test_utils::suite_proptest_config;

    #[rstest]
    #[case(1, 2, 0)]
    #[case(1, 5, 3)]
    #[case(2, 3, 4)]
    #[case(3, 5, 8)]
    #[case(4, 5, 9)]
    fn encodes_lexicographic_rank_for_five_nodes(
        #[case] left: usize,
        #[case] right: usize,
        #[case] expected: u64,
    ) {
        let codec = PairCodec::new(5).expect("five nodes are valid");
        assert_eq!(codec.encode(left, right).expect("valid pair").get(), expected);
        assert_eq!(codec.encode(right, left).expect("valid pair").get(), expected);
    }

    #[test]
    fn enumerates_every_pair_in_order() {
        let codec = PairCodec::new(7).expect("seven nodes are valid");
        let mut expected = 0_u64;
        for left in 1..=7 {
            for right in (left + 1)..=7 {
                assert_eq!(codec.encode(left, right).expect("valid pair").get(), expected);
                assert_eq!(
                    codec.decode(PairIndex::new(expected)).expect("in range"),
                    (left, right)
                );
                expected += 1;
            }
        }
        assert_eq!(expected, codec.pair_count());
    }

    #[test]
    fn single_node_has_empty_pair_space() {
        let codec = PairCodec::new(1).expect("one node is valid");
        assert_eq!(codec.pair_count(), 0);
        assert!(matches!(
            codec.decode(PairIndex::new(0)),
            Err(SparsifyError::PairIndexOutOfRange {
                index: 0,
                pair_count: 0
            })
        ));
    }

    #[rstest]
    #[case::zero_node(0, 2, SparsifyError::NodeOutOfRange { node: 0, node_count: 4 })]
    #[case::beyond_range(1, 5, SparsifyError::NodeOutOfRange { node: 5, node_count: 4 })]
    #[case::self_pair(3, 3, SparsifyError::SelfLoop { node: 3 })]
    fn rejects_invalid_pairs(
        #[case] left: usize,
        #[case] right: usize,
        #[case] expected: SparsifyError,
    ) {
        let codec = PairCodec::new(4).expect("four nodes are valid");
        assert_eq!(codec.encode(left, right), Err(expected));
    }

    #[test]
    fn rejects_zero_nodes() {
        assert_eq!(PairCodec::new(0), Err(SparsifyError::EmptyGraph));
    }

    #[test]
    fn rejects_out_of_range_index() {
        assert_eq!(
            decode_pair(PairIndex::new(10), 5),
            Err(SparsifyError::PairIndexOutOfRange {
                index: 10,
                pair_count: 10
            })
        );
    }

    #[test]
    fn handles_large_node_counts_exactly() {
        let node_count = 3_000_000_usize;
        let codec = PairCodec::new(node_count).expect("pair space fits in u64");
        let last = codec
            .encode(node_count - 1, node_count)
            .expect("last pair is valid");
        assert_eq!(last.get(), codec.pair_count() - 1);
        assert_eq!(
            codec.decode(last).expect("in range"),
            (node_count - 1, node_count)
        );
        let middle = codec.encode(1_234_567, 2_345_678).expect("valid pair");
        assert_eq!(codec.decode(middle).expect("in range"), (1_234_567, 2_345_678));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn reports_pair_space_overflow() {
        let node_count = usize::MAX;
        assert_eq!(
            PairCodec::new(node_count),
            Err(SparsifyError::PairSpaceOverflow { node_count })
        );
    }

    proptest! {
        #![proptest_config(suite_proptest_config(256))]

        #[test]
        fn decode_then_encode_is_identity(node_count in 2_usize..2_000, raw in any::<u64>()) {
            let codec = PairCodec::new(node_count).expect("node count is valid");
            let index = PairIndex::new(raw % codec.pair_count());
            let (left, right) = codec.decode(index).expect("index is in range");
            prop_assert!(left < right);
            prop_assert!(right <= node_count);
            prop_assert_eq!(codec.encode(left, right).expect("decoded pair is valid"), index);
        }

        #[test]
        fn encode_then_decode_is_identity(
            node_count in 2_usize..2_000,
            left_seed in any::<usize>(),
            right_seed in any::<usize>(),
        ) {
            let left = 1 + left_seed % node_count;
            let right = 1 + right_seed % node_count;
            prop_assume!(left != right);
            let codec = PairCodec::new(node_count).expect("node count is valid");
            let index = codec.encode(left, right).expect("pair is valid");
            prop_assert!(index.get() < codec.pair_count());
            prop_assert_eq!(
                codec.decode(index).expect("index is in range"),
                (left.min(right), left.max(right))
            );
        }
    }
}
