//! Linear L0 sketches over the pair-index space.
//!
//! A [`HashMatrix`] assigns each coordinate a level: the number of leading
//! zero bits of a seeded 64-bit hash. Row `r` retains the coordinates whose
//! level is at least `r`, so it keeps a `2^-r` fraction of the columns and
//! rows are nested. The matrix is never materialised; membership is computed
//! on demand.
//!
//! A [`Sketch`] stores, per row, the fingerprint sum `D`, the index-weighted
//! sum `S` and the value sum `C` of the retained entries. All three are linear
//! in the input vector, so the sketch of a supernode is the sum of its
//! members' sketches and internal edges cancel exactly as they do in the
//! incidence vectors.

use std::ops::{Add, AddAssign};

use crate::{
    Result,
    error::SparsifyError,
    incidence::SparseVector,
    pair_index::PairIndex,
    rng::{mix_seed, splitmix64},
};

const FINGERPRINT_STREAM: u64 = 0xF1A6_E4B1_7C0D_5EA1;

/// Rounds `value` up to the next power-of-two exponent (`0` for `0` and `1`).
#[must_use]
pub(crate) const fn ceil_log2(value: usize) -> usize {
    if value <= 1 {
        0
    } else {
        (usize::BITS - (value - 1).leading_zeros()) as usize
    }
}

/// Returns the default sketch height for a graph with `node_count` nodes:
/// `ceil(log2 n) + 2`.
///
/// # Examples
/// ```
/// use sparsify_core::default_sketch_rows;
///
/// assert_eq!(default_sketch_rows(1), 2);
/// assert_eq!(default_sketch_rows(1_000), 12);
/// ```
#[must_use]
pub const fn default_sketch_rows(node_count: usize) -> usize {
    ceil_log2(node_count) + 2
}

/// Seeded geometric thinning of the pair space.
///
/// # Examples
/// ```
/// use sparsify_core::{HashMatrix, PairIndex};
///
/// let matrix = HashMatrix::new(45, 4, 7)?;
/// let column = PairIndex::new(12);
/// assert!(matrix.retains(0, column));
/// if matrix.retains(2, column) {
///     assert!(matrix.retains(1, column));
/// }
/// # Ok::<(), sparsify_core::SparsifyError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashMatrix {
    rows: usize,
    columns: u64,
    seed: u64,
}

impl HashMatrix {
    /// Creates a hash matrix with `rows` rows over `columns` coordinates.
    ///
    /// # Errors
    /// Returns [`SparsifyError::InvalidSketchRows`] when `rows` is zero.
    pub fn new(columns: u64, rows: usize, seed: u64) -> Result<Self> {
        if rows == 0 {
            return Err(SparsifyError::InvalidSketchRows { got: rows });
        }
        Ok(Self {
            rows,
            columns,
            seed,
        })
    }

    /// Returns the number of rows.
    #[must_use]
    #[rustfmt::skip]
    pub const fn rows(&self) -> usize { self.rows }

    /// Returns the number of columns (`C(n, 2)`).
    #[must_use]
    #[rustfmt::skip]
    pub const fn columns(&self) -> u64 { self.columns }

    /// Returns the seed the matrix was derived from.
    #[must_use]
    #[rustfmt::skip]
    pub const fn seed(&self) -> u64 { self.seed }

    /// Returns the deepest row that retains `column`.
    #[must_use]
    pub fn level(&self, column: PairIndex) -> usize {
        let zeros = self.hash(column).leading_zeros() as usize;
        zeros.min(self.rows - 1)
    }

    /// Returns `true` when row `row` keeps `column`.
    #[must_use]
    pub fn retains(&self, row: usize, column: PairIndex) -> bool {
        row < self.rows && column.get() < self.columns && self.level(column) >= row
    }

    fn hash(&self, column: PairIndex) -> u64 {
        splitmix64(self.seed ^ splitmix64(column.get()))
    }

    pub(crate) fn fingerprint(&self, column: PairIndex) -> u64 {
        splitmix64(mix_seed(self.seed, FINGERPRINT_STREAM) ^ column.get())
    }
}

/// One row of a [`Sketch`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SketchRow {
    fingerprint: u64,
    index_sum: i128,
    value_sum: i64,
}

impl SketchRow {
    /// Returns the fingerprint sum `D` (wrapping arithmetic modulo `2^64`).
    #[must_use]
    #[rustfmt::skip]
    pub const fn fingerprint(&self) -> u64 { self.fingerprint }

    /// Returns the index-weighted sum `S`.
    #[must_use]
    #[rustfmt::skip]
    pub const fn index_sum(&self) -> i128 { self.index_sum }

    /// Returns the value sum `C`.
    #[must_use]
    #[rustfmt::skip]
    pub const fn value_sum(&self) -> i64 { self.value_sum }

    pub(crate) fn accumulate(&mut self, column: PairIndex, value: i64, fingerprint: u64) {
        self.fingerprint = self
            .fingerprint
            .wrapping_add((value as u64).wrapping_mul(fingerprint));
        self.index_sum += i128::from(column.get()) * i128::from(value);
        self.value_sum += value;
    }
}

impl AddAssign<&SketchRow> for SketchRow {
    fn add_assign(&mut self, other: &SketchRow) {
        self.fingerprint = self.fingerprint.wrapping_add(other.fingerprint);
        self.index_sum += other.index_sum;
        self.value_sum += other.value_sum;
    }
}

/// Linear `rows x 3` summary of a sparse vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sketch {
    rows: Vec<SketchRow>,
}

impl Sketch {
    /// Returns the sketch of the zero vector with `rows` rows.
    #[must_use]
    pub fn zero(rows: usize) -> Self {
        Self {
            rows: vec![SketchRow::default(); rows],
        }
    }

    #[cfg(test)]
    pub(crate) const fn from_rows(rows: Vec<SketchRow>) -> Self {
        Self { rows }
    }

    /// Returns the rows, densest first.
    #[must_use]
    pub fn rows(&self) -> &[SketchRow] {
        &self.rows
    }

    /// Returns `true` when every row is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.rows.iter().all(|row| *row == SketchRow::default())
    }
}

impl AddAssign<&Sketch> for Sketch {
    fn add_assign(&mut self, other: &Sketch) {
        if other.rows.len() > self.rows.len() {
            self.rows.resize(other.rows.len(), SketchRow::default());
        }
        for (row, addend) in self.rows.iter_mut().zip(&other.rows) {
            *row += addend;
        }
    }
}

impl Add<&Sketch> for Sketch {
    type Output = Sketch;

    fn add(mut self, other: &Sketch) -> Sketch {
        self += other;
        self
    }
}

/// Outcome of extracting a coordinate from a [`Sketch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SketchSample {
    /// A unique survivor was recovered.
    Recovered {
        /// The surviving coordinate.
        index: PairIndex,
        /// Sparsest row that isolated it.
        row: usize,
    },
    /// Every row is zero, so the sketched vector has no nonzero coordinate.
    Empty,
    /// The sketch is nonzero but no row held exactly one survivor.
    Unresolved,
    /// Two rows isolated different coordinates, which nested rows rule out
    /// unless fingerprints collided.
    Inconsistent {
        /// Coordinate recovered from the sparser row.
        sparse: PairIndex,
        /// Conflicting coordinate recovered from a denser row.
        dense: PairIndex,
    },
}

/// Builds sketches against one [`HashMatrix`] and samples from them.
///
/// # Examples
/// ```
/// use sparsify_core::{HashMatrix, L0Sketcher, PairIndex, SketchSample, SparseVector};
///
/// let sketcher = L0Sketcher::new(HashMatrix::new(10, 5, 42)?);
/// let mut vector = SparseVector::new();
/// vector.add_entry(PairIndex::new(6), -1);
///
/// let sample = sketcher.sample(&sketcher.sketch(&vector));
/// assert!(matches!(sample, SketchSample::Recovered { index, .. } if index == PairIndex::new(6)));
/// # Ok::<(), sparsify_core::SparsifyError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct L0Sketcher {
    matrix: HashMatrix,
}

impl L0Sketcher {
    /// Wraps `matrix`.
    #[must_use]
    pub const fn new(matrix: HashMatrix) -> Self {
        Self { matrix }
    }

    /// Returns the hash matrix used by this sketcher.
    #[must_use]
    pub const fn matrix(&self) -> &HashMatrix {
        &self.matrix
    }

    /// Sketches `vector`, touching only its nonzero coordinates.
    #[must_use]
    pub fn sketch(&self, vector: &SparseVector) -> Sketch {
        let mut sketch = Sketch::zero(self.matrix.rows());
        for (column, value) in vector.iter() {
            let level = self.matrix.level(column);
            let fingerprint = self.matrix.fingerprint(column);
            for row in &mut sketch.rows[..=level] {
                row.accumulate(column, value, fingerprint);
            }
        }
        sketch
    }

    /// Extracts a surviving coordinate, scanning from the sparsest row.
    #[must_use]
    pub fn sample(&self, sketch: &Sketch) -> SketchSample {
        let mut recovered: Option<(usize, PairIndex)> = None;
        for (row, entry) in sketch.rows().iter().enumerate().rev() {
            let Some(candidate) = self.recover(row, entry) else {
                continue;
            };
            match recovered {
                None => recovered = Some((row, candidate)),
                Some((_, first)) if first == candidate => {}
                Some((_, first)) => {
                    return SketchSample::Inconsistent {
                        sparse: first,
                        dense: candidate,
                    };
                }
            }
        }
        match recovered {
            Some((row, index)) => SketchSample::Recovered { index, row },
            None if sketch.is_zero() => SketchSample::Empty,
            None => SketchSample::Unresolved,
        }
    }

    /// Returns the coordinate of a row that holds exactly one survivor.
    fn recover(&self, row: usize, entry: &SketchRow) -> Option<PairIndex> {
        if entry.value_sum == 0 {
            return None;
        }
        let value = i128::from(entry.value_sum);
        if entry.index_sum % value != 0 {
            return None;
        }
        let raw = u64::try_from(entry.index_sum / value).ok()?;
        let column = PairIndex::new(raw);
        if !self.matrix.retains(row, column) {
            return None;
        }
        let expected = (entry.value_sum as u64).wrapping_mul(self.matrix.fingerprint(column));
        (entry.fingerprint == expected).then_some(column)
    }
}
