//! Error types for the sparsify core library.
//!
//! Defines the error enum exposed by the public API, its stable codes, and a
//! convenient result alias.

use std::fmt;

use thiserror::Error;

use crate::builder::ExecutionStrategy;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Broad classification of a [`SparsifyError`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    /// The caller violated a precondition; retrying with the same input fails again.
    InvalidArgument,
    /// The requested backend is not compiled into this build.
    Unavailable,
    /// An internal invariant was violated, indicating a logic error.
    Invariant,
}

/// Error type produced by the connectivity engine and its building blocks.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SparsifyError {
    /// The graph has no nodes.
    #[error("node count must be at least 1")]
    EmptyGraph,
    /// A node id fell outside `1..=node_count`.
    #[error("node {node} is outside 1..={node_count}")]
    NodeOutOfRange {
        /// The offending node id.
        node: usize,
        /// Number of nodes in the graph.
        node_count: usize,
    },
    /// An edge or pair joined a node to itself.
    #[error("self-loop on node {node} reached the core")]
    SelfLoop {
        /// The node that appeared on both ends.
        node: usize,
    },
    /// A pair index was not below `C(n, 2)`.
    #[error("pair index {index} is out of range for {pair_count} pairs")]
    PairIndexOutOfRange {
        /// The requested pair index.
        index: u64,
        /// Number of unordered pairs for the graph.
        pair_count: u64,
    },
    /// `C(n, 2)` does not fit in a 64-bit pair index.
    #[error("pair space for {node_count} nodes exceeds the 64-bit index range")]
    PairSpaceOverflow {
        /// Node count that overflowed the pair space.
        node_count: usize,
    },
    /// The round budget must allow at least one round.
    #[error("round_budget must be at least 1 (got {got})")]
    InvalidRoundBudget {
        /// The rejected budget.
        got: usize,
    },
    /// Sketches need at least one row.
    #[error("sketch_rows must be at least 1 (got {got})")]
    InvalidSketchRows {
        /// The rejected row count.
        got: usize,
    },
    /// Nested subsampling needs at least one level.
    #[error("subsample levels must be at least 1 (got {got})")]
    InvalidSubsampleLevels {
        /// The rejected level count.
        got: usize,
    },
    /// The requested execution strategy is unavailable in the current build.
    #[error("the requested execution strategy {requested:?} is not available in this build")]
    BackendUnavailable {
        /// Strategy that could not be satisfied by the current build.
        requested: ExecutionStrategy,
    },
    /// An internal invariant was violated.
    #[error("invariant violated: {invariant} (node {node})")]
    InvariantViolation {
        /// Name of the violated invariant to assist debugging.
        invariant: &'static str,
        /// Node involved when the violation was detected.
        node: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`SparsifyError`] variants.
    enum SparsifyErrorCode for SparsifyError {
        /// The graph has no nodes.
        EmptyGraph => EmptyGraph => "SPARSIFY_EMPTY_GRAPH",
        /// A node id fell outside `1..=node_count`.
        NodeOutOfRange => NodeOutOfRange { .. } => "SPARSIFY_NODE_OUT_OF_RANGE",
        /// An edge or pair joined a node to itself.
        SelfLoop => SelfLoop { .. } => "SPARSIFY_SELF_LOOP",
        /// A pair index was not below `C(n, 2)`.
        PairIndexOutOfRange => PairIndexOutOfRange { .. } => "SPARSIFY_PAIR_INDEX_OUT_OF_RANGE",
        /// `C(n, 2)` does not fit in a 64-bit pair index.
        PairSpaceOverflow => PairSpaceOverflow { .. } => "SPARSIFY_PAIR_SPACE_OVERFLOW",
        /// The round budget must allow at least one round.
        InvalidRoundBudget => InvalidRoundBudget { .. } => "SPARSIFY_INVALID_ROUND_BUDGET",
        /// Sketches need at least one row.
        InvalidSketchRows => InvalidSketchRows { .. } => "SPARSIFY_INVALID_SKETCH_ROWS",
        /// Nested subsampling needs at least one level.
        InvalidSubsampleLevels => InvalidSubsampleLevels { .. }
            => "SPARSIFY_INVALID_SUBSAMPLE_LEVELS",
        /// The requested execution strategy is unavailable in the current build.
        BackendUnavailable => BackendUnavailable { .. } => "SPARSIFY_BACKEND_UNAVAILABLE",
        /// An internal invariant was violated.
        InvariantViolation => InvariantViolation { .. } => "SPARSIFY_INVARIANT_VIOLATION",
    }
}

impl SparsifyError {
    /// Classifies the error so callers can tell caller bugs from internal faults.
    ///
    /// # Examples
    /// ```
    /// use sparsify_core::{ErrorKind, SparsifyError};
    ///
    /// let err = SparsifyError::SelfLoop { node: 3 };
    /// assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    /// ```
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::BackendUnavailable { .. } => ErrorKind::Unavailable,
            Self::InvariantViolation { .. } => ErrorKind::Invariant,
            Self::EmptyGraph
            | Self::NodeOutOfRange { .. }
            | Self::SelfLoop { .. }
            | Self::PairIndexOutOfRange { .. }
            | Self::PairSpaceOverflow { .. }
            | Self::InvalidRoundBudget { .. }
            | Self::InvalidSketchRows { .. }
            | Self::InvalidSubsampleLevels { .. } => ErrorKind::InvalidArgument,
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, SparsifyError>;
