//! Benchmark setup error type.

use crate::source::SyntheticError;
use sparsify_core::SparsifyError;

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Synthetic graph generation failed.
    #[error("synthetic graph generation failed: {0}")]
    Synthetic(#[from] SyntheticError),
    /// Core configuration or computation failed.
    #[error("sparsify core failed: {0}")]
    Core(#[from] SparsifyError),
}
