//! Shared test utilities used across sparsify crates.

pub mod ci;
pub mod tracing;
