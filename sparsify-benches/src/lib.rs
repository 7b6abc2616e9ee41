//! Benchmark support crate for sparsify.
//!
//! Provides seeded synthetic graphs with a planted component structure and
//! the parameter types used by the Criterion benchmarks.

pub mod error;
pub mod params;
pub mod source;
