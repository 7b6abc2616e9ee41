//! Sparsify core library.
//!
//! Computes connected components from linear sketches of oriented incidence
//! vectors: every node's vector lives in the space of unordered node pairs,
//! supernodes sum their members' vectors (or sketches) so internal edges
//! cancel, and Borůvka-style rounds merge supernodes along sampled cut edges.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod connectivity;
mod error;
mod forest;
mod incidence;
mod pair_index;
mod result;
mod rng;
mod sampler;
mod sketch;
mod source;
mod subsample;
mod supernode;

#[cfg(test)]
mod test_utils;

pub use crate::{
    builder::{ConnectivityBuilder, ExecutionStrategy, SamplingStrategy},
    connectivity::{Connectivity, default_round_budget, find_connected_components},
    error::{ErrorKind, Result, SparsifyError, SparsifyErrorCode},
    incidence::{Edge, IncidenceVectors, SparseVector, build_incidence_vectors},
    pair_index::{PairCodec, PairIndex, decode_pair, encode_pair},
    result::{Components, RoundReport},
    rng::DEFAULT_SEED,
    sampler::{EdgeSampler, ExactSampler, Sample, SketchSampler},
    sketch::{HashMatrix, L0Sketcher, Sketch, SketchRow, SketchSample, default_sketch_rows},
    source::{EdgeList, EdgeSource},
    subsample::{NestedSubsample, default_levels, nested_subsample},
};
