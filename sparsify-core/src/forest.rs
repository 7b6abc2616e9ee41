//! Borůvka-style rounds of sampling and merging over supernodes.
//!
//! Each round samples one edge per supernode, then merges the owners of every
//! distinct sampled edge. Sampling reads only immutable state, so it can fan
//! out across threads; all partition writes happen in the sequential merge
//! phase that follows.

use std::collections::BTreeSet;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info_span};

use crate::{
    Result,
    incidence::Edge,
    pair_index::PairCodec,
    result::{Components, RoundReport},
    rng::mix_seed,
    sampler::{EdgeSampler, Sample},
    supernode::Supernodes,
};

/// Parameters of the round loop after validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RoundPlan {
    pub(crate) round_budget: usize,
    pub(crate) base_seed: u64,
    pub(crate) parallel: bool,
}

/// Runs rounds until a round samples no edge or the budget is spent.
///
/// The run has converged only when that final round found every supernode
/// exhausted; unresolved supernodes may still have cut edges.
///
/// `sampler_for_round` receives the round seed and returns the sampler used
/// for every supernode of that round.
pub(crate) fn grow_forest<S, F>(
    codec: &PairCodec,
    plan: RoundPlan,
    mut sampler_for_round: F,
) -> Result<Components>
where
    S: EdgeSampler,
    F: FnMut(u64) -> Result<S>,
{
    let mut supernodes = Supernodes::singletons(codec.node_count());
    let mut forest = Vec::new();
    let mut reports = Vec::new();
    let mut converged = false;

    for round in 0..plan.round_budget {
        let span = info_span!("core.round", round);
        let _entered = span.enter();

        let round_seed = mix_seed(plan.base_seed, round as u64);
        let sampler = sampler_for_round(round_seed)?;
        let samples = sample_round(&sampler, &supernodes, round_seed, plan.parallel)?;

        let supernodes_before = supernodes.len();
        let mut exhausted = 0;
        let mut unresolved = 0;
        let mut sampled = BTreeSet::new();
        for sample in samples {
            match sample {
                Sample::Edge(index) => {
                    sampled.insert(index);
                }
                Sample::Exhausted => exhausted += 1,
                Sample::Unresolved => unresolved += 1,
            }
        }

        let mut merges = 0;
        for &index in &sampled {
            let (left, right) = codec.decode(index)?;
            let left_owner = supernodes.owner_of(left)?;
            let right_owner = supernodes.owner_of(right)?;
            if supernodes.union(left_owner, right_owner)? {
                forest.push(Edge::new(left, right));
                merges += 1;
            }
        }
        supernodes.compact();

        let report = RoundReport::new(
            round,
            supernodes_before,
            sampled.len(),
            exhausted,
            unresolved,
            merges,
            supernodes.len(),
        );
        debug!(
            round,
            supernodes_before,
            sampled = report.sampled(),
            exhausted,
            unresolved,
            merges,
            supernodes_after = report.supernodes_after(),
            "round completed"
        );
        record_round(&report);
        reports.push(report);

        if sampled.is_empty() {
            converged = unresolved == 0;
            break;
        }
    }

    Ok(Components::new(
        supernodes.into_blocks(),
        forest,
        reports,
        converged,
    ))
}

#[cfg(feature = "parallel")]
fn sample_round<S: EdgeSampler>(
    sampler: &S,
    supernodes: &Supernodes,
    round_seed: u64,
    parallel: bool,
) -> Result<Vec<Sample>> {
    if !parallel {
        return sample_sequential(sampler, supernodes, round_seed);
    }
    let live: Vec<(usize, &[usize])> = supernodes.iter().collect();
    live.into_par_iter()
        .map(|(slot, members)| sampler.sample(members, mix_seed(round_seed, slot as u64)))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn sample_round<S: EdgeSampler>(
    sampler: &S,
    supernodes: &Supernodes,
    round_seed: u64,
    _parallel: bool,
) -> Result<Vec<Sample>> {
    sample_sequential(sampler, supernodes, round_seed)
}

fn sample_sequential<S: EdgeSampler>(
    sampler: &S,
    supernodes: &Supernodes,
    round_seed: u64,
) -> Result<Vec<Sample>> {
    supernodes
        .iter()
        .map(|(slot, members)| sampler.sample(members, mix_seed(round_seed, slot as u64)))
        .collect()
}

#[cfg(feature = "metrics")]
fn record_round(report: &RoundReport) {
    metrics::counter!("sparsify_rounds_total").increment(1);
    metrics::counter!("sparsify_samples_exhausted_total").increment(report.exhausted() as u64);
    metrics::counter!("sparsify_samples_unresolved_total").increment(report.unresolved() as u64);
    metrics::counter!("sparsify_merges_total").increment(report.merges() as u64);
}

#[cfg(not(feature = "metrics"))]
fn record_round(_report: &RoundReport) {}
