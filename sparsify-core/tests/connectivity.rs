//! Tests for the `Connectivity` orchestration API.

mod common;

use common::path;
use rstest::{fixture, rstest};
use sparsify_core::{
    Components, ConnectivityBuilder, Edge, EdgeList, ExecutionStrategy, SamplingStrategy,
    SparsifyError, find_connected_components,
};
use sparsify_test_support::tracing::RecordingLayer;
use tracing::Level;

#[fixture]
fn two_pairs() -> EdgeList {
    EdgeList::new("two pairs", 4, vec![Edge::new(1, 2), Edge::new(3, 4)])
}

fn run(graph: &EdgeList, sampling: SamplingStrategy, execution: ExecutionStrategy) -> Components {
    ConnectivityBuilder::new()
        .with_sampling_strategy(sampling)
        .with_execution_strategy(execution)
        .build()
        .expect("configuration must be valid")
        .run(graph)
        .expect("run must succeed")
}

#[rstest]
fn path_of_four_is_one_block() {
    let components = find_connected_components(4, &path(4), None).expect("path is valid");
    assert_eq!(components.blocks(), &[vec![1, 2, 3, 4]]);
    assert_eq!(components.component_count(), 1);
    assert_eq!(components.forest_edges().len(), 3);
    assert!(components.round_count() <= 2);
}

#[rstest]
#[case::exact(SamplingStrategy::Exact)]
#[case::sketch(SamplingStrategy::Sketch)]
fn disjoint_pairs_stay_apart(#[case] sampling: SamplingStrategy, two_pairs: EdgeList) {
    let components = run(&two_pairs, sampling, ExecutionStrategy::Sequential);
    assert_eq!(components.blocks(), &[vec![1, 2], vec![3, 4]]);
    assert_eq!(components.component_of(2), Some(0));
    assert_eq!(components.component_of(3), Some(1));
    assert_eq!(components.component_of(5), None);
}

#[rstest]
fn single_node_terminates_in_round_zero() {
    let components = find_connected_components(1, &[], None).expect("single node is valid");
    assert_eq!(components.blocks(), &[vec![1]]);
    assert_eq!(components.round_count(), 1);
    let round = components.rounds()[0];
    assert_eq!(round.round(), 0);
    assert_eq!(round.exhausted(), 1);
    assert_eq!(round.sampled(), 0);
    assert!(components.converged());
}

#[rstest]
fn isolated_nodes_are_singletons() {
    let components =
        find_connected_components(5, &[Edge::new(2, 4)], Some(4)).expect("graph is valid");
    assert_eq!(
        components.blocks(),
        &[vec![1], vec![2, 4], vec![3], vec![5]]
    );
    assert!(components.converged());
}

#[rstest]
fn parallel_edges_merge_like_single_edges() {
    let edges = [Edge::new(1, 2), Edge::new(2, 1), Edge::new(1, 2)];
    let components = find_connected_components(3, &edges, None).expect("graph is valid");
    assert_eq!(components.blocks(), &[vec![1, 2], vec![3]]);
}

#[rstest]
fn explicit_budget_limits_rounds() {
    let components = find_connected_components(128, &path(128), Some(1)).expect("path is valid");
    assert_eq!(components.round_count(), 1);
    assert!(components.component_count() > 1);
    assert!(!components.converged());
}

#[rstest]
fn sketch_runs_only_converge_on_the_true_partition() {
    let edges: Vec<Edge> = (1..=8)
        .flat_map(|left| ((left + 1)..=8).map(move |right| Edge::new(left, right)))
        .collect();
    let complete = EdgeList::new("complete", 8, edges);
    for seed in 0..100 {
        let components = ConnectivityBuilder::new()
            .with_sampling_strategy(SamplingStrategy::Sketch)
            .with_execution_strategy(ExecutionStrategy::Sequential)
            .with_seed(seed)
            .with_round_budget(64)
            .build()
            .expect("configuration must be valid")
            .run(&complete)
            .expect("run must succeed");
        let last = *components.rounds().last().expect("at least one round");
        if components.converged() {
            assert_eq!(components.component_count(), 1, "seed {seed}");
            assert_eq!(last.unresolved(), 0, "seed {seed}");
        } else if components.component_count() > 1 {
            assert!(last.unresolved() > 0, "seed {seed}: {last:?}");
        }
    }
}

#[rstest]
fn same_seed_reproduces_the_forest() {
    let graph = EdgeList::new("path", 40, path(40));
    let first = run(&graph, SamplingStrategy::Sketch, ExecutionStrategy::Sequential);
    let second = run(&graph, SamplingStrategy::Sketch, ExecutionStrategy::Sequential);
    assert_eq!(first, second);
}

#[cfg(feature = "parallel")]
#[rstest]
#[case::exact(SamplingStrategy::Exact)]
#[case::sketch(SamplingStrategy::Sketch)]
fn parallel_execution_matches_sequential(#[case] sampling: SamplingStrategy) {
    let mut edges = path(60);
    edges.extend([Edge::new(70, 71), Edge::new(72, 80), Edge::new(80, 90)]);
    let graph = EdgeList::new("mixed", 96, edges);
    assert_eq!(
        run(&graph, sampling, ExecutionStrategy::Parallel),
        run(&graph, sampling, ExecutionStrategy::Sequential)
    );
}

#[cfg(not(feature = "parallel"))]
#[rstest]
fn parallel_execution_requires_the_feature(two_pairs: EdgeList) {
    let err = ConnectivityBuilder::new()
        .with_execution_strategy(ExecutionStrategy::Parallel)
        .build()
        .expect("configuration must be valid")
        .run(&two_pairs)
        .expect_err("parallel backend is not compiled in");
    assert_eq!(
        err,
        SparsifyError::BackendUnavailable {
            requested: ExecutionStrategy::Parallel
        }
    );
}

#[rstest]
#[case::empty(0, vec![], SparsifyError::EmptyGraph)]
#[case::self_loop(3, vec![Edge::new(2, 2)], SparsifyError::SelfLoop { node: 2 })]
#[case::out_of_range(
    3,
    vec![Edge::new(1, 4)],
    SparsifyError::NodeOutOfRange { node: 4, node_count: 3 },
)]
fn invalid_graphs_are_rejected(
    #[case] node_count: usize,
    #[case] edges: Vec<Edge>,
    #[case] expected: SparsifyError,
) {
    let graph = EdgeList::new("invalid", node_count, edges);
    let err = ConnectivityBuilder::new()
        .build()
        .expect("defaults are valid")
        .run(&graph)
        .expect_err("graph must be rejected");
    assert_eq!(err, expected);
}

#[rstest]
fn zero_round_budget_is_rejected() {
    assert_eq!(
        find_connected_components(3, &path(3), Some(0)),
        Err(SparsifyError::InvalidRoundBudget { got: 0 })
    );
}

#[rstest]
fn run_records_core_tracing(two_pairs: EdgeList) {
    let connectivity = ConnectivityBuilder::new()
        .with_execution_strategy(ExecutionStrategy::Sequential)
        .with_round_budget(3)
        .build()
        .expect("configuration must be valid");

    let (result, layer) = RecordingLayer::capture(|| connectivity.run(&two_pairs));
    let components = result.expect("run must succeed");

    let run_span = layer.span_named("core.run").expect("core.run span must exist");
    let field = |name: &str| run_span.fields.get(name).map(String::as_str);
    assert_eq!(field("graph"), Some("two pairs"));
    assert_eq!(field("nodes"), Some("4"));
    assert_eq!(field("edges"), Some("2"));
    assert_eq!(field("strategy"), Some("Exact"));
    assert_eq!(field("execution"), Some("Sequential"));
    assert_eq!(field("round_budget"), Some("3"));

    let rounds = layer
        .spans()
        .into_iter()
        .filter(|span| span.name == "core.round")
        .count();
    assert_eq!(rounds, components.round_count());
    assert!(layer.span_named("core.incidence").is_some());

    let completion = layer
        .events_at(Level::INFO)
        .into_iter()
        .find(|event| {
            event.fields.get("message").map(String::as_str) == Some("connectivity run completed")
        })
        .expect("completion event must be emitted");
    assert_eq!(
        completion.fields.get("components").map(String::as_str),
        Some("2")
    );
}

#[rstest]
fn empty_graph_emits_warning() {
    let graph = EdgeList::new("nothing", 0, Vec::new());
    let connectivity = ConnectivityBuilder::new().build().expect("defaults are valid");

    let (result, layer) = RecordingLayer::capture(|| connectivity.run(&graph));
    assert_eq!(result, Err(SparsifyError::EmptyGraph));

    let warnings = layer.events_at(Level::WARN);
    assert!(warnings.iter().any(|event| {
        event.fields.get("graph").map(String::as_str) == Some("nothing")
    }));
}
