//! Unit and property tests for incidence vector construction.

use std::collections::BTreeSet;

use proptest::prelude::*;
use rstest::rstest;

use crate::test_utils::{simple_graph_strategy, suite_proptest_config};

use super::{Edge, IncidenceVectors, SparseVector, build_incidence_vectors};
use crate::{PairIndex, SparsifyError};

fn path_graph() -> IncidenceVectors {
    build_incidence_vectors(4, &[Edge::new(1, 2), Edge::new(2, 3), Edge::new(3, 4)])
        .expect("path graph is valid")
}

#[test]
fn orients_edges_by_smaller_endpoint() {
    let vectors = path_graph();
    let codec = *vectors.codec();
    let one_two = codec.encode(1, 2).expect("valid pair");
    let two_three = codec.encode(2, 3).expect("valid pair");

    let node_one = vectors.vector(1).expect("node 1 exists");
    let node_two = vectors.vector(2).expect("node 2 exists");
    assert_eq!(node_one.get(one_two), 1);
    assert_eq!(node_two.get(one_two), -1);
    assert_eq!(node_two.get(two_three), 1);
    assert_eq!(node_one.nnz(), 1);
    assert_eq!(node_two.nnz(), 2);
}

#[test]
fn reversed_edges_produce_the_same_vectors() {
    let forward = build_incidence_vectors(3, &[Edge::new(1, 3)]).expect("valid graph");
    let reversed = build_incidence_vectors(3, &[Edge::new(3, 1)]).expect("valid graph");
    assert_eq!(forward, reversed);
}

#[test]
fn whole_graph_sum_is_zero() {
    let vectors = path_graph();
    let total = vectors.sum(&[1, 2, 3, 4]).expect("members are valid");
    assert!(total.is_zero());
}

#[test]
fn parallel_edges_accumulate_multiplicity() {
    let vectors = build_incidence_vectors(2, &[Edge::new(1, 2), Edge::new(2, 1)])
        .expect("parallel edges are valid");
    let index = PairIndex::new(0);
    assert_eq!(vectors.vector(1).expect("node 1").get(index), 2);
    assert_eq!(vectors.vector(2).expect("node 2").get(index), -2);
}

#[test]
fn isolated_nodes_have_zero_vectors() {
    let vectors = build_incidence_vectors(5, &[Edge::new(1, 2)]).expect("valid graph");
    assert!(vectors.vector(5).expect("node 5 exists").is_zero());
    assert!(vectors.vector(0).is_none());
    assert!(vectors.vector(6).is_none());
}

#[rstest]
#[case::self_loop(Edge::new(2, 2), SparsifyError::SelfLoop { node: 2 })]
#[case::zero_id(Edge::new(0, 1), SparsifyError::NodeOutOfRange { node: 0, node_count: 3 })]
#[case::too_large(Edge::new(1, 4), SparsifyError::NodeOutOfRange { node: 4, node_count: 3 })]
fn rejects_invalid_edges(#[case] edge: Edge, #[case] expected: SparsifyError) {
    let result = build_incidence_vectors(3, &[Edge::new(1, 2), edge]);
    assert_eq!(result, Err(expected));
}

#[test]
fn rejects_empty_graph() {
    assert_eq!(build_incidence_vectors(0, &[]), Err(SparsifyError::EmptyGraph));
}

#[test]
fn sum_rejects_unknown_members() {
    let vectors = path_graph();
    assert_eq!(
        vectors.sum(&[1, 9]),
        Err(SparsifyError::NodeOutOfRange {
            node: 9,
            node_count: 4
        })
    );
}

#[test]
fn sparse_vector_addition_drops_cancelled_entries() {
    let mut left = SparseVector::new();
    left.add_entry(PairIndex::new(1), 1);
    left.add_entry(PairIndex::new(4), -1);
    let mut right = SparseVector::new();
    right.add_entry(PairIndex::new(1), -1);

    left += &right;
    assert_eq!(left.iter().collect::<Vec<_>>(), vec![(PairIndex::new(4), -1)]);
    assert_eq!(left.nth_nonzero(0), Some((PairIndex::new(4), -1)));
    assert_eq!(left.nth_nonzero(1), None);
}

proptest! {
    #![proptest_config(suite_proptest_config(128))]

    #[test]
    fn subset_sums_expose_exactly_the_cut_edges(
        (node_count, edges) in simple_graph_strategy(24),
        mask in any::<u32>(),
    ) {
        let vectors =
            build_incidence_vectors(node_count, &edges).expect("generated graph is valid");
        let codec = *vectors.codec();
        let members: Vec<usize> = (1..=node_count)
            .filter(|node| mask & (1 << (node % 32)) != 0)
            .collect();
        let inside: BTreeSet<usize> = members.iter().copied().collect();
        let sum = vectors.sum(&members).expect("members are valid");

        let mut expected = Vec::new();
        for edge in &edges {
            let (low, high) = edge.canonical();
            let low_inside = inside.contains(&low);
            if low_inside != inside.contains(&high) {
                let sign = if low_inside { 1 } else { -1 };
                expected.push((codec.encode(low, high).expect("valid edge"), sign));
            }
        }
        expected.sort_unstable();

        prop_assert_eq!(sum.iter().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn vectors_never_hold_more_entries_than_the_degree(
        (node_count, edges) in simple_graph_strategy(24),
    ) {
        let vectors =
            build_incidence_vectors(node_count, &edges).expect("generated graph is valid");
        for (node, vector) in vectors.iter() {
            let degree = edges
                .iter()
                .filter(|edge| edge.source() == node || edge.target() == node)
                .count();
            prop_assert_eq!(vector.nnz(), degree);
        }
    }
}
