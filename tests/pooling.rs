//! Pooling properties: mass preservation, identity round-trips, simplify.

use kplex_cover::cover::{build_cover, Cover, NodePriority};
use kplex_cover::pool::{pool_edges, pool_nodes, simplify, PoolOp};
use ndarray::Array2;

const COVER_PRIORITY: &[NodePriority] = &[NodePriority::MinDegree, NodePriority::MinUncovered];
const KPLEX_PRIORITY: &[NodePriority] = &[
    NodePriority::MaxInKplex,
    NodePriority::MaxCandidates,
    NodePriority::MinUncovered,
];

fn undirected(pairs: &[(u32, u32)]) -> Vec<(u32, u32)> {
    let mut edges = Vec::with_capacity(pairs.len() * 2);
    for &(a, b) in pairs {
        edges.push((a, b));
        edges.push((b, a));
    }
    edges
}

fn identity_cover(n: usize) -> Cover {
    Cover {
        num_nodes: n,
        num_clusters: n,
        pairs: (0..n as u32).map(|i| (i, i)).collect(),
        values: None,
    }
}

#[test]
fn add_pooling_preserves_mass_over_a_partition() {
    let edges = undirected(&[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0), (1, 4)]);
    // skip_covered makes the cover a strict partition, so every feature row
    // contributes exactly once
    let cover = build_cover(&edges, 2, 6, COVER_PRIORITY, KPLEX_PRIORITY, true).unwrap();

    let x = Array2::from_shape_fn((6, 3), |(i, j)| (i * 3 + j) as f32 + 0.5);
    let pooled = pool_nodes(&cover, x.view(), &[PoolOp::Add], false, None).unwrap();

    let original_mass: f32 = x.sum();
    let pooled_mass: f32 = pooled.sum();
    assert!(
        (original_mass - pooled_mass).abs() < 1e-4,
        "mass changed: {} -> {}",
        original_mass,
        pooled_mass
    );
}

#[test]
fn identity_cover_round_trips_node_features() {
    let x = Array2::from_shape_fn((4, 2), |(i, j)| (10 * i + j) as f32);
    let cover = identity_cover(4);

    let pooled = pool_nodes(&cover, x.view(), &[PoolOp::Add], false, None).unwrap();
    assert_eq!(pooled, x);

    let pooled = pool_nodes(&cover, x.view(), &[PoolOp::Max], false, None).unwrap();
    assert_eq!(pooled, x);
}

#[test]
fn identity_cover_round_trips_edges() {
    let edges = vec![(0u32, 1u32), (1, 2), (2, 0), (3, 3)];
    let weights = vec![1.0, 0.5, 2.0, 4.0];
    let cover = identity_cover(4);

    let (pooled_edges, pooled_weights) =
        pool_edges(&cover, &edges, Some(&weights), 4, PoolOp::Add).unwrap();

    // Output is sorted by endpoint pair; the input already is
    assert_eq!(pooled_edges, edges);
    assert_eq!(pooled_weights, weights);
}

#[test]
fn simplify_twice_is_a_no_op() {
    let edges = vec![(2u32, 1u32), (0, 1), (2, 1), (1, 1), (0, 1)];
    let weights = vec![1.0, 2.0, 3.0, 4.0, 5.0];

    for op in [PoolOp::Add, PoolOp::Max, PoolOp::Min, PoolOp::Mean] {
        let once = simplify(&edges, Some(&weights), 3, true, op).unwrap();
        let twice = simplify(&once.0, Some(&once.1), 3, true, op).unwrap();
        assert_eq!(once, twice, "op {:?} not idempotent", op);
    }
}

#[test]
fn overlapping_memberships_double_count_under_add() {
    // One node in two clusters contributes its row to both
    let cover = Cover {
        num_nodes: 2,
        num_clusters: 2,
        pairs: vec![(0, 0), (0, 1), (1, 1)],
        values: None,
    };
    let x = ndarray::array![[1.0], [10.0]];
    let pooled = pool_nodes(&cover, x.view(), &[PoolOp::Add], false, None).unwrap();
    assert_eq!(pooled, ndarray::array![[1.0], [11.0]]);
}

#[test]
fn multi_op_output_concatenates_feature_blocks() {
    let edges = undirected(&[(0, 1), (1, 2)]);
    let cover = build_cover(&edges, 2, 3, COVER_PRIORITY, KPLEX_PRIORITY, false).unwrap();

    let x = Array2::from_shape_fn((3, 2), |(i, j)| (i + j) as f32);
    let pooled = pool_nodes(
        &cover,
        x.view(),
        &[PoolOp::Add, PoolOp::Max, PoolOp::Mean],
        false,
        None,
    )
    .unwrap();

    assert_eq!(pooled.nrows(), cover.num_clusters);
    assert_eq!(pooled.ncols(), 6);
}

#[test]
fn pooled_self_loops_are_reported_not_dropped() {
    // Two connected nodes in one cluster: the pooled graph has a self-loop
    // until simplify removes it
    let cover = Cover {
        num_nodes: 2,
        num_clusters: 1,
        pairs: vec![(0, 0), (1, 0)],
        values: None,
    };
    let edges = vec![(0u32, 1u32), (1, 0)];

    let (pooled_edges, pooled_weights) =
        pool_edges(&cover, &edges, None, 2, PoolOp::Add).unwrap();
    assert_eq!(pooled_edges, vec![(0, 0)]);
    assert_eq!(pooled_weights, vec![2.0]);

    let (simplified, _) = simplify(&pooled_edges, Some(&pooled_weights), 1, true, PoolOp::Add)
        .unwrap();
    assert!(simplified.is_empty());
}
