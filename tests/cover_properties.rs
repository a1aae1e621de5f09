//! Properties of the greedy k-plex cover construction.

use kplex_cover::cover::{build_cover, Cover, NodePriority};
use kplex_cover::error::CoverError;
use kplex_cover::graph::CompressedGraph;

const COVER_PRIORITY: &[NodePriority] = &[NodePriority::MinDegree, NodePriority::MinUncovered];
const KPLEX_PRIORITY: &[NodePriority] = &[
    NodePriority::MaxInKplex,
    NodePriority::MaxCandidates,
    NodePriority::MinUncovered,
];

/// Undirected edge list: both directions stored, as graph datasets do
fn undirected(pairs: &[(u32, u32)]) -> Vec<(u32, u32)> {
    let mut edges = Vec::with_capacity(pairs.len() * 2);
    for &(a, b) in pairs {
        edges.push((a, b));
        edges.push((b, a));
    }
    edges
}

fn assert_valid_kplex_cover(cover: &Cover, edges: &[(u32, u32)], k: u32) {
    let index = CompressedGraph::from_coo(cover.num_nodes, edges, None)
        .unwrap()
        .neighbor_index();

    for members in cover.members_by_cluster() {
        for &node in &members {
            let non_neighbors = members
                .iter()
                .filter(|&&other| other != node && !index.contains(node as usize, other))
                .count();
            assert!(
                non_neighbors <= (k - 1) as usize,
                "node {} has {} non-neighbors in a cluster of {} (k = {})",
                node,
                non_neighbors,
                members.len(),
                k
            );
        }
    }
}

#[test]
fn every_node_is_covered() {
    let edges = undirected(&[(0, 1), (1, 2), (2, 3), (3, 4), (0, 4), (1, 3)]);
    for k in 1..=3 {
        let cover = build_cover(&edges, k, 6, COVER_PRIORITY, KPLEX_PRIORITY, false).unwrap();

        let counts = cover.coverage_counts();
        assert!(
            counts.iter().all(|&c| c >= 1),
            "uncovered node for k = {}: {:?}",
            k,
            counts
        );
        // Node 5 is isolated and must still appear, as a singleton
        assert!(counts[5] >= 1);
    }
}

#[test]
fn clusters_are_valid_kplexes() {
    let edges = undirected(&[
        (0, 1),
        (0, 2),
        (1, 2),
        (2, 3),
        (3, 4),
        (4, 5),
        (5, 3),
        (1, 4),
    ]);
    for k in 1..=4 {
        let cover = build_cover(&edges, k, 6, COVER_PRIORITY, KPLEX_PRIORITY, false).unwrap();
        cover.validate().unwrap();
        assert_valid_kplex_cover(&cover, &edges, k);
    }
}

#[test]
fn cluster_ids_are_dense() {
    let edges = undirected(&[(0, 1), (2, 3)]);
    let cover = build_cover(&edges, 2, 5, COVER_PRIORITY, KPLEX_PRIORITY, false).unwrap();

    let mut seen: Vec<u32> = cover.pairs.iter().map(|&(_, c)| c).collect();
    seen.sort_unstable();
    seen.dedup();
    let expected: Vec<u32> = (0..cover.num_clusters as u32).collect();
    assert_eq!(seen, expected);
}

#[test]
fn identical_runs_are_byte_identical() {
    let edges = undirected(&[(0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (4, 2), (0, 5)]);

    let first = build_cover(&edges, 2, 6, COVER_PRIORITY, KPLEX_PRIORITY, false).unwrap();
    let second = build_cover(&edges, 2, 6, COVER_PRIORITY, KPLEX_PRIORITY, false).unwrap();

    assert_eq!(first.pairs, second.pairs);
    assert_eq!(first.num_clusters, second.num_clusters);
}

#[test]
fn four_cycle_collapses_into_one_cluster() {
    // Every node has degree 2, so with k = 2 any member tolerates the one
    // non-neighbor a 4-cycle gives it; the greedy pass groups all four
    let edges = undirected(&[(0, 1), (1, 2), (2, 3), (3, 0)]);
    let cover = build_cover(
        &edges,
        2,
        4,
        &[NodePriority::MinDegree],
        &[NodePriority::MaxInKplex],
        false,
    )
    .unwrap();

    assert_eq!(cover.num_clusters, 1);
    let mut members: Vec<u32> = cover.pairs.iter().map(|&(n, _)| n).collect();
    members.sort_unstable();
    assert_eq!(members, vec![0, 1, 2, 3]);
}

#[test]
fn configuration_errors_fire_before_any_work() {
    // Growth-only criterion in seed position
    let err = build_cover(
        &[],
        2,
        1,
        &[NodePriority::MaxInKplex],
        &[NodePriority::MaxInKplex],
        false,
    )
    .unwrap_err();
    assert!(matches!(err, CoverError::MisplacedPriority(_)));

    // k below 1
    let err = build_cover(&[], 0, 1, COVER_PRIORITY, KPLEX_PRIORITY, false).unwrap_err();
    assert!(matches!(err, CoverError::InvalidK(0)));

    // Edge endpoint out of range
    let err = build_cover(&[(0, 7)], 2, 2, COVER_PRIORITY, KPLEX_PRIORITY, false).unwrap_err();
    assert!(matches!(err, CoverError::EdgeOutOfRange { .. }));
}

#[test]
fn unknown_priority_names_are_rejected_at_parse() {
    assert!("degree".parse::<NodePriority>().is_err());
    assert!("min_degree".parse::<NodePriority>().is_ok());
}
