//! Cover statistics and metrics

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::cover::Cover;
use crate::graph::NeighborIndex;

/// Summary statistics of one cover, reported per hierarchy level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverStats {
    /// Number of clusters
    pub num_clusters: usize,

    /// Total number of membership pairs
    pub num_pairs: usize,

    /// Average cluster size
    pub avg_cluster_size: f64,

    /// Largest cluster size
    pub max_cluster_size: usize,

    /// Smallest cluster size
    pub min_cluster_size: usize,

    /// Memberships per node; 1.0 means a strict partition
    pub overlap_ratio: f64,

    /// Mean intra-cluster edge density
    pub avg_density: f64,
}

/// Calculate density (actual edges / potential edges) of one cluster.
///
/// Uses the symmetric neighbor view, so potential edges are n(n-1)/2.
/// Singleton clusters have density 1 by convention.
pub fn cluster_density(index: &NeighborIndex, members: &[u32]) -> f64 {
    let n = members.len();
    if n <= 1 {
        return 1.0;
    }

    let potential_edges = n * (n - 1) / 2;
    let mut actual_edges = 0;

    for (i, &a) in members.iter().enumerate() {
        for &b in &members[i + 1..] {
            if index.contains(a as usize, b) {
                actual_edges += 1;
            }
        }
    }

    actual_edges as f64 / potential_edges as f64
}

/// Compute summary statistics for a cover against its source graph
pub fn cover_stats(cover: &Cover, index: &NeighborIndex) -> CoverStats {
    let members = cover.members_by_cluster();
    let sizes: Vec<usize> = members.iter().map(|m| m.len()).collect();

    let (min_size, max_size) = sizes
        .iter()
        .copied()
        .minmax()
        .into_option()
        .unwrap_or((0, 0));

    let avg_density = if members.is_empty() {
        0.0
    } else {
        members
            .iter()
            .map(|m| cluster_density(index, m))
            .sum::<f64>()
            / members.len() as f64
    };

    CoverStats {
        num_clusters: cover.num_clusters,
        num_pairs: cover.pairs.len(),
        avg_cluster_size: if cover.num_clusters == 0 {
            0.0
        } else {
            cover.pairs.len() as f64 / cover.num_clusters as f64
        },
        max_cluster_size: max_size,
        min_cluster_size: min_size,
        overlap_ratio: if cover.num_nodes == 0 {
            0.0
        } else {
            cover.pairs.len() as f64 / cover.num_nodes as f64
        },
        avg_density,
    }
}
