//! Cover construction module

pub mod batch;
pub mod hubs;
pub mod kplex;
pub mod metrics;
pub mod priority;

use serde::{Deserialize, Serialize};

use crate::error::{CoverError, Result};
use crate::graph::CompressedGraph;

pub use batch::build_cover_batched;
pub use hubs::promote_hubs;
pub use kplex::KPlexBuilder;
pub use priority::{NodePriority, PriorityEngine};

/// Bipartite node-to-cluster assignment produced by the cover builder.
///
/// `pairs` lists (node_id, cluster_id) memberships; a node may appear in
/// several clusters. `values` carries per-membership weights and defaults
/// to 1.0 when absent. Cluster ids are a dense range `[0, num_clusters)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cover {
    /// Number of nodes in the source graph
    pub num_nodes: usize,

    /// Number of clusters in the cover
    pub num_clusters: usize,

    /// Membership pairs (node_id, cluster_id)
    pub pairs: Vec<(u32, u32)>,

    /// Optional membership weights, parallel to `pairs`
    pub values: Option<Vec<f32>>,
}

impl Cover {
    /// Membership weight of the i-th pair
    pub fn value(&self, i: usize) -> f32 {
        self.values.as_ref().map_or(1.0, |v| v[i])
    }

    /// Check the cover invariants.
    ///
    /// Node ids must fit the source graph, cluster ids must form exactly the
    /// dense range `[0, num_clusters)`, and values (when present) must run
    /// parallel to the pairs.
    pub fn validate(&self) -> Result<()> {
        if let Some(values) = &self.values {
            if values.len() != self.pairs.len() {
                return Err(CoverError::LengthMismatch {
                    what: "cover values",
                    expected: self.pairs.len(),
                    got: values.len(),
                });
            }
        }

        let mut seen = vec![false; self.num_clusters];
        for &(node, cluster) in &self.pairs {
            if node as usize >= self.num_nodes {
                return Err(CoverError::InvalidCover(format!(
                    "node id {} out of range for {} nodes",
                    node, self.num_nodes
                )));
            }
            if cluster as usize >= self.num_clusters {
                return Err(CoverError::InvalidCover(format!(
                    "cluster id {} out of range for {} clusters",
                    cluster, self.num_clusters
                )));
            }
            seen[cluster as usize] = true;
        }

        if let Some(missing) = seen.iter().position(|&s| !s) {
            return Err(CoverError::InvalidCover(format!(
                "cluster ids are not a dense range: {} is empty",
                missing
            )));
        }

        Ok(())
    }

    /// How many clusters contain each node
    pub fn coverage_counts(&self) -> Vec<u32> {
        let mut counts = vec![0u32; self.num_nodes];
        for &(node, _) in &self.pairs {
            counts[node as usize] += 1;
        }
        counts
    }

    /// Member node ids per cluster, in pair order
    pub fn members_by_cluster(&self) -> Vec<Vec<u32>> {
        let mut members = vec![Vec::new(); self.num_clusters];
        for &(node, cluster) in &self.pairs {
            members[cluster as usize].push(node);
        }
        members
    }
}

/// Build a k-plex cover of a single graph given as an edge list.
///
/// Validates the configuration and the edge endpoints before any
/// algorithmic work.
pub fn build_cover(
    edges: &[(u32, u32)],
    k: u32,
    num_nodes: usize,
    cover_priority: &[NodePriority],
    kplex_priority: &[NodePriority],
    skip_covered: bool,
) -> Result<Cover> {
    let builder = KPlexBuilder::new(k, cover_priority, kplex_priority, skip_covered)?;
    let graph = CompressedGraph::from_coo(num_nodes, edges, None)?;
    Ok(builder.build(&graph.neighbor_index()))
}
