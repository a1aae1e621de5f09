//! Batched cover construction: partition, parallel map, merge

use log;
use rayon::prelude::*;

use crate::cover::priority::NodePriority;
use crate::cover::{build_cover, Cover, KPlexBuilder};
use crate::error::{CoverError, Result};

/// Build independent covers for a batch of graphs sharing one node id space.
///
/// `batch` labels each node with its graph; labels must be sorted ascending
/// so every graph owns a contiguous id range. Edges must not cross batch
/// boundaries. Per-graph builders run in parallel with no shared state; the
/// merge step offsets node and cluster ids back into the global space so
/// cluster ids stay dense and disjoint across graphs.
///
/// Returns the merged cover plus a per-cluster batch label, produced by a
/// max-reduction over member labels (clustering never mixes batches, so the
/// reduction is exact).
pub fn build_cover_batched(
    edges: &[(u32, u32)],
    k: u32,
    batch: &[u32],
    cover_priority: &[NodePriority],
    kplex_priority: &[NodePriority],
    skip_covered: bool,
) -> Result<(Cover, Vec<u32>)> {
    // Configuration problems surface here even for an empty batch
    KPlexBuilder::new(k, cover_priority, kplex_priority, skip_covered)?;

    let num_nodes = batch.len();
    if batch.windows(2).any(|w| w[0] > w[1]) {
        return Err(CoverError::UnsortedBatch);
    }

    let num_batches = batch.last().map_or(0, |&b| b as usize + 1);

    // Per-batch node counts and the offset where each batch's range begins
    let mut counts = vec![0usize; num_batches];
    for &b in batch {
        counts[b as usize] += 1;
    }
    let mut node_offsets = vec![0usize; num_batches + 1];
    for b in 0..num_batches {
        node_offsets[b + 1] = node_offsets[b] + counts[b];
    }

    // Partition edges into per-batch local edge lists
    let mut local_edges: Vec<Vec<(u32, u32)>> = vec![Vec::new(); num_batches];
    for &(src, dst) in edges {
        if src as usize >= num_nodes || dst as usize >= num_nodes {
            return Err(CoverError::EdgeOutOfRange {
                src,
                dst,
                num_nodes,
            });
        }
        let src_batch = batch[src as usize];
        let dst_batch = batch[dst as usize];
        if src_batch != dst_batch {
            return Err(CoverError::CrossBatchEdge {
                src,
                dst,
                src_batch,
                dst_batch,
            });
        }
        let base = node_offsets[src_batch as usize] as u32;
        local_edges[src_batch as usize].push((src - base, dst - base));
    }

    log::debug!(
        "batched cover: {} nodes across {} graphs",
        num_nodes,
        num_batches
    );

    // Each graph's builder runs in isolation; the collect is the join point
    let covers: Vec<Cover> = local_edges
        .par_iter()
        .enumerate()
        .map(|(b, edges)| {
            build_cover(
                edges,
                k,
                counts[b],
                cover_priority,
                kplex_priority,
                skip_covered,
            )
        })
        .collect::<Result<Vec<_>>>()?;

    // Merge with running node and cluster offsets
    let mut pairs = Vec::new();
    let mut cluster_offset = 0u32;
    for (b, cover) in covers.iter().enumerate() {
        let base = node_offsets[b] as u32;
        for &(node, cluster) in &cover.pairs {
            pairs.push((node + base, cluster + cluster_offset));
        }
        cluster_offset += cover.num_clusters as u32;
    }

    let num_clusters = cluster_offset as usize;
    let mut cluster_batch = vec![0u32; num_clusters];
    for &(node, cluster) in &pairs {
        let label = batch[node as usize];
        if label > cluster_batch[cluster as usize] {
            cluster_batch[cluster as usize] = label;
        }
    }

    let cover = Cover {
        num_nodes,
        num_clusters,
        pairs,
        values: None,
    };

    Ok((cover, cluster_batch))
}
