//! Edge pooling through a cover: the chained sparse product Cᵗ·A·C

use crate::cover::Cover;
use crate::error::{CoverError, Result};
use crate::pool::{merge_triplets, PoolOp};

/// Pool an adjacency into cluster space through the cover.
///
/// Computes `Cᵗ·A·C` as two chained sparse COO products: each edge is first
/// expanded through the covers of its source endpoint, then through the
/// covers of its target endpoint. Duplicate (src_cluster, dst_cluster)
/// entries arising from the products are merged with `op` after each step.
/// Self-loops in the output are legitimate: two connected nodes sharing a
/// cluster produce one. Output is sorted by (src, dst).
pub fn pool_edges(
    cover: &Cover,
    edges: &[(u32, u32)],
    edge_weights: Option<&[f32]>,
    num_nodes: usize,
    op: PoolOp,
) -> Result<(Vec<(u32, u32)>, Vec<f32>)> {
    cover.validate()?;

    if num_nodes != cover.num_nodes {
        return Err(CoverError::LengthMismatch {
            what: "cover nodes",
            expected: num_nodes,
            got: cover.num_nodes,
        });
    }
    if let Some(w) = edge_weights {
        if w.len() != edges.len() {
            return Err(CoverError::LengthMismatch {
                what: "edge weights",
                expected: edges.len(),
                got: w.len(),
            });
        }
    }

    // Covering clusters per node, shared by both product steps
    let mut node_clusters: Vec<Vec<(u32, f32)>> = vec![Vec::new(); num_nodes];
    for (i, &(node, cluster)) in cover.pairs.iter().enumerate() {
        node_clusters[node as usize].push((cluster, cover.value(i)));
    }

    // First product: Cᵗ·A, mapping source endpoints into cluster space
    let mut triplets = Vec::with_capacity(edges.len());
    for (i, &(src, dst)) in edges.iter().enumerate() {
        if src as usize >= num_nodes || dst as usize >= num_nodes {
            return Err(CoverError::EdgeOutOfRange {
                src,
                dst,
                num_nodes,
            });
        }
        let w = edge_weights.map_or(1.0, |ws| ws[i]);
        for &(cluster, value) in &node_clusters[src as usize] {
            triplets.push((cluster, dst, value * w));
        }
    }
    let (half_pairs, half_weights) = merge_triplets(triplets, op);

    // Second product: (Cᵗ·A)·C, mapping target endpoints into cluster space
    let mut triplets = Vec::with_capacity(half_pairs.len());
    for (&(src_cluster, dst), &w) in half_pairs.iter().zip(&half_weights) {
        for &(cluster, value) in &node_clusters[dst as usize] {
            triplets.push((src_cluster, cluster, value * w));
        }
    }

    Ok(merge_triplets(triplets, op))
}
