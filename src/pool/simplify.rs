//! Post-pooling edge list cleanup

use crate::error::{CoverError, Result};
use crate::pool::{merge_triplets, PoolOp};

/// Deduplicate a pooled edge list.
///
/// Optionally drops self-loops, then merges entries sharing an endpoint
/// pair with `op`. The output is sorted by (src, dst), which makes the
/// operation idempotent: simplifying an already-simplified list returns it
/// unchanged.
pub fn simplify(
    edges: &[(u32, u32)],
    edge_weights: Option<&[f32]>,
    num_nodes: usize,
    drop_self_loops: bool,
    op: PoolOp,
) -> Result<(Vec<(u32, u32)>, Vec<f32>)> {
    if let Some(w) = edge_weights {
        if w.len() != edges.len() {
            return Err(CoverError::LengthMismatch {
                what: "edge weights",
                expected: edges.len(),
                got: w.len(),
            });
        }
    }

    let mut triplets = Vec::with_capacity(edges.len());
    for (i, &(src, dst)) in edges.iter().enumerate() {
        if src as usize >= num_nodes || dst as usize >= num_nodes {
            return Err(CoverError::EdgeOutOfRange {
                src,
                dst,
                num_nodes,
            });
        }
        if drop_self_loops && src == dst {
            continue;
        }
        triplets.push((src, dst, edge_weights.map_or(1.0, |w| w[i])));
    }

    Ok(merge_triplets(triplets, op))
}
