//! Node feature pooling through a cover

use ndarray::{concatenate, Array2, ArrayView2, Axis};

use crate::cover::Cover;
use crate::error::{CoverError, Result};
use crate::pool::PoolOp;

/// Pool node features into cluster features through the cover's bipartite
/// assignment, treated as a sparse `num_nodes x num_clusters` matrix.
///
/// `Add` and `Mean` are weighted by the membership values (`Cᵗ·x`); `Max`
/// and `Min` are segmented extremes over the raw member rows. Several
/// operators may be applied at once, concatenating results along the
/// feature axis. In dense mode an optional per-node mask excludes padding
/// rows from the reduction; clusters left without members come out as zero
/// rows.
pub fn pool_nodes(
    cover: &Cover,
    x: ArrayView2<f32>,
    ops: &[PoolOp],
    dense: bool,
    mask: Option<&[bool]>,
) -> Result<Array2<f32>> {
    cover.validate()?;

    if ops.is_empty() {
        return Err(CoverError::LengthMismatch {
            what: "pooling operators",
            expected: 1,
            got: 0,
        });
    }
    if x.nrows() != cover.num_nodes {
        return Err(CoverError::LengthMismatch {
            what: "feature rows",
            expected: cover.num_nodes,
            got: x.nrows(),
        });
    }
    if let Some(m) = mask {
        if !dense {
            return Err(CoverError::MaskOutsideDense);
        }
        if m.len() != cover.num_nodes {
            return Err(CoverError::LengthMismatch {
                what: "node mask",
                expected: cover.num_nodes,
                got: m.len(),
            });
        }
    }

    let pooled: Vec<Array2<f32>> = ops
        .iter()
        .map(|&op| pool_single(cover, x, op, mask))
        .collect();

    if pooled.len() == 1 {
        return Ok(pooled.into_iter().next().expect("one operator"));
    }

    let views: Vec<ArrayView2<f32>> = pooled.iter().map(|a| a.view()).collect();
    Ok(concatenate(Axis(1), &views).expect("pooled blocks share row count"))
}

fn pool_single(
    cover: &Cover,
    x: ArrayView2<f32>,
    op: PoolOp,
    mask: Option<&[bool]>,
) -> Array2<f32> {
    let dim = x.ncols();
    let init = match op {
        PoolOp::Add | PoolOp::Mean => 0.0,
        PoolOp::Max => f32::NEG_INFINITY,
        PoolOp::Min => f32::INFINITY,
    };
    let mut out = Array2::from_elem((cover.num_clusters, dim), init);
    let mut weight_sums = vec![0.0f32; cover.num_clusters];
    let mut member_seen = vec![false; cover.num_clusters];

    for (i, &(node, cluster)) in cover.pairs.iter().enumerate() {
        if mask.is_some_and(|m| !m[node as usize]) {
            continue;
        }
        let value = cover.value(i);
        let row = x.row(node as usize);
        let mut target = out.row_mut(cluster as usize);
        member_seen[cluster as usize] = true;

        match op {
            PoolOp::Add | PoolOp::Mean => {
                for (o, &f) in target.iter_mut().zip(row) {
                    *o += value * f;
                }
                weight_sums[cluster as usize] += value;
            }
            PoolOp::Max => {
                for (o, &f) in target.iter_mut().zip(row) {
                    *o = o.max(f);
                }
            }
            PoolOp::Min => {
                for (o, &f) in target.iter_mut().zip(row) {
                    *o = o.min(f);
                }
            }
        }
    }

    match op {
        PoolOp::Mean => {
            for (c, mut row) in out.rows_mut().into_iter().enumerate() {
                if weight_sums[c] != 0.0 {
                    row.mapv_inplace(|v| v / weight_sums[c]);
                }
            }
        }
        PoolOp::Max | PoolOp::Min => {
            // Clusters emptied by the mask fall back to zero rows
            for (c, mut row) in out.rows_mut().into_iter().enumerate() {
                if !member_seen[c] {
                    row.fill(0.0);
                }
            }
        }
        PoolOp::Add => {}
    }

    out
}
