//! Cover-based pooling operators

pub mod edges;
pub mod nodes;
pub mod simplify;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoverError;

pub use edges::pool_edges;
pub use nodes::pool_nodes;
pub use simplify::simplify;

/// Aggregation operator for pooling reductions and duplicate-edge merges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolOp {
    /// Sum contributions
    Add,
    /// Take the largest contribution
    Max,
    /// Take the smallest contribution
    Min,
    /// Average contributions
    Mean,
}

impl PoolOp {
    pub fn as_str(self) -> &'static str {
        match self {
            PoolOp::Add => "add",
            PoolOp::Max => "max",
            PoolOp::Min => "min",
            PoolOp::Mean => "mean",
        }
    }
}

impl FromStr for PoolOp {
    type Err = CoverError;

    fn from_str(s: &str) -> Result<Self, CoverError> {
        match s {
            "add" => Ok(PoolOp::Add),
            "max" => Ok(PoolOp::Max),
            "min" => Ok(PoolOp::Min),
            "mean" => Ok(PoolOp::Mean),
            other => Err(CoverError::UnknownPoolOp(other.to_string())),
        }
    }
}

impl fmt::Display for PoolOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Merge weighted (row, col, weight) triplets sharing an index pair.
///
/// Sorts by (row, col) and folds duplicates with `op`, so the output is
/// deterministic and sorted. Both the sparse product chain and Simplify
/// coalesce through this.
pub(crate) fn merge_triplets(
    mut triplets: Vec<(u32, u32, f32)>,
    op: PoolOp,
) -> (Vec<(u32, u32)>, Vec<f32>) {
    triplets.sort_by_key(|&(r, c, _)| (r, c));

    let mut pairs: Vec<(u32, u32)> = Vec::with_capacity(triplets.len());
    let mut weights: Vec<f32> = Vec::with_capacity(triplets.len());
    let mut counts: Vec<u32> = Vec::new();

    for (r, c, w) in triplets {
        if let Some(&(pr, pc)) = pairs.last() {
            if pr == r && pc == c {
                let acc = weights.last_mut().expect("parallel arrays");
                match op {
                    PoolOp::Add | PoolOp::Mean => *acc += w,
                    PoolOp::Max => *acc = acc.max(w),
                    PoolOp::Min => *acc = acc.min(w),
                }
                if op == PoolOp::Mean {
                    *counts.last_mut().expect("parallel arrays") += 1;
                }
                continue;
            }
        }
        pairs.push((r, c));
        weights.push(w);
        if op == PoolOp::Mean {
            counts.push(1);
        }
    }

    if op == PoolOp::Mean {
        for (w, n) in weights.iter_mut().zip(counts) {
            *w /= n as f32;
        }
    }

    (pairs, weights)
}
