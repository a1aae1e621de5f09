//! Error taxonomy for the cover and pooling core

use thiserror::Error;

/// Errors raised by cover construction and pooling.
///
/// Configuration errors are detected at call entry, before any computation.
/// Input validity errors are detected before algorithmic work begins where
/// feasible, otherwise on first violation. Algorithmic edge cases (isolated
/// nodes, singleton clusters, pooled self-loops, empty candidate pools) are
/// valid outcomes, not errors.
#[derive(Debug, Error)]
pub enum CoverError {
    #[error("unknown priority: {0}")]
    UnknownPriority(String),

    #[error("priority '{0}' depends on in-progress cluster state and cannot rank cover seeds")]
    MisplacedPriority(String),

    #[error("unknown pooling operator: {0}")]
    UnknownPoolOp(String),

    #[error("k must be at least 1, got {0}")]
    InvalidK(u32),

    #[error("quantile must lie in [0, 1], got {0}")]
    InvalidQuantile(f64),

    #[error("{what}: expected {expected} entries, got {got}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("node mask is only accepted in dense pooling mode")]
    MaskOutsideDense,

    #[error("edge ({src}, {dst}) out of range for graph with {num_nodes} nodes")]
    EdgeOutOfRange { src: u32, dst: u32, num_nodes: usize },

    #[error("edge ({src}, {dst}) crosses batch boundary ({src_batch} != {dst_batch})")]
    CrossBatchEdge {
        src: u32,
        dst: u32,
        src_batch: u32,
        dst_batch: u32,
    },

    #[error("batch labels must be sorted in ascending order")]
    UnsortedBatch,

    #[error("invalid cover: {0}")]
    InvalidCover(String),

    #[error("dataset index {index} out of range for {len} graphs")]
    IndexOutOfRange { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, CoverError>;
