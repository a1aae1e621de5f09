//! Configuration for cover construction and pooling

use crate::cover::{KPlexBuilder, NodePriority};
use crate::error::{CoverError, Result};
use crate::pool::PoolOp;

/// Parameters shared by the cover builder and the pooling pipeline
#[derive(Debug, Clone)]
pub struct CoverConfig {
    /// k values, one hierarchy level each, applied in order
    pub ks: Vec<u32>,

    /// Ranking criteria for cover seed selection
    pub cover_priority: Vec<NodePriority>,

    /// Ranking criteria for k-plex growth
    pub kplex_priority: Vec<NodePriority>,

    /// Build a strict partition instead of an overlapping cover
    pub skip_covered: bool,

    /// Quantile threshold for hub promotion; None disables the pass
    pub hub_quantile: Option<f64>,

    /// Drop self-loops and re-coalesce after edge pooling
    pub simplify: bool,

    /// Merge operator for pooled edge weights
    pub edge_pool_op: PoolOp,
}

impl Default for CoverConfig {
    fn default() -> Self {
        Self {
            ks: vec![2],
            cover_priority: vec![NodePriority::MinDegree, NodePriority::MinUncovered],
            kplex_priority: vec![
                NodePriority::MaxInKplex,
                NodePriority::MaxCandidates,
                NodePriority::MinUncovered,
            ],
            skip_covered: false,
            hub_quantile: None,
            simplify: false,
            edge_pool_op: PoolOp::Add,
        }
    }
}

impl CoverConfig {
    /// Create a configuration with custom k values, defaults elsewhere
    pub fn with_ks(ks: Vec<u32>) -> Self {
        Self {
            ks,
            ..Self::default()
        }
    }

    /// Check every parameter, before any computation and regardless of
    /// dataset size
    pub fn validate(&self) -> Result<()> {
        for &k in &self.ks {
            KPlexBuilder::new(
                k,
                &self.cover_priority,
                &self.kplex_priority,
                self.skip_covered,
            )?;
        }
        if let Some(q) = self.hub_quantile {
            if !(0.0..=1.0).contains(&q) {
                return Err(CoverError::InvalidQuantile(q));
            }
        }
        Ok(())
    }
}
