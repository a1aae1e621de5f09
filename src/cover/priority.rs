//! Candidate ranking criteria for seed selection and k-plex growth

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoverError, Result};

/// Ranking criterion for cover seeds and k-plex growth candidates.
///
/// The four in-kplex/candidates criteria read in-progress cluster state and
/// are rejected in seed position, where no cluster exists yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodePriority {
    /// Prefer nodes of low symmetric degree
    MinDegree,
    /// Prefer nodes covered by few clusters so far
    MinUncovered,
    /// Prefer nodes most connected to the current cluster
    MaxInKplex,
    /// Prefer nodes least connected to the current cluster
    MinInKplex,
    /// Prefer nodes keeping the largest candidate pool
    MaxCandidates,
    /// Prefer nodes keeping the smallest candidate pool
    MinCandidates,
}

impl NodePriority {
    /// True for criteria that only make sense while a cluster is growing
    pub fn growth_only(self) -> bool {
        matches!(
            self,
            NodePriority::MaxInKplex
                | NodePriority::MinInKplex
                | NodePriority::MaxCandidates
                | NodePriority::MinCandidates
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodePriority::MinDegree => "min_degree",
            NodePriority::MinUncovered => "min_uncovered",
            NodePriority::MaxInKplex => "max_in_kplex",
            NodePriority::MinInKplex => "min_in_kplex",
            NodePriority::MaxCandidates => "max_candidates",
            NodePriority::MinCandidates => "min_candidates",
        }
    }
}

impl FromStr for NodePriority {
    type Err = CoverError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "min_degree" => Ok(NodePriority::MinDegree),
            "min_uncovered" => Ok(NodePriority::MinUncovered),
            "max_in_kplex" => Ok(NodePriority::MaxInKplex),
            "min_in_kplex" => Ok(NodePriority::MinInKplex),
            "max_candidates" => Ok(NodePriority::MaxCandidates),
            "min_candidates" => Ok(NodePriority::MinCandidates),
            other => Err(CoverError::UnknownPriority(other.to_string())),
        }
    }
}

impl fmt::Display for NodePriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-candidate state the criteria score against.
///
/// `in_kplex` and `pool_neighbors` are only populated during growth; the
/// seed engine never dereferences them.
pub struct ScoreContext<'a> {
    /// Symmetric degree per node
    pub degree: &'a [u32],
    /// Number of clusters already containing each node
    pub covered: &'a [u32],
    /// Number of current cluster members adjacent to each node
    pub in_kplex: Option<&'a [u32]>,
    /// Number of current pool members adjacent to each node
    pub pool_neighbors: Option<&'a [u32]>,
}

/// Evaluates an ordered criteria list over candidate nodes.
///
/// Criteria compare lexicographically, first criterion dominant. `min_*`
/// criteria rank ascending, `max_*` descending; any residual tie breaks by
/// ascending node id, so selection is total and reproducible.
#[derive(Debug, Clone)]
pub struct PriorityEngine {
    criteria: Vec<NodePriority>,
}

impl PriorityEngine {
    /// Engine for cover seed selection. Rejects growth-only criteria.
    pub fn for_seeds(criteria: &[NodePriority]) -> Result<Self> {
        if let Some(p) = criteria.iter().find(|p| p.growth_only()) {
            return Err(CoverError::MisplacedPriority(p.as_str().to_string()));
        }
        Ok(Self {
            criteria: criteria.to_vec(),
        })
    }

    /// Engine for k-plex growth. Accepts every criterion.
    pub fn for_growth(criteria: &[NodePriority]) -> Result<Self> {
        Ok(Self {
            criteria: criteria.to_vec(),
        })
    }

    /// True if any configured criterion reads pool-neighbor counts
    pub fn needs_pool_counts(&self) -> bool {
        self.criteria.iter().any(|p| {
            matches!(
                p,
                NodePriority::MaxCandidates | NodePriority::MinCandidates
            )
        })
    }

    fn score(&self, criterion: NodePriority, node: usize, ctx: &ScoreContext) -> i64 {
        match criterion {
            NodePriority::MinDegree => ctx.degree[node] as i64,
            NodePriority::MinUncovered => ctx.covered[node] as i64,
            NodePriority::MaxInKplex => -(ctx.in_kplex.expect("growth context")[node] as i64),
            NodePriority::MinInKplex => ctx.in_kplex.expect("growth context")[node] as i64,
            NodePriority::MaxCandidates => {
                -(ctx.pool_neighbors.expect("growth context")[node] as i64)
            }
            NodePriority::MinCandidates => {
                ctx.pool_neighbors.expect("growth context")[node] as i64
            }
        }
    }

    fn compare(&self, a: u32, b: u32, ctx: &ScoreContext) -> Ordering {
        for &criterion in &self.criteria {
            let sa = self.score(criterion, a as usize, ctx);
            let sb = self.score(criterion, b as usize, ctx);
            match sa.cmp(&sb) {
                Ordering::Equal => continue,
                other => return other,
            }
        }
        a.cmp(&b)
    }

    /// Pick the top-ranked candidate, or None if the iterator is empty
    pub fn select<I>(&self, candidates: I, ctx: &ScoreContext) -> Option<u32>
    where
        I: IntoIterator<Item = u32>,
    {
        candidates
            .into_iter()
            .min_by(|&a, &b| self.compare(a, b, ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx<'a>(degree: &'a [u32], covered: &'a [u32]) -> ScoreContext<'a> {
        ScoreContext {
            degree,
            covered,
            in_kplex: None,
            pool_neighbors: None,
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "med_degree".parse::<NodePriority>().unwrap_err();
        assert!(matches!(err, CoverError::UnknownPriority(_)));
    }

    #[test]
    fn growth_only_criteria_rejected_for_seeds() {
        let err =
            PriorityEngine::for_seeds(&[NodePriority::MinDegree, NodePriority::MaxCandidates])
                .unwrap_err();
        assert!(matches!(err, CoverError::MisplacedPriority(_)));

        // The same list is fine for growth
        PriorityEngine::for_growth(&[NodePriority::MinDegree, NodePriority::MaxCandidates])
            .unwrap();
    }

    #[test]
    fn lexicographic_order_with_id_tie_break() {
        let degree = [3, 1, 1, 2];
        let covered = [0, 2, 1, 0];
        let engine = PriorityEngine::for_seeds(&[NodePriority::MinDegree]).unwrap();

        // Nodes 1 and 2 tie on degree; ascending id wins
        assert_eq!(engine.select(0..4u32, &ctx(&degree, &covered)), Some(1));

        // A second criterion breaks the tie before the id does
        let engine =
            PriorityEngine::for_seeds(&[NodePriority::MinDegree, NodePriority::MinUncovered])
                .unwrap();
        assert_eq!(engine.select(0..4u32, &ctx(&degree, &covered)), Some(2));
    }

    #[test]
    fn max_criteria_rank_descending() {
        let degree = [0, 0, 0];
        let covered = [0, 0, 0];
        let in_kplex = [1, 3, 2];
        let context = ScoreContext {
            degree: &degree,
            covered: &covered,
            in_kplex: Some(&in_kplex),
            pool_neighbors: None,
        };
        let engine = PriorityEngine::for_growth(&[NodePriority::MaxInKplex]).unwrap();
        assert_eq!(engine.select(0..3u32, &context), Some(1));
    }
}
