//! Greedy k-plex cover construction

use log;

use crate::cover::priority::{NodePriority, PriorityEngine, ScoreContext};
use crate::cover::Cover;
use crate::error::{CoverError, Result};
use crate::graph::NeighborIndex;

/// Greedy cover builder: repeatedly seeds a cluster and grows it into a
/// maximal k-plex under the configured priority order.
///
/// A k-plex is a node set where every member is non-adjacent to at most
/// k - 1 others inside the set. Growth is greedy and priority-guided, so the
/// result is maximal under that order, not globally maximum; the priority
/// lists are the algorithm's tunable bias.
#[derive(Debug)]
pub struct KPlexBuilder {
    k: u32,
    seed_engine: PriorityEngine,
    growth_engine: PriorityEngine,
    skip_covered: bool,
}

impl KPlexBuilder {
    /// Validate configuration and construct a builder.
    ///
    /// Fails before any computation on k < 1, unknown criteria, or a
    /// growth-only criterion in the seed list.
    pub fn new(
        k: u32,
        cover_priority: &[NodePriority],
        kplex_priority: &[NodePriority],
        skip_covered: bool,
    ) -> Result<Self> {
        if k < 1 {
            return Err(CoverError::InvalidK(k));
        }
        Ok(Self {
            k,
            seed_engine: PriorityEngine::for_seeds(cover_priority)?,
            growth_engine: PriorityEngine::for_growth(kplex_priority)?,
            skip_covered,
        })
    }

    /// Build a cover of the graph behind `index`.
    ///
    /// Eligible seeds are uncovered nodes (unassigned ones under
    /// `skip_covered`); each round covers at least its seed, so the loop
    /// terminates with every node in at least one cluster. Under
    /// `skip_covered` growth also skips assigned nodes and the cover
    /// degenerates to a partition; otherwise covered nodes may join further
    /// clusters and the cover overlaps.
    pub fn build(&self, index: &NeighborIndex) -> Cover {
        let n = index.node_count();
        let deficit_cap = self.k - 1;

        let degree: Vec<u32> = (0..n).map(|v| index.degree(v) as u32).collect();
        let mut covered = vec![0u32; n];
        let mut assigned = vec![false; n];

        // Growth scratch, allocated once and reset through the touched list
        let mut in_cluster = vec![false; n];
        let mut in_pool = vec![false; n];
        let mut kplex_adj = vec![0u32; n]; // cluster members adjacent to node
        let mut missing = vec![0u32; n]; // per-member non-neighbors inside cluster
        let mut pool_nbrs = vec![0u32; n];
        let mut touched: Vec<u32> = Vec::new();

        let mut pairs: Vec<(u32, u32)> = Vec::new();
        let mut num_clusters = 0u32;

        loop {
            let seed = {
                let ctx = ScoreContext {
                    degree: &degree,
                    covered: &covered,
                    in_kplex: None,
                    pool_neighbors: None,
                };
                let skip = self.skip_covered;
                let eligible = (0..n as u32).filter(|&v| {
                    if skip {
                        !assigned[v as usize]
                    } else {
                        covered[v as usize] == 0
                    }
                });
                self.seed_engine.select(eligible, &ctx)
            };
            let Some(seed) = seed else {
                break;
            };

            let mut cluster: Vec<u32> = vec![seed];
            let mut pool: Vec<u32> = Vec::new();
            let mut saturated: Vec<u32> = Vec::new();

            in_cluster[seed as usize] = true;
            touched.push(seed);
            if deficit_cap == 0 {
                saturated.push(seed);
            }

            // Candidate pool starts from the seed's neighborhood
            for &w in index.neighbors(seed as usize) {
                if self.skip_covered && assigned[w as usize] {
                    continue;
                }
                kplex_adj[w as usize] = 1;
                in_pool[w as usize] = true;
                touched.push(w);
                pool.push(w);
            }

            while !pool.is_empty() {
                if self.growth_engine.needs_pool_counts() {
                    for &c in &pool {
                        pool_nbrs[c as usize] = index
                            .neighbors(c as usize)
                            .iter()
                            .filter(|&&w| in_pool[w as usize])
                            .count() as u32;
                    }
                }

                let best = {
                    let ctx = ScoreContext {
                        degree: &degree,
                        covered: &covered,
                        in_kplex: Some(&kplex_adj),
                        pool_neighbors: Some(&pool_nbrs),
                    };
                    self.growth_engine
                        .select(pool.iter().copied(), &ctx)
                        .expect("pool is non-empty")
                };

                in_pool[best as usize] = false;
                pool.retain(|&c| c != best);

                // The new member's own deficit: members it is not adjacent to
                missing[best as usize] = cluster.len() as u32 - kplex_adj[best as usize];

                // Bump deficits of members non-adjacent to the new one; a
                // member hitting the cap restricts all future additions to
                // its neighborhood
                for i in 0..cluster.len() {
                    let m = cluster[i];
                    if !index.contains(best as usize, m) {
                        missing[m as usize] += 1;
                        if missing[m as usize] == deficit_cap {
                            saturated.push(m);
                            pool.retain(|&c| {
                                let keep = index.contains(m as usize, c);
                                if !keep {
                                    in_pool[c as usize] = false;
                                }
                                keep
                            });
                        }
                    }
                }

                cluster.push(best);
                in_cluster[best as usize] = true;
                if missing[best as usize] == deficit_cap {
                    saturated.push(best);
                    pool.retain(|&c| {
                        let keep = index.contains(best as usize, c);
                        if !keep {
                            in_pool[c as usize] = false;
                        }
                        keep
                    });
                }

                // Update adjacency counts and offer the new member's
                // neighbors to the pool
                for &w in index.neighbors(best as usize) {
                    touched.push(w);
                    kplex_adj[w as usize] += 1;

                    if in_cluster[w as usize] || in_pool[w as usize] {
                        continue;
                    }
                    if self.skip_covered && assigned[w as usize] {
                        continue;
                    }
                    let own_deficit = cluster.len() as u32 - kplex_adj[w as usize];
                    if own_deficit > deficit_cap {
                        continue;
                    }
                    if !saturated.iter().all(|&m| index.contains(w as usize, m)) {
                        continue;
                    }
                    in_pool[w as usize] = true;
                    pool.push(w);
                }

                // The cluster grew: drop pool nodes whose own deficit no
                // longer fits
                pool.retain(|&c| {
                    let keep = cluster.len() as u32 - kplex_adj[c as usize] <= deficit_cap;
                    if !keep {
                        in_pool[c as usize] = false;
                    }
                    keep
                });
            }

            for &member in &cluster {
                pairs.push((member, num_clusters));
                covered[member as usize] += 1;
                assigned[member as usize] = true;
            }
            num_clusters += 1;

            for &v in &touched {
                in_cluster[v as usize] = false;
                in_pool[v as usize] = false;
                kplex_adj[v as usize] = 0;
                missing[v as usize] = 0;
                pool_nbrs[v as usize] = 0;
            }
            touched.clear();
        }

        log::debug!(
            "covered {} nodes with {} k-plex clusters (k = {})",
            n,
            num_clusters,
            self.k
        );

        Cover {
            num_nodes: n,
            num_clusters: num_clusters as usize,
            pairs,
            values: None,
        }
    }
}
