//! Hub promotion: post-pass cover refinement around high-degree nodes

use log;
use statrs::statistics::{Data, OrderStatistics};

use crate::cover::Cover;
use crate::error::{CoverError, Result};
use crate::graph::NeighborIndex;

/// Reassign high-degree nodes ("hubs") into neighboring clusters.
///
/// Hubs are nodes whose symmetric degree reaches the `q`-quantile of the
/// degree distribution; the greedy pass tends to leave them fragmenting the
/// cover across their many neighborhoods. Each hub gains one extra
/// membership in the adjacent cluster with the most members adjacent to it
/// (ties toward the lower cluster id), skipping clusters it already belongs
/// to. Only memberships are added: no cluster is created or removed and the
/// builder is never revisited.
pub fn promote_hubs(cover: &Cover, index: &NeighborIndex, q: f64) -> Result<Cover> {
    if !(0.0..=1.0).contains(&q) {
        return Err(CoverError::InvalidQuantile(q));
    }
    if index.node_count() != cover.num_nodes {
        return Err(CoverError::LengthMismatch {
            what: "neighbor index",
            expected: cover.num_nodes,
            got: index.node_count(),
        });
    }
    cover.validate()?;

    if cover.num_nodes == 0 {
        return Ok(cover.clone());
    }

    let degrees: Vec<f64> = (0..cover.num_nodes).map(|v| index.degree(v) as f64).collect();
    let mut data = Data::new(degrees.clone());
    let threshold = data.quantile(q);

    // Clusters per node, needed to score a hub's surroundings
    let mut node_clusters: Vec<Vec<u32>> = vec![Vec::new(); cover.num_nodes];
    for &(node, cluster) in &cover.pairs {
        node_clusters[node as usize].push(cluster);
    }

    let mut promoted = cover.clone();
    let mut scores = vec![0u32; cover.num_clusters];
    let mut touched: Vec<u32> = Vec::new();
    let mut added = 0usize;

    for hub in 0..cover.num_nodes {
        if degrees[hub] < threshold || degrees[hub] == 0.0 {
            continue;
        }

        // Connectivity of each adjacent cluster to the hub
        for &w in index.neighbors(hub) {
            for &c in &node_clusters[w as usize] {
                if scores[c as usize] == 0 {
                    touched.push(c);
                }
                scores[c as usize] += 1;
            }
        }

        let own = &node_clusters[hub];
        let mut best: Option<(u32, u32)> = None; // (connectivity, cluster)
        touched.sort_unstable();
        for &c in &touched {
            if own.contains(&c) {
                continue;
            }
            let score = scores[c as usize];
            match best {
                Some((s, _)) if s >= score => {}
                _ => best = Some((score, c)),
            }
        }

        if let Some((_, cluster)) = best {
            promoted.pairs.push((hub as u32, cluster));
            if let Some(values) = promoted.values.as_mut() {
                values.push(1.0);
            }
            added += 1;
        }

        for &c in &touched {
            scores[c as usize] = 0;
        }
        touched.clear();
    }

    log::debug!(
        "hub promotion (q = {}): added {} memberships at degree threshold {}",
        q,
        added,
        threshold
    );

    Ok(promoted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::CompressedGraph;

    fn star_index() -> NeighborIndex {
        // Node 0 is the hub of a 4-spoke star
        CompressedGraph::from_coo(5, &[(0, 1), (0, 2), (0, 3), (0, 4)], None)
            .unwrap()
            .neighbor_index()
    }

    #[test]
    fn rejects_quantile_outside_unit_interval() {
        let cover = Cover {
            num_nodes: 5,
            num_clusters: 1,
            pairs: vec![(0, 0), (1, 0), (2, 0), (3, 0), (4, 0)],
            values: None,
        };
        let err = promote_hubs(&cover, &star_index(), 1.5).unwrap_err();
        assert!(matches!(err, CoverError::InvalidQuantile(_)));
    }

    #[test]
    fn hub_joins_its_most_connected_external_cluster() {
        // Cluster 0 holds the hub and one spoke; clusters 1 and 2 split the
        // remaining spokes 2:1
        let cover = Cover {
            num_nodes: 5,
            num_clusters: 3,
            pairs: vec![(0, 0), (1, 0), (2, 1), (3, 1), (4, 2)],
            values: None,
        };
        let promoted = promote_hubs(&cover, &star_index(), 1.0).unwrap();

        assert_eq!(promoted.num_clusters, cover.num_clusters);
        assert_eq!(promoted.pairs.len(), cover.pairs.len() + 1);
        assert_eq!(*promoted.pairs.last().unwrap(), (0, 1));
        promoted.validate().unwrap();
    }

    #[test]
    fn fully_covered_hub_is_left_alone() {
        let cover = Cover {
            num_nodes: 5,
            num_clusters: 1,
            pairs: vec![(0, 0), (1, 0), (2, 0), (3, 0), (4, 0)],
            values: None,
        };
        let promoted = promote_hubs(&cover, &star_index(), 0.5).unwrap();
        assert_eq!(promoted.pairs.len(), cover.pairs.len());
    }
}
