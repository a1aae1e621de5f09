//! Multi-level hierarchy construction and caching

use std::sync::Arc;

use log;
use rayon::prelude::*;

use crate::config::CoverConfig;
use crate::cover::{promote_hubs, Cover, KPlexBuilder};
use crate::error::{CoverError, Result};
use crate::graph::CompressedGraph;
use crate::pool::{pool_edges, simplify};

/// One hierarchy level: the covers built at this k and the pooled graphs
/// they produced, aligned with the level's input graphs
#[derive(Debug, Clone)]
pub struct HierarchyLevel {
    /// The k this level was built with
    pub k: u32,

    /// Cover per input graph
    pub covers: Vec<Arc<Cover>>,

    /// Pooled graph per input graph; input to the next level
    pub pooled: Vec<Arc<CompressedGraph>>,
}

/// An ordered sequence of covers and pooled graphs, one level per k.
///
/// Immutable once built; all contents sit behind `Arc`, so selections and
/// clones share rather than copy.
#[derive(Debug, Clone)]
pub struct Hierarchy {
    pub levels: Vec<HierarchyLevel>,

    /// The terminal pooled graphs after the last level
    pub final_graphs: Vec<Arc<CompressedGraph>>,
}

impl Hierarchy {
    /// Number of graphs the hierarchy was built over
    pub fn num_graphs(&self) -> usize {
        self.final_graphs.len()
    }

    /// Select a subset of graphs by dataset index, sharing the underlying
    /// covers and graphs
    pub fn select(&self, indices: &[usize]) -> Result<Hierarchy> {
        let len = self.num_graphs();
        if let Some(&bad) = indices.iter().find(|&&i| i >= len) {
            return Err(CoverError::IndexOutOfRange { index: bad, len });
        }

        let levels = self
            .levels
            .iter()
            .map(|level| HierarchyLevel {
                k: level.k,
                covers: indices.iter().map(|&i| level.covers[i].clone()).collect(),
                pooled: indices.iter().map(|&i| level.pooled[i].clone()).collect(),
            })
            .collect();

        Ok(Hierarchy {
            levels,
            final_graphs: indices
                .iter()
                .map(|&i| self.final_graphs[i].clone())
                .collect(),
        })
    }
}

/// Run one pipeline step on a single graph: cover, optional hub promotion,
/// edge pooling, optional simplify. Returns the cover and the pooled graph
/// whose node count equals the cover's cluster count.
pub fn pool_level(
    graph: &CompressedGraph,
    k: u32,
    config: &CoverConfig,
) -> Result<(Cover, CompressedGraph)> {
    let builder = KPlexBuilder::new(
        k,
        &config.cover_priority,
        &config.kplex_priority,
        config.skip_covered,
    )?;

    let index = graph.neighbor_index();
    let mut cover = builder.build(&index);

    if let Some(q) = config.hub_quantile {
        cover = promote_hubs(&cover, &index, q)?;
    }

    let (edges, weights) = graph.to_coo();
    let (mut pooled_edges, mut pooled_weights) = pool_edges(
        &cover,
        &edges,
        Some(&weights),
        graph.node_count,
        config.edge_pool_op,
    )?;

    if config.simplify {
        (pooled_edges, pooled_weights) = simplify(
            &pooled_edges,
            Some(&pooled_weights),
            cover.num_clusters,
            true,
            config.edge_pool_op,
        )?;
    }

    let pooled =
        CompressedGraph::from_coo(cover.num_clusters, &pooled_edges, Some(&pooled_weights))?;

    Ok((cover, pooled))
}

/// Build the full hierarchy for a dataset of graphs.
///
/// Levels are computed strictly in sequence (each level's pooled graphs
/// feed the next), while the graphs inside one level are processed in
/// parallel; the order-preserving collect is the join point.
pub fn build_hierarchy(
    graphs: &[Arc<CompressedGraph>],
    config: &CoverConfig,
) -> Result<Hierarchy> {
    config.validate()?;

    let mut current: Vec<Arc<CompressedGraph>> = graphs.to_vec();
    let mut levels = Vec::with_capacity(config.ks.len());

    for &k in &config.ks {
        let results: Vec<(Cover, CompressedGraph)> = current
            .par_iter()
            .map(|graph| pool_level(graph, k, config))
            .collect::<Result<Vec<_>>>()?;

        let mut covers = Vec::with_capacity(results.len());
        let mut pooled = Vec::with_capacity(results.len());
        for (cover, graph) in results {
            covers.push(Arc::new(cover));
            pooled.push(Arc::new(graph));
        }

        log::info!(
            "level k = {}: {} graphs, {} clusters total",
            k,
            pooled.len(),
            covers.iter().map(|c| c.num_clusters).sum::<usize>()
        );

        current = pooled.clone();
        levels.push(HierarchyLevel { k, covers, pooled });
    }

    Ok(Hierarchy {
        levels,
        final_graphs: current,
    })
}

/// Whether a cache materializes the hierarchy up front or recomputes per
/// request. The two modes return identical results; the choice trades
/// memory against recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheMode {
    /// Compute and retain every level for the whole dataset at construction
    Eager,
    /// Recompute the hierarchy for each requested index subset
    Lazy,
}

/// Hierarchy access front-end for a dataset of graphs
pub struct HierarchyCache {
    config: CoverConfig,
    dataset: Vec<Arc<CompressedGraph>>,
    cache: Option<Hierarchy>,
}

impl HierarchyCache {
    /// Create a cache; eager mode materializes the hierarchy now
    pub fn new(
        dataset: Vec<Arc<CompressedGraph>>,
        config: CoverConfig,
        mode: CacheMode,
    ) -> Result<Self> {
        config.validate()?;
        let cache = match mode {
            CacheMode::Eager => Some(build_hierarchy(&dataset, &config)?),
            CacheMode::Lazy => None,
        };
        Ok(Self {
            config,
            dataset,
            cache,
        })
    }

    /// Number of graphs in the dataset
    pub fn len(&self) -> usize {
        self.dataset.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    /// Hierarchy for a batch of dataset indices.
    ///
    /// Eager mode shares the cached levels; lazy mode recomputes for just
    /// this batch and discards the result after returning it.
    pub fn get(&self, indices: &[usize]) -> Result<Hierarchy> {
        if let Some(&bad) = indices.iter().find(|&&i| i >= self.dataset.len()) {
            return Err(CoverError::IndexOutOfRange {
                index: bad,
                len: self.dataset.len(),
            });
        }

        match &self.cache {
            Some(hierarchy) => hierarchy.select(indices),
            None => {
                let subset: Vec<Arc<CompressedGraph>> =
                    indices.iter().map(|&i| self.dataset[i].clone()).collect();
                build_hierarchy(&subset, &self.config)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cycle_graph(n: u32) -> Arc<CompressedGraph> {
        let mut edges = Vec::new();
        for v in 0..n {
            let w = (v + 1) % n;
            edges.push((v, w));
            edges.push((w, v));
        }
        Arc::new(CompressedGraph::from_coo(n as usize, &edges, None).unwrap())
    }

    #[test]
    fn levels_chain_into_smaller_graphs() {
        let config = CoverConfig::with_ks(vec![2, 2]);
        let hierarchy = build_hierarchy(&[cycle_graph(8)], &config).unwrap();

        assert_eq!(hierarchy.levels.len(), 2);
        let first = hierarchy.levels[0].pooled[0].node_count;
        let second = hierarchy.levels[1].pooled[0].node_count;
        assert!(first <= 8);
        assert!(second <= first);
        assert_eq!(hierarchy.final_graphs[0].node_count, second);
    }

    #[test]
    fn select_rejects_out_of_range_indices() {
        let config = CoverConfig::with_ks(vec![2]);
        let hierarchy = build_hierarchy(&[cycle_graph(4)], &config).unwrap();
        let err = hierarchy.select(&[1]).unwrap_err();
        assert!(matches!(err, CoverError::IndexOutOfRange { index: 1, len: 1 }));
    }
}
