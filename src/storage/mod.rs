//! Results persistence module

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use serde_json::{json, to_string_pretty};

use crate::cover::metrics::cover_stats;
use crate::graph::CompressedGraph;
use crate::hierarchy::Hierarchy;

/// Save hierarchy results to the specified directory
pub fn save_results(
    hierarchy: &Hierarchy,
    dataset: &[Arc<CompressedGraph>],
    output_dir: &str,
) -> Result<()> {
    log::info!(
        "Saving {} hierarchy levels to {}",
        hierarchy.levels.len(),
        output_dir
    );

    fs::create_dir_all(output_dir)?;

    save_summary(hierarchy, dataset, output_dir)?;
    save_levels(hierarchy, dataset, output_dir)?;
    save_graph_stats(hierarchy, dataset, output_dir)?;

    log::info!("Results saved successfully");

    Ok(())
}

/// Save summary information
fn save_summary(
    hierarchy: &Hierarchy,
    dataset: &[Arc<CompressedGraph>],
    output_dir: &str,
) -> Result<()> {
    log::info!("Saving summary information");

    let path = Path::new(output_dir).join("summary.json");
    let mut file = File::create(path)?;

    let total_nodes: usize = dataset.iter().map(|g| g.node_count).sum();
    let total_edges: usize = dataset.iter().map(|g| g.edge_count()).sum();

    let level_summaries: Vec<_> = hierarchy
        .levels
        .iter()
        .map(|level| {
            json!({
                "k": level.k,
                "clusters": level.covers.iter().map(|c| c.num_clusters).sum::<usize>(),
                "memberships": level.covers.iter().map(|c| c.pairs.len()).sum::<usize>(),
                "pooled_edges": level.pooled.iter().map(|g| g.edge_count()).sum::<usize>(),
            })
        })
        .collect();

    let summary = json!({
        "dataset": {
            "graph_count": dataset.len(),
            "node_count": total_nodes,
            "edge_count": total_edges,
        },
        "hierarchy": {
            "level_count": hierarchy.levels.len(),
            "levels": level_summaries,
            "final_node_count": hierarchy.final_graphs.iter().map(|g| g.node_count).sum::<usize>(),
            "final_edge_count": hierarchy.final_graphs.iter().map(|g| g.edge_count()).sum::<usize>(),
        }
    });

    file.write_all(to_string_pretty(&summary)?.as_bytes())?;

    Ok(())
}

/// Save per-level cover statistics
fn save_levels(
    hierarchy: &Hierarchy,
    dataset: &[Arc<CompressedGraph>],
    output_dir: &str,
) -> Result<()> {
    log::info!("Saving per-level cover statistics");

    let levels_dir = Path::new(output_dir).join("levels");
    fs::create_dir_all(&levels_dir)?;

    // Each level's covers were built against the previous level's output
    let mut inputs: Vec<Arc<CompressedGraph>> = dataset.to_vec();

    for (i, level) in hierarchy.levels.iter().enumerate() {
        let path = levels_dir.join(format!("level_{}.json", i));
        let mut file = File::create(path)?;

        let graphs: Vec<_> = level
            .covers
            .iter()
            .zip(&inputs)
            .zip(&level.pooled)
            .map(|((cover, input), pooled)| {
                let stats = cover_stats(cover, &input.neighbor_index());
                json!({
                    "input_nodes": input.node_count,
                    "pooled_nodes": pooled.node_count,
                    "pooled_edges": pooled.edge_count(),
                    "cover": stats,
                })
            })
            .collect();

        let level_json = json!({
            "level": i,
            "k": level.k,
            "graphs": graphs,
        });

        file.write_all(to_string_pretty(&level_json)?.as_bytes())?;

        inputs = level.pooled.clone();
    }

    Ok(())
}

/// Save graph statistics
fn save_graph_stats(
    hierarchy: &Hierarchy,
    dataset: &[Arc<CompressedGraph>],
    output_dir: &str,
) -> Result<()> {
    log::info!("Saving graph statistics");

    let path = Path::new(output_dir).join("graph_stats.json");
    let mut file = File::create(path)?;

    let stats = json!({
        "original": degree_distribution(dataset),
        "final": degree_distribution(&hierarchy.final_graphs),
    });

    file.write_all(to_string_pretty(&stats)?.as_bytes())?;

    Ok(())
}

/// Bucketed out-degree distribution over a set of graphs (0-100+ buckets)
fn degree_distribution(graphs: &[Arc<CompressedGraph>]) -> serde_json::Value {
    let mut buckets = vec![0usize; 101];
    let mut node_count = 0usize;
    let mut edge_count = 0usize;

    for graph in graphs {
        node_count += graph.node_count;
        edge_count += graph.edge_count();
        for node in 0..graph.node_count {
            let bucket = std::cmp::min(graph.out_degree(node), 100);
            buckets[bucket] += 1;
        }
    }

    json!({
        "node_count": node_count,
        "edge_count": edge_count,
        "avg_degree": if node_count == 0 { 0.0 } else { edge_count as f64 / node_count as f64 },
        "degree_distribution": buckets,
    })
}
