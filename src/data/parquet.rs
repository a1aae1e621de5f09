//! Parquet file handling for graph datasets

use std::collections::BTreeMap;

use anyhow::Result;
use log;
use polars::prelude::*;

use crate::graph::builder::GraphBuilder;
use crate::graph::CompressedGraph;

/// Load a graph dataset from a Parquet edge list.
///
/// Expects integer `src` and `dst` columns. An optional `weight` column
/// (float) supplies edge weights, defaulting to 1.0. An optional `graph`
/// column (integer) splits the file into multiple graphs, returned in
/// ascending graph-id order; without it the file is one graph. Node ids
/// may be arbitrary integers; they are remapped to dense indices per graph
/// in first-seen order, with the original ids retained for reporting.
pub fn load_edge_data(path: &str) -> Result<Vec<CompressedGraph>> {
    log::info!("Reading parquet file: {}", path);

    if !std::path::Path::new(path).exists() {
        return Err(anyhow::anyhow!("File not found: {}", path));
    }

    let df = LazyFrame::scan_parquet(path, Default::default())?.collect()?;

    log::info!("Loaded {} edges", df.height());

    let src_col = df.column("src")?.i64()?;
    let dst_col = df.column("dst")?.i64()?;

    let weight_col = match df.column("weight") {
        Ok(col) => Some(col.f64()?),
        Err(_) => None,
    };
    let graph_col = match df.column("graph") {
        Ok(col) => Some(col.i64()?),
        Err(_) => None,
    };

    // One builder per graph id, kept in ascending id order
    let mut builders: BTreeMap<i64, GraphBuilder> = BTreeMap::new();

    for i in 0..df.height() {
        let (Some(src), Some(dst)) = (src_col.get(i), dst_col.get(i)) else {
            continue;
        };
        let weight = weight_col
            .and_then(|col| col.get(i))
            .unwrap_or(1.0) as f32;
        let graph_id = graph_col.and_then(|col| col.get(i)).unwrap_or(0);

        builders
            .entry(graph_id)
            .or_insert_with(|| GraphBuilder::with_capacity(1024))
            .add_edge(src, dst, weight);
    }

    let mut graphs = Vec::with_capacity(builders.len());
    for (graph_id, builder) in builders {
        let graph = builder.build()?;
        log::debug!(
            "graph {}: {} nodes, {} edges",
            graph_id,
            graph.node_count,
            graph.edge_count()
        );
        graphs.push(graph);
    }

    log::info!("Built {} graphs", graphs.len());

    Ok(graphs)
}
