//! Visualization export module

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::Result;

use crate::hierarchy::Hierarchy;

/// Number of graphs exported per level; larger datasets are truncated
const MAX_GRAPHS_PER_LEVEL: usize = 10;

/// Export pooled graphs as GraphML files for visualization tools
pub fn export_graphml(hierarchy: &Hierarchy, output_dir: &str) -> Result<()> {
    log::info!(
        "Exporting GraphML for {} hierarchy levels",
        hierarchy.levels.len()
    );

    let viz_dir = Path::new(output_dir).join("visualizations");
    fs::create_dir_all(&viz_dir)?;

    for (i, level) in hierarchy.levels.iter().enumerate() {
        for (g, graph) in level.pooled.iter().take(MAX_GRAPHS_PER_LEVEL).enumerate() {
            let file_path = viz_dir.join(format!("level_{}_graph_{}.graphml", i, g));
            let mut file = File::create(file_path)?;

            writeln!(file, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
            writeln!(
                file,
                "<graphml xmlns=\"http://graphml.graphdrawing.org/xmlns\">"
            )?;
            writeln!(
                file,
                "  <key id=\"weight\" for=\"edge\" attr.name=\"weight\" attr.type=\"float\"/>"
            )?;
            writeln!(file, "  <graph id=\"G\" edgedefault=\"directed\">")?;

            for node in 0..graph.node_count {
                writeln!(file, "    <node id=\"n{}\"/>", node)?;
            }

            let mut edge_id = 0;
            for src in 0..graph.node_count {
                for (&dst, &weight) in graph
                    .outgoing_edges(src)
                    .iter()
                    .zip(graph.outgoing_weights(src))
                {
                    writeln!(
                        file,
                        "    <edge id=\"e{}\" source=\"n{}\" target=\"n{}\">\n      <data key=\"weight\">{}</data>\n    </edge>",
                        edge_id, src, dst, weight
                    )?;
                    edge_id += 1;
                }
            }

            writeln!(file, "  </graph>")?;
            writeln!(file, "</graphml>")?;
        }
    }

    log::info!("GraphML export complete");

    Ok(())
}
