//! Graph construction module

use std::collections::HashMap;

use anyhow::Result;

use crate::graph::CompressedGraph;

/// Builder for incrementally constructing a CompressedGraph from edges with
/// arbitrary external integer ids. Ids are remapped to dense indices in
/// first-seen order.
pub struct GraphBuilder {
    /// Number of nodes
    node_count: usize,

    /// Mapping from external ids to node indices
    id_to_index: HashMap<i64, u32>,

    /// External node ids in index order
    node_ids: Vec<String>,

    /// Adjacency lists for each node, with weights
    adjacency_lists: Vec<Vec<(u32, f32)>>,
}

impl GraphBuilder {
    /// Create a new graph builder with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            node_count: 0,
            id_to_index: HashMap::with_capacity(capacity),
            node_ids: Vec::with_capacity(capacity),
            adjacency_lists: Vec::with_capacity(capacity),
        }
    }

    /// Get or create a node index for the given external id
    pub fn get_or_create_node(&mut self, id: i64) -> u32 {
        if let Some(&idx) = self.id_to_index.get(&id) {
            return idx;
        }

        let idx = self.node_count as u32;
        self.id_to_index.insert(id, idx);
        self.node_ids.push(id.to_string());
        self.adjacency_lists.push(Vec::new());
        self.node_count += 1;

        idx
    }

    /// Add a weighted edge between two external ids
    pub fn add_edge(&mut self, src_id: i64, dst_id: i64, weight: f32) {
        let src_idx = self.get_or_create_node(src_id);
        let dst_idx = self.get_or_create_node(dst_id);

        self.adjacency_lists[src_idx as usize].push((dst_idx, weight));
    }

    /// Number of nodes registered so far
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Build the compressed graph
    pub fn build(mut self) -> Result<CompressedGraph> {
        let edge_count: usize = self.adjacency_lists.iter().map(|list| list.len()).sum();

        // Create offsets array
        let mut offsets = Vec::with_capacity(self.node_count + 1);
        offsets.push(0);

        let mut offset = 0;
        for list in &self.adjacency_lists {
            offset += list.len() as u32;
            offsets.push(offset);
        }

        // Create edge and weight arrays, rows sorted by target
        let mut edges = Vec::with_capacity(edge_count);
        let mut weights = Vec::with_capacity(edge_count);
        for list in &mut self.adjacency_lists {
            list.sort_by_key(|&(dst, _)| dst);
            for &(dst, w) in list.iter() {
                edges.push(dst);
                weights.push(w);
            }
        }

        Ok(CompressedGraph {
            node_count: self.node_count,
            offsets,
            edges,
            weights,
            node_ids: Some(self.node_ids),
        })
    }
}
