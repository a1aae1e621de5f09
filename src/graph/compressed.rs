//! Memory-efficient graph representation

use std::mem;

use serde::{Deserialize, Serialize};

use crate::error::{CoverError, Result};

/// Compressed sparse representation of a directed, weighted graph.
///
/// Edges of node `i` live in `offsets[i]..offsets[i + 1]`, sorted by target
/// so adjacency checks can binary search. `weights` runs parallel to
/// `edges`; unweighted inputs get 1.0 per edge. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressedGraph {
    /// Number of nodes in the graph
    pub node_count: usize,

    /// Offset array: index where each node's edges begin
    pub offsets: Vec<u32>,

    /// Edge array: concatenated lists of target nodes
    pub edges: Vec<u32>,

    /// Edge weights, parallel to `edges`
    pub weights: Vec<f32>,

    /// Optional mapping from internal node IDs to original external IDs
    pub node_ids: Option<Vec<String>>,
}

impl CompressedGraph {
    /// Create a new graph with pre-allocated capacity
    pub fn with_capacity(node_count: usize, edge_count: usize) -> Self {
        Self {
            node_count,
            offsets: Vec::with_capacity(node_count + 1),
            edges: Vec::with_capacity(edge_count),
            weights: Vec::with_capacity(edge_count),
            node_ids: None,
        }
    }

    /// Build a graph from an edge list in coordinate form.
    ///
    /// Validates every endpoint against `node_count` and, when weights are
    /// given, their length against the edge list. Rows come out sorted by
    /// target.
    pub fn from_coo(
        node_count: usize,
        edge_list: &[(u32, u32)],
        edge_weights: Option<&[f32]>,
    ) -> Result<Self> {
        if let Some(w) = edge_weights {
            if w.len() != edge_list.len() {
                return Err(CoverError::LengthMismatch {
                    what: "edge weights",
                    expected: edge_list.len(),
                    got: w.len(),
                });
            }
        }

        // Count per-node degrees, rejecting out-of-range endpoints up front
        let mut degrees = vec![0u32; node_count];
        for &(src, dst) in edge_list {
            if src as usize >= node_count || dst as usize >= node_count {
                return Err(CoverError::EdgeOutOfRange {
                    src,
                    dst,
                    num_nodes: node_count,
                });
            }
            degrees[src as usize] += 1;
        }

        let mut offsets = Vec::with_capacity(node_count + 1);
        offsets.push(0);
        let mut running = 0;
        for &d in &degrees {
            running += d;
            offsets.push(running);
        }

        // Scatter edges into place, then sort each row by target
        let mut edges = vec![0u32; edge_list.len()];
        let mut weights = vec![1.0f32; edge_list.len()];
        let mut cursor = vec![0u32; node_count];

        for (i, &(src, dst)) in edge_list.iter().enumerate() {
            let pos = (offsets[src as usize] + cursor[src as usize]) as usize;
            edges[pos] = dst;
            if let Some(w) = edge_weights {
                weights[pos] = w[i];
            }
            cursor[src as usize] += 1;
        }

        let mut graph = Self {
            node_count,
            offsets,
            edges,
            weights,
            node_ids: None,
        };
        graph.sort_adjacency_lists();

        Ok(graph)
    }

    /// Get outgoing edges for a node
    pub fn outgoing_edges(&self, node: usize) -> &[u32] {
        let start = self.offsets[node] as usize;
        let end = self.offsets[node + 1] as usize;
        &self.edges[start..end]
    }

    /// Get outgoing edge weights for a node
    pub fn outgoing_weights(&self, node: usize) -> &[f32] {
        let start = self.offsets[node] as usize;
        let end = self.offsets[node + 1] as usize;
        &self.weights[start..end]
    }

    /// Sort all adjacency lists by target, keeping weights aligned
    pub fn sort_adjacency_lists(&mut self) {
        for node in 0..self.node_count {
            let start = self.offsets[node] as usize;
            let end = self.offsets[node + 1] as usize;
            if start < end {
                let mut row: Vec<(u32, f32)> = self.edges[start..end]
                    .iter()
                    .copied()
                    .zip(self.weights[start..end].iter().copied())
                    .collect();
                row.sort_by_key(|&(dst, _)| dst);
                for (i, (dst, w)) in row.into_iter().enumerate() {
                    self.edges[start + i] = dst;
                    self.weights[start + i] = w;
                }
            }
        }
    }

    /// Check if there's an edge from src to dst
    pub fn has_edge(&self, src: usize, dst: u32) -> bool {
        self.outgoing_edges(src).binary_search(&dst).is_ok()
    }

    /// Get out-degree of a node
    pub fn out_degree(&self, node: usize) -> usize {
        let start = self.offsets[node] as usize;
        let end = self.offsets[node + 1] as usize;
        end - start
    }

    /// Number of stored edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Export the edge list back to coordinate form
    pub fn to_coo(&self) -> (Vec<(u32, u32)>, Vec<f32>) {
        let mut edge_list = Vec::with_capacity(self.edges.len());
        let mut weights = Vec::with_capacity(self.edges.len());
        for src in 0..self.node_count {
            for (&dst, &w) in self
                .outgoing_edges(src)
                .iter()
                .zip(self.outgoing_weights(src))
            {
                edge_list.push((src as u32, dst));
                weights.push(w);
            }
        }
        (edge_list, weights)
    }

    /// Build the symmetric neighbor view used by the cover algorithms
    pub fn neighbor_index(&self) -> NeighborIndex {
        NeighborIndex::build(self)
    }

    /// Estimate memory usage in bytes
    pub fn memory_usage(&self) -> usize {
        let base = mem::size_of::<Self>();
        let offsets = self.offsets.capacity() * mem::size_of::<u32>();
        let edges = self.edges.capacity() * mem::size_of::<u32>();
        let weights = self.weights.capacity() * mem::size_of::<f32>();

        let ids = self
            .node_ids
            .as_ref()
            .map(|ids| ids.iter().map(|s| s.capacity()).sum::<usize>())
            .unwrap_or(0);

        base + offsets + edges + weights + ids
    }
}

/// Symmetric adjacency view of a [`CompressedGraph`].
///
/// Per node, the sorted and deduplicated union of out- and in-neighbors,
/// with self-loops removed. This is the adjacency the k-plex deficit rules
/// are evaluated against; degree criteria also read from it.
#[derive(Debug, Clone)]
pub struct NeighborIndex {
    node_count: usize,
    offsets: Vec<u32>,
    neighbors: Vec<u32>,
}

impl NeighborIndex {
    /// Build the symmetric view from a directed graph
    pub fn build(graph: &CompressedGraph) -> Self {
        let node_count = graph.node_count;
        let mut lists: Vec<Vec<u32>> = vec![Vec::new(); node_count];

        for src in 0..node_count {
            for &dst in graph.outgoing_edges(src) {
                if dst as usize == src {
                    continue;
                }
                lists[src].push(dst);
                lists[dst as usize].push(src as u32);
            }
        }

        let mut offsets = Vec::with_capacity(node_count + 1);
        offsets.push(0u32);
        let mut neighbors = Vec::new();

        for list in &mut lists {
            list.sort_unstable();
            list.dedup();
            neighbors.extend_from_slice(list);
            offsets.push(neighbors.len() as u32);
        }

        Self {
            node_count,
            offsets,
            neighbors,
        }
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Neighbors of a node, sorted ascending
    pub fn neighbors(&self, node: usize) -> &[u32] {
        let start = self.offsets[node] as usize;
        let end = self.offsets[node + 1] as usize;
        &self.neighbors[start..end]
    }

    /// Symmetric degree of a node
    pub fn degree(&self, node: usize) -> usize {
        (self.offsets[node + 1] - self.offsets[node]) as usize
    }

    /// Check adjacency between two distinct nodes
    pub fn contains(&self, node: usize, other: u32) -> bool {
        self.neighbors(node).binary_search(&other).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_coo_sorts_rows_and_keeps_weights_aligned() {
        let edges = vec![(0, 2), (0, 1), (1, 0)];
        let weights = vec![2.0, 3.0, 5.0];
        let graph = CompressedGraph::from_coo(3, &edges, Some(&weights)).unwrap();

        assert_eq!(graph.outgoing_edges(0), &[1, 2]);
        assert_eq!(graph.outgoing_weights(0), &[3.0, 2.0]);
        assert!(graph.has_edge(1, 0));
        assert!(!graph.has_edge(2, 0));
    }

    #[test]
    fn from_coo_rejects_out_of_range_endpoints() {
        let err = CompressedGraph::from_coo(2, &[(0, 5)], None).unwrap_err();
        assert!(matches!(err, CoverError::EdgeOutOfRange { dst: 5, .. }));
    }

    #[test]
    fn neighbor_index_symmetrizes_and_drops_self_loops() {
        // One direction stored, plus a self-loop on 2
        let graph = CompressedGraph::from_coo(3, &[(0, 1), (2, 2), (2, 0)], None).unwrap();
        let index = graph.neighbor_index();

        assert_eq!(index.neighbors(0), &[1, 2]);
        assert_eq!(index.neighbors(1), &[0]);
        assert_eq!(index.neighbors(2), &[0]);
        assert_eq!(index.degree(2), 1);
        assert!(index.contains(1, 0));
    }

    #[test]
    fn to_coo_round_trips() {
        let edges = vec![(0, 1), (1, 2), (2, 0)];
        let weights = vec![1.5, 2.5, 3.5];
        let graph = CompressedGraph::from_coo(3, &edges, Some(&weights)).unwrap();
        let (out_edges, out_weights) = graph.to_coo();

        assert_eq!(out_edges, edges);
        assert_eq!(out_weights, weights);
    }
}
