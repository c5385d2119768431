//! Shared utilities for graph algorithms
//!
//! Provides a read-only, optimized view of the graph topology for algorithm execution.

use std::collections::HashMap;

/// Node Identifier type (u64)
pub type NodeId = u64;

/// A dense, integer-indexed view of the graph topology using Compressed Sparse Row (CSR) format.
pub struct GraphView {
    /// Number of nodes
    pub node_count: usize,
    /// Mapping from dense index (0..N) back to NodeId
    pub index_to_node: Vec<NodeId>,
    /// Mapping from NodeId to dense index
    pub node_to_index: HashMap<NodeId, usize>,

    /// Offsets into `out_targets`. Size = node_count + 1
    pub out_offsets: Vec<usize>,
    /// Contiguous array of target node indices
    pub out_targets: Vec<usize>,
}

impl GraphView {
    /// Build a view from a node list and directed edge pairs (by NodeId).
    ///
    /// Edges referencing a NodeId absent from `nodes` are skipped. When
    /// `reciprocal` is set each edge is also inserted in the reverse
    /// direction, giving an undirected interpretation of the topology.
    pub fn from_edges(nodes: Vec<NodeId>, edges: &[(NodeId, NodeId)], reciprocal: bool) -> Self {
        let node_count = nodes.len();
        let mut node_to_index = HashMap::with_capacity(node_count);
        for (idx, &id) in nodes.iter().enumerate() {
            node_to_index.insert(id, idx);
        }

        let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); node_count];
        for &(source, target) in edges {
            let (Some(&u), Some(&v)) = (node_to_index.get(&source), node_to_index.get(&target))
            else {
                continue;
            };
            adjacency[u].push(v);
            if reciprocal {
                adjacency[v].push(u);
            }
        }

        let mut out_offsets = Vec::with_capacity(node_count + 1);
        let mut out_targets = Vec::new();
        out_offsets.push(0);
        for neighbors in adjacency {
            out_targets.extend(neighbors);
            out_offsets.push(out_targets.len());
        }

        GraphView {
            node_count,
            index_to_node: nodes,
            node_to_index,
            out_offsets,
            out_targets,
        }
    }

    /// Get the out-degree of a node (by index)
    pub fn out_degree(&self, idx: usize) -> usize {
        self.out_offsets[idx + 1] - self.out_offsets[idx]
    }

    /// Get outgoing neighbors (successors) of a node
    pub fn successors(&self, idx: usize) -> &[usize] {
        let start = self.out_offsets[idx];
        let end = self.out_offsets[idx + 1];
        &self.out_targets[start..end]
    }
}
