//! Immutable relationship-graph storage and its builder
//!
//! The graph is built once per loaded dataset and is read-only afterwards;
//! a dataset change means a rebuild, never a mutation. Fingerprints are
//! derived from the sorted node and edge content so two builds from the same
//! edge table key the same centrality cache entry.

use super::types::{Frequency, NodeKey, NodeKind};
use crate::dataset::EdgeTable;
use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashMap;
use sha2::{Digest, Sha256};
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Default cap on edge rows consumed by the builder. Keeps graph
/// construction at interactive latency on large extracts.
pub const DEFAULT_EDGE_LIMIT: usize = 500;

/// Errors that can occur during graph construction
#[derive(Error, Debug, PartialEq)]
pub enum GraphError {
    #[error("edge {drug} -> {side_effect} references a node that was never added")]
    EdgeWithoutNode { drug: String, side_effect: String },
}

pub type GraphResult<T> = Result<T, GraphError>;

/// SHA-256 digest of the graph's node and edge content.
///
/// Stable across rebuilds from identical input, so it serves as the
/// cache key for centrality results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphFingerprint([u8; 32]);

impl fmt::Display for GraphFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Bipartite drug / side-effect association graph.
///
/// Node identity is the trimmed name plus kind; an edge `drug -> side_effect`
/// exists iff at least one edge record connects the pair, carrying the last
/// observed frequency for that pair.
#[derive(Debug, Clone)]
pub struct RelationGraph {
    /// All nodes in insertion order
    nodes: IndexSet<NodeKey>,

    /// (drug, side effect) -> frequency, in first-insertion order
    edges: IndexMap<(String, String), Frequency>,

    /// Adjacency: drug -> distinct side effects in first-seen order
    outgoing: FxHashMap<String, Vec<String>>,

    /// Content digest, computed once at build time
    fingerprint: GraphFingerprint,
}

impl RelationGraph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains_node(&self, key: &NodeKey) -> bool {
        self.nodes.contains(key)
    }

    /// All nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &NodeKey> {
        self.nodes.iter()
    }

    /// Names of all nodes of one kind, in insertion order
    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &str> {
        self.nodes
            .iter()
            .filter(move |key| key.kind == kind)
            .map(|key| key.name.as_str())
    }

    /// All edges as (drug, side effect, frequency)
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, Frequency)> {
        self.edges
            .iter()
            .map(|((drug, effect), freq)| (drug.as_str(), effect.as_str(), *freq))
    }

    /// Frequency stored on the `drug -> side_effect` edge, if present
    pub fn frequency(&self, drug: &str, side_effect: &str) -> Option<Frequency> {
        self.edges
            .get(&(drug.to_string(), side_effect.to_string()))
            .copied()
    }

    /// Distinct side effects connected to a drug, in first-seen order
    pub fn effects_of(&self, drug: &str) -> &[String] {
        self.outgoing.get(drug).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn fingerprint(&self) -> GraphFingerprint {
        self.fingerprint
    }
}

/// Builds a [`RelationGraph`] from an edge table.
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    edge_limit: Option<usize>,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        GraphBuilder {
            edge_limit: Some(DEFAULT_EDGE_LIMIT),
        }
    }
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the row cap; `None` consumes the whole table.
    pub fn with_edge_limit(edge_limit: Option<usize>) -> Self {
        GraphBuilder { edge_limit }
    }

    /// Build the graph. Endpoint names are trimmed, unparsable frequencies
    /// become [`Frequency::Unknown`], and a repeated (drug, side effect)
    /// pair keeps the last occurrence's frequency.
    pub fn build(&self, table: &EdgeTable) -> GraphResult<RelationGraph> {
        let mut nodes = IndexSet::new();
        let mut edges: IndexMap<(String, String), Frequency> = IndexMap::new();
        let mut outgoing: FxHashMap<String, Vec<String>> = FxHashMap::default();

        let limit = self.edge_limit.unwrap_or(usize::MAX);
        let mut skipped = 0usize;

        for row in table.rows().iter().take(limit) {
            let drug = row.drug_name.trim();
            let side_effect = row.side_effect.trim();
            if drug.is_empty() || side_effect.is_empty() {
                skipped += 1;
                continue;
            }
            let freq = Frequency::parse(row.freq_pct.as_deref());

            nodes.insert(NodeKey::drug(drug));
            nodes.insert(NodeKey::side_effect(side_effect));

            let key = (drug.to_string(), side_effect.to_string());
            if edges.insert(key, freq).is_none() {
                outgoing
                    .entry(drug.to_string())
                    .or_default()
                    .push(side_effect.to_string());
            }
        }

        if skipped > 0 {
            debug!(skipped, "skipped edge rows with empty endpoint names");
        }

        // Endpoints are inserted together with every edge, so a violation
        // here means builder-internal corruption and is fatal.
        for (drug, effect) in edges.keys() {
            if !nodes.contains(&NodeKey::drug(drug.as_str()))
                || !nodes.contains(&NodeKey::side_effect(effect.as_str()))
            {
                return Err(GraphError::EdgeWithoutNode {
                    drug: drug.clone(),
                    side_effect: effect.clone(),
                });
            }
        }

        let fingerprint = Self::fingerprint_of(&nodes, &edges);

        Ok(RelationGraph {
            nodes,
            edges,
            outgoing,
            fingerprint,
        })
    }

    fn fingerprint_of(
        nodes: &IndexSet<NodeKey>,
        edges: &IndexMap<(String, String), Frequency>,
    ) -> GraphFingerprint {
        let mut hasher = Sha256::new();

        let mut sorted_nodes: Vec<&NodeKey> = nodes.iter().collect();
        sorted_nodes.sort();
        for key in sorted_nodes {
            hasher.update([match key.kind {
                NodeKind::Drug => 0u8,
                NodeKind::SideEffect => 1u8,
            }]);
            hasher.update(key.name.as_bytes());
            hasher.update([0u8]);
        }

        let mut sorted_edges: Vec<(&(String, String), &Frequency)> = edges.iter().collect();
        sorted_edges.sort_by_key(|(pair, _)| *pair);
        for ((drug, effect), freq) in sorted_edges {
            hasher.update(drug.as_bytes());
            hasher.update([0u8]);
            hasher.update(effect.as_bytes());
            match freq {
                Frequency::Known(value) => {
                    hasher.update([1u8]);
                    hasher.update(value.to_bits().to_le_bytes());
                }
                Frequency::Unknown => hasher.update([2u8]),
            }
        }

        GraphFingerprint(hasher.finalize().into())
    }
}
