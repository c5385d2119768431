//! Relationship graph for drug / side-effect associations
//!
//! This module implements the bipartite association graph:
//! - Two node kinds (drug, side effect) under one trimmed-name identity
//! - Directed drug -> side-effect edges carrying a reporting frequency
//! - Last-occurrence-wins frequency on duplicate edge records
//! - A content-derived fingerprint used to key the centrality cache

pub mod store;
pub mod types;

pub use store::{GraphBuilder, GraphError, GraphFingerprint, GraphResult, RelationGraph};
pub use types::{Frequency, NodeKey, NodeKind};
