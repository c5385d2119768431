//! Pure topology algorithms for SideEffectNet.
//!
//! Operates on a dense, integer-indexed [`GraphView`] so the algorithms stay
//! independent of the relationship-graph representation in the main crate.

pub mod betweenness;
pub mod common;

pub use betweenness::{
    betweenness_centrality, sampled_betweenness_centrality, BetweennessConfig, BetweennessError,
};
pub use common::{GraphView, NodeId};
