//! SideEffectNet Analytics Core
//!
//! The analytical engine behind a drug-safety dashboard: it loads adverse-
//! event tables, builds a bipartite drug / side-effect relationship graph,
//! and answers safety queries over it.
//!
//! # Architecture
//!
//! Data flows one way: loader -> graph builder + lookup indices -> safety
//! analyzer / centrality ranker -> presentation layer. Everything built from
//! a dataset is immutable afterwards and rebuilt, never mutated, when the
//! dataset changes. Centrality results are cached against a content
//! fingerprint of the graph. The LLM hypothesis generator is a terminal
//! consumer of analyzer output and never blocks the rest of the system.
//!
//! ## Example Usage
//!
//! ```rust
//! use sideeffectnet::analysis::SafetyAnalyzer;
//! use sideeffectnet::dataset::{EdgeRow, EdgeTable, RiskRow, RiskTable};
//! use sideeffectnet::graph::GraphBuilder;
//! use sideeffectnet::index::{RiskMap, SideEffectIndex};
//!
//! let edges = EdgeTable::new(vec![
//!     EdgeRow { drug_name: "aspirin".into(), side_effect: "nausea".into(), freq_pct: Some("12.5".into()) },
//!     EdgeRow { drug_name: "ibuprofen".into(), side_effect: "nausea".into(), freq_pct: None },
//! ]);
//! let risks = RiskTable::new(vec![
//!     RiskRow { drug_name: "aspirin".into(), risk_score: 0.6 },
//!     RiskRow { drug_name: "ibuprofen".into(), risk_score: 0.3 },
//! ]);
//!
//! let graph = GraphBuilder::new().build(&edges).unwrap();
//! let risk_map = RiskMap::from_table(&risks);
//! let index = SideEffectIndex::from_table(&edges);
//! let analyzer = SafetyAnalyzer::new(&graph, &risks, &risk_map, &index);
//!
//! let alternatives = analyzer.safer_alternatives("aspirin");
//! assert_eq!(alternatives[0].drug_name, "ibuprofen");
//! ```

#![warn(clippy::all)]

pub mod analysis;
pub mod centrality;
pub mod config;
pub mod dataset;
pub mod graph;
pub mod hypothesis;
pub mod index;

// Re-export main types for convenience
pub use analysis::{
    Alternative, AnalysisError, AnalysisResult, CombinationContext, DrugProfile,
    PolypharmacyReport, RangeReport, RiskLevel, SafetyAnalyzer,
};

pub use centrality::{CentralityConfig, CentralityRanker, CentralityScores, RankedNode};

pub use config::{DashboardConfig, LlmConfig};

pub use dataset::{load_dataset, EdgeRow, EdgeTable, RiskRow, RiskTable};

pub use graph::{
    Frequency, GraphBuilder, GraphError, GraphFingerprint, GraphResult, NodeKey, NodeKind,
    RelationGraph,
};

pub use hypothesis::{build_prompt, HypothesisClient, HypothesisError, HypothesisResult};

pub use index::{RiskMap, SideEffectIndex};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
