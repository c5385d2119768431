//! Centrality ranking, strategy selection, and cache behavior.

use sideeffectnet::centrality::{CentralityConfig, CentralityRanker};
use sideeffectnet::dataset::{EdgeRow, EdgeTable};
use sideeffectnet::graph::{GraphBuilder, NodeKind, RelationGraph};

fn graph_from(edges: &[(&str, &str)]) -> RelationGraph {
    let table = EdgeTable::new(
        edges
            .iter()
            .map(|(drug, effect)| EdgeRow {
                drug_name: drug.to_string(),
                side_effect: effect.to_string(),
                freq_pct: None,
            })
            .collect(),
    );
    GraphBuilder::with_edge_limit(None).build(&table).unwrap()
}

fn star_graph() -> RelationGraph {
    // Three drugs all reporting the same effect: the effect is the hub
    graph_from(&[("d1", "shared"), ("d2", "shared"), ("d3", "shared")])
}

#[test]
fn test_shared_effect_is_most_central() {
    let graph = star_graph();
    let ranker = CentralityRanker::default();

    let top_effects = ranker.top_nodes(&graph, NodeKind::SideEffect, 5);
    assert_eq!(top_effects.len(), 1);
    assert_eq!(top_effects[0].name, "shared");
    assert!((top_effects[0].score - 1.0).abs() < 1e-9);

    let top_drugs = ranker.top_nodes(&graph, NodeKind::Drug, 2);
    assert_eq!(top_drugs.len(), 2);
    // all-zero drug scores tie; insertion order breaks the tie
    assert_eq!(top_drugs[0].name, "d1");
    assert_eq!(top_drugs[1].name, "d2");
}

#[test]
fn test_repeated_queries_hit_the_cache() {
    let graph = star_graph();
    let ranker = CentralityRanker::default();

    let first = ranker.scores(&graph);
    let second = ranker.scores(&graph);
    assert_eq!(ranker.computations(), 1);
    assert!((first.score(&sideeffectnet::graph::NodeKey::side_effect("shared")).unwrap()
        - second
            .score(&sideeffectnet::graph::NodeKey::side_effect("shared"))
            .unwrap())
    .abs()
        < 1e-12);

    // A rebuild from the same rows has the same fingerprint, so it also hits
    let rebuilt = star_graph();
    ranker.scores(&rebuilt);
    assert_eq!(ranker.computations(), 1);
}

#[test]
fn test_changed_graph_recomputes() {
    let ranker = CentralityRanker::default();
    ranker.scores(&star_graph());
    ranker.scores(&graph_from(&[("d1", "other")]));
    assert_eq!(ranker.computations(), 2);
}

#[test]
fn test_small_graph_uses_exact_strategy() {
    let ranker = CentralityRanker::default();
    let scores = ranker.scores(&star_graph());
    assert!(!scores.sampled());
}

#[test]
fn test_large_graph_uses_sampled_strategy() {
    let edges: Vec<(String, String)> = (0..60)
        .map(|i| (format!("drug{i}"), "shared".to_string()))
        .collect();
    let edge_refs: Vec<(&str, &str)> = edges
        .iter()
        .map(|(drug, effect)| (drug.as_str(), effect.as_str()))
        .collect();
    let graph = graph_from(&edge_refs);
    assert_eq!(graph.node_count(), 61);

    let ranker = CentralityRanker::new(CentralityConfig {
        sample_threshold: 50,
        pivot_cap: 20,
        seed: Some(42),
        ..Default::default()
    });
    let scores = ranker.scores(&graph);
    assert!(scores.sampled());

    // The hub still dominates under sampling
    let top = scores.top_nodes(NodeKind::SideEffect, 1);
    assert_eq!(top[0].name, "shared");
    assert!(top[0].score > 0.0);
}

#[test]
fn test_sampling_error_falls_back_to_exact() {
    let graph = star_graph();
    // pivot_cap 0 makes the sampled path fail; the ranker must fall back
    // to the exact computation instead of propagating the error
    let ranker = CentralityRanker::new(CentralityConfig {
        sample_threshold: 0,
        pivot_cap: 0,
        ..Default::default()
    });
    let scores = ranker.scores(&graph);
    assert!(!scores.sampled());

    let top = scores.top_nodes(NodeKind::SideEffect, 1);
    assert_eq!(top[0].name, "shared");
    assert!((top[0].score - 1.0).abs() < 1e-9);
}

#[test]
fn test_pivot_cap_at_node_count_matches_exact() {
    let graph = star_graph();
    let exact = CentralityRanker::default().scores(&graph);
    // threshold 0 forces sampling; cap above n samples every node
    let sampled = CentralityRanker::new(CentralityConfig {
        sample_threshold: 0,
        pivot_cap: 100,
        seed: Some(7),
        ..Default::default()
    })
    .scores(&graph);

    assert!(sampled.sampled());
    for (key, score) in exact.iter() {
        assert!((sampled.score(key).unwrap() - score).abs() < 1e-9);
    }
}

#[test]
fn test_empty_graph_ranks_nothing() {
    let graph = graph_from(&[]);
    let ranker = CentralityRanker::default();
    assert!(ranker.scores(&graph).is_empty());
    assert!(ranker.top_nodes(&graph, NodeKind::Drug, 10).is_empty());
}
