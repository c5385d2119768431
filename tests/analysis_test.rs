//! Safety-analyzer behavior against in-memory tables.

use sideeffectnet::analysis::{AnalysisError, RiskLevel, SafetyAnalyzer};
use sideeffectnet::dataset::{EdgeRow, EdgeTable, RiskRow, RiskTable};
use sideeffectnet::graph::{Frequency, GraphBuilder, RelationGraph};
use sideeffectnet::index::{RiskMap, SideEffectIndex};

struct Fixture {
    graph: RelationGraph,
    risks: RiskTable,
    risk_map: RiskMap,
    index: SideEffectIndex,
}

impl Fixture {
    fn new(edges: &[(&str, &str)], risks: &[(&str, f64)]) -> Self {
        let edge_table = EdgeTable::new(
            edges
                .iter()
                .map(|(drug, effect)| EdgeRow {
                    drug_name: drug.to_string(),
                    side_effect: effect.to_string(),
                    freq_pct: None,
                })
                .collect(),
        );
        let risk_table = RiskTable::new(
            risks
                .iter()
                .map(|(drug, score)| RiskRow {
                    drug_name: drug.to_string(),
                    risk_score: *score,
                })
                .collect(),
        );
        Fixture {
            graph: GraphBuilder::new().build(&edge_table).unwrap(),
            risk_map: RiskMap::from_table(&risk_table),
            index: SideEffectIndex::from_table(&edge_table),
            risks: risk_table,
        }
    }

    fn analyzer(&self) -> SafetyAnalyzer<'_> {
        SafetyAnalyzer::new(&self.graph, &self.risks, &self.risk_map, &self.index)
    }
}

#[test]
fn test_safer_alternatives_ranking() {
    // A shares x with B (safer) and y with C (riskier)
    let fixture = Fixture::new(
        &[("A", "x"), ("A", "y"), ("B", "x"), ("C", "y"), ("C", "z")],
        &[("A", 0.8), ("B", 0.5), ("C", 0.9)],
    );
    let alternatives = fixture.analyzer().safer_alternatives("A");

    assert_eq!(alternatives.len(), 1);
    assert_eq!(alternatives[0].drug_name, "B");
    assert_eq!(alternatives[0].shared_effects, 1);
    assert!((alternatives[0].risk_reduction - 0.3).abs() < 1e-9);
}

#[test]
fn test_safer_alternatives_orders_by_overlap_then_reduction() {
    let fixture = Fixture::new(
        &[
            ("A", "x"),
            ("A", "y"),
            ("A", "z"),
            // B shares two effects, small reduction
            ("B", "x"),
            ("B", "y"),
            // C and D share one effect each; D reduces risk more
            ("C", "z"),
            ("D", "z"),
        ],
        &[("A", 0.8), ("B", 0.7), ("C", 0.6), ("D", 0.2)],
    );
    let alternatives = fixture.analyzer().safer_alternatives("A");
    let names: Vec<&str> = alternatives.iter().map(|a| a.drug_name.as_str()).collect();
    assert_eq!(names, ["B", "D", "C"]);
}

#[test]
fn test_unscored_drug_is_never_safer() {
    let fixture = Fixture::new(&[("A", "x"), ("B", "x")], &[("A", 0.8)]);
    assert!(fixture.analyzer().safer_alternatives("A").is_empty());
}

#[test]
fn test_profile_not_found_vs_empty_effects() {
    let fixture = Fixture::new(&[("A", "x")], &[("A", 0.5), ("B", 0.2)]);
    let analyzer = fixture.analyzer();

    // B has a risk score but no reported effects
    let profile = analyzer.drug_profile("B").unwrap();
    assert!(profile.side_effects.is_empty());
    assert_eq!(profile.risk_level, RiskLevel::Low);

    // unknown drug is a None, not an error or a zero score
    assert!(analyzer.drug_profile("nonexistent").is_none());
}

#[test]
fn test_effect_frequencies_known_unknown_and_beyond_cap() {
    let edge_table = EdgeTable::new(vec![
        EdgeRow {
            drug_name: "A".into(),
            side_effect: "x".into(),
            freq_pct: Some("12.5".into()),
        },
        EdgeRow {
            drug_name: "A".into(),
            side_effect: "y".into(),
            freq_pct: Some("often".into()),
        },
        EdgeRow {
            drug_name: "A".into(),
            side_effect: "z".into(),
            freq_pct: Some("3.0".into()),
        },
    ]);
    let risk_table = RiskTable::new(vec![RiskRow {
        drug_name: "A".into(),
        risk_score: 0.5,
    }]);
    // Cap the graph below the table so "z" is indexed but carries no edge
    let graph = GraphBuilder::with_edge_limit(Some(2)).build(&edge_table).unwrap();
    let risk_map = RiskMap::from_table(&risk_table);
    let index = SideEffectIndex::from_table(&edge_table);
    let analyzer = SafetyAnalyzer::new(&graph, &risk_table, &risk_map, &index);

    let freqs = analyzer.effect_frequencies("A");
    assert_eq!(
        freqs,
        [
            ("x".to_string(), Frequency::Known(12.5)),
            ("y".to_string(), Frequency::Unknown),
            ("z".to_string(), Frequency::Unknown),
        ]
    );
    assert!(analyzer.effect_frequencies("missing").is_empty());
}

#[test]
fn test_polypharmacy_aggregates() {
    let fixture = Fixture::new(
        &[("A", "p"), ("A", "q"), ("B", "q"), ("B", "r")],
        &[("A", 0.6), ("B", 0.8)],
    );
    let report = fixture.analyzer().polypharmacy(&["A", "B"]).unwrap();

    assert_eq!(report.union_count, 3);
    assert_eq!(report.shared_effects, ["q"]);
    assert!((report.risk_sum - 1.4).abs() < 1e-9);
    assert!((report.risk_avg.unwrap() - 0.7).abs() < 1e-9);
    assert_eq!(report.risk_max, Some(0.8));
    // exactly 0.7 is not above the High threshold
    assert_eq!(report.risk_level, Some(RiskLevel::Medium));
    assert!(report.unknown_risk.is_empty());
}

#[test]
fn test_polypharmacy_excludes_unscored_drugs() {
    let fixture = Fixture::new(
        &[("A", "p"), ("B", "p"), ("C", "p")],
        &[("A", 0.6), ("B", 0.8)],
    );
    let report = fixture.analyzer().polypharmacy(&["A", "B", "C"]).unwrap();

    assert_eq!(report.unknown_risk, ["C"]);
    assert!((report.risk_sum - 1.4).abs() < 1e-9);
    // average over the two scored drugs, not all three
    assert!((report.risk_avg.unwrap() - 0.7).abs() < 1e-9);
    assert_eq!(report.risk_max, Some(0.8));
}

#[test]
fn test_polypharmacy_requires_two_distinct_drugs() {
    let fixture = Fixture::new(&[("A", "p")], &[("A", 0.6)]);
    let analyzer = fixture.analyzer();
    assert_eq!(
        analyzer.polypharmacy(&["A"]).unwrap_err(),
        AnalysisError::TooFewDrugs(1)
    );
    assert_eq!(
        analyzer.polypharmacy(&["A", "A"]).unwrap_err(),
        AnalysisError::TooFewDrugs(1)
    );
}

#[test]
fn test_risk_range_inclusive_bounds() {
    let fixture = Fixture::new(&[], &[("A", 0.2), ("B", 0.4), ("C", 0.7), ("D", 0.9)]);
    let report = fixture.analyzer().risk_range(0.4, 0.7);

    assert_eq!(report.count(), 2);
    let names: Vec<&str> = report.rows.iter().map(|r| r.drug_name.as_str()).collect();
    assert_eq!(names, ["B", "C"]);
    assert!((report.mean.unwrap() - 0.55).abs() < 1e-9);
    assert_eq!(report.top[0].drug_name, "C");
}

#[test]
fn test_risk_range_empty_is_not_nan() {
    let fixture = Fixture::new(&[], &[("A", 0.2), ("B", 0.9)]);
    let report = fixture.analyzer().risk_range(2.0, 3.0);

    assert_eq!(report.count(), 0);
    assert_eq!(report.mean, None);
    assert!(report.top.is_empty());
}

#[test]
fn test_risk_range_top_ties_are_stable() {
    let fixture = Fixture::new(
        &[],
        &[
            ("A", 0.5),
            ("B", 0.5),
            ("C", 0.5),
            ("D", 0.5),
            ("E", 0.5),
            ("F", 0.5),
        ],
    );
    let report = fixture.analyzer().risk_range(0.0, 1.0);
    let names: Vec<&str> = report.top.iter().map(|r| r.drug_name.as_str()).collect();
    assert_eq!(names, ["A", "B", "C", "D", "E"]);
}

#[test]
fn test_pairwise_overlap_context() {
    let fixture = Fixture::new(
        &[("A", "x"), ("A", "y"), ("B", "y"), ("B", "z")],
        &[("A", 0.6)],
    );
    let context = fixture.analyzer().pairwise_overlap("A", "B");

    assert_eq!(context.shared_effects, ["y"]);
    assert_eq!(context.overlap_count(), 1);
    assert_eq!(context.risk_a, Some(0.6));
    assert_eq!(context.risk_b, None);
}

#[test]
fn test_risk_bounds() {
    let fixture = Fixture::new(&[], &[("A", 0.3), ("B", 0.9), ("C", 0.1)]);
    assert_eq!(fixture.analyzer().risk_bounds(), Some((0.1, 0.9)));
}
