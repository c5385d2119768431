//! Safety analysis queries
//!
//! Stateless query functions over the relationship graph and indices:
//! single-drug profile, safer-alternative ranking, risk-range summary,
//! polypharmacy overlap, and pairwise combination context. All operations
//! are pure reads; "not found" is an expected result value, never an error.

use crate::dataset::{RiskRow, RiskTable};
use crate::graph::{Frequency, RelationGraph};
use crate::index::{RiskMap, SideEffectIndex};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug, PartialEq)]
pub enum AnalysisError {
    #[error("polypharmacy analysis requires at least 2 distinct drugs, got {0}")]
    TooFewDrugs(usize),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Risk band for a score or an aggregate.
///
/// Thresholds are exclusive lower bounds of the higher bands: a score of
/// exactly 0.7 is `Medium`, exactly 0.4 is `Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn classify(score: f64) -> Self {
        if score > 0.7 {
            RiskLevel::High
        } else if score > 0.4 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::Medium => write!(f, "Medium"),
            RiskLevel::High => write!(f, "High"),
        }
    }
}

/// Single-drug profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrugProfile {
    pub drug_name: String,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    /// De-duplicated side effects in first-seen order
    pub side_effects: Vec<String>,
}

/// One safer-alternative candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    pub drug_name: String,
    pub shared_effects: usize,
    pub risk_score: f64,
    pub risk_reduction: f64,
}

/// Risk-range filter output: the matching rows plus aggregates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeReport {
    pub rows: Vec<RiskRow>,
    /// `None` when the range matched nothing; never NaN
    pub mean: Option<f64>,
    /// Top 5 by score descending, ties in encounter order
    pub top: Vec<RiskRow>,
}

impl RangeReport {
    pub fn count(&self) -> usize {
        self.rows.len()
    }
}

/// Multi-drug combination report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolypharmacyReport {
    pub drugs: Vec<String>,
    /// Size of the union of all side-effect sets
    pub union_count: usize,
    /// Side effects common to every selected drug
    pub shared_effects: Vec<String>,
    pub risk_sum: f64,
    /// Mean over drugs with a known risk score; `None` if none have one
    pub risk_avg: Option<f64>,
    pub risk_max: Option<f64>,
    pub risk_level: Option<RiskLevel>,
    /// Selected drugs absent from the risk map, excluded from the aggregates
    pub unknown_risk: Vec<String>,
}

/// Pairwise overlap: the seed context for hypothesis generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinationContext {
    pub drug_a: String,
    pub drug_b: String,
    pub risk_a: Option<f64>,
    pub risk_b: Option<f64>,
    pub shared_effects: Vec<String>,
}

impl CombinationContext {
    pub fn overlap_count(&self) -> usize {
        self.shared_effects.len()
    }
}

/// Stateless query surface over one built dataset.
///
/// Holds only borrows; the graph and indices stay immutable for the
/// analyzer's lifetime and are rebuilt when the dataset changes.
#[derive(Debug, Clone, Copy)]
pub struct SafetyAnalyzer<'a> {
    graph: &'a RelationGraph,
    risk_table: &'a RiskTable,
    risk_map: &'a RiskMap,
    index: &'a SideEffectIndex,
}

impl<'a> SafetyAnalyzer<'a> {
    pub fn new(
        graph: &'a RelationGraph,
        risk_table: &'a RiskTable,
        risk_map: &'a RiskMap,
        index: &'a SideEffectIndex,
    ) -> Self {
        SafetyAnalyzer {
            graph,
            risk_table,
            risk_map,
            index,
        }
    }

    /// Risk score and de-duplicated side-effect list for one drug.
    /// `None` when the drug is absent from the risk map.
    pub fn drug_profile(&self, drug: &str) -> Option<DrugProfile> {
        let risk_score = self.risk_map.get(drug)?;
        Some(DrugProfile {
            drug_name: drug.to_string(),
            risk_score,
            risk_level: RiskLevel::classify(risk_score),
            side_effects: self.index.distinct_effects(drug),
        })
    }

    /// Edge frequencies for one drug's side effects, in first-seen order.
    /// Effects beyond the builder's edge cap carry no frequency.
    pub fn effect_frequencies(&self, drug: &str) -> Vec<(String, Frequency)> {
        self.index
            .distinct_effects(drug)
            .into_iter()
            .map(|effect| {
                let freq = self
                    .graph
                    .frequency(drug, &effect)
                    .unwrap_or(Frequency::Unknown);
                (effect, freq)
            })
            .collect()
    }

    /// Every other drug sharing at least one side effect with `drug` and
    /// carrying a strictly lower risk score. Drugs without a risk entry are
    /// never safer. Sorted by shared-effect count, then risk reduction,
    /// both descending; an empty result is a valid answer.
    pub fn safer_alternatives(&self, drug: &str) -> Vec<Alternative> {
        let Some(query_risk) = self.risk_map.get(drug) else {
            return Vec::new();
        };
        let target: FxHashSet<&str> = self
            .index
            .effects(drug)
            .iter()
            .map(String::as_str)
            .collect();
        if target.is_empty() {
            return Vec::new();
        }

        let mut suggestions = Vec::new();
        for other in self.index.drugs() {
            if other == drug {
                continue;
            }
            let shared = self
                .index
                .distinct_effects(other)
                .iter()
                .filter(|effect| target.contains(effect.as_str()))
                .count();
            if shared == 0 {
                continue;
            }
            let Some(other_risk) = self.risk_map.get(other) else {
                continue;
            };
            if other_risk < query_risk {
                suggestions.push(Alternative {
                    drug_name: other.to_string(),
                    shared_effects: shared,
                    risk_score: other_risk,
                    risk_reduction: query_risk - other_risk,
                });
            }
        }

        suggestions.sort_by(|a, b| {
            b.shared_effects.cmp(&a.shared_effects).then(
                b.risk_reduction
                    .partial_cmp(&a.risk_reduction)
                    .unwrap_or(Ordering::Equal),
            )
        });
        suggestions
    }

    /// Subset of the risk table with `min <= score <= max`, inclusive on
    /// both bounds, plus aggregates. An empty match yields `mean: None`.
    pub fn risk_range(&self, min: f64, max: f64) -> RangeReport {
        let rows: Vec<RiskRow> = self
            .risk_table
            .rows()
            .iter()
            .filter(|row| row.risk_score >= min && row.risk_score <= max)
            .cloned()
            .collect();

        let mean = if rows.is_empty() {
            None
        } else {
            Some(rows.iter().map(|row| row.risk_score).sum::<f64>() / rows.len() as f64)
        };

        let mut top = rows.clone();
        top.sort_by(|a, b| {
            b.risk_score
                .partial_cmp(&a.risk_score)
                .unwrap_or(Ordering::Equal)
        });
        top.truncate(5);

        RangeReport { rows, mean, top }
    }

    /// (min, max) over the risk table, for range widgets. `None` when the
    /// table is empty.
    pub fn risk_bounds(&self) -> Option<(f64, f64)> {
        let mut rows = self.risk_table.rows().iter();
        let first = rows.next()?.risk_score;
        let (min, max) = rows.fold((first, first), |(lo, hi), row| {
            (lo.min(row.risk_score), hi.max(row.risk_score))
        });
        Some((min, max))
    }

    /// Combined side-effect and risk view of two or more drugs. Drugs
    /// without a risk entry are excluded from the risk aggregates and
    /// reported in `unknown_risk`.
    pub fn polypharmacy(&self, drugs: &[&str]) -> AnalysisResult<PolypharmacyReport> {
        let mut selected: Vec<&str> = Vec::with_capacity(drugs.len());
        for drug in drugs {
            if !selected.contains(drug) {
                selected.push(*drug);
            }
        }
        if selected.len() < 2 {
            return Err(AnalysisError::TooFewDrugs(selected.len()));
        }

        let mut union: FxHashSet<&str> = FxHashSet::default();
        for drug in &selected {
            union.extend(self.index.effects(drug).iter().map(String::as_str));
        }

        // Intersection seeded from the first drug keeps member order
        // deterministic.
        let mut shared_effects = self.index.distinct_effects(selected[0]);
        for drug in &selected[1..] {
            let effects: FxHashSet<&str> =
                self.index.effects(drug).iter().map(String::as_str).collect();
            shared_effects.retain(|effect| effects.contains(effect.as_str()));
        }

        let mut risk_sum = 0.0;
        let mut risk_max: Option<f64> = None;
        let mut known = 0usize;
        let mut unknown_risk = Vec::new();
        for drug in &selected {
            match self.risk_map.get(drug) {
                Some(score) => {
                    risk_sum += score;
                    risk_max = Some(risk_max.map_or(score, |max: f64| max.max(score)));
                    known += 1;
                }
                None => unknown_risk.push(drug.to_string()),
            }
        }
        if !unknown_risk.is_empty() {
            warn!(drugs = ?unknown_risk, "selected drugs have no risk score, excluded from aggregates");
        }

        let risk_avg = (known > 0).then(|| risk_sum / known as f64);

        Ok(PolypharmacyReport {
            drugs: selected.iter().map(|drug| drug.to_string()).collect(),
            union_count: union.len(),
            shared_effects,
            risk_sum,
            risk_avg,
            risk_max,
            risk_level: risk_avg.map(RiskLevel::classify),
            unknown_risk,
        })
    }

    /// Side-effect intersection and both risk scores for a drug pair.
    pub fn pairwise_overlap(&self, drug_a: &str, drug_b: &str) -> CombinationContext {
        let effects_b: FxHashSet<&str> = self
            .index
            .effects(drug_b)
            .iter()
            .map(String::as_str)
            .collect();
        let shared_effects = self
            .index
            .distinct_effects(drug_a)
            .into_iter()
            .filter(|effect| effects_b.contains(effect.as_str()))
            .collect();

        CombinationContext {
            drug_a: drug_a.to_string(),
            drug_b: drug_b.to_string(),
            risk_a: self.risk_map.get(drug_a),
            risk_b: self.risk_map.get(drug_b),
            shared_effects,
        }
    }
}
