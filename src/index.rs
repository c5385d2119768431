//! Lookup indices derived from the loaded tables
//!
//! Two mappings back every analysis operation: drug -> risk score and
//! drug -> side effects in source order. Both are built once per dataset
//! and are read-only afterwards.

use crate::dataset::{EdgeTable, RiskTable};
use indexmap::IndexMap;
use rustc_hash::FxHashSet;

/// Drug -> risk score, last value wins on duplicate rows.
#[derive(Debug, Clone, Default)]
pub struct RiskMap {
    scores: IndexMap<String, f64>,
}

impl RiskMap {
    pub fn from_table(table: &RiskTable) -> Self {
        let mut scores = IndexMap::with_capacity(table.len());
        for row in table.rows() {
            scores.insert(row.drug_name.trim().to_string(), row.risk_score);
        }
        RiskMap { scores }
    }

    pub fn get(&self, drug: &str) -> Option<f64> {
        self.scores.get(drug).copied()
    }

    pub fn contains(&self, drug: &str) -> bool {
        self.scores.contains_key(drug)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.scores.iter().map(|(drug, score)| (drug.as_str(), *score))
    }

    pub fn drugs(&self) -> impl Iterator<Item = &str> {
        self.scores.keys().map(String::as_str)
    }
}

/// Drug -> reported side effects, grouped in source row order.
///
/// Duplicates are preserved deliberately; raw multiplicity can matter to a
/// consumer that weights by report count. Callers needing a set use
/// [`SideEffectIndex::distinct_effects`].
#[derive(Debug, Clone, Default)]
pub struct SideEffectIndex {
    by_drug: IndexMap<String, Vec<String>>,
}

impl SideEffectIndex {
    pub fn from_table(table: &EdgeTable) -> Self {
        let mut by_drug: IndexMap<String, Vec<String>> = IndexMap::new();
        for row in table.rows() {
            let drug = row.drug_name.trim();
            let effect = row.side_effect.trim();
            if drug.is_empty() || effect.is_empty() {
                continue;
            }
            by_drug
                .entry(drug.to_string())
                .or_default()
                .push(effect.to_string());
        }
        SideEffectIndex { by_drug }
    }

    /// Side effects as observed, duplicates included. Unknown drug yields an
    /// empty slice, not an error.
    pub fn effects(&self, drug: &str) -> &[String] {
        self.by_drug.get(drug).map(Vec::as_slice).unwrap_or(&[])
    }

    /// De-duplicated side effects, first-seen order preserved.
    pub fn distinct_effects(&self, drug: &str) -> Vec<String> {
        let mut seen = FxHashSet::default();
        self.effects(drug)
            .iter()
            .filter(|effect| seen.insert(effect.as_str()))
            .cloned()
            .collect()
    }

    pub fn contains(&self, drug: &str) -> bool {
        self.by_drug.contains_key(drug)
    }

    pub fn len(&self) -> usize {
        self.by_drug.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_drug.is_empty()
    }

    pub fn drugs(&self) -> impl Iterator<Item = &str> {
        self.by_drug.keys().map(String::as_str)
    }
}
