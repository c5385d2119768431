//! Dataset loading
//!
//! Reads the two tabular inputs into normalized in-memory tables:
//! - edge source: `drug_name, side_effect, freq_pct`
//! - risk source: `drug_name, risk_score`
//!
//! Missing files degrade to empty tables of the correct schema so every
//! downstream component can run against an empty dataset. Frequency cells
//! are kept as raw text here; parsing them is the graph builder's job.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// One observed drug -> side-effect association
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRow {
    pub drug_name: String,
    pub side_effect: String,
    /// Raw frequency cell; may be absent or non-numeric
    pub freq_pct: Option<String>,
}

/// One per-drug risk score row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskRow {
    pub drug_name: String,
    pub risk_score: f64,
}

/// Edge records in source order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeTable {
    rows: Vec<EdgeRow>,
}

impl EdgeTable {
    pub fn new(rows: Vec<EdgeRow>) -> Self {
        EdgeTable { rows }
    }

    pub fn rows(&self) -> &[EdgeRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Risk score rows in source order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskTable {
    rows: Vec<RiskRow>,
}

impl RiskTable {
    pub fn new(rows: Vec<RiskRow>) -> Self {
        RiskTable { rows }
    }

    pub fn rows(&self) -> &[RiskRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Load both tables. If either file is absent, both come back empty and the
/// caller proceeds in a degraded, empty-dataset state.
pub fn load_dataset(edge_path: &Path, risk_path: &Path) -> Result<(EdgeTable, RiskTable)> {
    if !edge_path.exists() || !risk_path.exists() {
        warn!(
            edge = %edge_path.display(),
            risk = %risk_path.display(),
            "dataset files missing, continuing with empty tables"
        );
        return Ok((EdgeTable::default(), RiskTable::default()));
    }

    let edges = load_edge_table(edge_path)?;
    let risks = load_risk_table(risk_path)?;
    info!(edges = edges.len(), risks = risks.len(), "dataset loaded");
    Ok((edges, risks))
}

fn load_edge_table(path: &Path) -> Result<EdgeTable> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read edge file: {}", path.display()))?;
    parse_edge_table(&content)
}

fn parse_edge_table(content: &str) -> Result<EdgeTable> {
    let mut lines = content.lines();
    let header = lines.next().context("Empty edge file")?;
    let columns = split_fields(header);

    let drug_idx = column_index(&columns, "drug_name").context("Missing drug_name column")?;
    let effect_idx = column_index(&columns, "side_effect").context("Missing side_effect column")?;
    let freq_idx = column_index(&columns, "freq_pct").context("Missing freq_pct column")?;

    let mut rows = Vec::new();
    for (line_num, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let values = split_fields(line);
        let (Some(drug), Some(effect)) = (values.get(drug_idx), values.get(effect_idx)) else {
            warn!(line = line_num + 2, "edge row missing required cells, skipped");
            continue;
        };
        let freq = values
            .get(freq_idx)
            .map(|cell| cell.to_string())
            .filter(|cell| !cell.is_empty());
        rows.push(EdgeRow {
            drug_name: drug.clone(),
            side_effect: effect.clone(),
            freq_pct: freq,
        });
    }
    Ok(EdgeTable::new(rows))
}

fn load_risk_table(path: &Path) -> Result<RiskTable> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read risk file: {}", path.display()))?;
    parse_risk_table(&content)
}

fn parse_risk_table(content: &str) -> Result<RiskTable> {
    let mut lines = content.lines();
    let header = lines.next().context("Empty risk file")?;
    let columns = split_fields(header);

    let drug_idx = column_index(&columns, "drug_name").context("Missing drug_name column")?;
    let score_idx = column_index(&columns, "risk_score").context("Missing risk_score column")?;

    let mut rows = Vec::new();
    for (line_num, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let values = split_fields(line);
        let (Some(drug), Some(score_cell)) = (values.get(drug_idx), values.get(score_idx)) else {
            warn!(line = line_num + 2, "risk row missing required cells, skipped");
            continue;
        };
        // The risk schema is numeric by contract; there is no Unknown
        // sentinel for scores, so unparsable rows are dropped.
        let Ok(score) = score_cell.parse::<f64>() else {
            warn!(line = line_num + 2, cell = %score_cell, "unparsable risk score, row skipped");
            continue;
        };
        rows.push(RiskRow {
            drug_name: drug.clone(),
            risk_score: score,
        });
    }
    Ok(RiskTable::new(rows))
}

fn column_index(columns: &[String], name: &str) -> Option<usize> {
    columns.iter().position(|c| c == name)
}

/// Split one CSV line, honoring double-quoted fields (with `""` escapes).
/// Fields are trimmed.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                chars.next();
                current.push('"');
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_fields_plain() {
        assert_eq!(split_fields("a, b ,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_split_fields_quoted() {
        assert_eq!(
            split_fields(r#"aspirin,"nausea, severe",5.0"#),
            vec!["aspirin", "nausea, severe", "5.0"]
        );
        assert_eq!(split_fields(r#""say ""hi""",x"#), vec![r#"say "hi""#, "x"]);
    }

    #[test]
    fn test_parse_edge_table() {
        let table = parse_edge_table(
            "drug_name,side_effect,freq_pct\naspirin,nausea,12.5\naspirin,headache,\n",
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].freq_pct.as_deref(), Some("12.5"));
        assert_eq!(table.rows()[1].freq_pct, None);
    }

    #[test]
    fn test_parse_edge_table_extra_columns_ignored() {
        let table = parse_edge_table(
            "source,drug_name,side_effect,freq_pct\nfaers,aspirin,nausea,1\n",
        )
        .unwrap();
        assert_eq!(table.rows()[0].drug_name, "aspirin");
    }

    #[test]
    fn test_parse_edge_table_skips_short_rows() {
        let table = parse_edge_table(
            "drug_name,side_effect,freq_pct\naspirin\nibuprofen,rash,2\n",
        )
        .unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].drug_name, "ibuprofen");
        assert_eq!(table.rows()[0].side_effect, "rash");
    }

    #[test]
    fn test_parse_edge_table_missing_column() {
        let err = parse_edge_table("drug_name,freq_pct\naspirin,1\n").unwrap_err();
        assert!(err.to_string().contains("side_effect"));
    }

    #[test]
    fn test_parse_risk_table_skips_bad_scores() {
        let table =
            parse_risk_table("drug_name,risk_score\naspirin,0.3\nibuprofen,unknown\n").unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].risk_score, 0.3);
    }

    #[test]
    fn test_load_dataset_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let (edges, risks) = load_dataset(
            &dir.path().join("absent_edges.csv"),
            &dir.path().join("absent_risks.csv"),
        )
        .unwrap();
        assert!(edges.is_empty());
        assert!(risks.is_empty());
    }
}
