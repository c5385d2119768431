//! Dashboard configuration
//!
//! Data paths, graph-build and centrality tuning, and LLM settings, loadable
//! from a JSON file with sensible defaults for every field. The LLM API key
//! falls back to the `GEMINI_API_KEY` environment variable.

use crate::centrality::CentralityConfig;
use crate::graph::store::DEFAULT_EDGE_LIMIT;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Edge source (`drug_name, side_effect, freq_pct`)
    pub edge_csv: PathBuf,
    /// Risk source (`drug_name, risk_score`)
    pub risk_csv: PathBuf,
    /// Cap on edge rows consumed by the graph builder; `None` disables it
    pub edge_limit: Option<usize>,
    pub centrality: CentralityConfig,
    pub llm: LlmConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            edge_csv: PathBuf::from("data/processed/side_effects_clean.csv"),
            risk_csv: PathBuf::from("data/processed/drug_risk_scores.csv"),
            edge_limit: Some(DEFAULT_EDGE_LIMIT),
            centrality: CentralityConfig::default(),
            llm: LlmConfig::default(),
        }
    }
}

impl DashboardConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    /// Explicit key; when absent `GEMINI_API_KEY` is consulted at call time
    pub api_key: Option<String>,
    pub api_base_url: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        LlmConfig {
            model: "gemini-2.0-flash".to_string(),
            api_key: None,
            api_base_url: None,
        }
    }
}

impl LlmConfig {
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
    }
}
