//! AI-assisted risk hypothesis generation
//!
//! Terminal, optional enrichment step: a prompt composed from a pairwise
//! combination context is sent to an LLM once, with no retry. Failure is an
//! explicit error the caller surfaces to the user; it never touches the
//! analytical state.

pub mod client;

use crate::analysis::CombinationContext;
use thiserror::Error;

pub use client::HypothesisClient;

/// Up to this many shared effect names are quoted in the prompt.
pub const PROMPT_EFFECT_CAP: usize = 10;

#[derive(Error, Debug)]
pub enum HypothesisError {
    #[error("LLM API error: {0}")]
    ApiError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type HypothesisResult<T> = Result<T, HypothesisError>;

/// Compose the pharmacologist prompt from a pairwise overlap context.
pub fn build_prompt(context: &CombinationContext) -> String {
    let risk_a = format_risk(context.risk_a);
    let risk_b = format_risk(context.risk_b);
    let key_overlaps: Vec<&str> = context
        .shared_effects
        .iter()
        .take(PROMPT_EFFECT_CAP)
        .map(String::as_str)
        .collect();

    format!(
        "As a senior pharmacologist, analyze this drug combination:\n\
         \n\
         **Drugs**: {drug_a} (Risk: {risk_a}) + {drug_b} (Risk: {risk_b})\n\
         \n\
         **Shared Side Effects**: {overlap_count}\n\
         **Key Overlaps**: {key_overlaps:?}\n\
         \n\
         Generate 3 clinically-relevant hypotheses considering:\n\
         1. Pharmacodynamic interactions\n\
         2. Metabolic pathway conflicts (CYP450, etc.)\n\
         3. Synergistic/adverse effect probabilities\n\
         \n\
         For each hypothesis, provide:\n\
         - Mechanism of Action\n\
         - Biological Plausibility (1-5)\n\
         - Clinical Significance (High/Medium/Low)\n\
         - Suggested Monitoring Protocol\n",
        drug_a = context.drug_a,
        drug_b = context.drug_b,
        overlap_count = context.overlap_count(),
    )
}

fn format_risk(risk: Option<f64>) -> String {
    match risk {
        Some(score) => format!("{score:.2}"),
        None => "unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> CombinationContext {
        CombinationContext {
            drug_a: "aspirin".into(),
            drug_b: "ibuprofen".into(),
            risk_a: Some(0.312),
            risk_b: None,
            shared_effects: (0..12).map(|i| format!("effect{i}")).collect(),
        }
    }

    #[test]
    fn test_prompt_contains_drugs_and_risks() {
        let prompt = build_prompt(&context());
        assert!(prompt.contains("aspirin (Risk: 0.31)"));
        assert!(prompt.contains("ibuprofen (Risk: unknown)"));
        assert!(prompt.contains("**Shared Side Effects**: 12"));
    }

    #[test]
    fn test_prompt_caps_quoted_effects() {
        let prompt = build_prompt(&context());
        assert!(prompt.contains("effect9"));
        assert!(!prompt.contains("effect10"));
    }
}
