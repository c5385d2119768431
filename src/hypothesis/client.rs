//! LLM client for hypothesis generation

use crate::analysis::CombinationContext;
use crate::config::LlmConfig;
use crate::hypothesis::{build_prompt, HypothesisError, HypothesisResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct HypothesisClient {
    client: Client,
    config: LlmConfig,
    api_base_url: String,
}

impl HypothesisClient {
    pub fn new(config: &LlmConfig) -> HypothesisResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| HypothesisError::ConfigError(e.to_string()))?;

        let api_base_url = config
            .api_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        Ok(Self {
            client,
            config: config.clone(),
            api_base_url,
        })
    }

    /// Single synchronous request, no retry. The dashboard stays usable on
    /// failure; the caller just surfaces the error message.
    pub async fn generate(&self, context: &CombinationContext) -> HypothesisResult<String> {
        let prompt = build_prompt(context);
        let text = self.generate_content(&prompt).await?;
        info!(
            drug_a = %context.drug_a,
            drug_b = %context.drug_b,
            "hypothesis generated"
        );
        Ok(text)
    }

    async fn generate_content(&self, prompt: &str) -> HypothesisResult<String> {
        #[derive(Serialize)]
        struct Request {
            contents: Vec<Content>,
            #[serde(rename = "generationConfig")]
            generation_config: GenerationConfig,
        }

        #[derive(Serialize, Deserialize)]
        struct Content {
            role: Option<String>,
            parts: Vec<Part>,
        }

        #[derive(Serialize, Deserialize)]
        struct Part {
            text: String,
        }

        #[derive(Serialize)]
        struct GenerationConfig {
            temperature: f32,
        }

        #[derive(Deserialize)]
        struct Response {
            candidates: Option<Vec<Candidate>>,
        }

        #[derive(Deserialize)]
        struct Candidate {
            content: Content,
        }

        let api_key = self
            .config
            .resolve_api_key()
            .ok_or_else(|| HypothesisError::ConfigError("LLM API key not configured".to_string()))?;

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.api_base_url, self.config.model, api_key
        );

        let resp = self
            .client
            .post(&url)
            .json(&Request {
                contents: vec![Content {
                    role: Some("user".to_string()),
                    parts: vec![Part {
                        text: prompt.to_string(),
                    }],
                }],
                generation_config: GenerationConfig { temperature: 0.0 },
            })
            .send()
            .await
            .map_err(|e| HypothesisError::NetworkError(e.to_string()))?;

        if !resp.status().is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(HypothesisError::ApiError(format!("LLM error: {text}")));
        }

        let result: Response = resp
            .json()
            .await
            .map_err(|e| HypothesisError::SerializationError(e.to_string()))?;

        result
            .candidates
            .and_then(|candidates| candidates.into_iter().next())
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or_else(|| HypothesisError::ApiError("empty LLM response".to_string()))
    }
}
