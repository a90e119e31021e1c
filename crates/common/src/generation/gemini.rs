//! Google Gemini `generateContent` client

use super::{prompt::build_prompt, Generator};
use crate::config::{GenerationConfig, PromptStyle};
use crate::errors::{AppError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Gemini client; one instance is built at startup and shared
pub struct GeminiGenerator {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    template: PromptStyle,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GeminiGenerator {
    /// Create a client from configuration; the API key is mandatory
    pub fn new(config: &GenerationConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| AppError::Configuration {
                message: "Gemini API key missing (set GOOGLE_API_KEY or APP__GENERATION__API_KEY)"
                    .to_string(),
            })?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            base_url: config.api_base.trim_end_matches('/').to_string(),
            template: config.template,
        })
    }

    async fn make_request(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Generation {
                message: format!("Request failed: {}", e),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Generation {
                message: format!("API error {}: {}", status, body),
            });
        }

        let result: GenerateResponse = response.json().await.map_err(|e| AppError::Generation {
            message: format!("Failed to parse response: {}", e),
        })?;

        let text: String = result
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect()
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(AppError::Generation {
                message: "Response contained no text".to_string(),
            });
        }

        Ok(text)
    }
}

#[async_trait]
impl Generator for GeminiGenerator {
    async fn generate(&self, topic: &str) -> Result<String> {
        let prompt = build_prompt(self.template, topic);
        self.make_request(&prompt).await
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
