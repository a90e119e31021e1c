//! Generative-language client abstraction
//!
//! Drafts article text from a topic. Providers:
//! - Google Gemini (`generateContent` REST API)
//! - Mock (deterministic, offline)

mod gemini;
mod prompt;

pub use gemini::GeminiGenerator;
pub use prompt::build_prompt;

use crate::config::GenerationConfig;
use crate::errors::{AppError, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Trait for article text generation
#[async_trait]
pub trait Generator: Send + Sync {
    /// Draft an article about `topic`, returning the raw generated text
    async fn generate(&self, topic: &str) -> Result<String>;

    /// Get the model name
    fn model_name(&self) -> &str;
}

/// Mock generator for testing
pub struct MockGenerator;

#[async_trait]
impl Generator for MockGenerator {
    async fn generate(&self, topic: &str) -> Result<String> {
        let topic = topic.trim();
        Ok(format!(
            "# {topic}\n\n\
             An introduction to **{topic}**.\n\n\
             ## Background\n\n\
             - What *{topic}* is\n\
             - Why it matters\n\n\
             ## Conclusion\n\n\
             That is the essence of {topic}.\n"
        ))
    }

    fn model_name(&self) -> &str {
        "mock-generator"
    }
}

/// Create a generator based on configuration
pub fn create_generator(config: &GenerationConfig) -> Result<Arc<dyn Generator>> {
    match config.provider.as_str() {
        "gemini" => Ok(Arc::new(GeminiGenerator::new(config)?)),
        "mock" => Ok(Arc::new(MockGenerator)),
        other => Err(AppError::Configuration {
            message: format!("Unknown generation provider: {}", other),
        }),
    }
}
