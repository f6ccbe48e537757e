//! Text generation for workout and diet plans.
//!
//! The model is asked for a JSON object; `parse` turns its free-text reply
//! into typed plans and `prompts` builds the requests.

pub mod dto;
pub mod gemini;
pub mod parse;
pub mod prompts;

use async_trait::async_trait;

/// Prompt in, free text out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}
