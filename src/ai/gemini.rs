use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use super::TextGenerator;
use crate::config::GeminiConfig;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Google Gemini `generateContent` client.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(cfg: &GeminiConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.url())
            .json(&body)
            .send()
            .await
            .context("gemini request")?;

        let status = response.status();
        let text = response.text().await.context("read gemini response")?;
        if !status.is_success() {
            error!(%status, "gemini api error");
            anyhow::bail!("gemini returned {}: {}", status, text);
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&text).context("decode gemini response")?;
        extract_text(parsed)
    }
}

fn extract_text(resp: GenerateResponse) -> anyhow::Result<String> {
    if let Some(err) = resp.error {
        anyhow::bail!("gemini error: {}", err.message);
    }
    let out: String = resp
        .candidates
        .unwrap_or_default()
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    if out.is_empty() {
        anyhow::bail!("gemini returned no text");
    }
    debug!(len = out.len(), "gemini text received");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_text_parts_of_first_candidate() {
        let resp: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"```json\n{"},{"text":"}\n```"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(resp).unwrap(), "```json\n{}\n```");
    }

    #[test]
    fn surfaces_api_error_message() {
        let resp: GenerateResponse =
            serde_json::from_str(r#"{"error":{"message":"quota exceeded"}}"#).unwrap();
        let err = extract_text(resp).unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[test]
    fn empty_candidates_is_an_error() {
        let resp: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(extract_text(resp).is_err());
    }

    #[test]
    fn builds_generate_content_url() {
        let client = GeminiClient::new(&GeminiConfig {
            api_key: "k".into(),
            model: "gemini-x".into(),
            base_url: "http://localhost:9999/v1beta/".into(),
        });
        assert_eq!(
            client.url(),
            "http://localhost:9999/v1beta/models/gemini-x:generateContent?key=k"
        );
    }
}
