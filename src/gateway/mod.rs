// SPDX-License-Identifier: MIT
//! AI gateway — stateless passthrough to the Gemini generateContent API.
//!
//! Builds a fixed prompt embedding the payload verbatim, submits it, and
//! returns the model's raw text. No retry, no response schema validation.
//! Route handlers map every error to a canned user-facing string.

pub mod prompts;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::GeminiConfig;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Gemini API key is not configured")]
    MissingApiKey,
    #[error("request to Gemini API failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Gemini API returned status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Gemini API returned no text")]
    EmptyResponse,
}

// ─── Wire types (generateContent) ─────────────────────────────────────────────

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
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
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

// ─── GeminiClient ─────────────────────────────────────────────────────────────

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            model: config.model.clone(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Submit a prompt and return the model's raw text.
    pub async fn generate(&self, prompt: &str) -> Result<String, GatewayError> {
        let key = self.api_key.as_deref().ok_or(GatewayError::MissingApiKey)?;
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let started = std::time::Instant::now();
        let resp = self
            .http
            .post(&url)
            .query(&[("key", key)])
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body: GenerateResponse = resp.json().await?;
        let text: String = body
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| {
                c.parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        debug!(
            model = %self.model,
            elapsed_ms = started.elapsed().as_millis() as u64,
            chars = text.len(),
            "generateContent complete"
        );

        if text.is_empty() {
            return Err(GatewayError::EmptyResponse);
        }
        Ok(text)
    }
}
