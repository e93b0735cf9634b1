//! Content-Generation Client — the single point of entry for all calls to the
//! external text-generation service.
//!
//! ARCHITECTURAL RULE: no other module may call the generation API directly.
//! All generation traffic goes through [`TextGenerator::generate`]; the typed
//! resume operations live in [`ops`].

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod ops;
pub mod prompts;

const GENERATION_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
/// The model used for all generation calls.
/// Intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "gemini-pro";

/// Caller-facing error type for generation operations.
///
/// Transport and service failures are deliberately collapsed into the single
/// generic [`GenAiError::Generation`] variant — the original error detail is
/// logged, not propagated, so the message shown to users stays readable.
#[derive(Debug, Error)]
pub enum GenAiError {
    #[error("{0}")]
    Validation(String),

    #[error("Failed to generate content. Please try again.")]
    Generation,
}

/// Low-level failure from the generation service itself. Never crosses the
/// ops boundary — see [`GenAiError`].
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("generation service returned empty content")]
    EmptyContent,
}

/// Seam for the external text-generation service. Production uses
/// [`GenAiClient`]; tests substitute a canned generator.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, TransportError>;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
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

impl GenerateContentResponse {
    /// Extracts the text of the first candidate's first text part.
    fn text(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|c| c.content.parts.iter().find_map(|p| p.text.as_deref()))
    }
}

/// The production client for the generation REST API.
#[derive(Clone)]
pub struct GenAiClient {
    client: Client,
    api_key: String,
}

impl GenAiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }
}

#[async_trait]
impl TextGenerator for GenAiClient {
    /// Sends a single-turn prompt and returns the trimmed response text.
    async fn generate(&self, prompt: &str) -> Result<String, TransportError> {
        let url = format!("{GENERATION_API_URL}/{MODEL}:generateContent");
        let request_body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        let text = parsed.text().ok_or(TransportError::EmptyContent)?;

        debug!("Generation call succeeded ({} chars)", text.len());
        Ok(text.trim().to_string())
    }
}
