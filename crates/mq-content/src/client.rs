//! Generation endpoint client
//!
//! The endpoint takes `{contents: [{parts: [{text}]}]}` and answers with the
//! upstream envelope, whose first candidate's first part carries the text.

use crate::error::GenerationError;
use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};

/// Seam over the text-generation endpoint
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Send one prompt and return the generated text
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Request body accepted by the endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Prompt contents
    pub contents: Vec<RequestContent>,
}

/// One content block of a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContent {
    /// Text parts
    pub parts: Vec<TextPart>,
}

/// A text part
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextPart {
    /// Text
    pub text: String,
}

impl GenerateRequest {
    /// Wrap a single prompt
    #[must_use]
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![TextPart { text: prompt.into() }],
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
            .filter(|t| !t.trim().is_empty())
    }
}

/// HTTP client for the generation proxy
#[derive(Debug, Clone)]
pub struct ProxyClient {
    client: Client,
    endpoint: String,
}

impl ProxyClient {
    /// Create a client for `endpoint` (e.g. `https://host/api/generateContent`)
    pub fn new(endpoint: impl Into<String>) -> Result<Self, GenerationError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        let client = Client::builder().default_headers(headers).build()?;
        Ok(Self::with_client(client, endpoint))
    }

    /// Use a preconfigured reqwest client
    #[must_use]
    pub fn with_client(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Endpoint URL
    #[inline]
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl GenerationClient for ProxyClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        tracing::debug!(endpoint = %self.endpoint, prompt_len = prompt.len(), "requesting generation");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&GenerateRequest::from_prompt(prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|err| {
                tracing::warn!(status = status.as_u16(), error = %err, "error body unreadable");
                String::new()
            });
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: GenerateResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Decode(e.to_string()))?;

        envelope.into_text().ok_or(GenerationError::MissingText)
    }
}
