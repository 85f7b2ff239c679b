use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    #[error("network error: {0}")]
    Transport(String),

    #[error("API error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("the model returned no content")]
    EmptyResult,

    #[error("instruction text is empty")]
    EmptyInstruction,
}

impl GatewayError {
    /// Connection, timeout and HTTP status failures.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            GatewayError::Timeout(_) | GatewayError::Transport(_) | GatewayError::Status { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParsedReply {
    Text(String),
    Structured(Value),
}

impl ParsedReply {
    pub fn into_text(self) -> Result<String, GatewayError> {
        match self {
            ParsedReply::Text(s) => Ok(s),
            ParsedReply::Structured(v) => Ok(v.to_string()),
        }
    }

    pub fn into_structured<T: DeserializeOwned>(self) -> Result<T, GatewayError> {
        match self {
            ParsedReply::Structured(v) => serde_json::from_value(v)
                .map_err(|e| GatewayError::MalformedResponse(format!("unexpected shape: {e}"))),
            ParsedReply::Text(_) => Err(GatewayError::MalformedResponse(
                "expected structured output, got plain text".to_string(),
            )),
        }
    }
}

#[async_trait]
pub trait Gateway: Send + Sync {
    async fn invoke(
        &self,
        instruction: &str,
        schema: Option<&Value>,
    ) -> Result<ParsedReply, GatewayError>;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig<'a>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<&'a Value>,
}

#[derive(Deserialize)]
struct GenerateResponse {
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
    text: Option<String>,
}

pub struct GeminiGateway {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
    timeout_secs: u64,
}

impl GeminiGateway {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.request_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            model: cfg.gemini_model.clone(),
            api_key: cfg.gemini_api_key.clone(),
            timeout_secs: cfg.request_timeout_secs,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    // reqwest errors carry the request URL, and with it the `key` query param
    fn classify(&self, e: reqwest::Error) -> GatewayError {
        let e = e.without_url();
        if e.is_timeout() {
            GatewayError::Timeout(self.timeout_secs)
        } else {
            GatewayError::Transport(e.to_string())
        }
    }
}

#[async_trait]
impl Gateway for GeminiGateway {
    async fn invoke(
        &self,
        instruction: &str,
        schema: Option<&Value>,
    ) -> Result<ParsedReply, GatewayError> {
        if instruction.trim().is_empty() {
            return Err(GatewayError::EmptyInstruction);
        }

        let req = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: instruction }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: if schema.is_some() {
                    "application/json"
                } else {
                    "text/plain"
                },
                response_schema: schema,
            },
        };

        tracing::info!(
            model = %self.model,
            chars = instruction.len(),
            structured = schema.is_some(),
            "calling generateContent"
        );

        let resp = self
            .http
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&req)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status, "generateContent returned an error status");
            return Err(GatewayError::Status { status, body });
        }

        let body = resp.text().await.map_err(|e| self.classify(e))?;
        let parsed = parse_reply(&body, schema.is_some())?;
        tracing::info!("generateContent succeeded");
        Ok(parsed)
    }
}

/// Extracts the first candidate's text and, for structured calls, parses it.
pub fn parse_reply(body: &str, structured: bool) -> Result<ParsedReply, GatewayError> {
    let parsed: GenerateResponse = serde_json::from_str(body).map_err(|e| {
        GatewayError::MalformedResponse(format!("reply lacks candidate structure: {e}"))
    })?;

    let text = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().find_map(|p| p.text))
        .filter(|t| !t.trim().is_empty())
        .ok_or(GatewayError::EmptyResult)?;

    if structured {
        let value: Value = serde_json::from_str(&text).map_err(|e| {
            tracing::warn!(raw = %text, "structured reply is not valid JSON");
            GatewayError::MalformedResponse(format!("invalid JSON in reply: {e}"))
        })?;
        Ok(ParsedReply::Structured(value))
    } else {
        Ok(ParsedReply::Text(text.trim().to_string()))
    }
}
