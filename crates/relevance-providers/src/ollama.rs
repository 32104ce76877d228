//! Ollama (local LLM) oracle implementation.

use std::time::Instant;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use relevance_core::traits::{Oracle, OracleReply, OracleRequest, TokenUsage};
use relevance_core::ScoringError;

use crate::http::{build_client, check_status, read_json};

const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Ollama local LLM oracle.
pub struct OllamaProvider {
    base_url: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let base = if base_url.is_empty() {
            DEFAULT_BASE_URL
        } else {
            base_url
        };

        Ok(Self {
            base_url: base.trim_end_matches('/').to_string(),
            timeout_secs,
            client: build_client(timeout_secs)?,
        })
    }
}

#[derive(Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    messages: Vec<OllamaMessage<'a>>,
    stream: bool,
    format: &'a serde_json::Value,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    num_predict: u32,
}

#[derive(Deserialize)]
struct OllamaResponse {
    message: OllamaResponseMessage,
    model: String,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Deserialize)]
struct OllamaResponseMessage {
    content: String,
}

#[async_trait]
impl Oracle for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn complete(&self, request: &OracleRequest) -> Result<OracleReply, ScoringError> {
        let start = Instant::now();

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &request.system_prompt {
            messages.push(OllamaMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(OllamaMessage {
            role: "user",
            content: &request.user_prompt,
        });

        let body = OllamaRequest {
            model: &request.model,
            messages,
            stream: false,
            format: &request.schema,
            options: OllamaOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            },
        };

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ScoringError::Timeout(self.timeout_secs)
                } else if e.is_connect() {
                    ScoringError::Unreachable(format!(
                        "Ollama not reachable at {}. Is it running? Start with: ollama serve",
                        self.base_url
                    ))
                } else {
                    ScoringError::Unreachable(e.to_string())
                }
            })?;

        let response = check_status(response, &request.model).await?;
        let api_response: OllamaResponse = read_json(response, self.timeout_secs).await?;

        let latency_ms = start.elapsed().as_millis() as u64;
        let prompt_tokens = api_response.prompt_eval_count.unwrap_or(0);
        let completion_tokens = api_response.eval_count.unwrap_or(0);

        Ok(OracleReply {
            content: api_response.message.content,
            model: api_response.model,
            token_usage: TokenUsage {
                prompt_tokens,
                completion_tokens,
                total_tokens: prompt_tokens + completion_tokens,
            },
            latency_ms,
        })
    }
}
