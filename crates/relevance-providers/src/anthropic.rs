//! Anthropic API oracle implementation.
//!
//! The Messages API has no schema-constrained text mode, so the schema is
//! offered as the input schema of a single forced tool. The tool call's input
//! object is the judgment.

use std::time::Instant;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use relevance_core::traits::{Oracle, OracleReply, OracleRequest, TokenUsage};
use relevance_core::ScoringError;

use crate::http::{build_client, check_status, read_json, transport_error};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";
const TOOL_NAME: &str = "record_evaluation";

/// Anthropic API oracle.
pub struct AnthropicProvider {
    api_key: String,
    base_url: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl AnthropicProvider {
    pub fn new(api_key: &str, base_url: Option<String>, timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            api_key: api_key.to_string(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout_secs,
            client: build_client(timeout_secs)?,
        })
    }
}

#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<AnthropicMessage<'a>>,
    tools: Vec<AnthropicTool<'a>>,
    tool_choice: ToolChoice,
}

#[derive(Serialize)]
struct AnthropicMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct AnthropicTool<'a> {
    name: &'static str,
    description: String,
    input_schema: &'a serde_json::Value,
}

#[derive(Serialize)]
struct ToolChoice {
    #[serde(rename = "type")]
    kind: &'static str,
    name: &'static str,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
    #[serde(default)]
    usage: AnthropicUsage,
    model: String,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        text: String,
    },
    ToolUse {
        name: String,
        input: serde_json::Value,
    },
    #[serde(other)]
    Other,
}

#[derive(Deserialize, Default)]
struct AnthropicUsage {
    #[serde(default)]
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
}

#[async_trait]
impl Oracle for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn complete(&self, request: &OracleRequest) -> Result<OracleReply, ScoringError> {
        let start = Instant::now();

        let body = AnthropicRequest {
            model: &request.model,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            system: request.system_prompt.as_deref(),
            messages: vec![AnthropicMessage {
                role: "user",
                content: &request.user_prompt,
            }],
            tools: vec![AnthropicTool {
                name: TOOL_NAME,
                description: format!("Record the {} judgment.", request.schema_name),
                input_schema: &request.schema,
            }],
            tool_choice: ToolChoice {
                kind: "tool",
                name: TOOL_NAME,
            },
        };

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(e, self.timeout_secs))?;
        let response = check_status(response, &request.model).await?;
        let api_response: AnthropicResponse = read_json(response, self.timeout_secs).await?;

        let latency_ms = start.elapsed().as_millis() as u64;

        let mut text = String::new();
        let mut tool_input = None;
        for block in api_response.content {
            match block {
                ContentBlock::ToolUse { name, input } if name == TOOL_NAME => {
                    tool_input = Some(input);
                    break;
                }
                ContentBlock::Text { text: t } => text.push_str(&t),
                _ => {}
            }
        }
        let Some(input) = tool_input else {
            return Err(ScoringError::Malformed {
                raw: text,
                reason: format!("response did not call the {TOOL_NAME} tool"),
            });
        };

        let usage = &api_response.usage;
        Ok(OracleReply {
            content: input.to_string(),
            model: api_response.model,
            token_usage: TokenUsage {
                prompt_tokens: usage.input_tokens,
                completion_tokens: usage.output_tokens,
                total_tokens: usage.input_tokens + usage.output_tokens,
            },
            latency_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relevance_core::rubric;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> OracleRequest {
        OracleRequest {
            model: "claude-sonnet-4-20250514".into(),
            system_prompt: None,
            user_prompt: rubric::render("Summarize the water cycle", "Water evaporates..."),
            schema_name: rubric::SCHEMA_NAME.into(),
            schema: rubric::evaluation_schema(),
            max_tokens: 256,
            temperature: Some(0.0),
        }
    }

    #[tokio::test]
    async fn successful_judgment_from_tool_call() {
        let server = MockServer::start().await;

        let response_body = serde_json::json!({
            "content": [
                {"type": "text", "text": "Recording."},
                {"type": "tool_use", "id": "toolu_1", "name": "record_evaluation",
                 "input": {"score": "excellent", "reasoning": "Complete and accurate."}}
            ],
            "model": "claude-sonnet-4-20250514",
            "usage": {"input_tokens": 400, "output_tokens": 30}
        });

        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "test-key"))
            .and(body_partial_json(serde_json::json!({
                "tool_choice": {"type": "tool", "name": "record_evaluation"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .expect(1)
            .mount(&server)
            .await;

        let provider = AnthropicProvider::new("test-key", Some(server.uri()), 5).unwrap();
        let reply = provider.complete(&request()).await.unwrap();

        let value: serde_json::Value = serde_json::from_str(&reply.content).unwrap();
        assert_eq!(value["score"], "excellent");
        assert_eq!(reply.token_usage.prompt_tokens, 400);
        assert_eq!(reply.token_usage.total_tokens, 430);
    }

    #[tokio::test]
    async fn text_only_reply_is_malformed() {
        let server = MockServer::start().await;

        let response_body = serde_json::json!({
            "content": [{"type": "text", "text": "I think this is great."}],
            "model": "claude-sonnet-4-20250514"
        });

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .mount(&server)
            .await;

        let provider = AnthropicProvider::new("test-key", Some(server.uri()), 5).unwrap();
        match provider.complete(&request()).await.unwrap_err() {
            ScoringError::Malformed { raw, .. } => assert_eq!(raw, "I think this is great."),
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn authentication_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
            .mount(&server)
            .await;

        let provider = AnthropicProvider::new("bad-key", Some(server.uri()), 5).unwrap();
        let err = provider.complete(&request()).await.unwrap_err();
        assert!(err.to_string().contains("authentication"));
    }

    #[tokio::test]
    async fn model_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "type": "error",
                "error": {"type": "not_found_error", "message": "model: claude-nope"}
            })))
            .mount(&server)
            .await;

        let provider = AnthropicProvider::new("test-key", Some(server.uri()), 5).unwrap();
        let err = provider.complete(&request()).await.unwrap_err();
        assert!(matches!(err, ScoringError::ModelNotFound(ref m) if m == "claude-sonnet-4-20250514"));
    }

    #[tokio::test]
    async fn rate_limiting() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let provider = AnthropicProvider::new("test-key", Some(server.uri()), 5).unwrap();
        let err = provider.complete(&request()).await.unwrap_err();
        assert!(err.to_string().contains("rate limited, retry after 5000ms"));
    }
}
