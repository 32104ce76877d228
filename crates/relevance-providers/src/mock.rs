//! Mock oracle for testing.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use relevance_core::rubric::RUBRIC;
use relevance_core::traits::{Oracle, OracleReply, OracleRequest, TokenUsage};
use relevance_core::ScoringError;

/// A mock oracle for exercising the scorer and runner without real API calls.
///
/// Replies come from, in order of precedence: a queue of scripted outcomes,
/// then the first substring rule matching the prompt/response pair, then the
/// default reply.
pub struct MockOracle {
    /// Outcomes consumed one per call, front first.
    script: Mutex<VecDeque<Result<String, ScoringError>>>,
    /// Pair substring → reply payload, tried in order.
    responses: Vec<(String, String)>,
    /// Reply if nothing else applies.
    default_response: String,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Last request received.
    last_request: Mutex<Option<OracleRequest>>,
}

impl MockOracle {
    /// Create a mock with the given substring→reply rules.
    ///
    /// Keys are matched against the interpolated pair only, not the rubric.
    /// The first matching rule wins.
    pub fn new(responses: Vec<(String, String)>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            responses,
            default_response: r#"{"score": "good", "reasoning": "Placeholder judgment."}"#
                .to_string(),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Create a mock that always returns the same payload.
    pub fn with_fixed_response(response: &str) -> Self {
        let mut mock = Self::new(Vec::new());
        mock.default_response = response.to_string();
        mock
    }

    /// Create a mock that replays `script` call by call, then falls back to
    /// the default reply.
    pub fn with_script(script: Vec<Result<String, ScoringError>>) -> Self {
        let mock = Self::new(Vec::new());
        *mock.script.lock().unwrap_or_else(|e| e.into_inner()) = script.into();
        mock
    }

    /// Get the number of calls made to this oracle.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last request made to this oracle.
    pub fn last_request(&self) -> Option<OracleRequest> {
        self.last_request
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl Oracle for MockOracle {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &OracleRequest) -> Result<OracleReply, ScoringError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_request.lock().unwrap_or_else(|e| e.into_inner()) = Some(request.clone());

        let scripted = self
            .script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();

        let content = match scripted {
            Some(outcome) => outcome?,
            None => {
                let pair = request
                    .user_prompt
                    .strip_prefix(RUBRIC)
                    .unwrap_or(&request.user_prompt);
                self.responses
                    .iter()
                    .find(|(key, _)| pair.contains(key.as_str()))
                    .map(|(_, v)| v.clone())
                    .unwrap_or_else(|| self.default_response.clone())
            }
        };

        let prompt_tokens = (request.user_prompt.len() / 4) as u32; // Rough estimate
        let completion_tokens = (content.len() / 4) as u32;

        Ok(OracleReply {
            content,
            model: request.model.clone(),
            token_usage: TokenUsage {
                prompt_tokens,
                completion_tokens,
                total_tokens: prompt_tokens + completion_tokens,
            },
            latency_ms: 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relevance_core::rubric;

    fn request(prompt: &str, response: &str) -> OracleRequest {
        OracleRequest {
            model: "mock".into(),
            system_prompt: None,
            user_prompt: rubric::render(prompt, response),
            schema_name: rubric::SCHEMA_NAME.into(),
            schema: rubric::evaluation_schema(),
            max_tokens: 100,
            temperature: None,
        }
    }

    #[tokio::test]
    async fn fixed_response() {
        let oracle = MockOracle::with_fixed_response(r#"{"score":"ok","reasoning":"x"}"#);
        let reply = oracle.complete(&request("a", "b")).await.unwrap();
        assert_eq!(reply.content, r#"{"score":"ok","reasoning":"x"}"#);
        assert_eq!(oracle.call_count(), 1);
    }

    #[tokio::test]
    async fn matching_ignores_rubric_text() {
        // "relevance" appears in the rubric but not in the pair.
        let oracle = MockOracle::new(vec![
            ("relevance".to_string(), "rubric matched".to_string()),
            ("haiku".to_string(), "pair matched".to_string()),
        ]);

        let reply = oracle
            .complete(&request("Write a haiku", "Leaves fall"))
            .await
            .unwrap();
        assert_eq!(reply.content, "pair matched");

        let reply = oracle.complete(&request("Sum 2+2", "4")).await.unwrap();
        assert!(reply.content.contains("Placeholder"));
        assert_eq!(oracle.call_count(), 2);
    }

    #[tokio::test]
    async fn script_replays_then_falls_back() {
        let oracle = MockOracle::with_script(vec![
            Ok("first".into()),
            Err(ScoringError::Timeout(3)),
        ]);

        assert_eq!(oracle.complete(&request("a", "b")).await.unwrap().content, "first");
        assert!(matches!(
            oracle.complete(&request("a", "b")).await,
            Err(ScoringError::Timeout(3))
        ));
        assert!(oracle
            .complete(&request("a", "b"))
            .await
            .unwrap()
            .content
            .contains("Placeholder"));
        assert_eq!(oracle.last_request().unwrap().model, "mock");
    }

    #[tokio::test]
    async fn first_matching_rule_wins() {
        let oracle = MockOracle::new(vec![
            ("capital".to_string(), "first".to_string()),
            ("France".to_string(), "second".to_string()),
        ]);

        for _ in 0..5 {
            let reply = oracle
                .complete(&request("What is the capital of France?", "Paris"))
                .await
                .unwrap();
            assert_eq!(reply.content, "first");
        }
    }
}
