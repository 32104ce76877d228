//! The rubric-driven relevance scorer.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::decode::decode_judgment;
use crate::error::ScoringError;
use crate::model::{EvaluationRequest, EvaluationResult};
use crate::rubric;
use crate::traits::{Oracle, OracleRequest, Scorer};

/// Generation settings for the judge model.
#[derive(Debug, Clone)]
pub struct ScorerSettings {
    /// Model identifier.
    pub model: String,
    /// Maximum tokens for the judgment.
    pub max_tokens: u32,
    /// Sampling temperature; `None` uses the backend default.
    pub temperature: Option<f64>,
}

impl Default for ScorerSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            max_tokens: 256,
            temperature: None,
        }
    }
}

/// Scores a pair by sending the frozen rubric to an [`Oracle`].
pub struct RelevanceScorer {
    oracle: Arc<dyn Oracle>,
    settings: ScorerSettings,
}

impl RelevanceScorer {
    pub fn new(oracle: Arc<dyn Oracle>, settings: ScorerSettings) -> Self {
        Self { oracle, settings }
    }

    /// Build the oracle request for one pair.
    pub fn build_request(&self, request: &EvaluationRequest) -> OracleRequest {
        OracleRequest {
            model: self.settings.model.clone(),
            system_prompt: None,
            user_prompt: rubric::render(&request.prompt, &request.response),
            schema_name: rubric::SCHEMA_NAME.to_string(),
            schema: rubric::evaluation_schema(),
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        }
    }
}

#[async_trait]
impl Scorer for RelevanceScorer {
    #[instrument(skip_all, fields(oracle = self.oracle.name(), model = %self.settings.model))]
    async fn score(&self, request: &EvaluationRequest) -> Result<EvaluationResult, ScoringError> {
        let oracle_request = self.build_request(request);
        let reply = self.oracle.complete(&oracle_request).await?;
        debug!(
            latency_ms = reply.latency_ms,
            total_tokens = reply.token_usage.total_tokens,
            "oracle replied"
        );
        decode_judgment(&reply.content).into_result()
    }
}
