//! Core trait definitions for oracles and scorers.
//!
//! [`Oracle`] is implemented by the `relevance-providers` crate for each LLM
//! backend. [`Scorer`] is what the batch runner drives; the production
//! implementation is [`crate::scorer::RelevanceScorer`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ScoringError;
use crate::model::{EvaluationRequest, EvaluationResult};

// ---------------------------------------------------------------------------
// Oracle trait
// ---------------------------------------------------------------------------

/// An LLM backend able to return output constrained to a JSON schema.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Human-readable provider name (e.g. "openai").
    fn name(&self) -> &str;

    /// Send one request and return the raw structured payload.
    async fn complete(&self, request: &OracleRequest) -> Result<OracleReply, ScoringError>;
}

/// A single structured-output request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleRequest {
    /// Model identifier (e.g. "gpt-4o-mini").
    pub model: String,
    /// Optional system prompt.
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// The user message, with the rubric already rendered.
    pub user_prompt: String,
    /// Name the schema is registered under.
    pub schema_name: String,
    /// JSON schema the reply must satisfy.
    pub schema: serde_json::Value,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature; `None` leaves the backend default.
    #[serde(default)]
    pub temperature: Option<f64>,
}

/// Raw reply from an oracle, before decoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleReply {
    /// The structured payload as text (normally a JSON object).
    pub content: String,
    /// Model that actually answered.
    pub model: String,
    /// Token usage.
    pub token_usage: TokenUsage,
    /// Latency in milliseconds.
    pub latency_ms: u64,
}

/// Token accounting as reported by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

// ---------------------------------------------------------------------------
// Scorer trait
// ---------------------------------------------------------------------------

/// Produces a relevance judgment for one prompt/response pair.
#[async_trait]
pub trait Scorer: Send + Sync {
    async fn score(&self, request: &EvaluationRequest) -> Result<EvaluationResult, ScoringError>;
}
