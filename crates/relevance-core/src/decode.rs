//! Strict decoding of oracle replies into relevance judgments.

use serde::Deserialize;

use crate::error::ScoringError;
use crate::model::{EvaluationResult, Score};

/// Outcome of decoding one oracle reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Judgment {
    /// The reply matched the schema.
    Valid(EvaluationResult),
    /// The reply did not match; `raw` is the untouched payload.
    Unparseable { raw: String, reason: String },
}

impl Judgment {
    /// Convert into a result, mapping an unparseable reply to
    /// [`ScoringError::Malformed`].
    pub fn into_result(self) -> Result<EvaluationResult, ScoringError> {
        match self {
            Judgment::Valid(result) => Ok(result),
            Judgment::Unparseable { raw, reason } => Err(ScoringError::malformed(raw, reason)),
        }
    }
}

#[derive(Deserialize)]
struct WireJudgment {
    score: String,
    reasoning: String,
}

/// Decode a reply payload.
///
/// Accepts a bare JSON object or one wrapped in a single markdown code fence.
/// The `score` must be exactly one of the five labels; anything else is
/// [`Judgment::Unparseable`].
pub fn decode_judgment(raw: &str) -> Judgment {
    let body = strip_code_fence(raw.trim());
    if body.is_empty() {
        return unparseable(raw, "empty reply");
    }

    let wire: WireJudgment = match serde_json::from_str(body) {
        Ok(w) => w,
        Err(e) => return unparseable(raw, format!("invalid JSON: {e}")),
    };

    match wire.score.parse::<Score>() {
        Ok(score) => Judgment::Valid(EvaluationResult {
            score,
            reasoning: wire.reasoning,
        }),
        Err(e) => unparseable(raw, format!("score {e}")),
    }
}

fn unparseable(raw: &str, reason: impl Into<String>) -> Judgment {
    Judgment::Unparseable {
        raw: raw.to_string(),
        reason: reason.into(),
    }
}

fn strip_code_fence(s: &str) -> &str {
    let Some(rest) = s.strip_prefix("```") else {
        return s;
    };
    // Drop the info string ("json", "JSON", ...) on the opening line.
    let rest = match rest.find('\n') {
        Some(i) => &rest[i + 1..],
        None => rest,
    };
    rest.trim_end()
        .strip_suffix("```")
        .unwrap_or(rest)
        .trim()
}
