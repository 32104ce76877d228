//! Scoring error types.
//!
//! Every failure to obtain a judgment for a row, whether the oracle was
//! unreachable or answered with something that does not fit the relevance
//! schema, is a [`ScoringError`].

use thiserror::Error;

/// Errors that can occur while scoring one prompt/response pair.
#[derive(Debug, Clone, Error)]
pub enum ScoringError {
    /// The oracle could not be reached.
    #[error("oracle unreachable: {0}")]
    Unreachable(String),

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (invalid API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The requested model was not found.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The reply could not be decoded into a relevance judgment.
    #[error("malformed judgment ({reason}): {raw}")]
    Malformed { raw: String, reason: String },
}

impl ScoringError {
    /// Returns `true` if re-running the batch unchanged cannot succeed.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            ScoringError::AuthenticationFailed(_) | ScoringError::ModelNotFound(_)
        )
    }

    pub(crate) fn malformed(raw: impl Into<String>, reason: impl Into<String>) -> Self {
        ScoringError::Malformed {
            raw: raw.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permanent_errors() {
        assert!(ScoringError::AuthenticationFailed("bad key".into()).is_permanent());
        assert!(ScoringError::ModelNotFound("gpt-x".into()).is_permanent());
        assert!(!ScoringError::Timeout(120).is_permanent());
        assert!(!ScoringError::RateLimited {
            retry_after_ms: 5000
        }
        .is_permanent());
    }

    #[test]
    fn display_includes_raw_payload() {
        let err = ScoringError::malformed("{\"score\":\"meh\"}", "unknown label");
        let msg = err.to_string();
        assert!(msg.contains("unknown label"));
        assert!(msg.contains("meh"));
    }
}
