//! HTTP plumbing shared by the network oracles.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use relevance_core::ScoringError;

/// Retry-after hint used when a 429 carries no usable header.
const DEFAULT_RETRY_AFTER_SECS: u64 = 5;

pub(crate) fn build_client(timeout_secs: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .context("failed to build HTTP client")
}

/// Map a transport failure to a scoring error.
pub(crate) fn transport_error(e: reqwest::Error, timeout_secs: u64) -> ScoringError {
    if e.is_timeout() {
        ScoringError::Timeout(timeout_secs)
    } else {
        ScoringError::Unreachable(e.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorEnvelope {
    Nested { error: NestedError },
    Flat { error: String },
}

#[derive(Deserialize)]
struct NestedError {
    message: String,
}

fn error_message(body: String) -> String {
    match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(ErrorEnvelope::Nested { error }) => error.message,
        Ok(ErrorEnvelope::Flat { error }) => error,
        Err(_) => body,
    }
}

/// Turn non-success statuses into scoring errors, passing 2xx through.
pub(crate) async fn check_status(
    response: reqwest::Response,
    model: &str,
) -> Result<reqwest::Response, ScoringError> {
    let status = response.status().as_u16();
    if status < 400 {
        return Ok(response);
    }

    if status == 429 {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
            * 1000;
        return Err(ScoringError::RateLimited {
            retry_after_ms: retry_after,
        });
    }

    let body = response.text().await.unwrap_or_default();
    match status {
        401 | 403 => Err(ScoringError::AuthenticationFailed(error_message(body))),
        404 => Err(ScoringError::ModelNotFound(model.to_string())),
        _ => Err(ScoringError::Api {
            status,
            message: error_message(body),
        }),
    }
}

/// Read and deserialize a success body, keeping the raw text on failure.
pub(crate) async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
    timeout_secs: u64,
) -> Result<T, ScoringError> {
    let body = response
        .text()
        .await
        .map_err(|e| transport_error(e, timeout_secs))?;
    match serde_json::from_str::<T>(&body) {
        Ok(value) => Ok(value),
        Err(e) => Err(ScoringError::Malformed {
            raw: body,
            reason: format!("unexpected response envelope: {e}"),
        }),
    }
}
