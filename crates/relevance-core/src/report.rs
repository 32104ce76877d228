//! Run report with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::runner::BatchOutcome;
use crate::statistics::ScoreDistribution;

/// Where a run's rows came from and which judge graded them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    pub provider: String,
    pub model: String,
    /// Input table path.
    pub input: String,
    /// Path the records were written to (the partial file on failure).
    pub output: String,
}

/// Why and where a run stopped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureSummary {
    /// Zero-based row index.
    pub row: usize,
    pub message: String,
    pub permanent: bool,
}

/// Summary of one evaluation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// Unique run identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub metadata: RunMetadata,
    pub rows_total: usize,
    pub rows_scored: usize,
    pub distribution: ScoreDistribution,
    /// Present when the run stopped early.
    #[serde(default)]
    pub failure: Option<FailureSummary>,
    /// Total wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

impl BatchReport {
    /// Summarize a finished run.
    pub fn from_outcome(outcome: &BatchOutcome, metadata: RunMetadata) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            metadata,
            rows_total: outcome.total,
            rows_scored: outcome.records.len(),
            distribution: ScoreDistribution::from_records(&outcome.records),
            failure: outcome.failure.as_ref().map(|f| FailureSummary {
                row: f.row,
                message: f.error.to_string(),
                permanent: f.error.is_permanent(),
            }),
            duration_ms: outcome.elapsed.as_millis() as u64,
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: BatchReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}
