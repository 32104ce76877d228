//! Sequential batch runner.
//!
//! Grades rows strictly one at a time, in input order, pausing on the rate
//! limiter between consecutive calls. The first scoring failure stops the
//! pass; records gathered up to that point are handed back alongside the
//! failure so the caller can persist them.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{error, info};

use crate::error::ScoringError;
use crate::model::{EvaluationRecord, EvaluationRequest};
use crate::throttle::RateLimiter;
use crate::traits::Scorer;

/// Progress reporting trait.
pub trait ProgressReporter: Send + Sync {
    fn on_row_start(&self, index: usize, total: usize);
    fn on_row_scored(&self, index: usize, total: usize, record: &EvaluationRecord);
    fn on_row_failed(&self, index: usize, total: usize, error: &ScoringError);
    fn on_batch_complete(&self, total: usize, scored: usize, elapsed: Duration);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_row_start(&self, _: usize, _: usize) {}
    fn on_row_scored(&self, _: usize, _: usize, _: &EvaluationRecord) {}
    fn on_row_failed(&self, _: usize, _: usize, _: &ScoringError) {}
    fn on_batch_complete(&self, _: usize, _: usize, _: Duration) {}
}

/// The row at which a run stopped, and why.
#[derive(Debug, Clone)]
pub struct RowFailure {
    /// Zero-based index into the input rows.
    pub row: usize,
    pub error: ScoringError,
}

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Records in input order. Complete only if `failure` is `None`.
    pub records: Vec<EvaluationRecord>,
    /// Set when the run stopped early.
    pub failure: Option<RowFailure>,
    /// Number of input rows.
    pub total: usize,
    /// Wall-clock duration of the pass.
    pub elapsed: Duration,
}

impl BatchOutcome {
    /// `true` when every input row produced a record.
    pub fn is_complete(&self) -> bool {
        self.failure.is_none() && self.records.len() == self.total
    }
}

/// Drives a [`Scorer`] over a table of rows.
pub struct BatchRunner {
    scorer: Arc<dyn Scorer>,
    limiter: Arc<dyn RateLimiter>,
}

impl BatchRunner {
    pub fn new(scorer: Arc<dyn Scorer>, limiter: Arc<dyn RateLimiter>) -> Self {
        Self { scorer, limiter }
    }

    /// Score every row in order.
    pub async fn run(
        &self,
        rows: &[EvaluationRequest],
        progress: &dyn ProgressReporter,
    ) -> BatchOutcome {
        let start = Instant::now();
        let total = rows.len();
        let mut records = Vec::with_capacity(total);
        let mut failure = None;

        info!(rows = total, "starting evaluation pass");

        for (index, row) in rows.iter().enumerate() {
            if index > 0 {
                self.limiter.wait().await;
            }

            progress.on_row_start(index, total);
            match self.scorer.score(row).await {
                Ok(result) => {
                    let record = EvaluationRecord::new(row, result);
                    progress.on_row_scored(index, total, &record);
                    records.push(record);
                }
                Err(e) => {
                    error!(row = index, permanent = e.is_permanent(), "scoring failed: {e}");
                    progress.on_row_failed(index, total, &e);
                    failure = Some(RowFailure {
                        row: index,
                        error: e,
                    });
                    break;
                }
            }
        }

        let elapsed = start.elapsed();
        progress.on_batch_complete(total, records.len(), elapsed);

        BatchOutcome {
            records,
            failure,
            total,
            elapsed,
        }
    }
}
