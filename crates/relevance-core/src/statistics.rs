//! Score distribution over a set of records.

use serde::{Deserialize, Serialize};

use crate::model::{EvaluationRecord, Score};

/// Count of records per relevance label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreDistribution {
    pub poor: usize,
    pub ok: usize,
    pub good: usize,
    pub great: usize,
    pub excellent: usize,
}

impl ScoreDistribution {
    /// Tally an iterator of scores.
    pub fn from_scores(scores: impl IntoIterator<Item = Score>) -> Self {
        let mut dist = Self::default();
        for score in scores {
            *dist.slot_mut(score) += 1;
        }
        dist
    }

    /// Tally the scores of a slice of records.
    pub fn from_records(records: &[EvaluationRecord]) -> Self {
        Self::from_scores(records.iter().map(|r| r.score))
    }

    /// Number of records with the given label.
    pub fn count(&self, score: Score) -> usize {
        match score {
            Score::Poor => self.poor,
            Score::Ok => self.ok,
            Score::Good => self.good,
            Score::Great => self.great,
            Score::Excellent => self.excellent,
        }
    }

    fn slot_mut(&mut self, score: Score) -> &mut usize {
        match score {
            Score::Poor => &mut self.poor,
            Score::Ok => &mut self.ok,
            Score::Good => &mut self.good,
            Score::Great => &mut self.great,
            Score::Excellent => &mut self.excellent,
        }
    }

    pub fn total(&self) -> usize {
        Score::ALL.iter().map(|s| self.count(*s)).sum()
    }

    /// Share of records with the given label, 0.0 when empty.
    pub fn fraction(&self, score: Score) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.count(score) as f64 / total as f64
    }

    /// Mean position on the 1..=5 scale, `None` when empty.
    pub fn mean_ordinal(&self) -> Option<f64> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let sum: usize = Score::ALL
            .iter()
            .map(|s| self.count(*s) * s.ordinal() as usize)
            .sum();
        Some(sum as f64 / total as f64)
    }

    /// Share of records judged relevant (above `poor`), 0.0 when empty.
    pub fn relevant_rate(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        (total - self.poor) as f64 / total as f64
    }
}
