//! Core data model types for relevance-judge.
//!
//! An [`EvaluationRequest`] is one input row, an [`EvaluationResult`] is the
//! oracle's judgment of it, and an [`EvaluationRecord`] is the two merged into
//! one output row.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The five-label ordinal relevance scale, ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Score {
    Poor,
    Ok,
    Good,
    Great,
    Excellent,
}

impl Score {
    /// All labels from lowest to highest relevance.
    pub const ALL: [Score; 5] = [
        Score::Poor,
        Score::Ok,
        Score::Good,
        Score::Great,
        Score::Excellent,
    ];

    /// The wire label, e.g. `"great"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Score::Poor => "poor",
            Score::Ok => "ok",
            Score::Good => "good",
            Score::Great => "great",
            Score::Excellent => "excellent",
        }
    }

    /// Position on the scale, 1 (`poor`) through 5 (`excellent`).
    pub fn ordinal(&self) -> u8 {
        match self {
            Score::Poor => 1,
            Score::Ok => 2,
            Score::Good => 3,
            Score::Great => 4,
            Score::Excellent => 5,
        }
    }

    /// Whether the judgment counts as relevant at all (anything above `poor`).
    pub fn is_relevant(&self) -> bool {
        *self > Score::Poor
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the five relevance labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownScore(pub String);

impl fmt::Display for UnknownScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' is not one of poor, ok, good, great, excellent",
            self.0
        )
    }
}

impl std::error::Error for UnknownScore {}

impl FromStr for Score {
    type Err = UnknownScore;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "poor" => Ok(Score::Poor),
            "ok" => Ok(Score::Ok),
            "good" => Ok(Score::Good),
            "great" => Ok(Score::Great),
            "excellent" => Ok(Score::Excellent),
            _ => Err(UnknownScore(s.to_string())),
        }
    }
}

/// A single prompt/response pair to be graded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    /// The writing prompt given to the generator.
    pub prompt: String,
    /// The generated response being judged.
    pub response: String,
}

impl EvaluationRequest {
    pub fn new(prompt: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            response: response.into(),
        }
    }
}

/// The oracle's structured judgment of one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Relevance label.
    pub score: Score,
    /// Short justification, nominally 100 characters or less.
    pub reasoning: String,
}

/// One row of the output table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub prompt: String,
    pub response: String,
    pub score: Score,
    pub reasoning: String,
}

impl EvaluationRecord {
    /// Merge an input row with its judgment.
    pub fn new(request: &EvaluationRequest, result: EvaluationResult) -> Self {
        Self {
            prompt: request.prompt.clone(),
            response: request.response.clone(),
            score: result.score,
            reasoning: result.reasoning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_is_ordered() {
        assert!(Score::Poor < Score::Ok);
        assert!(Score::Ok < Score::Good);
        assert!(Score::Good < Score::Great);
        assert!(Score::Great < Score::Excellent);
        let ordinals: Vec<u8> = Score::ALL.iter().map(|s| s.ordinal()).collect();
        assert_eq!(ordinals, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn parse_accepts_exact_labels() {
        for score in Score::ALL {
            assert_eq!(score.as_str().parse::<Score>().unwrap(), score);
        }
        assert_eq!(" great\n".parse::<Score>().unwrap(), Score::Great);
    }

    #[test]
    fn parse_rejects_everything_else() {
        for bad in ["", "Great", "EXCELLENT", "fair", "5", "very good"] {
            let err = bad.parse::<Score>().unwrap_err();
            assert_eq!(err.0, bad);
        }
    }

    #[test]
    fn serde_uses_lowercase_labels() {
        let json = serde_json::to_string(&Score::Excellent).unwrap();
        assert_eq!(json, "\"excellent\"");
        let back: Score = serde_json::from_str("\"ok\"").unwrap();
        assert_eq!(back, Score::Ok);
        assert!(serde_json::from_str::<Score>("\"Ok\"").is_err());
    }

    #[test]
    fn only_poor_is_irrelevant() {
        assert!(!Score::Poor.is_relevant());
        assert!(Score::Ok.is_relevant());
        assert!(Score::Excellent.is_relevant());
    }

    #[test]
    fn record_keeps_request_text() {
        let request = EvaluationRequest::new("Write a haiku", "Leaves fall, quiet\n\"red\"");
        let record = EvaluationRecord::new(
            &request,
            EvaluationResult {
                score: Score::Good,
                reasoning: "On topic.".into(),
            },
        );
        assert_eq!(record.prompt, request.prompt);
        assert_eq!(record.response, request.response);
        assert_eq!(record.score, Score::Good);
    }
}
