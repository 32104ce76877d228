//! relevance-core: Core data model, rubric, and batch evaluation loop.
//!
//! This crate defines the relevance scale, the structured judgment contract
//! every oracle must satisfy, and the sequential runner that grades a table
//! of prompt/response pairs.

pub mod decode;
pub mod error;
pub mod model;
pub mod report;
pub mod rubric;
pub mod runner;
pub mod scorer;
pub mod statistics;
pub mod throttle;
pub mod traits;

pub use error::ScoringError;
pub use model::{EvaluationRecord, EvaluationRequest, EvaluationResult, Score};
