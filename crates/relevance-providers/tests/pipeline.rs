//! End-to-end scoring pipeline tests against mock and HTTP-mocked oracles.
//!
//! These wire a real `RelevanceScorer` and `BatchRunner` to an oracle and
//! check the batch-level guarantees: one record per row, in order, with valid
//! labels, and no silent truncation when the oracle fails mid-run.

use std::sync::Arc;
use std::time::Duration;

use relevance_core::runner::{BatchRunner, NoopReporter};
use relevance_core::scorer::{RelevanceScorer, ScorerSettings};
use relevance_core::throttle::{FixedInterval, NoDelay};
use relevance_core::{EvaluationRequest, Score, ScoringError};
use relevance_providers::openai::OpenAiProvider;
use relevance_providers::MockOracle;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn judged_by_topic() -> MockOracle {
    MockOracle::new(vec![
        (
            "stock market".to_string(),
            r#"{"score": "poor", "reasoning": "Response is about finance, not autumn poetry."}"#
                .to_string(),
        ),
        (
            "Paris".to_string(),
            r#"{"score": "excellent", "reasoning": "Correct, direct, and complete."}"#.to_string(),
        ),
    ])
}

fn scorer_for(oracle: Arc<MockOracle>) -> Arc<RelevanceScorer> {
    Arc::new(RelevanceScorer::new(oracle, ScorerSettings::default()))
}

#[tokio::test]
async fn unrelated_and_precise_pairs() {
    let oracle = Arc::new(judged_by_topic());
    let runner = BatchRunner::new(scorer_for(oracle.clone()), Arc::new(NoDelay));

    let rows = vec![
        EvaluationRequest::new(
            "Write a haiku about autumn",
            "The stock market closed up 2% today",
        ),
        EvaluationRequest::new(
            "What is the capital of France?",
            "The capital of France is Paris.",
        ),
    ];

    let outcome = runner.run(&rows, &NoopReporter).await;
    assert!(outcome.is_complete());
    assert_eq!(outcome.records[0].score, Score::Poor);
    assert!(matches!(
        outcome.records[1].score,
        Score::Great | Score::Excellent
    ));
    assert_eq!(oracle.call_count(), 2);
}

#[tokio::test]
async fn every_record_carries_a_label_from_the_scale() {
    let oracle = Arc::new(judged_by_topic());
    let runner = BatchRunner::new(scorer_for(oracle), Arc::new(NoDelay));

    let rows: Vec<EvaluationRequest> = (0..10)
        .map(|i| EvaluationRequest::new(format!("prompt #{i}"), format!("response #{i}")))
        .collect();

    let outcome = runner.run(&rows, &NoopReporter).await;
    assert_eq!(outcome.records.len(), rows.len());
    for (record, row) in outcome.records.iter().zip(&rows) {
        assert_eq!(record.prompt, row.prompt);
        assert_eq!(record.response, row.response);
        assert!(Score::ALL.contains(&record.score));
    }
}

#[tokio::test]
async fn oracle_failure_on_second_row_is_not_silent() {
    let oracle = Arc::new(MockOracle::with_script(vec![
        Ok(r#"{"score": "good", "reasoning": "Fine."}"#.into()),
        Err(ScoringError::Unreachable("connection reset".into())),
        Ok(r#"{"score": "good", "reasoning": "Fine."}"#.into()),
    ]));
    let runner = BatchRunner::new(scorer_for(oracle.clone()), Arc::new(NoDelay));

    let rows: Vec<EvaluationRequest> = (0..3)
        .map(|i| EvaluationRequest::new(format!("p{i}"), format!("r{i}")))
        .collect();
    let outcome = runner.run(&rows, &NoopReporter).await;

    assert!(!outcome.is_complete());
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.failure.as_ref().map(|f| f.row), Some(1));
    assert_eq!(oracle.call_count(), 2);
}

#[tokio::test]
async fn unknown_label_from_oracle_stops_run() {
    let oracle = Arc::new(MockOracle::with_fixed_response(
        r#"{"score": "outstanding", "reasoning": "Loved it."}"#,
    ));
    let runner = BatchRunner::new(scorer_for(oracle), Arc::new(NoDelay));

    let outcome = runner
        .run(&[EvaluationRequest::new("p", "r")], &NoopReporter)
        .await;
    let failure = outcome.failure.expect("malformed label must fail");
    match failure.error {
        ScoringError::Malformed { raw, .. } => assert!(raw.contains("outstanding")),
        other => panic!("expected Malformed, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn throttle_spaces_three_calls_by_two_intervals() {
    let oracle = Arc::new(judged_by_topic());
    let runner = BatchRunner::new(
        scorer_for(oracle),
        Arc::new(FixedInterval::new(Duration::from_secs(20))),
    );
    let rows: Vec<EvaluationRequest> = (0..3)
        .map(|i| EvaluationRequest::new(format!("p{i}"), format!("r{i}")))
        .collect();

    let start = tokio::time::Instant::now();
    let outcome = runner.run(&rows, &NoopReporter).await;

    assert!(outcome.is_complete());
    assert!(start.elapsed() >= Duration::from_secs(40));
}

#[tokio::test]
async fn openai_round_trip_through_scorer() {
    let server = MockServer::start().await;

    let reply = |content: &str| {
        serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": content}}],
            "model": "gpt-4o-mini",
            "usage": {"prompt_tokens": 300, "completion_tokens": 20, "total_tokens": 320}
        })
    };

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("stock market"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply(
            r#"{"score":"poor","reasoning":"Unrelated to the prompt."}"#,
        )))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("Paris"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply(
            r#"{"score":"excellent","reasoning":"Exact answer."}"#,
        )))
        .mount(&server)
        .await;

    let oracle = Arc::new(OpenAiProvider::new("test-key", Some(server.uri()), None, 5).unwrap());
    let scorer = Arc::new(RelevanceScorer::new(oracle, ScorerSettings::default()));
    let runner = BatchRunner::new(scorer, Arc::new(NoDelay));

    let rows = vec![
        EvaluationRequest::new(
            "Write a haiku about autumn",
            "The stock market closed up 2% today",
        ),
        EvaluationRequest::new("What is the capital of France?", "Paris"),
    ];
    let outcome = runner.run(&rows, &NoopReporter).await;

    assert!(outcome.is_complete());
    let scores: Vec<Score> = outcome.records.iter().map(|r| r.score).collect();
    assert_eq!(scores, vec![Score::Poor, Score::Excellent]);
}
