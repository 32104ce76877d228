//! The `relevance-judge run` command.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use relevance_core::report::{BatchReport, RunMetadata};
use relevance_core::runner::{BatchOutcome, BatchRunner, ProgressReporter};
use relevance_core::scorer::{RelevanceScorer, ScorerSettings};
use relevance_core::statistics::ScoreDistribution;
use relevance_core::throttle::{FixedInterval, NoDelay, RateLimiter};
use relevance_core::{EvaluationRecord, ScoringError};
use relevance_providers::config::load_config_from;
use relevance_providers::create_provider;
use relevance_table::{partial_path, read_requests, write_records};

use crate::summary::distribution_table;

/// Console progress reporter: one line per row.
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_row_start(&self, _: usize, _: usize) {}

    fn on_row_scored(&self, index: usize, total: usize, record: &EvaluationRecord) {
        println!(
            "  [{}/{}] {}: {}",
            index + 1,
            total,
            record.score,
            record.reasoning
        );
    }

    fn on_row_failed(&self, index: usize, total: usize, error: &ScoringError) {
        eprintln!("  [{}/{}] ERROR: {error}", index + 1, total);
    }

    fn on_batch_complete(&self, total: usize, scored: usize, elapsed: Duration) {
        eprintln!(
            "\nComplete: {scored}/{total} scored ({:.1}s)",
            elapsed.as_secs_f64()
        );
    }
}

pub async fn execute(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    provider: Option<String>,
    model: Option<String>,
    delay_secs: Option<u64>,
    config_path: Option<PathBuf>,
    report_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let input = input.unwrap_or_else(|| config.input.clone());
    let output = output.unwrap_or_else(|| config.output.clone());
    let provider_name = provider.unwrap_or_else(|| config.default_provider.clone());
    let model = model.unwrap_or_else(|| config.default_model.clone());
    let delay = Duration::from_secs(delay_secs.unwrap_or(config.delay_secs));

    anyhow::ensure!(
        !same_file(&input, &output),
        "output path must differ from input path ({})",
        input.display()
    );

    let rows = read_requests(&input)
        .with_context(|| format!("failed to load input table {}", input.display()))?;

    let Some(provider_config) = config.providers.get(&provider_name) else {
        anyhow::bail!(
            "provider '{}' not found in config. Available: {:?}. Set OPENAI_API_KEY or run `relevance-judge init`.",
            provider_name,
            config.providers.keys().collect::<Vec<_>>()
        );
    };
    let oracle = create_provider(&provider_name, provider_config, config.timeout_secs)?;

    let scorer = RelevanceScorer::new(
        Arc::from(oracle),
        ScorerSettings {
            model: model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        },
    );
    let limiter: Arc<dyn RateLimiter> = if delay.is_zero() {
        Arc::new(NoDelay)
    } else {
        Arc::new(FixedInterval::new(delay))
    };
    let runner = BatchRunner::new(Arc::new(scorer), limiter);

    eprintln!(
        "relevance-judge v{}: scoring {} rows with {}/{} ({}s between calls)",
        env!("CARGO_PKG_VERSION"),
        rows.len(),
        provider_name,
        model,
        delay.as_secs()
    );
    eprintln!();

    let outcome = runner.run(&rows, &ConsoleReporter).await;

    let metadata = |written_to: &Path| RunMetadata {
        provider: provider_name.clone(),
        model: model.clone(),
        input: input.display().to_string(),
        output: written_to.display().to_string(),
    };

    if let Some(failure) = &outcome.failure {
        let summary = format!(
            "row {} of {} failed: {}",
            failure.row + 1,
            outcome.total,
            failure.error
        );
        let partial = partial_path(&output);
        write_records(&partial, &outcome.records).with_context(|| {
            format!(
                "{summary}; the partial table {} could not be written either",
                partial.display()
            )
        })?;
        save_report(report_path.as_deref(), &outcome, metadata(&partial))
            .with_context(|| summary.clone())?;

        let hint = if failure.error.is_permanent() {
            " Fix the configuration before re-running."
        } else {
            ""
        };
        anyhow::bail!(
            "{summary}. {} completed row(s) saved to {}; {} was not written.{hint}",
            outcome.records.len(),
            partial.display(),
            output.display(),
        );
    }

    write_records(&output, &outcome.records)
        .with_context(|| format!("failed to write output table {}", output.display()))?;

    let stale = partial_path(&output);
    if stale.exists() {
        std::fs::remove_file(&stale)
            .with_context(|| format!("failed to remove stale partial table {}", stale.display()))?;
        tracing::info!(path = %stale.display(), "removed partial table from an earlier run");
    }

    save_report(report_path.as_deref(), &outcome, metadata(&output))?;

    eprintln!(
        "\n{}",
        distribution_table(&ScoreDistribution::from_records(&outcome.records))
    );
    eprintln!("Results saved to: {}", output.display());
    println!("All done");

    Ok(())
}

fn save_report(path: Option<&Path>, outcome: &BatchOutcome, metadata: RunMetadata) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    BatchReport::from_outcome(outcome, metadata).save_json(path)?;
    eprintln!("Run report: {}", path.display());
    Ok(())
}

/// Whether two paths name the same file, resolving `.`/`..` and symlinks.
/// The output may not exist yet, so its parent is resolved instead.
fn same_file(input: &Path, output: &Path) -> bool {
    match (resolve(input), resolve(output)) {
        (Some(a), Some(b)) => a == b,
        _ => input == output,
    }
}

fn resolve(path: &Path) -> Option<PathBuf> {
    if let Ok(full) = path.canonicalize() {
        return Some(full);
    }
    let name = path.file_name()?;
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    parent.canonicalize().ok().map(|p| p.join(name))
}
