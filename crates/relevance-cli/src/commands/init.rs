//! The `relevance-judge init` command.

use std::path::Path;

use anyhow::Result;

use relevance_providers::config::LOCAL_CONFIG_FILE;

const SAMPLE_INPUT: &str = "prompt_response_dataset.csv";

pub fn execute() -> Result<()> {
    write_if_missing(Path::new(LOCAL_CONFIG_FILE), SAMPLE_CONFIG)?;
    write_if_missing(Path::new(SAMPLE_INPUT), SAMPLE_DATASET)?;

    println!("\nNext steps:");
    println!("  1. Export OPENAI_API_KEY (or edit {LOCAL_CONFIG_FILE})");
    println!("  2. Run: relevance-judge validate --input {SAMPLE_INPUT}");
    println!("  3. Run: relevance-judge run");

    Ok(())
}

fn write_if_missing(path: &Path, contents: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, contents)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# relevance-judge configuration

default_provider = "openai"
default_model = "gpt-4o-mini"
delay_secs = 20
timeout_secs = 120
max_tokens = 256
input = "prompt_response_dataset.csv"
output = "evaluated_responses.csv"

[providers.openai]
type = "openai"
api_key = "${OPENAI_API_KEY}"

[providers.anthropic]
type = "anthropic"
api_key = "${ANTHROPIC_API_KEY}"

[providers.ollama]
type = "ollama"
base_url = "http://localhost:11434"
"#;

const SAMPLE_DATASET: &str = r#"prompt,response
Write a haiku about autumn,The stock market closed up 2% today
What is the capital of France?,The capital of France is Paris.
"Write a two-sentence horror story.","I heard my mother calling me from the kitchen. As I headed down the stairs, she pulled me into the closet and whispered, ""I heard it too."""
"#;
