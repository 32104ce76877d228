//! relevance-judge CLI: grade prompt/response tables with an LLM judge.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod summary;

#[derive(Parser)]
#[command(
    name = "relevance-judge",
    version,
    about = "Grade the relevance of LLM responses with an LLM judge"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score every row of an input table and write the output table
    Run {
        /// Input CSV with `prompt` and `response` columns
        #[arg(long)]
        input: Option<PathBuf>,

        /// Output CSV path
        #[arg(long)]
        output: Option<PathBuf>,

        /// Provider name from the config (default: openai)
        #[arg(long)]
        provider: Option<String>,

        /// Judge model (default: gpt-4o-mini)
        #[arg(long)]
        model: Option<String>,

        /// Seconds to pause between oracle calls (default: 20)
        #[arg(long)]
        delay_secs: Option<u64>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Also write a JSON run report to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Check an input table without calling the oracle
    Validate {
        /// Input CSV with `prompt` and `response` columns
        #[arg(long)]
        input: PathBuf,
    },

    /// Print the score distribution of an output table
    Summarize {
        /// Output CSV written by `run`
        #[arg(long)]
        input: PathBuf,
    },

    /// Create a starter config and sample input table
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("relevance_judge=info".parse().unwrap())
                .add_directive("relevance_core=info".parse().unwrap())
                .add_directive("relevance_table=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            input,
            output,
            provider,
            model,
            delay_secs,
            config,
            report,
        } => {
            commands::run::execute(input, output, provider, model, delay_secs, config, report)
                .await
        }
        Commands::Validate { input } => commands::validate::execute(input),
        Commands::Summarize { input } => commands::summarize::execute(input),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
