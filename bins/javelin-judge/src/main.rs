mod catalog;
mod config;
mod engine;
mod evaluator;
mod executor;
mod progress;
mod workspace;


use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use catalog::ProblemCatalog;
use config::JudgeConfig;
use executor::Judge;

#[derive(Parser)]
#[command(name = "javelin-judge")]
#[command(about = "Compile a Java submission and judge it against a problem's test cases", long_about = None)]
struct Cli {
    /// Problem identifier from the catalog
    #[arg(short, long)]
    problem: String,

    /// Path to the submitted source file
    #[arg(short, long)]
    source: PathBuf,

    /// Path to the judge configuration file
    #[arg(short, long, default_value = "config/judge.json")]
    config: PathBuf,

    /// Path to the problem catalog
    #[arg(long, default_value = "config/problems.json")]
    problems: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = JudgeConfig::load(&cli.config)?;
    let catalog = ProblemCatalog::load(&cli.problems)?;
    info!(problems = catalog.len(), "Loaded problem catalog");

    let source_code = tokio::fs::read_to_string(&cli.source)
        .await
        .with_context(|| format!("Failed to read source file {}", cli.source.display()))?;

    let judge = Judge::new(config, catalog)?;
    let verdict = judge.judge(&cli.problem, &source_code).await?;

    println!("{}", serde_json::to_string_pretty(&verdict)?);

    if !verdict.overall_passed {
        std::process::exit(1);
    }

    Ok(())
}
