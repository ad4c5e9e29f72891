//! Cogbench - Cognitive Model Benchmarking CLI
//!
//! The `cogbench` command evaluates cognitive models against recorded
//! human-response datasets.
//!
//! ## Commands
//!
//! - `run`: Execute a benchmark file and write the result table
//! - `models`: List the registered model plugin kinds

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::{info, Level};

use cogbench_core::{
    init_tracing, write_result_csv, write_run_artifact, Benchmark, ComparatorRegistry,
    EncoderRegistry, Evaluator, ModelInfo, ModelRegistry, RunArtifact,
};

#[derive(Parser)]
#[command(name = "cogbench")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Cognitive model benchmarking harness", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a benchmark and write the result table
    Run {
        /// Benchmark specification file (JSON)
        benchmark: PathBuf,

        /// Store the joined result table as CSV
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Store the run artifact as JSON
        #[arg(short, long)]
        artifact: Option<PathBuf>,

        /// Evaluate a single model plugin instead of the benchmark's list
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Entry name when the model path contains multiple manifests
        #[arg(short, long)]
        classname: Option<String>,

        /// Directory the %cogbench% placeholder resolves to
        #[arg(long, env = "COGBENCH_BUNDLE_DIR")]
        bundle_dir: Option<PathBuf>,
    },

    /// List the registered model plugin kinds
    Models,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    init_tracing(cli.json, level);

    match cli.command {
        Commands::Run {
            benchmark,
            save,
            artifact,
            model,
            classname,
            bundle_dir,
        } => run_benchmark(benchmark, save, artifact, model, classname, bundle_dir),
        Commands::Models => list_models(),
    }
}

fn registries() -> (ModelRegistry, ComparatorRegistry, EncoderRegistry) {
    let mut models = ModelRegistry::new();
    let mut encoders = EncoderRegistry::with_builtins();
    cogbench_models::register_builtins(&mut models, &mut encoders);
    (models, ComparatorRegistry::with_builtins(), encoders)
}

fn run_benchmark(
    benchmark_path: PathBuf,
    save: Option<PathBuf>,
    artifact: Option<PathBuf>,
    model: Option<PathBuf>,
    classname: Option<String>,
    bundle_dir: Option<PathBuf>,
) -> Result<()> {
    let (models, comparators, encoders) = registries();

    let mut benchmark = Benchmark::load(&benchmark_path, bundle_dir, &comparators, &encoders)
        .with_context(|| format!("load benchmark {:?}", benchmark_path))?;

    // Single-model override: evaluate one plugin against the benchmark's
    // data instead of the configured model list.
    if let Some(model_path) = model {
        let path = if model_path.is_relative() {
            std::env::current_dir()?.join(model_path)
        } else {
            model_path
        };
        benchmark.models = vec![ModelInfo {
            path,
            classname,
            override_name: None,
            args: serde_json::Map::new(),
        }];
    }

    info!(
        benchmark = %benchmark.name,
        eval_type = benchmark.eval_type.as_str(),
        models = benchmark.models.len(),
        subjects = benchmark.data_test.subjects().len(),
        "starting evaluation"
    );

    let started_at = Utc::now();
    let run = Evaluator::new(&benchmark, &models).evaluate()?;
    let finished_at = Utc::now();

    if let Some(path) = &save {
        write_result_csv(path, &run.table)?;
        info!(path = %path.display(), "wrote result table");
    }

    let run_artifact = RunArtifact::from_run(&benchmark, &run, started_at, finished_at);
    if let Some(path) = &artifact {
        write_run_artifact(path, &run_artifact)?;
        info!(path = %path.display(), "wrote run artifact");
    }

    println!(
        "Benchmark '{}' ({}) - {} model(s), {} subject(s)",
        run_artifact.benchmark,
        run_artifact.eval_type,
        run_artifact.summaries.len(),
        benchmark.data_test.subjects().len(),
    );
    for summary in &run_artifact.summaries {
        let mut scores: Vec<String> = Vec::new();
        for (column, mean) in &summary.mean_scores {
            scores.push(format!("{}: {:.4}", column, mean));
        }
        println!(
            "  {:<24} {:>6} rows  {}",
            summary.model,
            summary.rows,
            scores.join("  ")
        );
    }

    Ok(())
}

fn list_models() -> Result<()> {
    let (models, _, _) = registries();
    println!("Registered model kinds:");
    for kind in models.kinds() {
        println!("  {}", kind);
    }
    Ok(())
}
