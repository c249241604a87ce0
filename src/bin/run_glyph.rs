//! CLI: run Glyph dataflow programs.
//!
//! Parses each file, validates it and executes it, printing the program's output lines.
//! Several files are run as one batch through the Parse → Validate → Execute pipeline.
//!
//! Usage: `run_glyph [OPTIONS] <FILES>...`
//! Example: run_glyph tests/integration/multiply.glyph
//!
//! Set RUST_LOG=glyph_flow=trace for TRACE-level span enter/exit and events.

use clap::Parser;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use glyph_flow::{PipelineOptions, RunOptions, parse, run_batch, run_source, validate};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

/// Run Glyph dataflow programs.
#[derive(Parser, Debug)]
#[command(name = "run_glyph")]
#[command(
  after_help = r#"Environment variables (override flags when set):
  GLYPH_EXECUTION_LOG   Path of the JSON execution log (same as --execution-log).

Examples:
  run_glyph tests/integration/multiply.glyph
  run_glyph --check tests/integration/unknown_function.glyph
  run_glyph --execution-log /tmp/run.json tests/integration/divide_by_zero.glyph"#
)]
struct Args {
  /// Print the parsed program as JSON instead of running it
  #[arg(long, conflicts_with = "check")]
  parse: bool,

  /// Print the validation report instead of running
  #[arg(long)]
  check: bool,

  /// Execute even when validation reports errors
  #[arg(long)]
  allow_invalid: bool,

  /// Write a JSON execution log here (single file only). Overridden by GLYPH_EXECUTION_LOG.
  #[arg(long, value_name = "PATH")]
  execution_log: Option<PathBuf>,

  /// Glyph source files
  #[arg(value_name = "FILES", required = true)]
  files: Vec<PathBuf>,
}

fn read_source(path: &Path) -> String {
  match fs::read_to_string(path) {
    Ok(s) => s,
    Err(e) => {
      eprintln!("Error reading {}: {}", path.display(), e);
      process::exit(1);
    }
  }
}

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
    .with_writer(std::io::stderr)
    .init();

  info!("run_glyph starting");
  let args = Args::parse();

  // Env vars override flags.
  let execution_log = env::var("GLYPH_EXECUTION_LOG")
    .ok()
    .map(PathBuf::from)
    .or_else(|| args.execution_log.clone());
  info!(execution_log = ?execution_log, files = args.files.len(), "options (env or flags)");

  if args.parse || args.check {
    let mut failed = false;
    for path in &args.files {
      let program = match parse(&read_source(path)) {
        Ok(p) => p,
        Err(e) => {
          eprintln!("{}: {}", path.display(), e);
          failed = true;
          continue;
        }
      };
      if args.parse {
        match serde_json::to_string_pretty(&program) {
          Ok(json) => println!("{}", json),
          Err(e) => {
            eprintln!("{}: {}", path.display(), e);
            failed = true;
          }
        }
        continue;
      }
      let report = validate(&program);
      println!(
        "{}: {}",
        path.display(),
        if report.valid { "valid" } else { "invalid" }
      );
      for v in &report.errors {
        println!("  error: {}", v);
      }
      for v in &report.warnings {
        println!("  warning: {}", v);
      }
      failed |= !report.valid;
    }
    if failed {
      process::exit(1);
    }
    return;
  }

  if args.files.len() > 1 {
    if execution_log.is_some() {
      eprintln!("Execution log is only written for a single file; ignoring it.");
    }
    let units = args
      .files
      .iter()
      .map(|p| (p.display().to_string(), read_source(p)))
      .collect();
    let report = run_batch(
      units,
      PipelineOptions {
        require_valid: !args.allow_invalid,
      },
    )
    .await;
    for payload in &report.completed {
      println!("== {}", payload.name);
      if let Some(result) = &payload.result {
        for line in &result.output {
          println!("{}", line);
        }
        if let Some(record) = result.halting_record() {
          if let Some(e) = &record.error {
            eprintln!("{}: halted at {}: {}", payload.name, record.id, e);
          }
        }
      }
    }
    for failure in &report.failures {
      eprintln!("{} ({}): {}", failure.name, failure.stage, failure.message);
    }
    info!(
      completed = report.completed.len(),
      failed = report.failures.len(),
      "batch completed"
    );
    if !report.all_succeeded() {
      process::exit(1);
    }
    return;
  }

  let path = &args.files[0];
  let source = read_source(path);
  let options = RunOptions {
    require_valid: !args.allow_invalid,
    execution_log_path: execution_log.as_deref(),
    source_name: Some(path.display().to_string()),
  };
  let report = match run_source(&source, options).await {
    Ok(r) => r,
    Err(e) => {
      eprintln!("Error running {}: {}", path.display(), e);
      process::exit(1);
    }
  };

  for v in &report.validation.warnings {
    eprintln!("warning: {}", v);
  }
  for line in &report.result.output {
    println!("{}", line);
  }
  let stats = &report.result.statistics;
  info!(
    success = report.result.success,
    executed = stats.executed_nodes,
    total = stats.total_nodes,
    "program completed"
  );
  if let Some(record) = report.result.halting_record() {
    if let Some(e) = &record.error {
      eprintln!("Execution halted at {}: {}", record.id, e);
    }
    process::exit(1);
  }
}
