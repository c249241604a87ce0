//! One-call runner: parse → validate → load → execute, optionally writing an execution log.
//!
//! - [run_source]: run Glyph source text.
//! - [run_program]: run an already parsed [Program].

use std::path::Path;

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::engine::Engine;
use crate::error::FlowError;
use crate::execution_log_io::{build_execution_log, write_execution_log};
use crate::graph_builder::parse;
use crate::types::{ExecutionResult, Program};
use crate::validator::{ValidationReport, validate};

/// Options for [run_source] and [run_program].
#[derive(Debug, Clone)]
pub struct RunOptions<'a> {
  /// Refuse to execute a program with validation errors ([FlowError::Invalid]).
  pub require_valid: bool,
  /// If set, the execution log is written here after the run.
  pub execution_log_path: Option<&'a Path>,
  /// Name recorded in the execution log (defaults to `<source>`).
  pub source_name: Option<String>,
}

impl Default for RunOptions<'_> {
  fn default() -> Self {
    Self {
      require_valid: true,
      execution_log_path: None,
      source_name: None,
    }
  }
}

/// Everything one run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
  pub program: Program,
  pub validation: ValidationReport,
  pub result: ExecutionResult,
}

/// Parses `source` and runs it with [run_program].
#[instrument(level = "trace", skip(source, options))]
pub async fn run_source(source: &str, options: RunOptions<'_>) -> Result<RunReport, FlowError> {
  let program = parse(source)?;
  run_program(program, options).await
}

/// Validates, loads and executes `program`.
#[instrument(level = "trace", skip(program, options), fields(node_count = program.nodes.len()))]
pub async fn run_program(
  program: Program,
  options: RunOptions<'_>,
) -> Result<RunReport, FlowError> {
  let validation = validate(&program);
  if !validation.valid {
    if options.require_valid {
      return Err(FlowError::Invalid(validation));
    }
    warn!(
      errors = validation.errors.len(),
      "executing a program that failed validation"
    );
  }

  let mut engine = if options.execution_log_path.is_some() {
    Engine::new().with_step_log()
  } else {
    Engine::new()
  };
  let started_at = chrono::Utc::now().to_rfc3339();
  engine.load_program(program.clone())?;
  let result = engine.execute().await?;

  if let Some(path) = options.execution_log_path {
    let name = options
      .source_name
      .clone()
      .unwrap_or_else(|| "<source>".to_string());
    let steps = engine.take_step_log().unwrap_or_default();
    let log = build_execution_log(name, started_at, engine.state(), &result, steps);
    write_execution_log(path, &log)?;
    info!(path = %path.display(), "wrote execution log");
  }

  Ok(RunReport {
    program,
    validation,
    result,
  })
}
