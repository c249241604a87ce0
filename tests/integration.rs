//! Integration tests that run the run_glyph CLI and the library API on .glyph fixtures
//! in tests/integration/.

use std::path::Path;
use std::process::Command;

use glyph_flow::types::EXECUTION_LOG_VERSION;
use glyph_flow::{
  Engine, FlowError, NodeId, PipelineOptions, RunOptions, Value, ViolationKind, parse, run_batch,
  run_source, validate,
};

fn integration_dir() -> std::path::PathBuf {
  Path::new(env!("CARGO_MANIFEST_DIR"))
    .join("tests")
    .join("integration")
}

fn glyph_path(name: &str) -> std::path::PathBuf {
  integration_dir().join(name)
}

fn fixture(name: &str) -> String {
  std::fs::read_to_string(glyph_path(name)).expect("fixture")
}

/// Run `cargo run --bin run_glyph -- <args...>` from the crate root. Returns (stdout, stderr, success).
fn run_run_glyph(args: &[&str]) -> (String, String, bool) {
  run_run_glyph_with_env(args, &[])
}

/// Like run_run_glyph but with extra env vars (e.g. GLYPH_EXECUTION_LOG).
fn run_run_glyph_with_env(args: &[&str], env: &[(&str, &str)]) -> (String, String, bool) {
  let cargo = std::env::var("CARGO").unwrap_or_else(|_| "cargo".to_string());
  let mut cmd = Command::new(cargo.as_str());
  cmd
    .args(["run", "--quiet", "--bin", "run_glyph", "--"])
    .args(args)
    .current_dir(env!("CARGO_MANIFEST_DIR"))
    .env("RUST_LOG", "warn");
  for (k, v) in env {
    cmd.env(k, v);
  }
  let out = cmd.output().expect("cargo run --bin run_glyph");
  (
    String::from_utf8_lossy(&out.stdout).into_owned(),
    String::from_utf8_lossy(&out.stderr).into_owned(),
    out.status.success(),
  )
}

// ---- CLI tests using tests/integration/*.glyph ----

#[test]
fn cli_multiply_prints_product() {
  let path = glyph_path("multiply.glyph");
  let (stdout, stderr, success) = run_run_glyph(&[path.to_str().expect("path")]);
  assert!(success, "multiply.glyph should succeed: stderr={}", stderr);
  assert_eq!(stdout.trim(), "PRINT: 24");
}

#[test]
fn cli_divide_by_zero_fails() {
  let path = glyph_path("divide_by_zero.glyph");
  let (stdout, stderr, success) = run_run_glyph(&[path.to_str().expect("path")]);
  assert!(!success);
  assert!(stdout.trim().is_empty());
  assert!(stderr.contains("zero"), "stderr={}", stderr);
}

#[test]
fn cli_check_reports_unknown_function() {
  let path = glyph_path("unknown_function.glyph");
  let (stdout, _, success) = run_run_glyph(&["--check", path.to_str().expect("path")]);
  assert!(!success);
  assert!(stdout.contains("invalid"));
  assert!(stdout.contains("UNKNOWN_FUNCTION"));
}

#[test]
fn cli_parse_prints_program_json() {
  let path = glyph_path("multiply.glyph");
  let (stdout, stderr, success) = run_run_glyph(&["--parse", path.to_str().expect("path")]);
  assert!(success, "stderr={}", stderr);
  let json: serde_json::Value = serde_json::from_str(&stdout).expect("program json");
  assert_eq!(json["nodes"].as_array().expect("nodes").len(), 5);
  assert_eq!(json["edges"].as_array().expect("edges").len(), 4);
}

#[test]
fn cli_syntax_error_names_line() {
  let path = glyph_path("syntax_error.glyph");
  let (_, stderr, success) = run_run_glyph(&[path.to_str().expect("path")]);
  assert!(!success);
  assert!(stderr.contains("line 2"), "stderr={}", stderr);
}

#[test]
fn cli_batch_runs_every_file() {
  let a = glyph_path("multiply.glyph");
  let b = glyph_path("labels.glyph");
  let (stdout, stderr, success) =
    run_run_glyph(&[a.to_str().expect("path"), b.to_str().expect("path")]);
  assert!(success, "stderr={}", stderr);
  assert!(stdout.contains("PRINT: 24"));
  assert!(stdout.contains("PRINT: 2"));
}

#[test]
fn cli_writes_execution_log_from_env() {
  let dir = tempfile::tempdir().expect("tempdir");
  let log_path = dir.path().join("run.json");
  let path = glyph_path("absorbed_error.glyph");
  let (_, stderr, success) = run_run_glyph_with_env(
    &[path.to_str().expect("path")],
    &[("GLYPH_EXECUTION_LOG", log_path.to_str().expect("log path"))],
  );
  assert!(success, "stderr={}", stderr);
  let log: serde_json::Value =
    serde_json::from_str(&std::fs::read_to_string(&log_path).expect("log")).expect("log json");
  assert_eq!(log["version"], EXECUTION_LOG_VERSION);
  assert_eq!(log["final_status"], "completed");
  assert!(
    log["steps"]
      .as_array()
      .expect("steps")
      .iter()
      .any(|s| s["absorbed"] == true)
  );
}

// ---- Library tests on the same fixtures ----

#[tokio::test]
async fn library_arithmetic_fixture() {
  let report = run_source(&fixture("arithmetic.glyph"), RunOptions::default())
    .await
    .expect("run");
  assert!(report.result.success);
  assert_eq!(
    report.result.output,
    vec!["PRINT: 85", "PRINT: 10", "PRINT: 144"]
  );
}

#[tokio::test]
async fn library_text_fixture() {
  let report = run_source(&fixture("text.glyph"), RunOptions::default())
    .await
    .expect("run");
  assert_eq!(
    report.result.output,
    vec![
      "PRINT: hello",
      "PRINT: Result: 100",
      "OUTPUT: MIXED INPUT",
      "PRINT: true"
    ]
  );
}

#[tokio::test]
async fn library_labels_fixture() {
  let program = parse(&fixture("labels.glyph")).expect("parse");
  assert_eq!(program.labels["main"].len(), 2);
  assert_eq!(program.labels["helper"].len(), 3);
  let report = run_source(&fixture("labels.glyph"), RunOptions::default())
    .await
    .expect("run");
  assert_eq!(report.result.output, vec!["PRINT: 1", "PRINT: 2"]);
}

#[tokio::test]
async fn library_absorbed_error_keeps_running() {
  let report = run_source(&fixture("absorbed_error.glyph"), RunOptions::default())
    .await
    .expect("run");
  assert!(report.result.success);
  assert_eq!(report.result.output, vec!["PRINT: 1"]);
  let divide = report.result.record(NodeId(1)).expect("divide record");
  assert!(divide.absorbed);
  assert_eq!(
    report.result.record(NodeId(3)).and_then(|r| r.result.clone()),
    Some(Value::Text("recovered".to_string()))
  );
}

#[tokio::test]
async fn library_unknown_function_is_validation_and_execution_error() {
  let program = parse(&fixture("unknown_function.glyph")).expect("parse");
  let report = validate(&program);
  assert_eq!(report.error_kinds(), vec![ViolationKind::UnknownFunction]);

  let mut engine = Engine::new();
  engine.load_program(program).expect("load");
  let result = engine.execute().await.expect("execute");
  assert!(!result.success);
  assert!(result.halting_record().is_some());
}

#[tokio::test]
async fn library_reserved_kind_halts() {
  let options = RunOptions {
    require_valid: true,
    ..Default::default()
  };
  let report = run_source(&fixture("reserved.glyph"), options)
    .await
    .expect("run");
  assert!(report.validation.valid);
  assert_eq!(
    report.validation.warning_kinds(),
    vec![ViolationKind::ReservedKind]
  );
  assert!(!report.result.success);
}

#[tokio::test]
async fn library_syntax_error_fixture() {
  match parse(&fixture("syntax_error.glyph")) {
    Err(FlowError::Syntax(e)) => assert_eq!(e.line, 2),
    other => panic!("expected syntax error, got {:?}", other),
  }
}

#[tokio::test]
async fn library_batch_over_fixtures() {
  let names = [
    "multiply.glyph",
    "syntax_error.glyph",
    "unknown_function.glyph",
    "divide_by_zero.glyph",
  ];
  let units = names
    .iter()
    .map(|n| (n.to_string(), fixture(n)))
    .collect();
  let report = run_batch(units, PipelineOptions::default()).await;
  let completed: Vec<&str> = report.completed.iter().map(|p| p.name.as_str()).collect();
  assert_eq!(completed, vec!["multiply.glyph", "divide_by_zero.glyph"]);
  let failed: Vec<(&str, &str)> = report
    .failures
    .iter()
    .map(|f| (f.name.as_str(), f.stage.as_str()))
    .collect();
  assert_eq!(
    failed,
    vec![
      ("syntax_error.glyph", "parse"),
      ("unknown_function.glyph", "validate")
    ]
  );
}
