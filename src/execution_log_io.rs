//! Write and load `execution.log.json` (a JSON trace of one run).

use std::path::Path;

use crate::types::{
  EXECUTION_LOG_VERSION, EngineState, ExecutionLog, ExecutionResult, ExecutionStepEntry, NodeId,
};

/// Default filename for an execution log placed in a directory.
pub const EXECUTION_LOG_FILENAME: &str = "execution.log.json";

/// Assembles the log for a finished run. Executed nodes are listed in step order.
pub fn build_execution_log(
  source_name: impl Into<String>,
  started_at: impl Into<String>,
  final_state: EngineState,
  result: &ExecutionResult,
  steps: Vec<ExecutionStepEntry>,
) -> ExecutionLog {
  let mut executed_nodes: Vec<NodeId> = steps.iter().map(|s| s.node_id).collect();
  if executed_nodes.is_empty() {
    executed_nodes = result
      .nodes
      .iter()
      .filter(|r| r.executed)
      .map(|r| r.id)
      .collect();
  }
  ExecutionLog {
    version: EXECUTION_LOG_VERSION,
    source_name: source_name.into(),
    started_at: started_at.into(),
    finished_at: Some(chrono::Utc::now().to_rfc3339()),
    final_status: final_state.to_string(),
    executed_nodes,
    steps,
  }
}

/// Loads an execution log from `path`. Returns error if file is missing or invalid JSON.
pub fn load_execution_log(path: &Path) -> Result<ExecutionLog, std::io::Error> {
  let bytes = std::fs::read(path)?;
  serde_json::from_slice(&bytes)
    .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

/// Writes `log` to `path` as pretty JSON. A directory path gets [EXECUTION_LOG_FILENAME]
/// appended; missing parent directories are created.
pub fn write_execution_log(path: &Path, log: &ExecutionLog) -> Result<(), std::io::Error> {
  let target = if path.is_dir() {
    path.join(EXECUTION_LOG_FILENAME)
  } else {
    path.to_path_buf()
  };
  let json = serde_json::to_string_pretty(log)
    .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
  if let Some(parent) = target.parent() {
    std::fs::create_dir_all(parent)?;
  }
  std::fs::write(target, json)
}

#[cfg(test)]
mod tests {
  use super::{
    EXECUTION_LOG_FILENAME, build_execution_log, load_execution_log, write_execution_log,
  };
  use crate::types::{
    EngineState, ExecutionResult, ExecutionStepEntry, NodeId, NodeKind, Statistics, Value,
  };

  fn empty_result() -> ExecutionResult {
    ExecutionResult {
      success: true,
      output: vec!["PRINT: 6".to_string()],
      nodes: vec![],
      statistics: Statistics::from_records(&[], 1),
    }
  }

  #[test]
  fn write_and_load_roundtrip() {
    let step = ExecutionStepEntry::new(
      1,
      NodeId(1),
      NodeKind::Function,
      "multiply",
      vec![Value::Number(2.0), Value::Number(3.0)],
      Some(Value::Number(6.0)),
      None,
      false,
    );
    let log = build_execution_log(
      "demo.glyph",
      "2026-02-14T10:00:00Z",
      EngineState::Completed,
      &empty_result(),
      vec![step],
    );
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("run.json");
    write_execution_log(&path, &log).expect("write");
    let loaded = load_execution_log(&path).expect("load");
    assert_eq!(loaded, log);
    assert_eq!(loaded.final_status, "completed");
    assert_eq!(loaded.executed_nodes, vec![NodeId(1)]);
    assert!(loaded.finished_at.is_some());
  }

  #[test]
  fn directory_target_gets_default_filename() {
    let log = build_execution_log(
      "demo.glyph",
      "2026-02-14T10:00:00Z",
      EngineState::Halted,
      &empty_result(),
      vec![],
    );
    let dir = tempfile::tempdir().expect("tempdir");
    write_execution_log(dir.path(), &log).expect("write");
    let loaded = load_execution_log(&dir.path().join(EXECUTION_LOG_FILENAME)).expect("load");
    assert_eq!(loaded.final_status, "halted");
    assert!(loaded.steps.is_empty());
  }

  #[test]
  fn load_rejects_invalid_json() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(EXECUTION_LOG_FILENAME);
    std::fs::write(&path, "not json").unwrap();
    let err = load_execution_log(&path).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
  }
}
