//! DTOs for the execution log: a JSON trace of node evaluations for debugging.
//!
//! Built from the [ExecutionRecord](super::ExecutionRecord)s produced during the run.

use serde::{Deserialize, Serialize};

use super::{NodeId, NodeKind, Value};
use crate::error::ExecutionError;

/// Current log format version.
pub const EXECUTION_LOG_VERSION: u32 = 1;

/// One evaluated node in the execution log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionStepEntry {
  /// 1-based step index.
  pub step: u32,
  /// Node that was evaluated.
  pub node_id: NodeId,
  pub kind: NodeKind,
  /// Literal as written in the source (e.g. `multiply`, `"hello"`).
  pub literal: String,
  /// Input values in positional order.
  pub inputs: Vec<Value>,
  pub result: Option<Value>,
  pub error: Option<ExecutionError>,
  /// The error was contained by an error-flow edge.
  pub absorbed: bool,
  /// ISO 8601 timestamp of the evaluation.
  pub at: String,
}

impl ExecutionStepEntry {
  #[allow(clippy::too_many_arguments)]
  pub fn new(
    step: u32,
    node_id: NodeId,
    kind: NodeKind,
    literal: impl Into<String>,
    inputs: Vec<Value>,
    result: Option<Value>,
    error: Option<ExecutionError>,
    absorbed: bool,
  ) -> Self {
    Self {
      step,
      node_id,
      kind,
      literal: literal.into(),
      inputs,
      result,
      error,
      absorbed,
      at: chrono::Utc::now().to_rfc3339(),
    }
  }
}

/// Root structure of an execution log file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionLog {
  /// Log format version.
  pub version: u32,
  /// Name of the executed source (file name or batch unit name).
  pub source_name: String,
  /// ISO 8601 timestamp when the run started.
  pub started_at: String,
  /// ISO 8601 timestamp when the run finished (None if still running).
  pub finished_at: Option<String>,
  /// Final engine state when the run ended ("completed" or "halted").
  pub final_status: String,
  /// Node ids executed, in schedule order.
  pub executed_nodes: Vec<NodeId>,
  /// Recorded steps in order.
  pub steps: Vec<ExecutionStepEntry>,
}
