//! Aggregate result of executing a loaded program.

use serde::{Deserialize, Serialize};

use super::{ExecutionRecord, NodeId};

/// Summary counts over one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
  pub total_nodes: usize,
  pub executed_nodes: usize,
  /// Successfully executed nodes over total nodes; 0.0 for an empty program.
  pub success_rate: f64,
  pub output_count: usize,
}

impl Statistics {
  pub fn from_records(records: &[ExecutionRecord], output_count: usize) -> Self {
    let total_nodes = records.len();
    let executed_nodes = records.iter().filter(|r| r.executed).count();
    let succeeded = records.iter().filter(|r| r.succeeded()).count();
    let success_rate = if total_nodes == 0 {
      0.0
    } else {
      succeeded as f64 / total_nodes as f64
    };
    Self {
      total_nodes,
      executed_nodes,
      success_rate,
      output_count,
    }
  }
}

/// Result of one `execute()` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
  /// False iff some node failed without an outgoing error-flow edge.
  pub success: bool,
  /// Output lines in emission order.
  pub output: Vec<String>,
  /// One record per program node, in declaration order.
  pub nodes: Vec<ExecutionRecord>,
  pub statistics: Statistics,
}

impl ExecutionResult {
  pub fn record(&self, id: NodeId) -> Option<&ExecutionRecord> {
    self.nodes.iter().find(|r| r.id == id)
  }

  /// The first fatal record, if the run halted.
  pub fn halting_record(&self) -> Option<&ExecutionRecord> {
    self.nodes.iter().find(|r| r.is_fatal())
  }
}
