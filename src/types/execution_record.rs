//! Per-node, per-run execution state.

use serde::{Deserialize, Serialize};

use super::{Literal, Node, NodeId, NodeKind, Value};
use crate::error::ExecutionError;

/// Execution state of one node in one run.
///
/// A record moves from unexecuted to executed-success or executed-error exactly once per loaded
/// program and is never re-entered afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRecord {
  pub id: NodeId,
  pub kind: NodeKind,
  pub value: Literal,
  pub executed: bool,
  pub result: Option<Value>,
  pub error: Option<ExecutionError>,
  /// The error was contained by an outgoing error-flow edge.
  #[serde(default)]
  pub absorbed: bool,
  /// Output line produced by this node (`print` or an Output node).
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub emitted: Option<String>,
}

impl ExecutionRecord {
  pub fn pending(node: &Node) -> Self {
    Self {
      id: node.id,
      kind: node.kind,
      value: node.value.clone(),
      executed: false,
      result: None,
      error: None,
      absorbed: false,
      emitted: None,
    }
  }

  pub fn succeeded(&self) -> bool {
    self.executed && self.error.is_none()
  }

  /// True when the node failed and nothing contained the failure.
  pub fn is_fatal(&self) -> bool {
    self.executed && self.error.is_some() && !self.absorbed
  }
}
