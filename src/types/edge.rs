//! A directed edge in the Glyph graph.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{NodeId, SourcePosition};

/// Flow kind of an edge, decided by the connector glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowKind {
  Data,
  Error,
  Async,
  Return,
  Input,
}

impl FlowKind {
  /// Value-carrying edges order the schedule and supply positional inputs.
  pub fn carries_value(&self) -> bool {
    matches!(self, FlowKind::Data | FlowKind::Return | FlowKind::Input)
  }
}

impl fmt::Display for FlowKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      FlowKind::Data => "data",
      FlowKind::Error => "error",
      FlowKind::Async => "async",
      FlowKind::Return => "return",
      FlowKind::Input => "input",
    };
    write!(f, "{}", s)
  }
}

/// A directed dependency `from → to`. Edges reference nodes by id only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
  pub from: NodeId,
  pub to: NodeId,
  pub flow: FlowKind,
  /// Inline connector label (`→|yes|`), e.g. a branch condition value.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub label: Option<String>,
  /// Position of the connector that declared the edge.
  pub position: SourcePosition,
  /// True when the edge came from the no-connector chaining fallback.
  #[serde(default)]
  pub implicit: bool,
}

impl Edge {
  pub fn new(from: NodeId, to: NodeId, flow: FlowKind, position: SourcePosition) -> Self {
    Self {
      from,
      to,
      flow,
      label: None,
      position,
      implicit: false,
    }
  }

  pub fn with_label(mut self, label: Option<String>) -> Self {
    self.label = label;
    self
  }
}
