//! Error taxonomy for parsing, scheduling and execution.
//!
//! Parsing fails with [SyntaxError], scheduling with [CycleError], and individual nodes with
//! [ExecutionError]. [FlowError] is what the public entry points return.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{NodeId, NodeKind, SourcePosition};
use crate::validator::ValidationReport;

/// Malformed source: bad node literal, unknown symbol, dangling connector.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("syntax error at line {line}, column {column}: {message} (near `{fragment}`)")]
pub struct SyntaxError {
  /// 1-based source line.
  pub line: usize,
  /// 1-based column, counted in characters.
  pub column: usize,
  /// The offending source fragment.
  pub fragment: String,
  pub message: String,
}

impl SyntaxError {
  pub fn new(
    position: SourcePosition,
    fragment: impl Into<String>,
    message: impl Into<String>,
  ) -> Self {
    Self {
      line: position.line,
      column: position.column,
      fragment: fragment.into(),
      message: message.into(),
    }
  }

  pub fn position(&self) -> SourcePosition {
    SourcePosition::new(self.line, self.column)
  }
}

/// The value-edge graph has a directed cycle; no node may execute.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("cycle detected among nodes {}", format_ids(.nodes))]
pub struct CycleError {
  /// Every node that could not be scheduled, ordered by source position. Never empty.
  pub nodes: Vec<NodeId>,
}

fn format_ids(ids: &[NodeId]) -> String {
  ids
    .iter()
    .map(|id| id.to_string())
    .collect::<Vec<_>>()
    .join(", ")
}

/// Failure of a single node during execution.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum ExecutionError {
  #[error("unknown operation '{name}'")]
  UnknownOperation { name: String },

  #[error("{operation} expects {expected} input(s), got {actual}")]
  Arity {
    operation: String,
    expected: String,
    actual: usize,
  },

  #[error("{operation}: division by zero")]
  DivisionByZero { operation: String },

  #[error("{operation}: {message}")]
  TypeCoercion { operation: String, message: String },

  #[error("{kind} nodes are not supported by the executor")]
  Unsupported { kind: NodeKind },

  #[error("node {node} requires an input value")]
  MissingInput { node: NodeId },
}

/// Errors returned by the public entry points.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlowError {
  #[error(transparent)]
  Syntax(#[from] SyntaxError),

  #[error(transparent)]
  Cycle(#[from] CycleError),

  #[error("no program loaded")]
  NotLoaded,

  #[error("program failed validation with {} error(s)", .0.errors.len())]
  Invalid(ValidationReport),

  #[error("i/o error: {0}")]
  Io(String),
}

impl From<std::io::Error> for FlowError {
  fn from(e: std::io::Error) -> Self {
    FlowError::Io(e.to_string())
  }
}
