//! Source positions and node identities.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable node identity, assigned once by the graph builder and never reused.
///
/// Ids are arena indices into [Program::nodes](super::Program::nodes) for parsed programs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
  pub fn index(&self) -> usize {
    self.0 as usize
  }
}

impl fmt::Display for NodeId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "n{}", self.0)
  }
}

/// 1-based line and column (in characters) of a token in the source text.
///
/// Ordering is line first, then column; the scheduler relies on it for tie-breaking.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct SourcePosition {
  pub line: usize,
  pub column: usize,
}

impl SourcePosition {
  pub fn new(line: usize, column: usize) -> Self {
    Self { line, column }
  }
}

impl fmt::Display for SourcePosition {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}", self.line, self.column)
  }
}
