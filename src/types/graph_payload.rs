//! Payload that flows through the batch pipeline stages.
//! Carries one source unit plus whatever each stage has derived from it so far.

use serde::Serialize;

use super::{ExecutionResult, Program};
use crate::validator::ValidationReport;

/// One source unit travelling Parse → Validate → Execute.
#[derive(Debug, Clone, Serialize)]
pub struct GlyphPayload {
  /// Position of the unit in its batch.
  pub index: usize,
  /// Unit name (usually the file path).
  pub name: String,
  pub source: String,
  pub program: Option<Program>,
  pub validation: Option<ValidationReport>,
  pub result: Option<ExecutionResult>,
}

impl GlyphPayload {
  /// Initial payload for pipeline entry.
  pub fn initial(name: impl Into<String>, source: impl Into<String>) -> Self {
    Self {
      index: 0,
      name: name.into(),
      source: source.into(),
      program: None,
      validation: None,
      result: None,
    }
  }

  pub fn with_index(mut self, index: usize) -> Self {
    self.index = index;
    self
  }
}

/// A unit that a stage rejected, routed to the stage's error stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageFailure {
  /// Position of the unit in its batch.
  pub index: usize,
  /// Unit name.
  pub name: String,
  /// Stage that rejected the unit.
  pub stage: String,
  pub message: String,
}

impl StageFailure {
  pub fn new(
    index: usize,
    name: impl Into<String>,
    stage: impl Into<String>,
    message: impl Into<String>,
  ) -> Self {
    Self {
      index,
      name: name.into(),
      stage: stage.into(),
      message: message.into(),
    }
  }
}
