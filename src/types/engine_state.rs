//! Lifecycle state of the execution engine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// `NotLoaded → Loaded → Running → {Completed | Halted}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
  NotLoaded,
  Loaded,
  Running,
  Completed,
  Halted,
}

impl EngineState {
  pub fn is_finished(&self) -> bool {
    matches!(self, EngineState::Completed | EngineState::Halted)
  }
}

impl fmt::Display for EngineState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      EngineState::NotLoaded => write!(f, "not_loaded"),
      EngineState::Loaded => write!(f, "loaded"),
      EngineState::Running => write!(f, "running"),
      EngineState::Completed => write!(f, "completed"),
      EngineState::Halted => write!(f, "halted"),
    }
  }
}
