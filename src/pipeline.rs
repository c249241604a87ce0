//! Batch pipeline: `(name, source)` units through Parse → Validate → Execute.
//!
//! Stages are connected by bounded channels and run as separate tasks; a unit rejected by any
//! stage lands in [PipelineReport::failures] with the name of that stage.

use std::sync::Arc;

use futures::StreamExt;
use serde::Serialize;
use tracing::{info, instrument};

use crate::stages::{ExecuteStage, ParseStage, ValidateStage, spawn_stage};
use crate::types::{GlyphPayload, StageFailure};

/// Options for [run_batch].
#[derive(Debug, Clone)]
pub struct PipelineOptions {
  /// Reject units with validation errors in the validate stage.
  pub require_valid: bool,
}

impl Default for PipelineOptions {
  fn default() -> Self {
    Self {
      require_valid: true,
    }
  }
}

/// Completed payloads in input order, plus every rejected unit.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
  pub completed: Vec<GlyphPayload>,
  pub failures: Vec<StageFailure>,
}

impl PipelineReport {
  /// True when every unit completed and every run succeeded.
  pub fn all_succeeded(&self) -> bool {
    self.failures.is_empty()
      && self
        .completed
        .iter()
        .all(|p| p.result.as_ref().is_some_and(|r| r.success))
  }
}

/// Runs every unit through the three stages and waits for all of them.
#[instrument(level = "trace", skip(units, options), fields(unit_count = units.len()))]
pub async fn run_batch(units: Vec<(String, String)>, options: PipelineOptions) -> PipelineReport {
  let input = futures::stream::iter(
    units
      .into_iter()
      .enumerate()
      .map(|(index, (name, source))| GlyphPayload::initial(name, source).with_index(index)),
  );

  let parsed = spawn_stage(Arc::new(ParseStage::new("parse")), Box::pin(input));
  let validated = spawn_stage(
    Arc::new(ValidateStage::new("validate", options.require_valid)),
    parsed.out,
  );
  let executed = spawn_stage(Arc::new(ExecuteStage::new("execute")), validated.out);

  let errors = futures::stream::select_all(vec![parsed.error, validated.error, executed.error]);
  let (completed, mut failures): (Vec<GlyphPayload>, Vec<StageFailure>) =
    tokio::join!(executed.out.collect(), errors.collect());

  failures.sort_by_key(|f| f.index);

  info!(
    completed = completed.len(),
    failed = failures.len(),
    "batch finished"
  );
  PipelineReport {
    completed,
    failures,
  }
}
