//! Execution engine: walks the schedule of a loaded program and evaluates each node once.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::builtins::{Applied, Operation};
use crate::error::{CycleError, ExecutionError, FlowError};
use crate::scheduler::schedule;
use crate::types::{
  EngineState, ExecutionRecord, ExecutionResult, ExecutionStepEntry, FlowKind, Node, NodeId,
  NodeKind, Program, Statistics, Value,
};

/// Sequential, cooperative interpreter for one loaded [Program].
///
/// `load_program` resets every record; `execute` evaluates each unexecuted node in schedule
/// order and memoizes it, so executing again reproduces the same result without recomputation.
#[derive(Debug)]
pub struct Engine {
  program: Option<Arc<Program>>,
  state: EngineState,
  order: Vec<NodeId>,
  /// One record per node, in declaration order.
  records: Vec<ExecutionRecord>,
  index: HashMap<NodeId, usize>,
  cycle: Option<CycleError>,
  step_log: Option<Vec<ExecutionStepEntry>>,
}

impl Default for Engine {
  fn default() -> Self {
    Self::new()
  }
}

impl Engine {
  pub fn new() -> Self {
    Self {
      program: None,
      state: EngineState::NotLoaded,
      order: Vec::new(),
      records: Vec::new(),
      index: HashMap::new(),
      cycle: None,
      step_log: None,
    }
  }

  /// Records an [ExecutionStepEntry] for every node evaluation.
  pub fn with_step_log(mut self) -> Self {
    self.step_log = Some(Vec::new());
    self
  }

  pub fn state(&self) -> EngineState {
    self.state
  }

  pub fn program(&self) -> Option<&Program> {
    self.program.as_deref()
  }

  /// Schedule of the loaded program.
  pub fn order(&self) -> &[NodeId] {
    &self.order
  }

  pub fn records(&self) -> &[ExecutionRecord] {
    &self.records
  }

  /// Drains the step entries captured so far. `None` unless built `with_step_log`.
  pub fn take_step_log(&mut self) -> Option<Vec<ExecutionStepEntry>> {
    self.step_log.as_mut().map(std::mem::take)
  }

  /// Loads `program`, resets all records and computes the schedule.
  ///
  /// A cyclic program leaves the engine `Halted`; `execute` then reports the cycle again
  /// without evaluating anything.
  #[instrument(level = "trace", skip(self, program), fields(node_count = program.nodes.len()))]
  pub fn load_program(&mut self, program: Program) -> Result<(), FlowError> {
    self.records = program.nodes.iter().map(ExecutionRecord::pending).collect();
    self.index = HashMap::new();
    for (i, node) in program.nodes.iter().enumerate() {
      self.index.entry(node.id).or_insert(i);
    }
    if let Some(log) = self.step_log.as_mut() {
      log.clear();
    }
    let scheduled = schedule(&program);
    self.program = Some(Arc::new(program));
    match scheduled {
      Ok(order) => {
        self.order = order;
        self.cycle = None;
        self.state = EngineState::Loaded;
        info!(scheduled = self.order.len(), "program loaded");
        Ok(())
      }
      Err(e) => {
        warn!(error = %e, "refusing to run cyclic program");
        self.order = Vec::new();
        self.cycle = Some(e.clone());
        self.state = EngineState::Halted;
        Err(e.into())
      }
    }
  }

  /// Runs the loaded program to completion or to the first unabsorbed error.
  #[instrument(level = "trace", skip(self))]
  pub async fn execute(&mut self) -> Result<ExecutionResult, FlowError> {
    let program = self.program.clone().ok_or(FlowError::NotLoaded)?;
    if let Some(cycle) = &self.cycle {
      return Err(FlowError::Cycle(cycle.clone()));
    }

    self.state = EngineState::Running;
    let mut output = Vec::new();
    let mut halted = false;
    for id in self.order.clone() {
      let Some(&slot) = self.index.get(&id) else {
        continue;
      };
      if !self.records[slot].executed {
        if !self.inputs_ready(&program, id) {
          debug!(node = %id, "skipped: upstream failed or no failure to handle");
          continue;
        }
        tokio::task::yield_now().await;
        self.evaluate(&program, id, slot);
      }
      let record = &self.records[slot];
      if let Some(line) = &record.emitted {
        output.push(line.clone());
      }
      if record.is_fatal() {
        halted = true;
        break;
      }
    }

    self.state = if halted {
      EngineState::Halted
    } else {
      EngineState::Completed
    };
    let statistics = Statistics::from_records(&self.records, output.len());
    info!(
      success = !halted,
      executed = statistics.executed_nodes,
      outputs = statistics.output_count,
      state = %self.state,
      "execution finished"
    );
    Ok(ExecutionResult {
      success: !halted,
      output,
      nodes: self.records.clone(),
      statistics,
    })
  }

  /// True when every value input that exists has executed successfully and, for a node
  /// reached through error-flow edges, at least one guarded node failed and was absorbed.
  fn inputs_ready(&self, program: &Program, id: NodeId) -> bool {
    let values_ready = program
      .value_inputs(id)
      .iter()
      .filter_map(|i| self.index.get(i))
      .all(|slot| self.records[*slot].succeeded());
    let guarded = program.error_sources(id);
    let handler_triggered = guarded.is_empty()
      || guarded
        .iter()
        .filter_map(|i| self.index.get(i))
        .any(|slot| self.records[*slot].executed && self.records[*slot].absorbed);
    values_ready && handler_triggered
  }

  fn evaluate(&mut self, program: &Program, id: NodeId, slot: usize) {
    let Some(node) = program.node(id) else {
      return;
    };
    let inputs: Vec<Value> = program
      .value_inputs(id)
      .iter()
      .filter_map(|i| self.index.get(i))
      .filter_map(|slot| self.records[*slot].result.clone())
      .collect();

    let outcome = evaluate_node(node, &inputs);
    let record = &mut self.records[slot];
    record.executed = true;
    match outcome {
      Ok(applied) => {
        debug!(node = %id, result = %applied.value, "evaluated");
        record.result = Some(applied.value);
        record.emitted = applied.emitted;
      }
      Err(e) => {
        record.absorbed = program.has_outgoing_flow(id, FlowKind::Error);
        if record.absorbed {
          warn!(node = %id, error = %e, "error absorbed by error flow");
        } else {
          warn!(node = %id, error = %e, "execution halted");
        }
        record.error = Some(e);
      }
    }

    if let Some(log) = self.step_log.as_mut() {
      let record = &self.records[slot];
      log.push(ExecutionStepEntry::new(
        log.len() as u32 + 1,
        id,
        node.kind,
        node.value.to_string(),
        inputs,
        record.result.clone(),
        record.error.clone(),
        record.absorbed,
      ));
    }
  }
}

/// Evaluates one node against its positional inputs.
pub(crate) fn evaluate_node(node: &Node, inputs: &[Value]) -> Result<Applied, ExecutionError> {
  match node.kind {
    NodeKind::Data | NodeKind::Text | NodeKind::Bool | NodeKind::List | NodeKind::Error => {
      Ok(Applied {
        value: node.value.to_value(),
        emitted: None,
      })
    }
    NodeKind::Function => {
      let name = node
        .operation_name()
        .ok_or_else(|| ExecutionError::UnknownOperation {
          name: node.value.to_string(),
        })?;
      Operation::lookup(name)?.apply(inputs)
    }
    NodeKind::Output => {
      let value = inputs
        .first()
        .cloned()
        .ok_or(ExecutionError::MissingInput { node: node.id })?;
      Ok(Applied {
        emitted: Some(format!("OUTPUT: {}", value)),
        value,
      })
    }
    NodeKind::Loop | NodeKind::Condition | NodeKind::Async => {
      Err(ExecutionError::Unsupported { kind: node.kind })
    }
  }
}
