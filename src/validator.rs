//! Structural checks over a parsed [Program].
//!
//! Validation never mutates the program and never fails: every violation is collected into a
//! [ValidationReport] and the caller decides whether to execute anyway.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::builtins::Operation;
use crate::types::{NodeId, NodeKind, Program, SourcePosition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
  /// Two nodes share one id.
  DuplicateId,
  /// Edge endpoint references no node.
  DanglingEdge,
  /// Function node names no builtin operation.
  UnknownFunction,
  /// Function node without any value input.
  FunctionWithoutInputs,
  /// Input count outside the operation's arity.
  ArityMismatch,
  /// Output node without any value input.
  OutputWithoutInput,
  /// Literal does not match its `: type` annotation.
  TypeMismatch,
  /// Constant whose value goes nowhere (warning).
  OrphanConstant,
  /// Value edge into a constant, whose input is never read (warning).
  InputIntoConstant,
  /// Loop/condition/async node, which cannot execute (warning).
  ReservedKind,
}

impl ViolationKind {
  pub fn is_warning(&self) -> bool {
    matches!(
      self,
      ViolationKind::OrphanConstant | ViolationKind::InputIntoConstant | ViolationKind::ReservedKind
    )
  }
}

impl fmt::Display for ViolationKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      ViolationKind::DuplicateId => "DUPLICATE_ID",
      ViolationKind::DanglingEdge => "DANGLING_EDGE",
      ViolationKind::UnknownFunction => "UNKNOWN_FUNCTION",
      ViolationKind::FunctionWithoutInputs => "FUNCTION_WITHOUT_INPUTS",
      ViolationKind::ArityMismatch => "ARITY_MISMATCH",
      ViolationKind::OutputWithoutInput => "OUTPUT_WITHOUT_INPUT",
      ViolationKind::TypeMismatch => "TYPE_MISMATCH",
      ViolationKind::OrphanConstant => "ORPHAN_CONSTANT",
      ViolationKind::InputIntoConstant => "INPUT_INTO_CONSTANT",
      ViolationKind::ReservedKind => "RESERVED_KIND",
    };
    write!(f, "{}", s)
  }
}

/// One validation finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
  pub kind: ViolationKind,
  /// Offending node, when the finding is about one.
  pub node: Option<NodeId>,
  pub position: Option<SourcePosition>,
  pub message: String,
}

impl Violation {
  pub fn new(
    kind: ViolationKind,
    node: Option<NodeId>,
    position: Option<SourcePosition>,
    message: impl Into<String>,
  ) -> Self {
    Self {
      kind,
      node,
      position,
      message: message.into(),
    }
  }
}

impl fmt::Display for Violation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.position {
      Some(pos) => write!(f, "[{}] {}: {}", self.kind, pos, self.message),
      None => write!(f, "[{}] {}", self.kind, self.message),
    }
  }
}

/// `{valid, errors, warnings}`; `valid` is true iff `errors` is empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
  pub valid: bool,
  pub errors: Vec<Violation>,
  pub warnings: Vec<Violation>,
}

impl ValidationReport {
  fn from_violations(violations: Vec<Violation>) -> Self {
    let (warnings, errors): (Vec<_>, Vec<_>) =
      violations.into_iter().partition(|v| v.kind.is_warning());
    Self {
      valid: errors.is_empty(),
      errors,
      warnings,
    }
  }

  /// Kinds of all errors, in report order.
  pub fn error_kinds(&self) -> Vec<ViolationKind> {
    self.errors.iter().map(|v| v.kind).collect()
  }

  pub fn warning_kinds(&self) -> Vec<ViolationKind> {
    self.warnings.iter().map(|v| v.kind).collect()
  }
}

/// Checks `program` and reports every violation found.
#[instrument(level = "trace", skip(program), fields(node_count = program.nodes.len()))]
pub fn validate(program: &Program) -> ValidationReport {
  let mut violations = Vec::new();

  let mut seen: BTreeMap<NodeId, usize> = BTreeMap::new();
  for node in &program.nodes {
    *seen.entry(node.id).or_default() += 1;
  }
  for (id, count) in seen.iter().filter(|(_, c)| **c > 1) {
    let position = program.node(*id).map(|n| n.position);
    violations.push(Violation::new(
      ViolationKind::DuplicateId,
      Some(*id),
      position,
      format!("node id {} is used by {} nodes", id, count),
    ));
  }

  for edge in &program.edges {
    for (end, id) in [("source", edge.from), ("destination", edge.to)] {
      if !program.contains(id) {
        violations.push(Violation::new(
          ViolationKind::DanglingEdge,
          Some(id),
          Some(edge.position),
          format!(
            "{} edge {} → {} has a missing {} node",
            edge.flow, edge.from, edge.to, end
          ),
        ));
      }
    }
  }

  for node in &program.nodes {
    let inputs = program.value_inputs(node.id).len();
    let at = Some(node.position);
    match node.kind {
      NodeKind::Function => match node.operation_name().map(Operation::from_name) {
        None | Some(None) => violations.push(Violation::new(
          ViolationKind::UnknownFunction,
          Some(node.id),
          at,
          format!("unknown function '{}'", node.value),
        )),
        Some(Some(_)) if inputs == 0 => violations.push(Violation::new(
          ViolationKind::FunctionWithoutInputs,
          Some(node.id),
          at,
          format!("function '{}' has no inputs", node.value),
        )),
        Some(Some(op)) if !op.arity().accepts(inputs) => violations.push(Violation::new(
          ViolationKind::ArityMismatch,
          Some(node.id),
          at,
          format!("{} expects {} input(s), got {}", op, op.arity(), inputs),
        )),
        Some(Some(_)) => {}
      },
      NodeKind::Output if inputs == 0 => violations.push(Violation::new(
        ViolationKind::OutputWithoutInput,
        Some(node.id),
        at,
        format!("output node {} has no input", node),
      )),
      kind if kind.is_reserved() => violations.push(Violation::new(
        ViolationKind::ReservedKind,
        Some(node.id),
        at,
        format!("{} nodes are parsed but cannot execute", kind),
      )),
      kind if kind.is_constant() => {
        if program.outgoing_edges(node.id).is_empty() {
          violations.push(Violation::new(
            ViolationKind::OrphanConstant,
            Some(node.id),
            at,
            format!("constant {} is not connected to anything", node),
          ));
        }
        if inputs > 0 {
          violations.push(Violation::new(
            ViolationKind::InputIntoConstant,
            Some(node.id),
            at,
            format!("constant {} ignores its {} input(s)", node, inputs),
          ));
        }
      }
      _ => {}
    }

    if let Some(declared) = node.declared_type.filter(|d| !d.accepts(&node.value)) {
      violations.push(Violation::new(
        ViolationKind::TypeMismatch,
        Some(node.id),
        at,
        format!("{} is declared as {}", node, declared),
      ));
    }
  }

  let report = ValidationReport::from_violations(violations);
  for w in &report.warnings {
    warn!(kind = %w.kind, "{}", w.message);
  }
  info!(
    valid = report.valid,
    errors = report.errors.len(),
    warnings = report.warnings.len(),
    "validated program"
  );
  report
}
