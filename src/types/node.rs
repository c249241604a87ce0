//! A node in the Glyph graph (parsed from one `[symbol value[:type]]` literal).

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Literal, NodeId, SourcePosition};

/// Variation selector that may trail an emoji glyph (e.g. `⚡️`).
pub(crate) const VARIATION_SELECTOR: char = '\u{FE0F}';

/// Node kind, decided by the leading symbol glyph of the literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
  Data,
  Text,
  Bool,
  List,
  Function,
  Output,
  Error,
  Async,
  Loop,
  Condition,
}

impl NodeKind {
  /// Maps a leading symbol glyph to its node kind.
  pub fn from_symbol(symbol: char) -> Option<Self> {
    Some(match symbol {
      '○' => NodeKind::Data,
      '□' => NodeKind::Text,
      '△' => NodeKind::List,
      '◇' => NodeKind::Bool,
      '▷' => NodeKind::Function,
      '⟳' => NodeKind::Loop,
      '◯' => NodeKind::Condition,
      '⤶' => NodeKind::Output,
      '⚡' => NodeKind::Error,
      '🔄' => NodeKind::Async,
      _ => return None,
    })
  }

  pub fn symbol(&self) -> char {
    match self {
      NodeKind::Data => '○',
      NodeKind::Text => '□',
      NodeKind::List => '△',
      NodeKind::Bool => '◇',
      NodeKind::Function => '▷',
      NodeKind::Loop => '⟳',
      NodeKind::Condition => '◯',
      NodeKind::Output => '⤶',
      NodeKind::Error => '⚡',
      NodeKind::Async => '🔄',
    }
  }

  /// Constant kinds evaluate to their literal and never consult inputs.
  pub fn is_constant(&self) -> bool {
    matches!(
      self,
      NodeKind::Data | NodeKind::Text | NodeKind::Bool | NodeKind::List
    )
  }

  /// Parsed vocabulary without execution semantics.
  pub fn is_reserved(&self) -> bool {
    matches!(self, NodeKind::Loop | NodeKind::Condition | NodeKind::Async)
  }
}

impl fmt::Display for NodeKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      NodeKind::Data => "data",
      NodeKind::Text => "text",
      NodeKind::Bool => "bool",
      NodeKind::List => "list",
      NodeKind::Function => "function",
      NodeKind::Output => "output",
      NodeKind::Error => "error",
      NodeKind::Async => "async",
      NodeKind::Loop => "loop",
      NodeKind::Condition => "condition",
    };
    write!(f, "{}", s)
  }
}

/// Optional `: type` annotation on a node literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclaredType {
  Number,
  String,
  Boolean,
  List,
}

impl DeclaredType {
  pub fn from_name(name: &str) -> Option<Self> {
    match name {
      "number" => Some(DeclaredType::Number),
      "string" => Some(DeclaredType::String),
      "boolean" => Some(DeclaredType::Boolean),
      "list" => Some(DeclaredType::List),
      _ => None,
    }
  }

  /// Returns true if `literal` conforms to this annotation.
  pub fn accepts(&self, literal: &Literal) -> bool {
    match self {
      DeclaredType::Number => matches!(literal, Literal::Number(_)),
      DeclaredType::String => matches!(literal, Literal::Text(_) | Literal::Ident(_)),
      DeclaredType::Boolean => matches!(literal, Literal::Bool(_)),
      DeclaredType::List => matches!(literal, Literal::List(_)),
    }
  }
}

impl fmt::Display for DeclaredType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      DeclaredType::Number => "number",
      DeclaredType::String => "string",
      DeclaredType::Boolean => "boolean",
      DeclaredType::List => "list",
    };
    write!(f, "{}", s)
  }
}

/// A node in the Glyph graph.
///
/// Identity, kind, value and position are fixed at creation; execution state lives in
/// [ExecutionRecord](super::ExecutionRecord).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
  pub id: NodeId,
  pub kind: NodeKind,
  pub value: Literal,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub declared_type: Option<DeclaredType>,
  pub position: SourcePosition,
  /// Label scope the node was declared under (`main` unless a label line preceded it).
  pub label: String,
}

impl Node {
  /// Operation name for function nodes.
  pub fn operation_name(&self) -> Option<&str> {
    match (&self.kind, &self.value) {
      (NodeKind::Function, Literal::Ident(name)) => Some(name.as_str()),
      _ => None,
    }
  }
}

impl fmt::Display for Node {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "[{} {}]", self.kind.symbol(), self.value)
  }
}
