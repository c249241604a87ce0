//! Parsed Glyph program: the node arena, the edge set and label scopes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{DeclaredType, Edge, FlowKind, Literal, Node, NodeId, NodeKind, SourcePosition};

/// Label every node belongs to until a `name:` line switches scope.
pub const MAIN_LABEL: &str = "main";

/// Parsed Glyph program.
///
/// Nodes live in a flat vector indexed by [NodeId]; edges reference nodes by id only, so the
/// whole program serializes as plain data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
  pub nodes: Vec<Node>,
  pub edges: Vec<Edge>,
  pub labels: BTreeMap<String, Vec<NodeId>>,
}

impl Program {
  pub fn new() -> Self {
    Self::default()
  }

  /// Appends a node under `label` and returns its fresh id.
  pub fn add_node(
    &mut self,
    kind: NodeKind,
    value: Literal,
    declared_type: Option<DeclaredType>,
    position: SourcePosition,
    label: &str,
  ) -> NodeId {
    let id = NodeId(self.nodes.len() as u32);
    self.nodes.push(Node {
      id,
      kind,
      value,
      declared_type,
      position,
      label: label.to_string(),
    });
    self.labels.entry(label.to_string()).or_default().push(id);
    id
  }

  /// Adds `edge` unless an edge with the same `(from, to)` pair exists. Returns true if added.
  pub fn add_edge(&mut self, edge: Edge) -> bool {
    if self.has_edge(edge.from, edge.to) {
      return false;
    }
    self.edges.push(edge);
    true
  }

  pub fn has_edge(&self, from: NodeId, to: NodeId) -> bool {
    self.edges.iter().any(|e| e.from == from && e.to == to)
  }

  /// Looks a node up by id: arena index first, then a scan for hand-built or deserialized
  /// programs whose ids do not match their positions.
  pub fn node(&self, id: NodeId) -> Option<&Node> {
    self
      .nodes
      .get(id.index())
      .filter(|n| n.id == id)
      .or_else(|| self.nodes.iter().find(|n| n.id == id))
  }

  pub fn contains(&self, id: NodeId) -> bool {
    self.node(id).is_some()
  }

  pub fn outgoing_edges(&self, id: NodeId) -> Vec<&Edge> {
    self.edges.iter().filter(|e| e.from == id).collect()
  }

  pub fn incoming_edges(&self, id: NodeId) -> Vec<&Edge> {
    self.edges.iter().filter(|e| e.to == id).collect()
  }

  /// Predecessors along value-carrying edges, in edge-declaration order. This is the positional
  /// argument order builtins see.
  pub fn value_inputs(&self, id: NodeId) -> Vec<NodeId> {
    self
      .edges
      .iter()
      .filter(|e| e.to == id && e.flow.carries_value())
      .map(|e| e.from)
      .collect()
  }

  /// Nodes whose failures `id` handles, through incoming error-flow edges.
  pub fn error_sources(&self, id: NodeId) -> Vec<NodeId> {
    self
      .edges
      .iter()
      .filter(|e| e.to == id && e.flow == FlowKind::Error)
      .map(|e| e.from)
      .collect()
  }

  pub fn has_outgoing_flow(&self, id: NodeId, flow: FlowKind) -> bool {
    self.edges.iter().any(|e| e.from == id && e.flow == flow)
  }
}
