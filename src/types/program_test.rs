//! Tests for `Program`.

use super::{Edge, FlowKind, Literal, MAIN_LABEL, NodeId, NodeKind, Program, SourcePosition};

fn pos(col: usize) -> SourcePosition {
  SourcePosition::new(1, col)
}

fn three_nodes() -> (Program, NodeId, NodeId, NodeId) {
  let mut p = Program::new();
  let a = p.add_node(NodeKind::Data, Literal::Number(2.0), None, pos(1), MAIN_LABEL);
  let f = p.add_node(
    NodeKind::Function,
    Literal::Ident("multiply".to_string()),
    None,
    pos(10),
    MAIN_LABEL,
  );
  let b = p.add_node(NodeKind::Data, Literal::Number(3.0), None, pos(25), MAIN_LABEL);
  (p, a, f, b)
}

#[test]
fn add_node_assigns_sequential_ids_and_labels() {
  let (p, a, f, b) = three_nodes();
  assert_eq!((a, f, b), (NodeId(0), NodeId(1), NodeId(2)));
  assert_eq!(p.labels.get(MAIN_LABEL).unwrap(), &vec![a, f, b]);
  assert_eq!(p.node(f).unwrap().operation_name(), Some("multiply"));
}

#[test]
fn add_edge_deduplicates_pairs() {
  let (mut p, a, f, _) = three_nodes();
  assert!(p.add_edge(Edge::new(a, f, FlowKind::Data, pos(5))));
  assert!(!p.add_edge(Edge::new(a, f, FlowKind::Error, pos(7))));
  assert_eq!(p.edges.len(), 1);
  assert_eq!(p.edges[0].flow, FlowKind::Data);
}

#[test]
fn value_inputs_follow_declaration_order() {
  let (mut p, a, f, b) = three_nodes();
  p.add_edge(Edge::new(b, f, FlowKind::Data, pos(20)));
  p.add_edge(Edge::new(a, f, FlowKind::Data, pos(5)));
  assert_eq!(p.value_inputs(f), vec![b, a]);
}

#[test]
fn value_inputs_skip_error_edges() {
  let (mut p, a, f, b) = three_nodes();
  p.add_edge(Edge::new(a, f, FlowKind::Data, pos(5)));
  p.add_edge(Edge::new(b, f, FlowKind::Error, pos(20)));
  assert_eq!(p.value_inputs(f), vec![a]);
  assert_eq!(p.error_sources(f), vec![b]);
  assert!(p.error_sources(a).is_empty());
}

#[test]
fn node_lookup_falls_back_to_scan() {
  let (mut p, _, _, _) = three_nodes();
  p.nodes.remove(0);
  assert!(p.node(NodeId(0)).is_none());
  assert_eq!(p.node(NodeId(2)).unwrap().value, Literal::Number(3.0));
}

#[test]
fn outgoing_flow_queries() {
  let (mut p, a, f, b) = three_nodes();
  p.add_edge(Edge::new(a, f, FlowKind::Data, pos(5)));
  p.add_edge(Edge::new(f, b, FlowKind::Error, pos(20)));
  assert!(p.has_outgoing_flow(f, FlowKind::Error));
  assert!(!p.has_outgoing_flow(a, FlowKind::Error));
  assert_eq!(p.outgoing_edges(a).len(), 1);
  assert_eq!(p.incoming_edges(f).len(), 1);
}

#[test]
fn program_round_trips_through_json() {
  let (mut p, a, f, _) = three_nodes();
  p.add_edge(Edge::new(a, f, FlowKind::Data, pos(5)));
  let json = serde_json::to_string(&p).unwrap();
  let back: Program = serde_json::from_str(&json).unwrap();
  assert_eq!(back, p);
}
