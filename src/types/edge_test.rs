//! Tests for `Edge` and `FlowKind`.

use super::{Edge, FlowKind, NodeId, SourcePosition};

#[test]
fn value_carrying_flow_kinds() {
  assert!(FlowKind::Data.carries_value());
  assert!(FlowKind::Return.carries_value());
  assert!(FlowKind::Input.carries_value());
  assert!(!FlowKind::Error.carries_value());
  assert!(!FlowKind::Async.carries_value());
}

#[test]
fn new_edge_has_no_label() {
  let e = Edge::new(NodeId(0), NodeId(1), FlowKind::Data, SourcePosition::new(1, 5));
  assert!(e.label.is_none());
  assert!(!e.implicit);
}

#[test]
fn with_label_sets_label() {
  let e = Edge::new(NodeId(0), NodeId(1), FlowKind::Data, SourcePosition::new(1, 5))
    .with_label(Some("yes".to_string()));
  assert_eq!(e.label.as_deref(), Some("yes"));
}

#[test]
fn label_omitted_from_json_when_absent() {
  let e = Edge::new(NodeId(0), NodeId(1), FlowKind::Error, SourcePosition::new(2, 3));
  let json = serde_json::to_value(&e).unwrap();
  assert!(json.get("label").is_none());
  assert_eq!(json["flow"], "error");
  assert_eq!(json["from"], 0);
}
