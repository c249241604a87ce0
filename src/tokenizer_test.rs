//! Tests for `tokenizer`.

use proptest::prelude::*;

use crate::tokenizer::{Connector, TokenKind, match_connector, tokenize_line};
use crate::types::{FlowKind, NodeKind, SourcePosition};

fn node_bodies(line: &str) -> Vec<(NodeKind, String)> {
  tokenize_line(line, 1)
    .unwrap()
    .into_iter()
    .filter_map(|t| match t.kind {
      TokenKind::Node { kind, body } => Some((kind, body)),
      _ => None,
    })
    .collect()
}

#[test]
fn tokenizes_nodes_and_connectors_in_source_order() {
  let tokens = tokenize_line("[○ 2] → [▷ multiply] ← [○ 3]", 1).unwrap();
  assert_eq!(tokens.len(), 5);
  assert!(tokens[0].is_node());
  assert_eq!(
    tokens[1].kind,
    TokenKind::Connector {
      connector: Connector::Forward,
      label: None
    }
  );
  assert!(tokens[2].is_node());
  assert_eq!(
    tokens[3].kind,
    TokenKind::Connector {
      connector: Connector::Reverse,
      label: None
    }
  );
  let starts: Vec<usize> = tokens.iter().map(|t| t.start).collect();
  let mut sorted = starts.clone();
  sorted.sort();
  assert_eq!(starts, sorted);
}

#[test]
fn offsets_are_character_indices() {
  let tokens = tokenize_line("[○ 1] → [▷ print]", 3).unwrap();
  assert_eq!(tokens[0].start, 0);
  assert_eq!(tokens[0].end, 5);
  assert_eq!(tokens[1].start, 6);
  assert_eq!(tokens[1].end, 7);
  assert_eq!(tokens[2].start, 8);
  assert_eq!(tokens[2].position, SourcePosition::new(3, 9));
  assert_eq!(tokens[2].text, "[▷ print]");
}

#[test]
fn node_body_is_trimmed_and_symbol_decides_kind() {
  assert_eq!(
    node_bodies("[□   \"hi\"  ] [◇ true] [△ 1, 2] [⤶ out]"),
    vec![
      (NodeKind::Text, "\"hi\"".to_string()),
      (NodeKind::Bool, "true".to_string()),
      (NodeKind::List, "1, 2".to_string()),
      (NodeKind::Output, "out".to_string()),
    ]
  );
}

#[test]
fn reserved_kinds_are_tokenized() {
  let kinds: Vec<NodeKind> = node_bodies("[⟳ items] [◯ ready] [🔄 fetch] [⚡ oops]")
    .into_iter()
    .map(|(k, _)| k)
    .collect();
  assert_eq!(
    kinds,
    vec![
      NodeKind::Loop,
      NodeKind::Condition,
      NodeKind::Async,
      NodeKind::Error
    ]
  );
}

#[test]
fn closing_bracket_inside_quotes_does_not_end_node() {
  assert_eq!(
    node_bodies("[□ \"a]b\"] → [▷ print]"),
    vec![
      (NodeKind::Text, "\"a]b\"".to_string()),
      (NodeKind::Function, "print".to_string()),
    ]
  );
}

#[test]
fn variation_selector_is_ignored() {
  let tokens = tokenize_line("[▷ divide] ⚡\u{FE0F} [⚡\u{FE0F} handler]", 1).unwrap();
  assert_eq!(tokens.len(), 3);
  assert_eq!(
    tokens[1].kind,
    TokenKind::Connector {
      connector: Connector::Error,
      label: None
    }
  );
  assert_eq!(
    tokens[2].kind,
    TokenKind::Node {
      kind: NodeKind::Error,
      body: "handler".to_string()
    }
  );
}

#[test]
fn ascii_connector_aliases() {
  assert_eq!(
    match_connector(&['-', '>'], 0),
    Some((Connector::Forward, 2))
  );
  assert_eq!(
    match_connector(&['<', '-'], 0),
    Some((Connector::Reverse, 2))
  );
  assert_eq!(match_connector(&['-'], 0), None);
  let tokens = tokenize_line("[○ 1]->[▷ print]", 1).unwrap();
  assert_eq!(tokens.len(), 3);
}

#[test]
fn connector_label_is_captured() {
  let tokens = tokenize_line("[◯ ready] →|yes| [▷ print]", 1).unwrap();
  assert_eq!(
    tokens[1].kind,
    TokenKind::Connector {
      connector: Connector::Forward,
      label: Some("yes".to_string())
    }
  );
  assert_eq!(tokens[1].text, "→|yes|");
}

#[test]
fn connector_flow_kinds() {
  assert_eq!(Connector::Forward.flow(), FlowKind::Data);
  assert_eq!(Connector::Reverse.flow(), FlowKind::Data);
  assert!(Connector::Reverse.is_reverse());
  assert_eq!(Connector::Error.flow(), FlowKind::Error);
  assert_eq!(Connector::Async.flow(), FlowKind::Async);
  assert_eq!(Connector::Return.flow(), FlowKind::Return);
  assert_eq!(Connector::Input.flow(), FlowKind::Input);
}

#[test]
fn trailing_comment_is_ignored() {
  let tokens = tokenize_line("[○ 1] → [▷ print]  # shows 1", 1).unwrap();
  assert_eq!(tokens.len(), 3);
}

#[test]
fn unterminated_bracket_is_syntax_error() {
  let err = tokenize_line("[○ 1] → [▷ print", 4).unwrap_err();
  assert_eq!(err.line, 4);
  assert_eq!(err.column, 9);
  assert_eq!(err.fragment, "[▷ print");
  assert!(err.message.contains("unterminated"));
}

#[test]
fn unknown_symbol_is_syntax_error() {
  let err = tokenize_line("[★ 1] → [▷ print]", 2).unwrap_err();
  assert_eq!(err.column, 1);
  assert_eq!(err.fragment, "[★ 1]");
  assert!(err.message.contains("unknown node symbol"));
}

#[test]
fn empty_node_is_syntax_error() {
  assert!(tokenize_line("[]", 1).unwrap_err().message.contains("empty"));
  assert!(
    tokenize_line("[○   ]", 1)
      .unwrap_err()
      .message
      .contains("no value")
  );
}

#[test]
fn unterminated_string_is_syntax_error() {
  let err = tokenize_line("[□ \"abc]", 1).unwrap_err();
  assert!(err.message.contains("string"));
}

#[test]
fn stray_text_is_syntax_error() {
  let err = tokenize_line("[○ 1] => [▷ print]", 1).unwrap_err();
  assert_eq!(err.column, 7);
  assert_eq!(err.fragment, "=>");
  let err = tokenize_line("[○ 1]] ", 1).unwrap_err();
  assert!(err.message.contains("unmatched"));
}

#[test]
fn unterminated_label_is_syntax_error() {
  let err = tokenize_line("[○ 1] →|yes [▷ print]", 1).unwrap_err();
  assert!(err.message.contains("label"));
}

proptest! {
  #[test]
  fn tokenizer_never_panics(line in "\\PC{0,64}") {
    let _ = tokenize_line(&line, 1);
  }

  #[test]
  fn tokens_are_ordered_and_disjoint(
    parts in prop::collection::vec(prop_oneof![
      Just("[○ 1]"), Just("[□ \"x\"]"), Just("[▷ add]"), Just("→"), Just("←"), Just("⚡"), Just(" "),
    ], 0..12)
  ) {
    let line = parts.join(" ");
    let tokens = tokenize_line(&line, 1).unwrap();
    for pair in tokens.windows(2) {
      prop_assert!(pair[0].end <= pair[1].start);
    }
  }
}
