//! Graph builder: turns tokenized lines into a [Program] and exposes the `parse` entry point.
//!
//! Nodes of a line are materialized first, left to right; connectors are then resolved against
//! the nearest node on each side by character offset. Edges never cross lines.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, instrument};

use crate::error::{FlowError, SyntaxError};
use crate::scheduler::schedule;
use crate::tokenizer::{Connector, Token, TokenKind, tokenize_line};
use crate::types::{
  DeclaredType, Edge, FlowKind, Literal, MAIN_LABEL, NodeId, NodeKind, Program, parse_number,
};

static LABEL_LINE: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)\s*:$").expect("label regex"));
static IDENTIFIER: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier regex"));

/// Parses Glyph source text into a [Program].
///
/// Fails with [FlowError::Syntax] on malformed source and [FlowError::Cycle] when the value
/// edges form a cycle.
#[instrument(level = "trace", skip(source))]
pub fn parse(source: &str) -> Result<Program, FlowError> {
  let mut builder = GraphBuilder::new();
  for (index, line) in source.lines().enumerate() {
    builder.push_line(index + 1, line)?;
  }
  let program = builder.finish();
  schedule(&program)?;
  info!(
    node_count = program.nodes.len(),
    edge_count = program.edges.len(),
    label_count = program.labels.len(),
    "parsed program"
  );
  Ok(program)
}

/// Returns the label name if `line` is a label declaration (`name:`).
pub fn label_declaration(line: &str) -> Option<&str> {
  LABEL_LINE
    .captures(line.trim())
    .and_then(|c| c.get(1))
    .map(|m| m.as_str())
}

/// Incremental builder: feed it lines, then take the [Program].
#[derive(Debug)]
pub struct GraphBuilder {
  program: Program,
  label: String,
}

impl Default for GraphBuilder {
  fn default() -> Self {
    Self::new()
  }
}

impl GraphBuilder {
  pub fn new() -> Self {
    Self {
      program: Program::new(),
      label: MAIN_LABEL.to_string(),
    }
  }

  /// Label that nodes of the next line will be declared under.
  pub fn current_label(&self) -> &str {
    &self.label
  }

  /// Consumes one source line. `line_no` is 1-based.
  ///
  /// Blank lines and `#` comments are skipped and label lines switch the current label.
  #[instrument(level = "trace", skip(self, line))]
  pub fn push_line(&mut self, line_no: usize, line: &str) -> Result<(), SyntaxError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
      return Ok(());
    }
    if let Some(label) = label_declaration(trimmed) {
      self.label = label.to_string();
      return Ok(());
    }
    let tokens = tokenize_line(line.trim_end_matches('\r'), line_no)?;
    self.build_line(&tokens)
  }

  pub fn finish(self) -> Program {
    self.program
  }

  fn build_line(&mut self, tokens: &[Token]) -> Result<(), SyntaxError> {
    // (id, start, end) of each node on this line, in offset order
    let mut placed: Vec<(NodeId, usize, usize)> = Vec::new();
    for token in tokens {
      if let TokenKind::Node { kind, body } = &token.kind {
        let (value, declared_type) = parse_node_body(*kind, body, token)?;
        let id = self
          .program
          .add_node(*kind, value, declared_type, token.position, &self.label);
        placed.push((id, token.start, token.end));
      }
    }

    let connectors: Vec<(&Token, Connector, &Option<String>)> = tokens
      .iter()
      .filter_map(|t| match &t.kind {
        TokenKind::Connector { connector, label } => Some((t, *connector, label)),
        _ => None,
      })
      .collect();

    if connectors.is_empty() {
      for pair in placed.windows(2) {
        let (from, to) = (pair[0].0, pair[1].0);
        let position = self
          .program
          .node(to)
          .map(|n| n.position)
          .unwrap_or_default();
        let mut edge = Edge::new(from, to, FlowKind::Data, position);
        edge.implicit = true;
        self.program.add_edge(edge);
      }
      return Ok(());
    }

    // node attached via a reverse connector → the node it feeds
    let mut anchors: HashMap<NodeId, NodeId> = HashMap::new();
    for (token, connector, label) in connectors {
      let left = placed
        .iter()
        .rev()
        .find(|(_, _, end)| *end <= token.start)
        .map(|(id, _, _)| *id)
        .ok_or_else(|| {
          SyntaxError::new(
            token.position,
            token.text.clone(),
            format!("connector '{}' has no node on its left", connector),
          )
        })?;
      let right = placed
        .iter()
        .find(|(_, start, _)| *start >= token.end)
        .map(|(id, _, _)| *id)
        .ok_or_else(|| {
          SyntaxError::new(
            token.position,
            token.text.clone(),
            format!("connector '{}' has no node on its right", connector),
          )
        })?;
      let left = resolve_anchor(&anchors, left);
      let (from, to) = if connector.is_reverse() {
        anchors.insert(right, left);
        (right, left)
      } else {
        (left, right)
      };
      let edge = Edge::new(from, to, connector.flow(), token.position).with_label(label.clone());
      self.program.add_edge(edge);
    }
    Ok(())
  }
}

fn resolve_anchor(anchors: &HashMap<NodeId, NodeId>, mut id: NodeId) -> NodeId {
  while let Some(next) = anchors.get(&id) {
    id = *next;
  }
  id
}

/// Splits `value: type` into the value part and its declared type. The annotation is the text
/// after the last `:` outside quotes, and only counts when it is an identifier.
pub(crate) fn split_type_annotation(
  body: &str,
) -> Result<(&str, Option<DeclaredType>), String> {
  let Some(colon) = find_outside_quotes(body, ':').last().copied() else {
    return Ok((body, None));
  };
  let suffix = body[colon + 1..].trim();
  if !IDENTIFIER.is_match(suffix) {
    return Ok((body, None));
  }
  let declared =
    DeclaredType::from_name(suffix).ok_or_else(|| format!("unknown type '{}'", suffix))?;
  let value = body[..colon].trim();
  if value.is_empty() {
    return Err("missing value before type annotation".to_string());
  }
  Ok((value, Some(declared)))
}

/// Byte offsets of `needle` in `s` that are not inside a quoted string.
pub(crate) fn find_outside_quotes(s: &str, needle: char) -> Vec<usize> {
  let mut hits = Vec::new();
  let mut quote: Option<char> = None;
  let mut escaped = false;
  for (i, c) in s.char_indices() {
    match quote {
      Some(q) => {
        if escaped {
          escaped = false;
        } else if c == '\\' {
          escaped = true;
        } else if c == q {
          quote = None;
        }
      }
      None if c == '"' || c == '\'' => quote = Some(c),
      None if c == needle => hits.push(i),
      None => {}
    }
  }
  hits
}

/// Unescapes `\n`, `\t`, `\"`, `\'` and `\\`; unknown escapes are kept verbatim.
pub(crate) fn unescape_quoted_string(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  let mut chars = s.chars();
  while let Some(c) = chars.next() {
    if c != '\\' {
      out.push(c);
      continue;
    }
    match chars.next() {
      Some('n') => out.push('\n'),
      Some('t') => out.push('\t'),
      Some('"') => out.push('"'),
      Some('\'') => out.push('\''),
      Some('\\') => out.push('\\'),
      Some(other) => {
        out.push('\\');
        out.push(other);
      }
      None => out.push('\\'),
    }
  }
  out
}

pub(crate) fn is_identifier(s: &str) -> bool {
  IDENTIFIER.is_match(s)
}

/// Parses one scalar literal: quoted string, number, boolean, identifier, else bare text.
pub(crate) fn parse_scalar(s: &str) -> Result<Literal, String> {
  let s = s.trim();
  if let Some(quote) = s.chars().next().filter(|c| *c == '"' || *c == '\'') {
    if s.len() < 2 || !s.ends_with(quote) {
      return Err("malformed string literal".to_string());
    }
    return Ok(Literal::Text(unescape_quoted_string(&s[1..s.len() - 1])));
  }
  if let Some(n) = parse_number(s) {
    return Ok(Literal::Number(n));
  }
  match s {
    "true" => return Ok(Literal::Bool(true)),
    "false" => return Ok(Literal::Bool(false)),
    _ => {}
  }
  if is_identifier(s) {
    return Ok(Literal::Ident(s.to_string()));
  }
  Ok(Literal::Text(s.to_string()))
}

/// Parses a list body: comma-separated scalars, commas inside quotes excluded.
pub(crate) fn parse_list(s: &str) -> Result<Literal, String> {
  if s.trim().is_empty() {
    return Ok(Literal::List(Vec::new()));
  }
  let mut segments = Vec::new();
  let mut start = 0;
  for comma in find_outside_quotes(s, ',') {
    segments.push(&s[start..comma]);
    start = comma + 1;
  }
  segments.push(&s[start..]);

  let mut items = Vec::with_capacity(segments.len());
  for (i, segment) in segments.into_iter().enumerate() {
    if segment.trim().is_empty() {
      return Err(format!("empty list item at position {}", i + 1));
    }
    items.push(parse_scalar(segment)?);
  }
  Ok(Literal::List(items))
}

fn parse_node_body(
  kind: NodeKind,
  body: &str,
  token: &Token,
) -> Result<(Literal, Option<DeclaredType>), SyntaxError> {
  let fail = |message: String| SyntaxError::new(token.position, token.text.clone(), message);
  let (value, declared_type) = split_type_annotation(body).map_err(fail)?;
  let literal = match kind {
    NodeKind::List => parse_list(value),
    _ => parse_scalar(value),
  }
  .map_err(fail)?;
  if kind == NodeKind::Function && !matches!(literal, Literal::Ident(_)) {
    return Err(fail(format!(
      "function node needs an operation name, found `{}`",
      value
    )));
  }
  Ok((literal, declared_type))
}
