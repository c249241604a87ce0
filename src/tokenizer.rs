//! Single-pass tokenizer for one Glyph source line.
//!
//! Produces node-literal tokens (`[symbol body]`) and connector tokens (`→`, `←`, `⚡`, `🔄`,
//! `⤴`, `⤵`, `->`, `<-`, optionally decorated with `|label|`). Offsets are character indices
//! into the line; the graph builder decides adjacency from them alone.

use std::fmt;

use tracing::instrument;

use crate::error::SyntaxError;
use crate::types::{FlowKind, NodeKind, SourcePosition, VARIATION_SELECTOR};

/// A connector glyph and its direction semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
  /// `→` / `->`
  Forward,
  /// `←` / `<-`: the node after the connector feeds the node before it.
  Reverse,
  /// `⚡`
  Error,
  /// `🔄`
  Async,
  /// `⤴`
  Return,
  /// `⤵`
  Input,
}

impl Connector {
  pub fn flow(&self) -> FlowKind {
    match self {
      Connector::Forward | Connector::Reverse => FlowKind::Data,
      Connector::Error => FlowKind::Error,
      Connector::Async => FlowKind::Async,
      Connector::Return => FlowKind::Return,
      Connector::Input => FlowKind::Input,
    }
  }

  pub fn is_reverse(&self) -> bool {
    matches!(self, Connector::Reverse)
  }

  pub fn glyph(&self) -> char {
    match self {
      Connector::Forward => '→',
      Connector::Reverse => '←',
      Connector::Error => '⚡',
      Connector::Async => '🔄',
      Connector::Return => '⤴',
      Connector::Input => '⤵',
    }
  }
}

impl fmt::Display for Connector {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.glyph())
  }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
  /// `[symbol body]`; `body` is the raw text after the symbol, trimmed.
  Node { kind: NodeKind, body: String },
  Connector {
    connector: Connector,
    label: Option<String>,
  },
}

/// One token with its character span `[start, end)` in the line.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
  pub kind: TokenKind,
  pub start: usize,
  pub end: usize,
  pub position: SourcePosition,
  /// Exact source text of the token.
  pub text: String,
}

impl Token {
  pub fn is_node(&self) -> bool {
    matches!(self.kind, TokenKind::Node { .. })
  }
}

/// Matches a connector glyph at `i`, returning it and its width in characters.
pub(crate) fn match_connector(chars: &[char], i: usize) -> Option<(Connector, usize)> {
  let c = *chars.get(i)?;
  let single = match c {
    '→' => Some(Connector::Forward),
    '←' => Some(Connector::Reverse),
    '⚡' => Some(Connector::Error),
    '🔄' => Some(Connector::Async),
    '⤴' => Some(Connector::Return),
    '⤵' => Some(Connector::Input),
    _ => None,
  };
  if let Some(conn) = single {
    return Some((conn, 1));
  }
  match (c, chars.get(i + 1)) {
    ('-', Some('>')) => Some((Connector::Forward, 2)),
    ('<', Some('-')) => Some((Connector::Reverse, 2)),
    _ => None,
  }
}

fn text_of(chars: &[char], start: usize, end: usize) -> String {
  chars[start..end.min(chars.len())].iter().collect()
}

/// Scans a bracketed node literal starting at `start` (which holds `[`).
/// Returns the token and the index just past the closing `]`.
pub(crate) fn scan_node_literal(
  chars: &[char],
  start: usize,
  line: usize,
) -> Result<(Token, usize), SyntaxError> {
  let position = SourcePosition::new(line, start + 1);
  let mut quote: Option<char> = None;
  let mut escaped = false;
  let mut close = None;
  let mut i = start + 1;
  while i < chars.len() {
    let c = chars[i];
    if let Some(q) = quote {
      if escaped {
        escaped = false;
      } else if c == '\\' {
        escaped = true;
      } else if c == q {
        quote = None;
      }
    } else {
      match c {
        '"' | '\'' => quote = Some(c),
        ']' => {
          close = Some(i);
          break;
        }
        '[' => {
          return Err(SyntaxError::new(
            position,
            text_of(chars, start, i),
            "unterminated '[' before nested '['",
          ));
        }
        _ => {}
      }
    }
    i += 1;
  }

  let Some(close) = close else {
    let message = if quote.is_some() {
      "unterminated string literal in node"
    } else {
      "unterminated '['"
    };
    return Err(SyntaxError::new(
      position,
      text_of(chars, start, chars.len()),
      message,
    ));
  };

  let text = text_of(chars, start, close + 1);
  let inner: Vec<char> = chars[start + 1..close]
    .iter()
    .copied()
    .skip_while(|c| c.is_whitespace())
    .collect();
  let Some(&symbol) = inner.first() else {
    return Err(SyntaxError::new(position, text, "empty node literal"));
  };
  let Some(kind) = NodeKind::from_symbol(symbol) else {
    return Err(SyntaxError::new(
      position,
      text,
      format!("unknown node symbol '{}'", symbol),
    ));
  };
  let body: String = inner[1..]
    .iter()
    .copied()
    .skip_while(|c| *c == VARIATION_SELECTOR)
    .collect();
  let body = body.trim().to_string();
  if body.is_empty() {
    return Err(SyntaxError::new(
      position,
      text,
      format!("node '{}' has no value", symbol),
    ));
  }

  Ok((
    Token {
      kind: TokenKind::Node { kind, body },
      start,
      end: close + 1,
      position,
      text,
    },
    close + 1,
  ))
}

/// Scans an optional `|label|` decoration at `i`. Returns the label and the index past it.
pub(crate) fn scan_connector_label(
  chars: &[char],
  i: usize,
  line: usize,
) -> Result<(Option<String>, usize), SyntaxError> {
  if chars.get(i) != Some(&'|') {
    return Ok((None, i));
  }
  let close = chars[i + 1..]
    .iter()
    .position(|c| *c == '|')
    .map(|p| i + 1 + p)
    .ok_or_else(|| {
      SyntaxError::new(
        SourcePosition::new(line, i + 1),
        text_of(chars, i, chars.len()),
        "unterminated connector label",
      )
    })?;
  let label = text_of(chars, i + 1, close).trim().to_string();
  let label = if label.is_empty() { None } else { Some(label) };
  Ok((label, close + 1))
}

/// Tokenizes one source line. `line` is the 1-based line number used in positions.
///
/// Whitespace separates tokens and a `#` outside a node literal starts a trailing comment.
/// Anything else that is neither a node literal nor a connector is a syntax error.
#[instrument(level = "trace", skip(source))]
pub fn tokenize_line(source: &str, line: usize) -> Result<Vec<Token>, SyntaxError> {
  let chars: Vec<char> = source.chars().collect();
  let mut tokens = Vec::new();
  let mut i = 0;
  while i < chars.len() {
    let c = chars[i];
    if c.is_whitespace() || c == VARIATION_SELECTOR {
      i += 1;
      continue;
    }
    if c == '#' {
      break;
    }
    if c == '[' {
      let (token, next) = scan_node_literal(&chars, i, line)?;
      tokens.push(token);
      i = next;
      continue;
    }
    if let Some((connector, width)) = match_connector(&chars, i) {
      let mut next = i + width;
      while chars.get(next) == Some(&VARIATION_SELECTOR) {
        next += 1;
      }
      let (label, next) = scan_connector_label(&chars, next, line)?;
      tokens.push(Token {
        kind: TokenKind::Connector { connector, label },
        start: i,
        end: next,
        position: SourcePosition::new(line, i + 1),
        text: text_of(&chars, i, next),
      });
      i = next;
      continue;
    }

    let end = chars[i..]
      .iter()
      .position(|c| c.is_whitespace())
      .map(|p| i + p)
      .unwrap_or(chars.len());
    let message = if c == ']' {
      "unmatched ']'".to_string()
    } else {
      format!("unexpected character '{}'", c)
    };
    return Err(SyntaxError::new(
      SourcePosition::new(line, i + 1),
      text_of(&chars, i, end),
      message,
    ));
  }
  Ok(tokens)
}
