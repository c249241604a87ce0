//! Literal payloads of node literals and runtime values produced by execution.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static NUMBER: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?$").expect("number regex")
});

/// Parses a decimal number literal (optional sign, fraction and exponent).
pub(crate) fn parse_number(s: &str) -> Option<f64> {
  if NUMBER.is_match(s) {
    s.parse::<f64>().ok()
  } else {
    None
  }
}

/// Formats a number the way Glyph prints it (`24`, `2.5`, `-3`).
pub(crate) fn format_number(n: f64) -> String {
  if n == 0.0 {
    // folds -0 into 0
    return "0".to_string();
  }
  format!("{}", n)
}

/// The literal payload of a node as written in the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Literal {
  Number(f64),
  Text(String),
  Bool(bool),
  List(Vec<Literal>),
  /// Bare identifier: an operation name on function nodes, a name elsewhere.
  Ident(String),
}

impl Literal {
  /// Runtime value of a constant literal. Identifiers evaluate to their name as text.
  pub fn to_value(&self) -> Value {
    match self {
      Literal::Number(n) => Value::Number(*n),
      Literal::Text(s) | Literal::Ident(s) => Value::Text(s.clone()),
      Literal::Bool(b) => Value::Bool(*b),
      Literal::List(items) => Value::List(items.iter().map(Literal::to_value).collect()),
    }
  }
}

impl fmt::Display for Literal {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Literal::Number(n) => write!(f, "{}", format_number(*n)),
      Literal::Text(s) => write!(f, "{:?}", s),
      Literal::Bool(b) => write!(f, "{}", b),
      Literal::Ident(s) => write!(f, "{}", s),
      Literal::List(items) => {
        let parts: Vec<String> = items.iter().map(|i| i.to_string()).collect();
        write!(f, "{}", parts.join(", "))
      }
    }
  }
}

/// A runtime value flowing along value edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
  Bool(bool),
  Number(f64),
  Text(String),
  List(Vec<Value>),
}

impl Value {
  pub fn type_name(&self) -> &'static str {
    match self {
      Value::Number(_) => "number",
      Value::Text(_) => "string",
      Value::Bool(_) => "boolean",
      Value::List(_) => "list",
    }
  }
}

impl fmt::Display for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Value::Number(n) => write!(f, "{}", format_number(*n)),
      Value::Text(s) => write!(f, "{}", s),
      Value::Bool(b) => write!(f, "{}", b),
      Value::List(items) => {
        let parts: Vec<String> = items.iter().map(|i| i.to_string()).collect();
        write!(f, "[{}]", parts.join(", "))
      }
    }
  }
}
