//! Builtin operation library dispatched by function nodes.
//!
//! The operation set is closed: [Operation] is an enum and every operation's arity and
//! reduction rule is decided by an exhaustive match.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{instrument, trace};

use crate::error::ExecutionError;
use crate::types::{Value, parse_number};

static EMBEDDED_NUMBER: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"[+-]?\d+(\.\d+)?").expect("embedded number regex"));
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// Accepted input count of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
  Exactly(usize),
  AtLeast(usize),
}

impl Arity {
  pub fn accepts(&self, count: usize) -> bool {
    match self {
      Arity::Exactly(n) => count == *n,
      Arity::AtLeast(n) => count >= *n,
    }
  }
}

impl fmt::Display for Arity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Arity::Exactly(n) => write!(f, "exactly {}", n),
      Arity::AtLeast(n) => write!(f, "at least {}", n),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
  Add,
  Multiply,
  Subtract,
  Divide,
  Power,
  Concat,
  Print,
  ToUpper,
  ToLower,
  Length,
  ToNumber,
  ToString,
  ParseTextToNumber,
  CleanMixedInput,
  IsValidAge,
  Trim,
}

/// Result of applying an operation: the value plus an output line for sinks.
#[derive(Debug, Clone, PartialEq)]
pub struct Applied {
  pub value: Value,
  pub emitted: Option<String>,
}

impl Applied {
  fn value(value: Value) -> Self {
    Self {
      value,
      emitted: None,
    }
  }
}

impl Operation {
  pub const ALL: [Operation; 16] = [
    Operation::Add,
    Operation::Multiply,
    Operation::Subtract,
    Operation::Divide,
    Operation::Power,
    Operation::Concat,
    Operation::Print,
    Operation::ToUpper,
    Operation::ToLower,
    Operation::Length,
    Operation::ToNumber,
    Operation::ToString,
    Operation::ParseTextToNumber,
    Operation::CleanMixedInput,
    Operation::IsValidAge,
    Operation::Trim,
  ];

  pub fn from_name(name: &str) -> Option<Self> {
    Operation::ALL.iter().copied().find(|op| op.name() == name)
  }

  /// Like [Operation::from_name] but fails with [ExecutionError::UnknownOperation].
  pub fn lookup(name: &str) -> Result<Self, ExecutionError> {
    Operation::from_name(name).ok_or_else(|| ExecutionError::UnknownOperation {
      name: name.to_string(),
    })
  }

  pub fn name(&self) -> &'static str {
    match self {
      Operation::Add => "add",
      Operation::Multiply => "multiply",
      Operation::Subtract => "subtract",
      Operation::Divide => "divide",
      Operation::Power => "power",
      Operation::Concat => "concat",
      Operation::Print => "print",
      Operation::ToUpper => "to_upper",
      Operation::ToLower => "to_lower",
      Operation::Length => "length",
      Operation::ToNumber => "to_number",
      Operation::ToString => "to_string",
      Operation::ParseTextToNumber => "parse_text_to_number",
      Operation::CleanMixedInput => "clean_mixed_input",
      Operation::IsValidAge => "is_valid_age",
      Operation::Trim => "trim",
    }
  }

  pub fn arity(&self) -> Arity {
    match self {
      Operation::Add
      | Operation::Multiply
      | Operation::Subtract
      | Operation::Divide
      | Operation::Power => Arity::AtLeast(2),
      Operation::Concat | Operation::Print => Arity::AtLeast(1),
      Operation::ToUpper
      | Operation::ToLower
      | Operation::Length
      | Operation::ToNumber
      | Operation::ToString
      | Operation::ParseTextToNumber
      | Operation::CleanMixedInput
      | Operation::IsValidAge
      | Operation::Trim => Arity::Exactly(1),
    }
  }

  /// Applies the operation to positional `inputs`.
  #[instrument(level = "trace", skip(self, inputs), fields(op = self.name(), input_count = inputs.len()))]
  pub fn apply(&self, inputs: &[Value]) -> Result<Applied, ExecutionError> {
    let arity = self.arity();
    if !arity.accepts(inputs.len()) {
      return Err(ExecutionError::Arity {
        operation: self.name().to_string(),
        expected: arity.to_string(),
        actual: inputs.len(),
      });
    }

    let applied = match self {
      Operation::Add => Applied::value(self.fold(inputs, 0.0, |a, b| a + b)?),
      Operation::Multiply => Applied::value(self.fold(inputs, 1.0, |a, b| a * b)?),
      Operation::Subtract => Applied::value(self.reduce(inputs, |a, b| Ok(a - b))?),
      Operation::Divide => Applied::value(self.reduce(inputs, |a, b| {
        if b == 0.0 {
          Err(ExecutionError::DivisionByZero {
            operation: self.name().to_string(),
          })
        } else {
          Ok(a / b)
        }
      })?),
      Operation::Power => Applied::value(self.reduce(inputs, |a, b| Ok(a.powf(b)))?),
      Operation::Concat => {
        let joined: String = inputs.iter().map(|v| v.to_string()).collect();
        Applied::value(Value::Text(joined))
      }
      Operation::Print => {
        let first = inputs[0].clone();
        Applied {
          emitted: Some(format!("PRINT: {}", first)),
          value: first,
        }
      }
      Operation::ToUpper => Applied::value(Value::Text(inputs[0].to_string().to_uppercase())),
      Operation::ToLower => Applied::value(Value::Text(inputs[0].to_string().to_lowercase())),
      Operation::Length => {
        let len = match &inputs[0] {
          Value::List(items) => items.len(),
          other => other.to_string().chars().count(),
        };
        Applied::value(Value::Number(len as f64))
      }
      Operation::ToNumber => Applied::value(Value::Number(self.to_number(&inputs[0])?)),
      Operation::ToString => Applied::value(Value::Text(inputs[0].to_string())),
      Operation::ParseTextToNumber => {
        Applied::value(Value::Number(self.embedded_number(&inputs[0])?))
      }
      Operation::CleanMixedInput => Applied::value(Value::Text(clean_mixed(&inputs[0]))),
      Operation::IsValidAge => {
        let n = self.to_number(&inputs[0])?;
        let valid = n.fract() == 0.0 && (0.0..=150.0).contains(&n);
        Applied::value(Value::Bool(valid))
      }
      Operation::Trim => Applied::value(Value::Text(inputs[0].to_string().trim().to_string())),
    };
    trace!(result = %applied.value, "applied");
    Ok(applied)
  }

  /// Commutative fold from `unit` over all inputs.
  fn fold(
    &self,
    inputs: &[Value],
    unit: f64,
    f: impl Fn(f64, f64) -> f64,
  ) -> Result<Value, ExecutionError> {
    let mut acc = unit;
    for v in inputs {
      acc = f(acc, self.operand(v)?);
    }
    self.finite(acc)
  }

  /// Left-associative reduction: first input combined with each following one in order.
  fn reduce(
    &self,
    inputs: &[Value],
    f: impl Fn(f64, f64) -> Result<f64, ExecutionError>,
  ) -> Result<Value, ExecutionError> {
    let mut acc = self.operand(&inputs[0])?;
    for v in &inputs[1..] {
      acc = f(acc, self.operand(v)?)?;
    }
    self.finite(acc)
  }

  fn finite(&self, n: f64) -> Result<Value, ExecutionError> {
    if n.is_nan() {
      return Err(self.coercion("result is not a number".to_string()));
    }
    Ok(Value::Number(n))
  }

  /// Arithmetic operand: a number or numeric text.
  fn operand(&self, v: &Value) -> Result<f64, ExecutionError> {
    match v {
      Value::Number(n) => Ok(*n),
      Value::Text(s) => parse_number(s.trim())
        .ok_or_else(|| self.coercion(format!("cannot use {:?} as a number", s))),
      other => Err(self.coercion(format!(
        "cannot use {} value '{}' as a number",
        other.type_name(),
        other
      ))),
    }
  }

  fn to_number(&self, v: &Value) -> Result<f64, ExecutionError> {
    match v {
      Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
      other => self.operand(other),
    }
  }

  fn embedded_number(&self, v: &Value) -> Result<f64, ExecutionError> {
    if let Value::Number(n) = v {
      return Ok(*n);
    }
    let text = v.to_string();
    EMBEDDED_NUMBER
      .find(&text)
      .and_then(|m| m.as_str().parse::<f64>().ok())
      .ok_or_else(|| self.coercion(format!("no number found in {:?}", text)))
  }

  fn coercion(&self, message: String) -> ExecutionError {
    ExecutionError::TypeCoercion {
      operation: self.name().to_string(),
      message,
    }
  }
}

impl fmt::Display for Operation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.name())
  }
}

/// Trims, strips one pair of surrounding quotes and collapses whitespace runs.
fn clean_mixed(v: &Value) -> String {
  let text = v.to_string();
  let mut s = text.trim();
  for quote in ['"', '\''] {
    if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
      s = s[1..s.len() - 1].trim();
      break;
    }
  }
  WHITESPACE_RUN.replace_all(s, " ").into_owned()
}
