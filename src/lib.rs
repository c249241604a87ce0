//! # glyph-flow
//!
//! Parser, scheduler and interpreter for Glyph, a small symbolic dataflow language.
//!
//! ## Architecture
//!
//! Source text flows through the core leaves first:
//!
//! - [tokenizer]: one source line → node-literal and connector tokens.
//! - [graph_builder]: tokens → [Program] (nodes in a flat arena, edges by id); [parse] is the
//!   entry point.
//! - [validator]: structural checks collected into a [ValidationReport].
//! - [scheduler]: deterministic Kahn ordering; cycles are a [CycleError].
//! - [engine]: load/execute state machine dispatching function nodes to [builtins].
//!
//! [runner] chains these for one source; [pipeline] runs many sources through async
//! Parse → Validate → Execute [stages].

pub mod builtins;
pub mod engine;
pub mod error;
pub mod execution_log_io;
pub mod graph_builder;
pub mod pipeline;
pub mod runner;
pub mod scheduler;
pub mod stages;
pub mod tokenizer;
#[cfg(test)]
mod tokenizer_test;
pub mod types;
pub mod validator;

pub use builtins::Operation;
pub use engine::Engine;
pub use error::{CycleError, ExecutionError, FlowError, SyntaxError};
pub use graph_builder::parse;
pub use pipeline::{PipelineOptions, PipelineReport, run_batch};
pub use runner::{RunOptions, RunReport, run_program, run_source};
pub use scheduler::schedule;
pub use types::{
  EngineState, ExecutionRecord, ExecutionResult, Node, NodeId, NodeKind, Program, Value,
};
pub use validator::{ValidationReport, Violation, ViolationKind, validate};
