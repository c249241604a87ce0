//! Glyph program and execution types.
//!
//! Programs are plain data (nodes in a flat arena, edges by id) so they serialize to JSON for
//! display and can be copied freely between stages.

mod edge;
#[cfg(test)]
mod edge_test;
mod engine_state;
mod execution_log;
mod execution_record;
mod execution_result;
mod graph_payload;
mod node;
mod program;
#[cfg(test)]
mod program_test;
mod source_position;
mod value;

pub use edge::{Edge, FlowKind};
pub use engine_state::EngineState;
pub use execution_log::{EXECUTION_LOG_VERSION, ExecutionLog, ExecutionStepEntry};
pub use execution_record::ExecutionRecord;
pub use execution_result::{ExecutionResult, Statistics};
pub use graph_payload::{GlyphPayload, StageFailure};
pub(crate) use node::VARIATION_SELECTOR;
pub use node::{DeclaredType, Node, NodeKind};
pub use program::{MAIN_LABEL, Program};
pub use source_position::{NodeId, SourcePosition};
pub(crate) use value::parse_number;
pub use value::{Literal, Value};
