//! Async batch stages. Each stage reads payloads from an `in` stream and writes them to an
//! `out` stream, or to an `error` stream as a [StageFailure](crate::types::StageFailure).

mod execute_stage;
mod parse_stage;
mod stage;
mod validate_stage;

pub use execute_stage::ExecuteStage;
pub use parse_stage::ParseStage;
pub use stage::{FailureStream, PayloadStream, Stage, StageOutputs, spawn_stage};
pub use validate_stage::ValidateStage;
