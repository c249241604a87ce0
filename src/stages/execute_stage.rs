//! Execute stage: runs the program on a fresh [Engine].

use async_trait::async_trait;
use tracing::{info, instrument};

use super::Stage;
use crate::engine::Engine;
use crate::types::GlyphPayload;

pub struct ExecuteStage {
  name: String,
}

impl ExecuteStage {
  pub fn new(name: impl Into<String>) -> Self {
    Self { name: name.into() }
  }
}

#[async_trait]
impl Stage for ExecuteStage {
  fn name(&self) -> &str {
    &self.name
  }

  /// A halted run is still a processed unit: its result records the failure.
  #[instrument(level = "trace", skip(self, payload), fields(unit = %payload.name))]
  async fn process(&self, mut payload: GlyphPayload) -> Result<GlyphPayload, String> {
    let program = payload.program.clone().ok_or("missing program")?;
    let mut engine = Engine::new();
    engine.load_program(program).map_err(|e| e.to_string())?;
    let result = engine.execute().await.map_err(|e| e.to_string())?;
    info!(unit = %payload.name, success = result.success, "unit executed");
    payload.result = Some(result);
    Ok(payload)
  }
}
