//! Parse stage: source text → [Program](crate::types::Program).

use async_trait::async_trait;
use tracing::instrument;

use super::Stage;
use crate::graph_builder::parse;
use crate::types::GlyphPayload;

pub struct ParseStage {
  name: String,
}

impl ParseStage {
  pub fn new(name: impl Into<String>) -> Self {
    Self { name: name.into() }
  }
}

#[async_trait]
impl Stage for ParseStage {
  fn name(&self) -> &str {
    &self.name
  }

  #[instrument(level = "trace", skip(self, payload), fields(unit = %payload.name))]
  async fn process(&self, mut payload: GlyphPayload) -> Result<GlyphPayload, String> {
    let program = parse(&payload.source).map_err(|e| e.to_string())?;
    payload.program = Some(program);
    Ok(payload)
  }
}
