//! Validate stage: attaches a [ValidationReport](crate::validator::ValidationReport) and
//! optionally rejects invalid programs.

use async_trait::async_trait;
use tracing::instrument;

use super::Stage;
use crate::types::GlyphPayload;
use crate::validator::validate;

pub struct ValidateStage {
  name: String,
  /// Reject units whose program has validation errors.
  require_valid: bool,
}

impl ValidateStage {
  pub fn new(name: impl Into<String>, require_valid: bool) -> Self {
    Self {
      name: name.into(),
      require_valid,
    }
  }
}

#[async_trait]
impl Stage for ValidateStage {
  fn name(&self) -> &str {
    &self.name
  }

  #[instrument(level = "trace", skip(self, payload), fields(unit = %payload.name))]
  async fn process(&self, mut payload: GlyphPayload) -> Result<GlyphPayload, String> {
    let program = payload.program.as_ref().ok_or("missing program")?;
    let report = validate(program);
    if self.require_valid && !report.valid {
      let details: Vec<String> = report.errors.iter().map(|v| v.to_string()).collect();
      return Err(format!("validation failed: {}", details.join("; ")));
    }
    payload.validation = Some(report);
    Ok(payload)
  }
}
