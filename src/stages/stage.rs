//! The [Stage] trait and the task that drives one stage over a stream.

use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, instrument};

use crate::types::{GlyphPayload, StageFailure};

pub type PayloadStream = Pin<Box<dyn Stream<Item = GlyphPayload> + Send>>;
pub type FailureStream = Pin<Box<dyn Stream<Item = StageFailure> + Send>>;

/// Channel capacity between stages.
const STAGE_BUFFER: usize = 16;

/// Output ports of a running stage.
pub struct StageOutputs {
  pub out: PayloadStream,
  pub error: FailureStream,
}

/// One step of the batch pipeline.
#[async_trait]
pub trait Stage: Send + Sync + 'static {
  fn name(&self) -> &str;

  /// Transforms one payload; an `Err` routes the unit to the error stream.
  async fn process(&self, payload: GlyphPayload) -> Result<GlyphPayload, String>;
}

/// Spawns a task that feeds every payload from `input` through `stage`.
///
/// Both output streams end once `input` is exhausted.
#[instrument(level = "trace", skip(stage, input), fields(stage = stage.name()))]
pub fn spawn_stage<S: Stage>(stage: Arc<S>, input: PayloadStream) -> StageOutputs {
  let (out_tx, out_rx) = tokio::sync::mpsc::channel(STAGE_BUFFER);
  let (err_tx, err_rx) = tokio::sync::mpsc::channel(STAGE_BUFFER);

  tokio::spawn(async move {
    let mut s = input;
    while let Some(payload) = s.next().await {
      let (index, unit) = (payload.index, payload.name.clone());
      match stage.process(payload).await {
        Ok(next) => {
          let _ = out_tx.send(next).await;
        }
        Err(message) => {
          debug!(stage = stage.name(), unit = %unit, %message, "unit rejected");
          let _ = err_tx
            .send(StageFailure::new(index, unit, stage.name(), message))
            .await;
        }
      }
    }
  });

  StageOutputs {
    out: Box::pin(ReceiverStream::new(out_rx)),
    error: Box::pin(ReceiverStream::new(err_rx)),
  }
}
