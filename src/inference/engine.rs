//! Model worker: owns the model and runs one inference job at a time.
//!
//! Handlers enqueue a [`ModelJob`] through a cloneable [`ModelHandle`] and
//! await the reply. Jobs run in arrival order, so concurrent submissions
//! serialize behind the model while the HTTP event loop stays free. A job
//! whose caller stopped waiting (timeout, client disconnect) is skipped.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::inference::model::{ModelError, NoteModel};

/// Which model operation a job runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelOp {
    Generate,
    Summarize,
}

impl ModelOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelOp::Generate => "generate",
            ModelOp::Summarize => "summarize",
        }
    }
}

impl fmt::Display for ModelOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A queued inference job.
pub struct ModelJob {
    /// Request ID for log correlation.
    pub request_id: String,

    pub op: ModelOp,

    pub text: String,

    reply: oneshot::Sender<Result<String, ModelError>>,
}

/// Sending side of the worker queue.
#[derive(Clone)]
pub struct ModelHandle {
    tx: mpsc::Sender<ModelJob>,
    model_name: Arc<str>,
}

impl ModelHandle {
    /// Spawn the worker task and return a handle to it.
    pub fn spawn(model: Arc<dyn NoteModel>, queue_depth: usize) -> Self {
        let (tx, mut rx) = mpsc::channel::<ModelJob>(queue_depth.max(1));
        let model_name: Arc<str> = Arc::from(model.name());

        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                if job.reply.is_closed() {
                    debug!(
                        request_id = job.request_id,
                        op = %job.op,
                        "Caller gone, skipping job"
                    );
                    continue;
                }

                let started = Instant::now();
                let result = match job.op {
                    ModelOp::Generate => model.generate(&job.text).await,
                    ModelOp::Summarize => model.summarize(&job.text).await,
                };

                match &result {
                    Ok(out) => info!(
                        request_id = job.request_id,
                        op = %job.op,
                        input_chars = job.text.len(),
                        output_chars = out.len(),
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Inference complete"
                    ),
                    Err(e) => warn!(
                        request_id = job.request_id,
                        op = %job.op,
                        "Inference failed: {e}"
                    ),
                }

                // Caller may have gone away; nothing to do then.
                let _ = job.reply.send(result);
            }
            info!("Model worker stopped");
        });

        Self { tx, model_name }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Run `op` on `text` and wait for the result.
    pub async fn run(
        &self,
        request_id: &str,
        op: ModelOp,
        text: String,
    ) -> Result<String, ModelError> {
        let (reply, rx) = oneshot::channel();
        let job = ModelJob {
            request_id: request_id.to_string(),
            op,
            text,
            reply,
        };

        self.tx.send(job).await.map_err(|_| ModelError::WorkerGone)?;
        rx.await.map_err(|_| ModelError::WorkerGone)?
    }
}
