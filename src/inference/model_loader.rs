//! Builds the configured model backend and checks that it is usable.

use std::sync::Arc;

use tracing::{error, info};

use crate::config::{ModelBackend, ModelConfig};
use crate::inference::model::{EchoModel, ModelError, NoteModel};
use crate::inference::remote::RemoteModel;

/// Construct the model for `config`.
///
/// With `check_on_start`, an unreachable runtime is a load failure. Failures
/// are logged here and returned to the caller.
pub async fn load_model(config: &ModelConfig) -> Result<Arc<dyn NoteModel>, ModelError> {
    let model: Arc<dyn NoteModel> = match config.backend {
        ModelBackend::Echo => Arc::new(EchoModel::new(config.summary_max_chars)),
        ModelBackend::Remote => match RemoteModel::new(config) {
            Ok(m) => Arc::new(m),
            Err(e) => {
                error!("Error loading model: {e}");
                return Err(e);
            }
        },
    };

    if config.check_on_start {
        if let Err(e) = model.check_ready().await {
            error!(
                backend = ?config.backend,
                base_url = config.base_url,
                "Error loading model: {e}"
            );
            return Err(ModelError::LoadFailed(e.to_string()));
        }
    }

    info!(
        backend = ?config.backend,
        model = model.name(),
        max_tokens = config.max_tokens,
        summary_max_tokens = config.summary_max_tokens,
        "Model ready"
    );

    Ok(model)
}
