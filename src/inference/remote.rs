//! Client for an external inference runtime speaking the OpenAI completions API.
//!
//! - POST {base_url}/v1/completions
//! - GET {base_url}/v1/models (readiness check)

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ModelConfig;
use crate::inference::model::{truncate_chars, ModelError, NoteModel, SUMMARIZE_PREFIX};

/// Completion request body.
#[derive(Debug, Serialize)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub max_tokens: usize,
    pub temperature: f64,
    pub stream: bool,
}

#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    pub text: String,
}

/// Model served by a remote runtime.
pub struct RemoteModel {
    client: reqwest::Client,
    base_url: String,
    model: String,
    max_tokens: usize,
    summary_max_tokens: usize,
    summary_max_chars: usize,
    temperature: f64,
}

impl RemoteModel {
    pub fn new(config: &ModelConfig) -> Result<Self, ModelError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ModelError::LoadFailed(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            summary_max_tokens: config.summary_max_tokens,
            summary_max_chars: config.summary_max_chars,
            temperature: config.temperature,
        })
    }

    async fn complete(&self, prompt: &str, max_tokens: usize) -> Result<String, ModelError> {
        let body = CompletionRequest {
            model: &self.model,
            prompt,
            max_tokens,
            temperature: self.temperature,
            stream: false,
        };

        let resp = self
            .client
            .post(format!("{}/v1/completions", self.base_url))
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ModelError::Status { status, body });
        }

        let parsed: CompletionResponse = resp.json().await?;
        let text = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.text)
            .ok_or(ModelError::EmptyResponse)?;

        debug!(chars = text.len(), max_tokens, "Completion received");
        Ok(text)
    }
}

#[async_trait]
impl NoteModel for RemoteModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, text: &str) -> Result<String, ModelError> {
        let continuation = self.complete(text, self.max_tokens).await?;
        Ok(format!("{text}{continuation}"))
    }

    async fn summarize(&self, text: &str) -> Result<String, ModelError> {
        let prompt = format!("{SUMMARIZE_PREFIX}{text}");
        let summary = self.complete(&prompt, self.summary_max_tokens).await?;
        Ok(truncate_chars(summary.trim(), self.summary_max_chars).to_string())
    }

    async fn check_ready(&self) -> Result<(), ModelError> {
        let resp = self
            .client
            .get(format!("{}/v1/models", self.base_url))
            .send()
            .await?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(ModelError::Status {
                status: resp.status().as_u16(),
                body: resp.text().await.unwrap_or_default(),
            })
        }
    }
}
