//! Runtime configuration for notakers.
//!
//! Configuration is loaded from a JSON file or constructed programmatically.
//! Command-line flags override the matching file values.

use std::path::{Path, PathBuf};

use clap::Parser;
use serde::{Deserialize, Serialize};

/// Command-line arguments.
#[derive(Parser, Debug, Clone)]
#[command(name = "notakers", about = "Note structuring and live broadcast server")]
pub struct Cli {
    /// Path to configuration file (JSON).
    #[arg(short, long, default_value = "config.json")]
    pub config: PathBuf,

    /// HTTP listen address. Overrides `server.listen`.
    #[arg(long)]
    pub listen: Option<String>,

    /// Notes file. Overrides `storage.data_file`.
    #[arg(long)]
    pub data_file: Option<PathBuf>,

    /// Enable verbose logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines.
    #[arg(long)]
    pub log_json: bool,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,

    /// Inference runtime configuration.
    pub model: ModelConfig,

    /// Note storage.
    pub storage: StorageConfig,

    /// Submission pipeline.
    pub notes: NotesConfig,

    /// WebSocket fan-out.
    pub broadcast: BroadcastConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address (e.g. "0.0.0.0:8000").
    pub listen: String,

    /// Request timeout in seconds, applied to plain HTTP routes.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8000".to_string(),
            request_timeout_secs: 300,
        }
    }
}

/// Which model implementation serves requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelBackend {
    /// External runtime with an OpenAI-compatible completions API.
    Remote,
    /// Deterministic in-process model, no runtime needed.
    Echo,
}

/// Inference runtime settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub backend: ModelBackend,

    /// Base URL of the runtime (without the `/v1` suffix).
    pub base_url: String,

    /// Model identifier passed to the runtime.
    pub model: String,

    /// Completion tokens for the structuring pipeline. Caps only the
    /// generated continuation; the prompt does not count against it.
    pub max_tokens: usize,

    /// Generation length for summaries.
    pub summary_max_tokens: usize,

    /// Summaries longer than this are cut on a char boundary.
    pub summary_max_chars: usize,

    /// Sampling temperature (0.0 = greedy).
    pub temperature: f64,

    /// Per-request timeout against the runtime.
    pub timeout_secs: u64,

    /// Fail startup if the runtime does not answer.
    pub check_on_start: bool,

    /// Pending jobs the model worker accepts before callers wait.
    pub queue_depth: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            backend: ModelBackend::Remote,
            base_url: "http://127.0.0.1:8080".to_string(),
            model: "gpt2".to_string(),
            max_tokens: 1024,
            summary_max_tokens: 130,
            summary_max_chars: 2048,
            temperature: 0.7,
            timeout_secs: 120,
            check_on_start: false,
            queue_depth: 16,
        }
    }
}

/// Note storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON array file holding every note.
    pub data_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("data.json"),
        }
    }
}

/// How submitted text becomes a stored note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pipeline {
    /// Generate, then format into headings and bullets.
    Structure,
    /// Store the model's summary.
    Summarize,
}

/// Submission pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotesConfig {
    pub pipeline: Pipeline,

    /// First line of every structured note.
    pub title: String,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            pipeline: Pipeline::Structure,
            title: "Your Great Note:".to_string(),
        }
    }
}

/// WebSocket fan-out settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BroadcastConfig {
    /// Outbound messages buffered per connection before drops.
    pub queue_capacity: usize,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self { queue_capacity: 64 }
    }
}

impl Config {
    /// Load configuration from a JSON file, falling back to defaults for missing fields.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let data = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&data)?;
            Ok(config)
        } else {
            tracing::warn!("Config file not found at {:?}, using defaults", path);
            Ok(Config::default())
        }
    }

    /// Apply command-line overrides.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(listen) = &cli.listen {
            self.server.listen = listen.clone();
        }
        if let Some(data_file) = &cli.data_file {
            self.storage.data_file = data_file.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = Config::default();
        assert_eq!(cfg.model.max_tokens, 1024);
        assert_eq!(cfg.model.summary_max_tokens, 130);
        assert_eq!(cfg.storage.data_file, PathBuf::from("data.json"));
        assert_eq!(cfg.notes.pipeline, Pipeline::Structure);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let cfg: Config =
            serde_json::from_str(r#"{"model": {"backend": "echo"}, "notes": {"pipeline": "summarize"}}"#)
                .unwrap();
        assert_eq!(cfg.model.backend, ModelBackend::Echo);
        assert_eq!(cfg.model.base_url, "http://127.0.0.1:8080");
        assert_eq!(cfg.notes.pipeline, Pipeline::Summarize);
        assert_eq!(cfg.server.listen, "0.0.0.0:8000");
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from(["notakers", "--listen", "127.0.0.1:9000", "--data-file", "/tmp/n.json"]);
        let mut cfg = Config::default();
        cfg.apply_cli(&cli);
        assert_eq!(cfg.server.listen, "127.0.0.1:9000");
        assert_eq!(cfg.storage.data_file, PathBuf::from("/tmp/n.json"));
    }
}
