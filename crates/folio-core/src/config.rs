//! Configuration for the Folio engine.

use crate::CoreError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Which coordinator backend runs the engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// Fixed pool of worker threads
    #[default]
    Pool,

    /// Single-threaded cooperative scheduler
    EventLoop,
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Coordinator backend
    #[serde(default)]
    pub backend: Backend,

    /// Worker threads for the pool backend
    #[serde(default = "default_worker_threads")]
    pub worker_threads: usize,

    /// Timeout for one top-level operation, in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Skip dot-files and dot-directories while building
    #[serde(default)]
    pub skip_hidden: bool,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_worker_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".folio")
        .join("config.yaml")
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            worker_threads: default_worker_threads(),
            timeout_ms: default_timeout_ms(),
            skip_hidden: false,
            log_level: default_log_level(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from `~/.folio/config.yaml`, falling back to defaults
    pub fn load() -> Self {
        let config_path = default_config_path();

        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_yaml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config file: {}", e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config file: {}", e);
                }
            }
        }

        Self::default()
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CoreError::Config(format!("{}: {}", path.display(), e)))?;
        serde_yaml::from_str(&content)
            .map_err(|e| CoreError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.worker_threads == 0 {
            return Err(CoreError::Config("worker_threads must be at least 1".into()));
        }
        if self.timeout_ms == 0 {
            return Err(CoreError::Config("timeout_ms must be positive".into()));
        }
        Ok(())
    }

    /// Top-level operation timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
