//! Configuration schema definitions.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use cronhook_protocols::{Event, SchedulerError};

pub use cronhook_protocols::TransportConfig;

use crate::loader::ConfigLoader;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub transport: TransportConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Static events seeded into the memory store.
    #[serde(default)]
    pub events: Vec<Event>,
}

/// Scheduling defaults and limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Retry delay used when an event leaves `retry_timeout` at zero.
    #[serde(default = "default_retry_timeout")]
    pub default_retry_timeout_seconds: u64,

    #[serde(default = "default_max_retries_cap")]
    pub max_retries_cap: u32,
}

fn default_retry_timeout() -> u64 {
    10
}

fn default_max_retries_cap() -> u32 {
    100
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            default_retry_timeout_seconds: default_retry_timeout(),
            max_retries_cap: default_max_retries_cap(),
        }
    }
}

impl SchedulerConfig {
    /// Apply the retry defaults to `event` and enforce the retry cap.
    pub fn prepare(&self, mut event: Event) -> Result<Event, SchedulerError> {
        if event.max_retries > self.max_retries_cap {
            return Err(SchedulerError::InvalidEvent(format!(
                "event {} asks for {} retries, the limit is {}",
                event.id, event.max_retries, self.max_retries_cap
            )));
        }
        if event.retry_timeout == 0 {
            event.retry_timeout = self.default_retry_timeout_seconds;
        }
        Ok(event)
    }
}

/// Event persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// `file` or `memory`.
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Directory of the file backend.
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

fn default_backend() -> String {
    "file".to_string()
}

fn default_store_path() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".cronhook").join("events"))
        .unwrap_or_else(|| PathBuf::from(".cronhook/events"))
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            path: default_store_path(),
        }
    }
}

impl StoreConfig {
    /// The store directory with `~` expanded.
    pub fn resolved_path(&self) -> PathBuf {
        ConfigLoader::expand_path(&self.path.to_string_lossy())
    }
}

/// Log output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,

    /// Daily-rotated log files go here when set.
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            directory: None,
        }
    }
}

impl LoggingConfig {
    pub fn resolved_directory(&self) -> Option<PathBuf> {
        self.directory.as_deref().map(ConfigLoader::expand_path)
    }
}

impl Config {
    /// Static events with the scheduler defaults applied.
    pub fn static_events(&self) -> Result<Vec<Event>, SchedulerError> {
        self.events
            .iter()
            .cloned()
            .map(|event| self.scheduler.prepare(event))
            .collect()
    }
}
