//! Engine configuration
//!
//! A [`Config`] is read once when the agent is constructed; there is no live
//! reconfiguration. Every group deserializes with defaults for missing
//! fields, so a JSON file only needs to name what it changes:
//!
//! ```
//! use rust_clog::{Config, DropPolicy, Level};
//!
//! let config = Config::from_json_str(r#"{
//!     "queue_capacity": 64,
//!     "drop_policy": "drop_old",
//!     "file": { "base_dir": "logs", "per_level": { "ERROR": "errors.log" } }
//! }"#).unwrap();
//!
//! assert_eq!(config.drop_policy, DropPolicy::DropOld);
//! assert_eq!(config.file.per_level[&Level::Error], "errors.log");
//! assert!(config.dedupe.enabled);
//! ```

use super::dedupe::DEFAULT_SUMMARY_FORMAT;
use super::drop_policy::DropPolicy;
use super::error::{LoggerError, Result};
use super::hooks::{Hook, HooksConfig};
use super::level::Level;
use super::timestamp::TimestampFormat;
use crate::pcm::AudioConfig;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const DEFAULT_QUEUE_CAPACITY: usize = 1000;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub queue_capacity: usize,
    pub drop_policy: DropPolicy,
    pub console: ConsoleConfig,
    pub file: FileConfig,
    pub dedupe: DedupeConfig,
    pub audio: AudioConfig,
    #[serde(skip)]
    pub hooks: HooksConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            drop_policy: DropPolicy::default(),
            console: ConsoleConfig::default(),
            file: FileConfig::default(),
            dedupe: DedupeConfig::default(),
            audio: AudioConfig::default(),
            hooks: HooksConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub enabled: bool,
    /// Request colors and emoji; honored only on a color-capable terminal
    pub colors: bool,
    pub omit_levels: BTreeSet<Level>,
    pub timestamp_format: TimestampFormat,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            colors: false,
            omit_levels: BTreeSet::new(),
            timestamp_format: TimestampFormat::default(),
        }
    }
}

/// Per-level file routing. Without a `base_dir` the file sink is disabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub base_dir: Option<PathBuf>,
    /// Filename (relative to `base_dir`) per level; empty means not persisted
    pub per_level: BTreeMap<Level, String>,
}

impl FileConfig {
    pub fn is_enabled(&self) -> bool {
        self.base_dir
            .as_deref()
            .is_some_and(|dir| !dir.as_os_str().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupeConfig {
    pub enabled: bool,
    /// printf-style template with one integer placeholder for the repeat count
    pub summary_format: String,
}

impl Default for DedupeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            summary_format: DEFAULT_SUMMARY_FORMAT.to_string(),
        }
    }
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation("reading config file", path.display().to_string(), e)
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.queue_capacity == 0 {
            return Err(LoggerError::config(
                "queue",
                "queue_capacity must be at least 1",
            ));
        }
        if self.audio.enabled {
            self.audio.validate()?;
        }
        Ok(())
    }

    /// Route `level` to `filename` under the file sink's base directory
    #[must_use]
    pub fn route_level(mut self, level: Level, filename: impl Into<String>) -> Self {
        self.file.per_level.insert(level, filename.into());
        self
    }

    #[must_use]
    pub fn omit_console_level(mut self, level: Level) -> Self {
        self.console.omit_levels.insert(level);
        self
    }

    #[must_use]
    pub fn add_hook(mut self, hook: Arc<dyn Hook>) -> Self {
        self.hooks.global.push(hook);
        self
    }

    #[must_use]
    pub fn add_level_hook(mut self, level: Level, hook: Arc<dyn Hook>) -> Self {
        self.hooks.per_level.entry(level).or_default().push(hook);
        self
    }
}
