//! Audio logging configuration

use super::WavSpec;
use crate::core::{LoggerError, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::path::PathBuf;

pub const DEFAULT_FILENAME_PATTERN: &str = "audio_%Y%m%d_%H%M%S.wav";

/// Where and how raw PCM frames are persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub enabled: bool,
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    pub output_dir: PathBuf,
    /// strftime pattern rendered with local time when the file is created
    pub filename_pattern: Option<String>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            sample_rate: 48_000,
            channels: 1,
            bits_per_sample: 16,
            output_dir: PathBuf::from("audio_logs"),
            filename_pattern: None,
        }
    }
}

impl AudioConfig {
    /// Check the format fields; the file layout only supports 16-bit PCM
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(LoggerError::config("audio", "sample_rate must be positive"));
        }
        if self.channels == 0 {
            return Err(LoggerError::config("audio", "channels must be positive"));
        }
        if self.bits_per_sample != 16 {
            return Err(LoggerError::config(
                "audio",
                format!("bits_per_sample must be 16, got {}", self.bits_per_sample),
            ));
        }
        WavSpec::from(self).validate()
    }

    /// Render the output filename for a writer created at `at`
    pub fn render_filename(&self, at: &DateTime<Local>) -> Result<String> {
        let pattern = self
            .filename_pattern
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_FILENAME_PATTERN);

        let mut name = String::new();
        write!(name, "{}", at.format(pattern)).map_err(|_| {
            LoggerError::config("audio", format!("invalid filename pattern '{}'", pattern))
        })?;
        if name.is_empty() {
            return Err(LoggerError::config("audio", "filename pattern renders empty"));
        }
        Ok(name)
    }
}
