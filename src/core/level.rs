//! Log level definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of an event, ordered from least to most severe.
///
/// Levels key every per-level table in the engine (drop counters, file
/// routes, hook lists, console omission), so the discriminants are stable
/// and dense: `level.index()` is always in `0..Level::COUNT`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum Level {
    Debug = 0,
    #[default]
    Info = 1,
    Success = 2,
    Warning = 3,
    Fail = 4,
    Error = 5,
    Catastrophe = 6,
}

impl Level {
    pub const COUNT: usize = 7;

    /// Every level in ascending severity
    pub const ALL: [Level; Level::COUNT] = [
        Level::Debug,
        Level::Info,
        Level::Success,
        Level::Warning,
        Level::Fail,
        Level::Error,
        Level::Catastrophe,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Success => "SUCCESS",
            Level::Warning => "WARNING",
            Level::Fail => "FAIL",
            Level::Error => "ERROR",
            Level::Catastrophe => "CATASTROPHE",
        }
    }

    #[inline]
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Color of the level tag on an interactive console
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            Level::Debug => BrightBlack,
            Level::Info => Blue,
            Level::Success => Green,
            Level::Warning => Yellow,
            Level::Fail => Magenta,
            Level::Error => Red,
            Level::Catastrophe => Red,
        }
    }

    /// Color of the message body, `None` for the neutral default
    pub fn message_color(&self) -> Option<colored::Color> {
        use colored::Color::*;
        match self {
            Level::Success => Some(Green),
            Level::Warning => Some(Yellow),
            Level::Fail | Level::Error | Level::Catastrophe => Some(Red),
            Level::Debug | Level::Info => None,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Level::Debug => "🔍",
            Level::Info => "ℹ️",
            Level::Success => "✅",
            Level::Warning => "⚠️",
            Level::Fail => "❌",
            Level::Error => "🔴",
            Level::Catastrophe => "💥",
        }
    }

    /// Whether a space separates the emoji from the level name.
    ///
    /// The Info and Warning glyphs carry a variation selector and render
    /// one cell wide on most terminals.
    pub(crate) fn emoji_needs_space(&self) -> bool {
        matches!(self, Level::Info | Level::Warning)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DEBUG" => Ok(Level::Debug),
            "INFO" => Ok(Level::Info),
            "SUCCESS" => Ok(Level::Success),
            "WARNING" | "WARN" => Ok(Level::Warning),
            "FAIL" => Ok(Level::Fail),
            "ERROR" => Ok(Level::Error),
            "CATASTROPHE" | "FATAL" => Ok(Level::Catastrophe),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}

impl TryFrom<u8> for Level {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, String> {
        Level::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| format!("Invalid log level index: {}", value))
    }
}
