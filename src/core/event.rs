//! Event structure

use super::level::Level;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Facility used when a producer passes an empty interface tag
pub const DEFAULT_IFACE: &str = "Application";

/// A positional argument substituted into an event's message template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Param {
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Char(char),
    Str(String),
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Int(v) => write!(f, "{}", v),
            Param::Uint(v) => write!(f, "{}", v),
            Param::Float(v) => write!(f, "{}", v),
            Param::Bool(v) => write!(f, "{}", v),
            Param::Char(v) => write!(f, "{}", v),
            Param::Str(v) => f.write_str(v),
        }
    }
}

macro_rules! impl_param_from {
    ($variant:ident as $target:ty: $($source:ty),+) => {
        $(
            impl From<$source> for Param {
                fn from(value: $source) -> Self {
                    Param::$variant(value as $target)
                }
            }
        )+
    };
}

impl_param_from!(Int as i64: i8, i16, i32, i64, isize);
impl_param_from!(Uint as u64: u8, u16, u32, u64, usize);
impl_param_from!(Float as f64: f32, f64);

impl From<bool> for Param {
    fn from(value: bool) -> Self {
        Param::Bool(value)
    }
}

impl From<char> for Param {
    fn from(value: char) -> Self {
        Param::Char(value)
    }
}

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Param::Str(value.to_string())
    }
}

impl From<String> for Param {
    fn from(value: String) -> Self {
        Param::Str(value)
    }
}

impl From<&String> for Param {
    fn from(value: &String) -> Self {
        Param::Str(value.clone())
    }
}

/// One log call: a level, the emitting facility, a printf-style template
/// and its positional arguments.
///
/// Events are immutable once queued and consumed exactly once by the
/// worker. Hooks receive the event as the producer built it; the formatted
/// text is only materialized inside the worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub level: Level,
    pub iface: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<Param>,
}

impl Event {
    /// Build an event; an empty `iface` is replaced by [`DEFAULT_IFACE`]
    pub fn new(level: Level, iface: impl Into<String>, message: impl Into<String>) -> Self {
        let mut iface = iface.into();
        if iface.is_empty() {
            iface = DEFAULT_IFACE.to_string();
        }
        Self {
            level,
            iface,
            message: message.into(),
            params: Vec::new(),
        }
    }

    pub fn with_params(mut self, params: Vec<Param>) -> Self {
        self.params = params;
        self
    }
}
