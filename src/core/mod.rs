//! Core engine types and traits

pub mod agent;
pub mod config;
pub mod dedupe;
pub mod drop_policy;
pub mod error;
pub mod event;
pub mod format;
pub mod hooks;
pub mod level;
pub mod sink;
pub mod stats;
pub mod terminal;
pub mod timestamp;

pub use agent::{Agent, AgentBuilder, AgentState, DEFAULT_SHUTDOWN_TIMEOUT};
pub use config::{Config, ConsoleConfig, DedupeConfig, FileConfig, DEFAULT_QUEUE_CAPACITY};
pub use dedupe::{DedupeDecision, DedupeState, Summary, DEFAULT_SUMMARY_FORMAT};
pub use drop_policy::DropPolicy;
pub use error::{LoggerError, Result};
pub use event::{Event, Param, DEFAULT_IFACE};
pub use format::{format_message, sanitize_line};
pub use hooks::{Hook, HookDispatcher, HooksConfig};
pub use level::Level;
pub use sink::Sink;
pub use stats::{LoggerStats, Stats};
pub use terminal::{FixedProbe, StdoutProbe, TerminalProbe};
pub use timestamp::TimestampFormat;
