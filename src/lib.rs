//! # Rust CLog
//!
//! An asynchronous, in-process logging engine. Any number of producer
//! threads emit leveled events without blocking; a single background worker
//! formats, deduplicates and fans them out to sinks and hooks, while atomic
//! counters track what was accepted, emitted and dropped.
//!
//! ## Features
//!
//! - **Bounded queue**: `drop_new` or `drop_old` backpressure, never blocking callers
//! - **Duplicate suppression**: consecutive repeats collapse into one summary line
//! - **Sinks**: colored console output and per-level append-only files
//! - **Hooks**: global and per-level observers of every emitted event
//! - **Audio logging**: streaming 16-bit PCM WAV writer with a backpatched header
//! - **Lifecycle**: bounded-time graceful shutdown, signal and panic integration
//!
//! ## Example
//!
//! ```
//! use rust_clog::prelude::*;
//! use std::time::Duration;
//!
//! let config = Config::default().omit_console_level(Level::Debug);
//! api::init(config);
//!
//! rust_clog::info!("Main", "started with %d workers", 4);
//! rust_clog::debug!("Main", "not shown on the console");
//!
//! api::shutdown(Duration::from_secs(1));
//! ```

pub mod api;
pub mod core;
pub mod macros;
pub mod pcm;
pub mod recovery;
#[cfg(feature = "signal")]
pub mod signal;
pub mod sinks;

pub mod prelude {
    pub use crate::api;
    pub use crate::core::{
        Agent, AgentBuilder, AgentState, Config, DropPolicy, Event, Hook, Level, LoggerError,
        LoggerStats, Param, Result, Sink, Stats, TimestampFormat, DEFAULT_SHUTDOWN_TIMEOUT,
    };
    pub use crate::pcm::{AudioConfig, WavWriter};
}

pub use crate::core::{
    Agent, AgentBuilder, AgentState, Config, ConsoleConfig, DedupeConfig, DropPolicy, Event,
    FileConfig, FixedProbe, Hook, HooksConfig, Level, LoggerError, LoggerStats, Param, Result,
    Sink, Stats, StdoutProbe, TerminalProbe, TimestampFormat, DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use crate::pcm::{AudioConfig, WavSpec, WavWriter};
pub use crate::sinks::{ConsoleSink, FileSink};
