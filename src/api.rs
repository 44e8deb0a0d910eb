//! Process-wide logger
//!
//! One agent per process, reachable from anywhere through free functions.
//! The first [`init`] starts it, later calls are ignored until [`shutdown`],
//! after which `init` may start a fresh agent. Logging while uninitialized
//! is silently ignored.
//!
//! ```
//! use rust_clog::{api, Config, Param};
//! use std::time::Duration;
//!
//! let mut config = Config::default();
//! config.console.enabled = false;
//! api::init(config);
//!
//! api::info("Server", "listening on port %d", vec![Param::from(8080)]);
//! assert!(api::is_initialized());
//!
//! api::shutdown(Duration::from_secs(1));
//! assert!(!api::is_initialized());
//! ```
//!
//! Statistics are process-wide: they accumulate across init/shutdown cycles.

use crate::core::{
    Agent, AgentBuilder, AgentState, Config, Event, Level, LoggerStats, Param, Result, Stats,
};
use parking_lot::{const_rwlock, RwLock};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

static AGENT: RwLock<Option<Arc<Agent>>> = const_rwlock(None);
static STATS: OnceLock<Arc<LoggerStats>> = OnceLock::new();

fn global_stats() -> &'static Arc<LoggerStats> {
    STATS.get_or_init(|| Arc::new(LoggerStats::new()))
}

fn current() -> Option<Arc<Agent>> {
    AGENT.read().clone()
}

/// Start the process-wide agent.
///
/// # Panics
///
/// Panics when a sink or the audio writer cannot be provisioned. Use
/// [`try_init`] to handle the error instead.
pub fn init(config: Config) {
    if let Err(e) = try_init(config) {
        panic!("failed to initialize logger: {}", e);
    }
}

/// Start the process-wide agent, returning construction errors.
///
/// A no-op returning `Ok(())` while an agent is already running.
pub fn try_init(config: Config) -> Result<()> {
    try_init_with(Agent::builder(config))
}

/// Start the process-wide agent from a prepared builder.
///
/// The builder's stats are replaced by the process-wide counters.
pub fn try_init_with(builder: AgentBuilder) -> Result<()> {
    let mut slot = AGENT.write();
    if slot.is_some() {
        return Ok(());
    }
    let agent = builder.stats(Arc::clone(global_stats())).build()?;
    *slot = Some(Arc::new(agent));
    Ok(())
}

/// Stop the process-wide agent, draining for at most `timeout`.
///
/// Returns `true` when the queue drained in time or nothing was running.
pub fn shutdown(timeout: Duration) -> bool {
    let agent = AGENT.write().take();
    match agent {
        Some(agent) => agent.stop(timeout),
        None => true,
    }
}

pub fn is_initialized() -> bool {
    AGENT.read().is_some()
}

/// Lifecycle state of the process-wide agent
pub fn state() -> AgentState {
    current().map_or(AgentState::Uninitialized, |agent| agent.state())
}

/// Enqueue an event; returns whether the queue accepted it
pub fn log(
    level: Level,
    iface: impl Into<String>,
    message: impl Into<String>,
    params: Vec<Param>,
) -> bool {
    match current() {
        Some(agent) => agent.enqueue(Event::new(level, iface, message).with_params(params)),
        None => false,
    }
}

pub fn debug(iface: impl Into<String>, message: impl Into<String>, params: Vec<Param>) {
    log(Level::Debug, iface, message, params);
}

pub fn info(iface: impl Into<String>, message: impl Into<String>, params: Vec<Param>) {
    log(Level::Info, iface, message, params);
}

pub fn success(iface: impl Into<String>, message: impl Into<String>, params: Vec<Param>) {
    log(Level::Success, iface, message, params);
}

pub fn warning(iface: impl Into<String>, message: impl Into<String>, params: Vec<Param>) {
    log(Level::Warning, iface, message, params);
}

pub fn fail(iface: impl Into<String>, message: impl Into<String>, params: Vec<Param>) {
    log(Level::Fail, iface, message, params);
}

pub fn error(iface: impl Into<String>, message: impl Into<String>, params: Vec<Param>) {
    log(Level::Error, iface, message, params);
}

pub fn catastrophe(iface: impl Into<String>, message: impl Into<String>, params: Vec<Param>) {
    log(Level::Catastrophe, iface, message, params);
}

/// Append samples to the audio log; a no-op without an agent or with audio off
pub fn audio_write_pcm16(samples: &[i16]) -> Result<()> {
    match current() {
        Some(agent) => agent.write_pcm16(samples),
        None => Ok(()),
    }
}

pub fn audio_write_bytes_pcm16le(bytes: &[u8]) -> Result<()> {
    match current() {
        Some(agent) => agent.write_bytes_pcm16le(bytes),
        None => Ok(()),
    }
}

/// Snapshot of the process-wide counters
pub fn get_stats() -> Stats {
    global_stats().snapshot()
}
