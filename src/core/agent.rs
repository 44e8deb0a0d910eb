//! Agent: bounded queue, single worker and shutdown lifecycle
//!
//! Producers hand events to [`Agent::enqueue`], which never blocks. One
//! worker thread owns formatting, dedupe, hooks and sinks; it processes
//! events strictly in queue order. [`Agent::stop`] drains the queue within a
//! deadline and then closes every sink and the audio writer whether or not
//! the drain finished. A worker still busy at the deadline closes the sinks
//! itself once it returns.

use super::{
    config::Config,
    dedupe::DedupeState,
    drop_policy::DropPolicy,
    error::{LoggerError, Result},
    event::{Event, Param},
    format::{format_message, sanitize_line},
    hooks::{panic_message, HookDispatcher},
    level::Level,
    sink::Sink,
    stats::{LoggerStats, Stats},
    terminal::{StdoutProbe, TerminalProbe},
};
use crate::pcm::WavWriter;
use crate::sinks::{ConsoleSink, FileSink};
use crossbeam_channel::{bounded, select, Receiver, RecvTimeoutError, Sender, TrySendError};
use parking_lot::Mutex;
use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Default shutdown timeout (5 seconds)
///
/// Used when an agent is dropped without an explicit [`Agent::stop`].
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// How long `stop` waits for a stalled worker to release the sinks
const CLOSE_GRACE: Duration = Duration::from_millis(100);

/// Queue-full warnings are printed for the first drop and then every this many
const DROP_ALERT_INTERVAL: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AgentState {
    Uninitialized = 0,
    Running = 1,
    Draining = 2,
    Stopped = 3,
}

impl AgentState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => AgentState::Running,
            2 => AgentState::Draining,
            3 => AgentState::Stopped,
            _ => AgentState::Uninitialized,
        }
    }
}

/// Everything the worker mutates while processing an event
struct Pipeline {
    dedupe: DedupeState,
    hooks: HookDispatcher,
    /// Console first, then file
    sinks: Vec<Box<dyn Sink>>,
    stats: Arc<LoggerStats>,
}

impl Pipeline {
    /// Process one event, containing any panic so the worker keeps running
    fn process_isolated(&mut self, event: Event) {
        let result =
            std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| self.process(event)));
        if let Err(panic_info) = result {
            eprintln!(
                "[CLOG CRITICAL] Event processing panicked: {}. The event was discarded.",
                panic_message(panic_info.as_ref())
            );
        }
    }

    fn process(&mut self, event: Event) {
        let text = sanitize_line(&format_message(&event.message, &event.params));
        let decision = self.dedupe.check(event.level, &event.iface, &text);

        if decision.emit_summary_first {
            self.emit_pending_summary();
        }
        if decision.suppress {
            self.stats.record_suppressed();
            return;
        }
        self.emit(&event, &text);
    }

    fn emit_pending_summary(&mut self) {
        if let Some(summary) = self.dedupe.flush_summary() {
            let event = Event::new(summary.level, summary.iface, summary.text);
            let text = event.message.clone();
            self.emit(&event, &text);
        }
    }

    /// Hooks, then sinks in order, then the emitted count
    fn emit(&mut self, event: &Event, text: &str) {
        self.hooks.dispatch(event);

        for sink in self.sinks.iter_mut() {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                sink.write(event.level, &event.iface, text)
            }));
            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    eprintln!("[CLOG ERROR] Sink '{}' failed: {}", sink.name(), e);
                }
                Err(panic_info) => {
                    eprintln!(
                        "[CLOG CRITICAL] Sink '{}' panicked: {}. Other sinks continue to function.",
                        sink.name(),
                        panic_message(panic_info.as_ref())
                    );
                }
            }
        }

        self.stats.record_emitted();
    }

    fn flush_sinks(&mut self) {
        for sink in self.sinks.iter_mut() {
            if let Err(e) = sink.flush() {
                eprintln!("[CLOG ERROR] Sink '{}' flush failed: {}", sink.name(), e);
            }
        }
    }

    fn close_sinks(&mut self) {
        for sink in self.sinks.iter_mut() {
            if let Err(e) = sink.close() {
                eprintln!("[CLOG ERROR] Sink '{}' close failed: {}", sink.name(), e);
            }
        }
    }
}

/// Channels and flags the worker thread runs with
struct Worker {
    events: Receiver<Event>,
    done: Receiver<()>,
    /// Dropped when the worker returns; `stop` waits on its disconnection
    _exit: Sender<()>,
    abandon: Arc<AtomicBool>,
    pipeline: Arc<Mutex<Pipeline>>,
}

impl Worker {
    fn run(self) {
        loop {
            select! {
                recv(self.events) -> msg => match msg {
                    Ok(event) if !self.abandon.load(Ordering::Relaxed) => {
                        self.pipeline.lock().process_isolated(event)
                    }
                    _ => break,
                },
                recv(self.done) -> _ => break,
            }
        }

        // Drain whatever is still queued unless the deadline already passed
        let mut pipeline = self.pipeline.lock();
        while !self.abandon.load(Ordering::Relaxed) {
            match self.events.try_recv() {
                Ok(event) => pipeline.process_isolated(event),
                Err(_) => break,
            }
        }
        pipeline.emit_pending_summary();
        pipeline.flush_sinks();
        if self.abandon.load(Ordering::Relaxed) {
            // `stop` returned without waiting for us
            pipeline.close_sinks();
        }
    }
}

/// The logging engine instance
///
/// # Example
///
/// ```
/// use rust_clog::{Agent, Config, Event, Level};
/// use std::time::Duration;
///
/// let mut config = Config::default();
/// config.console.enabled = false;
///
/// let agent = Agent::new(config).unwrap();
/// assert!(agent.enqueue(Event::new(Level::Info, "Demo", "hello")));
/// assert!(agent.stop(Duration::from_secs(1)));
///
/// let stats = agent.stats();
/// assert_eq!(stats.accepted, 1);
/// assert_eq!(stats.emitted, 1);
/// ```
pub struct Agent {
    sender: Sender<Event>,
    /// Second consumer handle, used only to evict under `DropPolicy::DropOld`
    evictor: Receiver<Event>,
    drop_policy: DropPolicy,
    stats: Arc<LoggerStats>,
    state: AtomicU8,
    done: Mutex<Option<Sender<()>>>,
    exit: Receiver<()>,
    abandon: Arc<AtomicBool>,
    pipeline: Arc<Mutex<Pipeline>>,
    audio: Mutex<Option<WavWriter>>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
}

impl Agent {
    /// Construct and start an agent with default collaborators
    pub fn new(config: Config) -> Result<Self> {
        Self::builder(config).build()
    }

    pub fn builder(config: Config) -> AgentBuilder {
        AgentBuilder::new(config)
    }

    pub fn state(&self) -> AgentState {
        AgentState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn is_running(&self) -> bool {
        self.state() == AgentState::Running
    }

    /// Offer an event to the queue without blocking.
    ///
    /// Returns `false` when the event was rejected: the queue is full under
    /// `drop_new` (or eviction lost a race under `drop_old`), or shutdown has
    /// begun. Rejections are counted per level.
    pub fn enqueue(&self, event: Event) -> bool {
        let level = event.level;
        if !self.is_running() {
            self.stats.record_drop(level);
            return false;
        }

        match self.sender.try_send(event) {
            Ok(()) => {
                self.stats.record_accepted();
                true
            }
            Err(TrySendError::Full(event)) => match self.drop_policy {
                DropPolicy::DropNew => {
                    self.reject(level);
                    false
                }
                DropPolicy::DropOld => self.evict_and_retry(event),
            },
            Err(TrySendError::Disconnected(_)) => {
                self.stats.record_drop(level);
                false
            }
        }
    }

    /// Build and enqueue an event in one call
    pub fn log(
        &self,
        level: Level,
        iface: impl Into<String>,
        message: impl Into<String>,
        params: Vec<Param>,
    ) -> bool {
        self.enqueue(Event::new(level, iface, message).with_params(params))
    }

    /// Best effort: the worker may take the oldest event first, in which case
    /// the retry finds room anyway or the new event is rejected.
    fn evict_and_retry(&self, event: Event) -> bool {
        if self.evictor.try_recv().is_ok() {
            self.stats.record_evicted();
        }
        match self.sender.try_send(event) {
            Ok(()) => {
                self.stats.record_accepted();
                true
            }
            Err(e) => {
                self.reject(e.into_inner().level);
                false
            }
        }
    }

    fn reject(&self, level: Level) {
        let previous = self.stats.record_drop(level);
        let total = self.stats.total_dropped();
        if previous == 0 || total % DROP_ALERT_INTERVAL == 0 {
            eprintln!(
                "[CLOG WARNING] Queue full, {} events dropped so far ({} at {}). \
                 Consider a larger queue_capacity.",
                total, previous + 1, level
            );
        }
    }

    /// Stop the agent, giving the worker until `timeout` to drain.
    ///
    /// The audio writer is always closed. Sinks are closed here unless the
    /// worker is still busy after a short grace period; the worker then
    /// closes them when it returns. Returns `true`
    /// when the queue was fully drained. Calling `stop` again is a no-op
    /// that reports whether the agent has stopped.
    pub fn stop(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let won = self
            .state
            .compare_exchange(
                AgentState::Running as u8,
                AgentState::Draining as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok();
        if !won {
            return self.state() == AgentState::Stopped;
        }

        // Disconnecting `done` wakes the worker's select
        drop(self.done.lock().take());

        let drained = match self.exit.recv_deadline(deadline) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => true,
            Err(RecvTimeoutError::Timeout) => false,
        };

        if drained {
            if let Some(handle) = self.worker.lock().take() {
                if handle.join().is_err() {
                    eprintln!("[CLOG ERROR] Worker thread panicked during shutdown");
                }
            }
        } else {
            self.abandon.store(true, Ordering::Relaxed);
            eprintln!(
                "[CLOG WARNING] Worker did not drain within {:?}; {} queued events discarded.",
                timeout,
                self.sender.len()
            );
        }

        match self.pipeline.try_lock_for(CLOSE_GRACE) {
            Some(mut pipeline) => pipeline.close_sinks(),
            None => eprintln!("[CLOG ERROR] Worker is stalled; sinks were not closed"),
        }

        if let Some(mut writer) = self.audio.lock().take() {
            if let Err(e) = writer.close() {
                eprintln!("[CLOG ERROR] Failed to close audio writer: {}", e);
            }
        }

        let dropped = self.stats.total_dropped();
        if dropped > 0 {
            let snapshot = self.stats.snapshot();
            eprintln!(
                "[CLOG WARNING] Shutting down with {} dropped events (drop rate: {:.2}%)",
                dropped,
                snapshot.drop_rate()
            );
        }

        self.state.store(AgentState::Stopped as u8, Ordering::Release);
        drained
    }

    /// Append 16-bit samples to the audio log; a no-op when audio is off
    pub fn write_pcm16(&self, samples: &[i16]) -> Result<()> {
        match self.audio.lock().as_mut() {
            Some(writer) => writer.write_pcm16(samples),
            None => Ok(()),
        }
    }

    /// Append pre-encoded little-endian sample bytes; a no-op when audio is off
    pub fn write_bytes_pcm16le(&self, bytes: &[u8]) -> Result<()> {
        match self.audio.lock().as_mut() {
            Some(writer) => writer.write_bytes_pcm16le(bytes),
            None => Ok(()),
        }
    }

    pub fn flush_audio(&self) -> Result<()> {
        match self.audio.lock().as_mut() {
            Some(writer) => writer.flush(),
            None => Ok(()),
        }
    }

    pub fn has_audio(&self) -> bool {
        self.audio.lock().is_some()
    }

    pub fn stats(&self) -> Stats {
        self.stats.snapshot()
    }

    /// Events currently waiting in the queue
    pub fn queue_len(&self) -> usize {
        self.sender.len()
    }
}

impl Drop for Agent {
    fn drop(&mut self) {
        if self.is_running() {
            self.stop(DEFAULT_SHUTDOWN_TIMEOUT);
        }
    }
}

/// Builder for [`Agent`] with injectable collaborators
///
/// # Example
///
/// ```
/// use rust_clog::{Agent, Config, FixedProbe, LoggerStats};
/// use std::sync::Arc;
///
/// let stats = Arc::new(LoggerStats::new());
/// let agent = Agent::builder(Config::default())
///     .stats(Arc::clone(&stats))
///     .terminal_probe(Arc::new(FixedProbe(false)))
///     .console_writer(Box::new(std::io::sink()))
///     .build()
///     .unwrap();
/// agent.log(rust_clog::Level::Info, "Demo", "quiet", vec![]);
/// ```
pub struct AgentBuilder {
    config: Config,
    stats: Option<Arc<LoggerStats>>,
    probe: Option<Arc<dyn TerminalProbe>>,
    console_writer: Option<Box<dyn Write + Send>>,
}

impl AgentBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            stats: None,
            probe: None,
            console_writer: None,
        }
    }

    /// Count into `stats` instead of a fresh set of counters
    #[must_use = "builder methods return a new value"]
    pub fn stats(mut self, stats: Arc<LoggerStats>) -> Self {
        self.stats = Some(stats);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn terminal_probe(mut self, probe: Arc<dyn TerminalProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Send console lines to `writer` instead of stdout
    #[must_use = "builder methods return a new value"]
    pub fn console_writer(mut self, writer: Box<dyn Write + Send>) -> Self {
        self.console_writer = Some(writer);
        self
    }

    /// Provision sinks and the audio writer, then start the worker.
    ///
    /// Anything opened before a failure is closed when the error returns.
    pub fn build(self) -> Result<Agent> {
        let AgentBuilder {
            config,
            stats,
            probe,
            console_writer,
        } = self;
        config.validate()?;

        let stats = stats.unwrap_or_else(|| Arc::new(LoggerStats::new()));
        let probe: Arc<dyn TerminalProbe> = probe.unwrap_or_else(|| Arc::new(StdoutProbe));

        let mut sinks: Vec<Box<dyn Sink>> = Vec::with_capacity(2);
        if config.console.enabled {
            let console = match console_writer {
                Some(writer) => ConsoleSink::with_writer(&config.console, probe.as_ref(), writer),
                None => ConsoleSink::new(&config.console, probe.as_ref()),
            };
            sinks.push(Box::new(console));
        }
        if let Some(file) = FileSink::open(&config.file)
            .map_err(|e| LoggerError::initialization("file sink", e))?
        {
            sinks.push(Box::new(file));
        }
        let audio = WavWriter::open(&config.audio)
            .map_err(|e| LoggerError::initialization("audio writer", e))?;

        let pipeline = Arc::new(Mutex::new(Pipeline {
            dedupe: DedupeState::new(config.dedupe.enabled, config.dedupe.summary_format.clone()),
            hooks: HookDispatcher::new(&config.hooks),
            sinks,
            stats: Arc::clone(&stats),
        }));

        let (sender, receiver) = bounded(config.queue_capacity);
        let (done_tx, done_rx) = bounded(0);
        let (exit_tx, exit_rx) = bounded(0);
        let abandon = Arc::new(AtomicBool::new(false));

        let worker = Worker {
            events: receiver.clone(),
            done: done_rx,
            _exit: exit_tx,
            abandon: Arc::clone(&abandon),
            pipeline: Arc::clone(&pipeline),
        };
        let handle = thread::Builder::new()
            .name("clog-worker".to_string())
            .spawn(move || worker.run())
            .map_err(|e| {
                LoggerError::initialization(
                    "worker",
                    LoggerError::io_operation("spawning worker thread", "clog-worker", e),
                )
            })?;

        Ok(Agent {
            sender,
            evictor: receiver,
            drop_policy: config.drop_policy,
            stats,
            state: AtomicU8::new(AgentState::Running as u8),
            done: Mutex::new(Some(done_tx)),
            exit: exit_rx,
            abandon,
            pipeline,
            audio: Mutex::new(audio),
            worker: Mutex::new(Some(handle)),
        })
    }
}
