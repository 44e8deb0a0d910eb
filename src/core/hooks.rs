//! Hooks: user observers invoked by the worker for every emitted event

use super::event::Event;
use super::level::Level;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Observer of emitted events
///
/// Hooks run synchronously on the worker thread, in registration order, and
/// see the event as the producer built it (template plus params). A hook
/// that blocks stalls the whole pipeline; no timeout is enforced.
///
/// Any `Fn(&Event) + Send + Sync` closure is a hook.
///
/// # Example
///
/// ```
/// use rust_clog::{Config, Event, Level};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// let errors = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&errors);
///
/// let config = Config::default().add_level_hook(
///     Level::Error,
///     Arc::new(move |_: &Event| {
///         counter.fetch_add(1, Ordering::Relaxed);
///     }),
/// );
/// assert_eq!(config.hooks.per_level[&Level::Error].len(), 1);
/// ```
pub trait Hook: Send + Sync {
    fn on_log(&self, event: &Event);
}

impl<F> Hook for F
where
    F: Fn(&Event) + Send + Sync,
{
    fn on_log(&self, event: &Event) {
        self(event)
    }
}

/// Registered hooks: global ones first, then the event level's list
#[derive(Clone, Default)]
pub struct HooksConfig {
    pub global: Vec<Arc<dyn Hook>>,
    pub per_level: HashMap<Level, Vec<Arc<dyn Hook>>>,
}

impl HooksConfig {
    pub fn is_empty(&self) -> bool {
        self.global.is_empty() && self.per_level.values().all(Vec::is_empty)
    }
}

impl fmt::Debug for HooksConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let per_level: HashMap<&Level, usize> =
            self.per_level.iter().map(|(k, v)| (k, v.len())).collect();
        f.debug_struct("HooksConfig")
            .field("global", &self.global.len())
            .field("per_level", &per_level)
            .finish()
    }
}

/// Invokes hooks for the worker, isolating panics per hook
pub struct HookDispatcher {
    global: Vec<Arc<dyn Hook>>,
    per_level: [Vec<Arc<dyn Hook>>; Level::COUNT],
}

impl HookDispatcher {
    pub fn new(config: &HooksConfig) -> Self {
        let mut per_level: [Vec<Arc<dyn Hook>>; Level::COUNT] = Default::default();
        for (level, hooks) in &config.per_level {
            per_level[level.index()].extend(hooks.iter().cloned());
        }
        Self {
            global: config.global.clone(),
            per_level,
        }
    }

    pub fn len(&self) -> usize {
        self.global.len() + self.per_level.iter().map(Vec::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Call every global hook, then every hook registered for `event.level`.
    ///
    /// A panicking hook is reported on stderr; the remaining hooks still run.
    pub fn dispatch(&self, event: &Event) {
        let level_hooks = &self.per_level[event.level.index()];
        for (idx, hook) in self.global.iter().chain(level_hooks.iter()).enumerate() {
            let result =
                std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| hook.on_log(event)));
            if let Err(panic_info) = result {
                eprintln!(
                    "[CLOG CRITICAL] Hook #{} panicked: {}. Other hooks continue to run.",
                    idx,
                    panic_message(panic_info.as_ref())
                );
            }
        }
    }
}

/// Extract the message from a panic payload
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
