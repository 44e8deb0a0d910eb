//! Panic recovery
//!
//! Two opt-in ways to get a panic into the log before the process goes
//! down: wrap a closure with [`recover_and_flush`], or install a process-wide
//! hook with [`install_panic_hook`]. Both log a `CATASTROPHE` event carrying
//! the panic message and a backtrace, then shut the global logger down.

use crate::api;
use crate::core::{hooks::panic_message, Level, Param, DEFAULT_SHUTDOWN_TIMEOUT};
use std::backtrace::Backtrace;
use std::panic::{self, UnwindSafe};
use std::thread;
use std::time::Duration;

const RECOVERY_IFACE: &str = "Recovery";

fn report_fault(message: &str, backtrace: &Backtrace) {
    api::log(
        Level::Catastrophe,
        RECOVERY_IFACE,
        "panic: %s | backtrace: %s",
        vec![Param::from(message), Param::from(backtrace.to_string())],
    );
}

/// Run `f`; if it panics, log the panic, shut the logger down within
/// [`DEFAULT_SHUTDOWN_TIMEOUT`] and either resume the panic (`repanic`) or
/// return `None`.
///
/// # Example
///
/// ```
/// use rust_clog::recovery::recover_and_flush;
///
/// let value = recover_and_flush(false, || 21 * 2);
/// assert_eq!(value, Some(42));
/// ```
pub fn recover_and_flush<F, R>(repanic: bool, f: F) -> Option<R>
where
    F: FnOnce() -> R + UnwindSafe,
{
    match panic::catch_unwind(f) {
        Ok(value) => Some(value),
        Err(payload) => {
            report_fault(
                &panic_message(payload.as_ref()),
                &Backtrace::force_capture(),
            );
            api::shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
            if repanic {
                panic::resume_unwind(payload);
            }
            None
        }
    }
}

/// Chain a panic hook that logs the panic and shuts the logger down within
/// `timeout` before handing over to the previously installed hook.
///
/// Panics on the logger's own worker thread are passed straight through;
/// sink and hook failures there are already isolated.
pub fn install_panic_hook(timeout: Duration) {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        if thread::current().name() != Some("clog-worker") && api::is_initialized() {
            let mut message = panic_message(info.payload());
            if let Some(location) = info.location() {
                message = format!("{} at {}", message, location);
            }
            report_fault(&message, &Backtrace::force_capture());
            api::shutdown(timeout);
        }
        previous(info);
    }));
}
