//! Shutdown on SIGINT / SIGTERM
//!
//! [`install_signal_handler`] starts a small background thread running a
//! current-thread tokio runtime. On the first interrupt or termination
//! signal it shuts the global logger down within the given timeout and
//! exits the process with the conventional status (130 for SIGINT, 143 for
//! SIGTERM). [`SignalHandler::detach`] removes the handler without exiting;
//! on unix the two signals then take their default action again.
//!
//! Dropping the [`SignalHandler`] leaves the handler installed.

use crate::api;
use crate::core::{LoggerError, Result};
use std::io;
use std::thread;
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};
use tokio::sync::oneshot;

const EXIT_INTERRUPT: i32 = 130;
#[cfg(unix)]
const EXIT_TERMINATE: i32 = 143;

#[cfg(unix)]
struct Signals {
    interrupt: tokio::signal::unix::Signal,
    terminate: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl Signals {
    fn register(runtime: &Runtime) -> io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};
        runtime.block_on(async {
            Ok(Self {
                interrupt: signal(SignalKind::interrupt())?,
                terminate: signal(SignalKind::terminate())?,
            })
        })
    }

    /// Wait for a signal and return the matching exit status
    async fn recv(&mut self) -> i32 {
        tokio::select! {
            _ = self.interrupt.recv() => EXIT_INTERRUPT,
            _ = self.terminate.recv() => EXIT_TERMINATE,
        }
    }
}

/// The runtime's signal driver registers its process handler once and never
/// removes it. Detaching swaps that handler for the default action and keeps
/// it here so a later install can put it back.
#[cfg(unix)]
mod disposition {
    use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
    use parking_lot::{const_mutex, Mutex};

    const HANDLED: [Signal; 2] = [Signal::SIGINT, Signal::SIGTERM];

    static SET_ASIDE: Mutex<Vec<(Signal, SigAction)>> = const_mutex(Vec::new());

    pub(super) fn reinstate() -> nix::Result<()> {
        let mut set_aside = SET_ASIDE.lock();
        while let Some((signal, action)) = set_aside.pop() {
            // SAFETY: `action` is the handler the signal driver installed
            // for `signal` before `restore_default` replaced it.
            unsafe { sigaction(signal, &action) }?;
        }
        Ok(())
    }

    pub(super) fn restore_default() -> nix::Result<()> {
        let default = SigAction::new(SigHandler::SigDfl, SaFlags::empty(), SigSet::empty());
        let mut set_aside = SET_ASIDE.lock();
        for signal in HANDLED {
            // SAFETY: installing SIG_DFL runs no code in signal context.
            let previous = unsafe { sigaction(signal, &default) }?;
            if previous.handler() != SigHandler::SigDfl {
                set_aside.push((signal, previous));
            }
        }
        Ok(())
    }
}

#[cfg(not(unix))]
struct Signals;

#[cfg(not(unix))]
impl Signals {
    fn register(_runtime: &Runtime) -> io::Result<Self> {
        Ok(Self)
    }

    async fn recv(&mut self) -> i32 {
        let _ = tokio::signal::ctrl_c().await;
        EXIT_INTERRUPT
    }
}

/// Handle to an installed signal handler
#[derive(Debug)]
pub struct SignalHandler {
    cancel: Option<oneshot::Sender<()>>,
    thread: Option<thread::JoinHandle<()>>,
}

impl SignalHandler {
    /// Remove the handler; the process keeps running.
    ///
    /// On unix SIGINT and SIGTERM are reset to their default action, which
    /// affects the whole process.
    pub fn detach(mut self) -> Result<()> {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
        #[cfg(unix)]
        disposition::restore_default().map_err(|e| {
            LoggerError::io_operation("restoring default signal action", "SIGINT/SIGTERM", e.into())
        })?;
        Ok(())
    }
}

/// Install the handler; signals are registered before this returns.
pub fn install_signal_handler(timeout: Duration) -> Result<SignalHandler> {
    #[cfg(unix)]
    disposition::reinstate().map_err(|e| {
        LoggerError::io_operation("reinstating signal handlers", "SIGINT/SIGTERM", e.into())
    })?;
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| LoggerError::io_operation("building signal runtime", "tokio", e))?;
    let mut signals = Signals::register(&runtime)
        .map_err(|e| LoggerError::io_operation("registering signal handlers", "SIGINT/SIGTERM", e))?;
    let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();

    let thread = thread::Builder::new()
        .name("clog-signal".to_string())
        .spawn(move || {
            let exit_code = runtime.block_on(async move {
                tokio::select! {
                    // A dropped handle disables this branch instead of firing it
                    Ok(()) = &mut cancel_rx => None,
                    code = signals.recv() => Some(code),
                }
            });
            if let Some(code) = exit_code {
                api::shutdown(timeout);
                std::process::exit(code);
            }
        })
        .map_err(|e| LoggerError::io_operation("spawning signal thread", "clog-signal", e))?;

    Ok(SignalHandler {
        cancel: Some(cancel_tx),
        thread: Some(thread),
    })
}
