//! Sink trait for formatted event output

use super::{error::Result, level::Level};

/// Destination for formatted events.
///
/// Sinks are owned by the worker and driven from one thread. Write errors
/// are reported by the worker on stderr and never reach producers.
pub trait Sink: Send {
    fn write(&mut self, level: Level, iface: &str, text: &str) -> Result<()>;
    fn flush(&mut self) -> Result<()>;

    /// Release underlying resources. Must be idempotent.
    fn close(&mut self) -> Result<()> {
        self.flush()
    }

    fn name(&self) -> &str;
}
