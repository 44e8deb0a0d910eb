//! Terminal capability probing
//!
//! The console sink asks a [`TerminalProbe`] whether escape sequences and
//! emoji are welcome. Tests inject a [`FixedProbe`] for deterministic output.

use std::io::IsTerminal;

pub trait TerminalProbe: Send + Sync {
    /// True when stdout is interactive and accepts ANSI colors
    fn supports_color(&self) -> bool;
}

/// Probes the process's real stdout, honoring `NO_COLOR`
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutProbe;

impl TerminalProbe for StdoutProbe {
    fn supports_color(&self) -> bool {
        if !std::io::stdout().is_terminal() {
            return false;
        }
        std::env::var_os("NO_COLOR").map_or(true, |v| v.is_empty())
    }
}

/// Probe with a fixed answer
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedProbe(pub bool);

impl TerminalProbe for FixedProbe {
    fn supports_color(&self) -> bool {
        self.0
    }
}
