//! Console sink
//!
//! One line per event: `[timestamp][LEVEL][iface]message`. On a color-capable
//! terminal (and only when colors are requested) the level tag gains an
//! emoji and every part is colored.

use crate::core::{ConsoleConfig, Level, Result, Sink, TerminalProbe, TimestampFormat};
use colored::{Color, Colorize};
use std::collections::BTreeSet;
use std::io::{self, Write};

pub struct ConsoleSink {
    writer: Box<dyn Write + Send>,
    omit_levels: BTreeSet<Level>,
    timestamp_format: TimestampFormat,
    use_color: bool,
}

impl ConsoleSink {
    /// Console sink writing to the process's stdout
    pub fn new(config: &ConsoleConfig, probe: &dyn TerminalProbe) -> Self {
        Self::with_writer(config, probe, Box::new(io::stdout()))
    }

    pub fn with_writer(
        config: &ConsoleConfig,
        probe: &dyn TerminalProbe,
        writer: Box<dyn Write + Send>,
    ) -> Self {
        Self {
            writer,
            omit_levels: config.omit_levels.clone(),
            timestamp_format: config.timestamp_format.clone(),
            use_color: config.colors && probe.supports_color(),
        }
    }

    /// Whether colors and emoji are in effect
    pub fn uses_color(&self) -> bool {
        self.use_color
    }

    fn format_plain(timestamp: &str, level: Level, iface: &str, text: &str) -> String {
        format!("[{}][{}][{}]{}", timestamp, level, iface, text)
    }

    fn format_colored(timestamp: &str, level: Level, iface: &str, text: &str) -> String {
        let open = "[".color(Color::BrightBlack);
        let close = "]".color(Color::BrightBlack);
        let space = if level.emoji_needs_space() { " " } else { "" };
        let message = match level.message_color() {
            Some(color) => text.color(color),
            None => text.white(),
        };

        format!(
            "{open}{timestamp}{close}{open}{emoji}{space}{tag}{close}{open}{iface}{close}{message}",
            open = open,
            close = close,
            timestamp = timestamp,
            emoji = level.emoji(),
            space = space,
            tag = level.to_str().color(level.color_code()),
            iface = iface.bright_white(),
            message = message,
        )
    }
}

impl Sink for ConsoleSink {
    fn write(&mut self, level: Level, iface: &str, text: &str) -> Result<()> {
        if self.omit_levels.contains(&level) {
            return Ok(());
        }

        let timestamp = self.timestamp_format.now();
        let line = if self.use_color {
            Self::format_colored(&timestamp, level, iface, text)
        } else {
            Self::format_plain(&timestamp, level, iface, text)
        };

        // Best effort: a closed stdout must not take the worker down
        let _ = writeln!(self.writer, "{}", line);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        let _ = self.writer.flush();
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
