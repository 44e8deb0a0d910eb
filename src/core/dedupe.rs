//! Consecutive-duplicate suppression
//!
//! The worker feeds every formatted event through [`DedupeState::check`].
//! A run of identical `(level, iface, text)` triples is emitted once; the
//! repeats are counted and reported by a single summary event, produced
//! lazily right before the next distinct event (or at shutdown).

use super::event::Param;
use super::format::format_message;
use super::level::Level;

pub const DEFAULT_SUMMARY_FORMAT: &str = "last message repeated %d more times";

/// Outcome of [`DedupeState::check`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DedupeDecision {
    /// The event repeats the previous one and must not be emitted
    pub suppress: bool,
    /// A finished run is pending; flush its summary before this event
    pub emit_summary_first: bool,
}

/// Summary of a suppressed run, attributed to the run's level and facility
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub level: Level,
    pub iface: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct LastEvent {
    level: Level,
    iface: String,
    text: String,
}

/// Dedupe state owned by the worker
#[derive(Debug)]
pub struct DedupeState {
    enabled: bool,
    summary_format: String,
    last: Option<LastEvent>,
    repeat_count: u64,
    /// Level and facility of a run that ended before its summary was flushed
    pending_origin: Option<(Level, String)>,
}

impl DedupeState {
    pub fn new(enabled: bool, summary_format: impl Into<String>) -> Self {
        Self {
            enabled,
            summary_format: summary_format.into(),
            last: None,
            repeat_count: 0,
            pending_origin: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of repeats swallowed since the last summary
    pub fn repeat_count(&self) -> u64 {
        self.repeat_count
    }

    /// Classify the next formatted event.
    ///
    /// `repeat_count` is left untouched when a run ends; only
    /// [`flush_summary`](Self::flush_summary) resets it.
    pub fn check(&mut self, level: Level, iface: &str, text: &str) -> DedupeDecision {
        if !self.enabled {
            return DedupeDecision::default();
        }

        if let Some(last) = &self.last {
            if last.level == level && last.iface == iface && last.text == text {
                self.repeat_count += 1;
                return DedupeDecision {
                    suppress: true,
                    emit_summary_first: false,
                };
            }
        }

        let emit_summary_first = self.repeat_count > 0;
        if emit_summary_first {
            if let Some(last) = self.last.take() {
                self.pending_origin = Some((last.level, last.iface));
            }
        }
        self.last = Some(LastEvent {
            level,
            iface: iface.to_string(),
            text: text.to_string(),
        });

        DedupeDecision {
            suppress: false,
            emit_summary_first,
        }
    }

    /// Produce the summary for the pending run, if any, and reset the count
    pub fn flush_summary(&mut self) -> Option<Summary> {
        if !self.enabled || self.repeat_count == 0 {
            return None;
        }

        let (level, iface) = match self.pending_origin.take() {
            Some(origin) => origin,
            None => {
                let last = self.last.as_ref()?;
                (last.level, last.iface.clone())
            }
        };
        let text = format_message(&self.summary_format, &[Param::Uint(self.repeat_count)]);
        self.repeat_count = 0;

        Some(Summary { level, iface, text })
    }

    /// Forget the last event and any pending run
    pub fn reset(&mut self) {
        self.last = None;
        self.repeat_count = 0;
        self.pending_origin = None;
    }
}
