//! Engine statistics
//!
//! Producers bump `accepted` and the per-level drop cells, the worker bumps
//! `emitted` and `suppressed`. Every cell is an independent atomic, so a
//! snapshot may mix values from slightly different instants.

use super::level::Level;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters shared between producers and the worker
///
/// # Example
///
/// ```
/// use rust_clog::{Level, LoggerStats};
///
/// let stats = LoggerStats::new();
/// stats.record_accepted();
/// stats.record_drop(Level::Debug);
///
/// let snapshot = stats.snapshot();
/// assert_eq!(snapshot.accepted, 1);
/// assert_eq!(snapshot.drops(Level::Debug), 1);
/// ```
#[derive(Debug)]
pub struct LoggerStats {
    /// Events admitted to the queue
    accepted: AtomicU64,

    /// Events (including dedupe summaries) that went through the sinks
    emitted: AtomicU64,

    /// Events swallowed by consecutive-duplicate suppression
    suppressed: AtomicU64,

    /// Queued events evicted by the `drop_old` policy
    evicted: AtomicU64,

    /// Rejected events, indexed by `Level::index()`
    drops: [AtomicU64; Level::COUNT],
}

impl LoggerStats {
    pub const fn new() -> Self {
        Self {
            accepted: AtomicU64::new(0),
            emitted: AtomicU64::new(0),
            suppressed: AtomicU64::new(0),
            evicted: AtomicU64::new(0),
            drops: [
                AtomicU64::new(0),
                AtomicU64::new(0),
                AtomicU64::new(0),
                AtomicU64::new(0),
                AtomicU64::new(0),
                AtomicU64::new(0),
                AtomicU64::new(0),
            ],
        }
    }

    #[inline]
    pub fn record_accepted(&self) -> u64 {
        self.accepted.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_emitted(&self) -> u64 {
        self.emitted.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_suppressed(&self) -> u64 {
        self.suppressed.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_evicted(&self) -> u64 {
        self.evicted.fetch_add(1, Ordering::Relaxed)
    }

    /// Record a rejected event, returning the previous drop count for `level`
    #[inline]
    pub fn record_drop(&self, level: Level) -> u64 {
        self.drops[level.index()].fetch_add(1, Ordering::Relaxed)
    }

    pub fn total_dropped(&self) -> u64 {
        self.drops.iter().map(|c| c.load(Ordering::Relaxed)).sum()
    }

    /// Copy every counter into a plain [`Stats`] value
    pub fn snapshot(&self) -> Stats {
        Stats {
            accepted: self.accepted.load(Ordering::Relaxed),
            emitted: self.emitted.load(Ordering::Relaxed),
            suppressed: self.suppressed.load(Ordering::Relaxed),
            evicted: self.evicted.load(Ordering::Relaxed),
            drops_per_level: Level::ALL
                .iter()
                .map(|level| (*level, self.drops[level.index()].load(Ordering::Relaxed)))
                .collect(),
        }
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.accepted.store(0, Ordering::Relaxed);
        self.emitted.store(0, Ordering::Relaxed);
        self.suppressed.store(0, Ordering::Relaxed);
        self.evicted.store(0, Ordering::Relaxed);
        for cell in &self.drops {
            cell.store(0, Ordering::Relaxed);
        }
    }
}

impl Default for LoggerStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of [`LoggerStats`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub accepted: u64,
    pub emitted: u64,
    pub suppressed: u64,
    pub evicted: u64,
    pub drops_per_level: BTreeMap<Level, u64>,
}

impl Stats {
    pub fn drops(&self, level: Level) -> u64 {
        self.drops_per_level.get(&level).copied().unwrap_or(0)
    }

    pub fn total_dropped(&self) -> u64 {
        self.drops_per_level.values().sum()
    }

    /// Drop rate as a percentage (0.0 - 100.0) of all enqueue attempts
    pub fn drop_rate(&self) -> f64 {
        let dropped = self.total_dropped() as f64;
        let total = self.accepted as f64 + dropped;
        if total == 0.0 {
            0.0
        } else {
            (dropped / total) * 100.0
        }
    }
}
