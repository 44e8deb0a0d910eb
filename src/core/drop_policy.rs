//! Drop policies for the bounded event queue
//!
//! When the queue is full, the policy decides which event is lost: the one
//! being enqueued or the oldest one still waiting for the worker.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Policy for handling a full event queue
///
/// # Example
///
/// ```
/// use rust_clog::DropPolicy;
///
/// let policy: DropPolicy = "drop_old".parse().unwrap();
/// assert_eq!(policy, DropPolicy::DropOld);
/// assert_eq!(DropPolicy::default(), DropPolicy::DropNew);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropPolicy {
    /// Reject the incoming event and keep everything already queued
    #[default]
    DropNew,

    /// Evict the oldest queued event to admit the incoming one
    ///
    /// Eviction races with the worker draining the queue. If the slot freed
    /// by the eviction is taken by another producer first, the incoming
    /// event is rejected instead.
    DropOld,
}

impl DropPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DropPolicy::DropNew => "drop_new",
            DropPolicy::DropOld => "drop_old",
        }
    }
}

impl fmt::Display for DropPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DropPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "drop_new" => Ok(DropPolicy::DropNew),
            "drop_old" => Ok(DropPolicy::DropOld),
            _ => Err(format!("Invalid drop policy: '{}'", s)),
        }
    }
}
