//! Countdown value and read-only timer snapshots

use serde::{Deserialize, Serialize};

use super::{Mode, Settings};

/// Remaining time for the current mode instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecondsLeft {
    /// Not started yet, display the full interval
    Unset,
    /// Counting down; `Remaining(0)` means the interval is exhausted
    Remaining(u64),
}

impl SecondsLeft {
    /// Seconds to display, falling back to `total` when unset
    pub fn or_total(&self, total: u64) -> u64 {
        match self {
            SecondsLeft::Unset => total,
            SecondsLeft::Remaining(seconds) => *seconds,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, SecondsLeft::Remaining(0))
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, SecondsLeft::Unset)
    }
}

/// Point-in-time view of the engine handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub mode: Mode,
    pub running: bool,
    /// Display-ready seconds, already defaulted to the full interval
    pub seconds_left: u64,
    pub total_seconds: u64,
    pub progress: f64,
    /// Whether the current interval has not been started yet
    pub fresh: bool,
    pub settings: Settings,
    pub pending_settings: Option<Settings>,
}

impl TimerSnapshot {
    /// Short label used in API responses
    pub fn status(&self) -> &'static str {
        if self.running {
            "running"
        } else if self.seconds_left == 0 {
            "finished"
        } else if self.fresh {
            "idle"
        } else {
            "paused"
        }
    }

    /// `mm:ss` rendering of the remaining time
    pub fn clock(&self) -> String {
        format!("{:02}:{:02}", self.seconds_left / 60, self.seconds_left % 60)
    }
}
