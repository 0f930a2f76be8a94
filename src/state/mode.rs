//! Timer modes and duration settings

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Which interval the timer is counting down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    Focus,
    ShortBreak,
    LongBreak,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Focus => "focus",
            Mode::ShortBreak => "shortBreak",
            Mode::LongBreak => "longBreak",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "focus" => Ok(Mode::Focus),
            "shortBreak" | "short-break" => Ok(Mode::ShortBreak),
            "longBreak" | "long-break" => Ok(Mode::LongBreak),
            other => Err(format!("Unknown timer mode: {}", other)),
        }
    }
}

/// Interval lengths and the long-break threshold, all in minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub work_minutes: u32,
    pub short_break_minutes: u32,
    pub long_break_minutes: u32,
    /// Accumulated focus minutes at or above which the next break is long
    pub acc_threshold: u32,
}

impl Settings {
    /// Length of the given mode's interval in seconds
    pub fn duration_of(&self, mode: Mode) -> u64 {
        let minutes = match mode {
            Mode::Focus => self.work_minutes,
            Mode::ShortBreak => self.short_break_minutes,
            Mode::LongBreak => self.long_break_minutes,
        };
        u64::from(minutes) * 60
    }

    /// Reject zero values before they reach the engine
    pub fn validate(&self) -> Result<(), String> {
        let fields = [
            ("workMinutes", self.work_minutes),
            ("shortBreakMinutes", self.short_break_minutes),
            ("longBreakMinutes", self.long_break_minutes),
            ("accThreshold", self.acc_threshold),
        ];
        match fields.iter().find(|(_, value)| *value == 0) {
            Some((name, _)) => Err(format!("{} must be a positive integer", name)),
            None => Ok(()),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_minutes: 45,
            short_break_minutes: 10,
            long_break_minutes: 20,
            acc_threshold: 100,
        }
    }
}
