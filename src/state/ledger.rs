//! In-memory session ledger and completion notices

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{Mode, Settings};

const BREAK_SUGGESTIONS: [&str; 6] = [
    "Drink a full glass of water",
    "Step outside for 2 minutes",
    "Roll your shoulders back 10 times",
    "Look 20 feet away for 20 seconds",
    "Take 5 slow, deep breaths",
    "Stand up and stretch your spine",
];

/// Label used for focus sessions started without a tag
pub const DEFAULT_TAG: &str = "Untitled Session";

const TAG_SUGGESTIONS: [&str; 5] = ["Coding", "PR Reviews", "Writing", "Reading", "Planning"];

/// One interval that counted down to zero
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub mode: Mode,
    /// What the focus session was spent on; breaks carry none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    pub minutes: u32,
    pub completed_at: DateTime<Utc>,
}

/// Message raised when an interval completes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub message: String,
    pub suggestion: Option<String>,
    pub raised_at: DateTime<Utc>,
}

/// Completed sessions and the focus minutes accumulated since the last
/// long break
#[derive(Debug, Clone, Default)]
pub struct SessionLedger {
    accumulated_minutes: u32,
    /// Interval lengths credited for completed sessions
    settings: Settings,
    /// Label for the next completed focus session
    tag: Option<String>,
    sessions: Vec<SessionRecord>,
    notification: Option<Notification>,
    focus_completed: usize,
}

impl SessionLedger {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn accumulated_minutes(&self) -> u32 {
        self.accumulated_minutes
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Set the label for upcoming focus sessions; blank clears it
    pub fn set_tag(&mut self, tag: Option<String>) {
        self.tag = tag
            .map(|tag| tag.trim().to_string())
            .filter(|tag| !tag.is_empty());
    }

    /// Previously used tags, most recent first, followed by the stock ones
    pub fn tag_suggestions(&self) -> Vec<String> {
        let mut suggestions: Vec<String> = Vec::new();
        let used = self.sessions.iter().rev().filter_map(|record| record.tag.as_deref());
        for tag in used.chain(TAG_SUGGESTIONS.iter().map(|tag| &**tag)) {
            if tag != DEFAULT_TAG && !suggestions.iter().any(|known| known == tag) {
                suggestions.push(tag.to_string());
            }
        }
        suggestions
    }

    /// Check whether the next break should be a long one
    pub fn long_break_due(&self, threshold: u32) -> bool {
        self.accumulated_minutes >= threshold
    }

    pub fn sessions(&self) -> &[SessionRecord] {
        &self.sessions
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    /// Book a completed interval and raise the matching notification
    pub fn record_completion(&mut self, mode: Mode, minutes: u32) -> &Notification {
        let now = Utc::now();
        let tag = match mode {
            Mode::Focus => Some(self.tag.clone().unwrap_or_else(|| DEFAULT_TAG.to_string())),
            Mode::ShortBreak | Mode::LongBreak => None,
        };
        self.sessions.push(SessionRecord {
            mode,
            tag,
            minutes,
            completed_at: now,
        });

        let notification = match mode {
            Mode::Focus => {
                self.accumulated_minutes = self.accumulated_minutes.saturating_add(minutes);
                let suggestion = BREAK_SUGGESTIONS[self.focus_completed % BREAK_SUGGESTIONS.len()];
                self.focus_completed += 1;
                Notification {
                    message: "Session complete. Take a break when you are ready.".to_string(),
                    suggestion: Some(suggestion.to_string()),
                    raised_at: now,
                }
            }
            Mode::ShortBreak | Mode::LongBreak => {
                if mode == Mode::LongBreak {
                    info!(
                        "Long break taken, clearing {} accumulated minutes",
                        self.accumulated_minutes
                    );
                    self.accumulated_minutes = 0;
                }
                Notification {
                    message: "Break over. Ready to focus?".to_string(),
                    suggestion: None,
                    raised_at: now,
                }
            }
        };

        info!("{}", notification.message);
        self.notification.insert(notification)
    }

    /// Callback form of [`record_completion`](Self::record_completion),
    /// crediting the configured length of `mode`
    pub fn on_session_end(&mut self, mode: Mode) {
        let minutes = (self.settings.duration_of(mode) / 60) as u32;
        self.record_completion(mode, minutes);
    }
}
