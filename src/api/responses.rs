//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{Notification, SessionRecord, Settings, TimerSnapshot};

/// API response structure for timer mutation endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerSnapshot,
}

impl TimerResponse {
    /// Create a response whose status mirrors the snapshot
    pub fn new(message: String, timer: TimerSnapshot) -> Self {
        Self {
            status: timer.status().to_string(),
            message,
            timestamp: Utc::now(),
            timer,
        }
    }
}

/// Full status response with ledger and server information
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub timer: TimerSnapshot,
    pub clock: String,
    pub accumulated_minutes: u32,
    pub long_break_due: bool,
    pub tag: Option<String>,
    pub notification: Option<Notification>,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Active settings and any edit waiting for the countdown to stop
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    pub settings: Settings,
    pub pending: Option<Settings>,
}

impl From<&TimerSnapshot> for SettingsResponse {
    fn from(snapshot: &TimerSnapshot) -> Self {
        Self {
            settings: snapshot.settings,
            pending: snapshot.pending_settings,
        }
    }
}

/// Completed session history
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionsResponse {
    pub accumulated_minutes: u32,
    pub sessions: Vec<SessionRecord>,
}

/// Body of PUT /api/v1/timer/tag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagRequest {
    #[serde(default)]
    pub tag: Option<String>,
}

/// Current session tag plus suggestions for the next one
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagResponse {
    pub tag: Option<String>,
    pub suggestions: Vec<String>,
}

/// Error body for rejected requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(message: String) -> Self {
        Self {
            status: "error".to_string(),
            message,
            timestamp: Utc::now(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
