//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::{
    Mode, Notification, SessionLedger, SessionRecord, Settings, TimerEngine, TimerSnapshot,
    TimerWidget, DEFAULT_TAG,
};

/// Main application state hosting one timer widget and its session ledger
#[derive(Debug)]
pub struct AppState {
    /// Engine plus its ticker
    pub widget: Arc<Mutex<TimerWidget>>,
    /// Completed sessions and accumulated focus minutes
    pub ledger: Arc<Mutex<SessionLedger>>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppState {
    /// Create a new AppState with a stopped focus timer
    pub fn new(port: u16, host: String, settings: Settings) -> Self {
        let ledger = Arc::new(Mutex::new(SessionLedger::new(settings)));

        // Lock order is widget then ledger: this runs inside a tick
        let sink = Arc::clone(&ledger);
        let engine = TimerEngine::with_session_end(settings, move |mode| match sink.lock() {
            Ok(mut ledger) => ledger.on_session_end(mode),
            Err(e) => warn!("Failed to record {} session: {}", mode, e),
        });

        Self {
            widget: TimerWidget::shared(engine),
            ledger,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
        }
    }

    /// Run an engine operation and keep the ticker and ledger in step with it
    pub fn update_timer<F>(&self, action: &str, operation: F) -> Result<TimerSnapshot, String>
    where
        F: FnOnce(&mut TimerEngine),
    {
        let snapshot = self.with_widget_and_ledger(|widget, ledger| {
            let snapshot = widget.apply(&self.widget, operation);
            ledger.set_settings(snapshot.settings);
            snapshot
        })?;

        self.track_action(action);
        Ok(snapshot)
    }

    /// Run `f` holding the widget lock, then the ledger lock
    fn with_widget_and_ledger<T>(
        &self,
        f: impl FnOnce(&mut TimerWidget, &mut SessionLedger) -> T,
    ) -> Result<T, String> {
        let mut widget = self.widget.lock()
            .map_err(|e| format!("Failed to lock timer widget: {}", e))?;
        let mut ledger = self.ledger.lock()
            .map_err(|e| format!("Failed to lock session ledger: {}", e))?;
        Ok(f(&mut widget, &mut ledger))
    }

    /// Start or pause the countdown
    pub fn toggle_running(&self) -> Result<TimerSnapshot, String> {
        let snapshot = self.update_timer("toggle", |engine| engine.toggle_running())?;
        info!(
            "Timer {} in {} mode at {}",
            if snapshot.running { "started" } else { "paused" },
            snapshot.mode,
            snapshot.clock()
        );
        Ok(snapshot)
    }

    /// Stop and rewind the current mode
    pub fn reset(&self) -> Result<TimerSnapshot, String> {
        let snapshot = self.update_timer("reset", |engine| engine.reset())?;
        info!("Timer reset in {} mode", snapshot.mode);
        Ok(snapshot)
    }

    /// Stop and move to `mode`
    pub fn switch_mode(&self, mode: Mode) -> Result<TimerSnapshot, String> {
        let snapshot = self.update_timer("switch", |engine| engine.switch_mode(mode))?;
        info!("Switched to {} mode", snapshot.mode);
        Ok(snapshot)
    }

    /// Move between focus and a break sized by the ledger's accumulated minutes
    pub fn toggle_focus_break(&self) -> Result<TimerSnapshot, String> {
        let accumulated = self.accumulated_minutes()?;
        let snapshot = self.update_timer("focus-break", |engine| {
            engine.toggle_focus_break(accumulated)
        })?;
        info!(
            "Switched to {} mode with {} accumulated focus minutes",
            snapshot.mode, accumulated
        );
        Ok(snapshot)
    }

    /// Replace the timer settings; deferred by the engine while running
    pub fn update_settings(&self, settings: Settings) -> Result<TimerSnapshot, String> {
        settings.validate()?;

        // The ledger credits completions with the settings the countdown is
        // actually using, so a deferred edit reaches it only once applied
        let snapshot = self.with_widget_and_ledger(|widget, ledger| {
            let snapshot = widget.update_settings(settings);
            ledger.set_settings(snapshot.settings);
            snapshot
        })?;

        if snapshot.pending_settings.is_some() {
            info!("Settings saved, taking effect when the countdown stops");
        } else {
            info!("Settings applied: {:?}", settings);
        }
        self.track_action("settings");
        Ok(snapshot)
    }

    /// Get current timer snapshot
    pub fn get_timer_state(&self) -> Result<TimerSnapshot, String> {
        self.widget.lock()
            .map(|widget| widget.snapshot())
            .map_err(|e| format!("Failed to lock timer widget: {}", e))
    }

    pub fn accumulated_minutes(&self) -> Result<u32, String> {
        self.ledger.lock()
            .map(|ledger| ledger.accumulated_minutes())
            .map_err(|e| format!("Failed to lock session ledger: {}", e))
    }

    /// Check whether the ledger has reached the active long-break threshold
    pub fn long_break_due(&self) -> Result<bool, String> {
        let threshold = self.get_timer_state()?.settings.acc_threshold;
        self.ledger.lock()
            .map(|ledger| ledger.long_break_due(threshold))
            .map_err(|e| format!("Failed to lock session ledger: {}", e))
    }

    /// Get the latest completion notice, if any
    pub fn get_notification(&self) -> Result<Option<Notification>, String> {
        self.ledger.lock()
            .map(|ledger| ledger.notification().cloned())
            .map_err(|e| format!("Failed to lock session ledger: {}", e))
    }

    /// Get completed sessions, oldest first
    pub fn get_sessions(&self) -> Result<Vec<SessionRecord>, String> {
        self.ledger.lock()
            .map(|ledger| ledger.sessions().to_vec())
            .map_err(|e| format!("Failed to lock session ledger: {}", e))
    }

    /// Label upcoming focus sessions; `None` or a blank tag clears it
    pub fn set_tag(&self, tag: Option<String>) -> Result<Option<String>, String> {
        let tag = {
            let mut ledger = self.ledger.lock()
                .map_err(|e| format!("Failed to lock session ledger: {}", e))?;
            ledger.set_tag(tag);
            ledger.tag().map(str::to_string)
        };

        info!("Session tag set to {}", tag.as_deref().unwrap_or(DEFAULT_TAG));
        self.track_action("tag");
        Ok(tag)
    }

    /// Get the current tag and suggestions for the next one
    pub fn get_tag(&self) -> Result<(Option<String>, Vec<String>), String> {
        self.ledger.lock()
            .map(|ledger| (ledger.tag().map(str::to_string), ledger.tag_suggestions()))
            .map_err(|e| format!("Failed to lock session ledger: {}", e))
    }

    /// Cancel the ticker before the server goes away
    pub fn dispose(&self) -> Result<(), String> {
        let mut widget = self.widget.lock()
            .map_err(|e| format!("Failed to lock timer widget: {}", e))?;
        widget.dispose();
        info!("Timer widget disposed");
        Ok(())
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    fn track_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }
}
