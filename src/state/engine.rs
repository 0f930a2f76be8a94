//! Focus/break countdown state machine
//!
//! The engine is synchronous and owns no clock. Something else calls
//! [`TimerEngine::tick`] once per elapsed second while the engine is running;
//! see `tasks::ticker` for the tokio driver.

use std::fmt;

use tracing::debug;

use super::{Mode, SecondsLeft, Settings, TimerSnapshot};

/// Called once for every interval that counts down to zero
pub type SessionEndHandler = Box<dyn FnMut(Mode) + Send>;

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The engine was not running, nothing changed
    Idle,
    /// Countdown moved to the contained number of seconds
    Advanced(u64),
    /// The interval of the contained mode just reached zero
    Completed(Mode),
}

pub struct TimerEngine {
    settings: Settings,
    /// Settings submitted while running, applied once the countdown stops
    pending: Option<Settings>,
    mode: Mode,
    running: bool,
    seconds_left: SecondsLeft,
    on_session_end: Option<SessionEndHandler>,
}

impl TimerEngine {
    /// Create an engine in focus mode, stopped, with the full interval pending
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            pending: None,
            mode: Mode::Focus,
            running: false,
            seconds_left: SecondsLeft::Unset,
            on_session_end: None,
        }
    }

    /// Create an engine that reports completed intervals to `handler`
    pub fn with_session_end<F>(settings: Settings, handler: F) -> Self
    where
        F: FnMut(Mode) + Send + 'static,
    {
        let mut engine = Self::new(settings);
        engine.on_session_end = Some(Box::new(handler));
        engine
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn pending_settings(&self) -> Option<&Settings> {
        self.pending.as_ref()
    }

    /// Raw countdown value, distinguishing "not started" from "exhausted"
    pub fn remaining(&self) -> SecondsLeft {
        self.seconds_left
    }

    pub fn total_seconds(&self) -> u64 {
        self.settings.duration_of(self.mode)
    }

    /// Display-ready remaining seconds
    pub fn seconds_left(&self) -> u64 {
        self.seconds_left.or_total(self.total_seconds())
    }

    /// Elapsed fraction of the current interval in `[0, 1]`
    pub fn progress(&self) -> f64 {
        let total = self.total_seconds().max(1) as f64;
        (1.0 - self.seconds_left() as f64 / total).clamp(0.0, 1.0)
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            mode: self.mode,
            running: self.running,
            seconds_left: self.seconds_left(),
            total_seconds: self.total_seconds(),
            progress: self.progress(),
            fresh: self.seconds_left.is_unset(),
            settings: self.settings,
            pending_settings: self.pending,
        }
    }

    /// Start or pause. An exhausted interval restarts from full length.
    pub fn toggle_running(&mut self) {
        if self.seconds_left.is_exhausted() {
            self.seconds_left = SecondsLeft::Unset;
            self.running = true;
        } else if self.running {
            self.stop();
        } else {
            self.running = true;
        }
    }

    /// Rewind the current mode to full length without starting it
    pub fn reset(&mut self) {
        self.stop();
        self.seconds_left = SecondsLeft::Unset;
    }

    /// Stop and move to `mode` with its full interval
    pub fn switch_mode(&mut self, mode: Mode) {
        self.stop();
        self.mode = mode;
        self.seconds_left = SecondsLeft::Unset;
    }

    /// Leave focus for a break sized by `accumulated_minutes`, or leave a
    /// break for focus
    pub fn toggle_focus_break(&mut self, accumulated_minutes: u32) {
        let target = match self.mode {
            Mode::Focus if accumulated_minutes >= self.settings.acc_threshold => Mode::LongBreak,
            Mode::Focus => Mode::ShortBreak,
            Mode::ShortBreak | Mode::LongBreak => Mode::Focus,
        };
        self.switch_mode(target);
    }

    /// Replace the settings. Applied at once unless a countdown is running,
    /// in which case they wait until it stops.
    pub fn update_settings(&mut self, settings: Settings) {
        if self.running {
            self.pending = Some(settings);
        } else {
            self.pending = None;
            self.apply_settings(settings);
        }
    }

    /// Advance the countdown by one second
    pub fn tick(&mut self) -> TickOutcome {
        if !self.running {
            return TickOutcome::Idle;
        }

        let next = self.seconds_left().saturating_sub(1);
        if next > 0 {
            self.seconds_left = SecondsLeft::Remaining(next);
            return TickOutcome::Advanced(next);
        }

        // mode is left alone; switching after completion is the caller's call
        self.running = false;
        self.seconds_left = SecondsLeft::Remaining(0);
        let completed = self.mode;
        debug!("{} interval completed", completed);

        // The handler still sees the settings this interval ran with
        if let Some(handler) = self.on_session_end.as_mut() {
            handler(completed);
        }
        self.stop();
        TickOutcome::Completed(completed)
    }

    /// Stop counting down, keeping the remaining time, and apply any
    /// pending settings
    pub fn stop(&mut self) {
        self.running = false;
        if let Some(settings) = self.pending.take() {
            self.apply_settings(settings);
        }
    }

    fn apply_settings(&mut self, settings: Settings) {
        self.settings = settings;
        if let SecondsLeft::Remaining(seconds) = self.seconds_left {
            self.seconds_left = SecondsLeft::Remaining(seconds.min(self.total_seconds()));
        }
    }
}

impl fmt::Debug for TimerEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerEngine")
            .field("settings", &self.settings)
            .field("pending", &self.pending)
            .field("mode", &self.mode)
            .field("running", &self.running)
            .field("seconds_left", &self.seconds_left)
            .field("on_session_end", &self.on_session_end.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    fn settings(work: u32, short: u32, long: u32, threshold: u32) -> Settings {
        Settings {
            work_minutes: work,
            short_break_minutes: short,
            long_break_minutes: long,
            acc_threshold: threshold,
        }
    }

    fn recording_engine(settings: Settings) -> (TimerEngine, Arc<Mutex<Vec<Mode>>>) {
        let ended = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&ended);
        let engine = TimerEngine::with_session_end(settings, move |mode| {
            sink.lock().unwrap().push(mode);
        });
        (engine, ended)
    }

    fn advance(engine: &mut TimerEngine, ticks: usize) {
        for _ in 0..ticks {
            engine.tick();
        }
    }

    #[test]
    fn starts_in_focus_stopped_and_unset() {
        let engine = TimerEngine::new(Settings::default());
        assert_eq!(engine.mode(), Mode::Focus);
        assert!(!engine.is_running());
        assert_eq!(engine.remaining(), SecondsLeft::Unset);
        assert_eq!(engine.seconds_left(), 45 * 60);
        assert_eq!(engine.progress(), 0.0);
    }

    #[test]
    fn total_seconds_follow_mode() {
        let mut engine = TimerEngine::new(settings(30, 7, 25, 90));
        assert_eq!(engine.total_seconds(), 30 * 60);
        engine.switch_mode(Mode::ShortBreak);
        assert_eq!(engine.total_seconds(), 7 * 60);
        engine.switch_mode(Mode::LongBreak);
        assert_eq!(engine.total_seconds(), 25 * 60);
    }

    #[test]
    fn running_countdown_decrements_per_tick() {
        let mut engine = TimerEngine::new(settings(45, 10, 20, 100));
        engine.toggle_running();
        advance(&mut engine, 2);

        assert_eq!(engine.seconds_left(), 2698);
        assert!(engine.is_running());
    }

    #[test]
    fn paused_countdown_ignores_ticks() {
        let mut engine = TimerEngine::new(settings(45, 10, 20, 100));
        engine.toggle_running();
        advance(&mut engine, 2);
        engine.toggle_running();
        advance(&mut engine, 5);

        assert_eq!(engine.seconds_left(), 2698);
        assert!(!engine.is_running());
        assert_eq!(engine.tick(), TickOutcome::Idle);
    }

    #[test]
    fn completion_notifies_once_and_keeps_mode() {
        let (mut engine, ended) = recording_engine(settings(1, 10, 20, 100));
        engine.toggle_running();
        advance(&mut engine, 59);
        assert_eq!(engine.seconds_left(), 1);
        assert!(ended.lock().unwrap().is_empty());

        assert_eq!(engine.tick(), TickOutcome::Completed(Mode::Focus));
        assert_eq!(engine.remaining(), SecondsLeft::Remaining(0));
        assert!(!engine.is_running());
        assert_eq!(engine.mode(), Mode::Focus);

        advance(&mut engine, 10);
        assert_eq!(*ended.lock().unwrap(), vec![Mode::Focus]);
        assert_eq!(engine.progress(), 1.0);
    }

    #[test]
    fn toggling_exhausted_interval_restarts_it() {
        let (mut engine, ended) = recording_engine(settings(1, 1, 1, 100));
        engine.switch_mode(Mode::ShortBreak);
        engine.toggle_running();
        advance(&mut engine, 60);
        assert_eq!(engine.seconds_left(), 0);

        engine.toggle_running();
        assert!(engine.is_running());
        assert_eq!(engine.remaining(), SecondsLeft::Unset);
        assert_eq!(engine.seconds_left(), 60);
        assert_eq!(engine.mode(), Mode::ShortBreak);

        advance(&mut engine, 60);
        assert_eq!(*ended.lock().unwrap(), vec![Mode::ShortBreak, Mode::ShortBreak]);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut engine = TimerEngine::new(Settings::default());
        engine.switch_mode(Mode::LongBreak);
        engine.toggle_running();
        advance(&mut engine, 30);

        engine.reset();
        let once = engine.snapshot();
        engine.reset();
        assert_eq!(engine.snapshot(), once);
        assert_eq!(once.mode, Mode::LongBreak);
        assert!(!once.running);
        assert_eq!(once.seconds_left, 20 * 60);
    }

    #[test]
    fn focus_break_toggle_uses_inclusive_threshold() {
        let mut engine = TimerEngine::new(settings(45, 10, 20, 100));
        engine.toggle_focus_break(100);
        assert_eq!(engine.mode(), Mode::LongBreak);
        assert!(!engine.is_running());
        assert_eq!(engine.remaining(), SecondsLeft::Unset);
        assert_eq!(engine.seconds_left(), 20 * 60);

        engine.toggle_focus_break(100);
        assert_eq!(engine.mode(), Mode::Focus);

        engine.toggle_focus_break(99);
        assert_eq!(engine.mode(), Mode::ShortBreak);
    }

    #[test]
    fn switching_while_running_stops_and_rewinds() {
        let mut engine = TimerEngine::new(settings(45, 10, 20, 100));
        engine.toggle_running();
        advance(&mut engine, 120);

        engine.switch_mode(Mode::ShortBreak);
        assert!(!engine.is_running());
        assert_eq!(engine.remaining(), SecondsLeft::Unset);
        assert_eq!(engine.seconds_left(), 600);
    }

    #[test]
    fn progress_stays_in_unit_interval() {
        let mut engine = TimerEngine::new(settings(1, 1, 1, 1));
        engine.toggle_running();
        let mut last = engine.progress();
        assert_eq!(last, 0.0);
        for _ in 0..70 {
            engine.tick();
            let progress = engine.progress();
            assert!((0.0..=1.0).contains(&progress));
            assert!(progress >= last);
            last = progress;
        }
        assert_eq!(last, 1.0);
    }

    #[test]
    fn settings_apply_immediately_when_idle() {
        let mut engine = TimerEngine::new(settings(45, 10, 20, 100));
        engine.update_settings(settings(30, 10, 20, 100));
        assert_eq!(engine.total_seconds(), 1800);
        assert_eq!(engine.seconds_left(), 1800);
        assert!(engine.pending_settings().is_none());
    }

    #[test]
    fn settings_wait_while_running() {
        let mut engine = TimerEngine::new(settings(45, 10, 20, 100));
        engine.toggle_running();
        advance(&mut engine, 10);

        engine.update_settings(settings(30, 10, 20, 100));
        assert_eq!(engine.total_seconds(), 2700);
        assert_eq!(engine.pending_settings().map(|s| s.work_minutes), Some(30));
        advance(&mut engine, 1);
        assert_eq!(engine.seconds_left(), 2689);

        engine.toggle_running();
        assert!(engine.pending_settings().is_none());
        assert_eq!(engine.total_seconds(), 1800);
        assert_eq!(engine.seconds_left(), 1800);
    }

    #[test]
    fn paused_remaining_is_clamped_to_shorter_interval() {
        let mut engine = TimerEngine::new(settings(45, 10, 20, 100));
        engine.toggle_running();
        advance(&mut engine, 5);
        engine.toggle_running();

        engine.update_settings(settings(50, 10, 20, 100));
        assert_eq!(engine.seconds_left(), 2695);

        engine.update_settings(settings(10, 10, 20, 100));
        assert_eq!(engine.seconds_left(), 600);
        assert_eq!(engine.progress(), 0.0);
    }

    #[test]
    fn stop_keeps_remaining_time() {
        let mut engine = TimerEngine::new(settings(45, 10, 20, 100));
        engine.toggle_running();
        advance(&mut engine, 3);
        engine.stop();

        assert!(!engine.is_running());
        assert_eq!(engine.remaining(), SecondsLeft::Remaining(2697));
        assert_eq!(engine.snapshot().status(), "paused");
    }

    #[test]
    fn pending_settings_apply_on_completion() {
        let (mut engine, ended) = recording_engine(settings(1, 10, 20, 100));
        engine.toggle_running();
        engine.update_settings(settings(2, 10, 20, 100));
        advance(&mut engine, 60);

        assert_eq!(*ended.lock().unwrap(), vec![Mode::Focus]);
        assert_eq!(engine.seconds_left(), 0);
        assert_eq!(engine.total_seconds(), 120);

        engine.toggle_running();
        assert_eq!(engine.seconds_left(), 120);
    }
}
