//! Engine plus the ticker that drives it

use std::sync::{Arc, Mutex};
use tracing::debug;

use super::{Settings, TickOutcome, TimerEngine, TimerSnapshot};
use crate::tasks::ticker::{spawn_ticker, TickerHandle};

/// Owns the engine and at most one live ticker for it.
///
/// Shared as `Arc<Mutex<TimerWidget>>`; every operation and every tick goes
/// through that lock, so ticks never interleave with operations. Any change
/// that leaves the engine stopped cancels the ticker and bumps `generation`
/// while the lock is held.
#[derive(Debug)]
pub struct TimerWidget {
    engine: TimerEngine,
    ticker: Option<TickerHandle>,
    generation: u64,
}

impl TimerWidget {
    pub fn new(engine: TimerEngine) -> Self {
        Self {
            engine,
            ticker: None,
            generation: 0,
        }
    }

    /// Wrap a widget for sharing with its ticker
    pub fn shared(engine: TimerEngine) -> Arc<Mutex<Self>> {
        Arc::new(Mutex::new(Self::new(engine)))
    }

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        self.engine.snapshot()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Check if a ticker is currently driving the engine
    pub fn is_ticking(&self) -> bool {
        self.ticker
            .as_ref()
            .is_some_and(|ticker| ticker.is_live(self.generation))
    }

    /// Apply an operation to the engine, then start or cancel the ticker to
    /// match the engine's running flag. `this` must be the `Arc` holding
    /// `self`.
    pub fn apply<F>(&mut self, this: &Arc<Mutex<TimerWidget>>, operation: F) -> TimerSnapshot
    where
        F: FnOnce(&mut TimerEngine),
    {
        operation(&mut self.engine);
        self.sync_ticker(this);
        self.engine.snapshot()
    }

    pub fn update_settings(&mut self, settings: Settings) -> TimerSnapshot {
        self.engine.update_settings(settings);
        self.engine.snapshot()
    }

    /// Advance one second; called by the ticker only
    pub(crate) fn tick(&mut self) -> TickOutcome {
        self.engine.tick()
    }

    /// Invalidate the current ticker after it finished on its own
    pub(crate) fn retire_ticker(&mut self) {
        self.generation += 1;
    }

    /// Stop the countdown and cancel any ticker so nothing fires after the
    /// host goes away
    pub fn dispose(&mut self) {
        self.engine.stop();
        if let Some(ticker) = self.ticker.take() {
            self.generation += 1;
            ticker.cancel();
        }
    }

    fn sync_ticker(&mut self, this: &Arc<Mutex<TimerWidget>>) {
        if self.engine.is_running() {
            if !self.is_ticking() {
                self.generation += 1;
                self.ticker = Some(spawn_ticker(Arc::downgrade(this), self.generation));
            }
        } else if let Some(ticker) = self.ticker.take() {
            self.generation += 1;
            ticker.cancel();
        }
        debug!(
            "Ticker synced: running={}, generation={}",
            self.engine.is_running(),
            self.generation
        );
    }
}

impl Drop for TimerWidget {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::state::{Mode, SecondsLeft};

    fn settings(work: u32) -> Settings {
        Settings {
            work_minutes: work,
            ..Settings::default()
        }
    }

    async fn run_for(seconds: u64) {
        // half-second offset keeps the sleep clear of tick deadlines
        tokio::time::sleep(Duration::from_millis(seconds * 1000 + 500)).await;
    }

    fn seconds_left(widget: &Arc<Mutex<TimerWidget>>) -> u64 {
        widget.lock().unwrap().engine().seconds_left()
    }

    fn toggle(widget: &Arc<Mutex<TimerWidget>>) {
        widget.lock().unwrap().apply(widget, |engine| engine.toggle_running());
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_counts_down_while_running() {
        let widget = TimerWidget::shared(TimerEngine::new(settings(45)));
        toggle(&widget);
        assert!(widget.lock().unwrap().is_ticking());

        run_for(2).await;
        assert_eq!(seconds_left(&widget), 2698);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_cancels_ticker() {
        let widget = TimerWidget::shared(TimerEngine::new(settings(45)));
        toggle(&widget);
        run_for(2).await;
        toggle(&widget);
        assert!(!widget.lock().unwrap().is_ticking());

        run_for(5).await;
        assert_eq!(seconds_left(&widget), 2698);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_does_not_double_tick() {
        let widget = TimerWidget::shared(TimerEngine::new(settings(45)));
        toggle(&widget);
        toggle(&widget);
        toggle(&widget);

        run_for(3).await;
        assert_eq!(seconds_left(&widget), 2697);
    }

    #[tokio::test(start_paused = true)]
    async fn completion_stops_ticker_and_keeps_mode() {
        let ended = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&ended);
        let engine = TimerEngine::with_session_end(settings(1), move |mode| {
            sink.lock().unwrap().push(mode);
        });
        let widget = TimerWidget::shared(engine);
        toggle(&widget);

        run_for(65).await;
        {
            let guard = widget.lock().unwrap();
            assert_eq!(guard.engine().remaining(), SecondsLeft::Remaining(0));
            assert_eq!(guard.engine().mode(), Mode::Focus);
            assert!(!guard.engine().is_running());
            assert!(!guard.is_ticking());
        }
        assert_eq!(*ended.lock().unwrap(), vec![Mode::Focus]);

        toggle(&widget);
        assert!(widget.lock().unwrap().is_ticking());
        run_for(1).await;
        assert_eq!(seconds_left(&widget), 59);
    }

    #[tokio::test(start_paused = true)]
    async fn switch_mode_cancels_ticker() {
        let widget = TimerWidget::shared(TimerEngine::new(settings(45)));
        toggle(&widget);
        run_for(4).await;

        widget
            .lock()
            .unwrap()
            .apply(&widget, |engine| engine.switch_mode(Mode::ShortBreak));
        run_for(3).await;

        let guard = widget.lock().unwrap();
        assert!(!guard.engine().is_running());
        assert_eq!(guard.engine().remaining(), SecondsLeft::Unset);
        assert_eq!(guard.engine().seconds_left(), 600);
    }

    #[tokio::test(start_paused = true)]
    async fn dispose_stops_ticks() {
        let widget = TimerWidget::shared(TimerEngine::new(settings(45)));
        toggle(&widget);
        run_for(1).await;
        widget.lock().unwrap().dispose();

        run_for(5).await;
        assert_eq!(seconds_left(&widget), 2699);
        let guard = widget.lock().unwrap();
        assert!(!guard.is_ticking());
        assert!(!guard.engine().is_running());
        assert_eq!(guard.snapshot().status(), "paused");
    }
}
