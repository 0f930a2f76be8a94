//! Once-per-second countdown driver

use std::{
    sync::{Mutex, Weak},
    time::Duration,
};
use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant},
};
use tracing::{debug, error, info};

use crate::state::{TickOutcome, TimerWidget};

/// Nominal spacing between ticks
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Owned handle to a running countdown task; dropping it cancels the task
#[derive(Debug)]
pub struct TickerHandle {
    generation: u64,
    task: JoinHandle<()>,
}

impl TickerHandle {
    /// Check if the task is still ticking for `generation`
    pub fn is_live(&self, generation: u64) -> bool {
        self.generation == generation && !self.task.is_finished()
    }

    /// Stop the task; no tick runs after this returns unless it already
    /// holds the widget lock
    pub fn cancel(self) {
        debug!("Cancelling ticker generation {}", self.generation);
        // Drop aborts the task
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Spawn the countdown task for `generation` of `widget`
pub fn spawn_ticker(widget: Weak<Mutex<TimerWidget>>, generation: u64) -> TickerHandle {
    debug!("Starting ticker generation {}", generation);
    let task = tokio::spawn(countdown_task(widget, generation));
    TickerHandle { generation, task }
}

/// Background task that ticks the engine until its interval ends or the
/// ticker is superseded
async fn countdown_task(widget: Weak<Mutex<TimerWidget>>, generation: u64) {
    let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);

    loop {
        interval.tick().await;

        let Some(shared) = widget.upgrade() else {
            debug!("Timer widget dropped, ticker generation {} exiting", generation);
            break;
        };
        let mut guard = match shared.lock() {
            Ok(guard) => guard,
            Err(e) => {
                error!("Failed to lock timer widget: {}", e);
                break;
            }
        };

        // A stop or restart raced this tick to the lock
        if guard.generation() != generation {
            debug!("Discarding tick from stale ticker generation {}", generation);
            break;
        }

        match guard.tick() {
            TickOutcome::Advanced(seconds) => {
                debug!("Tick: {} seconds left", seconds);
            }
            TickOutcome::Completed(mode) => {
                info!("{} interval finished, waiting for the next action", mode);
                guard.retire_ticker();
                break;
            }
            TickOutcome::Idle => {
                debug!("Engine no longer running, ticker generation {} exiting", generation);
                break;
            }
        }
    }
}
