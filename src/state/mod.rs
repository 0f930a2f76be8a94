//! State management module
//! 
//! This module contains the timer engine, the widget that hosts it, and the
//! session bookkeeping around it.

pub mod app_state;
pub mod engine;
pub mod ledger;
pub mod mode;
pub mod timer_state;
pub mod widget;

// Re-export main types
pub use app_state::AppState;
pub use engine::{SessionEndHandler, TickOutcome, TimerEngine};
pub use ledger::{Notification, SessionLedger, SessionRecord, DEFAULT_TAG};
pub use mode::{Mode, Settings};
pub use timer_state::{SecondsLeft, TimerSnapshot};
pub use widget::TimerWidget;
