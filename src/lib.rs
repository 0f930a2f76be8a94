//! Deepwork Timer - a focus/break countdown engine served over HTTP
//! 
//! This library provides the timer state machine, the tokio ticker that
//! drives it, an in-memory session ledger, and the HTTP API exposing them.

pub mod config;
pub mod state;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{AppState, Mode, Settings, TimerEngine, TimerSnapshot};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
