//! Background tasks module
//! 
//! This module contains background tasks that run alongside the HTTP server.

pub mod ticker;

// Re-export main items
pub use ticker::{spawn_ticker, TickerHandle, TICK_PERIOD};
