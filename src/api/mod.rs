//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/timer", get(status_handler))
        .route("/api/v1/timer/toggle", post(toggle_handler))
        .route("/api/v1/timer/reset", post(reset_handler))
        .route("/api/v1/timer/focus-break", post(focus_break_handler))
        .route("/api/v1/timer/mode/:mode", post(switch_mode_handler))
        .route("/api/v1/timer/tag", get(get_tag_handler).put(put_tag_handler))
        .route("/api/v1/settings", get(get_settings_handler).put(put_settings_handler))
        .route("/api/v1/sessions", get(sessions_handler))
        .route("/api/v1/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
