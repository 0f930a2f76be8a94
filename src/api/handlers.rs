//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};

use crate::state::{AppState, Mode, Settings, TimerSnapshot};
use super::responses::{
    ErrorResponse, HealthResponse, SessionsResponse, SettingsResponse, StatusResponse,
    TagRequest, TagResponse, TimerResponse,
};

/// Error status plus a JSON body explaining it
pub type ApiError = (StatusCode, Json<ErrorResponse>);

fn internal_error(context: &str, e: String) -> ApiError {
    error!("{}: {}", context, e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(format!("{}: {}", context, e))),
    )
}

fn bad_request(e: String) -> ApiError {
    warn!("Rejected request: {}", e);
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(e)))
}

fn timer_response(
    result: Result<TimerSnapshot, String>,
    context: &str,
    message: impl FnOnce(&TimerSnapshot) -> String,
) -> Result<Json<TimerResponse>, ApiError> {
    match result {
        Ok(snapshot) => {
            let message = message(&snapshot);
            Ok(Json(TimerResponse::new(message, snapshot)))
        }
        Err(e) => Err(internal_error(context, e)),
    }
}

/// Handle POST /api/v1/timer/toggle - Start or pause the countdown
pub async fn toggle_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TimerResponse>, ApiError> {
    timer_response(state.toggle_running(), "Failed to toggle timer", |snapshot| {
        if snapshot.running {
            format!("{} timer running", snapshot.mode)
        } else {
            format!("{} timer paused at {}", snapshot.mode, snapshot.clock())
        }
    })
}

/// Handle POST /api/v1/timer/reset - Rewind the current mode
pub async fn reset_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TimerResponse>, ApiError> {
    timer_response(state.reset(), "Failed to reset timer", |snapshot| {
        format!("{} timer reset to {}", snapshot.mode, snapshot.clock())
    })
}

/// Handle POST /api/v1/timer/focus-break - Switch between focus and a break
pub async fn focus_break_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TimerResponse>, ApiError> {
    timer_response(state.toggle_focus_break(), "Failed to toggle focus/break", |snapshot| {
        format!("Switched to {}", snapshot.mode)
    })
}

/// Handle POST /api/v1/timer/mode/:mode - Switch to an explicit mode
pub async fn switch_mode_handler(
    State(state): State<Arc<AppState>>,
    Path(mode): Path<String>,
) -> Result<Json<TimerResponse>, ApiError> {
    let mode: Mode = mode.parse().map_err(bad_request)?;
    timer_response(state.switch_mode(mode), "Failed to switch mode", |snapshot| {
        format!("Switched to {}", snapshot.mode)
    })
}

/// Handle GET /api/v1/timer - Return timer, ledger and server status
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, ApiError> {
    let timer = state
        .get_timer_state()
        .map_err(|e| internal_error("Failed to get timer state", e))?;

    let accumulated_minutes = state
        .accumulated_minutes()
        .map_err(|e| internal_error("Failed to read session ledger", e))?;

    let long_break_due = state
        .long_break_due()
        .map_err(|e| internal_error("Failed to read session ledger", e))?;

    let notification = state
        .get_notification()
        .map_err(|e| internal_error("Failed to read session ledger", e))?;

    let (tag, _) = state
        .get_tag()
        .map_err(|e| internal_error("Failed to read session ledger", e))?;

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        clock: timer.clock(),
        long_break_due,
        timer,
        accumulated_minutes,
        tag,
        notification,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /api/v1/timer/tag - Return the session tag and suggestions
pub async fn get_tag_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TagResponse>, ApiError> {
    let (tag, suggestions) = state
        .get_tag()
        .map_err(|e| internal_error("Failed to read session ledger", e))?;
    Ok(Json(TagResponse { tag, suggestions }))
}

/// Handle PUT /api/v1/timer/tag - Label upcoming focus sessions
pub async fn put_tag_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TagRequest>,
) -> Result<Json<TagResponse>, ApiError> {
    state
        .set_tag(request.tag)
        .map_err(|e| internal_error("Failed to set session tag", e))?;
    get_tag_handler(State(state)).await
}

/// Handle GET /api/v1/settings - Return active and pending settings
pub async fn get_settings_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SettingsResponse>, ApiError> {
    let timer = state
        .get_timer_state()
        .map_err(|e| internal_error("Failed to get timer state", e))?;
    Ok(Json(SettingsResponse::from(&timer)))
}

/// Handle PUT /api/v1/settings - Replace the timer settings
pub async fn put_settings_handler(
    State(state): State<Arc<AppState>>,
    Json(settings): Json<Settings>,
) -> Result<Json<SettingsResponse>, ApiError> {
    settings.validate().map_err(bad_request)?;

    match state.update_settings(settings) {
        Ok(timer) => {
            info!("Settings endpoint called - {:?}", settings);
            Ok(Json(SettingsResponse::from(&timer)))
        }
        Err(e) => Err(internal_error("Failed to update settings", e)),
    }
}

/// Handle GET /api/v1/sessions - Return completed sessions
pub async fn sessions_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SessionsResponse>, ApiError> {
    let sessions = state
        .get_sessions()
        .map_err(|e| internal_error("Failed to read session ledger", e))?;
    let accumulated_minutes = state
        .accumulated_minutes()
        .map_err(|e| internal_error("Failed to read session ledger", e))?;

    Ok(Json(SessionsResponse {
        accumulated_minutes,
        sessions,
    }))
}

/// Handle GET /api/v1/health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
