//! Deepwork Timer - a focus/break countdown engine served over HTTP
//! 
//! This is the main entry point for the deepwork-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use deepwork_timer::{
    config::Config,
    state::AppState,
    api::create_router,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("deepwork_timer={},tower_http=info", config.log_level()))
        .init();

    let settings = config.settings();
    info!("Starting deepwork-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, work={}min, short={}min, long={}min, threshold={}min",
          config.host, config.port, settings.work_minutes, settings.short_break_minutes,
          settings.long_break_minutes, settings.acc_threshold);

    // Create application state
    let state = Arc::new(AppState::new(config.port, config.host.clone(), settings));

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /api/v1/timer             - Timer, ledger and server status");
    info!("  POST /api/v1/timer/toggle      - Start or pause the countdown");
    info!("  POST /api/v1/timer/reset       - Rewind the current mode");
    info!("  POST /api/v1/timer/focus-break - Switch between focus and a break");
    info!("  POST /api/v1/timer/mode/:mode  - Switch to focus, shortBreak or longBreak");
    info!("  GET  /api/v1/timer/tag         - Session tag and suggestions");
    info!("  PUT  /api/v1/timer/tag         - Label upcoming focus sessions");
    info!("  GET  /api/v1/settings          - Active and pending settings");
    info!("  PUT  /api/v1/settings          - Replace the settings");
    info!("  GET  /api/v1/sessions          - Completed sessions");
    info!("  GET  /api/v1/health            - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        signal = shutdown_signal() => {
            match signal {
                Ok(signal) => info!("Shutdown signal {} received", signal),
                Err(e) => tracing::error!("Failed to install signal handler: {}", e),
            }
        }
    }

    if let Err(e) = state.dispose() {
        tracing::error!("{}", e);
    }

    info!("Server shutdown complete");
    Ok(())
}
