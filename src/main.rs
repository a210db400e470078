//! Timer Viewer - A polling display client for networked countdown timers
//!
//! This is the main entry point for the timer-viewer application.

use std::{sync::Arc, time::Duration};

use tracing::info;

use timer_viewer::{
    alert::audio::{unlock_on_first_input, AudioOutput},
    config::Config,
    render::TerminalSurface,
    state::ViewerState,
    tasks::snapshot_poll_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Arc::new(Config::parse());

    // Initialize tracing with appropriate log level; logs go to stderr so
    // they do not fight the timer display on stdout
    tracing_subscriber::fmt()
        .with_env_filter(format!("timer_viewer={}", config.log_level()))
        .with_writer(std::io::stderr)
        .init();

    info!("Starting timer-viewer v1.0.0");
    info!(
        "Configuration: server={}, poll_interval={}ms, timers={:?}",
        config.server, config.poll_interval_ms, config.timer_ids
    );

    // Session state: one edge tracker per configured timer id
    let state = Arc::new(ViewerState::new(&config.timer_ids, config.time_format));

    // Audio runs on its own thread and stays locked until the first keypress
    let audio = AudioOutput::spawn();
    tokio::spawn(unlock_on_first_input(audio.clone()));
    info!("Press any key to unlock audio alerts");

    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(config.request_timeout_ms))
        .build()?;
    let surface = TerminalSurface::stdout();

    // Poll until a shutdown signal arrives
    let poller = snapshot_poll_task(
        Arc::clone(&state),
        client,
        Arc::clone(&config),
        audio,
        surface,
    );

    tokio::select! {
        _ = poller => {}
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    if let Some(at) = state.last_applied_at() {
        info!("Last snapshot applied at {}", at);
    }
    info!("Viewer shutdown complete (uptime {})", state.uptime());
    Ok(())
}
