//! dream-recorder-daemon: mode controller for the dream recorder appliance
//!
//! This daemon owns the single authoritative UI mode and provides:
//! - Button edge classification into single, double and long taps
//! - The mode state machine and its timed visual transitions
//! - IPC server for the UI, recorder and button bridge
//!
//! Rendering, capture and video generation live in other processes. The
//! daemon only tells them what to do over the socket and HTTP.

mod config;
mod events;
mod gesture;
mod ipc;
mod lifecycle;
mod state;
mod surface;
mod timer;

use anyhow::{Context, Result};
use tokio::sync::broadcast;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use crate::config::{DaemonConfig, TransitionConfig};
use crate::events::StateEvent;
use crate::ipc::Server;
use crate::lifecycle::ShutdownSignal;
use crate::state::{Collaborators, Runner, StateMachine};
use crate::surface::{ChannelPresenter, ChannelRecorder, DisplayCommand, HttpBackend};
use crate::timer::TokioScheduler;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "dream-recorder-daemon starting"
    );

    // Load configuration
    let config = DaemonConfig::load()?;
    config.ensure_dirs()?;
    info!(?config.socket_path, backend = %config.backend_url, "configuration loaded");

    let client = reqwest::Client::builder()
        .build()
        .context("failed to build HTTP client")?;
    let transitions =
        TransitionConfig::load(&client, &config.backend_url, config.config_timeout).await;

    let mut shutdown = ShutdownSignal::new().context("failed to install signal handlers")?;

    // State machine -> IPC server and subscribers
    let (event_tx, _event_rx) = broadcast::channel::<StateEvent>(64);
    // Presenter and recorder -> UI clients
    let (display_tx, _display_rx) = broadcast::channel::<DisplayCommand>(256);

    let (scheduler, fired_rx) = TokioScheduler::new();
    let mut machine = StateMachine::new(
        transitions,
        Collaborators {
            presenter: Box::new(ChannelPresenter::new(display_tx.clone())),
            backend: Box::new(HttpBackend::new(client, config.backend_url.clone())),
            recorder: Box::new(ChannelRecorder::new(display_tx.clone())),
        },
        Box::new(scheduler),
        event_tx.clone(),
    );
    machine.register_subscriber(|mode, previous| {
        debug!(%previous, %mode, "mode subscriber notified");
    });

    let (runner, handle) = Runner::new(machine, fired_rx, config.long_tap);

    let server = Server::new(&config.socket_path, handle, event_tx, display_tx)?;

    info!("daemon initialized, entering main loop");

    tokio::select! {
        // Run the state machine (commands, timers, button deadlines)
        _ = runner.run() => {
            info!("state machine exited");
        }

        // Run the IPC server (accepts client connections)
        result = server.run() => {
            if let Err(e) = result {
                error!(?e, "IPC server error");
            }
        }

        // Wait for shutdown signal
        _ = shutdown.wait() => {
            info!("shutdown signal received");
        }
    }

    info!("shutting down...");

    server.shutdown().await;

    info!("dream-recorder-daemon stopped");

    Ok(())
}
