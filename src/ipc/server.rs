//! Unix domain socket server for IPC
//!
//! Provides request-response communication and push notifications of
//! state changes and display commands to subscribed clients.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::unix::OwnedWriteHalf;
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, warn};

use crate::events::StateEvent;
use crate::state::StateHandle;
use crate::surface::DisplayCommand;

use super::protocol::{DeviceStatus, Notification, Request, Response};

const MAX_FRAME: usize = 1024 * 1024;

/// IPC Server handling client connections
pub struct Server {
    socket_path: PathBuf,
    listener: UnixListener,
    shutdown_tx: broadcast::Sender<()>,
    context: ClientContext,
}

/// What each client handler needs
#[derive(Clone)]
struct ClientContext {
    start_time: Instant,
    handle: StateHandle,
    events: broadcast::Sender<StateEvent>,
    display: broadcast::Sender<DisplayCommand>,
}

impl Server {
    /// Create a new IPC server
    pub fn new(
        socket_path: &Path,
        handle: StateHandle,
        events: broadcast::Sender<StateEvent>,
        display: broadcast::Sender<DisplayCommand>,
    ) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = socket_path.parent() {
            std::fs::create_dir_all(parent).context("failed to create socket directory")?;
        }

        // Remove stale socket if it exists
        if socket_path.exists() {
            std::fs::remove_file(socket_path).context("failed to remove stale socket")?;
        }

        let listener = UnixListener::bind(socket_path).context("failed to bind Unix socket")?;

        // Set socket permissions to owner-only (0600)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(socket_path, std::fs::Permissions::from_mode(0o600))?;
        }

        let (shutdown_tx, _) = broadcast::channel(1);

        info!(?socket_path, "IPC server listening");

        Ok(Self {
            socket_path: socket_path.to_owned(),
            listener,
            context: ClientContext {
                start_time: Instant::now(),
                handle,
                events,
                display,
            },
            shutdown_tx,
        })
    }

    /// Run the server, accepting connections
    pub async fn run(&self) -> Result<()> {
        loop {
            match self.listener.accept().await {
                Ok((stream, _addr)) => {
                    debug!("client connected");
                    let context = self.context.clone();
                    let mut shutdown_rx = self.shutdown_tx.subscribe();

                    tokio::spawn(async move {
                        tokio::select! {
                            result = Self::handle_client(stream, context) => {
                                if let Err(e) = result {
                                    warn!(?e, "client handler error");
                                }
                            }
                            _ = shutdown_rx.recv() => {
                                debug!("client handler shutting down");
                            }
                        }
                    });
                }
                Err(e) => {
                    error!(?e, "accept error");
                }
            }
        }
    }

    /// Handle a single client connection
    async fn handle_client(stream: UnixStream, context: ClientContext) -> Result<()> {
        let (mut reader, writer) = stream.into_split();
        let (out_tx, out_rx) = mpsc::channel::<Vec<u8>>(64);
        let writer_task = tokio::spawn(Self::write_frames(writer, out_rx));
        let mut forwarder = None;

        let mut len_buf = [0u8; 4];
        let result = loop {
            // Read message length (4-byte little-endian)
            match reader.read_exact(&mut len_buf).await {
                Ok(_) => {}
                Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    debug!("client disconnected");
                    break Ok(());
                }
                Err(e) => break Err(e.into()),
            }

            let len = u32::from_le_bytes(len_buf) as usize;
            if len > MAX_FRAME {
                warn!(len, "message too large, disconnecting");
                break Ok(());
            }

            // Read message body
            let mut msg_buf = vec![0u8; len];
            if let Err(e) = reader.read_exact(&mut msg_buf).await {
                break Err(anyhow::Error::from(e).context("failed to read message body"));
            }

            let response = match serde_json::from_slice::<Request>(&msg_buf) {
                Ok(request) => {
                    debug!(?request, "received request");
                    let (response, subscribe) = Self::process_request(request, &context).await;
                    if subscribe && forwarder.is_none() {
                        debug!("client subscribed to notifications");
                        forwarder = Some(AbortOnDrop(tokio::spawn(Self::forward_notifications(
                            context.events.subscribe(),
                            context.display.subscribe(),
                            out_tx.clone(),
                        ))));
                    }
                    response
                }
                Err(e) => {
                    debug!(error = %e, "unparsable request");
                    Response::error("bad_request", e.to_string())
                }
            };

            let frame = match encode(&response) {
                Ok(frame) => frame,
                Err(e) => break Err(e),
            };
            if out_tx.send(frame).await.is_err() {
                break Ok(());
            }
        };

        drop(forwarder);
        drop(out_tx);
        let _ = writer_task.await;

        result
    }

    /// Write length-prefixed frames until every sender is gone
    async fn write_frames(mut writer: OwnedWriteHalf, mut frames: mpsc::Receiver<Vec<u8>>) {
        while let Some(frame) = frames.recv().await {
            if let Err(e) = writer.write_all(&frame).await {
                debug!(error = %e, "client write failed");
                break;
            }
        }
    }

    async fn forward_notifications(
        mut events: broadcast::Receiver<StateEvent>,
        mut display: broadcast::Receiver<DisplayCommand>,
        out: mpsc::Sender<Vec<u8>>,
    ) {
        loop {
            let notification = tokio::select! {
                event = events.recv() => match event {
                    Ok(event) => Notification::StateChanged(event),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!(skipped = n, "state event subscriber lagged");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
                command = display.recv() => match command {
                    Ok(command) => Notification::Display { command },
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!(skipped = n, "display subscriber lagged");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
            };

            let frame = match encode(&notification) {
                Ok(frame) => frame,
                Err(e) => {
                    warn!(?e, "failed to encode notification");
                    continue;
                }
            };
            if out.send(frame).await.is_err() {
                break;
            }
        }
    }

    /// Process a request and return a response
    /// Returns (Response, should_subscribe)
    async fn process_request(request: Request, context: &ClientContext) -> (Response, bool) {
        match request {
            Request::Ping => (Response::Pong, false),

            Request::GetStatus => {
                let response = match context.handle.status().await {
                    Ok(snapshot) => {
                        let mut status = DeviceStatus::default();
                        status.apply(&snapshot);
                        status.uptime_secs = context.start_time.elapsed().as_secs();
                        Response::Status(status)
                    }
                    Err(e) => Response::error("unavailable", e.to_string()),
                };
                (response, false)
            }

            Request::Subscribe => (Response::Subscribed, true),

            request => {
                let Some(command) = request.into_command() else {
                    return (Response::error("bad_request", "unsupported request"), false);
                };
                let response = match context.handle.call(command).await {
                    Ok(Ok(())) => Response::Ack,
                    Ok(Err(e)) => Response::error("rejected", e.to_string()),
                    Err(e) => Response::error("unavailable", e.to_string()),
                };
                (response, false)
            }
        }
    }

    /// Gracefully shutdown the server
    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());

        // Remove socket file
        if self.socket_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.socket_path) {
                warn!(?e, "failed to remove socket file");
            }
        }

        info!("IPC server shutdown complete");
    }
}

/// Stops the notification forwarder when its client handler ends, including
/// when the handler is cancelled at shutdown
struct AbortOnDrop(tokio::task::JoinHandle<()>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Encode a length-prefixed JSON frame
fn encode<T: Serialize>(msg: &T) -> Result<Vec<u8>> {
    let body = serde_json::to_vec(msg)?;
    let mut frame = Vec::with_capacity(body.len() + 4);
    frame.extend_from_slice(&(body.len() as u32).to_le_bytes());
    frame.extend_from_slice(&body);
    Ok(frame)
}
