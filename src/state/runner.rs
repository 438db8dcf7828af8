//! Event loop that owns the state machine
//!
//! Commands from IPC, fired timers and button-edge deadlines are all
//! serialized onto this loop, so each is handled against the mode left by
//! the one before it.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::config::TransitionConfigPatch;
use crate::events::{InputMode, StateEvent};
use crate::gesture::{Gesture, TapDetector};
use crate::timer::Fired;

use super::{Mode, StateMachine, TransitionError};

/// Requests the outside world can make of the state machine
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// A gesture by name; unknown names are dropped
    Gesture(String),
    /// A raw button edge for the tap detector
    Button { pressed: bool },
    Transition { mode: Mode, error: Option<String> },
    StartRecording,
    StopRecording,
    PlayMostRecent,
    PlayPrevious,
    StopPlayback,
    ReportError { message: String },
    UpdateTimings(TransitionConfigPatch),
    SetInputMode(InputMode),
}

type Reply = oneshot::Sender<Result<(), TransitionError>>;

enum Envelope {
    Command { command: Command, reply: Reply },
    Status { reply: oneshot::Sender<StateEvent> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("state machine is not running")]
pub struct MachineUnavailable;

/// Cloneable sender side of the runner's command queue
#[derive(Clone)]
pub struct StateHandle {
    tx: mpsc::Sender<Envelope>,
}

impl StateHandle {
    /// Queue a command and wait until the machine has handled it
    pub async fn call(
        &self,
        command: Command,
    ) -> Result<Result<(), TransitionError>, MachineUnavailable> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(Envelope::Command { command, reply })
            .await
            .map_err(|_| MachineUnavailable)?;
        response.await.map_err(|_| MachineUnavailable)
    }

    /// Read the state as of every command queued before this call
    pub async fn status(&self) -> Result<StateEvent, MachineUnavailable> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(Envelope::Status { reply })
            .await
            .map_err(|_| MachineUnavailable)?;
        response.await.map_err(|_| MachineUnavailable)
    }
}

pub struct Runner {
    machine: StateMachine,
    fired_rx: mpsc::UnboundedReceiver<Fired>,
    command_rx: mpsc::Receiver<Envelope>,
    detector: TapDetector,
}

impl Runner {
    /// Create the runner and the handle used to reach it
    pub fn new(
        machine: StateMachine,
        fired_rx: mpsc::UnboundedReceiver<Fired>,
        long_tap: Duration,
    ) -> (Self, StateHandle) {
        let (tx, command_rx) = mpsc::channel(32);
        let runner = Self {
            machine,
            fired_rx,
            command_rx,
            detector: TapDetector::new(long_tap),
        };
        (runner, StateHandle { tx })
    }

    /// Run the startup sequence, then process events until every handle
    /// is dropped.
    pub async fn run(mut self) {
        info!("state machine started");
        self.machine.start();

        loop {
            let deadline = self.detector.next_deadline();

            tokio::select! {
                envelope = self.command_rx.recv() => match envelope {
                    Some(Envelope::Command { command, reply }) => {
                        let result = self.handle(command);
                        let _ = reply.send(result);
                    }
                    Some(Envelope::Status { reply }) => {
                        let _ = reply.send(self.machine.status());
                    }
                    None => break,
                },

                Some(fired) = self.fired_rx.recv() => {
                    self.machine.on_timer(fired);
                }

                _ = async {
                    match deadline {
                        Some(at) => tokio::time::sleep_until(Instant::from_std(at)).await,
                        None => std::future::pending::<()>().await,
                    }
                } => {
                    if let Some(gesture) = self.detector.poll(Instant::now().into_std()) {
                        self.gesture(gesture);
                    }
                }
            }
        }

        info!(
            mode = %self.machine.mode(),
            previous = %self.machine.previous(),
            error = ?self.machine.error(),
            input_mode = ?self.machine.input_mode(),
            "state machine stopped"
        );
    }

    fn gesture(&mut self, gesture: Gesture) {
        info!(%gesture, "gesture detected");
        self.machine.dispatch_gesture(gesture);
    }

    fn handle(&mut self, command: Command) -> Result<(), TransitionError> {
        debug!(?command, "handling command");
        match command {
            Command::Gesture(name) => {
                match name.parse::<Gesture>() {
                    Ok(gesture) => self.machine.dispatch_gesture(gesture),
                    Err(e) => debug!(error = %e, "malformed gesture dropped"),
                }
                Ok(())
            }
            Command::Button { pressed } => {
                if let Some(gesture) = self.detector.edge(pressed, Instant::now().into_std()) {
                    self.gesture(gesture);
                }
                Ok(())
            }
            Command::Transition { mode, error } => self.machine.request_transition(mode, error),
            Command::StartRecording => self.machine.start_recording(),
            Command::StopRecording => self.machine.stop_recording(),
            Command::PlayMostRecent => self.machine.play_most_recent(),
            Command::PlayPrevious => self.machine.play_previous(),
            Command::StopPlayback => {
                self.machine.stop_playback();
                Ok(())
            }
            Command::ReportError { message } => self.machine.report_error(message),
            Command::UpdateTimings(patch) => {
                self.machine.update_timings(&patch);
                Ok(())
            }
            Command::SetInputMode(input_mode) => {
                self.machine.set_input_mode(input_mode);
                Ok(())
            }
        }
    }
}
