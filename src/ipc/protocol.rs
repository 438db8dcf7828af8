//! IPC message protocol definitions
//!
//! All messages are JSON-encoded, prefixed with a 4-byte little-endian length.

use serde::{Deserialize, Serialize};

use crate::config::TransitionConfigPatch;
use crate::events::{InputMode, StateEvent};
use crate::state::{Command, Mode};
use crate::surface::DisplayCommand;

/// Requests from clients to daemon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    /// Ping to check connectivity
    Ping,

    /// Request current device status
    GetStatus,

    /// A classified gesture (`single_tap`, `double_tap`, `long_tap`)
    Gesture { gesture: String },

    /// A raw button edge
    Button { pressed: bool },

    /// Request a mode change
    Transition {
        mode: Mode,
        #[serde(default)]
        error: Option<String>,
    },

    StartRecording,
    StopRecording,
    PlayMostRecent,
    PlayPrevious,
    StopPlayback,

    /// A recording or generation failure
    ReportError { message: String },

    /// Replace individual transition durations
    UpdateTimings { timings: TransitionConfigPatch },

    SetInputMode { input_mode: InputMode },

    /// Subscribe to state change and display notifications
    Subscribe,
}

impl Request {
    /// The state machine command this request maps to, if any
    pub fn into_command(self) -> Option<Command> {
        let command = match self {
            Request::Ping | Request::GetStatus | Request::Subscribe => return None,
            Request::Gesture { gesture } => Command::Gesture(gesture),
            Request::Button { pressed } => Command::Button { pressed },
            Request::Transition { mode, error } => Command::Transition { mode, error },
            Request::StartRecording => Command::StartRecording,
            Request::StopRecording => Command::StopRecording,
            Request::PlayMostRecent => Command::PlayMostRecent,
            Request::PlayPrevious => Command::PlayPrevious,
            Request::StopPlayback => Command::StopPlayback,
            Request::ReportError { message } => Command::ReportError { message },
            Request::UpdateTimings { timings } => Command::UpdateTimings(timings),
            Request::SetInputMode { input_mode } => Command::SetInputMode(input_mode),
        };
        Some(command)
    }
}

/// Responses from daemon to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    /// Current device status
    Status(DeviceStatus),

    /// Command handled
    Ack,

    /// Pong response to ping
    Pong,

    /// Subscription confirmed
    Subscribed,

    /// Error response
    Error { code: String, message: String },
}

impl Response {
    pub fn error(code: &str, message: impl Into<String>) -> Self {
        Response::Error {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

/// Push notification from daemon to subscribed clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    /// A transition committed
    StateChanged(StateEvent),

    /// Rendering instruction for the UI
    Display { command: DisplayCommand },
}

/// Full device status snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceStatus {
    /// Daemon version
    pub version: String,

    /// Current mode
    pub mode: Mode,

    /// Mode before the latest transition
    pub previous: Mode,

    /// Message attached to `error` mode
    pub error: Option<String>,

    pub input_mode: InputMode,

    /// Uptime in seconds
    pub uptime_secs: u64,
}

impl Default for DeviceStatus {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            mode: Mode::Startup,
            previous: Mode::Startup,
            error: None,
            input_mode: InputMode::default(),
            uptime_secs: 0,
        }
    }
}

impl DeviceStatus {
    pub fn apply(&mut self, event: &StateEvent) {
        self.mode = event.mode;
        self.previous = event.previous;
        self.error = event.error.clone();
        self.input_mode = event.input_mode;
    }
}
