//! Presenter and recorder that forward every call to the UI client as a
//! serializable command on a broadcast channel.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::trace;

use super::{Element, Icon, Presenter, Recorder};

/// Rendering instructions pushed to subscribed UI clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DisplayCommand {
    Show { element: Element },
    Hide { element: Element },
    FadeIn { element: Element, duration_ms: Option<u64> },
    FadeOut { element: Element, duration_ms: Option<u64> },
    PlayVideo,
    ResetVideo,
    SleepVisual { asleep: bool },
    StartClock,
    StopClock,
    Status { text: String },
    ShowIcon { icon: Icon },
    HideIcons,
    ShowErrorMessage { message: String },
    HideErrorMessage,
    StartRecording,
    StopRecording,
    CancelRecording,
}

fn millis(duration: Option<Duration>) -> Option<u64> {
    duration.map(|d| d.as_millis() as u64)
}

fn send(tx: &broadcast::Sender<DisplayCommand>, command: DisplayCommand) {
    trace!(?command, "display command");
    // No subscribed UI is not an error; the command is simply dropped.
    let _ = tx.send(command);
}

pub struct ChannelPresenter {
    tx: broadcast::Sender<DisplayCommand>,
    clock_running: bool,
}

impl ChannelPresenter {
    pub fn new(tx: broadcast::Sender<DisplayCommand>) -> Self {
        Self {
            tx,
            clock_running: false,
        }
    }
}

impl Presenter for ChannelPresenter {
    fn show(&mut self, element: Element) {
        send(&self.tx, DisplayCommand::Show { element });
    }

    fn hide(&mut self, element: Element) {
        send(&self.tx, DisplayCommand::Hide { element });
    }

    fn fade_in(&mut self, element: Element, duration: Option<Duration>) {
        send(
            &self.tx,
            DisplayCommand::FadeIn {
                element,
                duration_ms: millis(duration),
            },
        );
    }

    fn fade_out(&mut self, element: Element, duration: Option<Duration>) {
        send(
            &self.tx,
            DisplayCommand::FadeOut {
                element,
                duration_ms: millis(duration),
            },
        );
    }

    fn play_video(&mut self) {
        send(&self.tx, DisplayCommand::PlayVideo);
    }

    fn reset_video(&mut self) {
        send(&self.tx, DisplayCommand::ResetVideo);
    }

    fn set_sleep_visual(&mut self, asleep: bool) {
        send(&self.tx, DisplayCommand::SleepVisual { asleep });
    }

    fn start_clock(&mut self) {
        self.clock_running = true;
        send(&self.tx, DisplayCommand::StartClock);
    }

    fn stop_clock(&mut self) {
        self.clock_running = false;
        send(&self.tx, DisplayCommand::StopClock);
    }

    fn clock_running(&self) -> bool {
        self.clock_running
    }

    fn set_status(&mut self, text: &str) {
        send(
            &self.tx,
            DisplayCommand::Status {
                text: text.to_string(),
            },
        );
    }

    fn show_icon(&mut self, icon: Icon) {
        send(&self.tx, DisplayCommand::ShowIcon { icon });
    }

    fn hide_icons(&mut self) {
        send(&self.tx, DisplayCommand::HideIcons);
    }

    fn show_error_message(&mut self, message: &str) {
        send(
            &self.tx,
            DisplayCommand::ShowErrorMessage {
                message: message.to_string(),
            },
        );
    }

    fn hide_error_message(&mut self) {
        send(&self.tx, DisplayCommand::HideErrorMessage);
    }
}

pub struct ChannelRecorder {
    tx: broadcast::Sender<DisplayCommand>,
}

impl ChannelRecorder {
    pub fn new(tx: broadcast::Sender<DisplayCommand>) -> Self {
        Self { tx }
    }
}

impl Recorder for ChannelRecorder {
    fn start(&mut self) {
        send(&self.tx, DisplayCommand::StartRecording);
    }

    fn stop(&mut self) {
        send(&self.tx, DisplayCommand::StopRecording);
    }

    fn cancel(&mut self) {
        send(&self.tx, DisplayCommand::CancelRecording);
    }
}
