//! Collaborators the state machine drives but does not implement
//!
//! - `Presenter`: visual surfaces, icons, status text and the clock's
//!   periodic update resource
//! - `Backend`: media backend playback signals
//! - `Recorder`: audio/video capture
//!
//! Every call is fire-and-forget. A collaborator that cannot act degrades
//! to a no-op for that effect; it never reports back into a transition.

mod backend;
mod channel;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use backend::{BackendSignal, HttpBackend};
pub use channel::{ChannelPresenter, ChannelRecorder, DisplayCommand};

/// Animated UI elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    Logo,
    Clock,
    VideoContainer,
    Video,
}

/// Icon animations shown by the icon animator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Icon {
    Recording,
    Generating,
    Error,
}

pub trait Presenter: Send {
    /// Put the element in the layout (display on)
    fn show(&mut self, element: Element);

    /// Take the element out of the layout (display off)
    fn hide(&mut self, element: Element);

    /// Animate opacity to 1. `None` uses the element's own transition.
    fn fade_in(&mut self, element: Element, duration: Option<Duration>);

    /// Animate opacity to 0. `None` uses the element's own transition.
    fn fade_out(&mut self, element: Element, duration: Option<Duration>);

    /// Start the video if it is paused
    fn play_video(&mut self);

    /// Pause the video and rewind it to the start
    fn reset_video(&mut self);

    fn set_sleep_visual(&mut self, asleep: bool);

    fn start_clock(&mut self);
    fn stop_clock(&mut self);
    fn clock_running(&self) -> bool;

    fn set_status(&mut self, text: &str);
    fn show_icon(&mut self, icon: Icon);
    fn hide_icons(&mut self);

    fn show_error_message(&mut self, message: &str);
    fn hide_error_message(&mut self);
}

pub trait Backend: Send {
    fn signal(&self, signal: BackendSignal);
}

pub trait Recorder: Send {
    fn start(&mut self);

    /// Finish and submit the capture for processing
    fn stop(&mut self);

    /// Finish and discard the capture
    fn cancel(&mut self);
}
