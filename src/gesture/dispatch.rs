//! Gesture-to-action table
//!
//! Pure decision logic: which action a gesture triggers in the current
//! mode. Executing the action is the state machine's job.

use crate::state::Mode;

use super::Gesture;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureAction {
    /// clock, single tap
    PlayMostRecent,
    /// recording, single tap
    StopRecording,
    /// playback, single tap
    PlayPrevious,
    /// error, single tap
    ClearError,
    /// screen_sleep, single tap
    Wake,
    /// clock, double tap
    StartRecording,
    /// recording, double tap
    CancelRecording,
    /// playback, double tap
    StopPlayback,
    /// screen_sleep, double tap: wake now, record once the wake fade ends
    WakeAndRecord,
    /// clock, long tap
    Sleep,
}

impl GestureAction {
    /// Mode the action transitions into immediately
    pub fn target(&self) -> Mode {
        match self {
            GestureAction::PlayMostRecent | GestureAction::PlayPrevious => Mode::Playback,
            GestureAction::StopRecording => Mode::Processing,
            GestureAction::StartRecording => Mode::Recording,
            GestureAction::Sleep => Mode::ScreenSleep,
            GestureAction::ClearError
            | GestureAction::Wake
            | GestureAction::CancelRecording
            | GestureAction::StopPlayback
            | GestureAction::WakeAndRecord => Mode::Clock,
        }
    }
}

/// `None` for every combination the table leaves unlisted
pub fn decide(gesture: Gesture, mode: Mode) -> Option<GestureAction> {
    use GestureAction::*;

    match (gesture, mode) {
        (Gesture::SingleTap, Mode::Clock) => Some(PlayMostRecent),
        (Gesture::SingleTap, Mode::Recording) => Some(StopRecording),
        (Gesture::SingleTap, Mode::Playback) => Some(PlayPrevious),
        (Gesture::SingleTap, Mode::Error) => Some(ClearError),
        (Gesture::SingleTap, Mode::ScreenSleep) => Some(Wake),

        (Gesture::DoubleTap, Mode::Clock) => Some(StartRecording),
        (Gesture::DoubleTap, Mode::Recording) => Some(CancelRecording),
        (Gesture::DoubleTap, Mode::Playback) => Some(StopPlayback),
        (Gesture::DoubleTap, Mode::ScreenSleep) => Some(WakeAndRecord),

        (Gesture::LongTap, Mode::Clock) => Some(Sleep),

        _ => None,
    }
}
