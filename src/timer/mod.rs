//! Delayed actions with one outstanding timer per concern
//!
//! Arming a slot that already holds a timer cancels the old one. Every
//! timer also carries a [`ModeGuard`] captured when it was armed, so a
//! completion that fires after a later transition can be recognised as
//! stale and dropped.

mod registry;
mod task;

#[cfg(test)]
pub mod manual;

use std::time::Duration;

use crate::state::Mode;

pub use registry::TimerRegistry;
pub use task::TokioScheduler;

/// Identity of one armed timer; never reused within a registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub(crate) u64);

/// The concerns that may each hold at most one outstanding timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerSlot {
    Startup,
    PlaybackReturn,
    VideoReveal,
    ContainerHide,
    ClockHide,
    WakeRecord,
}

/// What to do when a timer fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    /// Logo has faded in; start fading it out
    StartupFadeOutLogo,
    /// Logo has faded out; resolve startup into the clock
    StartupFinish,
    /// Playback ran its full duration
    ReturnToClock,
    /// Container is visible; reveal and start the video
    RevealVideo,
    /// Container has faded out; take it out of the layout
    HideContainer,
    /// Clock has faded out; take it out of the layout
    HideClock,
    /// Wake fade finished; begin the recording that woke the device
    RecordAfterWake,
}

impl TimerAction {
    pub fn slot(&self) -> TimerSlot {
        match self {
            TimerAction::StartupFadeOutLogo | TimerAction::StartupFinish => TimerSlot::Startup,
            TimerAction::ReturnToClock => TimerSlot::PlaybackReturn,
            TimerAction::RevealVideo => TimerSlot::VideoReveal,
            TimerAction::HideContainer => TimerSlot::ContainerHide,
            TimerAction::HideClock => TimerSlot::ClockHide,
            TimerAction::RecordAfterWake => TimerSlot::WakeRecord,
        }
    }
}

/// Condition on the current mode that must still hold when a timer fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeGuard {
    StillIn(Mode),
    NotIn(Mode),
}

impl ModeGuard {
    pub fn holds(&self, current: Mode) -> bool {
        match *self {
            ModeGuard::StillIn(mode) => current == mode,
            ModeGuard::NotIn(mode) => current != mode,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    pub action: TimerAction,
    pub guard: ModeGuard,
}

impl Timer {
    pub fn new(action: TimerAction, guard: ModeGuard) -> Self {
        Self { action, guard }
    }
}

/// A timer whose delay has elapsed, delivered back to the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    pub id: TimerId,
    pub timer: Timer,
}

/// Runs delays on behalf of the registry
pub trait Scheduler: Send {
    fn schedule(&mut self, id: TimerId, delay: Duration, timer: Timer);
    fn cancel(&mut self, id: TimerId);
}
