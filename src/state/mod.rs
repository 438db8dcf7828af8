//! State machine module for mode management
//!
//! Provides an explicit state machine over the device modes:
//! - Startup: logo animation, resolves only into Clock
//! - Clock: idle face
//! - Recording / Processing / Playback: the dream cycle
//! - Error: a reported failure with its message
//! - ScreenSleep: dimmed display

mod effects;
mod machine;
mod mode;
mod runner;

#[cfg(test)]
mod testing;

pub use machine::{Collaborators, StateMachine, TransitionError};
pub use mode::Mode;
pub use runner::{Command, Runner, StateHandle};
