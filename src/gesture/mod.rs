//! Gesture module for button input
//!
//! Classifies raw button edges into single/double/long taps and maps each
//! gesture, given the current mode, to an action.

mod detector;
mod dispatch;
mod kind;

pub use detector::TapDetector;
pub use dispatch::{decide, GestureAction};
pub use kind::Gesture;
