//! Classifies raw button edges into gestures
//!
//! A press starting soon after the previous press is a double tap. A press
//! held long enough is a long tap. A lone short press becomes a single tap
//! once the double-tap window has passed without a second press.

use std::time::{Duration, Instant};

use tracing::debug;

use super::Gesture;

pub const DEBOUNCE: Duration = Duration::from_millis(50);
pub const DOUBLE_TAP_WINDOW: Duration = Duration::from_millis(800);
/// A press released at or past this, before the long-tap threshold, yields
/// no gesture at all.
pub const MAX_TAP_DURATION: Duration = Duration::from_secs(2);
const PRESS_HISTORY: Duration = Duration::from_secs(3);

pub struct TapDetector {
    long_tap: Duration,
    pressed: bool,
    last_change: Option<Instant>,
    /// Start times of recent presses
    presses: Vec<Instant>,
    /// Start of the press currently held, if any
    press_start: Option<Instant>,
    long_tap_reported: bool,
}

impl TapDetector {
    pub fn new(long_tap: Duration) -> Self {
        Self {
            long_tap,
            pressed: false,
            last_change: None,
            presses: Vec::new(),
            press_start: None,
            long_tap_reported: false,
        }
    }

    /// Feed a button edge. Double taps resolve here, on the second press.
    pub fn edge(&mut self, pressed: bool, now: Instant) -> Option<Gesture> {
        if pressed == self.pressed {
            return None;
        }
        if let Some(last) = self.last_change {
            if now.saturating_duration_since(last) <= DEBOUNCE {
                debug!("button edge debounced");
                return None;
            }
        }
        self.last_change = Some(now);
        self.pressed = pressed;

        if pressed {
            self.on_press(now)
        } else {
            self.on_release(now);
            None
        }
    }

    fn on_press(&mut self, now: Instant) -> Option<Gesture> {
        self.press_start = Some(now);
        self.long_tap_reported = false;

        self.presses.push(now);
        self.presses
            .retain(|start| now.saturating_duration_since(*start) < PRESS_HISTORY);

        if let [.., previous, last] = self.presses[..] {
            if last.saturating_duration_since(previous) < DOUBLE_TAP_WINDOW {
                self.presses.clear();
                self.press_start = None;
                return Some(Gesture::DoubleTap);
            }
        }
        None
    }

    fn on_release(&mut self, now: Instant) {
        if let Some(start) = self.press_start.take() {
            if !self.long_tap_reported && now.saturating_duration_since(start) >= MAX_TAP_DURATION
            {
                debug!("press too long for a tap, too short for a long tap");
                self.presses.clear();
            }
        }
    }

    /// Resolve time-based gestures: long tap while held, single tap after
    /// the double-tap window closes.
    pub fn poll(&mut self, now: Instant) -> Option<Gesture> {
        if let Some(start) = self.press_start {
            if !self.long_tap_reported && now.saturating_duration_since(start) >= self.long_tap {
                self.long_tap_reported = true;
                self.presses.clear();
                return Some(Gesture::LongTap);
            }
        }

        if let [only] = self.presses[..] {
            if self.press_start.is_none()
                && !self.long_tap_reported
                && now.saturating_duration_since(only) >= DOUBLE_TAP_WINDOW
            {
                self.presses.clear();
                return Some(Gesture::SingleTap);
            }
        }
        None
    }

    /// Next instant at which [`poll`](Self::poll) may produce a gesture
    pub fn next_deadline(&self) -> Option<Instant> {
        if let Some(start) = self.press_start {
            return (!self.long_tap_reported).then(|| start + self.long_tap);
        }
        match self.presses[..] {
            [only] if !self.long_tap_reported => Some(only + DOUBLE_TAP_WINDOW),
            _ => None,
        }
    }
}
