//! Device modes

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The operating phase of the device. Exactly one is current at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Logo animation at boot; may only resolve into `Clock`
    Startup,
    /// Idle, showing the clock face
    Clock,
    /// Capturing a dream
    Recording,
    /// Waiting for the backend to generate media
    Processing,
    /// Showing generated media
    Playback,
    /// A domain error is being shown
    Error,
    /// Display dimmed to save power
    ScreenSleep,
}

impl Default for Mode {
    fn default() -> Self {
        Self::Startup
    }
}

impl Mode {
    pub const ALL: [Mode; 7] = [
        Mode::Startup,
        Mode::Clock,
        Mode::Recording,
        Mode::Processing,
        Mode::Playback,
        Mode::Error,
        Mode::ScreenSleep,
    ];

    /// Wire name of the mode
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Startup => "startup",
            Mode::Clock => "clock",
            Mode::Recording => "recording",
            Mode::Processing => "processing",
            Mode::Playback => "playback",
            Mode::Error => "error",
            Mode::ScreenSleep => "screen_sleep",
        }
    }

    /// Status-line rendering: first letter upper-cased, rest untouched
    pub fn capitalized(&self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown mode: {0}")]
pub struct ParseModeError(pub String);

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| ParseModeError(s.to_string()))
    }
}
