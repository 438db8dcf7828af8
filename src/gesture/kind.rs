use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A discrete user input on the device's single button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gesture {
    SingleTap,
    DoubleTap,
    LongTap,
}

impl Gesture {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gesture::SingleTap => "single_tap",
            Gesture::DoubleTap => "double_tap",
            Gesture::LongTap => "long_tap",
        }
    }
}

impl std::fmt::Display for Gesture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown gesture: {0}")]
pub struct ParseGestureError(pub String);

impl FromStr for Gesture {
    type Err = ParseGestureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single_tap" => Ok(Gesture::SingleTap),
            "double_tap" => Ok(Gesture::DoubleTap),
            "long_tap" => Ok(Gesture::LongTap),
            other => Err(ParseGestureError(other.to_string())),
        }
    }
}
