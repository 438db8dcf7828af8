//! State-change signal broadcast after every committed transition

use serde::{Deserialize, Serialize};

use crate::state::Mode;

/// How the input simulator is interpreting taps. Carried on every
/// state-change signal; dispatch does not depend on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    #[default]
    SingleTap,
    DoubleTap,
}

/// Emitted by the state machine once a transition has fully committed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateEvent {
    /// Mode just entered
    pub mode: Mode,

    /// Mode that was left
    pub previous: Mode,

    /// Message attached to `error` mode
    pub error: Option<String>,

    pub input_mode: InputMode,
}

impl std::fmt::Display for StateEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "STATE_CHANGED {} -> {}", self.previous, self.mode)?;
        if let Some(error) = &self.error {
            write!(f, " ({error})")?;
        }
        Ok(())
    }
}
