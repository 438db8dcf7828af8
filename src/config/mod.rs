//! Configuration loading and management

mod transition;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

pub use transition::{TransitionConfig, TransitionConfigPatch};

const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_CONFIG_TIMEOUT_MS: u64 = 2000;
const DEFAULT_LONG_TAP_SECS: f64 = 3.0;

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    /// Path to the Unix domain socket for IPC
    pub socket_path: PathBuf,

    /// Directory for runtime data
    pub data_dir: PathBuf,

    /// Base URL of the media backend
    pub backend_url: String,

    /// Upper bound on the startup config fetch
    pub config_timeout: Duration,

    /// How long a press must be held to count as a long tap
    pub long_tap: Duration,
}

impl DaemonConfig {
    /// Load configuration from environment and defaults
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let home = lookup("HOME").context("HOME is not set")?;
        let data_dir = PathBuf::from(&home)
            .join(".local")
            .join("share")
            .join("dream-recorder");

        let socket_path = lookup("DREAM_RECORDER_SOCKET")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("daemon.sock"));

        let backend_url = lookup("DREAM_RECORDER_BACKEND_URL")
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let config_timeout = match lookup("DREAM_RECORDER_CONFIG_TIMEOUT_MS") {
            Some(raw) => Duration::from_millis(
                raw.parse()
                    .with_context(|| format!("invalid DREAM_RECORDER_CONFIG_TIMEOUT_MS: {raw}"))?,
            ),
            None => Duration::from_millis(DEFAULT_CONFIG_TIMEOUT_MS),
        };

        let long_tap_secs = match lookup("DREAM_RECORDER_LONG_TAP_SECS") {
            Some(raw) => raw
                .parse::<f64>()
                .with_context(|| format!("invalid DREAM_RECORDER_LONG_TAP_SECS: {raw}"))?,
            None => DEFAULT_LONG_TAP_SECS,
        };
        let long_tap = Duration::try_from_secs_f64(long_tap_secs)
            .with_context(|| format!("invalid DREAM_RECORDER_LONG_TAP_SECS: {long_tap_secs}"))?;

        Ok(Self {
            socket_path,
            data_dir,
            backend_url,
            config_timeout,
            long_tap,
        })
    }

    /// Ensure data directory exists
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }
}
