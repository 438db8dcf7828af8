//! Transition durations fetched from the backend at startup

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{info, warn};

/// Errors while fetching the transition config. Never fatal: the caller
/// falls back to [`TransitionConfig::default`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to reach config endpoint: {0}")]
    Fetch(#[source] reqwest::Error),

    #[error("config endpoint returned {0}")]
    Status(reqwest::StatusCode),

    #[error("failed to decode config: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Durations that drive every fade and timed step of a transition.
///
/// All values are milliseconds except `playback_duration`, which is seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionConfig {
    pub logo_fade_in_duration: u64,
    pub logo_fade_out_duration: u64,
    pub clock_fade_in_duration: u64,
    pub clock_fade_out_duration: u64,
    pub transition_delay: u64,
    pub playback_duration: f64,
    pub screen_sleep_fade_out_duration: u64,
    pub screen_wake_fade_in_duration: u64,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            logo_fade_in_duration: 1000,
            logo_fade_out_duration: 1000,
            clock_fade_in_duration: 1000,
            clock_fade_out_duration: 1000,
            transition_delay: 500,
            playback_duration: 120.0,
            screen_sleep_fade_out_duration: 300,
            screen_wake_fade_in_duration: 300,
        }
    }
}

impl TransitionConfig {
    pub fn logo_fade_in(&self) -> Duration {
        Duration::from_millis(self.logo_fade_in_duration)
    }

    pub fn logo_fade_out(&self) -> Duration {
        Duration::from_millis(self.logo_fade_out_duration)
    }

    pub fn clock_fade_in(&self) -> Duration {
        Duration::from_millis(self.clock_fade_in_duration)
    }

    pub fn clock_fade_out(&self) -> Duration {
        Duration::from_millis(self.clock_fade_out_duration)
    }

    pub fn transition_delay(&self) -> Duration {
        Duration::from_millis(self.transition_delay)
    }

    /// Non-finite or negative values collapse to zero
    pub fn playback(&self) -> Duration {
        Duration::try_from_secs_f64(self.playback_duration).unwrap_or(Duration::ZERO)
    }

    pub fn screen_sleep_fade_out(&self) -> Duration {
        Duration::from_millis(self.screen_sleep_fade_out_duration)
    }

    pub fn screen_wake_fade_in(&self) -> Duration {
        Duration::from_millis(self.screen_wake_fade_in_duration)
    }

    /// Overwrite every duration present in `patch`
    pub fn apply(&mut self, patch: &TransitionConfigPatch) {
        fn set<T: Copy>(slot: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *slot = value;
            }
        }

        set(&mut self.logo_fade_in_duration, patch.logo_fade_in_duration);
        set(&mut self.logo_fade_out_duration, patch.logo_fade_out_duration);
        set(&mut self.clock_fade_in_duration, patch.clock_fade_in_duration);
        set(&mut self.clock_fade_out_duration, patch.clock_fade_out_duration);
        set(&mut self.transition_delay, patch.transition_delay);
        set(&mut self.playback_duration, patch.playback_duration);
        set(
            &mut self.screen_sleep_fade_out_duration,
            patch.screen_sleep_fade_out_duration,
        );
        set(
            &mut self.screen_wake_fade_in_duration,
            patch.screen_wake_fade_in_duration,
        );
    }

    /// Fetch `{backend_url}/api/config`, falling back to defaults on any failure.
    pub async fn load(client: &reqwest::Client, backend_url: &str, timeout: Duration) -> Self {
        let mut config = Self::default();
        match Self::fetch(client, backend_url, timeout).await {
            Ok(patch) => {
                config.apply(&patch);
                info!(?config, "transition config loaded");
            }
            Err(e) => {
                warn!(error = %e, "failed to fetch transition config, using defaults");
            }
        }
        config
    }

    async fn fetch(
        client: &reqwest::Client,
        backend_url: &str,
        timeout: Duration,
    ) -> Result<TransitionConfigPatch, ConfigError> {
        let response = client
            .get(format!("{backend_url}/api/config"))
            .timeout(timeout)
            .send()
            .await
            .map_err(ConfigError::Fetch)?;

        if !response.status().is_success() {
            return Err(ConfigError::Status(response.status()));
        }

        response.json().await.map_err(ConfigError::Decode)
    }
}

/// Partial set of durations. Used both for decoding the backend's config
/// object (absent or `null` keys keep the default) and for runtime updates.
///
/// Each key is decoded on its own: a fractional millisecond value is
/// rounded, and a value that is not a usable number is ignored with a
/// warning instead of failing the whole object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfigPatch {
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "millis")]
    pub logo_fade_in_duration: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "millis")]
    pub logo_fade_out_duration: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "millis")]
    pub clock_fade_in_duration: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "millis")]
    pub clock_fade_out_duration: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "millis")]
    pub transition_delay: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "seconds")]
    pub playback_duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "millis")]
    pub screen_sleep_fade_out_duration: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "millis")]
    pub screen_wake_fade_in_duration: Option<u64>,
}

/// A finite, non-negative number, or `None` for `null` and anything unusable
fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(value) = value else {
        return Ok(None);
    };
    match value.as_f64() {
        Some(number) if number.is_finite() && number >= 0.0 => Ok(Some(number)),
        _ => {
            warn!(%value, "ignoring unusable duration");
            Ok(None)
        }
    }
}

fn millis<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    Ok(lenient_number(deserializer)?.map(|ms| ms.round() as u64))
}

fn seconds<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    lenient_number(deserializer)
}
