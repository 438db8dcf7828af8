//! Media backend signals over HTTP

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::Backend;

/// Signals understood by the media backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendSignal {
    /// Advance the backend's playback cursor and show that dream. Right
    /// after a reset this is the most recent one.
    ShowPreviousDream,
    /// Reset the backend's playback cursor
    ResetPlaybackState,
}

impl BackendSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendSignal::ShowPreviousDream => "show_previous_dream",
            BackendSignal::ResetPlaybackState => "reset_playback_state",
        }
    }
}

impl std::fmt::Display for BackendSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Posts each signal to `{base_url}/api/{signal}` on a background task
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, signal: BackendSignal) -> String {
        format!("{}/api/{}", self.base_url, signal)
    }
}

impl Backend for HttpBackend {
    fn signal(&self, signal: BackendSignal) {
        let request = self.client.post(self.url(signal));

        // Must be called from inside the runtime; outside it the signal is dropped.
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!(%signal, "no runtime available, backend signal dropped");
            return;
        };

        handle.spawn(async move {
            match request.send().await {
                Ok(response) if response.status().is_success() => {
                    debug!(%signal, "backend signal delivered");
                }
                Ok(response) => {
                    warn!(%signal, status = %response.status(), "backend rejected signal");
                }
                Err(e) => {
                    warn!(%signal, error = %e, "failed to deliver backend signal");
                }
            }
        });
    }
}
