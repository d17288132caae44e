//! Assist configuration.

use serde::Deserialize;
use std::time::Duration;

/// Settings for simulated assist jobs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AssistConfig {
    /// Delay before a job completes, in milliseconds.
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,
}

fn default_latency_ms() -> u64 {
    1500
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            latency_ms: default_latency_ms(),
        }
    }
}

impl AssistConfig {
    /// Sets the job latency.
    #[must_use]
    pub fn with_latency_ms(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    /// Job latency as a `Duration`.
    #[must_use]
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}
