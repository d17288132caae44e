//! Console configuration.
//!
//! Loaded via the `config` crate from `OMNICHAT__*` environment variables,
//! for example `OMNICHAT__ASSIST__LATENCY_MS=250`.

use omnichat_assist::AssistConfig;
use serde::Deserialize;

/// Application configuration composed from library configs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    /// Assist job settings.
    #[serde(default)]
    pub assist: AssistConfig,

    /// Whether to start with the demo inbox loaded.
    #[serde(default = "default_seed_demo_data")]
    pub seed_demo_data: bool,
}

fn default_seed_demo_data() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            assist: AssistConfig::default(),
            seed_demo_data: default_seed_demo_data(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_environment(environment())
    }

    fn from_environment(source: config::Environment) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("OMNICHAT")
        .separator("__")
        .try_parsing(true)
}
