//! Replay configuration
//!
//! Layered as: built-in defaults, then an optional config file, then
//! `FATIGUE_`-prefixed environment variables (`__` separates nested keys,
//! e.g. `FATIGUE_MONITOR__PERCLOS__WINDOW_MS=30000`).

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use fatigue::MonitorConfig;
use serde::{Deserialize, Serialize};

use crate::ReplayError;

const ENV_PREFIX: &str = "FATIGUE";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Replay configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Landmark stream path; stdin when unset
    pub input: Option<String>,
    pub log_level: String,
    pub log_format: LogFormat,
    pub monitor: MonitorConfig,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            input: None,
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            monitor: MonitorConfig::default(),
        }
    }
}

impl ReplayConfig {
    /// Load from an optional config file (any format `config` supports) and the environment
    pub fn load(path: &str) -> Result<Self, ReplayError> {
        Self::from_builder(Config::builder().add_source(File::with_name(path).required(false)))
    }

    pub(crate) fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ReplayError> {
        let config: Self = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.monitor.validate()?;
        Ok(config)
    }
}
