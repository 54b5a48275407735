//! Landmark Stream Replay
//!
//! Drives a fatigue monitor from a recorded stream of per-frame landmarks
//! (JSON lines) and writes one JSON analysis per frame.

mod settings;
mod stream;

pub use settings::{LogFormat, ReplayConfig};
pub use stream::{replay, FrameRecord, ReplayStats};

use fatigue::FatigueError;
use thiserror::Error;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Replay error types
#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    #[error("Fatigue scoring failed: {0}")]
    Fatigue(#[from] FatigueError),

    #[error("Serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Logging setup failed: {0}")]
    Logging(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Initialize logging. Logs go to stderr; stdout carries the analysis stream.
pub fn init_logging(level: &str, format: LogFormat) -> Result<(), ReplayError> {
    let level: Level = level
        .parse()
        .map_err(|_| ReplayError::InvalidSetting(format!("unknown log level '{}'", level)))?;

    match format {
        LogFormat::Text => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_target(true)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        LogFormat::Json => {
            let subscriber = FmtSubscriber::builder()
                .json()
                .with_max_level(level)
                .with_target(true)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    Ok(())
}
