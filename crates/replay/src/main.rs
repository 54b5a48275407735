//! Ocular Fatigue Replay - Main Entry Point

use replay::{init_logging, replay, ReplayConfig};
use tokio::io::{self, BufReader};
use tracing::info;

/// Config file looked up when no path argument is given
const DEFAULT_CONFIG: &str = "fatigue-replay";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let config = ReplayConfig::load(&config_path)?;
    init_logging(&config.log_level, config.log_format)?;

    info!("=== Ocular Fatigue Replay v{} ===", env!("CARGO_PKG_VERSION"));

    let stdout = io::stdout();
    let stats = match &config.input {
        Some(path) => {
            info!(path = %path, "Replaying landmark stream");
            let file = tokio::fs::File::open(path).await?;
            replay(&config.monitor, BufReader::new(file), stdout).await?
        }
        None => {
            info!("Replaying landmark stream from stdin");
            replay(&config.monitor, BufReader::new(io::stdin()), stdout).await?
        }
    };

    info!(
        frames = stats.frames,
        malformed = stats.malformed,
        rejected = stats.rejected,
        "Replay finished"
    );

    Ok(())
}
