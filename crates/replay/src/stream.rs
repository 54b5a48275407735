//! JSON-lines landmark stream processing

use fatigue::{FatigueError, FatigueMonitor, Landmark, MonitorConfig};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::ReplayError;

/// One recorded frame. Missing or empty landmarks mean no face was found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub timestamp_ms: u64,
    #[serde(default)]
    pub landmarks: Option<Vec<Landmark>>,
}

/// Replay counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReplayStats {
    /// Frames analyzed and written
    pub frames: usize,
    /// Lines that were not valid frame records
    pub malformed: usize,
    /// Frames dropped for going back in time
    pub rejected: usize,
}

/// Replay a landmark stream, writing one analysis line per frame.
///
/// The monitor's clock starts at the first frame's timestamp. Malformed
/// lines and out-of-order frames are skipped; a frame that does not match
/// the configured landmark topology aborts the replay.
pub async fn replay<R, W>(
    config: &MonitorConfig,
    reader: R,
    mut writer: W,
) -> Result<ReplayStats, ReplayError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut monitor: Option<FatigueMonitor> = None;
    let mut stats = ReplayStats::default();
    let mut line_no = 0usize;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let record: FrameRecord = match serde_json::from_str(line) {
            Ok(record) => record,
            Err(e) => {
                warn!(line = line_no, error = %e, "Skipping malformed frame record");
                stats.malformed += 1;
                continue;
            }
        };

        if monitor.is_none() {
            info!(start_ms = record.timestamp_ms, "Starting monitor at first frame");
            monitor = Some(FatigueMonitor::new(config.clone(), record.timestamp_ms)?);
        }
        let Some(active) = monitor.as_mut() else {
            continue;
        };

        let analysis = match record.landmarks.as_deref() {
            Some(landmarks) if !landmarks.is_empty() => {
                match active.process(landmarks, record.timestamp_ms) {
                    Ok(analysis) => analysis,
                    Err(FatigueError::Buffer(e)) => {
                        warn!(line = line_no, error = %e, "Skipping out-of-order frame");
                        stats.rejected += 1;
                        continue;
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            _ => active.face_missing(record.timestamp_ms),
        };

        let mut out = serde_json::to_vec(&analysis)?;
        out.push(b'\n');
        writer.write_all(&out).await?;
        stats.frames += 1;
        debug!(frame = stats.frames, level = %analysis.worst_level(), "Frame analyzed");
    }

    writer.flush().await?;
    Ok(stats)
}
