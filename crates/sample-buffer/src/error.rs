//! Buffer Error Types

use thiserror::Error;

/// Errors raised by [`SampleBuffer`](crate::SampleBuffer)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    /// Sample is older than the newest stored sample
    #[error("Timestamp regression: {attempted_ms} ms is older than last sample at {last_ms} ms")]
    TimestampRegression { last_ms: u64, attempted_ms: u64 },

    /// Storage for the requested capacity could not be reserved
    #[error("Cannot allocate sample storage for capacity {capacity}")]
    AllocationFailed { capacity: usize },

    /// Buffer cannot hold any samples
    #[error("Buffer capacity must be greater than zero")]
    ZeroCapacity,
}
