//! Sample History Ring Buffer
//!
//! Provides a fixed-capacity, time-ordered ring buffer for per-frame
//! eye-openness samples. Pruning stale samples is a head-pointer advance.

mod buffer;
mod error;

pub use buffer::SampleBuffer;
pub use error::BufferError;

use serde::{Deserialize, Serialize};

/// One processed frame's eye-openness measurement
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OpennessSample {
    /// Caller-supplied capture time (milliseconds)
    pub timestamp_ms: u64,
    /// Averaged eye-openness ratio for the frame
    pub ratio: f64,
}

impl OpennessSample {
    pub fn new(timestamp_ms: u64, ratio: f64) -> Self {
        Self { timestamp_ms, ratio }
    }
}
