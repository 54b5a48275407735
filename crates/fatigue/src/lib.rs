//! Ocular Fatigue Scoring
//!
//! Estimates fatigue from per-frame facial landmarks:
//! - Eye openness ratio from six landmarks per eye
//! - Time-weighted PERCLOS over a trailing window
//! - Piecewise-linear 0-100 fatigue score with a level label
//! - Continuous eye-closure (microsleep) tracking

pub mod closure;
pub mod config;
pub mod detector;
pub mod landmark;
pub mod monitor;
pub mod openness;
pub mod perclos;
pub mod score;

pub use closure::ClosureDurationDetector;
pub use config::{ClosureConfig, MonitorConfig, PerclosConfig};
pub use detector::Detector;
pub use landmark::{EyeIndices, Landmark, LEFT_EYE, RIGHT_EYE};
pub use monitor::{DetectorScore, FatigueMonitor, FrameAnalysis};
pub use openness::{estimate, estimate_eyes, is_eye_closed, EyeOpenness, EyeOpennessEstimator};
pub use perclos::PerclosScorer;
pub use score::{FatigueLevel, FatigueScore, ScoreBands};

use sample_buffer::BufferError;
use thiserror::Error;

/// Fatigue scoring error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FatigueError {
    /// Eye index set names a landmark the frame does not have
    #[error("Landmark index {index} out of range for {len} landmarks")]
    LandmarkOutOfRange { index: usize, len: usize },

    #[error("Sample history error: {0}")]
    Buffer(#[from] BufferError),

    #[error("Configuration error: {0}")]
    Config(String),
}
