//! Fatigue scoring configuration

use serde::{Deserialize, Serialize};

use crate::landmark::{EyeIndices, LEFT_EYE, RIGHT_EYE};
use crate::score::ScoreBands;
use crate::FatigueError;

/// Largest history a scorer may allocate (4 Mi samples, 64 MiB)
pub const MAX_HISTORY_CAPACITY: usize = 1 << 22;

/// Windowed PERCLOS scorer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerclosConfig {
    /// Trailing window used for the closure percentage (milliseconds)
    pub window_ms: u64,

    /// Openness ratio below which an eye counts as closed
    pub closed_threshold: f64,

    /// Score mapping breakpoints
    pub bands: ScoreBands,

    /// Frame duration assumed for a lone sample (~30 fps)
    pub fallback_frame_ms: u64,

    /// Highest expected frame rate; sizes the history buffer
    pub max_frame_rate: u32,
}

impl Default for PerclosConfig {
    fn default() -> Self {
        Self {
            window_ms: 60_000,
            closed_threshold: 0.2,
            bands: ScoreBands::default(),
            fallback_frame_ms: 33,
            max_frame_rate: 120,
        }
    }
}

impl PerclosConfig {
    /// Create strict config (earlier fatigue levels)
    pub fn strict() -> Self {
        Self {
            closed_threshold: 0.22,
            bands: ScoreBands {
                normal_limit: 10.0,
                fatigue_limit: 15.0,
                zero_score: 40.0,
            },
            ..Default::default()
        }
    }

    /// Create lenient config (later fatigue levels)
    pub fn lenient() -> Self {
        Self {
            closed_threshold: 0.18,
            bands: ScoreBands {
                normal_limit: 20.0,
                fatigue_limit: 25.0,
                zero_score: 50.0,
            },
            ..Default::default()
        }
    }

    /// History capacity: twice the window at the maximum frame rate
    pub fn history_capacity(&self) -> usize {
        let retained_ms = self.window_ms.saturating_mul(2);
        let samples = retained_ms.saturating_mul(u64::from(self.max_frame_rate)) / 1000;
        usize::try_from(samples).unwrap_or(usize::MAX).saturating_add(1)
    }

    pub fn validate(&self) -> Result<(), FatigueError> {
        if self.window_ms == 0 {
            return Err(FatigueError::Config("window_ms must be greater than zero".into()));
        }
        if !(self.closed_threshold.is_finite() && self.closed_threshold > 0.0) {
            return Err(FatigueError::Config(format!(
                "closed_threshold must be a positive number, got {}",
                self.closed_threshold
            )));
        }
        if self.max_frame_rate == 0 {
            return Err(FatigueError::Config("max_frame_rate must be greater than zero".into()));
        }
        let capacity = self.history_capacity();
        if capacity > MAX_HISTORY_CAPACITY {
            return Err(FatigueError::Config(format!(
                "window_ms {} at {} fps needs {} history samples, limit is {}",
                self.window_ms, self.max_frame_rate, capacity, MAX_HISTORY_CAPACITY
            )));
        }
        self.bands.validate()
    }
}

/// Continuous eye-closure detector configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClosureConfig {
    /// Openness ratio below which an eye counts as closed
    pub closed_threshold: f64,

    /// Eyes closed threshold for the fatigue level (milliseconds)
    pub drowsiness_threshold_ms: u64,
}

impl Default for ClosureConfig {
    fn default() -> Self {
        Self {
            closed_threshold: 0.2,
            drowsiness_threshold_ms: 1500,
        }
    }
}

impl ClosureConfig {
    pub fn validate(&self) -> Result<(), FatigueError> {
        if self.drowsiness_threshold_ms == 0 {
            return Err(FatigueError::Config(
                "drowsiness_threshold_ms must be greater than zero".into(),
            ));
        }
        if !(self.closed_threshold.is_finite() && self.closed_threshold > 0.0) {
            return Err(FatigueError::Config(format!(
                "closed_threshold must be a positive number, got {}",
                self.closed_threshold
            )));
        }
        Ok(())
    }
}

/// Frame-driven monitor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub perclos: PerclosConfig,

    /// Enable continuous eye-closure tracking
    pub enable_closure: bool,
    pub closure: ClosureConfig,

    /// Consecutive faceless frames before the face counts as lost
    pub face_absent_frames: u32,

    /// Landmark topology
    pub left_eye: EyeIndices,
    pub right_eye: EyeIndices,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            perclos: PerclosConfig::default(),
            enable_closure: true,
            closure: ClosureConfig::default(),
            face_absent_frames: 30,
            left_eye: LEFT_EYE,
            right_eye: RIGHT_EYE,
        }
    }
}

impl MonitorConfig {
    pub fn strict() -> Self {
        Self {
            perclos: PerclosConfig::strict(),
            closure: ClosureConfig {
                drowsiness_threshold_ms: 1000,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn lenient() -> Self {
        Self {
            perclos: PerclosConfig::lenient(),
            closure: ClosureConfig {
                drowsiness_threshold_ms: 2500,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), FatigueError> {
        self.perclos.validate()?;
        if self.enable_closure {
            self.closure.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        assert!(MonitorConfig::default().validate().is_ok());
        assert!(MonitorConfig::strict().validate().is_ok());
        assert!(MonitorConfig::lenient().validate().is_ok());
    }

    #[test]
    fn test_default_history_capacity() {
        // 120 s at 120 fps, plus the sample at the boundary
        assert_eq!(PerclosConfig::default().history_capacity(), 14_401);
    }

    #[test]
    fn test_rejects_zero_window() {
        let config = PerclosConfig {
            window_ms: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(FatigueError::Config(_))));
    }

    #[test]
    fn test_rejects_oversized_history() {
        let config = PerclosConfig {
            window_ms: u64::MAX / 4,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(FatigueError::Config(_))));

        // One hour at 120 fps still fits
        let config = PerclosConfig {
            window_ms: 3_600_000,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_nan_threshold() {
        let config = PerclosConfig {
            closed_threshold: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_disabled_closure_skips_validation() {
        let config = MonitorConfig {
            enable_closure: false,
            closure: ClosureConfig {
                drowsiness_threshold_ms: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: MonitorConfig =
            serde_json::from_str(r#"{"perclos":{"window_ms":30000},"enable_closure":false}"#).unwrap();
        assert_eq!(config.perclos.window_ms, 30_000);
        assert_eq!(config.perclos.closed_threshold, 0.2);
        assert!(!config.enable_closure);
        assert_eq!(config.left_eye, LEFT_EYE);
    }
}
