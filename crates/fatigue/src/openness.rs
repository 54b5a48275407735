//! Eye openness estimation from landmark geometry

use serde::{Deserialize, Serialize};

use crate::landmark::{EyeIndices, Landmark, LEFT_EYE, RIGHT_EYE};
use crate::FatigueError;

/// Per-eye openness ratios for one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EyeOpenness {
    pub left: f64,
    pub right: f64,
    /// Mean of both eyes; the value fed to detectors
    pub mean: f64,
}

/// Openness ratio of a single eye: mean vertical extent over eye width.
///
/// A zero-width eye yields a non-finite ratio rather than an error.
pub fn eye_ratio(landmarks: &[Landmark], eye: &EyeIndices) -> Result<f64, FatigueError> {
    let point = |index: usize| {
        landmarks.get(index).ok_or(FatigueError::LandmarkOutOfRange {
            index,
            len: landmarks.len(),
        })
    };

    let vertical_1 = point(eye.upper[0])?.distance(point(eye.lower[0])?);
    let vertical_2 = point(eye.upper[1])?.distance(point(eye.lower[1])?);
    let horizontal = point(eye.horizontal[0])?.distance(point(eye.horizontal[1])?);

    Ok((vertical_1 + vertical_2) / (2.0 * horizontal))
}

/// Both eyes' ratios and their mean
pub fn estimate_eyes(
    landmarks: &[Landmark],
    left: &EyeIndices,
    right: &EyeIndices,
) -> Result<EyeOpenness, FatigueError> {
    let left = eye_ratio(landmarks, left)?;
    let right = eye_ratio(landmarks, right)?;
    Ok(EyeOpenness {
        left,
        right,
        mean: (left + right) / 2.0,
    })
}

/// Mean openness ratio of both eyes
pub fn estimate(
    landmarks: &[Landmark],
    left: &EyeIndices,
    right: &EyeIndices,
) -> Result<f64, FatigueError> {
    estimate_eyes(landmarks, left, right).map(|eyes| eyes.mean)
}

/// Whether a ratio counts as a closed eye.
///
/// Non-finite or negative ratios come from measurement failure and count as open.
pub fn is_eye_closed(ratio: f64, threshold: f64) -> bool {
    ratio.is_finite() && ratio >= 0.0 && ratio < threshold
}

/// Estimator bound to a fixed pair of eye index sets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EyeOpennessEstimator {
    left: EyeIndices,
    right: EyeIndices,
}

impl EyeOpennessEstimator {
    pub fn new(left: EyeIndices, right: EyeIndices) -> Self {
        Self { left, right }
    }

    pub fn estimate(&self, landmarks: &[Landmark]) -> Result<f64, FatigueError> {
        estimate(landmarks, &self.left, &self.right)
    }

    pub fn estimate_eyes(&self, landmarks: &[Landmark]) -> Result<EyeOpenness, FatigueError> {
        estimate_eyes(landmarks, &self.left, &self.right)
    }

    /// Minimum landmark count a frame needs
    pub fn required_len(&self) -> usize {
        self.left.required_len().max(self.right.required_len())
    }
}

impl Default for EyeOpennessEstimator {
    fn default() -> Self {
        Self::new(LEFT_EYE, RIGHT_EYE)
    }
}
