//! Frame-driven fatigue monitor

use serde::Serialize;
use tracing::{info, warn};

use crate::closure::ClosureDurationDetector;
use crate::config::MonitorConfig;
use crate::detector::Detector;
use crate::landmark::Landmark;
use crate::openness::{EyeOpenness, EyeOpennessEstimator};
use crate::perclos::PerclosScorer;
use crate::score::{FatigueLevel, FatigueScore};
use crate::FatigueError;

/// One detector's score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectorScore {
    pub detector: &'static str,
    #[serde(flatten)]
    pub score: FatigueScore,
}

/// Result of processing one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameAnalysis {
    pub timestamp_ms: u64,

    /// Whether this frame had a face
    pub face_detected: bool,

    /// Face missing for longer than the configured frame count
    pub face_lost: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub openness: Option<EyeOpenness>,

    pub scores: Vec<DetectorScore>,
}

impl FrameAnalysis {
    /// Most severe level across detectors
    pub fn worst_level(&self) -> FatigueLevel {
        self.scores
            .iter()
            .map(|s| s.score.level)
            .max()
            .unwrap_or_default()
    }

    pub fn score_for(&self, detector: &str) -> Option<&FatigueScore> {
        self.scores
            .iter()
            .find(|s| s.detector == detector)
            .map(|s| &s.score)
    }
}

/// Runs the openness estimator and every configured detector per frame
pub struct FatigueMonitor {
    config: MonitorConfig,
    estimator: EyeOpennessEstimator,
    detectors: Vec<Detector>,
    face_absent_frames: u32,
    last_level: FatigueLevel,
}

impl FatigueMonitor {
    /// Create a monitor whose detectors start their clocks at `now_ms`
    pub fn new(config: MonitorConfig, now_ms: u64) -> Result<Self, FatigueError> {
        config.validate()?;

        let mut detectors: Vec<Detector> =
            vec![PerclosScorer::new(config.perclos.clone(), now_ms)?.into()];
        if config.enable_closure {
            detectors.push(ClosureDurationDetector::new(config.closure.clone())?.into());
        }

        info!(
            detectors = detectors.len(),
            face_absent_frames = config.face_absent_frames,
            "Creating fatigue monitor"
        );

        Ok(Self {
            estimator: EyeOpennessEstimator::new(config.left_eye, config.right_eye),
            detectors,
            face_absent_frames: 0,
            last_level: FatigueLevel::Normal,
            config,
        })
    }

    /// Analyze one frame's landmarks
    pub fn process(
        &mut self,
        landmarks: &[Landmark],
        now_ms: u64,
    ) -> Result<FrameAnalysis, FatigueError> {
        let openness = self.estimator.estimate_eyes(landmarks)?;

        for detector in &mut self.detectors {
            detector.update(openness.mean, now_ms)?;
        }
        self.face_absent_frames = 0;

        let scores = self.scores(now_ms);
        self.track_level(&scores);

        Ok(FrameAnalysis {
            timestamp_ms: now_ms,
            face_detected: true,
            face_lost: false,
            openness: Some(openness),
            scores,
        })
    }

    /// Record a frame without a face. Detectors receive no sample.
    pub fn face_missing(&mut self, now_ms: u64) -> FrameAnalysis {
        self.face_absent_frames = self.face_absent_frames.saturating_add(1);
        let face_lost = self.face_absent_frames > self.config.face_absent_frames;
        if self.face_absent_frames == self.config.face_absent_frames.saturating_add(1) {
            warn!(frames = self.face_absent_frames, "Face not visible");
        }

        FrameAnalysis {
            timestamp_ms: now_ms,
            face_detected: false,
            face_lost,
            openness: None,
            scores: self.scores(now_ms),
        }
    }

    /// Current score of every detector
    pub fn scores(&self, now_ms: u64) -> Vec<DetectorScore> {
        self.detectors
            .iter()
            .map(|d| DetectorScore {
                detector: d.name(),
                score: d.score(now_ms),
            })
            .collect()
    }

    /// Reset all detectors (on subject change)
    pub fn reset(&mut self, now_ms: u64) {
        for detector in &mut self.detectors {
            detector.reset(now_ms);
        }
        self.face_absent_frames = 0;
        self.last_level = FatigueLevel::Normal;
        info!("Fatigue monitor reset");
    }

    pub fn detectors(&self) -> &[Detector] {
        &self.detectors
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    fn track_level(&mut self, scores: &[DetectorScore]) {
        let level = scores
            .iter()
            .map(|s| s.score.level)
            .max()
            .unwrap_or_default();
        if level != self.last_level {
            info!(from = %self.last_level, to = %level, "Fatigue level changed");
            self.last_level = level;
        }
    }
}
