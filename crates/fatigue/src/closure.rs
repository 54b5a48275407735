//! Continuous eye-closure (microsleep) tracking

use sample_buffer::BufferError;
use tracing::debug;

use crate::config::ClosureConfig;
use crate::openness::is_eye_closed;
use crate::score::{FatigueLevel, FatigueScore};
use crate::FatigueError;

/// Tracks how long the eyes have been closed without interruption.
///
/// Any open (or unratable) sample ends the current run. The run is only
/// measured through the newest sample, so a gap in input (a lost face)
/// never extends it.
#[derive(Debug, Clone)]
pub struct ClosureDurationDetector {
    config: ClosureConfig,
    /// Timestamp of the first closed sample in the current run
    run_started_ms: Option<u64>,
    last_sample_ms: Option<u64>,
}

impl ClosureDurationDetector {
    pub const NAME: &'static str = "closure_duration";

    pub fn new(config: ClosureConfig) -> Result<Self, FatigueError> {
        config.validate()?;
        Ok(Self {
            config,
            run_started_ms: None,
            last_sample_ms: None,
        })
    }

    pub fn update(&mut self, ratio: f64, now_ms: u64) -> Result<(), FatigueError> {
        if let Some(last_ms) = self.last_sample_ms {
            if now_ms < last_ms {
                return Err(BufferError::TimestampRegression {
                    last_ms,
                    attempted_ms: now_ms,
                }
                .into());
            }
        }
        self.last_sample_ms = Some(now_ms);

        if is_eye_closed(ratio, self.config.closed_threshold) {
            self.run_started_ms.get_or_insert(now_ms);
        } else if let Some(started) = self.run_started_ms.take() {
            debug!(closed_ms = now_ms - started, "Eye closure run ended");
        }
        Ok(())
    }

    /// Length of the current closed run at `now_ms`, capped at the newest sample
    pub fn closed_ms(&self, now_ms: u64) -> u64 {
        let Some(started) = self.run_started_ms else {
            return 0;
        };
        let observed_ms = self.last_sample_ms.map_or(now_ms, |last| last.min(now_ms));
        observed_ms.saturating_sub(started)
    }

    pub fn score(&self, now_ms: u64) -> FatigueScore {
        let closed_ms = self.closed_ms(now_ms);
        let limit_ms = self.config.drowsiness_threshold_ms;

        let fraction = closed_ms as f64 / limit_ms as f64;
        let level = if closed_ms >= limit_ms {
            FatigueLevel::Fatigue
        } else if closed_ms.saturating_mul(2) >= limit_ms {
            FatigueLevel::MildFatigue
        } else {
            FatigueLevel::Normal
        };

        FatigueScore {
            score: (100.0 * (1.0 - fraction)).clamp(0.0, 100.0).round() as u8,
            level,
            detail: format!("{:.1}s", closed_ms as f64 / 1000.0),
            metric: closed_ms as f64,
        }
    }

    pub fn reset(&mut self) {
        self.run_started_ms = None;
        self.last_sample_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> ClosureDurationDetector {
        ClosureDurationDetector::new(ClosureConfig::default()).unwrap()
    }

    #[test]
    fn test_open_eyes_stay_normal() {
        let mut detector = detector();
        for i in 0..10 {
            detector.update(0.3, i * 33).unwrap();
        }
        let score = detector.score(330);
        assert_eq!(score.score, 100);
        assert_eq!(score.level, FatigueLevel::Normal);
        assert_eq!(score.detail, "0.0s");
    }

    #[test]
    fn test_long_closure_reaches_fatigue() {
        let mut detector = detector();
        detector.update(0.3, 0).unwrap();
        detector.update(0.1, 1_000).unwrap();
        detector.update(0.1, 1_900).unwrap();

        let score = detector.score(1_500);
        assert_eq!(score.level, FatigueLevel::Normal);
        assert_eq!(score.score, 67);

        let score = detector.score(1_900);
        assert_eq!(score.level, FatigueLevel::MildFatigue);
        assert_eq!(score.score, 40);

        detector.update(0.1, 2_600).unwrap();
        let score = detector.score(2_600);
        assert_eq!(score.level, FatigueLevel::Fatigue);
        assert_eq!(score.score, 0);
        assert_eq!(score.detail, "1.6s");
    }

    #[test]
    fn test_open_sample_ends_run() {
        let mut detector = detector();
        detector.update(0.1, 0).unwrap();
        detector.update(0.1, 2_000).unwrap();
        detector.update(0.3, 2_033).unwrap();

        assert_eq!(detector.closed_ms(3_000), 0);
    }

    #[test]
    fn test_degenerate_ratio_ends_run() {
        let mut detector = detector();
        detector.update(0.1, 0).unwrap();
        detector.update(f64::NAN, 500).unwrap();

        assert_eq!(detector.closed_ms(1_000), 0);
    }

    #[test]
    fn test_rejects_regression() {
        let mut detector = detector();
        detector.update(0.1, 1_000).unwrap();
        assert!(detector.update(0.1, 999).is_err());

        detector.update(0.1, 1_500).unwrap();
        assert_eq!(detector.closed_ms(1_500), 500);
    }

    #[test]
    fn test_run_not_extended_past_last_sample() {
        let mut detector = detector();
        detector.update(0.3, 0).unwrap();
        detector.update(0.1, 33).unwrap();
        detector.update(0.1, 400).unwrap();

        assert_eq!(detector.closed_ms(5_000), 367);
        let score = detector.score(5_000);
        assert_eq!(score.level, FatigueLevel::Normal);
        assert_eq!(score.metric, 367.0);
    }
}
