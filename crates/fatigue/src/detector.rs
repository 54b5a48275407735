//! Fatigue detector strategies

use crate::closure::ClosureDurationDetector;
use crate::perclos::PerclosScorer;
use crate::score::FatigueScore;
use crate::FatigueError;

/// A fatigue detection strategy fed one openness ratio per frame
#[derive(Debug, Clone)]
pub enum Detector {
    /// Windowed percentage of eye closure
    Perclos(PerclosScorer),
    /// Current uninterrupted eye closure
    ClosureDuration(ClosureDurationDetector),
}

impl Detector {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Perclos(_) => PerclosScorer::NAME,
            Self::ClosureDuration(_) => ClosureDurationDetector::NAME,
        }
    }

    pub fn update(&mut self, ratio: f64, now_ms: u64) -> Result<(), FatigueError> {
        match self {
            Self::Perclos(d) => d.update(ratio, now_ms),
            Self::ClosureDuration(d) => d.update(ratio, now_ms),
        }
    }

    pub fn score(&self, now_ms: u64) -> FatigueScore {
        match self {
            Self::Perclos(d) => d.score(now_ms),
            Self::ClosureDuration(d) => d.score(now_ms),
        }
    }

    pub fn reset(&mut self, now_ms: u64) {
        match self {
            Self::Perclos(d) => d.reset(now_ms),
            Self::ClosureDuration(d) => d.reset(),
        }
    }
}

impl From<PerclosScorer> for Detector {
    fn from(scorer: PerclosScorer) -> Self {
        Self::Perclos(scorer)
    }
}

impl From<ClosureDurationDetector> for Detector {
    fn from(detector: ClosureDurationDetector) -> Self {
        Self::ClosureDuration(detector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClosureConfig, PerclosConfig};
    use crate::score::FatigueLevel;

    #[test]
    fn test_dispatch_by_variant() {
        let mut detectors: Vec<Detector> = vec![
            PerclosScorer::new(PerclosConfig::default(), 0).unwrap().into(),
            ClosureDurationDetector::new(ClosureConfig::default()).unwrap().into(),
        ];

        for detector in &mut detectors {
            detector.update(0.1, 0).unwrap();
            detector.update(0.1, 1_000).unwrap();
            detector.update(0.1, 2_000).unwrap();
        }

        assert_eq!(detectors[0].name(), "perclos");
        assert_eq!(detectors[1].name(), "closure_duration");
        assert_eq!(detectors[0].score(2_000).level, FatigueLevel::Fatigue);
        assert_eq!(detectors[1].score(2_000).level, FatigueLevel::Fatigue);

        for detector in &mut detectors {
            detector.reset(2_000);
            assert_eq!(detector.score(2_000).score, 100);
        }
    }
}
