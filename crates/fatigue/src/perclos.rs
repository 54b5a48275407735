//! Windowed PERCLOS (percentage of eye closure) scorer

use sample_buffer::{OpennessSample, SampleBuffer};
use tracing::{debug, info, warn};

use crate::config::PerclosConfig;
use crate::openness::is_eye_closed;
use crate::score::FatigueScore;
use crate::FatigueError;

/// Time-weighted eye-closure percentage over a trailing window.
///
/// History keeps twice the scoring window. Each sample is weighted by its
/// frame duration, so irregular frame rates do not skew the percentage.
#[derive(Debug, Clone)]
pub struct PerclosScorer {
    config: PerclosConfig,
    history: SampleBuffer,
    created_at_ms: u64,
}

impl PerclosScorer {
    pub const NAME: &'static str = "perclos";

    /// Create a scorer whose warm-up clock starts at `created_at_ms`
    pub fn new(config: PerclosConfig, created_at_ms: u64) -> Result<Self, FatigueError> {
        config.validate()?;
        let history = SampleBuffer::new(config.history_capacity())?;
        info!(
            window_ms = config.window_ms,
            threshold = config.closed_threshold,
            capacity = history.capacity(),
            "Creating PERCLOS scorer"
        );
        Ok(Self {
            config,
            history,
            created_at_ms,
        })
    }

    /// Record one frame's openness ratio and drop samples older than two windows
    pub fn update(&mut self, ratio: f64, now_ms: u64) -> Result<(), FatigueError> {
        if let Err(e) = self.history.push(OpennessSample::new(now_ms, ratio)) {
            warn!(error = %e, "Rejected openness sample");
            return Err(e.into());
        }

        if let Some(cutoff) = now_ms.checked_sub(self.retention_ms()) {
            self.history.prune_through(cutoff);
        }
        Ok(())
    }

    /// Closed-time percentage over the window ending at `now_ms`
    pub fn perclos(&self, now_ms: u64) -> f64 {
        let start = match now_ms.checked_sub(self.config.window_ms) {
            Some(cutoff) => self.history.partition_point(cutoff),
            None => 0,
        };
        if start == self.history.len() {
            return 0.0;
        }

        let effective_ms = now_ms
            .saturating_sub(self.created_at_ms)
            .min(self.config.window_ms);
        if effective_ms == 0 {
            return 0.0;
        }

        let closed_ms: u64 = (start..self.history.len())
            .filter_map(|i| self.history.get(i).map(|sample| (i, sample)))
            .filter(|(_, sample)| is_eye_closed(sample.ratio, self.config.closed_threshold))
            .map(|(i, _)| self.frame_duration(start, i))
            .sum();

        100.0 * closed_ms as f64 / effective_ms as f64
    }

    /// Current score; a pure function of history and `now_ms`
    pub fn score(&self, now_ms: u64) -> FatigueScore {
        FatigueScore::from_perclos(self.perclos(now_ms), &self.config.bands)
    }

    /// Clear history and restart the warm-up clock
    pub fn reset(&mut self, now_ms: u64) {
        debug!(discarded = self.history.len(), "Resetting PERCLOS scorer");
        self.history.clear();
        self.created_at_ms = now_ms;
    }

    /// Retained samples, oldest first
    pub fn samples(&self) -> impl Iterator<Item = &OpennessSample> + '_ {
        self.history.iter()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn created_at_ms(&self) -> u64 {
        self.created_at_ms
    }

    pub fn config(&self) -> &PerclosConfig {
        &self.config
    }

    fn retention_ms(&self) -> u64 {
        self.config.window_ms.saturating_mul(2)
    }

    /// Gap to the next sample in the window; the newest sample reuses the
    /// gap to its predecessor, and a lone sample gets the fallback duration.
    fn frame_duration(&self, start: usize, index: usize) -> u64 {
        let Some(current) = self.history.get(index) else {
            return 0;
        };
        if let Some(next) = self.history.get(index + 1) {
            return next.timestamp_ms.saturating_sub(current.timestamp_ms);
        }
        match index.checked_sub(1).filter(|&prev| prev >= start) {
            Some(prev) => self
                .history
                .get(prev)
                .map_or(0, |p| current.timestamp_ms.saturating_sub(p.timestamp_ms)),
            None => self.config.fallback_frame_ms,
        }
    }
}
