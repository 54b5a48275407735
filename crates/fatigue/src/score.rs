//! Fatigue score, level classification, and the PERCLOS score mapping

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::FatigueError;

/// Fatigue level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum FatigueLevel {
    #[default]
    #[serde(rename = "normal")]
    Normal,
    #[serde(rename = "mild fatigue")]
    MildFatigue,
    #[serde(rename = "fatigue")]
    Fatigue,
}

impl FatigueLevel {
    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::MildFatigue => "mild fatigue",
            Self::Fatigue => "fatigue",
        }
    }
}

impl fmt::Display for FatigueLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Output of a detector query. Recomputed on every query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FatigueScore {
    /// 100 = fully alert, 0 = maximally fatigued
    pub score: u8,
    pub level: FatigueLevel,
    /// Formatted metric, e.g. `"18.3%"`
    pub detail: String,
    /// Unrounded metric behind the score (percent for PERCLOS)
    pub metric: f64,
}

impl FatigueScore {
    /// Score for a PERCLOS percentage under the given bands
    pub fn from_perclos(perclos: f64, bands: &ScoreBands) -> Self {
        Self {
            score: bands.score(perclos).round() as u8,
            level: bands.level(perclos),
            detail: format!("{:.1}%", perclos),
            metric: perclos,
        }
    }
}

impl Default for FatigueScore {
    fn default() -> Self {
        Self::from_perclos(0.0, &ScoreBands::default())
    }
}

/// Breakpoints of the three-segment PERCLOS score mapping.
///
/// The segments pass through (0, 100), (`normal_limit`, 80),
/// (`fatigue_limit`, 60) and (`zero_score`, 0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreBands {
    /// PERCLOS (%) where "normal" ends
    pub normal_limit: f64,
    /// PERCLOS (%) where "fatigue" begins
    pub fatigue_limit: f64,
    /// PERCLOS (%) at which the score reaches 0
    pub zero_score: f64,
}

impl Default for ScoreBands {
    fn default() -> Self {
        Self {
            normal_limit: 15.0,
            fatigue_limit: 20.0,
            zero_score: 45.0,
        }
    }
}

impl ScoreBands {
    /// Unrounded score for a PERCLOS percentage.
    ///
    /// Floored at 0; there is no ceiling since PERCLOS is never negative.
    /// Segment offsets are chosen so the lines meet at 80 on `normal_limit`
    /// and 60 on `fatigue_limit`, which makes the fatigue slope
    /// `60 / (zero_score - fatigue_limit)` (2.4 per point with the defaults)
    /// rather than a fixed 4.
    pub fn score(&self, perclos: f64) -> f64 {
        if perclos < self.normal_limit {
            100.0 - 20.0 * perclos / self.normal_limit
        } else if perclos < self.fatigue_limit {
            80.0 - 20.0 * (perclos - self.normal_limit) / (self.fatigue_limit - self.normal_limit)
        } else {
            (60.0 * (self.zero_score - perclos) / (self.zero_score - self.fatigue_limit)).max(0.0)
        }
    }

    pub fn level(&self, perclos: f64) -> FatigueLevel {
        if perclos < self.normal_limit {
            FatigueLevel::Normal
        } else if perclos < self.fatigue_limit {
            FatigueLevel::MildFatigue
        } else {
            FatigueLevel::Fatigue
        }
    }

    pub fn validate(&self) -> Result<(), FatigueError> {
        let ordered = 0.0 < self.normal_limit
            && self.normal_limit < self.fatigue_limit
            && self.fatigue_limit < self.zero_score;
        if ordered {
            Ok(())
        } else {
            Err(FatigueError::Config(format!(
                "score bands must satisfy 0 < normal ({}) < fatigue ({}) < zero ({})",
                self.normal_limit, self.fatigue_limit, self.zero_score
            )))
        }
    }
}
