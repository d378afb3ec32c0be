//! Quality score records
//!
//! The result types produced by the scoring pipelines. Every record is
//! created fresh per call, owned by the caller, and serializes to a plain
//! key/value map; the engine keeps no history of past assessments.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::analysis::Frame;
use crate::config::{QUALITY_PASS_THRESHOLD, QualityStandard, ValidationMode};
use crate::issue::{ImprovementSuggestion, QualityIssue};

/// The metric a [`QualityScore`] speaks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreMetric {
    VisualQuality,
    MotionSmoothness,
    Sharpness,
    NoiseLevel,
    ProfessionalStandards,
}

impl Display for ScoreMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreMetric::VisualQuality => write!(f, "visual_quality"),
            ScoreMetric::MotionSmoothness => write!(f, "motion_smoothness"),
            ScoreMetric::Sharpness => write!(f, "sharpness"),
            ScoreMetric::NoiseLevel => write!(f, "noise_level"),
            ScoreMetric::ProfessionalStandards => write!(f, "professional_standards"),
        }
    }
}

/// One metric's verdict against a quality standard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityScore {
    /// Normalized metric score, 0-1.
    pub score: f64,
    /// Confidence in the score, 0-1; grows with the amount of evidence.
    pub confidence: f64,
    pub metric: ScoreMetric,
    pub standard: QualityStandard,
    /// Raw and intermediate numbers kept for debuggability.
    pub details: BTreeMap<String, f64>,
}

impl QualityScore {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Frame-sequence assessment against a named quality standard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityAssessment {
    /// Weighted combination of the individual metric scores, 0-1.
    pub overall_score: f64,
    pub quality_scores: Vec<QualityScore>,
    pub detected_issues: Vec<QualityIssue>,
    pub recommendations: Vec<ImprovementSuggestion>,
    /// Wall-clock analysis time in seconds.
    pub processing_time: f64,
    pub frame_count: usize,
    pub standard: QualityStandard,
    pub passes_standard: bool,
}

impl QualityAssessment {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Fast per-shot composite on the 0-100 scale, used for shot gating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComprehensiveQualityScore {
    pub overall_score: f64,
    pub sharpness_score: f64,
    pub motion_score: f64,
    pub audio_score: f64,
    pub continuity_score: f64,
    pub issues: Vec<QualityIssue>,
    pub suggestions: Vec<ImprovementSuggestion>,
    /// The coverage mode that produced this score.
    pub mode: ValidationMode,
}

impl ComprehensiveQualityScore {
    /// Whether the shot passes at the default gating threshold (70).
    pub fn passed(&self) -> bool {
        self.passes(QUALITY_PASS_THRESHOLD)
    }

    /// Whether the shot passes at a caller-chosen threshold.
    pub fn passes(&self, threshold: f64) -> bool {
        self.overall_score >= threshold
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Shot record handed in for composite scoring.
///
/// The audio and continuity scores are supplied by external collaborators;
/// this engine folds them into the composite but does not compute them.
#[derive(Debug, Clone)]
pub struct Shot {
    pub frames: Vec<Frame>,
    /// Externally supplied audio score, 0-100.
    pub audio_score: f64,
    /// Externally supplied continuity score, 0-100.
    pub continuity_score: f64,
}

impl Shot {
    pub fn new(frames: Vec<Frame>, audio_score: f64, continuity_score: f64) -> Self {
        Self {
            frames,
            audio_score,
            continuity_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passed_uses_default_threshold() {
        let score = ComprehensiveQualityScore {
            overall_score: 70.0,
            sharpness_score: 70.0,
            motion_score: 70.0,
            audio_score: 70.0,
            continuity_score: 70.0,
            issues: Vec::new(),
            suggestions: Vec::new(),
            mode: ValidationMode::Batch,
        };
        assert!(score.passed());
        assert!(!score.passes(80.0));
    }

    #[test]
    fn metric_serializes_to_snake_case() {
        let value = serde_json::to_value(ScoreMetric::VisualQuality).unwrap();
        assert_eq!(value, "visual_quality");
    }
}
