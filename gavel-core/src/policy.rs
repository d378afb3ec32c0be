//! Mode policy
//!
//! Real-time and batch analysis differ in which detectors run, how audio
//! scores are trusted, and how sub-scores are weighted. Those differences
//! live behind one trait with two interchangeable implementations so the
//! composite scorer stays free of mode branches and each policy can be
//! tested in isolation.

use log::warn;

use crate::analysis::frame::{Frame, luma_variance};
use crate::config::ValidationMode;
use crate::detectors::motion::MovementDetector;
use crate::detectors::visual::AnomalyDetector;
use crate::issue::{QualityIssue, Severity};

/// Fixed motion score assumed when full motion analysis is skipped.
pub const REAL_TIME_MOTION_SCORE: f64 = 75.0;

/// Luma variance below which the real-time contrast check flags a frame.
pub const LOW_CONTRAST_VARIANCE: f64 = 100.0;

/// Audio score ceiling when full audio analysis was not run.
pub const REAL_TIME_AUDIO_CAP: f64 = 80.0;

/// Sharpness below this raises an issue in real-time mode.
pub const REAL_TIME_SHARPNESS_ISSUE_THRESHOLD: f64 = 40.0;

/// Sharpness below this raises an issue in batch mode.
pub const BATCH_SHARPNESS_ISSUE_THRESHOLD: f64 = 50.0;

// Score penalty per detected motion anomaly in batch mode.
const ANOMALY_PENALTY: f64 = 10.0;

/// Sub-score weights for the 0-100 composite.
#[derive(Debug, Clone, Copy)]
pub struct ScoreWeights {
    pub sharpness: f64,
    pub motion: f64,
    pub audio: f64,
    pub continuity: f64,
}

/// Motion analysis outcome for one shot.
#[derive(Debug, Clone)]
pub struct MotionAssessment {
    pub motion_score: f64,
    pub issues: Vec<QualityIssue>,
}

/// The mode-dependent half of composite scoring.
pub trait ModePolicy: Send + Sync {
    fn mode(&self) -> ValidationMode;

    /// Sharpness level below which a `low_sharpness` issue is raised.
    fn sharpness_issue_threshold(&self) -> f64;

    /// Clamp an externally supplied audio score to what this mode can
    /// vouch for.
    fn cap_audio_score(&self, score: f64) -> f64;

    /// Produce the motion sub-score and any motion/visual issues.
    fn assess_motion(&self, frames: &[Frame], fps: f64) -> MotionAssessment;

    fn weights(&self) -> ScoreWeights;
}

/// Select the policy implementation for a mode.
pub fn policy_for(mode: ValidationMode) -> Box<dyn ModePolicy> {
    match mode {
        ValidationMode::RealTime => Box::new(RealTimePolicy),
        ValidationMode::Batch => Box::new(BatchPolicy),
    }
}

/// Fast partial analysis: no flow estimation, conservative fixed motion
/// score, single-frame contrast check only.
pub struct RealTimePolicy;

impl ModePolicy for RealTimePolicy {
    fn mode(&self) -> ValidationMode {
        ValidationMode::RealTime
    }

    fn sharpness_issue_threshold(&self) -> f64 {
        REAL_TIME_SHARPNESS_ISSUE_THRESHOLD
    }

    fn cap_audio_score(&self, score: f64) -> f64 {
        score.min(REAL_TIME_AUDIO_CAP)
    }

    fn assess_motion(&self, frames: &[Frame], _fps: f64) -> MotionAssessment {
        let mut issues = Vec::new();
        if let Some(first) = frames.first() {
            match luma_variance(first) {
                Ok(variance) if variance < LOW_CONTRAST_VARIANCE => {
                    issues.push(QualityIssue::new(
                        "potential_low_contrast",
                        Severity::Low,
                        format!("First frame luma variance {:.1} is very low", variance),
                        variance,
                        LOW_CONTRAST_VARIANCE,
                    ));
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("real-time contrast check failed: {e}");
                    issues.push(QualityIssue::new(
                        "contrast_analysis_error",
                        Severity::High,
                        format!("Contrast check failed: {e}"),
                        0.0,
                        0.0,
                    ));
                }
            }
        }
        MotionAssessment {
            motion_score: REAL_TIME_MOTION_SCORE,
            issues,
        }
    }

    fn weights(&self) -> ScoreWeights {
        // Continuity analysis is too slow for interactive use.
        ScoreWeights {
            sharpness: 0.5,
            motion: 0.3,
            audio: 0.2,
            continuity: 0.0,
        }
    }
}

/// Exhaustive analysis: full movement and visual anomaly detection, audio
/// trusted as supplied.
pub struct BatchPolicy;

impl ModePolicy for BatchPolicy {
    fn mode(&self) -> ValidationMode {
        ValidationMode::Batch
    }

    fn sharpness_issue_threshold(&self) -> f64 {
        BATCH_SHARPNESS_ISSUE_THRESHOLD
    }

    fn cap_audio_score(&self, score: f64) -> f64 {
        score
    }

    fn assess_motion(&self, frames: &[Frame], fps: f64) -> MotionAssessment {
        let mut issues = Vec::new();
        let motion_score = match MovementDetector::new(fps).detect(frames) {
            Ok(motion_issues) => {
                let score =
                    (100.0 - ANOMALY_PENALTY * motion_issues.len() as f64).max(0.0);
                issues.extend(motion_issues);
                score
            }
            Err(e) => {
                warn!("batch motion analysis failed: {e}");
                issues.push(QualityIssue::new(
                    "motion_analysis_error",
                    Severity::Critical,
                    format!("Motion analysis failed: {e}"),
                    0.0,
                    0.0,
                ));
                0.0
            }
        };

        issues.extend(AnomalyDetector::new(fps).detect(frames));

        MotionAssessment {
            motion_score,
            issues,
        }
    }

    fn weights(&self) -> ScoreWeights {
        ScoreWeights {
            sharpness: 0.3,
            motion: 0.25,
            audio: 0.25,
            continuity: 0.2,
        }
    }
}
