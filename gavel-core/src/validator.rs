//! Validator facade
//!
//! `QualityValidator` owns the immutable configuration (coverage mode,
//! quality standard, thresholds) and exposes the public operations of the
//! engine. Every operation is a pure function of the configuration plus
//! its inputs; the validator holds no mutable state and can be shared
//! across threads freely.

use std::path::Path;

use log::debug;

use crate::analysis::AudioClip;
use crate::analysis::Frame;
use crate::config::ValidatorConfig;
use crate::detectors::gaps::{AudioGap, GapDetector, GapReport, generate_gap_report};
use crate::detectors::voice::{ClarityReport, MetallicVoiceDetector, measure_voice_clarity};
use crate::error::CoreResult;
use crate::issue::QualityIssue;
use crate::policy::{ModePolicy, policy_for};
use crate::probe::{FileCheck, MediaProber, SignatureProber, validate_audio_file, validate_video_file};
use crate::score::{ComprehensiveQualityScore, QualityAssessment, Shot};
use crate::scoring::{self, ScorerSet};

/// The engine's public face: configured once, then queried.
pub struct QualityValidator {
    config: ValidatorConfig,
    policy: Box<dyn ModePolicy>,
    scorers: ScorerSet,
    prober: Box<dyn MediaProber>,
    gap_detector: GapDetector,
    metallic_detector: MetallicVoiceDetector,
}

impl QualityValidator {
    /// Build a validator with the default signature-based file prober.
    pub fn new(config: ValidatorConfig) -> Self {
        Self::with_prober(config, Box::new(SignatureProber::new()))
    }

    /// Build a validator with a caller-supplied media prober, e.g. one
    /// backed by a full decoder.
    pub fn with_prober(config: ValidatorConfig, prober: Box<dyn MediaProber>) -> Self {
        let policy = policy_for(config.mode());
        let scorers = ScorerSet::for_config(&config);
        debug!(
            "validator configured: mode {}, standard {}, advanced analysis {}",
            config.mode(),
            config.standard(),
            config.advanced_analysis_enabled()
        );
        Self {
            config,
            policy,
            scorers,
            prober,
            gap_detector: GapDetector::default(),
            metallic_detector: MetallicVoiceDetector::new(),
        }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Fast, shot-level, mode-aware composite score on the 0-100 scale.
    ///
    /// Never fails: analyzer errors surface as critical issues with the
    /// corresponding sub-score zeroed.
    pub fn generate_quality_score(&self, shot: &Shot) -> ComprehensiveQualityScore {
        scoring::generate_quality_score(&self.config, self.policy.as_ref(), shot)
    }

    /// Frame-sequence assessment on the 0-1 scale against the configured
    /// quality standard.
    pub fn assess_quality(&self, frames: &[Frame]) -> QualityAssessment {
        scoring::assess_quality(&self.config, &self.scorers, frames)
    }

    /// Precondition gate for a video file path. Reports, never raises.
    pub fn validate_video_file(&self, path: impl AsRef<Path>) -> FileCheck {
        validate_video_file(path.as_ref(), self.prober.as_ref())
    }

    /// Precondition gate for an audio file path. Reports, never raises.
    pub fn validate_audio_file(&self, path: impl AsRef<Path>) -> FileCheck {
        validate_audio_file(path.as_ref(), self.prober.as_ref())
    }

    /// Detect silent runs in a clip using the default thresholds
    /// (-40 dBFS, 0.1 s minimum).
    pub fn detect_audio_gaps(&self, clip: &AudioClip) -> CoreResult<Vec<AudioGap>> {
        self.gap_detector.detect(clip)
    }

    /// Translate detected gaps into the shared issue vocabulary.
    pub fn gap_issues(&self, gaps: &[AudioGap]) -> Vec<QualityIssue> {
        self.gap_detector.issues(gaps)
    }

    /// Aggregate gaps into a report against the clip duration.
    pub fn generate_gap_report(&self, gaps: &[AudioGap], total_duration: f64) -> GapReport {
        generate_gap_report(gaps, total_duration)
    }

    /// Voice clarity (0-100) from a percentile-based SNR estimate.
    pub fn measure_voice_clarity(&self, clip: &AudioClip) -> CoreResult<ClarityReport> {
        measure_voice_clarity(clip)
    }

    /// Metallic/artificial voice artifacts from formant band shape.
    pub fn detect_metallic_voice(&self, clip: &AudioClip) -> CoreResult<Vec<QualityIssue>> {
        self.metallic_detector.detect(clip)
    }
}

impl Default for QualityValidator {
    fn default() -> Self {
        Self::new(ValidatorConfig::default())
    }
}
