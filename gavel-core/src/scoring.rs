//! Composite scoring pipelines
//!
//! Responsibilities:
//! - `generate_quality_score`: fast, shot-level, mode-aware 0-100 composite
//! - `assess_quality`: frame-sequence 0-1 composite against a named
//!   quality standard
//!
//! Both pipelines degrade instead of failing: an analyzer error becomes a
//! critical issue and a zeroed sub-score, and the computation continues so
//! callers always receive a fully formed result.

use std::collections::BTreeMap;
use std::time::Instant;

use log::{debug, info, warn};
use rayon::prelude::*;

use crate::analysis::Frame;
use crate::analysis::flow::dense_flow;
use crate::analysis::frame::{
    calculate_sharpness, psnr, residual_noise_variance,
};
use crate::config::ValidatorConfig;
use crate::detectors::motion::MovementDetector;
use crate::detectors::visual::AnomalyDetector;
use crate::error::CoreResult;
use crate::issue::{QualityIssue, Severity};
use crate::policy::ModePolicy;
use crate::score::{
    ComprehensiveQualityScore, QualityAssessment, QualityScore, ScoreMetric, Shot,
};
use crate::suggest::suggestions_for;

/// Sharpness variance that normalizes to a perfect 0-1 score.
const SHARPNESS_FULL_SCALE: f64 = 500.0;

/// Residual noise variance that normalizes to the worst 0-1 score.
const NOISE_FULL_SCALE: f64 = 100.0;

/// PSNR that normalizes to a perfect 0-1 score.
const PSNR_FULL_SCALE: f64 = 100.0;

// Reference pixel count for the resolution component (1080p).
const HD_PIXEL_COUNT: f64 = 1920.0 * 1080.0;

// Evidence count at which metric confidence saturates.
const CONFIDENCE_SATURATION: f64 = 30.0;

/// The metric scorers a validator runs, fixed at construction.
///
/// The four core metrics carry weights {0.3, 0.25, 0.25, 0.2}; when the
/// optional professional-standards scorer participates every weight drops
/// by 0.02 and the fifth enters at 0.08, keeping the sum at 1.
pub(crate) struct ScorerSet {
    entries: Vec<(ScoreMetric, f64)>,
}

impl ScorerSet {
    pub(crate) fn for_config(config: &ValidatorConfig) -> Self {
        let mut entries = vec![
            (ScoreMetric::VisualQuality, 0.3),
            (ScoreMetric::MotionSmoothness, 0.25),
            (ScoreMetric::Sharpness, 0.25),
            (ScoreMetric::NoiseLevel, 0.2),
        ];
        if config.advanced_analysis_enabled() {
            for entry in &mut entries {
                entry.1 -= 0.02;
            }
            entries.push((ScoreMetric::ProfessionalStandards, 0.1 - 0.02));
        }
        Self { entries }
    }
}

/// Fast per-shot composite score on the 0-100 scale.
pub(crate) fn generate_quality_score(
    config: &ValidatorConfig,
    policy: &dyn ModePolicy,
    shot: &Shot,
) -> ComprehensiveQualityScore {
    debug!(
        "scoring shot: {} frames, mode {}",
        shot.frames.len(),
        policy.mode()
    );

    if shot.frames.is_empty() {
        let issues = vec![QualityIssue::new(
            "missing_frames",
            Severity::Critical,
            "Shot contains no frames to analyze",
            0.0,
            1.0,
        )];
        let suggestions = suggestions_for(&issues);
        warn!("shot has no frames; composite score is zero");
        return ComprehensiveQualityScore {
            overall_score: 0.0,
            sharpness_score: 0.0,
            motion_score: 0.0,
            audio_score: 0.0,
            continuity_score: 0.0,
            issues,
            suggestions,
            mode: policy.mode(),
        };
    }

    let mut issues = Vec::new();

    // Sharpness runs in full regardless of mode.
    let sharpness_score = match mean_sharpness(&shot.frames) {
        Ok(sharpness) => {
            let score = sharpness.min(100.0);
            let floor = policy.sharpness_issue_threshold();
            if score < floor {
                issues.push(QualityIssue::new(
                    "low_sharpness",
                    Severity::Medium,
                    format!(
                        "Mean sharpness {:.1} is below the {} floor {:.1}",
                        score,
                        policy.mode(),
                        floor
                    ),
                    score,
                    floor,
                ));
            }
            score
        }
        Err(e) => {
            warn!("sharpness analysis failed: {e}");
            issues.push(QualityIssue::new(
                "sharpness_error",
                Severity::Critical,
                format!("Sharpness analysis failed: {e}"),
                0.0,
                0.0,
            ));
            0.0
        }
    };

    let motion = policy.assess_motion(&shot.frames, config.fps());
    issues.extend(motion.issues);

    let audio_score = policy.cap_audio_score(shot.audio_score.clamp(0.0, 100.0));
    let continuity_score = shot.continuity_score.clamp(0.0, 100.0);

    let weights = policy.weights();
    let overall_score = (sharpness_score * weights.sharpness
        + motion.motion_score * weights.motion
        + audio_score * weights.audio
        + continuity_score * weights.continuity)
        .clamp(0.0, 100.0);

    let suggestions = suggestions_for(&issues);
    info!(
        "shot composite {:.1} (sharpness {:.1}, motion {:.1}, audio {:.1}, continuity {:.1}), {} issue(s)",
        overall_score,
        sharpness_score,
        motion.motion_score,
        audio_score,
        continuity_score,
        issues.len()
    );

    ComprehensiveQualityScore {
        overall_score,
        sharpness_score,
        motion_score: motion.motion_score,
        audio_score,
        continuity_score,
        issues,
        suggestions,
        mode: policy.mode(),
    }
}

/// Standards-aware frame-sequence assessment on the 0-1 scale.
pub(crate) fn assess_quality(
    config: &ValidatorConfig,
    scorers: &ScorerSet,
    frames: &[Frame],
) -> QualityAssessment {
    let start = Instant::now();
    let standard = config.standard();

    if frames.is_empty() {
        let issues = vec![QualityIssue::new(
            "missing_frames",
            Severity::Critical,
            "No frames were supplied for assessment",
            0.0,
            1.0,
        )];
        let recommendations = suggestions_for(&issues);
        return QualityAssessment {
            overall_score: 0.0,
            quality_scores: Vec::new(),
            detected_issues: issues,
            recommendations,
            processing_time: start.elapsed().as_secs_f64(),
            frame_count: 0,
            standard,
            passes_standard: false,
        };
    }

    let mut quality_scores = Vec::new();
    let mut detected_issues = Vec::new();

    for &(metric, _) in &scorers.entries {
        let score = match metric {
            ScoreMetric::ProfessionalStandards => professional_standards_score(config, frames),
            _ => {
                let (outcome, evidence) = metric_outcome(metric, frames);
                finish_metric(metric, config, outcome, evidence, &mut detected_issues)
            }
        };
        quality_scores.push(score);
    }

    let overall_score: f64 = quality_scores
        .iter()
        .zip(scorers.entries.iter())
        .map(|(score, &(_, weight))| score.score * weight)
        .sum();
    let overall_score = overall_score.clamp(0.0, 1.0);

    // Detector sweep fills the issue list for downstream triage.
    match MovementDetector::new(config.fps()).detect(frames) {
        Ok(issues) => detected_issues.extend(issues),
        Err(e) => {
            warn!("movement detection failed during assessment: {e}");
            detected_issues.push(QualityIssue::new(
                "motion_analysis_error",
                Severity::High,
                format!("Movement detection failed: {e}"),
                0.0,
                0.0,
            ));
        }
    }
    detected_issues.extend(AnomalyDetector::new(config.fps()).detect(frames));

    let recommendations = suggestions_for(&detected_issues);
    let passes_standard = overall_score >= standard.pass_threshold();
    info!(
        "assessment against {}: overall {:.3}, {} issue(s), passes: {}",
        standard,
        overall_score,
        detected_issues.len(),
        passes_standard
    );

    QualityAssessment {
        overall_score,
        quality_scores,
        detected_issues,
        recommendations,
        processing_time: start.elapsed().as_secs_f64(),
        frame_count: frames.len(),
        standard,
        passes_standard,
    }
}

/// Mean of per-frame sharpness, uncapped.
fn mean_sharpness(frames: &[Frame]) -> CoreResult<f64> {
    let values: Vec<f64> = frames
        .par_iter()
        .map(calculate_sharpness)
        .collect::<CoreResult<Vec<f64>>>()?;
    Ok(mean(&values))
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Evidence-based confidence: half a vote for showing up, the rest grows
/// with sample count.
fn confidence(samples: usize) -> f64 {
    if samples == 0 {
        return 0.3;
    }
    (0.5 + 0.5 * samples as f64 / CONFIDENCE_SATURATION).min(1.0)
}

type MetricOutcome = CoreResult<(f64, BTreeMap<String, f64>)>;

/// Compute one core metric over the sequence, returning the normalized
/// outcome and the evidence count backing it (consecutive pairs for the
/// pairwise metrics, frames for the per-frame ones).
fn metric_outcome(metric: ScoreMetric, frames: &[Frame]) -> (MetricOutcome, usize) {
    let pair_count = frames.len().saturating_sub(1);
    match metric {
        ScoreMetric::VisualQuality => {
            let outcome = pair_metric(frames, psnr, |values| {
                let mean_psnr = mean(values);
                let mut details = BTreeMap::new();
                details.insert("mean_psnr".to_string(), mean_psnr);
                details.insert("pair_count".to_string(), values.len() as f64);
                ((mean_psnr / PSNR_FULL_SCALE).min(1.0), details)
            });
            (outcome, pair_count)
        }
        ScoreMetric::MotionSmoothness => {
            let outcome = pair_metric(
                frames,
                |a, b| dense_flow(a, b).map(|flow| flow.mean_magnitude()),
                |magnitudes| {
                    let smoothness = mean(
                        &magnitudes
                            .iter()
                            .map(|&m| 1.0 / (1.0 + m))
                            .collect::<Vec<f64>>(),
                    );
                    let mut details = BTreeMap::new();
                    details.insert("mean_flow_magnitude".to_string(), mean(magnitudes));
                    details.insert("pair_count".to_string(), magnitudes.len() as f64);
                    (smoothness, details)
                },
            );
            (outcome, pair_count)
        }
        ScoreMetric::Sharpness => {
            let outcome = frame_metric(frames, |frame| {
                calculate_sharpness(frame).map(|v| (v / SHARPNESS_FULL_SCALE).min(1.0))
            })
            .map(|(score, mut details)| {
                details.insert("full_scale_variance".to_string(), SHARPNESS_FULL_SCALE);
                (score, details)
            });
            (outcome, frames.len())
        }
        ScoreMetric::NoiseLevel => {
            let outcome = frame_metric(frames, |frame| {
                residual_noise_variance(frame).map(|v| 1.0 - (v / NOISE_FULL_SCALE).min(1.0))
            });
            (outcome, frames.len())
        }
        // Scored by `professional_standards_score`, never through here.
        ScoreMetric::ProfessionalStandards => (Ok((0.0, BTreeMap::new())), frames.len()),
    }
}

/// Run a per-pair analyzer across consecutive frames and fold the values
/// into a normalized score. Sequences with fewer than two frames score a
/// neutral 1.0 with no evidence.
fn pair_metric(
    frames: &[Frame],
    analyze: impl Fn(&Frame, &Frame) -> CoreResult<f64> + Sync,
    fold: impl Fn(&[f64]) -> (f64, BTreeMap<String, f64>),
) -> MetricOutcome {
    if frames.len() < 2 {
        let mut details = BTreeMap::new();
        details.insert("pair_count".to_string(), 0.0);
        return Ok((1.0, details));
    }
    let values: Vec<f64> = frames
        .par_windows(2)
        .map(|pair| analyze(&pair[0], &pair[1]))
        .collect::<CoreResult<Vec<f64>>>()?;
    Ok(fold(&values))
}

/// Run a per-frame analyzer and average the normalized values.
fn frame_metric(
    frames: &[Frame],
    analyze: impl Fn(&Frame) -> CoreResult<f64> + Sync,
) -> MetricOutcome {
    let values: Vec<f64> = frames
        .par_iter()
        .map(&analyze)
        .collect::<CoreResult<Vec<f64>>>()?;
    let mut details = BTreeMap::new();
    details.insert("frame_count".to_string(), values.len() as f64);
    Ok((mean(&values), details))
}

/// Convert a metric outcome into a `QualityScore`, degrading analyzer
/// failures into an `_error` issue and a zero score.
fn finish_metric(
    metric: ScoreMetric,
    config: &ValidatorConfig,
    outcome: MetricOutcome,
    evidence: usize,
    issues: &mut Vec<QualityIssue>,
) -> QualityScore {
    match outcome {
        Ok((score, details)) => QualityScore {
            score: score.clamp(0.0, 1.0),
            confidence: confidence(evidence),
            metric,
            standard: config.standard(),
            details,
        },
        Err(e) => {
            warn!("{metric} analysis failed: {e}");
            issues.push(QualityIssue::new(
                format!("{metric}_error"),
                Severity::High,
                format!("{metric} analysis failed: {e}"),
                0.0,
                0.0,
            ));
            QualityScore {
                score: 0.0,
                confidence: 0.1,
                metric,
                standard: config.standard(),
                details: BTreeMap::new(),
            }
        }
    }
}

/// Resolution, color depth, and compression against professional delivery
/// expectations. Resolution is measured from the first frame; color depth
/// and compression are fixed stand-ins.
// TODO: replace the color depth and compression constants with measured
// values once the decode layer exposes bit depth and encoder settings.
fn professional_standards_score(config: &ValidatorConfig, frames: &[Frame]) -> QualityScore {
    let resolution_ratio = frames
        .first()
        .map(|f| ((f.width() * f.height()) as f64 / HD_PIXEL_COUNT).min(1.0))
        .unwrap_or(0.0);
    let color_depth_score = 1.0;
    let compression_score = 0.8;

    let mut details = BTreeMap::new();
    details.insert("resolution_ratio".to_string(), resolution_ratio);
    details.insert("color_depth_score".to_string(), color_depth_score);
    details.insert("compression_score".to_string(), compression_score);

    QualityScore {
        score: (resolution_ratio + color_depth_score + compression_score) / 3.0,
        confidence: confidence(frames.len()),
        metric: ScoreMetric::ProfessionalStandards,
        standard: config.standard(),
        details,
    }
}
