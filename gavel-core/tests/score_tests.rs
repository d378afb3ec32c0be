use gavel_core::policy::REAL_TIME_MOTION_SCORE;
use gavel_core::{
    Frame, QualityStandard, QualityValidator, Shot, ValidationMode, ValidatorConfig,
};

fn textured(width: usize, height: usize, shift: usize) -> Frame {
    let data = (0..width * height)
        .map(|i| {
            let x = (i % width) + shift;
            let y = i / width;
            ((x.wrapping_mul(1_103_515_245) ^ y.wrapping_mul(12_345)) % 251) as u8
        })
        .collect();
    Frame::gray(width, height, data).expect("texture buffer")
}

fn validator(mode: ValidationMode) -> QualityValidator {
    QualityValidator::new(ValidatorConfig::new(mode, QualityStandard::WebHd, false))
}

#[test]
fn empty_shot_scores_zero_with_missing_frames_issue() {
    for mode in [ValidationMode::RealTime, ValidationMode::Batch] {
        let result = validator(mode).generate_quality_score(&Shot::new(Vec::new(), 80.0, 80.0));
        assert_eq!(result.overall_score, 0.0);
        assert!(!result.passed());
        assert!(
            result
                .issues
                .iter()
                .any(|i| i.issue_type == "missing_frames"),
            "missing_frames issue absent in {mode}"
        );
        assert!(
            result
                .suggestions
                .iter()
                .any(|s| s.suggestion_id == "rerender-shot")
        );
        assert_eq!(result.mode, mode);
    }
}

#[test]
fn real_time_never_runs_full_motion_analysis() {
    // This jump cut would raise an unnatural_movement issue in batch mode.
    let shot = Shot::new(
        vec![textured(240, 32, 0), textured(240, 32, 24)],
        100.0,
        0.0,
    );
    let result = validator(ValidationMode::RealTime).generate_quality_score(&shot);

    assert_eq!(result.motion_score, REAL_TIME_MOTION_SCORE);
    assert!(
        result
            .issues
            .iter()
            .all(|i| i.issue_type != "unnatural_movement")
    );
    // Full audio analysis was not run either, so the score is capped.
    assert_eq!(result.audio_score, 80.0);
    assert!(result.passed());
}

#[test]
fn batch_mode_detects_the_jump_cut() {
    let shot = Shot::new(
        vec![textured(240, 32, 0), textured(240, 32, 24)],
        100.0,
        0.0,
    );
    let result = validator(ValidationMode::Batch).generate_quality_score(&shot);

    assert_eq!(result.motion_score, 90.0);
    assert!(
        result
            .issues
            .iter()
            .any(|i| i.issue_type == "unnatural_movement")
    );
    assert_eq!(result.audio_score, 100.0);
    assert!(
        result
            .suggestions
            .iter()
            .any(|s| s.suggestion_id == "smooth-camera-motion")
    );
}

#[test]
fn flat_shot_is_flagged_for_low_sharpness() {
    let shot = Shot::new(vec![Frame::filled(64, 64, 128); 3], 90.0, 80.0);
    let result = validator(ValidationMode::Batch).generate_quality_score(&shot);

    assert_eq!(result.sharpness_score, 0.0);
    assert!(
        result
            .issues
            .iter()
            .any(|i| i.issue_type == "low_sharpness")
    );
    assert!(
        result
            .suggestions
            .iter()
            .any(|s| s.suggestion_id == "increase-render-samples")
    );
    // sharpness 0*.3 + motion 100*.25 + audio 90*.25 + continuity 80*.2
    assert!((result.overall_score - 63.5).abs() < 1e-6);
    assert!(!result.passed());
}

#[test]
fn real_time_flags_flat_frames_as_low_contrast() {
    let shot = Shot::new(vec![Frame::filled(64, 64, 128); 2], 50.0, 0.0);
    let result = validator(ValidationMode::RealTime).generate_quality_score(&shot);
    assert_eq!(result.motion_score, REAL_TIME_MOTION_SCORE);
    assert!(
        result
            .issues
            .iter()
            .any(|i| i.issue_type == "potential_low_contrast")
    );
}

#[test]
fn external_scores_are_clamped() {
    let shot = Shot::new(vec![textured(64, 64, 0); 2], 150.0, -30.0);
    let result = validator(ValidationMode::Batch).generate_quality_score(&shot);
    assert_eq!(result.audio_score, 100.0);
    assert_eq!(result.continuity_score, 0.0);
}

#[test]
fn sub_scores_stay_in_range() {
    let shots = [
        Shot::new(Vec::new(), 500.0, 500.0),
        Shot::new(vec![textured(240, 32, 0), textured(240, 32, 24)], 100.0, 100.0),
        Shot::new(vec![Frame::filled(64, 64, 0); 2], 0.0, 0.0),
    ];
    for mode in [ValidationMode::RealTime, ValidationMode::Batch] {
        for shot in &shots {
            let result = validator(mode).generate_quality_score(shot);
            for score in [
                result.overall_score,
                result.sharpness_score,
                result.motion_score,
                result.audio_score,
                result.continuity_score,
            ] {
                assert!((0.0..=100.0).contains(&score), "score {score} out of range");
            }
        }
    }
}

#[test]
fn shot_scoring_is_deterministic() {
    let shot = Shot::new(
        vec![textured(240, 32, 0), textured(240, 32, 12)],
        70.0,
        60.0,
    );
    let v = validator(ValidationMode::Batch);
    let first = v.generate_quality_score(&shot);
    let second = v.generate_quality_score(&shot);
    assert_eq!(first.overall_score.to_bits(), second.overall_score.to_bits());
    assert_eq!(first.issues.len(), second.issues.len());
}
