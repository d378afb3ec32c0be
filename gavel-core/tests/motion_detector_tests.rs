use gavel_core::detectors::motion::{
    MovementDetector, STILLNESS_THRESHOLD, SUDDEN_MOTION_THRESHOLD,
};
use gavel_core::{Frame, Severity};

/// Deterministic pseudo-random texture; shifting the sample origin moves
/// the content so block matching has an unambiguous answer.
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

#[test]
fn static_sequence_is_clean() {
    let frame = textured(240, 32, 0);
    let frames = vec![frame.clone(), frame.clone(), frame.clone(), frame];
    let issues = MovementDetector::new(30.0).detect(&frames).unwrap();
    assert!(issues.is_empty(), "static frames produced {issues:?}");
}

#[test]
fn jump_cut_is_flagged_medium() {
    let frames = vec![textured(240, 32, 0), textured(240, 32, 12)];
    let issues = MovementDetector::new(30.0).detect(&frames).unwrap();
    assert_eq!(issues.len(), 1);
    let issue = &issues[0];
    assert_eq!(issue.issue_type, "unnatural_movement");
    assert_eq!(issue.severity, Severity::Medium);
    assert_eq!(issue.frame_number, Some(1));
    assert!(issue.metric_value > SUDDEN_MOTION_THRESHOLD);
    assert_eq!(issue.threshold_value, SUDDEN_MOTION_THRESHOLD);
    assert!((issue.timestamp - 1.0 / 30.0).abs() < 1e-9);
}

#[test]
fn violent_jump_is_flagged_high() {
    let frames = vec![textured(240, 32, 0), textured(240, 32, 24)];
    let issues = MovementDetector::new(30.0).detect(&frames).unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].severity, Severity::High);
    assert!(issues[0].metric_value > 20.0);
}

#[test]
fn initial_stillness_is_not_flagged() {
    let still = textured(240, 32, 0);
    let frames = vec![still.clone(), still, textured(240, 32, 3)];
    let issues = MovementDetector::new(30.0).detect(&frames).unwrap();
    assert!(
        issues.is_empty(),
        "stillness before any motion was flagged: {issues:?}"
    );
}

#[test]
fn stillness_after_motion_is_flagged_low() {
    let moved = textured(240, 32, 3);
    let frames = vec![textured(240, 32, 0), moved.clone(), moved];
    let issues = MovementDetector::new(30.0).detect(&frames).unwrap();
    assert_eq!(issues.len(), 1);
    let issue = &issues[0];
    assert_eq!(issue.severity, Severity::Low);
    assert_eq!(issue.frame_number, Some(2));
    assert!(issue.metric_value < STILLNESS_THRESHOLD);
    assert_eq!(issue.threshold_value, STILLNESS_THRESHOLD);
}

#[test]
fn custom_frame_rate_shifts_timestamps() {
    let frames = vec![textured(240, 32, 0), textured(240, 32, 12)];
    let issues = MovementDetector::new(24.0).detect(&frames).unwrap();
    assert_eq!(issues.len(), 1);
    assert!((issues[0].timestamp - 1.0 / 24.0).abs() < 1e-9);
}

#[test]
fn short_sequences_produce_no_issues() {
    let detector = MovementDetector::new(30.0);
    assert!(detector.detect(&[]).unwrap().is_empty());
    assert!(detector.detect(&[textured(240, 32, 0)]).unwrap().is_empty());
}
