//! Visual anomaly detection
//!
//! Flags sudden brightness changes between consecutive frames. This is a
//! coarse proxy for flicker and pop artifacts, intentionally cheap enough
//! to run in real-time mode.

use crate::analysis::frame::Frame;
use crate::issue::{QualityIssue, Severity};

/// Absolute mean-brightness delta (0-255 scale) above which a pair is
/// flagged.
pub const BRIGHTNESS_DELTA_THRESHOLD: f64 = 50.0;

/// Detects abrupt brightness changes across a frame sequence.
#[derive(Debug, Clone)]
pub struct AnomalyDetector {
    fps: f64,
}

impl AnomalyDetector {
    pub fn new(fps: f64) -> Self {
        Self { fps }
    }

    /// One `sudden_change` issue per frame pair whose brightness delta
    /// exceeds the threshold.
    pub fn detect(&self, frames: &[Frame]) -> Vec<QualityIssue> {
        let brightness: Vec<f64> = frames.iter().map(Frame::mean_brightness).collect();

        let mut issues = Vec::new();
        for (i, pair) in brightness.windows(2).enumerate() {
            let delta = (pair[1] - pair[0]).abs();
            if delta > BRIGHTNESS_DELTA_THRESHOLD {
                let frame_number = (i + 1) as u32;
                issues.push(
                    QualityIssue::new(
                        "sudden_change",
                        Severity::Medium,
                        format!(
                            "Brightness jumps by {:.1} between frames {} and {}",
                            delta,
                            i,
                            i + 1
                        ),
                        delta,
                        BRIGHTNESS_DELTA_THRESHOLD,
                    )
                    .at_frame(frame_number, frame_number as f64 / self.fps),
                );
            }
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steady_brightness_is_clean() {
        let frames = vec![Frame::filled(8, 8, 120); 5];
        let detector = AnomalyDetector::new(30.0);
        assert!(detector.detect(&frames).is_empty());
    }

    #[test]
    fn brightness_pop_is_flagged() {
        let frames = vec![
            Frame::filled(8, 8, 100),
            Frame::filled(8, 8, 100),
            Frame::filled(8, 8, 200),
        ];
        let detector = AnomalyDetector::new(30.0);
        let issues = detector.detect(&frames);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue_type, "sudden_change");
        assert_eq!(issues[0].frame_number, Some(2));
        assert!((issues[0].metric_value - 100.0).abs() < 1e-9);
    }
}
