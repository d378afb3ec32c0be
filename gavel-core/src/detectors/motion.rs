//! Unnatural movement detection
//!
//! Runs dense optical flow over each consecutive frame pair and flags
//! pairs whose mean flow magnitude is implausibly large (sudden motion) or
//! implausibly small (unnatural stillness). Stillness is only meaningful
//! once the sequence has shown real motion, so the first quiet stretch of
//! an intentionally static shot is not flagged.

use log::debug;
use rayon::prelude::*;

use crate::analysis::flow::dense_flow;
use crate::analysis::frame::Frame;
use crate::error::CoreResult;
use crate::issue::{QualityIssue, Severity};

/// Mean flow magnitude above which motion is flagged as sudden.
pub const SUDDEN_MOTION_THRESHOLD: f64 = 10.0;

/// Mean flow magnitude below which a pair counts as unnaturally still.
pub const STILLNESS_THRESHOLD: f64 = 0.1;

/// Mean flow magnitude above which a sudden-motion issue is severe.
pub const SEVERE_MOTION_THRESHOLD: f64 = 20.0;

// A pair with at least this much motion arms the stillness check.
const MOTION_OBSERVED_FLOOR: f64 = 0.5;

/// Detects sudden motion spikes and unnatural stillness across a frame
/// sequence.
#[derive(Debug, Clone)]
pub struct MovementDetector {
    fps: f64,
}

impl MovementDetector {
    pub fn new(fps: f64) -> Self {
        Self { fps }
    }

    /// Analyze every consecutive frame pair and report one issue per
    /// flagged pair. Sequences shorter than two frames produce no issues.
    pub fn detect(&self, frames: &[Frame]) -> CoreResult<Vec<QualityIssue>> {
        if frames.len() < 2 {
            return Ok(Vec::new());
        }

        let magnitudes: Vec<f64> = frames
            .par_windows(2)
            .map(|pair| dense_flow(&pair[0], &pair[1]).map(|flow| flow.mean_magnitude()))
            .collect::<CoreResult<Vec<f64>>>()?;

        let mut issues = Vec::new();
        let mut motion_seen = false;
        for (i, &magnitude) in magnitudes.iter().enumerate() {
            let frame_number = (i + 1) as u32;
            let timestamp = frame_number as f64 / self.fps;

            if magnitude > SUDDEN_MOTION_THRESHOLD {
                let severity = if magnitude > SEVERE_MOTION_THRESHOLD {
                    Severity::High
                } else {
                    Severity::Medium
                };
                debug!(
                    "motion spike between frames {} and {}: mean flow {:.2} px",
                    i,
                    i + 1,
                    magnitude
                );
                issues.push(
                    QualityIssue::new(
                        "unnatural_movement",
                        severity,
                        format!(
                            "Sudden motion between frames {} and {} (mean flow {:.2} px)",
                            i,
                            i + 1,
                            magnitude
                        ),
                        magnitude,
                        SUDDEN_MOTION_THRESHOLD,
                    )
                    .at_frame(frame_number, timestamp),
                );
            } else if magnitude < STILLNESS_THRESHOLD && motion_seen {
                issues.push(
                    QualityIssue::new(
                        "unnatural_movement",
                        Severity::Low,
                        format!(
                            "Motion stalls between frames {} and {} (mean flow {:.3} px)",
                            i,
                            i + 1,
                            magnitude
                        ),
                        magnitude,
                        STILLNESS_THRESHOLD,
                    )
                    .at_frame(frame_number, timestamp),
                );
            }

            if magnitude >= MOTION_OBSERVED_FLOOR {
                motion_seen = true;
            }
        }
        Ok(issues)
    }
}
