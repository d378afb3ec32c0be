//! Audio gap detection and reporting
//!
//! Finds maximal contiguous runs of samples below the silence threshold,
//! keeps the runs long enough to matter, and classifies each run as
//! problematic or intentional silence. A report aggregates the runs into
//! totals a gating pipeline can act on.

use serde::{Deserialize, Serialize};

use crate::analysis::AudioClip;
use crate::analysis::level::amplitude_to_db;
use crate::error::{CoreError, CoreResult};
use crate::issue::{QualityIssue, Severity};

/// Default level below which a sample counts as silent, in dBFS.
pub const DEFAULT_SILENCE_THRESHOLD_DB: f32 = -40.0;

/// Default minimum run length reported as a gap, in seconds.
pub const DEFAULT_MIN_GAP_DURATION: f64 = 0.1;

/// Gap duration above which silence is problematic rather than
/// intentional, in seconds.
pub const PROBLEMATIC_GAP_DURATION: f64 = 1.0;

/// Gap duration above which a problematic gap is severe, in seconds.
pub const SEVERE_GAP_DURATION: f64 = 2.0;

/// One contiguous silent run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioGap {
    pub start_time: f64,
    pub end_time: f64,
    pub duration: f64,
    pub is_problematic: bool,
    pub severity: Severity,
}

/// Aggregate view over the gaps of one clip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GapReport {
    pub total_gap_duration: f64,
    /// Share of the clip spent in gaps, 0-100.
    pub gap_percentage: f64,
    pub problematic_count: usize,
    pub intentional_count: usize,
    pub gaps: Vec<AudioGap>,
}

impl GapReport {
    /// Pure key/value serialization of the report.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Finds and classifies silent runs in an audio clip.
#[derive(Debug, Clone)]
pub struct GapDetector {
    silence_threshold_db: f32,
    min_gap_duration: f64,
}

impl Default for GapDetector {
    fn default() -> Self {
        Self {
            silence_threshold_db: DEFAULT_SILENCE_THRESHOLD_DB,
            min_gap_duration: DEFAULT_MIN_GAP_DURATION,
        }
    }
}

impl GapDetector {
    pub fn new(silence_threshold_db: f32, min_gap_duration: f64) -> Self {
        Self {
            silence_threshold_db,
            min_gap_duration,
        }
    }

    /// Detect maximal silent runs at least `min_gap_duration` long.
    pub fn detect(&self, clip: &AudioClip) -> CoreResult<Vec<AudioGap>> {
        if clip.sample_rate == 0 {
            return Err(CoreError::InvalidInput(
                "sample rate must be positive".to_string(),
            ));
        }
        let rate = clip.sample_rate as f64;

        let mut gaps = Vec::new();
        let mut run_start: Option<usize> = None;
        for (i, &sample) in clip.samples.iter().enumerate() {
            if amplitude_to_db(sample) < self.silence_threshold_db {
                run_start.get_or_insert(i);
            } else if let Some(start) = run_start.take() {
                self.push_gap(&mut gaps, start, i, rate);
            }
        }
        if let Some(start) = run_start {
            self.push_gap(&mut gaps, start, clip.samples.len(), rate);
        }
        Ok(gaps)
    }

    /// Translate gaps into the shared issue vocabulary.
    pub fn issues(&self, gaps: &[AudioGap]) -> Vec<QualityIssue> {
        gaps.iter()
            .map(|gap| {
                let issue_type = if gap.is_problematic {
                    "problematic_silence"
                } else {
                    "intentional_silence"
                };
                let threshold = if gap.is_problematic {
                    PROBLEMATIC_GAP_DURATION
                } else {
                    self.min_gap_duration
                };
                QualityIssue::new(
                    issue_type,
                    gap.severity,
                    format!(
                        "Silence from {:.2}s to {:.2}s ({:.2}s)",
                        gap.start_time, gap.end_time, gap.duration
                    ),
                    gap.duration,
                    threshold,
                )
                .at_time(gap.start_time)
            })
            .collect()
    }

    fn push_gap(&self, gaps: &mut Vec<AudioGap>, start: usize, end: usize, rate: f64) {
        let start_time = start as f64 / rate;
        let end_time = end as f64 / rate;
        let duration = end_time - start_time;
        if duration < self.min_gap_duration {
            return;
        }
        let severity = if duration > SEVERE_GAP_DURATION {
            Severity::High
        } else if duration > PROBLEMATIC_GAP_DURATION {
            Severity::Medium
        } else {
            Severity::Low
        };
        gaps.push(AudioGap {
            start_time,
            end_time,
            duration,
            is_problematic: duration > PROBLEMATIC_GAP_DURATION,
            severity,
        });
    }
}

/// Aggregate gaps into totals against the clip duration.
pub fn generate_gap_report(gaps: &[AudioGap], total_duration: f64) -> GapReport {
    let total_gap_duration: f64 = gaps.iter().map(|g| g.duration).sum();
    let gap_percentage = if total_duration > 0.0 {
        (total_gap_duration / total_duration * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };
    GapReport {
        total_gap_duration,
        gap_percentage,
        problematic_count: gaps.iter().filter(|g| g.is_problematic).count(),
        intentional_count: gaps.iter().filter(|g| !g.is_problematic).count(),
        gaps: gaps.to_vec(),
    }
}
