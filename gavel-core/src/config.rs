//! Validator configuration
//!
//! Responsibilities:
//! - Define the coverage mode (real-time vs batch analysis)
//! - Define the named quality standards and their pass thresholds
//! - Fix mode-derived analysis thresholds at construction time
//!
//! Configuration is immutable for the lifetime of a validator instance.
//! Callers that need a different policy construct a new validator.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// Frame rate assumed when converting frame indices to timestamps.
///
/// Upstream shot records do not always carry an explicit frame rate, so this
/// default is used unless the caller overrides it with
/// [`ValidatorConfig::with_fps`].
pub const DEFAULT_FPS: f64 = 30.0;

/// Pass threshold for the 0-100 composite shot score.
pub const QUALITY_PASS_THRESHOLD: f64 = 70.0;

/// Sharpness threshold fixed at construction for real-time validators.
pub const REAL_TIME_SHARPNESS_THRESHOLD: f64 = 80.0;

/// Sharpness threshold fixed at construction for batch validators.
pub const BATCH_SHARPNESS_THRESHOLD: f64 = 100.0;

/// Coverage mode: how much analysis a validator runs per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Fast, partial analysis suitable for interactive preview loops.
    RealTime,
    /// Slow, exhaustive analysis for final gating.
    #[default]
    Batch,
}

impl Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationMode::RealTime => write!(f, "real_time"),
            ValidationMode::Batch => write!(f, "batch"),
        }
    }
}

/// Named target bar with an associated minimum passing overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityStandard {
    Preview,
    #[default]
    WebHd,
    Broadcast,
}

impl QualityStandard {
    /// Minimum `overall_score` (0-1) required to pass this standard.
    pub fn pass_threshold(&self) -> f64 {
        match self {
            QualityStandard::Preview => 0.5,
            QualityStandard::WebHd => 0.7,
            QualityStandard::Broadcast => 0.9,
        }
    }
}

impl Display for QualityStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityStandard::Preview => write!(f, "preview"),
            QualityStandard::WebHd => write!(f, "web_hd"),
            QualityStandard::Broadcast => write!(f, "broadcast"),
        }
    }
}

/// Immutable configuration owned by a `QualityValidator`.
///
/// Construction fixes the mode-derived sharpness threshold and the composite
/// pass threshold; there are no setters.
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    mode: ValidationMode,
    standard: QualityStandard,
    enable_advanced_analysis: bool,
    fps: f64,
    sharpness_threshold: f64,
    quality_pass_threshold: f64,
}

impl ValidatorConfig {
    pub fn new(
        mode: ValidationMode,
        standard: QualityStandard,
        enable_advanced_analysis: bool,
    ) -> Self {
        let sharpness_threshold = match mode {
            ValidationMode::RealTime => REAL_TIME_SHARPNESS_THRESHOLD,
            ValidationMode::Batch => BATCH_SHARPNESS_THRESHOLD,
        };
        Self {
            mode,
            standard,
            enable_advanced_analysis,
            fps: DEFAULT_FPS,
            sharpness_threshold,
            quality_pass_threshold: QUALITY_PASS_THRESHOLD,
        }
    }

    /// Override the frame rate used for frame-index to timestamp conversion.
    ///
    /// Non-finite or non-positive rates are ignored and the previous value is
    /// kept.
    pub fn with_fps(mut self, fps: f64) -> Self {
        if fps.is_finite() && fps > 0.0 {
            self.fps = fps;
        }
        self
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    pub fn standard(&self) -> QualityStandard {
        self.standard
    }

    pub fn advanced_analysis_enabled(&self) -> bool {
        self.enable_advanced_analysis
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn sharpness_threshold(&self) -> f64 {
        self.sharpness_threshold
    }

    pub fn quality_pass_threshold(&self) -> f64 {
        self.quality_pass_threshold
    }
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self::new(ValidationMode::Batch, QualityStandard::WebHd, false)
    }
}
