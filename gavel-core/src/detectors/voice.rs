//! Voice quality detection
//!
//! Responsibilities:
//! - Detect metallic/artificial voice artifacts from formant band shape
//! - Measure voice clarity as a percentile-based SNR score
//!
//! Unnaturally peaky, narrow-band resonance across several formant bands
//! is characteristic of synthetic or vocoder artifacts; averaging across
//! three independent bands keeps single noisy bins from triggering false
//! positives.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::analysis::AudioClip;
use crate::analysis::level::{noise_floor_rms, rms, snr_db};
use crate::analysis::spectral::stft;
use crate::error::{CoreError, CoreResult};
use crate::issue::{ImprovementSuggestion, QualityIssue, Severity};

/// Formant bands inspected for artificial resonance, in Hz.
pub const FORMANT_BANDS: [(f32, f32); 3] = [(500.0, 1500.0), (1500.0, 2500.0), (2500.0, 3500.0)];

/// Peak-to-average ratio above which a band contributes to the metallic
/// score.
pub const BAND_PEAK_RATIO_THRESHOLD: f32 = 10.0;

/// Accumulated metallic score above which a time frame is flagged.
pub const METALLIC_SCORE_THRESHOLD: f32 = 15.0;

/// Metallic score above which the issue is severe.
pub const SEVERE_METALLIC_SCORE: f32 = 30.0;

/// Clarity score below which a `low_clarity` issue is emitted.
pub const MIN_CLARITY_SCORE: f64 = 30.0;

/// Clarity score below which the issue is critical.
pub const CRITICAL_CLARITY_SCORE: f64 = 10.0;

// Signals with RMS below this are treated as silent.
const SILENCE_RMS: f64 = 1e-10;

/// Detects synthetic-sounding resonance in voice audio.
#[derive(Debug, Clone, Default)]
pub struct MetallicVoiceDetector;

impl MetallicVoiceDetector {
    pub fn new() -> Self {
        Self
    }

    /// One `metallic_voice` issue per spectrogram frame whose accumulated
    /// band peakiness crosses the threshold.
    pub fn detect(&self, clip: &AudioClip) -> CoreResult<Vec<QualityIssue>> {
        let spectrogram = stft(&clip.samples, clip.sample_rate)?;

        let mut issues = Vec::new();
        for frame in 0..spectrogram.frame_count() {
            let mut metallic_score = 0.0_f32;
            for &(lo, hi) in &FORMANT_BANDS {
                if let Some(ratio) = spectrogram.band_peak_ratio(frame, lo, hi) {
                    if ratio > BAND_PEAK_RATIO_THRESHOLD {
                        metallic_score += ratio;
                    }
                }
            }
            if metallic_score > METALLIC_SCORE_THRESHOLD {
                let severity = if metallic_score > SEVERE_METALLIC_SCORE {
                    Severity::High
                } else {
                    Severity::Medium
                };
                let timestamp = spectrogram.timestamp(frame);
                debug!(
                    "metallic resonance at {:.2}s (score {:.1})",
                    timestamp, metallic_score
                );
                issues.push(
                    QualityIssue::new(
                        "metallic_voice",
                        severity,
                        format!(
                            "Narrow-band resonance across formant bands (score {:.1})",
                            metallic_score
                        ),
                        metallic_score as f64,
                        METALLIC_SCORE_THRESHOLD as f64,
                    )
                    .at_time(timestamp),
                );
            }
        }
        Ok(issues)
    }
}

/// Result of a voice clarity measurement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClarityReport {
    /// 0-100 clarity score derived from the SNR estimate.
    pub clarity_score: f64,
    /// Estimated signal-to-noise ratio in dB.
    pub snr_db: f64,
    pub issues: Vec<QualityIssue>,
    pub suggestions: Vec<ImprovementSuggestion>,
}

impl ClarityReport {
    /// Pure key/value serialization of the report.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Estimate voice clarity from the waveform alone.
///
/// Signal level is whole-waveform RMS; the noise estimate is the RMS of
/// the quietest tenth of samples. The SNR maps onto 0-100 through a
/// clamped affine transform where -20 dB scores 0 and +20 dB scores 100.
pub fn measure_voice_clarity(clip: &AudioClip) -> CoreResult<ClarityReport> {
    if clip.sample_rate == 0 {
        return Err(CoreError::InvalidInput(
            "sample rate must be positive".to_string(),
        ));
    }

    let signal_rms = rms(&clip.samples);
    if clip.samples.is_empty() || signal_rms < SILENCE_RMS {
        let issue = QualityIssue::new(
            "empty_audio",
            Severity::Critical,
            "Audio is empty or silent; clarity cannot be measured",
            0.0,
            MIN_CLARITY_SCORE,
        );
        return Ok(ClarityReport {
            clarity_score: 0.0,
            snr_db: -100.0,
            issues: vec![issue],
            suggestions: Vec::new(),
        });
    }

    let noise_rms = noise_floor_rms(&clip.samples);
    let snr = snr_db(signal_rms, noise_rms);
    let clarity_score = ((snr + 20.0) * 2.5).clamp(0.0, 100.0);
    debug!(
        "voice clarity: rms {:.4}, noise {:.4}, snr {:.1} dB, score {:.1}",
        signal_rms, noise_rms, snr, clarity_score
    );

    let mut issues = Vec::new();
    let mut suggestions = Vec::new();
    if clarity_score < MIN_CLARITY_SCORE {
        let severity = if clarity_score < CRITICAL_CLARITY_SCORE {
            Severity::Critical
        } else {
            Severity::High
        };
        let issue = QualityIssue::new(
            "low_clarity",
            severity,
            format!(
                "Voice clarity {:.1} is below the acceptable floor ({:.1} dB SNR)",
                clarity_score, snr
            ),
            clarity_score,
            MIN_CLARITY_SCORE,
        );
        suggestions.push(
            ImprovementSuggestion::new(
                "regenerate-audio",
                if severity == Severity::Critical { 1 } else { 2 },
                "Regenerate the audio take with stronger noise suppression",
                20.0,
            )
            .with_parameter("noise_reduction_db", serde_json::json!(12))
            .with_parameter("target_snr_db", serde_json::json!(20))
            .for_issues(&[&issue]),
        );
        issues.push(issue);
    }

    Ok(ClarityReport {
        clarity_score,
        snr_db: snr,
        issues,
        suggestions,
    })
}
