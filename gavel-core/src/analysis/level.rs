//! Amplitude statistics and SNR estimation
//!
//! Responsibilities:
//! - RMS signal level and amplitude-to-dB conversion
//! - Percentile-based noise floor estimation
//! - SNR in dB with a sentinel for noise-free signals

/// dB floor added to avoid log of zero.
const DB_EPSILON: f32 = 1e-10;

/// SNR reported when the noise floor is effectively zero ("perfect
/// clarity" sentinel).
pub const SNR_PERFECT: f64 = 100.0;

// Noise RMS below this is treated as no noise at all.
const NOISE_FLOOR_EPSILON: f64 = 1e-10;

/// Root-mean-square level of a waveform.
pub fn rms(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = samples.iter().map(|&s| s as f64 * s as f64).sum();
    (sum_sq / samples.len() as f64).sqrt()
}

/// Convert a linear amplitude to decibels.
pub fn amplitude_to_db(sample: f32) -> f32 {
    20.0 * (sample.abs() + DB_EPSILON).log10()
}

/// The `percentile`-th percentile (0-100) of absolute sample amplitude.
pub fn percentile_abs(samples: &[f32], percentile: f64) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let mut magnitudes: Vec<f32> = samples.iter().map(|s| s.abs()).collect();
    magnitudes.sort_by(|a, b| a.total_cmp(b));
    let rank = (percentile / 100.0 * (magnitudes.len() - 1) as f64).round() as usize;
    magnitudes[rank.min(magnitudes.len() - 1)]
}

/// Noise estimate: RMS of the samples whose absolute amplitude sits below
/// the 10th percentile, a silence/background proxy.
pub fn noise_floor_rms(samples: &[f32]) -> f64 {
    let floor = percentile_abs(samples, 10.0);
    let quiet: Vec<f32> = samples
        .iter()
        .copied()
        .filter(|s| s.abs() < floor)
        .collect();
    rms(&quiet)
}

/// Signal-to-noise ratio in dB. A vanishing noise floor reports
/// [`SNR_PERFECT`].
pub fn snr_db(signal_rms: f64, noise_rms: f64) -> f64 {
    if noise_rms < NOISE_FLOOR_EPSILON {
        return SNR_PERFECT;
    }
    20.0 * (signal_rms / noise_rms).log10()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rms_of_unit_square_wave() {
        let samples = vec![1.0, -1.0, 1.0, -1.0];
        assert!((rms(&samples) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn rms_of_empty_signal_is_zero() {
        assert_eq!(rms(&[]), 0.0);
    }

    #[test]
    fn amplitude_to_db_of_full_scale() {
        assert!(amplitude_to_db(1.0).abs() < 1e-6);
        assert!(amplitude_to_db(0.0) < -190.0);
    }

    #[test]
    fn percentile_of_constant_signal() {
        let samples = vec![0.5; 100];
        assert_eq!(percentile_abs(&samples, 10.0), 0.5);
    }

    #[test]
    fn snr_sentinel_without_noise() {
        assert_eq!(snr_db(0.7, 0.0), SNR_PERFECT);
    }

    #[test]
    fn snr_of_equal_levels_is_zero() {
        assert!(snr_db(0.5, 0.5).abs() < 1e-9);
    }
}
