//! Short-time spectral analysis
//!
//! Hann-windowed STFT power spectrogram and the per-band peak-to-average
//! ratio used by the metallic voice detector. The FFT itself comes from
//! `rustfft`; this module only owns the windowing, framing, and band math.

use num_complex::Complex32;
use once_cell::sync::Lazy;
use rustfft::FftPlanner;

use crate::error::{CoreError, CoreResult};

/// STFT analysis window length, in samples.
pub const WINDOW_SIZE: usize = 2048;

/// Hop between consecutive analysis windows, in samples.
pub const HOP_SIZE: usize = 512;

static HANN_WINDOW: Lazy<Vec<f32>> = Lazy::new(|| {
    (0..WINDOW_SIZE)
        .map(|i| {
            let phase = 2.0 * std::f32::consts::PI * i as f32 / (WINDOW_SIZE - 1) as f32;
            0.5 * (1.0 - phase.cos())
        })
        .collect()
});

/// Magnitude-squared spectrogram of a mono signal.
#[derive(Debug, Clone)]
pub struct Spectrogram {
    /// One power spectrum (bins 0..=N/2) per analysis frame.
    power: Vec<Vec<f32>>,
    sample_rate: u32,
}

impl Spectrogram {
    pub fn frame_count(&self) -> usize {
        self.power.len()
    }

    /// Time of an analysis frame, in seconds from signal start.
    pub fn timestamp(&self, frame: usize) -> f64 {
        frame as f64 * HOP_SIZE as f64 / self.sample_rate as f64
    }

    /// Peak-to-average power ratio within `[lo_hz, hi_hz)` for one frame.
    ///
    /// Returns `None` when the frame index or band is out of range, or the
    /// band holds no bins at this sample rate.
    pub fn band_peak_ratio(&self, frame: usize, lo_hz: f32, hi_hz: f32) -> Option<f32> {
        let spectrum = self.power.get(frame)?;
        let lo_bin = self.bin_for(lo_hz);
        let hi_bin = self.bin_for(hi_hz).min(spectrum.len());
        if lo_bin >= hi_bin {
            return None;
        }
        let band = &spectrum[lo_bin..hi_bin];
        let peak = band.iter().copied().fold(0.0_f32, f32::max);
        let avg = band.iter().sum::<f32>() / band.len() as f32;
        if avg <= f32::MIN_POSITIVE {
            return Some(0.0);
        }
        Some(peak / avg)
    }

    fn bin_for(&self, hz: f32) -> usize {
        (hz * WINDOW_SIZE as f32 / self.sample_rate as f32) as usize
    }
}

/// Compute the Hann-windowed power spectrogram of `samples`.
///
/// Signals shorter than one window produce a spectrogram with zero frames,
/// which detectors treat as "nothing to analyze".
pub fn stft(samples: &[f32], sample_rate: u32) -> CoreResult<Spectrogram> {
    if sample_rate == 0 {
        return Err(CoreError::InvalidInput(
            "sample rate must be positive".to_string(),
        ));
    }

    let mut power = Vec::new();
    if samples.len() >= WINDOW_SIZE {
        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(WINDOW_SIZE);
        let mut buffer = vec![Complex32::new(0.0, 0.0); WINDOW_SIZE];

        let mut start = 0;
        while start + WINDOW_SIZE <= samples.len() {
            for (i, slot) in buffer.iter_mut().enumerate() {
                *slot = Complex32::new(samples[start + i] * HANN_WINDOW[i], 0.0);
            }
            fft.process(&mut buffer);
            power.push(buffer[..=WINDOW_SIZE / 2].iter().map(|c| c.norm_sqr()).collect());
            start += HOP_SIZE;
        }
    }

    Ok(Spectrogram { power, sample_rate })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, rate: u32, seconds: f32) -> Vec<f32> {
        let n = (rate as f32 * seconds) as usize;
        (0..n)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / rate as f32).sin())
            .collect()
    }

    #[test]
    fn short_signal_yields_no_frames() {
        let spec = stft(&vec![0.1; WINDOW_SIZE - 1], 48_000).unwrap();
        assert_eq!(spec.frame_count(), 0);
    }

    #[test]
    fn zero_rate_is_rejected() {
        assert!(stft(&[0.0; 4096], 0).is_err());
    }

    #[test]
    fn pure_tone_is_peaky_in_its_band() {
        let samples = sine(1000.0, 48_000, 0.5);
        let spec = stft(&samples, 48_000).unwrap();
        assert!(spec.frame_count() > 0);
        let ratio = spec.band_peak_ratio(0, 500.0, 1500.0).unwrap();
        assert!(ratio > 10.0, "tone band ratio was {ratio}");
    }

    #[test]
    fn silent_band_reports_zero_ratio() {
        let samples = sine(1000.0, 48_000, 0.5);
        let spec = stft(&samples, 48_000).unwrap();
        // Nothing lives between 8 kHz and 10 kHz in a 1 kHz tone.
        let ratio = spec.band_peak_ratio(0, 8000.0, 10_000.0).unwrap();
        assert!(ratio < 10.0, "empty band ratio was {ratio}");
    }

    #[test]
    fn timestamps_advance_by_hop() {
        let samples = sine(440.0, 44_100, 1.0);
        let spec = stft(&samples, 44_100).unwrap();
        let dt = spec.timestamp(1) - spec.timestamp(0);
        assert!((dt - HOP_SIZE as f64 / 44_100.0).abs() < 1e-12);
    }
}
