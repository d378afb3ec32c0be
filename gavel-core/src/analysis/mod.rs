//! Primitive analyzers
//!
//! Pure functions computing one numeric signal from one or two frames or
//! audio buffers. Nothing in this module holds state; every function is
//! safe for concurrent read-only use.
//!
//! # Organization
//!
//! - `frame`: frame buffers, sharpness, brightness, PSNR, noise estimate
//! - `flow`: dense block-matching optical flow between frame pairs
//! - `level`: amplitude statistics, dB conversion, SNR estimation
//! - `spectral`: short-time Fourier analysis and formant band ratios

pub mod flow;
pub mod frame;
pub mod level;
pub mod spectral;

pub use frame::Frame;

/// Decoded audio clip handed in by the decoding layer.
///
/// Samples are mono floating point in [-1, 1]; multi-channel sources are
/// downmixed before they reach the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl AudioClip {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Clip duration in seconds; 0 when the sample rate is invalid.
    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}
