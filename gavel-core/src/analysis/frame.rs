//! Frame buffers and single-frame analyzers
//!
//! Responsibilities:
//! - Represent decoded frames (grayscale or RGB, 8 bits per sample)
//! - Compute edge-based sharpness as Laplacian response variance
//! - Compute mean brightness and luma variance
//! - Compute PSNR between consecutive frames
//! - Estimate residual noise against a Gaussian-blurred reference

use crate::error::{CoreError, CoreResult};

/// PSNR reported for identical frames, where the mean squared error is zero
/// and the ratio is undefined.
pub const PSNR_IDENTICAL: f64 = 100.0;

/// Decoded video frame: grayscale (1 channel) or RGB (3 channels),
/// 8 bits per sample, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: usize,
    height: usize,
    channels: usize,
    data: Vec<u8>,
}

impl Frame {
    /// Wrap a grayscale buffer. The buffer length must be `width * height`.
    pub fn gray(width: usize, height: usize, data: Vec<u8>) -> CoreResult<Self> {
        if data.len() != width * height {
            return Err(CoreError::InvalidInput(format!(
                "grayscale buffer length {} does not match {}x{}",
                data.len(),
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            channels: 1,
            data,
        })
    }

    /// Wrap an interleaved RGB buffer. The buffer length must be
    /// `width * height * 3`.
    pub fn rgb(width: usize, height: usize, data: Vec<u8>) -> CoreResult<Self> {
        if data.len() != width * height * 3 {
            return Err(CoreError::InvalidInput(format!(
                "RGB buffer length {} does not match {}x{}x3",
                data.len(),
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            channels: 3,
            data,
        })
    }

    /// Grayscale frame with every pixel set to `value`.
    pub fn filled(width: usize, height: usize, value: u8) -> Self {
        Self {
            width,
            height,
            channels: 1,
            data: vec![value; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Single-channel luma plane (BT.601 weights for RGB input).
    pub fn luma(&self) -> Vec<f32> {
        match self.channels {
            1 => self.data.iter().map(|&p| p as f32).collect(),
            _ => self
                .data
                .chunks_exact(3)
                .map(|px| 0.299 * px[0] as f32 + 0.587 * px[1] as f32 + 0.114 * px[2] as f32)
                .collect(),
        }
    }

    /// Mean pixel brightness on the 0-255 luma scale.
    pub fn mean_brightness(&self) -> f64 {
        let luma = self.luma();
        if luma.is_empty() {
            return 0.0;
        }
        luma.iter().map(|&v| v as f64).sum::<f64>() / luma.len() as f64
    }
}

/// Population variance of a sample set.
pub(crate) fn variance(values: &[f32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64;
    values
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / values.len() as f64
}

/// Edge-based sharpness: variance of the discrete Laplacian response.
///
/// Higher variance means more high-frequency edge energy, i.e. a sharper
/// image. No clamping happens at this layer; callers cap or normalize the
/// raw variance as needed.
pub fn calculate_sharpness(frame: &Frame) -> CoreResult<f64> {
    if frame.is_empty() {
        return Err(CoreError::InvalidInput("frame is empty".to_string()));
    }
    let (w, h) = (frame.width(), frame.height());
    if w < 3 || h < 3 {
        return Err(CoreError::InvalidInput(format!(
            "frame {}x{} too small for edge analysis",
            w, h
        )));
    }
    let luma = frame.luma();
    let mut response = Vec::with_capacity((w - 2) * (h - 2));
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let center = luma[y * w + x];
            let r = luma[(y - 1) * w + x] + luma[(y + 1) * w + x] + luma[y * w + x - 1]
                + luma[y * w + x + 1]
                - 4.0 * center;
            response.push(r);
        }
    }
    Ok(variance(&response))
}

/// Luma variance, used as a cheap contrast proxy.
pub fn luma_variance(frame: &Frame) -> CoreResult<f64> {
    if frame.is_empty() {
        return Err(CoreError::InvalidInput("frame is empty".to_string()));
    }
    Ok(variance(&frame.luma()))
}

/// Peak signal-to-noise ratio between two frames of identical geometry,
/// in dB. Identical frames report [`PSNR_IDENTICAL`].
pub fn psnr(a: &Frame, b: &Frame) -> CoreResult<f64> {
    if a.is_empty() || b.is_empty() {
        return Err(CoreError::InvalidInput("frame is empty".to_string()));
    }
    if a.width() != b.width() || a.height() != b.height() {
        return Err(CoreError::InvalidInput(format!(
            "frame geometry mismatch: {}x{} vs {}x{}",
            a.width(),
            a.height(),
            b.width(),
            b.height()
        )));
    }
    let la = a.luma();
    let lb = b.luma();
    let mse = la
        .iter()
        .zip(lb.iter())
        .map(|(&x, &y)| {
            let d = x as f64 - y as f64;
            d * d
        })
        .sum::<f64>()
        / la.len() as f64;
    if mse < 1e-10 {
        return Ok(PSNR_IDENTICAL);
    }
    Ok(10.0 * (255.0_f64 * 255.0 / mse).log10())
}

/// 3x3 Gaussian blur over a luma plane, replicating the border.
fn gaussian_blur(luma: &[f32], width: usize, height: usize) -> Vec<f32> {
    const KERNEL: [[f32; 3]; 3] = [[1.0, 2.0, 1.0], [2.0, 4.0, 2.0], [1.0, 2.0, 1.0]];
    let mut out = vec![0.0; luma.len()];
    for y in 0..height {
        for x in 0..width {
            let mut acc = 0.0;
            for (ky, row) in KERNEL.iter().enumerate() {
                for (kx, &weight) in row.iter().enumerate() {
                    let sy = (y + ky).saturating_sub(1).min(height - 1);
                    let sx = (x + kx).saturating_sub(1).min(width - 1);
                    acc += weight * luma[sy * width + sx];
                }
            }
            out[y * width + x] = acc / 16.0;
        }
    }
    out
}

/// Residual noise estimate: variance of the difference between the frame
/// and its Gaussian-blurred copy. Higher values mean noisier frames.
pub fn residual_noise_variance(frame: &Frame) -> CoreResult<f64> {
    if frame.is_empty() {
        return Err(CoreError::InvalidInput("frame is empty".to_string()));
    }
    let luma = frame.luma();
    let blurred = gaussian_blur(&luma, frame.width(), frame.height());
    let residual: Vec<f32> = luma.iter().zip(blurred.iter()).map(|(&a, &b)| a - b).collect();
    Ok(variance(&residual))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkerboard(size: usize) -> Frame {
        let data = (0..size * size)
            .map(|i| {
                let (x, y) = (i % size, i / size);
                if (x + y) % 2 == 0 { 255 } else { 0 }
            })
            .collect();
        Frame::gray(size, size, data).unwrap()
    }

    #[test]
    fn flat_frame_has_zero_sharpness() {
        let frame = Frame::filled(16, 16, 128);
        assert_eq!(calculate_sharpness(&frame).unwrap(), 0.0);
    }

    #[test]
    fn checkerboard_is_sharper_than_flat() {
        let sharp = calculate_sharpness(&checkerboard(16)).unwrap();
        assert!(sharp > 1000.0, "checkerboard sharpness was {sharp}");
    }

    #[test]
    fn sharpness_rejects_tiny_frames() {
        let frame = Frame::filled(2, 2, 0);
        assert!(calculate_sharpness(&frame).is_err());
    }

    #[test]
    fn psnr_sentinel_for_identical_frames() {
        let frame = Frame::filled(8, 8, 100);
        assert_eq!(psnr(&frame, &frame.clone()).unwrap(), PSNR_IDENTICAL);
    }

    #[test]
    fn psnr_drops_with_differences() {
        let a = Frame::filled(8, 8, 100);
        let b = Frame::filled(8, 8, 130);
        let value = psnr(&a, &b).unwrap();
        assert!(value < PSNR_IDENTICAL);
        assert!(value > 0.0);
    }

    #[test]
    fn rgb_luma_uses_bt601_weights() {
        let frame = Frame::rgb(1, 1, vec![255, 0, 0]).unwrap();
        let luma = frame.luma();
        assert!((luma[0] - 76.245).abs() < 0.01);
    }

    #[test]
    fn flat_frame_has_no_residual_noise() {
        let frame = Frame::filled(16, 16, 77);
        assert_eq!(residual_noise_variance(&frame).unwrap(), 0.0);
    }
}
