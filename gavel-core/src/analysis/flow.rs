//! Dense optical flow estimation
//!
//! Block-matching flow between consecutive frames: the frame pair is tiled
//! into fixed-size blocks and each block's displacement is found by an
//! exhaustive sum-of-absolute-differences search over the luma planes.
//! The result is a per-block 2D displacement field whose mean magnitude
//! feeds the movement detectors.

use rayon::prelude::*;

use crate::analysis::frame::Frame;
use crate::error::{CoreError, CoreResult};

/// Side length of a matching block, in pixels.
pub const BLOCK_SIZE: usize = 16;

/// Maximum displacement searched in each direction, in pixels.
pub const SEARCH_RADIUS: isize = 24;

// Sampling stride inside a block when accumulating SAD.
const SAMPLE_STRIDE: usize = 2;

/// Per-block 2D displacement field between two frames.
#[derive(Debug, Clone)]
pub struct FlowField {
    vectors: Vec<(f32, f32)>,
    blocks_x: usize,
    blocks_y: usize,
}

impl FlowField {
    pub fn vectors(&self) -> &[(f32, f32)] {
        &self.vectors
    }

    pub fn block_grid(&self) -> (usize, usize) {
        (self.blocks_x, self.blocks_y)
    }

    /// Mean displacement magnitude across all blocks, in pixels.
    pub fn mean_magnitude(&self) -> f64 {
        if self.vectors.is_empty() {
            return 0.0;
        }
        self.vectors
            .iter()
            .map(|&(dx, dy)| ((dx * dx + dy * dy) as f64).sqrt())
            .sum::<f64>()
            / self.vectors.len() as f64
    }
}

/// Estimate dense optical flow from `prev` to `next`.
///
/// Both frames must share geometry and be at least one block in each
/// dimension.
pub fn dense_flow(prev: &Frame, next: &Frame) -> CoreResult<FlowField> {
    if prev.is_empty() || next.is_empty() {
        return Err(CoreError::InvalidInput("frame is empty".to_string()));
    }
    if prev.width() != next.width() || prev.height() != next.height() {
        return Err(CoreError::InvalidInput(format!(
            "frame geometry mismatch: {}x{} vs {}x{}",
            prev.width(),
            prev.height(),
            next.width(),
            next.height()
        )));
    }
    let (width, height) = (prev.width(), prev.height());
    let blocks_x = width / BLOCK_SIZE;
    let blocks_y = height / BLOCK_SIZE;
    if blocks_x == 0 || blocks_y == 0 {
        return Err(CoreError::InvalidInput(format!(
            "frame {}x{} too small for motion estimation (needs {} px blocks)",
            width, height, BLOCK_SIZE
        )));
    }

    let prev_luma = prev.luma();
    let next_luma = next.luma();

    let vectors: Vec<(f32, f32)> = (0..blocks_x * blocks_y)
        .into_par_iter()
        .map(|block| {
            let ox = (block % blocks_x) * BLOCK_SIZE;
            let oy = (block / blocks_x) * BLOCK_SIZE;
            best_displacement(&prev_luma, &next_luma, width, height, ox, oy)
        })
        .collect();

    Ok(FlowField {
        vectors,
        blocks_x,
        blocks_y,
    })
}

/// Exhaustive SAD search for one block. Candidates are visited in a fixed
/// order and ties keep the earlier candidate, so results are deterministic;
/// the zero displacement is evaluated first so flat regions report no
/// motion.
fn best_displacement(
    prev: &[f32],
    next: &[f32],
    width: usize,
    height: usize,
    ox: usize,
    oy: usize,
) -> (f32, f32) {
    let mut best = (0isize, 0isize);
    let mut best_sad = block_sad(prev, next, width, ox, oy, 0, 0);

    for dy in -SEARCH_RADIUS..=SEARCH_RADIUS {
        for dx in -SEARCH_RADIUS..=SEARCH_RADIUS {
            if dx == 0 && dy == 0 {
                continue;
            }
            let tx = ox as isize + dx;
            let ty = oy as isize + dy;
            if tx < 0
                || ty < 0
                || tx + BLOCK_SIZE as isize > width as isize
                || ty + BLOCK_SIZE as isize > height as isize
            {
                continue;
            }
            let sad = block_sad(prev, next, width, ox, oy, dx, dy);
            if sad < best_sad {
                best_sad = sad;
                best = (dx, dy);
            }
        }
    }
    (best.0 as f32, best.1 as f32)
}

fn block_sad(
    prev: &[f32],
    next: &[f32],
    width: usize,
    ox: usize,
    oy: usize,
    dx: isize,
    dy: isize,
) -> f32 {
    let mut sad = 0.0;
    let mut y = 0;
    while y < BLOCK_SIZE {
        let mut x = 0;
        while x < BLOCK_SIZE {
            let p = prev[(oy + y) * width + ox + x];
            let ny = (oy + y) as isize + dy;
            let nx = (ox + x) as isize + dx;
            let n = next[ny as usize * width + nx as usize];
            sad += (p - n).abs();
            x += SAMPLE_STRIDE;
        }
        y += SAMPLE_STRIDE;
    }
    sad
}
