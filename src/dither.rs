// Ordered (Bayer) dithering, tiled across the whole frame.
// Visual expectation: every channel snaps to pure on/off (or to a few evenly
// spaced levels), with the matrix pattern standing in for the lost shades.
//
// R, G and B are compared against the threshold independently, so flat
// grays can pick up coloured speckle.

use crate::bayer::ThresholdMatrix;
use crate::error::{Error, Result};
use crate::types::{CHANNELS, Frame};

/// Output levels per channel; 2 means pure on/off.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Levels(u8);

impl Levels {
    pub const BINARY: Levels = Levels(2);

    pub fn new(count: u8) -> Result<Self> {
        if count < 2 {
            return Err(Error::InvalidLevels(count));
        }
        Ok(Self(count))
    }

    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Levels {
    fn default() -> Self {
        Self::BINARY
    }
}

/// Quantize one channel at a cell whose normalized threshold is `t`.
#[inline]
pub fn quantize(value: u8, t: f32, levels: Levels) -> u8 {
    if levels == Levels::BINARY {
        return if value as f32 > t * 255.0 { 255 } else { 0 };
    }
    let steps = (levels.0 - 1) as f32;
    let scaled = value as f32 * steps / 255.0;
    let base = scaled.floor();
    let level = if scaled - base > t { base + 1.0 } else { base };
    (level.min(steps) * 255.0 / steps).round() as u8
}

/// Dither `frame` in place against `matrix`. Alpha becomes 255.
pub fn apply_ordered_dither(frame: &mut Frame, matrix: &ThresholdMatrix, levels: Levels) {
    let width = frame.width;
    if width == 0 {
        return;
    }
    // Thresholds looked up once per matrix cell rather than per pixel.
    let n = matrix.size();
    let table: Vec<f32> = (0..n * n).map(|i| matrix.threshold(i % n, i / n)).collect();

    for (row_idx, row) in frame.pixels.chunks_exact_mut(width * CHANNELS).enumerate() {
        let trow = &table[(row_idx % n) * n..(row_idx % n + 1) * n];
        for (x, px) in row.chunks_exact_mut(CHANNELS).enumerate() {
            let t = trow[x % n];
            px[0] = quantize(px[0], t, levels);
            px[1] = quantize(px[1], t, levels);
            px[2] = quantize(px[2], t, levels);
            px[3] = 255;
        }
    }
}
