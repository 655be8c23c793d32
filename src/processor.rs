// One pass of the stylization pipeline:
//   source --(nearest shrink)--> work --adjust--> --dither--> --(nearest grow)--> surface
// Visual expectation: with resolution 1 you see a fine dither pattern over the
// full image; resolution 4 gives chunky 4x4-pixel blocks of the same pattern.

use crate::adjust::apply_adjustments;
use crate::bayer::{MatrixCache, ThresholdMatrix};
use crate::config::PipelineConfig;
use crate::dither::apply_ordered_dither;
use crate::error::Result;
use crate::resample::resize_nearest_into;
use crate::types::Frame;

/// Matrix sizes the UI cycles through.
pub const MATRIX_SIZES: [usize; 4] = [2, 4, 8, 16];

pub struct FrameProcessor {
    display_width: usize,
    display_height: usize,
    cache: MatrixCache,
    matrix: ThresholdMatrix,
    work: Frame, // reused working-resolution buffer
}

impl FrameProcessor {
    /// Fails only when `matrix_size` is not a power of two >= 2.
    pub fn new(display_width: usize, display_height: usize, matrix_size: usize) -> Result<Self> {
        let mut cache = MatrixCache::new();
        let matrix = cache.get(matrix_size)?.clone();
        Ok(Self {
            display_width: display_width.max(1),
            display_height: display_height.max(1),
            cache,
            matrix,
            work: Frame::new(0, 0),
        })
    }

    pub fn display_size(&self) -> (usize, usize) {
        (self.display_width, self.display_height)
    }

    pub fn matrix(&self) -> &ThresholdMatrix {
        &self.matrix
    }

    /// Swap in a different threshold matrix (memoized per size).
    pub fn set_matrix_size(&mut self, size: usize) -> Result<()> {
        if size != self.matrix.size() {
            self.matrix = self.cache.get(size)?.clone();
            log::info!("threshold matrix now {size}x{size}");
        }
        Ok(())
    }

    /// Next entry of [`MATRIX_SIZES`] after the current one, wrapping.
    pub fn cycle_matrix_size(&mut self) -> Result<usize> {
        let pos = MATRIX_SIZES.iter().position(|&s| s == self.matrix.size());
        let next = match pos {
            Some(i) => MATRIX_SIZES[(i + 1) % MATRIX_SIZES.len()],
            None => MATRIX_SIZES[0],
        };
        self.set_matrix_size(next)?;
        Ok(next)
    }

    /// Working buffer from the most recent pass (post-dither, pre-upscale).
    pub fn working_frame(&self) -> &Frame {
        &self.work
    }

    /// Render `source` into `surface`, which is fully overwritten at display size.
    pub fn process_frame(&mut self, source: &Frame, config: &PipelineConfig, surface: &mut Frame) {
        let (down_w, down_h) = config
            .resolution
            .scaled(self.display_width, self.display_height);

        // 1) Shrink straight from the source to working size (no smoothing).
        resize_nearest_into(source, &mut self.work, down_w, down_h);

        // 2) Colour adjustments, clamped on write-back.
        apply_adjustments(&mut self.work, &config.adjustments);

        // 3) Ordered dither; alpha ends up opaque.
        apply_ordered_dither(&mut self.work, &self.matrix, config.levels);

        // 4) Grow back to display size as hard blocks.
        resize_nearest_into(&self.work, surface, self.display_width, self.display_height);
    }
}
