// Nearest-neighbour resampling (no smoothing).
// Visual: shrinking throws away pixels, growing repeats them as hard-edged
// blocks. That blockiness is the whole point of the pixelated look.

use crate::types::{CHANNELS, Frame};

/// Source index sampled for destination index `d` (pixel-centre mapping).
#[inline]
fn source_index(d: usize, src_len: usize, dst_len: usize) -> usize {
    // floor((d + 0.5) * src / dst), in integers
    (((2 * d + 1) * src_len) / (2 * dst_len)).min(src_len - 1)
}

/// Resample `src` into `dst`, which is reshaped to `width`x`height`.
/// An empty source leaves `dst` transparent black.
pub fn resize_nearest_into(src: &Frame, dst: &mut Frame, width: usize, height: usize) {
    dst.reshape(width, height);
    if src.is_empty() || width == 0 || height == 0 {
        dst.clear();
        return;
    }

    // Column lookup computed once; every row reuses it.
    let xs: Vec<usize> = (0..width)
        .map(|dx| source_index(dx, src.width, width) * CHANNELS)
        .collect();

    let src_stride = src.width * CHANNELS;
    let dst_stride = width * CHANNELS;
    for dy in 0..height {
        let sy = source_index(dy, src.height, height);
        let src_row = &src.pixels[sy * src_stride..(sy + 1) * src_stride];
        let dst_row = &mut dst.pixels[dy * dst_stride..(dy + 1) * dst_stride];
        for (out, &sx) in dst_row.chunks_exact_mut(CHANNELS).zip(&xs) {
            out.copy_from_slice(&src_row[sx..sx + CHANNELS]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resize_nearest(src: &Frame, width: usize, height: usize) -> Frame {
        let mut dst = Frame::new(0, 0);
        resize_nearest_into(src, &mut dst, width, height);
        dst
    }

    fn numbered(width: usize, height: usize) -> Frame {
        let mut f = Frame::new(width, height);
        for y in 0..height {
            for x in 0..width {
                f.set_pixel(x, y, [x as u8, y as u8, (x + y) as u8, 255]);
            }
        }
        f
    }

    #[test]
    fn test_same_size_is_copy() {
        let f = numbered(5, 3);
        assert_eq!(resize_nearest(&f, 5, 3), f);
    }

    #[test]
    fn test_flat_round_trip_is_lossless() {
        let f = Frame::filled(17, 9, [12, 34, 56, 255]);
        let small = resize_nearest(&f, 5, 3);
        assert!(small.pixels.chunks_exact(4).all(|p| p == [12, 34, 56, 255]));
        let big = resize_nearest(&small, 17, 9);
        assert_eq!(big, f);
    }

    #[test]
    fn test_upscale_by_two_makes_blocks() {
        let f = numbered(4, 4);
        let big = resize_nearest(&f, 8, 8);
        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(big.pixel(x, y), f.pixel(x / 2, y / 2));
            }
        }
    }

    #[test]
    fn test_downscale_by_two_samples_centres() {
        let f = numbered(8, 8);
        let small = resize_nearest(&f, 4, 4);
        // centre of the 2x2 block starting at (2x, 2y) falls on (2x+1, 2y+1)
        assert_eq!(small.pixel(0, 0), f.pixel(1, 1));
        assert_eq!(small.pixel(3, 2), f.pixel(7, 5));
    }

    #[test]
    fn test_single_pixel_target() {
        let f = numbered(6, 6);
        let one = resize_nearest(&f, 1, 1);
        assert_eq!(one.pixel(0, 0), f.pixel(3, 3));
    }

    #[test]
    fn test_empty_source_gives_blank() {
        let empty = Frame::new(0, 0);
        let out = resize_nearest(&empty, 3, 2);
        assert_eq!((out.width, out.height), (3, 2));
        assert!(out.pixels.iter().all(|&b| b == 0));
    }
}
