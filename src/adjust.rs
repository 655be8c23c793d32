// Colour adjustments: brightness -> contrast -> saturation -> hue rotation.
// Visual expectation: with all sliders at their defaults the picture is
// untouched; the order matters (e.g. contrast after brightness pivots the
// already-brightened value around mid-gray).

use crate::types::{AdjustmentParameters, CHANNELS, Frame};

const MID_GRAY: f64 = 128.0;

/// 3x3 RGB rotation around the gray (1,1,1) axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HueRotation {
    m: [[f64; 3]; 3],
}

impl HueRotation {
    /// Rotation by `degrees`. Visual: 120° turns red into green.
    pub fn new(degrees: f32) -> Self {
        let angle = f64::from(degrees).to_radians();
        let (sin, cos) = angle.sin_cos();
        let third: f64 = 1.0 / 3.0;
        let k = third.sqrt() * sin;
        let diag = cos + third * (1.0 - cos);
        let off = third * (1.0 - cos);
        Self {
            m: [
                [diag, off - k, off + k],
                [off + k, diag, off - k],
                [off - k, off + k, diag],
            ],
        }
    }

    #[inline]
    pub fn apply(&self, [r, g, b]: [f64; 3]) -> [f64; 3] {
        let m = &self.m;
        [
            m[0][0] * r + m[0][1] * g + m[0][2] * b,
            m[1][0] * r + m[1][1] * g + m[1][2] * b,
            m[2][0] * r + m[2][1] * g + m[2][2] * b,
        ]
    }
}

/// Per-pixel transform, unclamped. Intermediate values may leave [0, 255].
#[inline]
pub fn adjust_rgb(rgb: [f64; 3], params: &AdjustmentParameters, hue: &HueRotation) -> [f64; 3] {
    let brightness = f64::from(params.brightness);
    let contrast = f64::from(params.contrast);
    let saturation = f64::from(params.saturation);

    // 1) brightness
    let [r, g, b] = rgb.map(|c| c * brightness);

    // 2) contrast, pivoting on mid-gray
    let [r, g, b] = [r, g, b].map(|c| (c - MID_GRAY) * contrast + MID_GRAY);

    // 3) saturation: push away from / toward the pixel's own average
    let avg = (r + g + b) / 3.0;
    let rgb = [r, g, b].map(|c| avg + (c - avg) * saturation);

    // 4) hue rotation
    hue.apply(rgb)
}

/// Clamp to the channel range and round (ties to even) for storage.
#[inline]
pub fn to_channel(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.clamp(0.0, 255.0).round_ties_even() as u8
}

/// Apply all adjustments to `frame` in place. Alpha is left alone.
/// Values are clamped to [0,255] on write-back.
pub fn apply_adjustments(frame: &mut Frame, params: &AdjustmentParameters) {
    let hue = HueRotation::new(params.hue);
    for px in frame.pixels.chunks_exact_mut(CHANNELS) {
        let rgb = [px[0], px[1], px[2]].map(f64::from);
        let [r, g, b] = adjust_rgb(rgb, params, &hue);
        px[0] = to_channel(r);
        px[1] = to_channel(g);
        px[2] = to_channel(b);
    }
}
