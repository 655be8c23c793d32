// Core types shared by every pipeline stage.

use image::{RgbImage, RgbaImage};

use crate::error::{Error, Result};

/// Bytes per RGBA pixel.
pub const CHANNELS: usize = 4;

/// A rectangular RGBA8 pixel buffer (row-major, 4 bytes per pixel).
/// Visual: one still picture; the pipeline makes a new one every tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub width: usize,     // how wide the frame is (pixels)
    pub height: usize,    // how tall the frame is (pixels)
    pub pixels: Vec<u8>,  // width * height * 4 bytes: R, G, B, A
}

impl Frame {
    /// Fully transparent black frame.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height * CHANNELS],
        }
    }

    /// Frame where every pixel has the same RGBA value.
    pub fn filled(width: usize, height: usize, rgba: [u8; 4]) -> Self {
        let mut pixels = Vec::with_capacity(width * height * CHANNELS);
        for _ in 0..width * height {
            pixels.extend_from_slice(&rgba);
        }
        Self { width, height, pixels }
    }

    /// Wrap a camera RGB image; alpha is forced opaque.
    pub fn from_rgb_image(img: &RgbImage) -> Self {
        let (w, h) = img.dimensions();
        let mut pixels = Vec::with_capacity(w as usize * h as usize * CHANNELS);
        for px in img.pixels() {
            pixels.extend_from_slice(&[px[0], px[1], px[2], 255]);
        }
        Self { width: w as usize, height: h as usize, pixels }
    }

    /// Take ownership of a decoded RGBA image.
    pub fn from_rgba_image(img: RgbaImage) -> Self {
        let (w, h) = img.dimensions();
        Self {
            width: w as usize,
            height: h as usize,
            pixels: img.into_raw(),
        }
    }

    /// Pass the frame through if its buffer is exactly `width * height` pixels.
    pub fn validate(self) -> Result<Self> {
        let expected = self
            .width
            .checked_mul(self.height)
            .and_then(|n| n.checked_mul(CHANNELS));
        if expected != Some(self.pixels.len()) {
            return Err(Error::FrameShape {
                width: self.width,
                height: self.height,
                len: self.pixels.len(),
            });
        }
        Ok(self)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> usize {
        (y * self.width + x) * CHANNELS
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let i = self.offset(x, y);
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2], self.pixels[i + 3]]
    }

    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, rgba: [u8; 4]) {
        let i = self.offset(x, y);
        self.pixels[i..i + CHANNELS].copy_from_slice(&rgba);
    }

    /// Zero every byte (transparent black). Visual: the surface goes blank.
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Resize the buffer in place, reusing the allocation when possible.
    /// Contents are unspecified afterwards; callers overwrite every pixel.
    pub fn reshape(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels.resize(width * height * CHANNELS, 0);
    }

    /// Pack into 0x00RRGGBB words for minifb, reusing `out`.
    pub fn pack_0rgb(&self, out: &mut Vec<u32>) {
        out.clear();
        out.extend(self.pixels.chunks_exact(CHANNELS).map(|p| {
            ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | p[2] as u32
        }));
    }
}

/// User-facing colour controls. Multipliers sit around 1.0; hue is in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AdjustmentParameters {
    pub saturation: f32,
    pub contrast: f32,
    pub brightness: f32,
    pub hue: f32,
}

impl Default for AdjustmentParameters {
    fn default() -> Self {
        Self {
            saturation: 1.0,
            contrast: 1.0,
            brightness: 1.0,
            hue: 0.0,
        }
    }
}

/// Downsampling divisor (>= 1). Visual: bigger = chunkier pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolutionFactor(f32);

impl ResolutionFactor {
    pub const ONE: ResolutionFactor = ResolutionFactor(1.0);

    /// Values below 1 (or NaN/inf) collapse to 1.
    pub fn new(value: f32) -> Self {
        if value.is_finite() && value >= 1.0 {
            Self(value)
        } else {
            Self(1.0)
        }
    }

    #[inline]
    pub fn get(self) -> f32 {
        self.0
    }

    /// Working size for a `width`x`height` display: floor division, never below 1x1.
    pub fn scaled(self, width: usize, height: usize) -> (usize, usize) {
        let w = (width as f32 / self.0).floor() as usize;
        let h = (height as f32 / self.0).floor() as usize;
        if w == 0 || h == 0 {
            log::warn!(
                "resolution {} collapses {}x{} to {}x{}; clamping to at least 1x1",
                self.0, width, height, w, h
            );
        }
        (w.max(1), h.max(1))
    }
}

impl Default for ResolutionFactor {
    fn default() -> Self {
        Self::ONE
    }
}

/// Which collaborator supplies frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SourceMode {
    #[default]
    LiveCapture,
    StaticImage,
}

impl SourceMode {
    pub fn toggled(self) -> Self {
        match self {
            SourceMode::LiveCapture => SourceMode::StaticImage,
            SourceMode::StaticImage => SourceMode::LiveCapture,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SourceMode::LiveCapture => "CAM",
            SourceMode::StaticImage => "IMG",
        }
    }
}
