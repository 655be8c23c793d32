// Opens a camera and hands out frames as RGBA `Frame`s.
// Visual expectation: each `next_frame()` is the newest picture the camera
// has; the first call blocks until the device produces something.

use bayer_cam::error::{Error, Result};
use bayer_cam::source::FrameSource;
use bayer_cam::types::Frame;

use image::imageops;
use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    },
};

/// A small wrapper around nokhwa::Camera so the render loop stays clean.
pub struct CameraCapture {
    cam: Camera,
    index: u32,
    width: u32,
    height: u32,
    mirror: bool,
}

impl CameraCapture {
    /// Open camera `index` near the requested resolution (falls back if not exact).
    /// Missing devices and denied permission both come back as `Error::Acquisition`.
    pub fn new(index: u32, width: u32, height: u32, mirror: bool) -> Result<Self> {
        let fmt = CameraFormat::new(
            Resolution::new(width, height),
            FrameFormat::YUYV, // uncompressed; cheap to convert to RGB
            30,                // target FPS
        );
        let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

        let mut cam = Camera::new(CameraIndex::Index(index), req)
            .map_err(|e| Error::Acquisition(format!("create camera {index}: {e}")))?;
        cam.open_stream()
            .map_err(|e| Error::Acquisition(format!("open stream: {e}")))?;

        // The stream might pick a slightly different resolution.
        let actual = cam.resolution();
        log::info!(
            "camera {index} streaming at {}x{} (requested {width}x{height})",
            actual.width(),
            actual.height()
        );

        Ok(Self {
            cam,
            index,
            width: actual.width(),
            height: actual.height(),
            mirror,
        })
    }
}

impl FrameSource for CameraCapture {
    fn next_frame(&mut self) -> Result<Frame> {
        let buffer = self
            .cam
            .frame()
            .map_err(|e| Error::CameraFrame(format!("fetch frame: {e}")))?;
        let mut rgb = buffer
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::CameraFrame(format!("decode RGB: {e}")))?;
        if self.mirror {
            imageops::flip_horizontal_in_place(&mut rgb);
        }
        Ok(Frame::from_rgb_image(&rgb))
    }

    fn describe(&self) -> String {
        format!("camera {} ({}x{})", self.index, self.width, self.height)
    }
}

impl Drop for CameraCapture {
    fn drop(&mut self) {
        if let Err(e) = self.cam.stop_stream() {
            log::warn!("failed to stop camera stream: {e}");
        }
    }
}
