// Where frames come from: a live capture device or a still image.
// Visual: whichever source is active is what you see stylized in the window.

use std::path::Path;

use crate::error::{Error, Result};
use crate::types::Frame;

/// Anything that can hand over the latest frame on demand.
/// A live device may block until its first frame is ready.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Frame>;

    /// Short human-readable name for logs.
    fn describe(&self) -> String {
        "frame source".to_string()
    }
}

/// Decode an image file into an RGBA frame.
pub fn decode_image(path: &Path) -> Result<Frame> {
    let img = image::open(path).map_err(|source| Error::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Frame::from_rgba_image(img.to_rgba8()))
}

/// The live device (if one could be opened) plus the most recent still image.
#[derive(Default)]
pub struct Sources {
    live: Option<Box<dyn FrameSource>>,
    still: Option<Frame>,
}

impl Sources {
    pub fn new(live: Option<Box<dyn FrameSource>>) -> Self {
        Self { live, still: None }
    }

    pub fn has_live(&self) -> bool {
        self.live.is_some()
    }

    /// Pull the next frame from the live device, if there is one.
    /// A frame whose buffer doesn't match its size comes back as an error.
    pub fn next_live(&mut self) -> Option<Result<Frame>> {
        self.live
            .as_mut()
            .map(|src| src.next_frame().and_then(Frame::validate))
    }

    pub fn still(&self) -> Option<&Frame> {
        self.still.as_ref()
    }

    /// Replace the held still image. A malformed frame is refused.
    pub fn set_still(&mut self, frame: Frame) -> Result<()> {
        self.still = Some(frame.validate()?);
        Ok(())
    }

    /// Decode `path` and hold it. On failure the previous image stays.
    pub fn load_still(&mut self, path: &Path) -> Result<()> {
        let frame = decode_image(path)?;
        log::info!(
            "loaded still image {} ({}x{})",
            path.display(),
            frame.width,
            frame.height
        );
        self.still = Some(frame);
        Ok(())
    }
}
