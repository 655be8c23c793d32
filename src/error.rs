// One error type for the whole pipeline.
// Every variant states *where* things went wrong; only window/config/matrix
// errors stop the app, everything per-frame is logged and skipped.
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Creating the window failed
    #[error("Window init error: {0}")]
    WindowInit(String),

    /// Updating the window buffer failed
    #[error("Window update error: {0}")]
    WindowUpdate(String),

    /// Opening/starting the camera failed (missing device, permission denied)
    #[error("Camera unavailable: {0}")]
    Acquisition(String),

    /// Grabbing/decoding a single camera frame failed
    #[error("Camera frame error: {0}")]
    CameraFrame(String),

    /// A frame whose buffer length disagrees with its dimensions
    #[error("Frame buffer holds {len} bytes, expected {width}x{height} RGBA")]
    FrameShape { width: usize, height: usize, len: usize },

    /// The still image could not be read or decoded
    #[error("Failed to decode image '{}': {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Threshold matrix side must be a power of two and at least 2
    #[error("Threshold matrix size must be a power of two >= 2, got {0}")]
    MatrixSize(usize),

    /// Quantization needs at least two output levels
    #[error("Dither levels must be at least 2, got {0}")]
    InvalidLevels(u8),

    /// Reading the settings file failed
    #[error("Failed to read config file '{}': {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Parsing the settings file failed
    #[error("Failed to parse config file '{}': {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
