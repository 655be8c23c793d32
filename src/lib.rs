//! bayer-cam: live ordered-dither stylization of camera or still-image frames.
//!
//! Per frame: nearest-neighbour shrink, colour adjustment, Bayer dithering,
//! nearest-neighbour grow back to display size. The window, camera and CLI
//! live in the binary; everything here runs without a display.

pub mod adjust;
pub mod bayer;
pub mod config;
pub mod controls;
pub mod dither;
pub mod error;
pub mod processor;
pub mod resample;
pub mod scheduler;
pub mod source;
pub mod types;

pub use error::{Error, Result};
pub use types::{AdjustmentParameters, Frame, ResolutionFactor, SourceMode};
