//! Render-loop driver, decoupled from the window.
//!
//! The host calls [`Scheduler::tick`] once per display refresh. User edits go
//! through [`Scheduler::update`]; when the source is a still image that edit
//! re-renders immediately instead of waiting for the next tick. Switching
//! source or loading an image clears the surface first, so a frame from the
//! old source never shows over the new one.

use std::path::Path;

use crate::config::{ControlChange, PipelineConfig};
use crate::error::Result;
use crate::processor::FrameProcessor;
use crate::source::Sources;
use crate::types::{Frame, SourceMode};

/// What one tick did to the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The surface holds a freshly processed frame.
    Rendered,
    /// The source failed this time; the surface keeps the previous frame.
    Skipped,
    /// Nothing to draw (no device, or no image loaded yet).
    Idle,
}

pub struct Scheduler {
    config: PipelineConfig,
    sources: Sources,
    processor: FrameProcessor,
    surface: Frame,
}

impl Scheduler {
    /// If live capture is requested but no device is available the
    /// scheduler starts in still-image mode and waits for an image.
    pub fn new(mut config: PipelineConfig, sources: Sources, processor: FrameProcessor) -> Self {
        if config.source_mode == SourceMode::LiveCapture && !sources.has_live() {
            log::warn!("no live capture device; waiting for a still image");
            config.source_mode = SourceMode::StaticImage;
        }
        let (w, h) = processor.display_size();
        Self {
            config,
            sources,
            processor,
            surface: Frame::new(w, h),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn surface(&self) -> &Frame {
        &self.surface
    }

    pub fn processor(&self) -> &FrameProcessor {
        &self.processor
    }

    pub fn sources(&self) -> &Sources {
        &self.sources
    }

    /// Render the active source once.
    pub fn tick(&mut self) -> TickOutcome {
        match self.config.source_mode {
            SourceMode::LiveCapture => match self.sources.next_live() {
                Some(Ok(frame)) => {
                    self.processor
                        .process_frame(&frame, &self.config, &mut self.surface);
                    TickOutcome::Rendered
                }
                Some(Err(e)) => {
                    // also covers frames whose buffer doesn't match their size
                    log::warn!("skipping frame: {e}");
                    TickOutcome::Skipped
                }
                None => TickOutcome::Idle,
            },
            SourceMode::StaticImage => self.render_still(),
        }
    }

    fn render_still(&mut self) -> TickOutcome {
        match self.sources.still() {
            Some(still) => {
                self.processor
                    .process_frame(still, &self.config, &mut self.surface);
                TickOutcome::Rendered
            }
            None => TickOutcome::Idle,
        }
    }

    /// Drop whatever is on the surface (source changed under it).
    fn invalidate(&mut self) {
        self.surface.clear();
    }

    /// Apply one user edit. Returns false when it changed nothing.
    pub fn update(&mut self, change: ControlChange) -> bool {
        if change == ControlChange::SourceMode(SourceMode::LiveCapture) && !self.sources.has_live() {
            log::warn!("live capture unavailable; staying on still image");
            return false;
        }
        let previous_mode = self.config.source_mode;
        if !self.config.apply(change) {
            return false;
        }
        if self.config.source_mode != previous_mode {
            log::info!("source switched to {:?}", self.config.source_mode);
            self.invalidate();
        }
        self.redraw_if_still();
        true
    }

    /// Flip between camera and still image.
    pub fn toggle_source(&mut self) -> bool {
        self.update(ControlChange::SourceMode(self.config.source_mode.toggled()))
    }

    /// Decode `path`, hold it, and switch to still-image mode.
    /// A decode failure leaves both the held image and the surface untouched.
    pub fn load_image(&mut self, path: &Path) -> Result<()> {
        self.sources.load_still(path)?;
        self.show_still();
        Ok(())
    }

    /// Same as [`Scheduler::load_image`] for an already decoded frame.
    pub fn set_image(&mut self, frame: Frame) -> Result<()> {
        self.sources.set_still(frame)?;
        self.show_still();
        Ok(())
    }

    fn show_still(&mut self) {
        self.config.source_mode = SourceMode::StaticImage;
        self.invalidate();
        self.render_still();
    }

    /// Move to the next threshold matrix size.
    pub fn cycle_matrix_size(&mut self) -> Result<usize> {
        let size = self.processor.cycle_matrix_size()?;
        self.redraw_if_still();
        Ok(size)
    }

    fn redraw_if_still(&mut self) {
        if self.config.source_mode == SourceMode::StaticImage {
            self.render_still();
        }
    }
}
