// Keyboard control panel: the five numeric knobs, source toggle, image loading.
// Visual: the HUD line shows every knob; the selected one is marked with '>'.

use std::path::PathBuf;

use crate::config::{ControlChange, PipelineConfig};
use crate::scheduler::Scheduler;

pub const RESOLUTION_RANGE: (f32, f32) = (1.0, 32.0);
pub const MULTIPLIER_RANGE: (f32, f32) = (0.0, 2.0);
pub const MULTIPLIER_STEP: f32 = 0.1;
pub const HUE_STEP: f32 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Resolution,
    Saturation,
    Contrast,
    Brightness,
    Hue,
}

impl Control {
    pub const ALL: [Control; 5] = [
        Control::Resolution,
        Control::Saturation,
        Control::Contrast,
        Control::Brightness,
        Control::Hue,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Control::Resolution => "RES",
            Control::Saturation => "SAT",
            Control::Contrast => "CON",
            Control::Brightness => "BRI",
            Control::Hue => "HUE",
        }
    }

    pub fn value(self, cfg: &PipelineConfig) -> f32 {
        let a = &cfg.adjustments;
        match self {
            Control::Resolution => cfg.resolution.get(),
            Control::Saturation => a.saturation,
            Control::Contrast => a.contrast,
            Control::Brightness => a.brightness,
            Control::Hue => a.hue,
        }
    }

    /// The edit produced by moving this knob `steps` notches.
    pub fn nudge(self, cfg: &PipelineConfig, steps: i32) -> ControlChange {
        let v = self.value(cfg);
        let s = steps as f32;
        match self {
            Control::Resolution => {
                let (lo, hi) = RESOLUTION_RANGE;
                ControlChange::Resolution((v.round() + s).clamp(lo, hi))
            }
            Control::Hue => ControlChange::Hue((v + s * HUE_STEP).rem_euclid(360.0)),
            _ => {
                let (lo, hi) = MULTIPLIER_RANGE;
                // snap to tenths so repeated nudges don't drift
                let next = ((v + s * MULTIPLIER_STEP) * 10.0).round() / 10.0;
                let next = next.clamp(lo, hi);
                match self {
                    Control::Saturation => ControlChange::Saturation(next),
                    Control::Contrast => ControlChange::Contrast(next),
                    _ => ControlChange::Brightness(next),
                }
            }
        }
    }
}

/// One thing the user asked for this frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Select(Control),
    Nudge(i32),
    ToggleSource,
    /// Show a newly chosen image file; it becomes the one L reloads.
    OpenImage(PathBuf),
    ReloadImage,
    CycleMatrix,
    Reset,
}

pub struct ControlPanel {
    selected: Control,
    image: Option<PathBuf>,       // last image file shown
    status: Option<&'static str>, // short message for the HUD
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ControlPanel {
    /// `image` is what ReloadImage loads until another file is opened.
    pub fn new(image: Option<PathBuf>) -> Self {
        Self { selected: Control::Resolution, image, status: None }
    }

    pub fn image(&self) -> Option<&PathBuf> {
        self.image.as_ref()
    }

    pub fn selected(&self) -> Control {
        self.selected
    }

    pub fn status(&self) -> Option<&'static str> {
        self.status
    }

    /// Route one action into the scheduler. Failures are logged and shown on
    /// the HUD; none of them stop the loop.
    pub fn handle(&mut self, action: Action, scheduler: &mut Scheduler) {
        self.status = None;
        match action {
            Action::Select(c) => self.selected = c,
            Action::Nudge(steps) => {
                let change = self.selected.nudge(scheduler.config(), steps);
                scheduler.update(change);
            }
            Action::ToggleSource => {
                if !scheduler.toggle_source() {
                    self.status = Some("NO CAMERA");
                }
            }
            Action::OpenImage(path) => self.open_image(path, scheduler),
            Action::ReloadImage => match self.image.clone() {
                Some(path) => self.open_image(path, scheduler),
                None => {
                    log::warn!("no still image yet (press O or use --image)");
                    self.status = Some("NO IMAGE");
                }
            },
            Action::CycleMatrix => {
                if let Err(e) = scheduler.cycle_matrix_size() {
                    log::error!("{e}");
                }
            }
            Action::Reset => {
                scheduler.update(ControlChange::ResetAdjustments);
            }
        }
    }

    /// A failed decode keeps the previous image on screen and in `image`.
    fn open_image(&mut self, path: PathBuf, scheduler: &mut Scheduler) {
        match scheduler.load_image(&path) {
            Ok(()) => self.image = Some(path),
            Err(e) => {
                log::error!("{e}");
                self.status = Some("IMAGE ERROR");
            }
        }
    }

    /// HUD text, e.g. `CAM 4X4 | >RES 1.0 SAT 1.0 CON 1.0 BRI 1.0 HUE 0 | FPS 59.8`.
    pub fn hud_line(&self, scheduler: &Scheduler, fps: f32) -> String {
        let cfg = scheduler.config();
        let n = scheduler.processor().matrix().size();
        let mut knobs = Vec::with_capacity(Control::ALL.len());
        for c in Control::ALL {
            let mark = if c == self.selected { ">" } else { "" };
            let value = match c {
                Control::Hue => format!("{:.0}", c.value(cfg)),
                _ => format!("{:.1}", c.value(cfg)),
            };
            knobs.push(format!("{mark}{} {value}", c.label()));
        }
        let mut line = format!(
            "{} {n}X{n} | {} | FPS {fps:.1}",
            cfg.source_mode.label(),
            knobs.join(" ")
        );
        if let Some(msg) = self.status {
            line.push_str(" | ");
            line.push_str(msg);
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::FrameProcessor;
    use crate::source::Sources;
    use crate::types::{Frame, SourceMode};

    fn write_png(dir: &std::path::Path, name: &str, rgba: [u8; 4]) -> PathBuf {
        let path = dir.join(name);
        image::RgbaImage::from_pixel(4, 4, image::Rgba(rgba))
            .save(&path)
            .unwrap();
        path
    }

    fn still_scheduler() -> Scheduler {
        let p = FrameProcessor::new(4, 4, 4).unwrap();
        let mut s = Scheduler::new(PipelineConfig::default(), Sources::new(None), p);
        s.set_image(Frame::filled(4, 4, [128, 128, 128, 255])).unwrap();
        s
    }

    #[test]
    fn test_multiplier_nudge_snaps_and_clamps() {
        let mut cfg = PipelineConfig::default();
        for _ in 0..15 {
            cfg.apply(Control::Brightness.nudge(&cfg, 1));
        }
        assert_eq!(cfg.adjustments.brightness, 2.0);
        cfg.apply(Control::Brightness.nudge(&cfg, -3));
        assert_eq!(cfg.adjustments.brightness, 1.7);
        for _ in 0..30 {
            cfg.apply(Control::Saturation.nudge(&cfg, -1));
        }
        assert_eq!(cfg.adjustments.saturation, 0.0);
    }

    #[test]
    fn test_hue_nudge_wraps() {
        let cfg = PipelineConfig::default();
        assert_eq!(Control::Hue.nudge(&cfg, -1), ControlChange::Hue(355.0));
    }

    #[test]
    fn test_resolution_nudge_bounds() {
        let cfg = PipelineConfig::default();
        assert_eq!(Control::Resolution.nudge(&cfg, -1), ControlChange::Resolution(1.0));
        assert_eq!(Control::Resolution.nudge(&cfg, 100), ControlChange::Resolution(32.0));
    }

    #[test]
    fn test_handle_routes_to_selected_control() {
        let mut s = still_scheduler();
        let mut panel = ControlPanel::default();
        panel.handle(Action::Select(Control::Contrast), &mut s);
        panel.handle(Action::Nudge(2), &mut s);
        assert_eq!(s.config().adjustments.contrast, 1.2);
        panel.handle(Action::Reset, &mut s);
        assert_eq!(s.config().adjustments.contrast, 1.0);
    }

    #[test]
    fn test_handle_reports_missing_camera_and_image() {
        let mut s = still_scheduler();
        let mut panel = ControlPanel::default();
        panel.handle(Action::ToggleSource, &mut s);
        assert_eq!(panel.status(), Some("NO CAMERA"));
        panel.handle(Action::ReloadImage, &mut s);
        assert_eq!(panel.status(), Some("NO IMAGE"));
    }

    #[test]
    fn test_open_image_replaces_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let white = write_png(dir.path(), "white.png", [255, 255, 255, 255]);
        let black = write_png(dir.path(), "black.png", [0, 0, 0, 255]);

        let mut s = still_scheduler();
        let mut panel = ControlPanel::default();
        panel.handle(Action::OpenImage(white.clone()), &mut s);
        assert_eq!(panel.status(), None);
        assert_eq!(panel.image(), Some(&white));
        assert!(s.surface().pixels.chunks_exact(4).all(|p| p == [255, 255, 255, 255]));

        panel.handle(Action::OpenImage(black.clone()), &mut s);
        assert_eq!(panel.image(), Some(&black));
        assert_eq!(s.config().source_mode, SourceMode::StaticImage);
        assert!(s.surface().pixels.chunks_exact(4).all(|p| p == [0, 0, 0, 255]));

        // reload follows the latest file
        std::fs::copy(&white, &black).unwrap();
        panel.handle(Action::ReloadImage, &mut s);
        assert!(s.surface().pixels.chunks_exact(4).all(|p| p == [255, 255, 255, 255]));
    }

    #[test]
    fn test_open_bad_file_keeps_current_image() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_png(dir.path(), "good.png", [0, 0, 0, 255]);
        let bad = dir.path().join("bad.png");
        std::fs::write(&bad, b"not an image").unwrap();

        let mut s = still_scheduler();
        let mut panel = ControlPanel::new(Some(good.clone()));
        panel.handle(Action::ReloadImage, &mut s);
        let before = s.surface().clone();

        panel.handle(Action::OpenImage(bad), &mut s);
        assert_eq!(panel.status(), Some("IMAGE ERROR"));
        assert_eq!(panel.image(), Some(&good));
        assert_eq!(s.surface(), &before);
    }

    #[test]
    fn test_hud_line_marks_selection() {
        let s = still_scheduler();
        let panel = ControlPanel::default();
        let line = panel.hud_line(&s, 30.0);
        assert_eq!(
            line,
            "IMG 4X4 | >RES 1.0 SAT 1.0 CON 1.0 BRI 1.0 HUE 0 | FPS 30.0"
        );
    }
}
