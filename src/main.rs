// What you SEE:
// • The camera (or a still image) rendered as a chunky ordered-dither picture.
// • 1..5 pick a knob (RES SAT CON BRI HUE), Up/Down or +/- change it.
// • Tab switches camera <-> still image, O opens an image file, L reloads it,
//   M cycles the dither matrix size, R resets the knobs. ESC quits.

mod camera;
mod draw;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use bayer_cam::config::Settings;
use bayer_cam::controls::{Action, ControlPanel};
use bayer_cam::error::Error;
use bayer_cam::processor::FrameProcessor;
use bayer_cam::scheduler::Scheduler;
use bayer_cam::source::{FrameSource, Sources};
use camera::CameraCapture;
use clap::Parser;
use draw::Drawer;

/// Parse and validate the resolution divisor (>= 1)
fn parse_resolution(s: &str) -> Result<f32, String> {
    let v: f32 = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
    if !v.is_finite() || v < 1.0 {
        return Err(format!("Resolution divisor must be at least 1, got {}", v));
    }
    Ok(v)
}

/// Parse and validate the threshold matrix size (power of two >= 2)
fn parse_matrix_size(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|_| format!("'{}' is not a valid size", s))?;
    if n < 2 || !n.is_power_of_two() {
        return Err(format!("Matrix size must be a power of two >= 2, got {}", n));
    }
    Ok(n)
}

/// Parse and validate the number of dither levels (>= 2)
fn parse_levels(s: &str) -> Result<u8, String> {
    let n: u8 = s.parse().map_err(|_| format!("'{}' is not a valid level count", s))?;
    if n < 2 {
        return Err(format!("Dither levels must be at least 2, got {}", n));
    }
    Ok(n)
}

/// bayer-cam: live ordered-dither camera effect
#[derive(Parser)]
#[command(name = "bayer-cam")]
#[command(version, about = "Live ordered-dither (Bayer) stylization of a camera feed or still image")]
#[command(after_help = "EXAMPLES:
    bayer-cam                          # default camera, 640x480 window
    bayer-cam --image cat.png          # start on a still image
    bayer-cam -r 4 --matrix-size 8     # chunky pixels, 8x8 Bayer pattern
    bayer-cam --no-camera -i cat.png   # never touch the camera

ENVIRONMENT:
    RUST_LOG    Log filter (default: info)")]
struct Cli {
    /// Settings file (default: ./bayer-cam.toml or ~/.config/bayer-cam/config.toml)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Still image to show (Tab switches back to the camera)
    #[arg(long, short = 'i')]
    image: Option<PathBuf>,

    /// Camera device index
    #[arg(long)]
    camera: Option<u32>,

    /// Do not open the camera
    #[arg(long)]
    no_camera: bool,

    /// Mirror the camera horizontally
    #[arg(long)]
    mirror: bool,

    /// Display width in pixels
    #[arg(long)]
    width: Option<usize>,

    /// Display height in pixels
    #[arg(long)]
    height: Option<usize>,

    /// Downsampling divisor (>= 1); bigger = chunkier pixels
    #[arg(long, short = 'r', value_parser = parse_resolution)]
    resolution: Option<f32>,

    /// Threshold matrix side (2, 4, 8, 16, ...)
    #[arg(long, value_parser = parse_matrix_size)]
    matrix_size: Option<usize>,

    /// Output levels per channel (2 = pure on/off)
    #[arg(long, value_parser = parse_levels)]
    levels: Option<u8>,
}

impl Cli {
    /// Command-line values win over the settings file.
    fn apply_to(&self, s: &mut Settings) {
        if let Some(path) = &self.image {
            s.source.image = Some(path.clone());
        }
        if let Some(index) = self.camera {
            s.camera.index = index;
        }
        if self.no_camera {
            s.camera.enabled = false;
        }
        if self.mirror {
            s.camera.mirror = true;
        }
        if let Some(w) = self.width {
            s.display.width = w;
        }
        if let Some(h) = self.height {
            s.display.height = h;
        }
        if let Some(r) = self.resolution {
            s.adjust.resolution = r;
        }
        if let Some(n) = self.matrix_size {
            s.dither.matrix_size = n;
        }
        if let Some(l) = self.levels {
            s.dither.levels = l;
        }
    }
}

/// Try the camera; on failure log why and carry on without it.
fn open_camera(s: &Settings) -> Option<Box<dyn FrameSource>> {
    if !s.camera.enabled {
        log::info!("camera disabled");
        return None;
    }
    let cam = &s.camera;
    match CameraCapture::new(cam.index, cam.width, cam.height, cam.mirror) {
        Ok(capture) => {
            log::info!("using {}", capture.describe());
            Some(Box::new(capture))
        }
        Err(e) => {
            log::error!("{e}; open a still image to continue (O, or --image)");
            None
        }
    }
}

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut settings = Settings::load(cli.config.as_deref())?;
    cli.apply_to(&mut settings);

    /* --- Pipeline setup ---
       A bad matrix size stops us here, before any window opens. */
    let (w, h) = (settings.display.width, settings.display.height);
    let processor = FrameProcessor::new(w, h, settings.dither.matrix_size)?;
    let config = settings.pipeline_config()?;
    let sources = Sources::new(open_camera(&settings));
    let mut scheduler = Scheduler::new(config, sources, processor);

    let mut panel = ControlPanel::new(settings.source.image.clone());
    if panel.image().is_some() {
        // Visual: the still image replaces the camera straight away.
        panel.handle(Action::ReloadImage, &mut scheduler);
    }

    let mut drawer = Drawer::new("bayer-cam", w, h, settings.display.fps)?;
    log::info!("started {}x{}, {:?}", w, h, scheduler.config().source_mode);

    /* --- HUD / FPS --- */
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut fps = 0.0f32;

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        // 1) Inputs: still-image edits redraw inside `handle`.
        for action in drawer.actions() {
            panel.handle(action, &mut scheduler);
        }

        // 2) One pass of the pipeline over the active source.
        scheduler.tick();

        // 3) Present (waits for the next frame slot).
        let hud = panel.hud_line(&scheduler, fps);
        drawer.present(scheduler.surface(), &hud)?;

        // 4) FPS once per second
        frames_this_second += 1;
        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            fps = frames_this_second as f32 / secs;
            log::info!("FPS: {:.1}", fps);
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resolution() {
        assert_eq!(parse_resolution("2.5"), Ok(2.5));
        assert!(parse_resolution("0.5").is_err());
        assert!(parse_resolution("abc").is_err());
    }

    #[test]
    fn test_parse_matrix_size() {
        assert_eq!(parse_matrix_size("8"), Ok(8));
        assert!(parse_matrix_size("6").is_err());
        assert!(parse_matrix_size("1").is_err());
    }

    #[test]
    fn test_parse_levels() {
        assert_eq!(parse_levels("4"), Ok(4));
        assert!(parse_levels("1").is_err());
    }

    #[test]
    fn test_cli_overrides_settings() {
        let cli = Cli::parse_from(["bayer-cam", "--no-camera", "-r", "3", "--levels", "4"]);
        let mut s = Settings::default();
        cli.apply_to(&mut s);
        assert!(!s.camera.enabled);
        assert_eq!(s.adjust.resolution, 3.0);
        assert_eq!(s.dither.levels, 4);
        assert_eq!(s.dither.matrix_size, 4);
    }
}
