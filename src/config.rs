//! Settings for bayer-cam.
//!
//! Two layers:
//! - [`Settings`]: startup values read once from a TOML file (never written back).
//! - [`PipelineConfig`]: the live knobs the render loop reads every tick,
//!   mutated only through [`PipelineConfig::apply`].

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::dither::Levels;
use crate::error::{Error, Result};
use crate::types::{AdjustmentParameters, ResolutionFactor, SourceMode};

/// Settings file structure. Every section and field is optional.
#[derive(Debug, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub display: DisplaySettings,
    #[serde(default)]
    pub camera: CameraSettings,
    #[serde(default)]
    pub dither: DitherSettings,
    #[serde(default)]
    pub adjust: AdjustSettings,
    #[serde(default)]
    pub source: SourceSettings,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub width: usize,
    pub height: usize,
    pub fps: usize,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self { width: 640, height: 480, fps: 60 }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub enabled: bool,
    pub index: u32,
    pub width: u32,
    pub height: u32,
    pub mirror: bool,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            index: 0,
            width: 640,
            height: 480,
            mirror: false,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DitherSettings {
    pub matrix_size: usize,
    pub levels: u8,
}

impl Default for DitherSettings {
    fn default() -> Self {
        Self { matrix_size: 4, levels: 2 }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AdjustSettings {
    pub resolution: f32,
    pub saturation: f32,
    pub contrast: f32,
    pub brightness: f32,
    pub hue: f32,
}

impl Default for AdjustSettings {
    fn default() -> Self {
        let p = AdjustmentParameters::default();
        Self {
            resolution: 1.0,
            saturation: p.saturation,
            contrast: p.contrast,
            brightness: p.brightness,
            hue: p.hue,
        }
    }
}

impl AdjustSettings {
    pub fn params(&self) -> AdjustmentParameters {
        AdjustmentParameters {
            saturation: self.saturation,
            contrast: self.contrast,
            brightness: self.brightness,
            hue: self.hue,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct SourceSettings {
    /// Still image to load at startup (and on the reload key).
    pub image: Option<PathBuf>,
}

impl Settings {
    /// Load from `path`, or from the default location when `None`.
    /// A missing file yields defaults; an unreadable or malformed one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);
        if !path.exists() {
            log::debug!("no settings file at {}, using defaults", path.display());
            return Ok(Settings::default());
        }
        let content = std::fs::read_to_string(&path).map_err(|source| Error::ConfigRead {
            path: path.clone(),
            source,
        })?;
        let settings = Self::parse(&content).map_err(|source| Error::ConfigParse {
            path: path.clone(),
            source,
        })?;
        log::info!("loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Initial runtime state derived from these settings.
    pub fn pipeline_config(&self) -> Result<PipelineConfig> {
        Ok(PipelineConfig {
            adjustments: self.adjust.params(),
            resolution: ResolutionFactor::new(self.adjust.resolution),
            source_mode: if self.camera.enabled {
                SourceMode::LiveCapture
            } else {
                SourceMode::StaticImage
            },
            levels: Levels::new(self.dither.levels)?,
        })
    }
}

/// `./bayer-cam.toml` if present, else `$HOME/.config/bayer-cam/config.toml`.
pub fn default_path() -> PathBuf {
    let local = PathBuf::from("bayer-cam.toml");
    if local.exists() {
        return local;
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".config/bayer-cam/config.toml")
}

/// Everything the frame pipeline reads at the start of a tick.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct PipelineConfig {
    pub adjustments: AdjustmentParameters,
    pub resolution: ResolutionFactor,
    pub source_mode: SourceMode,
    pub levels: Levels,
}

/// One user edit to the live configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ControlChange {
    Resolution(f32),
    Saturation(f32),
    Contrast(f32),
    Brightness(f32),
    Hue(f32),
    SourceMode(SourceMode),
    ResetAdjustments,
}

impl PipelineConfig {
    /// The single setter surface. Returns true when anything changed.
    /// Non-finite numbers are ignored; resolution below 1 clamps to 1.
    pub fn apply(&mut self, change: ControlChange) -> bool {
        let before = *self;
        let adj = &mut self.adjustments;
        match change {
            ControlChange::Resolution(v) => self.resolution = ResolutionFactor::new(v),
            ControlChange::Saturation(v) if v.is_finite() => adj.saturation = v,
            ControlChange::Contrast(v) if v.is_finite() => adj.contrast = v,
            ControlChange::Brightness(v) if v.is_finite() => adj.brightness = v,
            ControlChange::Hue(v) if v.is_finite() => adj.hue = v,
            ControlChange::SourceMode(mode) => self.source_mode = mode,
            ControlChange::ResetAdjustments => {
                *adj = AdjustmentParameters::default();
                self.resolution = ResolutionFactor::ONE;
            }
            _ => log::warn!("ignoring non-finite control value: {change:?}"),
        }
        let changed = *self != before;
        if changed {
            log::debug!("config change {change:?}");
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!((s.display.width, s.display.height), (640, 480));
        assert_eq!(s.dither.matrix_size, 4);
        assert_eq!(s.dither.levels, 2);
        assert!(s.camera.enabled);
        let cfg = s.pipeline_config().unwrap();
        assert_eq!(cfg.adjustments, AdjustmentParameters::default());
        assert_eq!(cfg.resolution, ResolutionFactor::ONE);
        assert_eq!(cfg.source_mode, SourceMode::LiveCapture);
    }

    #[test]
    fn test_parse_partial_file() {
        let s = Settings::parse(
            r#"
            [display]
            width = 320

            [adjust]
            resolution = 4.0
            hue = 90.0

            [camera]
            enabled = false

            [source]
            image = "cat.png"
            "#,
        )
        .unwrap();
        assert_eq!(s.display.width, 320);
        assert_eq!(s.display.height, 480);
        assert_eq!(s.adjust.resolution, 4.0);
        assert_eq!(s.adjust.hue, 90.0);
        assert_eq!(s.adjust.saturation, 1.0);
        assert_eq!(s.source.image, Some(PathBuf::from("cat.png")));
        let cfg = s.pipeline_config().unwrap();
        assert_eq!(cfg.source_mode, SourceMode::StaticImage);
        assert_eq!(cfg.resolution.get(), 4.0);
    }

    #[test]
    fn test_invalid_levels_rejected() {
        let s = Settings::parse("[dither]\nlevels = 1\n").unwrap();
        assert!(matches!(s.pipeline_config(), Err(Error::InvalidLevels(1))));
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let s = Settings::load(Some(&dir.path().join("nope.toml"))).unwrap();
        assert_eq!(s.display.fps, 60);
    }

    #[test]
    fn test_load_malformed_file_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[display\nwidth = ").unwrap();
        let err = Settings::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
    }

    #[test]
    fn test_apply_updates_and_reports_change() {
        let mut cfg = PipelineConfig::default();
        assert!(cfg.apply(ControlChange::Brightness(1.5)));
        assert_eq!(cfg.adjustments.brightness, 1.5);
        assert!(!cfg.apply(ControlChange::Brightness(1.5)));
        assert!(cfg.apply(ControlChange::SourceMode(SourceMode::StaticImage)));
        assert_eq!(cfg.source_mode, SourceMode::StaticImage);
    }

    #[test]
    fn test_apply_clamps_resolution_and_ignores_nan() {
        let mut cfg = PipelineConfig::default();
        cfg.apply(ControlChange::Resolution(0.25));
        assert_eq!(cfg.resolution, ResolutionFactor::ONE);
        assert!(!cfg.apply(ControlChange::Hue(f32::NAN)));
        assert_eq!(cfg.adjustments.hue, 0.0);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut cfg = PipelineConfig::default();
        cfg.apply(ControlChange::Contrast(0.2));
        cfg.apply(ControlChange::Resolution(6.0));
        assert!(cfg.apply(ControlChange::ResetAdjustments));
        assert_eq!(cfg.adjustments, AdjustmentParameters::default());
        assert_eq!(cfg.resolution, ResolutionFactor::ONE);
    }
}
