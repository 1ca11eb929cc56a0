//! Driver configuration with layered loading
//!
//! Configuration is loaded from multiple sources (lowest to highest priority):
//! 1. Compiled defaults
//! 2. `pixpet.ron` file (if exists), or the file given with `--config`
//! 3. Environment variables prefixed with `PIXPET_`
//!
//! Example environment variable: `PIXPET_CANVAS__WIDTH=48`

use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};

/// Main driver configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PixpetConfig {
    #[serde(default)]
    pub canvas: CanvasConfig,

    #[serde(default)]
    pub animation: AnimationConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Sprite canvas size in terminal cells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasConfig {
    pub width: usize,
    /// Text rows; the pixel grid is twice as tall
    pub text_height: usize,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 32,
            text_height: 16,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Idle frames generated after the base frame
    pub frames: usize,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self { frames: 4 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One digit per pixel, `.` for transparent
    #[default]
    Sprite,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

impl PixpetConfig {
    /// Load configuration with layered priority:
    /// 1. Compiled defaults (lowest priority)
    /// 2. `pixpet.ron` in the working directory, if present
    /// 3. Environment variables prefixed with `PIXPET_` (highest priority)
    pub fn load() -> Result<Self> {
        let builder = Self::defaults()?.add_source(
            File::with_name("pixpet")
                .format(config::FileFormat::Ron)
                .required(false),
        );
        Self::finish(builder)
    }

    /// Same layering, with an explicit config file that must exist
    pub fn load_from(path: &Path) -> Result<Self> {
        let builder = Self::defaults()?.add_source(
            File::from(path)
                .format(config::FileFormat::Ron)
                .required(true),
        );
        Self::finish(builder)
            .with_context(|| format!("Failed to load config from {}", path.display()))
    }

    fn defaults() -> Result<ConfigBuilder<config::builder::DefaultState>> {
        let defaults = Self::default();
        Ok(Config::builder()
            .set_default("canvas.width", defaults.canvas.width as i64)?
            .set_default("canvas.text_height", defaults.canvas.text_height as i64)?
            .set_default("animation.frames", defaults.animation.frames as i64)?
            .set_default("output.format", "sprite")?)
    }

    fn finish(builder: ConfigBuilder<config::builder::DefaultState>) -> Result<Self> {
        // PIXPET_CANVAS__WIDTH, PIXPET_OUTPUT__FORMAT, etc.
        let config = builder
            .add_source(Environment::with_prefix("PIXPET").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = PixpetConfig::default();
        assert_eq!(config.canvas.width, 32);
        assert_eq!(config.canvas.text_height, 16);
        assert_eq!(config.animation.frames, 4);
        assert_eq!(config.output.format, OutputFormat::Sprite);
    }

    #[test]
    fn test_load_config_with_defaults() {
        // Should load defaults when no config file exists
        let config = PixpetConfig::load().expect("Failed to load config");
        assert!(config.canvas.width > 0);
        assert!(config.canvas.text_height > 0);
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".ron")
            .tempfile()
            .expect("tempfile");
        writeln!(
            file,
            "(canvas: (width: 48, text_height: 20), output: (format: \"json\"))"
        )
        .expect("write");

        let config = PixpetConfig::load_from(file.path()).expect("load");
        assert_eq!(config.canvas.width, 48);
        assert_eq!(config.canvas.text_height, 20);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.animation.frames, 4);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("nope.ron");
        assert!(PixpetConfig::load_from(&missing).is_err());
    }
}
