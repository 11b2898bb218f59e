//! Configuration loading for add-photo-to-pdf.
//!
//! Every field is optional; command-line flags override the file, and the
//! file overrides built-in defaults.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use photo_core::{Anchor, FitMode, DEFAULT_MARGIN};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    pub placement: Option<PlacementConfig>,
    pub image: Option<ImageConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct PlacementConfig {
    pub position: Option<Anchor>,
    pub margin: Option<f64>,
    pub fit_mode: Option<FitMode>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ImageConfig {
    pub opacity: Option<f64>,
    pub rotation: Option<i64>,
}

impl Config {
    pub fn position(&self) -> Anchor {
        self.placement
            .as_ref()
            .and_then(|p| p.position)
            .unwrap_or_default()
    }

    pub fn margin(&self) -> f64 {
        self.placement
            .as_ref()
            .and_then(|p| p.margin)
            .unwrap_or(DEFAULT_MARGIN)
    }

    pub fn fit_mode(&self) -> FitMode {
        self.placement
            .as_ref()
            .and_then(|p| p.fit_mode)
            .unwrap_or_default()
    }

    /// Opacity in `0.0..=1.0`, validated when the request is built.
    pub fn opacity(&self) -> f64 {
        self.image.as_ref().and_then(|i| i.opacity).unwrap_or(1.0)
    }

    /// Rotation in degrees, validated when the request is built.
    pub fn rotation(&self) -> i64 {
        self.image.as_ref().and_then(|i| i.rotation).unwrap_or(0)
    }
}

pub fn default_config_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "add-photo").context("Could not determine config directory")?;
    Ok(dirs.config_dir().join("config.toml"))
}

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: Config =
        toml::from_str(&contents).context("Failed to parse config file as TOML")?;
    Ok(config)
}
