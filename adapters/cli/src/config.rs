//! TOML configuration for an editing session.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;
use underworld_core::{CoreError, Palette, TileType};
use underworld_rendering::Viewport;
use underworld_world::{WorldConfig, DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH};

const DEFAULT_POPULATION: i64 = 5;

/// Complete session configuration; every field falls back to its default.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SessionConfig {
    /// World construction parameters.
    pub(crate) world: WorldConfig,
    /// Tile types assigned to the toolbar slots in order; omitted slots paint nothing.
    pub(crate) palette: Option<Vec<TileType>>,
    /// Number of entities spawned after the world is built.
    pub(crate) population: i64,
    /// Screen area used for map previews.
    pub(crate) viewport: ViewportConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            palette: None,
            population: DEFAULT_POPULATION,
            viewport: ViewportConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Reads and parses a configuration file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Parses configuration from TOML text.
    pub(crate) fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse session config toml contents")
    }

    /// Palette built from the configured types, or the default palette.
    pub(crate) fn palette(&self) -> Result<Palette, CoreError> {
        match &self.palette {
            Some(types) => Palette::from_types(types),
            None => Ok(Palette::default()),
        }
    }
}

/// Pixel size of the preview viewport.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ViewportConfig {
    /// Width in pixels.
    pub(crate) width: u32,
    /// Height in pixels.
    pub(crate) height: u32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_VIEWPORT_WIDTH.unsigned_abs(),
            height: DEFAULT_VIEWPORT_HEIGHT.unsigned_abs(),
        }
    }
}

impl From<ViewportConfig> for Viewport {
    fn from(config: ViewportConfig) -> Self {
        Viewport::new(config.width, config.height)
    }
}
