//! Optional `quarry.toml` settings.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use quarry_mesh_cpu::MeshOptions;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QuarryConfig {
    pub render: RenderConfig,
    pub assets: AssetsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub new_style_water: bool,
    pub new_style_leaves: bool,
    /// 0 = night, 1000 = day.
    pub daynight_ratio: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            new_style_water: false,
            new_style_leaves: false,
            daynight_ratio: 1000,
        }
    }
}

/// Overrides for the two asset files; relative paths are taken from the assets root.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    pub content: Option<PathBuf>,
    pub textures: Option<PathBuf>,
}

impl QuarryConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Reads `path`; a missing file gives the defaults.
    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let s = fs::read_to_string(path)?;
        Ok(Self::from_toml_str(&s)?)
    }

    pub fn mesh_options(&self) -> MeshOptions {
        MeshOptions {
            new_style_water: self.render.new_style_water,
            new_style_leaves: self.render.new_style_leaves,
            daynight_ratio: self.render.daynight_ratio.min(1000),
        }
    }
}
