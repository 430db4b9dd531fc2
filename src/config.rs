use std::collections::BTreeMap;
use std::path::Path;

use gaia_bake::BakeOptions;
use gaia_mask::MaskParams;
use gaia_shader::SurfacePalette;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "assets/planet.toml";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanetConfig {
    pub mask: MaskParams,
    pub palette: SurfacePalette,
    pub bake: BakeOptions,
    /// Explicit `morph target name -> region name` table; empty means
    /// targets are matched by name substring.
    pub morph: BTreeMap<String, String>,
    pub demo: DemoConfig,
}

/// Procedural stand-in for the loaded planet assets.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub subdivisions: u32,
    pub radius: f32,
    /// Amplitude of the morph target displacements, relative to `radius`.
    pub relief: f32,
    pub foliage_count: u32,
    pub seed: i32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            subdivisions: 4,
            radius: 1.0,
            relief: 0.08,
            foliage_count: 400,
            seed: 1337,
        }
    }
}

impl PlanetConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        let mut cfg: PlanetConfig = toml::from_str(s)?;
        cfg.mask = cfg.mask.sanitized();
        cfg.bake = cfg.bake.sanitized();
        Ok(cfg)
    }
}

pub fn load_config_from_path(path: &Path) -> Result<PlanetConfig, Box<dyn std::error::Error>> {
    let s = std::fs::read_to_string(path).map_err(|e| format!("read {}: {}", path.display(), e))?;
    let cfg = PlanetConfig::from_toml_str(&s).map_err(|e| format!("parse {}: {}", path.display(), e))?;
    log::info!("loaded planet config from {}", path.display());
    Ok(cfg)
}

/// Loads `path` if it exists, otherwise falls back to defaults.
pub fn load_or_default(path: &Path) -> Result<PlanetConfig, Box<dyn std::error::Error>> {
    if path.exists() {
        load_config_from_path(path)
    } else {
        log::debug!("{} not found; using built-in defaults", path.display());
        Ok(PlanetConfig::default())
    }
}
